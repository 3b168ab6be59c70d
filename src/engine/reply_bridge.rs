use crate::error::ScraperError;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::debug;

/// 비동기 스크립트 응답 메시지를 받을 기본 채널 이름이다.
pub const DEFAULT_REPLY_CHANNEL: &str = "pipelineResponseHandler";

/// 호스트 메시지 핸들러와 대기 중인 비동기 스크립트 호출을 잇는 단일 슬롯 브리지이다.
#[derive(Clone, Debug)]
pub struct ReplyBridge {
    /// 내부 상태를 보관한다.
    inner: Arc<ReplyBridgeInner>,
}

/// ReplyBridge 내부 구현체이다.
#[derive(Debug)]
struct ReplyBridgeInner {
    /// 응답으로 인정할 메시지 채널 이름이다.
    channel: String,
    /// 다음 등록 ID를 생성하기 위한 카운터이다.
    next_id: AtomicU64,
    /// 현재 대기 중인 등록이다. 동시에 하나만 존재한다.
    pending: Mutex<Option<PendingSlot>>,
}

/// 대기 중인 등록 ID와 응답 송신자이다.
#[derive(Debug)]
struct PendingSlot {
    id: u64,
    sender: oneshot::Sender<Value>,
}

impl ReplyBridge {
    /// 지정한 채널 이름으로 브리지를 생성한다.
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(ReplyBridgeInner {
                channel: channel.into(),
                next_id: AtomicU64::new(1),
                pending: Mutex::new(None),
            }),
        }
    }

    /// 응답으로 인정하는 채널 이름을 반환한다.
    pub fn channel(&self) -> &str {
        &self.inner.channel
    }

    /// 새 응답 대기를 등록한다. 이전 등록이 남아 있었다면 버려진다.
    pub fn register(&self) -> PendingReply {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = oneshot::channel();
        let previous = self
            .inner
            .pending
            .lock()
            .expect("ReplyBridge mutex poisoned")
            .replace(PendingSlot { id, sender });
        if let Some(stale) = previous {
            debug!(stale_id = stale.id, "이전 비동기 응답 대기를 폐기합니다.");
        }
        PendingReply {
            bridge: self.clone(),
            id,
            receiver,
        }
    }

    /// 호스트가 받은 메시지를 대기 중인 호출로 전달한다.
    ///
    /// # 반환값
    /// 대기 중인 호출에 전달했으면 `true`, 채널 이름이 다르거나 대기 중인 호출이 없으면 `false`.
    pub fn deliver(&self, channel: &str, body: Value) -> bool {
        if channel != self.inner.channel {
            debug!(channel, "알 수 없는 채널의 메시지를 무시합니다.");
            return false;
        }
        let slot = self
            .inner
            .pending
            .lock()
            .expect("ReplyBridge mutex poisoned")
            .take();
        match slot {
            Some(slot) => slot.sender.send(body).is_ok(),
            None => {
                debug!("대기 중인 비동기 호출이 없어 메시지를 버립니다.");
                false
            }
        }
    }

    /// 대기 중인 호출이 있는지 확인한다.
    pub fn has_pending(&self) -> bool {
        self.inner
            .pending
            .lock()
            .expect("ReplyBridge mutex poisoned")
            .is_some()
    }

    /// 대기 중인 호출을 모두 폐기한다. 러너나 호스트를 정리할 때 사용한다.
    pub fn clear(&self) {
        self.inner
            .pending
            .lock()
            .expect("ReplyBridge mutex poisoned")
            .take();
    }

    /// 지정한 등록이 아직 현재 등록이면 제거한다.
    fn cancel(&self, id: u64) {
        let mut guard = self.inner.pending.lock().expect("ReplyBridge mutex poisoned");
        if guard.as_ref().is_some_and(|slot| slot.id == id) {
            guard.take();
        }
    }
}

impl Default for ReplyBridge {
    fn default() -> Self {
        Self::new(DEFAULT_REPLY_CHANNEL)
    }
}

/// 등록된 응답 대기 하나를 표현한다. drop되면 슬롯을 비운다.
#[derive(Debug)]
pub struct PendingReply {
    bridge: ReplyBridge,
    id: u64,
    receiver: oneshot::Receiver<Value>,
}

impl PendingReply {
    /// 등록 ID를 반환한다.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// 메시지가 전달될 때까지 기다린다. 제한 시간은 없다.
    pub async fn wait(mut self) -> Result<Value, ScraperError> {
        (&mut self.receiver).await.map_err(|_| {
            ScraperError::Javascript("비동기 응답 대기가 취소되었습니다.".to_string())
        })
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.bridge.cancel(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn delivered_message_reaches_pending_reply() {
        let bridge = ReplyBridge::default();
        let pending = bridge.register();
        assert!(bridge.has_pending());
        assert!(bridge.deliver(DEFAULT_REPLY_CHANNEL, json!({"status": "ok"})));
        assert!(!bridge.has_pending());
        let body = pending.wait().await.unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }

    #[test]
    fn second_delivery_is_dropped() {
        let bridge = ReplyBridge::default();
        let _pending = bridge.register();
        assert!(bridge.deliver(DEFAULT_REPLY_CHANNEL, json!(1)));
        assert!(!bridge.deliver(DEFAULT_REPLY_CHANNEL, json!(2)));
    }

    #[test]
    fn message_on_other_channel_is_ignored() {
        let bridge = ReplyBridge::new("results");
        let _pending = bridge.register();
        assert!(!bridge.deliver("analytics", json!(1)));
        assert!(bridge.has_pending());
    }

    #[test]
    fn dropping_pending_reply_clears_slot() {
        let bridge = ReplyBridge::default();
        let pending = bridge.register();
        drop(pending);
        assert!(!bridge.has_pending());
        assert!(!bridge.deliver(DEFAULT_REPLY_CHANNEL, json!("late")));
    }

    #[test]
    fn stale_guard_does_not_clear_newer_registration() {
        let bridge = ReplyBridge::default();
        let first = bridge.register();
        let second = bridge.register();
        assert_ne!(first.id(), second.id());
        drop(first);
        assert!(bridge.has_pending());
        drop(second);
        assert!(!bridge.has_pending());
    }

    #[tokio::test]
    async fn cleared_bridge_cancels_wait() {
        let bridge = ReplyBridge::default();
        let pending = bridge.register();
        bridge.clear();
        assert!(matches!(pending.wait().await, Err(ScraperError::Javascript(_))));
    }
}
