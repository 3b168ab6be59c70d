use super::reply_bridge::ReplyBridge;
use crate::error::ScraperError;
use crate::host::SharedHost;
use crate::script::generate_call;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// 러너 실행 중 Step들이 공유하는 호스트 접근 창구이다.
///
/// 호출식 생성, 호스트 오류 변환, 비동기 응답 대기를 한곳에서 처리한다.
#[derive(Clone)]
pub struct HostSession {
    /// 실제 실행 호스트.
    host: SharedHost,
    /// 호출식 앞에 붙는 스크립트 모듈 이름.
    namespace: String,
    /// 비동기 응답 슬롯.
    replies: ReplyBridge,
}

impl HostSession {
    /// 기본 응답 채널로 세션을 생성한다.
    pub fn new(host: SharedHost, namespace: impl Into<String>) -> Self {
        Self::with_reply_bridge(host, namespace, ReplyBridge::default())
    }

    /// 지정한 응답 브리지를 사용하는 세션을 생성한다.
    pub fn with_reply_bridge(
        host: SharedHost,
        namespace: impl Into<String>,
        replies: ReplyBridge,
    ) -> Self {
        Self {
            host,
            namespace: namespace.into(),
            replies,
        }
    }

    /// 호출식 접두어로 쓰이는 모듈 이름을 반환한다.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// 호스트 메시지 핸들러에 연결할 응답 브리지를 반환한다.
    pub fn reply_bridge(&self) -> &ReplyBridge {
        &self.replies
    }

    /// 페이지를 로드한다. 실패는 `NavigationFailed`로 보고된다.
    pub async fn load(&self, path: &str) -> Result<(), ScraperError> {
        debug!(path, "페이지 로드 요청");
        self.host
            .load(path)
            .await
            .map_err(ScraperError::NavigationFailed)
    }

    /// 함수를 호출하고 즉시 반환값을 돌려받는다.
    pub async fn run_script<P: Serialize + Sync>(
        &self,
        function: &str,
        params: &[P],
    ) -> Result<Value, ScraperError> {
        let script = generate_call(&self.namespace, function, params)?;
        self.evaluate(&script).await
    }

    /// 페이지 이동을 일으키는 함수를 호출하고 새 페이지 로드를 기다린다.
    pub async fn run_page_change_script<P: Serialize + Sync>(
        &self,
        function: &str,
        params: &[P],
    ) -> Result<(), ScraperError> {
        let script = generate_call(&self.namespace, function, params)?;
        debug!(%script, "페이지 이동 스크립트 실행");
        self.host.evaluate_navigation(&script).await.map_err(|err| {
            debug!(error = %err, "페이지 이동 스크립트 실패");
            ScraperError::from(err)
        })
    }

    /// 함수를 호출한 뒤 메시지로 전달되는 결과를 기다린다.
    ///
    /// 응답 슬롯은 스크립트 평가 전에 등록되므로 평가 도중 전달된 메시지도 유실되지 않는다.
    /// 평가가 실패하면 슬롯을 비우고 즉시 실패를 반환한다.
    pub async fn run_async_script<P: Serialize + Sync>(
        &self,
        function: &str,
        params: &[P],
    ) -> Result<Value, ScraperError> {
        let script = generate_call(&self.namespace, function, params)?;
        let pending = self.replies.register();
        self.evaluate(&script).await?;
        debug!(reply_id = pending.id(), "비동기 응답 대기");
        let body = pending.wait().await?;
        debug!(response = %body, "비동기 응답 수신");
        Ok(body)
    }

    /// 호출식을 평가하고 결과를 기록한다.
    async fn evaluate(&self, script: &str) -> Result<Value, ScraperError> {
        debug!(%script, "스크립트 실행");
        match self.host.evaluate(script).await {
            Ok(response) => {
                debug!(%response, "스크립트 응답");
                Ok(response)
            }
            Err(err) => {
                debug!(error = %err, "스크립트 실행 오류");
                Err(ScraperError::Javascript(err.message))
            }
        }
    }
}
