use super::super::context::Model;
use super::super::session::HostSession;
use super::{Step, StepOutcome};
use crate::error::ScraperError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::trace;

/// 조건 함수를 다시 실행하기까지의 기본 간격이다.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 조건 함수가 `true`를 돌려줄 때까지 주기적으로 확인하는 Step이다.
///
/// 제한 시간이 지나도록 `true`가 아니면 `Timeout`으로 실패한다.
/// 조건 함수 실행 자체가 실패하면 더 기다리지 않고 즉시 실패한다.
#[derive(Debug, Clone)]
pub struct WaitForConditionStep {
    /// 조건을 평가하는 함수 이름.
    assertion: String,
    /// 최대 대기 시간.
    timeout: Duration,
    /// 확인 간격.
    poll_interval: Duration,
}

impl WaitForConditionStep {
    /// 조건 함수와 제한 시간으로 Step을 만든다.
    pub fn new(assertion: impl Into<String>, timeout: Duration) -> Self {
        Self {
            assertion: assertion.into(),
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// 확인 간격을 바꾼다.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }
}

#[async_trait]
impl Step for WaitForConditionStep {
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome {
        // 시작 시각과 시도 횟수는 호출마다 새로 만들어지고 반환과 함께 사라진다.
        let started_at = Instant::now();
        let mut attempt: u64 = 0;
        loop {
            sleep(self.poll_interval).await;
            attempt += 1;
            match session.run_script::<Value>(&self.assertion, &[]).await {
                Ok(Value::Bool(true)) => return StepOutcome::Proceed(model),
                Ok(response) => {
                    let elapsed = started_at.elapsed();
                    trace!(
                        assertion = %self.assertion,
                        attempt,
                        ?elapsed,
                        %response,
                        "조건 미충족"
                    );
                    if elapsed > self.timeout {
                        return StepOutcome::Failure(ScraperError::Timeout, model);
                    }
                }
                Err(err) => return StepOutcome::Failure(err, model),
            }
        }
    }

    fn describe(&self) -> String {
        format!(
            "wait_for_condition {} (제한 {}ms, 간격 {}ms)",
            self.assertion,
            self.timeout.as_millis(),
            self.poll_interval.as_millis()
        )
    }
}
