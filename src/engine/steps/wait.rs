use super::super::context::Model;
use super::super::session::HostSession;
use super::{Step, StepOutcome};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;

/// 고정 시간만큼 기다린 뒤 진행하는 Step이다.
#[derive(Debug, Clone)]
pub struct WaitStep {
    duration: Duration,
}

impl WaitStep {
    /// 대기 시간을 지정해 Step을 만든다.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl Step for WaitStep {
    async fn run(&self, _session: &HostSession, model: Model) -> StepOutcome {
        sleep(self.duration).await;
        StepOutcome::Proceed(model)
    }

    fn describe(&self) -> String {
        format!("wait {}ms", self.duration.as_millis())
    }
}
