use super::super::context::Model;
use super::super::session::HostSession;
use super::{Step, StepFlow, StepOutcome};
use async_trait::async_trait;
use std::sync::Arc;

/// 모델을 직접 다루고 흐름을 결정하는 핸들러이다.
pub type ProcessHandler = Arc<dyn Fn(&mut Model) -> StepFlow + Send + Sync>;

/// 호스트를 거치지 않고 모델 가공이나 흐름 제어만 수행하는 Step이다.
#[derive(Clone)]
pub struct ProcessStep {
    handler: ProcessHandler,
}

impl ProcessStep {
    /// 핸들러로 Step을 만든다.
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&mut Model) -> StepFlow + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }
}

#[async_trait]
impl Step for ProcessStep {
    async fn run(&self, _session: &HostSession, model: Model) -> StepOutcome {
        let mut model = model;
        let flow = (self.handler)(&mut model);
        flow.into_outcome(model)
    }

    fn describe(&self) -> String {
        "process".to_string()
    }
}
