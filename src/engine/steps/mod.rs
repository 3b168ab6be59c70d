use super::context::Model;
use super::session::HostSession;
use crate::error::ScraperError;
use async_trait::async_trait;
use std::sync::Arc;

mod navigation;
mod open_page;
mod page_change;
mod process;
mod script;
mod utils;
mod wait;
mod wait_for_condition;

pub use open_page::OpenPageStep;
pub use page_change::PageChangeStep;
pub use process::{ProcessHandler, ProcessStep};
pub use script::{AsyncScriptStep, ScriptHandler, ScriptStep};
pub use utils::ScriptCall;
pub use wait::WaitStep;
pub use wait_for_condition::{DEFAULT_POLL_INTERVAL, WaitForConditionStep};

/// 파이프라인의 실행 단위이다.
///
/// StepRunner는 `run()`이 돌려준 결과로 다음에 무엇을 할지 결정한다.
#[async_trait]
pub trait Step: Send + Sync {
    /// Step을 실행한다.
    ///
    /// # 인자
    /// - `session`: 호스트 접근 창구
    /// - `model`: 이전 Step이 돌려준 모델의 복사본
    ///
    /// # 반환값
    /// 다음 흐름과 (수정되었을 수 있는) 모델을 담은 결과.
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome;

    /// 로그와 실행 계획 출력에 쓰이는 설명이다.
    fn describe(&self) -> String;
}

/// Step을 공유하기 위한 Arc 타입 별칭이다.
pub type SharedStep = Arc<dyn Step>;

/// Step 실행이 끝난 뒤 러너가 따를 흐름과 모델이다.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// 다음 Step으로 진행한다.
    Proceed(Model),
    /// 지정한 인덱스의 Step부터 다시 실행한다.
    JumpToStep(usize, Model),
    /// 남은 Step과 관계없이 성공으로 종료한다.
    Finish(Model),
    /// 오류와 함께 종료한다.
    Failure(ScraperError, Model),
}

impl StepOutcome {
    /// 결과에 담긴 모델을 참조한다.
    pub fn model(&self) -> &Model {
        match self {
            StepOutcome::Proceed(model)
            | StepOutcome::JumpToStep(_, model)
            | StepOutcome::Finish(model)
            | StepOutcome::Failure(_, model) => model,
        }
    }

    /// 흐름 지시와 모델로 분리한다.
    pub fn into_parts(self) -> (StepFlow, Model) {
        match self {
            StepOutcome::Proceed(model) => (StepFlow::Proceed, model),
            StepOutcome::JumpToStep(index, model) => (StepFlow::JumpToStep(index), model),
            StepOutcome::Finish(model) => (StepFlow::Finish, model),
            StepOutcome::Failure(err, model) => (StepFlow::Failure(err), model),
        }
    }
}

/// 핸들러가 돌려주는 흐름 지시이다. 호스트 호출의 성공 여부와는 별개다.
#[derive(Debug, Clone)]
pub enum StepFlow {
    /// 다음 Step으로 진행한다.
    Proceed,
    /// 지정한 인덱스의 Step으로 이동한다.
    JumpToStep(usize),
    /// 성공으로 즉시 종료한다.
    Finish,
    /// 실패로 즉시 종료한다.
    Failure(ScraperError),
}

impl StepFlow {
    /// 핸들러가 수정한 모델을 붙여 StepOutcome으로 변환한다.
    pub fn into_outcome(self, model: Model) -> StepOutcome {
        match self {
            StepFlow::Proceed => StepOutcome::Proceed(model),
            StepFlow::JumpToStep(index) => StepOutcome::JumpToStep(index, model),
            StepFlow::Finish => StepOutcome::Finish(model),
            StepFlow::Failure(err) => StepOutcome::Failure(err, model),
        }
    }

    /// 임의의 오류로 실패 지시를 만든다.
    pub fn fail(err: impl Into<anyhow::Error>) -> Self {
        StepFlow::Failure(ScraperError::handler(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flow_keeps_handler_model() {
        let mut model = Model::new();
        model.insert("step2".into(), json!(123));
        let outcome = StepFlow::JumpToStep(3).into_outcome(model);
        assert_eq!(outcome.model()["step2"], json!(123));
        let (flow, model) = outcome.into_parts();
        assert!(matches!(flow, StepFlow::JumpToStep(3)));
        assert_eq!(model.len(), 1);
    }
}
