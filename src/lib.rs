//! 원격 스크립트 실행 환경(웹뷰, 헤드리스 브라우저 등)을 대상으로
//! 여러 단계의 자동화 시퀀스를 순차 실행하는 Step 파이프라인 엔진이다.
//!
//! 각 Step은 호스트에 호출을 보내고, 결과(즉시 반환 또는 메시지 전달)를 받아
//! 다음 흐름을 결정한다. [`StepRunner`]가 Step 목록과 모델, 상태를 소유하고
//! 상태 변화를 관찰자에게 알린다.

pub mod engine;
pub mod error;
pub mod host;
pub mod scenario;
pub mod script;

pub use engine::{
    AsyncScriptStep, HostSession, Model, OpenPageStep, PageChangeStep, ProcessStep, ReplyBridge,
    RunnerState, ScriptStep, SharedStep, Step, StepFlow, StepOutcome, StepRunner,
    WaitForConditionStep, WaitStep,
};
pub use error::{HostError, HostErrorKind, ScraperError};
pub use host::{ExecutionHost, SharedHost};
pub use scenario::{PipelineScenario, StepDefinition, load_scenario_from_file};
pub use script::generate_call;
