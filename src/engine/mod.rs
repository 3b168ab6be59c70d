mod context;
mod reply_bridge;
mod runner;
mod session;
mod state;
mod steps;

pub use context::Model;
pub use reply_bridge::{DEFAULT_REPLY_CHANNEL, PendingReply, ReplyBridge};
pub use runner::{CompletionHandler, StateObserver, StepRunner};
pub use session::HostSession;
pub use state::RunnerState;
pub use steps::{
    AsyncScriptStep, DEFAULT_POLL_INTERVAL, OpenPageStep, PageChangeStep, ProcessHandler,
    ProcessStep, ScriptCall, ScriptHandler, ScriptStep, SharedStep, Step, StepFlow, StepOutcome,
    WaitForConditionStep, WaitStep,
};
