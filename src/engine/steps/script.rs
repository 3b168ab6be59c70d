use super::super::context::Model;
use super::super::session::HostSession;
use super::utils::ScriptCall;
use super::{Step, StepFlow, StepOutcome};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// 스크립트 응답과 모델을 받아 흐름을 결정하는 핸들러이다.
pub type ScriptHandler = Arc<dyn Fn(Value, &mut Model) -> StepFlow + Send + Sync>;

/// 응답을 받는 방식을 구분한다.
#[derive(Debug, Clone, Copy)]
enum ReplyMode {
    /// 호출 반환값을 그대로 사용한다.
    Immediate,
    /// 호출 후 메시지로 전달되는 값을 기다린다.
    Message,
}

/// 함수를 호출하고 즉시 반환된 값을 핸들러에 넘기는 Step이다.
#[derive(Clone)]
pub struct ScriptStep {
    call: ScriptCall,
    handler: ScriptHandler,
}

/// 함수를 호출하고 `postMessage`로 나중에 전달되는 값을 핸들러에 넘기는 Step이다.
///
/// 메시지가 올 때까지 제한 없이 대기한다.
#[derive(Clone)]
pub struct AsyncScriptStep {
    call: ScriptCall,
    handler: ScriptHandler,
}

impl ScriptStep {
    /// 인자 없는 스크립트 Step을 만든다.
    pub fn new<F>(function: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value, &mut Model) -> StepFlow + Send + Sync + 'static,
    {
        Self {
            call: ScriptCall::new(function),
            handler: Arc::new(handler),
        }
    }

    /// 고정 인자를 지정한다.
    pub fn params(mut self, params: Vec<Value>) -> Self {
        self.call.params = params;
        self
    }

    /// 모델에서 인자를 꺼낼 키를 지정한다.
    pub fn params_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call.params_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

impl AsyncScriptStep {
    /// 인자 없는 비동기 스크립트 Step을 만든다.
    pub fn new<F>(function: impl Into<String>, handler: F) -> Self
    where
        F: Fn(Value, &mut Model) -> StepFlow + Send + Sync + 'static,
    {
        Self {
            call: ScriptCall::new(function),
            handler: Arc::new(handler),
        }
    }

    /// 고정 인자를 지정한다.
    pub fn params(mut self, params: Vec<Value>) -> Self {
        self.call.params = params;
        self
    }

    /// 모델에서 인자를 꺼낼 키를 지정한다.
    pub fn params_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call.params_keys = keys.into_iter().map(Into::into).collect();
        self
    }
}

#[async_trait]
impl Step for ScriptStep {
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome {
        run_script_call(session, &self.call, &self.handler, ReplyMode::Immediate, model).await
    }

    fn describe(&self) -> String {
        format!("script {}", self.call.describe())
    }
}

#[async_trait]
impl Step for AsyncScriptStep {
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome {
        run_script_call(session, &self.call, &self.handler, ReplyMode::Message, model).await
    }

    fn describe(&self) -> String {
        format!("async_script {}", self.call.describe())
    }
}

/// 호출 후 응답을 핸들러에 넘긴다. 호출이 실패하면 핸들러는 실행되지 않는다.
async fn run_script_call(
    session: &HostSession,
    call: &ScriptCall,
    handler: &ScriptHandler,
    mode: ReplyMode,
    model: Model,
) -> StepOutcome {
    let params = call.resolve_params(&model);
    let response = match mode {
        ReplyMode::Immediate => session.run_script(&call.function, &params).await,
        ReplyMode::Message => session.run_async_script(&call.function, &params).await,
    };
    match response {
        Ok(response) => {
            let mut model = model;
            let flow = (**handler)(response, &mut model);
            flow.into_outcome(model)
        }
        Err(err) => StepOutcome::Failure(err, model),
    }
}
