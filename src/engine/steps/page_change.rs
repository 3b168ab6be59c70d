use super::super::context::Model;
use super::super::session::HostSession;
use super::navigation::assert_navigation;
use super::utils::ScriptCall;
use super::{Step, StepOutcome};
use async_trait::async_trait;
use serde_json::Value;

/// 페이지 이동을 일으키는 스크립트를 실행하는 Step이다.
#[derive(Debug, Clone)]
pub struct PageChangeStep {
    /// 호출 정보.
    call: ScriptCall,
    /// 이동 후 실행할 검증 함수 이름.
    assertion: Option<String>,
}

impl PageChangeStep {
    /// 인자 없는 페이지 이동 Step을 만든다.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            call: ScriptCall::new(function),
            assertion: None,
        }
    }

    /// 고정 인자를 지정한다.
    pub fn params(mut self, params: Vec<Value>) -> Self {
        self.call.params = params;
        self
    }

    /// 모델에서 인자를 꺼낼 키를 지정한다. 지정하면 고정 인자보다 우선한다.
    pub fn params_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.call.params_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// 이동 후 `true`를 돌려줘야 하는 검증 함수를 지정한다.
    pub fn with_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.assertion = Some(assertion.into());
        self
    }
}

#[async_trait]
impl Step for PageChangeStep {
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome {
        let params = self.call.resolve_params(&model);
        if let Err(err) = session
            .run_page_change_script(&self.call.function, &params)
            .await
        {
            return StepOutcome::Failure(err, model);
        }
        assert_navigation(session, self.assertion.as_deref(), model).await
    }

    fn describe(&self) -> String {
        match &self.assertion {
            Some(assertion) => format!("page_change {} (검증: {assertion})", self.call.describe()),
            None => format!("page_change {}", self.call.describe()),
        }
    }
}
