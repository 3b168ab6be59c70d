use super::super::context::Model;
use super::super::session::HostSession;
use super::navigation::assert_navigation;
use super::{Step, StepOutcome};
use async_trait::async_trait;

/// 새 페이지를 로드하는 Step이다.
#[derive(Debug, Clone)]
pub struct OpenPageStep {
    /// 로드할 주소.
    path: String,
    /// 로드 후 실행할 검증 함수 이름.
    assertion: Option<String>,
}

impl OpenPageStep {
    /// 검증 없이 페이지를 로드하는 Step을 만든다.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            assertion: None,
        }
    }

    /// 로드 후 `true`를 돌려줘야 하는 검증 함수를 지정한다.
    pub fn with_assertion(mut self, assertion: impl Into<String>) -> Self {
        self.assertion = Some(assertion.into());
        self
    }
}

#[async_trait]
impl Step for OpenPageStep {
    async fn run(&self, session: &HostSession, model: Model) -> StepOutcome {
        if let Err(err) = session.load(&self.path).await {
            return StepOutcome::Failure(err, model);
        }
        assert_navigation(session, self.assertion.as_deref(), model).await
    }

    fn describe(&self) -> String {
        match &self.assertion {
            Some(assertion) => format!("open_page {} (검증: {assertion})", self.path),
            None => format!("open_page {}", self.path),
        }
    }
}
