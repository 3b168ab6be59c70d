use super::super::context::Model;
use super::super::session::HostSession;
use super::StepOutcome;
use crate::error::ScraperError;
use serde_json::Value;
use tracing::debug;

/// 페이지 이동 후 검증 스크립트를 실행해 결과를 StepOutcome으로 바꾼다.
///
/// 검증 이름이 없으면 바로 진행한다. 검증 스크립트가 `true`가 아닌 값을 돌려주거나
/// 실행 자체가 실패하면 모두 `ContentUnexpected`로 처리한다.
pub(super) async fn assert_navigation(
    session: &HostSession,
    assertion: Option<&str>,
    model: Model,
) -> StepOutcome {
    let Some(assertion) = assertion else {
        return StepOutcome::Proceed(model);
    };
    match session.run_script::<Value>(assertion, &[]).await {
        Ok(Value::Bool(true)) => StepOutcome::Proceed(model),
        Ok(other) => {
            debug!(assertion, response = %other, "페이지 검증 실패");
            StepOutcome::Failure(ScraperError::ContentUnexpected, model)
        }
        Err(err) => {
            // 스크립트 오류도 내용 불일치로 취급한다.
            debug!(assertion, error = %err, "페이지 검증 스크립트 오류");
            StepOutcome::Failure(ScraperError::ContentUnexpected, model)
        }
    }
}
