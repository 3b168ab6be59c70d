use crate::error::ScraperError;

/// StepRunner의 진행 상태를 표현한다.
#[derive(Debug, Clone)]
pub enum RunnerState {
    /// 아직 `run()`이 호출되지 않은 상태.
    NotStarted,
    /// 해당 인덱스의 Step을 실행 중.
    InProgress(usize),
    /// 정상 종료.
    Success,
    /// 오류와 함께 종료.
    Failure(ScraperError),
}

impl RunnerState {
    /// 더 이상 Step이 실행되지 않는 종료 상태인지 확인한다.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunnerState::Success | RunnerState::Failure(_))
    }

    /// 실패 상태라면 오류를 반환한다.
    pub fn error(&self) -> Option<&ScraperError> {
        match self {
            RunnerState::Failure(err) => Some(err),
            _ => None,
        }
    }
}

impl PartialEq for RunnerState {
    /// 실패 상태는 오류 종류만 비교한다.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RunnerState::NotStarted, RunnerState::NotStarted) => true,
            (RunnerState::Success, RunnerState::Success) => true,
            (RunnerState::InProgress(lhs), RunnerState::InProgress(rhs)) => lhs == rhs,
            (RunnerState::Failure(lhs), RunnerState::Failure(rhs)) => lhs.same_kind(rhs),
            _ => false,
        }
    }
}
