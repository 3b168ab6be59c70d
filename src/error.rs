use std::sync::Arc;

/// 호스트가 보고한 오류의 출처를 구분한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostErrorKind {
    /// 스크립트 평가 중 발생한 오류.
    Script,
    /// 페이지 로드 또는 이동 중 발생한 오류.
    Navigation,
}

/// 실행 호스트가 돌려주는 원본 오류이다.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{message}")]
pub struct HostError {
    /// 오류 출처.
    pub kind: HostErrorKind,
    /// 호스트가 전달한 메시지.
    pub message: String,
    /// 호스트 고유 오류 코드.
    pub code: Option<i64>,
}

impl HostError {
    /// 스크립트 평가 오류를 생성한다.
    pub fn script(message: impl Into<String>) -> Self {
        Self {
            kind: HostErrorKind::Script,
            message: message.into(),
            code: None,
        }
    }

    /// 페이지 이동 오류를 생성한다.
    pub fn navigation(message: impl Into<String>) -> Self {
        Self {
            kind: HostErrorKind::Navigation,
            message: message.into(),
            code: None,
        }
    }

    /// 호스트 오류 코드를 덧붙인다.
    pub fn with_code(mut self, code: i64) -> Self {
        self.code = Some(code);
        self
    }
}

/// 파이프라인 실행 중 발생할 수 있는 오류 분류이다.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ScraperError {
    /// 스크립트 호출 인자를 리터럴로 바꿀 수 없는 경우이다.
    #[error("스크립트에 전달할 파라미터(인덱스 {index})를 직렬화할 수 없습니다: {reason}")]
    ParameterSerialization { index: usize, reason: String },
    /// 검증 스크립트가 true를 돌려주지 않은 경우이다.
    #[error("페이지 내용이 예상과 다릅니다.")]
    ContentUnexpected,
    /// 호스트가 스크립트 실행 오류를 보고한 경우이다.
    #[error("페이지 처리 중 JavaScript 오류가 발생했습니다: {0}")]
    Javascript(String),
    /// 페이지 로드가 실패한 경우이다.
    #[error("페이지 이동 중 문제가 발생했습니다.")]
    NavigationFailed(#[source] HostError),
    /// 존재하지 않는 Step 인덱스로 실행을 요청한 경우이다.
    #[error("잘못된 Step이 지정되었습니다: {index}")]
    IncorrectStep { index: usize },
    /// 조건 대기 중 제한 시간이 지난 경우이다.
    #[error("Step 완료를 기다리는 중 시간이 초과되었습니다.")]
    Timeout,
    /// 사용자 핸들러가 직접 실패를 지시한 경우이다.
    #[error("{0}")]
    Handler(Arc<anyhow::Error>),
}

impl ScraperError {
    /// 임의의 오류를 핸들러 실패로 감싼다.
    pub fn handler(err: impl Into<anyhow::Error>) -> Self {
        ScraperError::Handler(Arc::new(err.into()))
    }

    /// 두 오류가 같은 종류인지 비교한다. 내부 값은 보지 않는다.
    pub fn same_kind(&self, other: &ScraperError) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

impl From<HostError> for ScraperError {
    fn from(err: HostError) -> Self {
        match err.kind {
            HostErrorKind::Script => ScraperError::Javascript(err.message),
            HostErrorKind::Navigation => ScraperError::NavigationFailed(err),
        }
    }
}
