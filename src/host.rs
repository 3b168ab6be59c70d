use crate::error::HostError;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// ExecutionHost는 페이지 렌더링 및 스크립트 실행 환경에 대한 추상 계층을 정의한다.
///
/// 실제 웹뷰, 헤드리스 브라우저, 테스트용 가짜 호스트가 이 트레이트를 구현한다.
/// 비동기 메시지 응답은 호스트의 메시지 핸들러가 [`crate::ReplyBridge::deliver`]로 전달한다.
#[async_trait]
pub trait ExecutionHost: Send + Sync {
    /// 지정한 주소의 페이지를 로드하고 로드 완료까지 기다린다.
    async fn load(&self, path: &str) -> Result<(), HostError>;

    /// 호출식을 평가하고 반환값을 돌려준다. 반환값이 없으면 `Value::Null`이다.
    async fn evaluate(&self, script: &str) -> Result<Value, HostError>;

    /// 페이지 이동을 일으키는 호출식을 평가하고 새 페이지 로드 완료까지 기다린다.
    ///
    /// 스크립트 자체가 실패하면 스크립트 오류를, 이동이 실패하면 이동 오류를 반환한다.
    async fn evaluate_navigation(&self, script: &str) -> Result<(), HostError>;
}

/// ExecutionHost를 공유하기 위한 Arc 타입 별칭이다.
pub type SharedHost = Arc<dyn ExecutionHost>;
