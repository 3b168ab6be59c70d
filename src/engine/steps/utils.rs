use super::super::context::{Model, values_for_keys};
use serde_json::Value;

/// 호출할 함수 이름과 인자 결정 방식을 묶는다.
///
/// `params_keys`가 비어 있지 않으면 `params` 대신 모델에서 값을 꺼내 사용한다.
#[derive(Debug, Clone, Default)]
pub struct ScriptCall {
    /// 네임스페이스를 제외한 함수 이름.
    pub function: String,
    /// 고정 인자 목록.
    pub params: Vec<Value>,
    /// 모델에서 인자를 꺼낼 키 목록.
    pub params_keys: Vec<String>,
}

impl ScriptCall {
    /// 인자 없는 호출을 만든다.
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            ..Self::default()
        }
    }

    /// 현재 모델 기준으로 실제 인자 목록을 결정한다.
    pub fn resolve_params(&self, model: &Model) -> Vec<Value> {
        if self.params_keys.is_empty() {
            self.params.clone()
        } else {
            values_for_keys(model, &self.params_keys)
        }
    }

    /// 실행 계획 출력용 설명을 만든다.
    pub(super) fn describe(&self) -> String {
        if self.params_keys.is_empty() {
            let args: Vec<String> = self.params.iter().map(Value::to_string).collect();
            format!("{}({})", self.function, args.join(", "))
        } else {
            format!("{}(model[{}])", self.function, self.params_keys.join(", "))
        }
    }
}
