use serde_json::{Map, Value};

/// Step 간 데이터를 주고받는 모델이다. 각 Step은 복사본을 받아 수정한 뒤 돌려준다.
pub type Model = Map<String, Value>;

/// 모델에서 키 목록에 해당하는 값을 순서대로 꺼낸다. 없는 키는 `null`이 된다.
pub(crate) fn values_for_keys(model: &Model, keys: &[String]) -> Vec<Value> {
    keys.iter()
        .map(|key| model.get(key).cloned().unwrap_or(Value::Null))
        .collect()
}
