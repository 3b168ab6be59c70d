use page_pipeline::generate_call;
use proptest::prelude::*;
use serde_json::{Value, json};

/// 호출식에 안전하게 들어갈 수 있는 스칼라 값을 만든다.
fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-zA-Z0-9 _#.-]{0,16}".prop_map(Value::String),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1_000_000i32..1_000_000).prop_map(|n| json!(f64::from(n) / 100.0)),
        Just(Value::Null),
    ]
}

/// 스칼라와 한 단계 중첩된 배열, 객체를 섞어 만든다.
fn param_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        scalar_strategy(),
        prop::collection::vec(scalar_strategy(), 0..4).prop_map(Value::Array),
        prop::collection::btree_map("[a-z]{1,6}", scalar_strategy(), 0..4)
            .prop_map(|map| Value::Object(map.into_iter().collect())),
    ]
}

proptest! {
    /// 인자 부분을 JSON 배열로 다시 읽으면 원래 값이 순서대로 나온다.
    #[test]
    fn arguments_parse_back_to_original_values(params in prop::collection::vec(param_strategy(), 1..6)) {
        let script = generate_call("Search", "run", &params).unwrap();
        let args = script
            .strip_prefix("Search.run(")
            .and_then(|rest| rest.strip_suffix(')'))
            .expect("호출식 형태가 올바르지 않습니다.");
        let parsed: Vec<Value> = serde_json::from_str(&format!("[{args}]")).unwrap();
        prop_assert_eq!(parsed, params);
    }

    /// 함수 이름과 네임스페이스는 그대로 앞에 붙는다.
    #[test]
    fn empty_arguments_produce_bare_call(namespace in "[A-Z][a-zA-Z]{0,8}", function in "[a-z][a-zA-Z0-9]{0,8}") {
        let script = generate_call::<Value>(&namespace, &function, &[]).unwrap();
        prop_assert_eq!(script, format!("{namespace}.{function}()"));
    }
}
