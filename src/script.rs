use crate::error::ScraperError;
use serde::Serialize;
use serde_json::Value;

/// `namespace.function(arg1,arg2,...)` 형태의 호출식을 생성한다.
///
/// # 인자
/// - `namespace`: 페이지에 주입된 스크립트 모듈 이름
/// - `function`: 호출할 함수 이름
/// - `params`: 순서대로 전달할 인자 목록
///
/// # 반환값
/// 모든 인자를 리터럴로 바꿀 수 있으면 호출식을 반환한다.
/// 하나라도 실패하면 호출식 없이 `ParameterSerialization` 오류를 반환한다.
pub fn generate_call<P: Serialize>(
    namespace: &str,
    function: &str,
    params: &[P],
) -> Result<String, ScraperError> {
    if params.is_empty() {
        return Ok(format!("{namespace}.{function}()"));
    }
    let args = params
        .iter()
        .enumerate()
        .map(|(index, param)| stringify_param(index, param))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(format!("{namespace}.{function}({})", args.join(",")))
}

/// 단일 인자를 호출식 리터럴로 변환한다.
fn stringify_param<P: Serialize>(index: usize, param: &P) -> Result<String, ScraperError> {
    let value = serde_json::to_value(param).map_err(|err| ScraperError::ParameterSerialization {
        index,
        reason: err.to_string(),
    })?;
    let literal = match value {
        // 문자열은 이스케이프 없이 큰따옴표로만 감싼다.
        Value::String(text) => format!("\"{text}\""),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::Null => "null".to_string(),
        nested @ (Value::Array(_) | Value::Object(_)) => serde_json::to_string(&nested)
            .map_err(|err| ScraperError::ParameterSerialization {
                index,
                reason: err.to_string(),
            })?,
    };
    Ok(literal)
}
