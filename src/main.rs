use page_pipeline::scenario::{StepDefinition, load_scenario_from_file};
use page_pipeline::script::generate_call;
use page_pipeline::Step;
use std::path::PathBuf;

/// 시나리오 파일을 검증하고 실행 계획을 출력하는 진입점이다.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let Some(path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        anyhow::bail!("사용법: page-pipeline <scenario.yaml>");
    };
    let scenario = load_scenario_from_file(&path)?;
    let steps = scenario.build_steps()?;
    tracing::info!(name = %scenario.name, steps = steps.len(), "시나리오 검증 완료");

    println!("시나리오: {}", scenario.name);
    println!("네임스페이스: {}", scenario.namespace);
    println!("응답 채널: {}", scenario.reply_channel);
    if let Some(agent) = &scenario.custom_user_agent {
        println!("사용자 에이전트: {agent}");
    }
    for (index, (definition, step)) in scenario.steps.iter().zip(&steps).enumerate() {
        println!("[{index}] {}", step.describe());
        if let Some(call) = literal_call(&scenario.namespace, definition)? {
            println!("    호출식: {call}");
        }
    }
    Ok(())
}

/// 모델 키를 쓰지 않는 호출 Step이면 실제 호출식을 만든다.
fn literal_call(namespace: &str, definition: &StepDefinition) -> anyhow::Result<Option<String>> {
    let (function, params) = match definition {
        StepDefinition::PageChange {
            function,
            params,
            params_keys,
            ..
        }
        | StepDefinition::Script {
            function,
            params,
            params_keys,
            ..
        }
        | StepDefinition::AsyncScript {
            function,
            params,
            params_keys,
            ..
        } if params_keys.is_empty() => (function, params),
        _ => return Ok(None),
    };
    Ok(Some(generate_call(namespace, function, params)?))
}
