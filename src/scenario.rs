use crate::engine::{
    AsyncScriptStep, DEFAULT_REPLY_CHANNEL, Model, OpenPageStep, PageChangeStep, ScriptStep,
    SharedStep, Step, StepFlow, WaitForConditionStep, WaitStep,
};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// StepDefinition은 YAML로 선언할 수 있는 Step 유형을 표현한다.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepDefinition {
    /// 페이지를 로드한다.
    OpenPage {
        /// 로드할 주소.
        path: String,
        /// 로드 후 검증 함수 이름.
        #[serde(default)]
        assertion: Option<String>,
    },
    /// 페이지 이동을 일으키는 함수를 호출한다.
    PageChange {
        /// 호출할 함수 이름.
        function: String,
        /// 고정 인자 목록.
        #[serde(default)]
        params: Vec<Value>,
        /// 모델에서 인자를 꺼낼 키 목록.
        #[serde(default)]
        params_keys: Vec<String>,
        /// 이동 후 검증 함수 이름.
        #[serde(default)]
        assertion: Option<String>,
    },
    /// 함수를 호출하고 반환값을 모델에 저장한다.
    Script {
        /// 호출할 함수 이름.
        function: String,
        /// 고정 인자 목록.
        #[serde(default)]
        params: Vec<Value>,
        /// 모델에서 인자를 꺼낼 키 목록.
        #[serde(default)]
        params_keys: Vec<String>,
        /// 응답을 저장할 모델 키.
        #[serde(default)]
        store_as: Option<String>,
    },
    /// 함수를 호출하고 메시지로 전달된 값을 모델에 저장한다.
    AsyncScript {
        /// 호출할 함수 이름.
        function: String,
        /// 고정 인자 목록.
        #[serde(default)]
        params: Vec<Value>,
        /// 모델에서 인자를 꺼낼 키 목록.
        #[serde(default)]
        params_keys: Vec<String>,
        /// 응답을 저장할 모델 키.
        #[serde(default)]
        store_as: Option<String>,
    },
    /// 고정 시간 대기한다.
    Wait {
        /// 대기 시간(초 단위).
        seconds: f64,
    },
    /// 조건 함수가 true가 될 때까지 기다린다.
    WaitForCondition {
        /// 조건 함수 이름.
        assertion: String,
        /// 제한 시간(초 단위).
        timeout_sec: f64,
        /// 확인 간격(밀리초 단위).
        #[serde(default)]
        poll_interval_ms: Option<u64>,
    },
}

/// PipelineScenario는 하나의 호스트에서 실행할 Step 묶음 정의다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineScenario {
    /// 시나리오 표시 이름.
    pub name: String,
    /// 호출식 앞에 붙일 스크립트 모듈 이름.
    pub namespace: String,
    /// 비동기 응답 메시지 채널 이름.
    #[serde(default = "default_reply_channel")]
    pub reply_channel: String,
    /// 호스트에 전달할 사용자 에이전트 문자열.
    #[serde(default)]
    pub custom_user_agent: Option<String>,
    /// Step 목록.
    pub steps: Vec<StepDefinition>,
}

impl PipelineScenario {
    /// 전체 Step 수를 반환한다.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Step 수가 비었는지 여부를 확인한다.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// 정의가 실행 가능한지 검사한다.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.namespace.trim().is_empty() {
            anyhow::bail!("namespace 값이 비어 있습니다.");
        }
        if self.reply_channel.trim().is_empty() {
            anyhow::bail!("reply_channel 값이 비어 있습니다.");
        }
        for (index, step) in self.steps.iter().enumerate() {
            step.validate()
                .with_context(|| format!("{index}번 Step 정의가 올바르지 않습니다."))?;
        }
        Ok(())
    }

    /// 정의를 실행 가능한 Step 목록으로 변환한다.
    pub fn build_steps(&self) -> anyhow::Result<Vec<SharedStep>> {
        self.steps
            .iter()
            .enumerate()
            .map(|(index, step)| {
                step.build()
                    .with_context(|| format!("{index}번 Step 생성 실패"))
            })
            .collect()
    }
}

impl StepDefinition {
    /// 개별 Step 정의를 검사한다.
    pub fn validate(&self) -> anyhow::Result<()> {
        match self {
            StepDefinition::OpenPage { path, assertion } => {
                require_name(path, "path")?;
                require_optional_name(assertion.as_deref(), "assertion")
            }
            StepDefinition::PageChange {
                function,
                assertion,
                ..
            } => {
                require_name(function, "function")?;
                require_optional_name(assertion.as_deref(), "assertion")
            }
            StepDefinition::Script {
                function, store_as, ..
            }
            | StepDefinition::AsyncScript {
                function, store_as, ..
            } => {
                require_name(function, "function")?;
                require_optional_name(store_as.as_deref(), "store_as")
            }
            StepDefinition::Wait { seconds } => parse_seconds(*seconds, "seconds").map(|_| ()),
            StepDefinition::WaitForCondition {
                assertion,
                timeout_sec,
                poll_interval_ms,
            } => {
                require_name(assertion, "assertion")?;
                parse_seconds(*timeout_sec, "timeout_sec")?;
                if *poll_interval_ms == Some(0) {
                    anyhow::bail!("poll_interval_ms 값은 0보다 커야 합니다.");
                }
                Ok(())
            }
        }
    }

    /// 정의로부터 Step을 생성한다.
    pub fn build(&self) -> anyhow::Result<SharedStep> {
        self.validate()?;
        let step = match self.clone() {
            StepDefinition::OpenPage { path, assertion } => {
                let step = OpenPageStep::new(path);
                match assertion {
                    Some(name) => shared(step.with_assertion(name)),
                    None => shared(step),
                }
            }
            StepDefinition::PageChange {
                function,
                params,
                params_keys,
                assertion,
            } => {
                let step = PageChangeStep::new(function)
                    .params(params)
                    .params_keys(params_keys);
                match assertion {
                    Some(name) => shared(step.with_assertion(name)),
                    None => shared(step),
                }
            }
            StepDefinition::Script {
                function,
                params,
                params_keys,
                store_as,
            } => shared(
                ScriptStep::new(function, store_response(store_as))
                    .params(params)
                    .params_keys(params_keys),
            ),
            StepDefinition::AsyncScript {
                function,
                params,
                params_keys,
                store_as,
            } => shared(
                AsyncScriptStep::new(function, store_response(store_as))
                    .params(params)
                    .params_keys(params_keys),
            ),
            StepDefinition::Wait { seconds } => {
                shared(WaitStep::new(parse_seconds(seconds, "seconds")?))
            }
            StepDefinition::WaitForCondition {
                assertion,
                timeout_sec,
                poll_interval_ms,
            } => {
                let step =
                    WaitForConditionStep::new(assertion, parse_seconds(timeout_sec, "timeout_sec")?);
                match poll_interval_ms {
                    Some(ms) => shared(step.with_poll_interval(Duration::from_millis(ms))),
                    None => shared(step),
                }
            }
        };
        Ok(step)
    }
}

/// 구체 Step을 공유 Step으로 감싼다.
fn shared<S: Step + 'static>(step: S) -> SharedStep {
    Arc::new(step)
}

/// 응답을 모델 키에 저장하고 진행하는 핸들러를 만든다.
fn store_response(
    store_as: Option<String>,
) -> impl Fn(Value, &mut Model) -> StepFlow + Send + Sync + 'static {
    move |response, model| {
        if let Some(key) = &store_as {
            model.insert(key.clone(), response);
        }
        StepFlow::Proceed
    }
}

fn require_name(value: &str, field: &str) -> anyhow::Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{field} 값이 비어 있습니다.");
    }
    Ok(())
}

fn require_optional_name(value: Option<&str>, field: &str) -> anyhow::Result<()> {
    match value {
        Some(value) => require_name(value, field),
        None => Ok(()),
    }
}

/// 초 단위 실수를 Duration으로 바꾼다. 음수와 비정상 값은 거부한다.
fn parse_seconds(seconds: f64, field: &str) -> anyhow::Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("{field} 값이 올바른 시간이 아닙니다: {seconds}"))
}

fn default_reply_channel() -> String {
    DEFAULT_REPLY_CHANNEL.to_string()
}

/// YAML 파일을 읽어 PipelineScenario로 역직렬화한다.
pub fn load_scenario_from_file(path: &Path) -> anyhow::Result<PipelineScenario> {
    let mut file = File::open(path)
        .with_context(|| format!("시나리오 파일을 열 수 없습니다: {}", path.display()))?;
    load_scenario_from_reader(&mut file)
}

/// Reader에서 YAML을 읽어 PipelineScenario 구조체로 파싱하고 검증한다.
pub fn load_scenario_from_reader<R: Read>(reader: &mut R) -> anyhow::Result<PipelineScenario> {
    let mut buf = String::new();
    reader.read_to_string(&mut buf)?;
    let scenario: PipelineScenario = serde_yaml::from_str(&buf)?;
    scenario.validate()?;
    Ok(scenario)
}
