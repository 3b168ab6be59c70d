#![allow(dead_code)]

use async_trait::async_trait;
use page_pipeline::engine::DEFAULT_REPLY_CHANNEL;
use page_pipeline::{ExecutionHost, HostError, ReplyBridge, RunnerState, StepRunner};
use serde_json::Value;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 테스트에서 사용하는 스크립트 모듈 이름이다.
pub const NAMESPACE: &str = "StepRunnerTests";

/// 함수 이름별로 가짜 호스트가 보일 반응이다.
#[derive(Clone, Debug)]
pub enum Behavior {
    /// 고정 값을 반환한다.
    Return(Value),
    /// 순서대로 값을 반환하고 마지막 값을 반복한다.
    Sequence(Vec<Value>),
    /// 스크립트 오류를 보고한다.
    Fail(String),
    /// `Null`을 반환하고 잠시 뒤 메시지로 값을 전달한다.
    PostMessage(Value),
    /// 호출이 끝나기 전에 메시지로 값을 전달하고 `Null`을 반환한다.
    PostMessageDuringCall(Value),
    /// 페이지 이동 스크립트로 동작하며 지정한 주소로 이동한다.
    Navigate(String),
    /// 스크립트는 성공하지만 이어지는 페이지 이동이 실패한다.
    NavigateFail(String),
}

/// 호출을 기록하고 미리 정한 반응을 돌려주는 메모리 호스트이다.
#[derive(Default)]
pub struct FakeHost {
    behaviors: Mutex<HashMap<String, Behavior>>,
    sequences: Mutex<HashMap<String, VecDeque<Value>>>,
    failing_paths: Mutex<HashSet<String>>,
    bridge: Mutex<Option<ReplyBridge>>,
    /// 평가된 호출식 목록.
    pub scripts: Mutex<Vec<String>>,
    /// 로드된 주소 목록.
    pub loads: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, function: &str, behavior: Behavior) {
        if let Behavior::Sequence(values) = &behavior {
            self.sequences
                .lock()
                .unwrap()
                .insert(function.to_string(), values.iter().cloned().collect());
        }
        self.behaviors
            .lock()
            .unwrap()
            .insert(function.to_string(), behavior);
    }

    pub fn fail_load(&self, path: &str) {
        self.failing_paths.lock().unwrap().insert(path.to_string());
    }

    pub fn attach(&self, bridge: ReplyBridge) {
        *self.bridge.lock().unwrap() = Some(bridge);
    }

    pub fn scripts(&self) -> Vec<String> {
        self.scripts.lock().unwrap().clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.loads.lock().unwrap().clone()
    }

    pub fn called(&self, function: &str) -> usize {
        self.scripts()
            .iter()
            .filter(|script| function_name(script) == function)
            .count()
    }

    fn respond(&self, script: &str) -> Result<Value, HostError> {
        self.scripts.lock().unwrap().push(script.to_string());
        let function = function_name(script);
        let behavior = self.behaviors.lock().unwrap().get(&function).cloned();
        match behavior {
            Some(Behavior::Return(value)) => Ok(value),
            Some(Behavior::Sequence(_)) => {
                let mut sequences = self.sequences.lock().unwrap();
                let queue = sequences.get_mut(&function).expect("sequence registered");
                let value = if queue.len() > 1 {
                    queue.pop_front().unwrap()
                } else {
                    queue.front().cloned().unwrap_or(Value::Null)
                };
                Ok(value)
            }
            Some(Behavior::Fail(message)) => Err(HostError::script(message)),
            Some(Behavior::PostMessage(value)) => {
                let bridge = self.bridge.lock().unwrap().clone();
                if let Some(bridge) = bridge {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        bridge.deliver(DEFAULT_REPLY_CHANNEL, value);
                    });
                }
                Ok(Value::Null)
            }
            Some(Behavior::PostMessageDuringCall(value)) => {
                let bridge = self.bridge.lock().unwrap().clone();
                if let Some(bridge) = bridge {
                    assert!(bridge.deliver(DEFAULT_REPLY_CHANNEL, value));
                }
                Ok(Value::Null)
            }
            Some(Behavior::Navigate(_) | Behavior::NavigateFail(_)) => Ok(Value::Null),
            None => Err(HostError::script(format!(
                "TypeError: {NAMESPACE}.{function} is not a function"
            ))),
        }
    }
}

#[async_trait]
impl ExecutionHost for FakeHost {
    async fn load(&self, path: &str) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        self.loads.lock().unwrap().push(path.to_string());
        if self.failing_paths.lock().unwrap().contains(path) {
            return Err(HostError::navigation("A server with the specified hostname could not be found.").with_code(-1003));
        }
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<Value, HostError> {
        tokio::task::yield_now().await;
        self.respond(script)
    }

    async fn evaluate_navigation(&self, script: &str) -> Result<(), HostError> {
        tokio::task::yield_now().await;
        self.respond(script)?;
        let function = function_name(script);
        let target = match self.behaviors.lock().unwrap().get(&function) {
            Some(Behavior::Navigate(target)) => target.clone(),
            Some(Behavior::NavigateFail(message)) => {
                return Err(HostError::navigation(message.clone()).with_code(-1001));
            }
            _ => return Ok(()),
        };
        self.loads.lock().unwrap().push(target);
        Ok(())
    }
}

/// `Namespace.function(args)`에서 함수 이름을 꺼낸다.
pub fn function_name(script: &str) -> String {
    script
        .split_once('.')
        .and_then(|(_, rest)| rest.split_once('('))
        .map(|(name, _)| name.to_string())
        .unwrap_or_default()
}

/// 관찰된 상태 목록을 공유하는 러너를 만든다.
pub fn make_runner(
    host: &Arc<FakeHost>,
    steps: Vec<page_pipeline::SharedStep>,
) -> (StepRunner, Arc<Mutex<Vec<RunnerState>>>) {
    let mut runner = StepRunner::new(host.clone(), NAMESPACE, steps);
    host.attach(runner.reply_bridge());
    let states = Arc::new(Mutex::new(Vec::new()));
    let sink = states.clone();
    runner.add_observer(move |state| sink.lock().unwrap().push(state.clone()));
    (runner, states)
}

/// 기본 페이지와 검증 함수를 등록한 호스트를 만든다.
pub fn host_with_page1() -> Arc<FakeHost> {
    let host = FakeHost::new();
    host.on("assertPage1Title", Behavior::Return(Value::Bool(true)));
    host.on("assertPage2Title", Behavior::Return(Value::Bool(false)));
    host
}

pub const PAGE1: &str = "file:///fixtures/page1.html";
