use super::context::Model;
use super::reply_bridge::ReplyBridge;
use super::session::HostSession;
use super::state::RunnerState;
use super::steps::{SharedStep, Step, StepFlow};
use crate::error::ScraperError;
use crate::host::SharedHost;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// 상태가 바뀔 때마다 호출되는 관찰자이다.
pub type StateObserver = Box<dyn FnMut(&RunnerState) + Send>;

/// 실행이 종료 상태에 도달했을 때 한 번 호출되는 콜백이다.
pub type CompletionHandler = Box<dyn FnOnce(&RunnerState, &Model) + Send>;

/// 등록된 상태 수신자이다.
enum Listener {
    Callback(StateObserver),
    Channel(UnboundedSender<RunnerState>),
}

impl Listener {
    /// 상태를 전달하고, 수신 측이 사라졌으면 `false`를 반환한다.
    fn notify(&mut self, state: &RunnerState) -> bool {
        match self {
            Self::Callback(observer) => {
                observer(state);
                true
            }
            Self::Channel(tx) => tx.send(state.clone()).is_ok(),
        }
    }
}

/// Step 목록을 순서대로 실행하는 상태 기계이다.
///
/// 한 번에 하나의 Step만 실행하며, 각 Step이 돌려준 결과에 따라
/// 진행, 이동, 종료를 결정한다. 상태 변화는 등록 순서대로 관찰자에게 전달된다.
pub struct StepRunner {
    /// Step들이 공유하는 호스트 접근 창구.
    session: HostSession,
    /// 현재 Step 목록.
    steps: Vec<SharedStep>,
    /// 다음에 실행할 Step 인덱스.
    index: usize,
    /// Step 간 공유 모델.
    model: Model,
    /// 현재 상태.
    state: RunnerState,
    /// 상태 관찰자와 구독 채널, 등록 순서대로 보관한다.
    listeners: Vec<Listener>,
    /// 이번 실행의 종료 콜백.
    completion: Option<CompletionHandler>,
}

impl StepRunner {
    /// 호스트와 네임스페이스, Step 목록으로 러너를 만든다.
    pub fn new(host: SharedHost, namespace: impl Into<String>, steps: Vec<SharedStep>) -> Self {
        Self::with_session(HostSession::new(host, namespace), steps)
    }

    /// 이미 구성된 세션으로 러너를 만든다.
    pub fn with_session(session: HostSession, steps: Vec<SharedStep>) -> Self {
        Self {
            session,
            steps,
            index: 0,
            model: Model::new(),
            state: RunnerState::NotStarted,
            listeners: Vec::new(),
            completion: None,
        }
    }

    /// 현재 상태를 반환한다.
    pub fn state(&self) -> &RunnerState {
        &self.state
    }

    /// 현재 모델을 반환한다.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// 호스트 세션을 반환한다.
    pub fn session(&self) -> &HostSession {
        &self.session
    }

    /// 호스트 메시지 핸들러에 연결할 응답 브리지를 반환한다.
    pub fn reply_bridge(&self) -> ReplyBridge {
        self.session.reply_bridge().clone()
    }

    /// 상태 관찰자를 등록한다.
    pub fn add_observer<F>(&mut self, observer: F)
    where
        F: FnMut(&RunnerState) + Send + 'static,
    {
        self.listeners.push(Listener::Callback(Box::new(observer)));
    }

    /// 상태 변화를 채널로 받는 관찰자를 등록한다.
    ///
    /// 수신 측을 버리면 다음 상태 변화 때 등록이 해제된다.
    pub fn subscribe(&mut self) -> UnboundedReceiver<RunnerState> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.push(Listener::Channel(tx));
        rx
    }

    /// 현재 등록된 관찰자 수를 반환한다.
    pub fn observer_count(&self) -> usize {
        self.listeners.len()
    }

    /// 다음 종료 시 한 번 호출될 콜백을 등록한다.
    pub fn on_complete<F>(&mut self, completion: F)
    where
        F: FnOnce(&RunnerState, &Model) + Send + 'static,
    {
        self.completion = Some(Box::new(completion));
    }

    /// 종료 콜백을 등록하고 실행한다.
    pub async fn run_with_completion<F>(&mut self, completion: F) -> RunnerState
    where
        F: FnOnce(&RunnerState, &Model) + Send + 'static,
    {
        self.on_complete(completion);
        self.run().await
    }

    /// 기존 호스트와 모델을 유지한 채 새 Step 목록을 처음부터 실행한다.
    pub async fn run_steps(&mut self, steps: Vec<SharedStep>) -> RunnerState {
        if self.state != RunnerState::NotStarted {
            self.set_state(RunnerState::NotStarted);
        }
        self.steps = steps;
        self.index = 0;
        self.run().await
    }

    /// 현재 커서부터 Step을 실행하고 종료 상태를 반환한다.
    ///
    /// 이미 종료된 러너는 Step을 다시 실행하지 않고 `IncorrectStep`으로 실패한다.
    /// 다시 시작하려면 [`StepRunner::run_steps`]를 사용한다.
    pub async fn run(&mut self) -> RunnerState {
        if self.state.is_terminal() {
            warn!(index = self.index, state = ?self.state, "종료된 러너에 실행 요청");
            self.set_state(RunnerState::Failure(ScraperError::IncorrectStep {
                index: self.index,
            }));
            return self.state.clone();
        }
        loop {
            let Some(step) = self.steps.get(self.index).cloned() else {
                warn!(
                    index = self.index,
                    len = self.steps.len(),
                    "범위를 벗어난 Step 실행 요청"
                );
                self.set_state(RunnerState::Failure(ScraperError::IncorrectStep {
                    index: self.index,
                }));
                break;
            };
            self.set_state(RunnerState::InProgress(self.index));
            debug!(index = self.index, step = %step.describe(), "Step 시작");
            let outcome = step.run(&self.session, self.model.clone()).await;
            let (flow, model) = outcome.into_parts();
            self.model = model;
            match flow {
                StepFlow::Proceed => {
                    self.index += 1;
                    if self.index >= self.steps.len() {
                        self.set_state(RunnerState::Success);
                        break;
                    }
                }
                StepFlow::JumpToStep(target) => {
                    debug!(from = self.index, to = target, "Step 이동");
                    self.index = target;
                }
                StepFlow::Finish => {
                    self.set_state(RunnerState::Success);
                    break;
                }
                StepFlow::Failure(err) => {
                    warn!(index = self.index, error = %err, "Step 실패");
                    self.set_state(RunnerState::Failure(err));
                    break;
                }
            }
        }
        self.state.clone()
    }

    /// 상태를 바꾸고 관찰자와 종료 콜백에 알린다.
    fn set_state(&mut self, state: RunnerState) {
        self.state = state;
        let state = &self.state;
        self.listeners.retain_mut(|listener| listener.notify(state));
        if self.state.is_terminal() {
            info!(state = ?self.state, "파이프라인 종료");
            if let Some(completion) = self.completion.take() {
                completion(&self.state, &self.model);
            }
        }
    }
}

impl Drop for StepRunner {
    fn drop(&mut self) {
        // 정리된 러너로 늦은 메시지가 전달되지 않도록 슬롯을 비운다.
        self.session.reply_bridge().clear();
    }
}
