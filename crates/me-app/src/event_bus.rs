//! Onboarding event bus
//!
//! Synchronous publish/subscribe for [`OnboardingEvent`]s with a bounded
//! history. The bus is an explicitly constructed value shared through `Arc`;
//! there is no process-wide instance.
//!
//! 同步事件总线：按注册顺序投递，单个监听器 panic 不影响其它监听器。

use std::collections::{HashMap, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use me_core::onboarding::{OnboardingEvent, OnboardingEventKind};
use tokio::sync::oneshot;
use tracing::{debug, error};

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// 代表一个事件监听器的ID，用于后续取消监听
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler = Arc<dyn Fn(&OnboardingEvent) + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBusError {
    #[error("timed out after {timeout_ms}ms waiting for '{kind}'")]
    Timeout {
        kind: OnboardingEventKind,
        timeout_ms: u128,
    },

    /// The waiting registration was removed (e.g. by `clear_all`) before any event arrived.
    #[error("listener for '{0}' was removed before an event arrived")]
    Closed(OnboardingEventKind),
}

struct Listener {
    id: ListenerId,
    once: bool,
    handler: Handler,
}

struct BusState {
    listeners: HashMap<OnboardingEventKind, Vec<Listener>>,
    history: VecDeque<OnboardingEvent>,
    next_listener_id: u64,
}

struct BusShared {
    state: Mutex<BusState>,
    history_capacity: usize,
}

impl BusShared {
    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn remove(&self, id: ListenerId) -> bool {
        let mut state = self.lock();
        let mut found = false;
        for listeners in state.listeners.values_mut() {
            let before = listeners.len();
            listeners.retain(|listener| listener.id != id);
            found |= listeners.len() < before;
        }
        found
    }
}

/// Handle returned by [`EventBus::on`]; removes exactly its own registration.
#[must_use = "dropping a Subscription keeps the handler registered"]
pub struct Subscription {
    id: ListenerId,
    bus: Weak<BusShared>,
}

impl Subscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Returns `false` when the registration was already gone.
    pub fn unsubscribe(self) -> bool {
        match self.bus.upgrade() {
            Some(bus) => bus.remove(self.id),
            None => false,
        }
    }
}

/// 事件总线系统的核心结构
#[derive(Clone)]
pub struct EventBus {
    shared: Arc<BusShared>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_history_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// A capacity of 0 disables history (and with it `wait_for` replay).
    pub fn with_history_capacity(history_capacity: usize) -> Self {
        Self {
            shared: Arc::new(BusShared {
                state: Mutex::new(BusState {
                    listeners: HashMap::new(),
                    history: VecDeque::with_capacity(history_capacity),
                    next_listener_id: 0,
                }),
                history_capacity,
            }),
        }
    }

    /// Register a handler for every event of `kind`.
    pub fn on<F>(&self, kind: OnboardingEventKind, handler: F) -> Subscription
    where
        F: Fn(&OnboardingEvent) + Send + Sync + 'static,
    {
        let id = self.register(kind, false, Arc::new(handler));
        Subscription {
            id,
            bus: Arc::downgrade(&self.shared),
        }
    }

    /// Register a handler that is removed after its first delivery.
    pub fn once<F>(&self, kind: OnboardingEventKind, handler: F) -> ListenerId
    where
        F: Fn(&OnboardingEvent) + Send + Sync + 'static,
    {
        self.register(kind, true, Arc::new(handler))
    }

    /// Remove a registration by id.
    pub fn off(&self, id: ListenerId) -> bool {
        self.shared.remove(id)
    }

    fn register(&self, kind: OnboardingEventKind, once: bool, handler: Handler) -> ListenerId {
        let mut state = self.shared.lock();
        Self::register_locked(&mut state, kind, once, handler)
    }

    fn register_locked(
        state: &mut BusState,
        kind: OnboardingEventKind,
        once: bool,
        handler: Handler,
    ) -> ListenerId {
        let id = ListenerId(state.next_listener_id);
        state.next_listener_id += 1;
        state
            .listeners
            .entry(kind)
            .or_default()
            .push(Listener { id, once, handler });
        id
    }

    /// Deliver an event to the handlers registered for its kind, in
    /// registration order. Never fails; a panicking handler is logged and
    /// skipped.
    pub fn emit(&self, event: OnboardingEvent) {
        let kind = event.kind();
        let handlers: Vec<Handler> = {
            let mut state = self.shared.lock();
            if self.shared.history_capacity > 0 {
                while state.history.len() >= self.shared.history_capacity {
                    state.history.pop_front();
                }
                state.history.push_back(event.clone());
            }

            match state.listeners.get_mut(&kind) {
                Some(listeners) => {
                    let handlers = listeners.iter().map(|l| Arc::clone(&l.handler)).collect();
                    // One-shot listeners leave before delivery so a re-entrant
                    // emit from a handler cannot reach them twice.
                    listeners.retain(|listener| !listener.once);
                    handlers
                }
                None => Vec::new(),
            }
        };

        debug!(event = %kind, listeners = handlers.len(), "emitting onboarding event");

        for handler in handlers {
            let delivered = catch_unwind(AssertUnwindSafe(|| handler(&event)));
            if delivered.is_err() {
                error!(event = %kind, "onboarding event handler panicked");
            }
        }
    }

    pub fn emit_batch<I>(&self, events: I)
    where
        I: IntoIterator<Item = OnboardingEvent>,
    {
        for event in events {
            self.emit(event);
        }
    }

    /// Resolve with the most recent `kind` event in history, or else with the
    /// next one emitted. Fails with [`EventBusError::Timeout`] after `timeout`.
    pub async fn wait_for(
        &self,
        kind: OnboardingEventKind,
        timeout: Duration,
    ) -> Result<OnboardingEvent, EventBusError> {
        self.wait(kind, timeout, true).await
    }

    /// Like [`EventBus::wait_for`] but ignores history.
    pub async fn wait_for_next(
        &self,
        kind: OnboardingEventKind,
        timeout: Duration,
    ) -> Result<OnboardingEvent, EventBusError> {
        self.wait(kind, timeout, false).await
    }

    async fn wait(
        &self,
        kind: OnboardingEventKind,
        timeout: Duration,
        replay: bool,
    ) -> Result<OnboardingEvent, EventBusError> {
        let (id, rx) = {
            let mut state = self.shared.lock();
            if replay {
                if let Some(event) = state.history.iter().rev().find(|e| e.kind() == kind) {
                    return Ok(event.clone());
                }
            }

            let (tx, rx) = oneshot::channel();
            let tx = Mutex::new(Some(tx));
            let handler: Handler = Arc::new(move |event: &OnboardingEvent| {
                let sender = tx.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some(sender) = sender {
                    let _ = sender.send(event.clone());
                }
            });
            (Self::register_locked(&mut state, kind, true, handler), rx)
        };

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(event)) => Ok(event),
            Ok(Err(_)) => Err(EventBusError::Closed(kind)),
            Err(_) => {
                self.off(id);
                Err(EventBusError::Timeout {
                    kind,
                    timeout_ms: timeout.as_millis(),
                })
            }
        }
    }

    /// Recorded events, oldest first, optionally filtered by kind.
    pub fn history(&self, kind: Option<OnboardingEventKind>) -> Vec<OnboardingEvent> {
        let state = self.shared.lock();
        state
            .history
            .iter()
            .filter(|event| kind.map_or(true, |k| event.kind() == k))
            .cloned()
            .collect()
    }

    pub fn clear_history(&self) {
        self.shared.lock().history.clear();
    }

    /// Remove every listener of one kind.
    pub fn clear(&self, kind: OnboardingEventKind) {
        self.shared.lock().listeners.remove(&kind);
    }

    /// Remove every listener of every kind. History is kept.
    pub fn clear_all(&self) {
        self.shared.lock().listeners.clear();
    }

    pub fn listener_count(&self, kind: OnboardingEventKind) -> usize {
        self.shared
            .lock()
            .listeners
            .get(&kind)
            .map_or(0, Vec::len)
    }
}
