//! Scripted mutation runner for queue tests
//!
//! Records every call, tracks how many calls overlap, and can hold each call
//! until the test releases it, which lets tests queue requests while a
//! mutation is "on the network".

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Semaphore;
use xfsocial::client::toggle::MutationRunner;

type Respond<S> = Box<dyn Fn(usize, &S, bool) -> Result<S, String> + Send + Sync>;

/// Runner whose responses are computed by a closure `(call index, previous, desired)`
pub struct ScriptedRunner<S> {
    calls: Mutex<Vec<(S, bool)>>,
    gate: Option<Semaphore>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    respond: Respond<S>,
}

impl<S> ScriptedRunner<S>
where
    S: Clone + Send + 'static,
{
    /// Runner that completes every call after one yield
    pub fn new(
        respond: impl Fn(usize, &S, bool) -> Result<S, String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            gate: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            respond: Box::new(respond),
        })
    }

    /// Runner that holds every call until [`ScriptedRunner::release`]
    pub fn gated(
        respond: impl Fn(usize, &S, bool) -> Result<S, String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            gate: Some(Semaphore::new(0)),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            respond: Box::new(respond),
        })
    }

    /// Let `count` held calls complete
    pub fn release(&self, count: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(count);
        }
    }

    pub fn calls(&self) -> Vec<(S, bool)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Yield until at least `count` calls have started
    pub async fn wait_for_calls(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < count {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("runner was not called in time");
    }

    /// Adapt into a queue runner
    pub fn runner(self: &Arc<Self>) -> impl MutationRunner<S> {
        let this = Arc::clone(self);
        move |previous: S, desired: bool| {
            let this = Arc::clone(&this);
            async move { this.invoke(previous, desired).await }
        }
    }

    async fn invoke(&self, previous: S, desired: bool) -> Result<S, String> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((previous.clone(), desired));
            calls.len() - 1
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        match &self.gate {
            Some(gate) => gate.acquire().await.expect("gate closed").forget(),
            None => tokio::task::yield_now().await,
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        (self.respond)(index, &previous, desired)
    }
}

/// Record URI style response: `Some("uri-<n>")` when on, `None` when off
pub fn uri_response(index: usize, _previous: &Option<String>, desired: bool) -> Result<Option<String>, String> {
    Ok(desired.then(|| format!("uri-{}", index + 1)))
}

/// Collects every state passed to `on_success`
#[derive(Clone, Default)]
pub struct SuccessLog<S> {
    states: Arc<Mutex<Vec<S>>>,
}

impl<S> SuccessLog<S>
where
    S: Clone + Send + 'static,
{
    pub fn new() -> Self {
        Self {
            states: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn callback(&self) -> impl Fn(&S) + Send + Sync + 'static {
        let states = Arc::clone(&self.states);
        move |state: &S| states.lock().unwrap().push(state.clone())
    }

    pub fn states(&self) -> Vec<S> {
        self.states.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.states.lock().unwrap().len()
    }
}
