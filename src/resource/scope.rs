//! Cancellation tied to a view's lifetime
//!
//! Every backend call a panel makes runs through its `ViewScope`. Closing the
//! scope, or dropping it with the view, aborts whatever is still in flight so
//! no late response lands in a view that no longer exists.

use futures::future::{AbortHandle, Abortable};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Returned by [`ViewScope::run`] when the scope closed first
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("View closed before the request finished")]
pub struct Aborted;

#[derive(Default)]
struct ScopeState {
    next_id: u64,
    in_flight: HashMap<u64, AbortHandle>,
    closed: bool,
}

fn lock(state: &Mutex<ScopeState>) -> MutexGuard<'_, ScopeState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn close(state: &Mutex<ScopeState>) {
    let mut state = lock(state);
    state.closed = true;
    for (_, handle) in state.in_flight.drain() {
        handle.abort();
    }
}

/// Owner of a view's in-flight requests
#[derive(Default)]
pub struct ViewScope {
    state: Arc<Mutex<ScopeState>>,
}

/// Handle that can close a scope from elsewhere (another task, a timer)
#[derive(Clone)]
pub struct ScopeHandle {
    state: Arc<Mutex<ScopeState>>,
}

impl ViewScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a future, aborting it if the scope closes before it completes
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, Aborted> {
        let (handle, registration) = AbortHandle::new_pair();
        let id = {
            let mut state = lock(&self.state);
            if state.closed {
                return Err(Aborted);
            }
            let id = state.next_id;
            state.next_id += 1;
            state.in_flight.insert(id, handle);
            id
        };

        let result = Abortable::new(future, registration).await;
        lock(&self.state).in_flight.remove(&id);
        result.map_err(|_| Aborted)
    }

    pub fn handle(&self) -> ScopeHandle {
        ScopeHandle {
            state: Arc::clone(&self.state),
        }
    }

    /// Abort everything in flight and refuse new work
    pub fn close(&self) {
        close(&self.state);
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }

    pub fn in_flight(&self) -> usize {
        lock(&self.state).in_flight.len()
    }
}

impl ScopeHandle {
    pub fn close(&self) {
        close(&self.state);
    }
}

impl Drop for ViewScope {
    fn drop(&mut self) {
        close(&self.state);
    }
}

impl std::fmt::Debug for ViewScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = lock(&self.state);
        f.debug_struct("ViewScope")
            .field("in_flight", &state.in_flight.len())
            .field("closed", &state.closed)
            .finish()
    }
}
