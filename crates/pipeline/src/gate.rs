//! Access control for shared model handles.
//!
//! Reentrant models are called directly. Non-reentrant models are called
//! one at a time through an async mutex.

use std::future::Future;

use tokio::sync::Mutex;

#[derive(Debug)]
pub struct ModelGate {
    lock: Option<Mutex<()>>,
}

impl ModelGate {
    pub fn new(reentrant: bool) -> Self {
        Self {
            lock: (!reentrant).then(|| Mutex::new(())),
        }
    }

    pub fn is_serialized(&self) -> bool {
        self.lock.is_some()
    }

    /// Run `call`, holding the gate for its duration if the model is not
    /// reentrant.
    pub async fn run<F: Future>(&self, call: F) -> F::Output {
        match &self.lock {
            Some(lock) => {
                let _guard = lock.lock().await;
                call.await
            }
            None => call.await,
        }
    }
}
