//! Scripted producers for refresh tests.
//!
//! A [`ScriptedProducer`] replays a fixed sequence of outcomes and then keeps
//! repeating the last one. Clones share the script and the call counter, so
//! a test can hand one clone to a watcher and inspect the other.
//!
//! # Examples
//!
//! ```
//! use test_helpers::producer::{ScriptedProducer, Step};
//!
//! let producer = ScriptedProducer::new([Step::Emit(1), Step::Fail("boom".into())]);
//! assert_eq!(producer.call().ok(), Some(1));
//! assert!(producer.call().is_err());
//! assert!(producer.call().is_err());
//! assert_eq!(producer.calls(), 3);
//! ```

use std::collections::VecDeque;
use std::error::Error;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;

/// One scripted outcome.
#[derive(Clone, Debug)]
pub enum Step<T> {
    /// Return the value.
    Emit(T),
    /// Fail with the message.
    Fail(String),
}

struct Script<T> {
    pending: VecDeque<Step<T>>,
    last: Option<Step<T>>,
}

/// Producer that replays scripted outcomes.
pub struct ScriptedProducer<T> {
    script: Arc<Mutex<Script<T>>>,
    calls: Arc<AtomicUsize>,
}

impl<T> Clone for ScriptedProducer<T> {
    fn clone(&self) -> Self {
        Self {
            script: Arc::clone(&self.script),
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T: Clone> ScriptedProducer<T> {
    /// Replay `steps` in order, then repeat the final step forever.
    pub fn new(steps: impl IntoIterator<Item = Step<T>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                pending: steps.into_iter().collect(),
                last: None,
            })),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Produce the next outcome.
    ///
    /// # Errors
    ///
    /// Returns the scripted failure, or a failure when the script was empty.
    pub fn call(&self) -> Result<T, Box<dyn Error + Send + Sync>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut script = self.script.lock();
            match script.pending.pop_front() {
                Some(step) => {
                    script.last = Some(step.clone());
                    step
                }
                None => script
                    .last
                    .clone()
                    .unwrap_or_else(|| Step::Fail("empty script".to_owned())),
            }
        };
        match step {
            Step::Emit(value) => Ok(value),
            Step::Fail(message) => Err(message.into()),
        }
    }

    /// Number of calls made so far, across all clones.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}
