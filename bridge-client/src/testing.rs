//! In-memory bridge for tests
//!
//! `FakeBridge` answers reads from a table of canned values and records every
//! call it receives. It can be configured to delay, fail or never answer
//! individual reads, which is what exercises the error and ordering paths of
//! the layers above.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::{Bridge, BridgeError, LiveValue};

/// A request observed by [`FakeBridge`]
#[derive(Debug, Clone, PartialEq)]
pub enum BridgeCall {
    Get { path: String, property: String },
    Count { path: String, property: String },
    Set { path: String, property: String, value: LiveValue },
    Call { path: String, method: String },
}

type Key = (String, String);

fn key(path: &str, property: &str) -> Key {
    (path.to_string(), property.to_string())
}

/// Bridge double with canned replies
#[derive(Debug, Default)]
pub struct FakeBridge {
    values: HashMap<Key, LiveValue>,
    counts: HashMap<Key, i32>,
    failing: HashSet<Key>,
    hanging: HashSet<Key>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<BridgeCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `get(path, property)` with `value`
    pub fn with_value(mut self, path: &str, property: &str, value: impl Into<LiveValue>) -> Self {
        self.values.insert(key(path, property), value.into());
        self
    }

    /// Answer `count(path, property)` with `count`
    pub fn with_count(mut self, path: &str, property: &str, count: i32) -> Self {
        self.counts.insert(key(path, property), count);
        self
    }

    /// Make reads of `path`/`property` fail with a network error
    pub fn failing(mut self, path: &str, property: &str) -> Self {
        self.failing.insert(key(path, property));
        self
    }

    /// Make reads of `path`/`property` never complete
    pub fn hanging(mut self, path: &str, property: &str) -> Self {
        self.hanging.insert(key(path, property));
        self
    }

    /// Delay every read of objects at `path`
    pub fn with_delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    /// Every call received so far, in arrival order
    pub fn calls(&self) -> Vec<BridgeCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of reads that were in progress at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Number of calls of any kind received so far
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: BridgeCall) {
        self.calls.lock().unwrap().push(call);
    }

    async fn answer(
        &self,
        path: &str,
        property: &str,
        lookup: impl FnOnce(&Key) -> Option<LiveValue>,
    ) -> Result<LiveValue, BridgeError> {
        let _in_flight = InFlight::enter(self);
        let key = key(path, property);

        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        if self.hanging.contains(&key) {
            std::future::pending::<()>().await;
        }
        if self.failing.contains(&key) {
            return Err(BridgeError::Network(format!(
                "simulated failure reading {} {}",
                path, property
            )));
        }

        lookup(&key).ok_or_else(|| {
            BridgeError::Network(format!("no canned value for {} {}", path, property))
        })
    }
}

struct InFlight<'a> {
    bridge: &'a FakeBridge,
}

impl<'a> InFlight<'a> {
    fn enter(bridge: &'a FakeBridge) -> Self {
        let now = bridge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        bridge.max_in_flight.fetch_max(now, Ordering::SeqCst);
        Self { bridge }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.bridge.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Bridge for FakeBridge {
    async fn get(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError> {
        self.record(BridgeCall::Get {
            path: path.to_string(),
            property: property.to_string(),
        });
        self.answer(path, property, |key| self.values.get(key).cloned())
            .await
    }

    async fn count(&self, path: &str, property: &str) -> Result<LiveValue, BridgeError> {
        self.record(BridgeCall::Count {
            path: path.to_string(),
            property: property.to_string(),
        });
        self.answer(path, property, |key| {
            self.counts.get(key).map(|count| LiveValue::Int(*count))
        })
        .await
    }

    async fn set(&self, path: &str, property: &str, value: LiveValue) -> Result<(), BridgeError> {
        self.record(BridgeCall::Set {
            path: path.to_string(),
            property: property.to_string(),
            value,
        });
        Ok(())
    }

    async fn call(&self, path: &str, method: &str) -> Result<(), BridgeError> {
        self.record(BridgeCall::Call {
            path: path.to_string(),
            method: method.to_string(),
        });
        Ok(())
    }
}
