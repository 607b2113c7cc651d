use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use serde_json::{Map, Value};

/// Outputs captured during one suite run, keyed by case name.
///
/// Every pass of a run shares one context. Concurrent passes overwrite each
/// other's entries; the last writer wins.
#[derive(Debug, Default)]
pub struct DataContext {
    outputs: Mutex<BTreeMap<String, Value>>,
}

impl DataContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: String, output: Value) {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name, output);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Value> {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.outputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copies the current outputs into a JSON object for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Value {
        let outputs = self.outputs.lock().unwrap_or_else(PoisonError::into_inner);
        Value::Object(
            outputs
                .iter()
                .map(|(name, output)| (name.clone(), output.clone()))
                .collect::<Map<String, Value>>(),
        )
    }
}
