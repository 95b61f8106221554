//! Persisted record of the last front/back/move-all-groups invocation.

use serde_json::Value;

use crate::database::kv_store::{StateStore, LAST_ACTION};
use crate::types::errors::StoreError;
use crate::types::memory::LastAction;

pub trait ToggleMemoryTrait {
    /// The stored record, or `None` when absent or unreadable.
    fn load(&self) -> Option<LastAction>;
    fn save(&self, action: &LastAction) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Toggle memory over any [`StateStore`].
pub struct ToggleMemory<'a> {
    store: &'a dyn StateStore,
}

impl<'a> ToggleMemory<'a> {
    pub fn new(store: &'a dyn StateStore) -> Self {
        Self { store }
    }
}

impl ToggleMemoryTrait for ToggleMemory<'_> {
    fn load(&self) -> Option<LastAction> {
        let value = match self.store.get(LAST_ACTION) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("could not read toggle memory: {}", e);
                return None;
            }
        };
        match serde_json::from_value::<LastAction>(value) {
            Ok(action) => Some(action),
            Err(e) => {
                log::warn!("dropping malformed toggle memory: {}", e);
                None
            }
        }
    }

    fn save(&self, action: &LastAction) -> Result<(), StoreError> {
        let value: Value = serde_json::to_value(action)?;
        self.store.set(LAST_ACTION, &value)
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.store.remove(LAST_ACTION)
    }
}
