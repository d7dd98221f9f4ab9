use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::models::sync_model::SyncDirection;

type RunKey = (String, SyncDirection);

/// Corridas activas por (user_id, dirección), solo dentro de este proceso.
#[derive(Clone, Debug, Default)]
pub struct RunRegistry {
    active: Arc<Mutex<HashSet<RunKey>>>,
}

/// Mientras viva, la dirección queda ocupada para ese usuario.
#[derive(Debug)]
pub struct RunGuard {
    registry: RunRegistry,
    key: RunKey,
}

impl RunRegistry {
    pub fn try_acquire(&self, user_id: &str, direction: SyncDirection) -> Option<RunGuard> {
        let key = (user_id.to_string(), direction);
        let mut active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        if !active.insert(key.clone()) {
            return None;
        }
        Some(RunGuard {
            registry: self.clone(),
            key,
        })
    }

    pub fn is_running(&self, user_id: &str, direction: SyncDirection) -> bool {
        let active = self.active.lock().unwrap_or_else(|p| p.into_inner());
        active.contains(&(user_id.to_string(), direction))
    }
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        let mut active = self
            .registry
            .active
            .lock()
            .unwrap_or_else(|p| p.into_inner());
        active.remove(&self.key);
    }
}
