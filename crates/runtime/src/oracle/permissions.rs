//! In-memory permission grants.

use std::collections::{HashMap, HashSet};

use ability_core::{ActorId, PermissionOracle};
use parking_lot::RwLock;

/// Thread-safe actor → permission set table.
#[derive(Debug, Default)]
pub struct PermissionTable {
    grants: RwLock<HashMap<ActorId, HashSet<String>>>,
}

impl PermissionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn grant(&self, actor: ActorId, permission: impl Into<String>) {
        self.grants
            .write()
            .entry(actor)
            .or_default()
            .insert(permission.into());
    }

    pub fn revoke(&self, actor: ActorId, permission: &str) {
        if let Some(held) = self.grants.write().get_mut(&actor) {
            held.remove(permission);
        }
    }

    pub fn clear(&self, actor: ActorId) {
        self.grants.write().remove(&actor);
    }
}

impl PermissionOracle for PermissionTable {
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool {
        self.grants
            .read()
            .get(&actor)
            .is_some_and(|held| held.contains(permission))
    }
}
