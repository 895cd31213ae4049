//! Read-only host facts consumed by the engine.

use crate::ids::ActorId;

/// Opaque permission lookup provided by the host.
pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, actor: ActorId, permission: &str) -> bool;
}

/// Oracle for hosts without a permission system: nobody holds anything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoPermissions;

impl PermissionOracle for NoPermissions {
    fn has_permission(&self, _actor: ActorId, _permission: &str) -> bool {
        false
    }
}
