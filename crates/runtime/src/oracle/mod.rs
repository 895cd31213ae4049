//! Runtime implementations of the host fact oracles.
//!
//! Real hosts implement [`ability_core::PermissionOracle`] against their own
//! permission system; the in-memory table here backs tests, replays, and
//! hosts that manage grants themselves.
mod permissions;

pub use permissions::PermissionTable;
