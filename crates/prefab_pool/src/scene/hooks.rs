//! Optional per-instance behaviour callbacks
//!
//! Instances may carry a hook object created from their template. Both
//! callbacks default to doing nothing, so an implementor only overrides the
//! ones it cares about and a node without hooks is simply skipped.

use super::NodeId;

/// Callbacks fired around pool activation
pub trait SpawnHooks {
    /// Called after the instance has been placed and activated
    fn on_spawn(&mut self, _node: NodeId) {}

    /// Called before the instance is hidden and handed back to its pool
    ///
    /// Release per-activation resources here.
    fn on_pre_disable(&mut self, _node: NodeId) {}
}
