//! Object pooling
//!
//! [`Pool`] keeps pre-created instances of one template and hands them out
//! again instead of creating and destroying nodes every frame.
//! [`PoolRegistry`] maps templates to their pools and routes spawn/kill
//! requests, falling back to unmanaged instantiate/destroy for anything no
//! pool covers.

mod object_pool;
mod registry;
mod spawn_params;

pub use object_pool::{Pool, PoolStats};
pub use registry::{PoolRegistry, RegistryError, RegistryStats};
pub use spawn_params::SpawnParams;
