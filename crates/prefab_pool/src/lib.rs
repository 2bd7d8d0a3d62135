//! # Prefab Pool
//!
//! Entity pooling for per-frame game loops: pre-instantiate scene nodes from
//! a template, hand them out on spawn and park them again on kill instead of
//! creating and destroying them every frame.
//!
//! ## Features
//!
//! - **Pools**: LIFO reuse with eager warm-up and on-demand growth
//! - **Registry**: template-to-pool routing with unmanaged fallback
//! - **Scene**: minimal node hierarchy with local/world transforms
//! - **Config**: pool layouts loaded from TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut library = TemplateLibrary::new();
//! let bullet = library.register(TemplateDesc::new("Bullet"));
//!
//! let mut scene = Scene::new();
//! let pool = Pool::new(&mut scene, bullet.clone(), 16);
//! let mut registry = PoolRegistry::init([pool]);
//!
//! let shot = registry.spawn_at(&mut scene, &bullet, Vec3::new(0.0, 1.0, 0.0));
//! assert!(scene.is_active_self(shot));
//!
//! registry.despawn(&mut scene, shot);
//! assert!(!scene.is_active_self(shot));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::must_use_candidate)]

pub mod config;
pub mod foundation;
pub mod pool;
pub mod scene;

/// Common imports for pool users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, PoolConfig, PoolRegistryConfig},
        foundation::math::{Quat, Transform, Vec3},
        pool::{Pool, PoolRegistry, PoolStats, RegistryError, RegistryStats, SpawnParams},
        scene::{NodeId, Scene, SpawnHooks, Template, TemplateDesc, TemplateId, TemplateLibrary},
    };
}
