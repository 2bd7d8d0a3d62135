//! Pool Registry
//!
//! Routes spawn and kill requests to the pool serving an instance's template.
//! Templates without a pool, and instances no pool owns, fall back to plain
//! instantiate/destroy with a warning so a misconfigured scene degrades
//! instead of failing.
//!
//! # Usage
//!
//! ```rust
//! use prefab_pool::prelude::*;
//!
//! let mut library = TemplateLibrary::new();
//! let enemy = library.register(TemplateDesc::new("Enemy"));
//! let mut scene = Scene::new();
//!
//! let config = PoolRegistryConfig::new().with_pool(PoolConfig::new("Enemy", 8));
//! let mut registry = PoolRegistry::from_config(&config, &library, &mut scene)?;
//!
//! let ship = registry.spawn_at(&mut scene, &enemy, Vec3::new(0.0, 0.0, 5.0));
//! registry.despawn(&mut scene, ship);
//! # Ok::<(), RegistryError>(())
//! ```

use super::{Pool, SpawnParams};
use crate::config::{Config, ConfigError, PoolRegistryConfig};
use crate::foundation::math::{Quat, Vec3};
use crate::scene::{NodeId, Scene, Template, TemplateId, TemplateLibrary};
use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A configured pool names a template the library does not know
    #[error("No template named '{0}' is registered")]
    UnknownTemplate(String),

    /// The configuration failed validation
    #[error("Invalid pool configuration: {0}")]
    Config(#[from] ConfigError),
}

/// Counters for monitoring registry traffic
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryStats {
    /// Spawns served by a pool
    pub pooled_spawns: u64,
    /// Spawns that fell back to plain instantiation
    pub unmanaged_spawns: u64,
    /// Kills that returned an instance to its pool
    pub pooled_kills: u64,
    /// Kills that destroyed an instance no pool owned
    pub unmanaged_kills: u64,
    /// Kills that did nothing (missing or already inactive instance)
    pub ignored_kills: u64,
    /// Diagnostic warnings emitted
    pub warnings: u64,
}

/// Template-to-pool routing table
#[derive(Debug, Default)]
pub struct PoolRegistry {
    pools: Vec<Pool>,
    index: HashMap<TemplateId, usize>,
    stats: RegistryStats,
}

impl PoolRegistry {
    /// Build the routing table from already constructed pools
    ///
    /// When two pools serve the same template the later one wins; the earlier
    /// pool is dropped and its instances stay in the scene untracked.
    pub fn init(pools: impl IntoIterator<Item = Pool>) -> Self {
        let mut registry = Self::default();

        for pool in pools {
            let id = pool.template().id();
            match registry.index.get(&id) {
                Some(&slot) => {
                    registry.warn(format_args!(
                        "Template '{}' has more than one pool; keeping the last one registered",
                        pool.template().name()
                    ));
                    registry.pools[slot] = pool;
                }
                None => {
                    registry.index.insert(id, registry.pools.len());
                    registry.pools.push(pool);
                }
            }
        }

        log::info!("Pool registry ready with {} pools", registry.pools.len());
        registry
    }

    /// Validate `config`, resolve its templates by name and build every pool
    pub fn from_config(
        config: &PoolRegistryConfig,
        library: &TemplateLibrary,
        scene: &mut Scene,
    ) -> Result<Self, RegistryError> {
        config.validate()?;

        let templates = config
            .pools
            .iter()
            .map(|entry| {
                library
                    .find(&entry.template)
                    .cloned()
                    .map(|template| (template, entry.initial_size))
                    .ok_or_else(|| RegistryError::UnknownTemplate(entry.template.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let pools: Vec<Pool> = templates
            .into_iter()
            .map(|(template, initial_size)| Pool::new(scene, template, initial_size))
            .collect();

        Ok(Self::init(pools))
    }

    /// Spawn an instance of `template` placed according to `params`
    ///
    /// Templates without a pool get a fresh, untracked instance; the look-at
    /// target is ignored on that path.
    pub fn spawn(&mut self, scene: &mut Scene, template: &Template, params: &SpawnParams) -> NodeId {
        if let Some(&slot) = self.index.get(&template.id()) {
            self.stats.pooled_spawns += 1;
            return self.pools[slot].acquire(scene, params);
        }

        self.warn(format_args!(
            "Spawning non-pooled template '{}'; it will be instantiated normally. Check the pool configuration",
            template.name()
        ));
        if params.look_at.is_some() {
            log::debug!("Look-at target ignored for non-pooled template '{}'", template.name());
        }

        let node = scene.instantiate(template);
        params.apply(scene, node, template.scale(), false);
        self.stats.unmanaged_spawns += 1;
        node
    }

    /// Return an instance to its pool, or destroy it if no pool owns it
    ///
    /// Missing instances are reported and ignored. Instances already inactive
    /// in the hierarchy are ignored silently, so killing twice is harmless.
    pub fn kill(&mut self, scene: &mut Scene, instance: Option<NodeId>, suppress_warning: bool) {
        let Some(node) = instance.filter(|&node| scene.contains(node)) else {
            self.forget_missing(scene);
            self.stats.ignored_kills += 1;
            self.warn(format_args!("Killing a missing instance {:?}", instance));
            return;
        };

        if !scene.is_active_in_hierarchy(node) {
            self.stats.ignored_kills += 1;
            return;
        }

        if let Some(pool) = self.pools.iter_mut().find(|pool| pool.is_responsible_for(node)) {
            pool.release(scene, node);
            self.stats.pooled_kills += 1;
            return;
        }

        if !suppress_warning {
            let name = scene.node(node).map(|n| n.name().to_string()).unwrap_or_default();
            self.warn(format_args!(
                "Killing non-pooled instance '{}' ({:?}); it will be destroyed normally. Check the pool configuration",
                name, node
            ));
        }
        scene.destroy(node);
        self.forget_missing(scene);
        self.stats.unmanaged_kills += 1;
    }

    /// Let every pool drop instances destroyed behind its back
    fn forget_missing(&mut self, scene: &Scene) {
        for pool in &mut self.pools {
            pool.forget_missing(scene);
        }
    }

    /// Spawn at the origin with the template's scale
    pub fn spawn_default(&mut self, scene: &mut Scene, template: &Template) -> NodeId {
        self.spawn(scene, template, &SpawnParams::default())
    }

    /// Spawn at a world position with the template's scale
    pub fn spawn_at(&mut self, scene: &mut Scene, template: &Template, position: Vec3) -> NodeId {
        self.spawn(scene, template, &SpawnParams::at(position))
    }

    /// Spawn at a world position facing `target`
    pub fn spawn_looking_at(
        &mut self,
        scene: &mut Scene,
        template: &Template,
        position: Vec3,
        target: NodeId,
    ) -> NodeId {
        self.spawn(scene, template, &SpawnParams::at(position).looking_at(target))
    }

    /// Spawn at the parent's local origin
    pub fn spawn_under(&mut self, scene: &mut Scene, template: &Template, parent: NodeId) -> NodeId {
        let params = SpawnParams::at(Vec3::zeros())
            .with_rotation(Quat::identity())
            .with_parent(parent)
            .local_position(true)
            .local_rotation(true);
        self.spawn(scene, template, &params)
    }

    /// Kill with warnings enabled
    pub fn despawn(&mut self, scene: &mut Scene, instance: NodeId) {
        self.kill(scene, Some(instance), false);
    }

    /// Pool serving a template
    pub fn pool(&self, template: TemplateId) -> Option<&Pool> {
        self.index.get(&template).map(|&slot| &self.pools[slot])
    }

    /// All pools in registration order
    pub fn pools(&self) -> impl Iterator<Item = &Pool> {
        self.pools.iter()
    }

    /// Number of pools
    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    /// Monitoring counters
    pub fn stats(&self) -> RegistryStats {
        self.stats
    }

    fn warn(&mut self, message: std::fmt::Arguments<'_>) {
        self.stats.warnings += 1;
        log::warn!("{}", message);
    }
}
