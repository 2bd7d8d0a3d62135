//! Pooling demo
//!
//! Simulates a short stretch of a shooter's frame loop: enemies spawn at the
//! edge of the arena, a turret fires bullets at them, and everything with an
//! expired lifetime is killed. Pool statistics are logged at the end.
//!
//! Usage: `pool_demo [pools.toml|pools.ron]`

use prefab_pool::foundation::logging;
use prefab_pool::prelude::*;
use rand::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

// Simulation constants
const FRAMES: u32 = 600;
const ENEMY_SPAWN_CHANCE: f64 = 0.05;
const BULLET_SPAWN_CHANCE: f64 = 0.4;
const SPARK_SPAWN_CHANCE: f64 = 0.01;
const ARENA_RADIUS: f32 = 25.0;

/// Counts activations across every enemy instance
struct EnemyBrain {
    activations: Rc<Cell<u64>>,
}

impl SpawnHooks for EnemyBrain {
    fn on_spawn(&mut self, node: NodeId) {
        self.activations.set(self.activations.get() + 1);
        log::trace!("Enemy {:?} woke up", node);
    }

    fn on_pre_disable(&mut self, node: NodeId) {
        log::trace!("Enemy {:?} going back to the pool", node);
    }
}

struct Spawned {
    node: NodeId,
    frames_left: u32,
}

fn default_config() -> PoolRegistryConfig {
    PoolRegistryConfig::new()
        .with_pool(PoolConfig::new("Enemy", 8))
        .with_pool(PoolConfig::new("Bullet", 32))
}

fn load_config() -> Result<PoolRegistryConfig, ConfigError> {
    match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading pool configuration from {}", path);
            PoolRegistryConfig::load_from_file(path)
        }
        None => {
            log::info!("No configuration file given, using built-in pools");
            Ok(default_config())
        }
    }
}

fn random_edge_point(rng: &mut impl Rng) -> Vec3 {
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    Vec3::new(angle.cos() * ARENA_RADIUS, 0.0, angle.sin() * ARENA_RADIUS)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_filter("info");
    log::info!("Starting pool demo");

    let activations = Rc::new(Cell::new(0));
    let brain_counter = Rc::clone(&activations);

    let mut library = TemplateLibrary::new();
    let enemy = library.register(TemplateDesc::new("Enemy").with_hooks(move || {
        Box::new(EnemyBrain {
            activations: Rc::clone(&brain_counter),
        })
    }));
    let bullet = library.register(TemplateDesc::new("Bullet").with_scale(Vec3::new(0.1, 0.1, 0.4)));
    // No pool is configured for sparks; they take the unmanaged path
    let spark = library.register(TemplateDesc::new("Spark"));

    let mut scene = Scene::new();
    let config = load_config()?;
    let mut registry = PoolRegistry::from_config(&config, &library, &mut scene)?;
    for template in library.iter().filter(|t| registry.pool(t.id()).is_none()) {
        log::info!("Template '{}' has no pool; its spawns are unmanaged", template.name());
    }

    let turret = scene.create_node("Turret");
    let muzzle = scene.create_node("Muzzle");
    scene.set_parent(muzzle, Some(turret));
    scene.set_local_position(muzzle, Vec3::new(0.0, 1.5, 0.0));

    let mut rng = thread_rng();
    let mut enemies: Vec<Spawned> = Vec::new();
    let mut bullets: Vec<Spawned> = Vec::new();

    for frame in 0..FRAMES {
        if rng.gen_bool(ENEMY_SPAWN_CHANCE) {
            let node = registry.spawn_looking_at(&mut scene, &enemy, random_edge_point(&mut rng), turret);
            enemies.push(Spawned {
                node,
                frames_left: rng.gen_range(60..240),
            });
        }

        if let Some(target) = enemies.choose(&mut rng).map(|e| e.node) {
            if rng.gen_bool(BULLET_SPAWN_CHANCE) {
                let origin = scene.world_position(muzzle).unwrap_or_else(Vec3::zeros);
                let node = registry.spawn(
                    &mut scene,
                    &bullet,
                    &SpawnParams::at(origin).looking_at(target),
                );
                bullets.push(Spawned {
                    node,
                    frames_left: rng.gen_range(10..40),
                });
            }
        }

        if rng.gen_bool(SPARK_SPAWN_CHANCE) {
            let node = registry.spawn_under(&mut scene, &spark, muzzle);
            registry.kill(&mut scene, Some(node), true);
        }

        for list in [&mut enemies, &mut bullets] {
            for spawned in list.iter_mut() {
                spawned.frames_left = spawned.frames_left.saturating_sub(1);
            }
            for expired in list.iter().filter(|s| s.frames_left == 0) {
                registry.despawn(&mut scene, expired.node);
            }
            list.retain(|s| s.frames_left > 0);
        }

        if frame % 100 == 0 {
            log::info!(
                "Frame {}: {} enemies, {} bullets alive, {} scene nodes",
                frame,
                enemies.len(),
                bullets.len(),
                scene.len()
            );
        }
    }

    for pool in registry.pools() {
        let stats = pool.stats();
        log::info!(
            "Pool '{}': {} instances ({} free, {} live), acquired {}, released {}, grew {}, peak {}",
            pool.template().name(),
            pool.total_instances(),
            pool.free_count(),
            pool.live_count(),
            stats.total_acquired,
            stats.total_released,
            stats.grown,
            stats.peak_live
        );
    }

    let stats = registry.stats();
    log::info!(
        "Registry: {} pooled / {} unmanaged spawns, {} pooled / {} unmanaged / {} ignored kills, {} warnings",
        stats.pooled_spawns,
        stats.unmanaged_spawns,
        stats.pooled_kills,
        stats.unmanaged_kills,
        stats.ignored_kills,
        stats.warnings
    );
    log::info!("Enemy hooks saw {} activations", activations.get());

    Ok(())
}
