//! Single-template instance pool
//!
//! A pool pre-creates instances of one template, keeps the inactive ones on a
//! stack and tracks the ones it has handed out.
//!
//! # Lifecycle
//!
//! ```text
//!  new() ──warm-up──▶ free store ──acquire()──▶ live set
//!                         ▲                        │
//!                         └──────release()─────────┘
//! ```
//!
//! - **Free store**: LIFO stack; the most recently released instance is
//!   handed out first.
//! - **Growth**: an empty free store never fails an acquire, a fresh instance
//!   is created instead and owned by the pool from then on.
//! - **Reset**: released instances are parked under the pool's container node
//!   with an identity local transform, so the next acquire starts from a known
//!   state.

use super::SpawnParams;
use crate::scene::{NodeId, Scene, Template};
use std::collections::HashSet;

/// Counters for monitoring a pool
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Instances handed out since creation
    pub total_acquired: u64,
    /// Instances taken back since creation
    pub total_released: u64,
    /// Instances created on demand because the free store was empty
    pub grown: u64,
    /// Highest live count observed
    pub peak_live: usize,
}

/// Reuse store for instances of one template
#[derive(Debug)]
pub struct Pool {
    template: Template,
    container: NodeId,
    free: Vec<NodeId>,
    live: HashSet<NodeId>,
    stats: PoolStats,
}

impl Pool {
    /// Create a pool and eagerly warm it up with `initial_size` instances
    ///
    /// Each warm-up instance is parked under the pool's container, reset to
    /// the neutral transform, given its pre-disable callback and deactivated.
    pub fn new(scene: &mut Scene, template: Template, initial_size: usize) -> Self {
        let container = scene.create_node(format!("Pool<{}>", template.name()));
        let mut pool = Self {
            template,
            container,
            free: Vec::with_capacity(initial_size),
            live: HashSet::with_capacity(initial_size),
            stats: PoolStats::default(),
        };

        for _ in 0..initial_size {
            let node = scene.instantiate(&pool.template);
            pool.park(scene, node);
            pool.free.push(node);
        }

        log::info!(
            "Created pool for '{}' with {} pre-allocated instances",
            pool.template.name(),
            initial_size
        );
        pool
    }

    /// Hand out an instance placed according to `params`
    ///
    /// Never fails: grows by one instance when the free store is empty.
    pub fn acquire(&mut self, scene: &mut Scene, params: &SpawnParams) -> NodeId {
        let node = match self.pop_free(scene) {
            Some(node) => node,
            None => {
                self.stats.grown += 1;
                log::debug!(
                    "Pool for '{}' is empty; growing to {} instances",
                    self.template.name(),
                    self.total_instances() + 1
                );
                scene.instantiate(&self.template)
            }
        };

        params.apply(scene, node, self.template.scale(), true);
        scene.set_active(node, true);
        self.live.insert(node);

        self.stats.total_acquired += 1;
        self.stats.peak_live = self.stats.peak_live.max(self.live.len());

        scene.invoke_on_spawn(node);
        log::trace!("Acquired {:?} from pool '{}'", node, self.template.name());
        node
    }

    /// Return an instance to the free store
    ///
    /// Returns `false` without touching the node when it is not in this
    /// pool's live set.
    pub fn release(&mut self, scene: &mut Scene, node: NodeId) -> bool {
        if !self.live.contains(&node) {
            return false;
        }
        if !scene.contains(node) {
            self.live.remove(&node);
            log::debug!(
                "Live instance {:?} of '{}' was destroyed outside the pool; forgetting it",
                node,
                self.template.name()
            );
            return false;
        }

        self.park(scene, node);
        self.free.push(node);
        self.live.remove(&node);
        self.stats.total_released += 1;

        log::trace!("Released {:?} back to pool '{}'", node, self.template.name());
        true
    }

    /// Drop free and live entries whose node no longer exists in the scene
    ///
    /// Needed after a subtree holding pooled instances (or the container
    /// itself) was destroyed outside the pool. Returns how many entries were
    /// dropped.
    pub fn forget_missing(&mut self, scene: &Scene) -> usize {
        let before = self.total_instances();
        self.free.retain(|&node| scene.contains(node));
        self.live.retain(|&node| scene.contains(node));

        let dropped = before - self.total_instances();
        if dropped > 0 {
            log::debug!(
                "Forgot {} instances of '{}' destroyed outside the pool",
                dropped,
                self.template.name()
            );
        }
        dropped
    }

    /// Whether `node` is currently handed out by this pool
    pub fn is_responsible_for(&self, node: NodeId) -> bool {
        self.live.contains(&node)
    }

    /// Pre-disable callback, container parent, neutral transform, inactive
    fn park(&self, scene: &mut Scene, node: NodeId) {
        scene.invoke_on_pre_disable(node);
        scene.set_parent(node, Some(self.container));
        scene.reset_local_transform(node);
        scene.set_active(node, false);
    }

    fn pop_free(&mut self, scene: &Scene) -> Option<NodeId> {
        while let Some(node) = self.free.pop() {
            if scene.contains(node) {
                return Some(node);
            }
            log::debug!(
                "Skipping pooled instance {:?} of '{}' destroyed outside the pool",
                node,
                self.template.name()
            );
        }
        None
    }

    /// Template this pool serves
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Node the inactive instances are parented to
    pub fn container(&self) -> NodeId {
        self.container
    }

    /// Inactive instances ready for reuse
    ///
    /// Exact as long as destroyed instances have been pruned with
    /// [`Pool::forget_missing`]; the registry does so after every destroy.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Instances currently handed out
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Free plus live instances
    pub fn total_instances(&self) -> usize {
        self.free.len() + self.live.len()
    }

    /// Whether `node` is waiting in the free store
    pub fn is_free(&self, node: NodeId) -> bool {
        self.free.contains(&node)
    }

    /// Monitoring counters
    pub fn stats(&self) -> PoolStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::HALF_PI, Quat, Transform, Vec3};
    use crate::scene::{SpawnHooks, TemplateDesc, TemplateLibrary};
    use approx::assert_relative_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn enemy() -> Template {
        TemplateLibrary::new().register(TemplateDesc::new("Enemy"))
    }

    #[test]
    fn test_warm_up_scenario() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 2);

        assert_eq!(pool.free_count(), 2);
        assert_eq!(pool.live_count(), 0);

        let node = pool.acquire(&mut scene, &SpawnParams::at(Vec3::new(1.0, 0.0, 0.0)));
        assert_relative_eq!(scene.world_position(node).unwrap(), Vec3::new(1.0, 0.0, 0.0));
        assert!(scene.is_active_self(node));
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.live_count(), 1);

        assert!(pool.release(&mut scene, node));
        assert_eq!(pool.free_count(), 2);
        assert_eq!(pool.live_count(), 0);
        assert_eq!(scene.local_transform(node).unwrap().position, Vec3::zeros());
        assert!(!scene.is_active_self(node));
    }

    #[test]
    fn test_warm_up_instances_parked() {
        let mut scene = Scene::new();
        let template = TemplateLibrary::new().register(TemplateDesc::new("Big").with_scale(Vec3::new(3.0, 3.0, 3.0)));
        let pool = Pool::new(&mut scene, template, 3);

        let container = scene.node(pool.container()).expect("Container exists");
        assert_eq!(container.children().len(), 3);
        for &child in container.children() {
            assert!(pool.is_free(child));
            assert!(!scene.is_active_self(child));
            assert_eq!(scene.local_transform(child), Some(Transform::identity()));
        }
    }

    #[test]
    fn test_lifo_reuse() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 0);
        let a = pool.acquire(&mut scene, &SpawnParams::default());
        let b = pool.acquire(&mut scene, &SpawnParams::default());

        pool.release(&mut scene, a);
        pool.release(&mut scene, b);

        assert_eq!(pool.acquire(&mut scene, &SpawnParams::default()), b);
        assert_eq!(pool.acquire(&mut scene, &SpawnParams::default()), a);
    }

    #[test]
    fn test_grows_past_initial_size() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 2);

        let handed_out: Vec<_> = (0..5)
            .map(|_| pool.acquire(&mut scene, &SpawnParams::default()))
            .collect();

        let unique: HashSet<_> = handed_out.iter().copied().collect();
        assert_eq!(unique.len(), 5);
        assert_eq!(pool.live_count(), 5);
        assert_eq!(pool.free_count(), 0);
        assert_eq!(pool.stats().grown, 3);

        for node in handed_out {
            assert!(pool.release(&mut scene, node));
        }
        assert_eq!(pool.free_count(), 5);
        assert_eq!(pool.stats().peak_live, 5);
    }

    #[test]
    fn test_release_twice_is_harmless() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 1);
        let node = pool.acquire(&mut scene, &SpawnParams::default());

        assert!(pool.release(&mut scene, node));
        assert!(!pool.release(&mut scene, node));
        assert_eq!(pool.free_count(), 1);
        assert_eq!(pool.total_instances(), 1);
    }

    #[test]
    fn test_never_tracked_twice() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 2);
        let mut held = Vec::new();

        for step in 0..12 {
            if step % 3 == 2 {
                if let Some(node) = held.pop() {
                    pool.release(&mut scene, node);
                }
            } else {
                held.push(pool.acquire(&mut scene, &SpawnParams::default()));
            }
            for (id, node) in scene.iter() {
                if node.template().is_some() {
                    assert!(!(pool.is_free(id) && pool.is_responsible_for(id)));
                }
            }
        }
    }

    #[test]
    fn test_release_resets_transform_and_parent() {
        let mut scene = Scene::new();
        let parent = scene.create_node("parent");
        let mut pool = Pool::new(&mut scene, enemy(), 1);
        let params = SpawnParams::new(
            Vec3::new(4.0, 5.0, 6.0),
            Quat::from_axis_angle(&Vec3::z_axis(), 1.0),
            Vec3::new(2.0, 0.5, 7.0),
        )
        .with_parent(parent);

        let node = pool.acquire(&mut scene, &params);
        scene.set_local_position(node, Vec3::new(-9.0, 9.0, 9.0));
        pool.release(&mut scene, node);

        assert_eq!(scene.local_transform(node), Some(Transform::identity()));
        assert_eq!(scene.node(node).unwrap().parent(), Some(pool.container()));
        assert!(scene.node(parent).unwrap().children().is_empty());
    }

    #[test]
    fn test_foreign_instance_not_released() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 1);
        let stranger = scene.create_node("stranger");

        assert!(!pool.is_responsible_for(stranger));
        assert!(!pool.release(&mut scene, stranger));
        assert!(scene.contains(stranger));
        assert_eq!(pool.free_count(), 1);
    }

    #[test]
    fn test_free_instances_are_not_responsible_for() {
        let mut scene = Scene::new();
        let pool = Pool::new(&mut scene, enemy(), 1);
        let parked = scene.node(pool.container()).unwrap().children()[0];

        assert!(!pool.is_responsible_for(parked));
    }

    #[test]
    fn test_local_placement_under_parent() {
        let mut scene = Scene::new();
        let parent = scene.create_node("turret");
        scene.set_local_position(parent, Vec3::new(10.0, 0.0, 0.0));
        scene.set_local_rotation(parent, Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI));
        let mut pool = Pool::new(&mut scene, enemy(), 1);

        let params = SpawnParams::at(Vec3::new(0.0, 0.0, 1.0))
            .with_parent(parent)
            .local_position(true)
            .local_rotation(true);
        let node = pool.acquire(&mut scene, &params);

        assert_eq!(scene.local_transform(node).unwrap().position, Vec3::new(0.0, 0.0, 1.0));
        // parent-local +Z is world +X after the quarter turn
        assert_relative_eq!(scene.world_position(node).unwrap(), Vec3::new(11.0, 0.0, 0.0), epsilon = 1e-5);
        assert_relative_eq!(
            scene.world_transform(node).unwrap().rotation.angle(),
            HALF_PI,
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_world_placement_under_parent() {
        let mut scene = Scene::new();
        let parent = scene.create_node("turret");
        scene.set_local_position(parent, Vec3::new(10.0, 0.0, 0.0));
        scene.set_local_rotation(parent, Quat::from_axis_angle(&Vec3::y_axis(), HALF_PI));
        let mut pool = Pool::new(&mut scene, enemy(), 1);

        let node = pool.acquire(&mut scene, &SpawnParams::at(Vec3::new(1.0, 2.0, 3.0)).with_parent(parent));

        let world = scene.world_transform(node).unwrap();
        assert_relative_eq!(world.position, Vec3::new(1.0, 2.0, 3.0), epsilon = 1e-5);
        assert_relative_eq!(world.rotation * Vec3::x(), Vec3::x(), epsilon = 1e-5);
    }

    #[test]
    fn test_missing_parent_spawns_root() {
        let mut scene = Scene::new();
        let parent = scene.create_node("gone");
        scene.destroy(parent);
        let mut pool = Pool::new(&mut scene, enemy(), 1);

        let node = pool.acquire(&mut scene, &SpawnParams::at(Vec3::new(2.0, 0.0, 0.0)).with_parent(parent));

        assert_eq!(scene.node(node).unwrap().parent(), None);
        assert_relative_eq!(scene.world_position(node).unwrap(), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_look_at_overrides_rotation() {
        let mut scene = Scene::new();
        let target = scene.create_node("player");
        scene.set_local_position(target, Vec3::new(0.0, 0.0, 20.0));
        let mut pool = Pool::new(&mut scene, enemy(), 1);

        let params = SpawnParams::at(Vec3::new(0.0, 0.0, 10.0))
            .with_rotation(Quat::from_axis_angle(&Vec3::y_axis(), 2.0))
            .looking_at(target);
        let node = pool.acquire(&mut scene, &params);

        let forward = scene.world_transform(node).unwrap().rotation * Vec3::z();
        assert_relative_eq!(forward, Vec3::new(0.0, 0.0, 1.0), epsilon = 1e-5);
    }

    #[test]
    fn test_coincident_look_at_uses_rotation() {
        let mut scene = Scene::new();
        let target = scene.create_node("player");
        scene.set_local_position(target, Vec3::new(0.0, 0.0, 10.0));
        let mut pool = Pool::new(&mut scene, enemy(), 1);
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), 1.0);

        let node = pool.acquire(
            &mut scene,
            &SpawnParams::at(Vec3::new(0.0, 0.0, 10.0)).with_rotation(rotation).looking_at(target),
        );

        let world = scene.world_transform(node).unwrap().rotation;
        assert_relative_eq!(world * Vec3::z(), rotation * Vec3::z(), epsilon = 1e-5);
    }

    #[test]
    fn test_nearby_look_at_target_is_faced() {
        let mut scene = Scene::new();
        let target = scene.create_node("player");
        scene.set_local_position(target, Vec3::new(3e-4, 0.0, 0.0));
        let mut pool = Pool::new(&mut scene, enemy(), 1);

        let node = pool.acquire(&mut scene, &SpawnParams::default().looking_at(target));

        let forward = scene.world_transform(node).unwrap().rotation * Vec3::z();
        assert_relative_eq!(forward, Vec3::new(1.0, 0.0, 0.0), epsilon = 1e-4);
    }

    #[test]
    fn test_scale_defaults_to_template() {
        let mut scene = Scene::new();
        let template = TemplateLibrary::new().register(TemplateDesc::new("Tall").with_scale(Vec3::new(1.0, 4.0, 1.0)));
        let mut pool = Pool::new(&mut scene, template, 1);

        let default_scaled = pool.acquire(&mut scene, &SpawnParams::default());
        let custom_scaled = pool.acquire(&mut scene, &SpawnParams::default().with_scale(Vec3::new(2.0, 3.0, 4.0)));

        assert_eq!(scene.local_transform(default_scaled).unwrap().scale, Vec3::new(1.0, 4.0, 1.0));
        assert_eq!(scene.local_transform(custom_scaled).unwrap().scale, Vec3::new(2.0, 3.0, 4.0));
    }

    #[derive(Clone, Default)]
    struct HookLog(Rc<RefCell<Vec<(&'static str, NodeId)>>>);

    impl SpawnHooks for HookLog {
        fn on_spawn(&mut self, node: NodeId) {
            self.0.borrow_mut().push(("spawn", node));
        }

        fn on_pre_disable(&mut self, node: NodeId) {
            self.0.borrow_mut().push(("pre_disable", node));
        }
    }

    #[test]
    fn test_hook_order() {
        let log = HookLog::default();
        let factory_log = log.clone();
        let template = TemplateLibrary::new()
            .register(TemplateDesc::new("Hooked").with_hooks(move || Box::new(factory_log.clone())));
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, template, 1);
        let parked = scene.node(pool.container()).unwrap().children()[0];

        let node = pool.acquire(&mut scene, &SpawnParams::default());
        pool.release(&mut scene, node);

        assert_eq!(node, parked);
        assert_eq!(
            *log.0.borrow(),
            vec![("pre_disable", node), ("spawn", node), ("pre_disable", node)]
        );
    }

    #[test]
    fn test_grown_instance_gets_spawn_hook_only() {
        let log = HookLog::default();
        let factory_log = log.clone();
        let template = TemplateLibrary::new()
            .register(TemplateDesc::new("Hooked").with_hooks(move || Box::new(factory_log.clone())));
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, template, 0);

        let node = pool.acquire(&mut scene, &SpawnParams::default());

        assert_eq!(*log.0.borrow(), vec![("spawn", node)]);
    }

    #[test]
    fn test_forget_missing_prunes_both_stores() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 2);
        let ship = scene.create_node("ship");
        let escort = pool.acquire(&mut scene, &SpawnParams::default().with_parent(ship));

        scene.destroy(ship);
        assert_eq!(pool.forget_missing(&scene), 1);
        assert!(!pool.is_responsible_for(escort));
        assert_eq!(pool.live_count(), 0);
        assert_eq!(pool.free_count(), 1);

        scene.destroy(pool.container());
        assert_eq!(pool.forget_missing(&scene), 1);
        assert_eq!(pool.total_instances(), 0);
        assert_eq!(pool.forget_missing(&scene), 0);
    }

    #[test]
    fn test_destroyed_free_instance_is_skipped() {
        let mut scene = Scene::new();
        let mut pool = Pool::new(&mut scene, enemy(), 2);
        let children = scene.node(pool.container()).unwrap().children().to_vec();
        scene.destroy(children[1]);

        let node = pool.acquire(&mut scene, &SpawnParams::default());

        assert_eq!(node, children[0]);
        assert_eq!(pool.free_count(), 0);
    }
}
