//! Placement parameters shared by pooled and unmanaged spawns

use crate::foundation::math::{Quat, Vec3};
use crate::scene::{NodeId, Scene};

/// Where and how a spawned instance is placed
///
/// Defaults to the world origin, identity rotation, the template's own scale
/// and no parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnParams {
    /// Target position, world or local per `use_local_position`
    pub position: Vec3,
    /// Target rotation, world or local per `use_local_rotation`
    pub rotation: Quat,
    /// Local scale; `None` keeps the template's default scale
    pub scale: Option<Vec3>,
    /// Parent to attach the instance to; `None` spawns a root
    pub parent: Option<NodeId>,
    /// Face this node after positioning, overriding `rotation`
    pub look_at: Option<NodeId>,
    /// Interpret `position` relative to the parent
    pub use_local_position: bool,
    /// Interpret `rotation` relative to the parent
    pub use_local_rotation: bool,
}

impl Default for SpawnParams {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: None,
            parent: None,
            look_at: None,
            use_local_position: false,
            use_local_rotation: false,
        }
    }
}

impl SpawnParams {
    /// Full world-space placement
    pub fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale: Some(scale),
            ..Default::default()
        }
    }

    /// World position only
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Builder pattern: set rotation
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: set local scale
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Builder pattern: attach to a parent
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder pattern: face a target node
    pub fn looking_at(mut self, target: NodeId) -> Self {
        self.look_at = Some(target);
        self
    }

    /// Builder pattern: treat position as parent-relative
    pub fn local_position(mut self, local: bool) -> Self {
        self.use_local_position = local;
        self
    }

    /// Builder pattern: treat rotation as parent-relative
    pub fn local_rotation(mut self, local: bool) -> Self {
        self.use_local_rotation = local;
        self
    }

    /// Parent, position, orientation, scale, in that order
    pub(crate) fn apply(&self, scene: &mut Scene, node: NodeId, default_scale: Vec3, honor_look_at: bool) {
        if !scene.set_parent(node, self.parent) {
            log::warn!(
                "Could not attach {:?} to parent {:?}; spawning it as a root instead",
                node,
                self.parent
            );
            scene.set_parent(node, None);
        }

        if self.use_local_position {
            scene.set_local_position(node, self.position);
        } else {
            scene.set_world_position(node, self.position);
        }

        // A missing or coincident target falls back to the explicit rotation
        let faced = honor_look_at && self.look_at.map_or(false, |target| scene.look_at(node, target));
        if !faced {
            if self.use_local_rotation {
                scene.set_local_rotation(node, self.rotation);
            } else {
                scene.set_world_rotation(node, self.rotation);
            }
        }

        scene.set_local_scale(node, self.scale.unwrap_or(default_scale));
    }
}
