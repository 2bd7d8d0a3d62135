//! Node store with parent/child links
//!
//! Nodes live in a slot map so ids stay stable and stale ids are detected
//! after destruction. World transforms are computed on demand by walking the
//! parent chain; there is no cached global transform to keep in sync.

use super::{Node, Template};
use crate::foundation::math::{look_rotation, Quat, Transform, Vec3};
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle identifying a node in a [`Scene`]
    pub struct NodeId;
}

/// Hierarchy of nodes that pools create instances in
#[derive(Debug, Default)]
pub struct Scene {
    nodes: SlotMap<NodeId, Node>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty, active root node at the origin
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        self.nodes.insert(Node::new(name.into()))
    }

    /// Create an active root node from a template
    pub fn instantiate(&mut self, template: &Template) -> NodeId {
        let mut node = Node::new(template.name().to_string());
        node.template = Some(template.id());
        node.transform.scale = template.scale();
        node.hooks = template.make_hooks();

        let id = self.nodes.insert(node);
        log::trace!("Instantiated {:?} from template '{}'", id, template.name());
        id
    }

    /// Remove a node and all of its descendants
    ///
    /// Returns `false` if the node does not exist.
    pub fn destroy(&mut self, id: NodeId) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        self.detach(id);

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(current) {
                stack.extend(node.children);
            }
        }
        true
    }

    /// Whether the id refers to a live node
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Borrow a node
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the scene has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over all nodes
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter()
    }

    /// Re-parent a node, keeping its local transform
    ///
    /// `None` makes the node a root. Rejects dangling ids, self-parenting and
    /// anything that would create a cycle.
    pub fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) -> bool {
        if !self.nodes.contains_key(id) {
            return false;
        }
        if let Some(parent_id) = parent {
            if !self.nodes.contains_key(parent_id) || self.is_ancestor_or_self(id, parent_id) {
                return false;
            }
        }

        self.detach(id);
        if let Some(parent_id) = parent {
            self.nodes[parent_id].children.push(id);
        }
        self.nodes[id].parent = parent;
        true
    }

    fn detach(&mut self, id: NodeId) {
        let Some(old_parent) = self.nodes.get(id).and_then(|node| node.parent) else {
            return;
        };
        if let Some(parent) = self.nodes.get_mut(old_parent) {
            parent.children.retain(|&child| child != id);
        }
        self.nodes[id].parent = None;
    }

    /// Whether `ancestor` is `node` itself or somewhere above it
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes.get(id).and_then(|n| n.parent);
        }
        false
    }

    /// Set the node's own active flag
    pub fn set_active(&mut self, id: NodeId, active: bool) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                node.active = active;
                true
            }
            None => false,
        }
    }

    /// The node's own active flag; `false` for missing nodes
    pub fn is_active_self(&self, id: NodeId) -> bool {
        self.nodes.get(id).map_or(false, |node| node.active)
    }

    /// Active and every ancestor active; `false` for missing nodes
    pub fn is_active_in_hierarchy(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.nodes.get(node_id) {
                Some(node) if node.active => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Transform relative to the parent
    pub fn local_transform(&self, id: NodeId) -> Option<Transform> {
        self.nodes.get(id).map(|node| node.transform)
    }

    /// Set position relative to the parent
    pub fn set_local_position(&mut self, id: NodeId, position: Vec3) -> bool {
        self.with_transform(id, |t| t.position = position)
    }

    /// Set rotation relative to the parent
    pub fn set_local_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        self.with_transform(id, |t| t.rotation = rotation)
    }

    /// Set scale relative to the parent
    pub fn set_local_scale(&mut self, id: NodeId, scale: Vec3) -> bool {
        self.with_transform(id, |t| t.scale = scale)
    }

    /// Zero position, identity rotation, unit scale
    pub fn reset_local_transform(&mut self, id: NodeId) -> bool {
        self.with_transform(id, |t| *t = Transform::identity())
    }

    fn with_transform(&mut self, id: NodeId, f: impl FnOnce(&mut Transform)) -> bool {
        match self.nodes.get_mut(id) {
            Some(node) => {
                f(&mut node.transform);
                true
            }
            None => false,
        }
    }

    /// Transform in world space, composed through every ancestor
    pub fn world_transform(&self, id: NodeId) -> Option<Transform> {
        let node = self.nodes.get(id)?;
        let local = node.transform;
        Some(match node.parent {
            Some(parent) => self.parent_world(Some(parent)).combine(&local),
            None => local,
        })
    }

    fn parent_world(&self, parent: Option<NodeId>) -> Transform {
        parent
            .and_then(|p| self.world_transform(p))
            .unwrap_or_default()
    }

    /// Position in world space
    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_transform(id).map(|t| t.position)
    }

    /// Move the node so its world position equals `position`
    pub fn set_world_position(&mut self, id: NodeId, position: Vec3) -> bool {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent) else {
            return false;
        };
        let local = self.parent_world(parent).inverse_transform_point(position);
        self.set_local_position(id, local)
    }

    /// Rotate the node so its world rotation equals `rotation`
    pub fn set_world_rotation(&mut self, id: NodeId, rotation: Quat) -> bool {
        let Some(parent) = self.nodes.get(id).map(|node| node.parent) else {
            return false;
        };
        let local = self.parent_world(parent).rotation.inverse() * rotation;
        self.set_local_rotation(id, local)
    }

    /// Rotate the node so its local +Z axis faces the target's world position
    ///
    /// World +Y is kept as up. Returns `false` and leaves the rotation
    /// untouched when either node is missing or the two positions coincide.
    pub fn look_at(&mut self, id: NodeId, target: NodeId) -> bool {
        let (Some(from), Some(to)) = (self.world_position(id), self.world_position(target)) else {
            return false;
        };
        match look_rotation(to - from, Vec3::y()) {
            Some(rotation) => self.set_world_rotation(id, rotation),
            None => false,
        }
    }

    /// Fire the node's spawn hook, if it has one
    pub fn invoke_on_spawn(&mut self, id: NodeId) {
        if let Some(hooks) = self.nodes.get_mut(id).and_then(|node| node.hooks.as_mut()) {
            hooks.on_spawn(id);
        }
    }

    /// Fire the node's pre-disable hook, if it has one
    pub fn invoke_on_pre_disable(&mut self, id: NodeId) {
        if let Some(hooks) = self.nodes.get_mut(id).and_then(|node| node.hooks.as_mut()) {
            hooks.on_pre_disable(id);
        }
    }
}
