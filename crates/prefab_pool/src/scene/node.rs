//! Scene node data

use super::{NodeId, SpawnHooks, TemplateId};
use crate::foundation::math::Transform;

/// A single entity in the scene
///
/// Pure data; all structural changes (parenting, destruction) go through
/// [`Scene`](super::Scene) so parent and child links stay consistent.
pub struct Node {
    pub(super) name: String,
    pub(super) template: Option<TemplateId>,
    pub(super) transform: Transform,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
    pub(super) active: bool,
    pub(super) hooks: Option<Box<dyn SpawnHooks>>,
}

impl Node {
    pub(super) fn new(name: String) -> Self {
        Self {
            name,
            template: None,
            transform: Transform::identity(),
            parent: None,
            children: Vec::new(),
            active: true,
            hooks: None,
        }
    }

    /// Display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Template this node was instantiated from, if any
    pub fn template(&self) -> Option<TemplateId> {
        self.template
    }

    /// Transform relative to the parent
    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    /// Parent node, `None` for roots
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The node's own active flag, ignoring ancestors
    pub fn is_active_self(&self) -> bool {
        self.active
    }

    /// Whether the node carries a hook object
    pub fn has_hooks(&self) -> bool {
        self.hooks.is_some()
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("name", &self.name)
            .field("template", &self.template)
            .field("transform", &self.transform)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("active", &self.active)
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}
