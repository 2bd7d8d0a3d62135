//! Entity templates
//!
//! A template is the blueprint instances are created from. Identity is the
//! [`TemplateId`] handed out by the [`TemplateLibrary`]; two templates with
//! the same name and scale registered twice are still two templates.

use super::SpawnHooks;
use crate::foundation::math::Vec3;
use slotmap::{new_key_type, SlotMap};
use std::collections::HashMap;
use std::rc::Rc;

new_key_type! {
    /// Handle identifying a registered template
    pub struct TemplateId;
}

/// Creates a fresh hook object for every instance of a template
pub type HookFactory = Rc<dyn Fn() -> Box<dyn SpawnHooks>>;

/// Description of a template before registration
#[derive(Clone)]
pub struct TemplateDesc {
    name: String,
    scale: Vec3,
    hooks: Option<HookFactory>,
}

impl TemplateDesc {
    /// Create a description with unit scale and no hooks
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            hooks: None,
        }
    }

    /// Builder pattern: set the default local scale of new instances
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: attach a hook factory
    pub fn with_hooks<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn SpawnHooks> + 'static,
    {
        self.hooks = Some(Rc::new(factory));
        self
    }
}

/// A registered template
///
/// Cheap to clone; clones share the hook factory and compare equal only when
/// their ids match.
#[derive(Clone)]
pub struct Template {
    id: TemplateId,
    name: String,
    scale: Vec3,
    hooks: Option<HookFactory>,
}

impl Template {
    /// Identity handle
    pub fn id(&self) -> TemplateId {
        self.id
    }

    /// Display name, also used to resolve config entries
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Default local scale of new instances
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Build the hook object for a new instance
    pub fn make_hooks(&self) -> Option<Box<dyn SpawnHooks>> {
        self.hooks.as_ref().map(|factory| factory())
    }
}

impl PartialEq for Template {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Template {}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("scale", &self.scale)
            .field("has_hooks", &self.hooks.is_some())
            .finish()
    }
}

/// Owner of every registered template
#[derive(Default)]
pub struct TemplateLibrary {
    templates: SlotMap<TemplateId, Template>,
    by_name: HashMap<String, TemplateId>,
}

impl TemplateLibrary {
    /// Create an empty library
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template and return it
    ///
    /// Name lookups resolve to the most recent registration of a name.
    pub fn register(&mut self, desc: TemplateDesc) -> Template {
        let TemplateDesc { name, scale, hooks } = desc;
        let id = self.templates.insert_with_key(|id| Template {
            id,
            name: name.clone(),
            scale,
            hooks,
        });

        if let Some(previous) = self.by_name.insert(name.clone(), id) {
            log::warn!(
                "Template name '{}' registered again; name lookups now resolve to {:?} instead of {:?}",
                name,
                id,
                previous
            );
        }

        self.templates[id].clone()
    }

    /// Look up a template by name
    pub fn find(&self, name: &str) -> Option<&Template> {
        self.by_name.get(name).and_then(|id| self.templates.get(*id))
    }

    /// Number of registered templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether no template has been registered
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Iterate over all templates
    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.values()
    }
}
