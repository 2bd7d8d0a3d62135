//! Scene substrate
//!
//! The minimal entity model the pools operate on:
//!
//! ```text
//! TemplateLibrary ──register──▶ Template ──instantiate──▶ Scene (NodeId)
//!                                                          ├── parent / children
//!                                                          ├── local transform
//!                                                          ├── active flag
//!                                                          └── optional SpawnHooks
//! ```

mod hooks;
mod node;
mod scene_graph;
mod template;

pub use hooks::SpawnHooks;
pub use node::Node;
pub use scene_graph::{NodeId, Scene};
pub use template::{HookFactory, Template, TemplateDesc, TemplateId, TemplateLibrary};
