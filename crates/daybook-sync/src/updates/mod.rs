//! Patch types for entity mutations.
//!
//! A patch carries `Option` fields; only `Some` fields are applied, each
//! through the entity's validating setter.

pub mod task;

pub use task::{TaskPatch, TaskPatchBuilder};
