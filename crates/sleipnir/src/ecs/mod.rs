//! # A Small Closed-Set ECS
//!
//! The registry is deliberately simple: an arena of entities indexed by id,
//! each holding a fixed table of optional components.
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic entity ids
//! - [`component`] — The closed [`Component`] enum and per-entity table
//! - [`world`] — Central container (entities + components + deferred commands)
//! - [`hierarchy`] — Parent/child links and transform propagation
//! - [`system`] — System trait and schedule runner

pub mod component;
pub mod entity;
pub mod hierarchy;
pub mod system;
pub mod world;

pub use component::{Bundle, Component, ComponentKind, ComponentType, Components, Material, Name};
pub use entity::Entity;
pub use hierarchy::{Children, Parent, TransformPropagation, propagate_transforms};
pub use system::{Schedule, System};
pub use world::World;
