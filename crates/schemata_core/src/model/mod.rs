//! Schema/EAV domain model.
//!
//! # Responsibility
//! - Define the canonical schema nodes (classes), typed attributes
//!   (properties), ownership edges (relations) and instances (objects).
//! - Own name normalization rules shared by every registry.
//!
//! # Invariants
//! - Class and property ids are assigned by the store, never by callers.
//! - Object values are paired with properties by property id, not position.

pub mod data_class;
pub mod data_object;
pub mod data_property;
pub mod name;
pub mod relation;
pub mod type_catalog;
