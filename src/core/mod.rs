//! Core interfaces and types.

pub mod attrs;
pub mod callback;
pub mod clamp;
pub mod component;
pub mod node;
pub mod text;
