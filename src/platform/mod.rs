//! Platform layer
//!
//! Device input collection and, on wasm32, the browser bindings for the
//! canvas and HUD collaborators.

pub mod input;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use input::{InputAdapter, Key};
