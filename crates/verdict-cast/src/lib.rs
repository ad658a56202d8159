//! # Verdict Cast
//!
//! Conversion between untyped wire payloads and [`verdict_core::Outcome`].

pub mod wire;

pub use wire::{from_wire, from_wire_str, to_wire, to_wire_string};

/// Prelude module for common imports.
pub mod prelude {
    pub use crate::wire::{from_wire, from_wire_str, to_wire, to_wire_string};
    pub use verdict_core::prelude::*;
}
