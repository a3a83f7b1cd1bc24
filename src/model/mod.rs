//! In-memory models for the conversion pipeline.
//!
//! The loader produces a [`Grid`], the transformer turns it into an
//! [`Element`] tree, and the renderer writes that tree as XML text.

mod element;
mod grid;

pub use element::*;
pub use grid::*;
