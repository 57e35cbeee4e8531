//! Syntax tree of a parsed Elm module, as handed over by the parser.
//!
//! The tree is immutable once built. Analyses borrow it and never rewrite it.

mod span;
pub mod surface;

pub use span::{Position, Span};
pub use surface::*;
