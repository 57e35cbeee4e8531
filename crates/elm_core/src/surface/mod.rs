mod ast;
mod spans;

pub use ast::*;
