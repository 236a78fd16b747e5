//! A toolkit for rewriting Java-like syntax trees: an arena-based AST, a
//! walker, deferred edits, and the passes built on them.

mod add_brackets;
mod apply;
pub mod constructors;
mod pretty_ast;
mod rewriter;
pub mod syntax;
pub mod walk;

pub use add_brackets::add_brackets;
pub use apply::{apply_edits, normalize};
pub use pretty_ast::{printed, to_pretty, Printed, DEFAULT_WIDTH};
pub use rewriter::{Edit, EditLog, RewriteError, RewriteResult, Rewriter};
pub use syntax::*;
pub use walk::*;
