//! Applying an [EditLog]: the host's half of a rewrite.

use super::add_brackets::add_brackets;
use super::rewriter::{EditLog, RewriteError, RewriteResult};
use super::syntax::*;
use crate::opts::Opts;

/// Builds the tree that `log` describes, in a fresh arena. Every node that
/// has a pending replacement is swapped for it, including nodes inside other
/// replacements. The order of the edits does not matter.
///
/// Returns the new arena and the id of the new root.
pub fn apply_edits(ast: &Ast, root: NodeId, log: &EditLog) -> RewriteResult<(Ast, NodeId)> {
    let view = log.view(ast);
    let mut out = Ast::new();
    let root = rebuild(&view, log, root, &mut out)?;
    Ok((out, root))
}

fn rebuild(view: &Layered, log: &EditLog, id: NodeId, out: &mut Ast) -> RewriteResult<NodeId> {
    let id = log.replacement_for(id).unwrap_or(id);
    let node = view.node(id).ok_or(RewriteError::DanglingNode(id))?;
    let node = node.try_map_children(&mut |child| rebuild(view, log, child, out))?;
    Ok(out.alloc(node))
}

/// Runs the bracket pass and applies its edits.
pub fn normalize(ast: &Ast, root: NodeId, opts: &Opts) -> RewriteResult<(Ast, NodeId)> {
    let log = add_brackets(ast, root, opts)?;
    apply_edits(ast, root, &log)
}
