//! the autobrace passes without any IO

pub mod java;
pub mod opts;

use java::{Ast, EditLog, NodeId, RewriteResult};

/// Computes the edits that put every single-statement control body under
/// `root` into a block. The tree is only read; apply the result with
/// [java::apply_edits].
pub fn run(ast: &Ast, root: NodeId, wrap_enabled: bool) -> RewriteResult<EditLog> {
    let opts = opts::Opts {
        add_brackets: wrap_enabled,
    };
    java::add_brackets(ast, root, &opts)
}
