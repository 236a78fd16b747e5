//! Deferred structural edits.
//!
//! Passes never modify the tree they are given. Instead they queue
//! "replace this node with that one" requests in an [EditLog], and the host
//! applies them later (see [super::apply_edits]). Replacement nodes are
//! allocated in an arena owned by the log, stacked on top of the host's
//! arena so that ids never collide.

use super::syntax::*;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RewriteError {
    /// An id that no arena knows about.
    #[error("node {0} does not exist")]
    DanglingNode(NodeId),
    /// A statement position that holds a declaration.
    #[error("expected a statement at {0}, found a {1}")]
    NotAStatement(NodeId, Kind),
    /// A second replacement for the same node.
    #[error("node {0} already has a pending replacement")]
    DuplicateTarget(NodeId),
}

pub type RewriteResult<T> = Result<T, RewriteError>;

/// "In the final tree, `target` is replaced by `replacement`."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edit {
    pub target: NodeId,
    pub replacement: NodeId,
}

/// An append-only list of [Edit]s, together with the arena that holds the
/// replacement nodes.
#[derive(Debug, Clone)]
pub struct EditLog {
    edits: Vec<Edit>,
    /// target -> replacement
    targets: HashMap<NodeId, NodeId>,
    fragments: Ast,
}

impl EditLog {
    /// An empty log for edits against `base`.
    pub fn new(base: &Ast) -> EditLog {
        EditLog {
            edits: vec![],
            targets: HashMap::new(),
            fragments: Ast::above(base),
        }
    }

    /// Queues a replacement. Each node may be replaced at most once.
    pub fn record(&mut self, target: NodeId, replacement: NodeId) -> RewriteResult<()> {
        if self.targets.contains_key(&target) {
            return Err(RewriteError::DuplicateTarget(target));
        }
        self.targets.insert(target, replacement);
        self.edits.push(Edit {
            target,
            replacement,
        });
        Ok(())
    }

    /// The edits, in the order they were recorded.
    pub fn entries(&self) -> &[Edit] {
        &self.edits
    }

    pub fn into_edits(self) -> Vec<Edit> {
        self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    pub fn is_target(&self, id: NodeId) -> bool {
        self.targets.contains_key(&id)
    }

    pub fn replacement_for(&self, target: NodeId) -> Option<NodeId> {
        self.targets.get(&target).copied()
    }

    /// The arena holding every node synthesized by the pass.
    pub fn fragments(&self) -> &Ast {
        &self.fragments
    }

    /// Reads `base` and the synthesized nodes together.
    pub fn view<'a>(&'a self, base: &'a Ast) -> Layered<'a> {
        Layered {
            base,
            top: &self.fragments,
        }
    }
}

/// What a pass holds while it runs: the host's tree, read-only, and the log
/// it is filling.
pub struct Rewriter<'a> {
    ast: &'a Ast,
    log: EditLog,
}

impl<'a> Rewriter<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Rewriter {
            ast,
            log: EditLog::new(ast),
        }
    }

    pub fn node(&self, id: NodeId) -> RewriteResult<&Node> {
        self.ast
            .get(id)
            .or_else(|| self.log.fragments.get(id))
            .ok_or(RewriteError::DanglingNode(id))
    }

    /// Like [Rewriter::node], but `id` must be a statement.
    pub fn stmt(&self, id: NodeId) -> RewriteResult<&Stmt> {
        match self.node(id)? {
            Node::Stmt(s) => Ok(s),
            other => Err(RewriteError::NotAStatement(id, other.kind())),
        }
    }

    pub fn is_replaced(&self, id: NodeId) -> bool {
        self.log.is_target(id)
    }

    /// Allocates a new node among the fragments.
    pub fn alloc(&mut self, node: Node) -> NodeId {
        self.log.fragments.alloc(node)
    }

    /// Copies the subtree rooted at `id` into the fragments. The copy is
    /// structurally equal to the original but shares no ids with it.
    pub fn copy_subtree(&mut self, id: NodeId) -> RewriteResult<NodeId> {
        let node = self.node(id)?.clone();
        let copy = node.try_map_children(&mut |child| self.copy_subtree(child))?;
        Ok(self.alloc(copy))
    }

    pub fn replace(&mut self, target: NodeId, replacement: NodeId) -> RewriteResult<()> {
        self.log.record(target, replacement)
    }

    pub fn finish(self) -> EditLog {
        self.log
    }
}

impl Nodes for Rewriter<'_> {
    fn node(&self, id: NodeId) -> Option<&Node> {
        Rewriter::node(self, id).ok()
    }
}
