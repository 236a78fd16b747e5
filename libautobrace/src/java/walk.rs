//! walk the tree / and leave only edits behind

use super::rewriter::{RewriteResult, Rewriter};
use super::syntax::*;
use tracing::trace;

/// What the walker should do after a visitor has looked at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Walk the node's children as usual.
    Descend,
    /// Leave the statement children alone; the visitor took care of them.
    /// Lambda bodies in the node's own expressions are still walked.
    Skip,
}

impl Flow {
    /// Combines the signals of two parts of one node: descend if either part
    /// still needs its children walked.
    pub fn or(self, other: Flow) -> Flow {
        match (self, other) {
            (Flow::Skip, Flow::Skip) => Flow::Skip,
            _ => Flow::Descend,
        }
    }
}

/// A visitor is passed to [Rewriter::walk] to describe what happens when
/// walking.
///
/// There is one method per control statement. Each has a default
/// implementation that does nothing and descends, so you only have to
/// specify what you need. Visitors never see the tree mutably: to change
/// it, they queue edits through the [Rewriter].
///
/// ```
/// use libautobrace::java::{Flow, NodeId, RewriteResult, Rewriter, Visitor};
/// struct CountLoops(usize);
/// impl Visitor for CountLoops {
///     fn visit_while(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
///         self.0 += 1;
///         Ok(Flow::Descend)
///     }
/// }
/// ```
pub trait Visitor {
    fn visit_if(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
        Ok(Flow::Descend)
    }
    fn visit_while(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
        Ok(Flow::Descend)
    }
    fn visit_do_while(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
        Ok(Flow::Descend)
    }
    fn visit_for(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
        Ok(Flow::Descend)
    }
    fn visit_for_each(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
        Ok(Flow::Descend)
    }
}

impl Rewriter<'_> {
    /// Walks the subtree rooted at `id`, strictly depth-first, left to right.
    ///
    /// Nodes that already have a pending replacement are not entered: they
    /// will not be part of the final tree.
    pub fn walk(&mut self, id: NodeId, v: &mut impl Visitor) -> RewriteResult<()> {
        if self.is_replaced(id) {
            trace!(node = %id, "replaced, not entering");
            return Ok(());
        }
        let kind = self.node(id)?.kind();
        trace!(node = %id, %kind, "visit");
        let flow = match kind {
            Kind::If => v.visit_if(self, id)?,
            Kind::While => v.visit_while(self, id)?,
            Kind::DoWhile => v.visit_do_while(self, id)?,
            Kind::For => v.visit_for(self, id)?,
            Kind::ForEach => v.visit_for_each(self, id)?,
            Kind::Unit
            | Kind::Class
            | Kind::Method
            | Kind::Block
            | Kind::Empty
            | Kind::Expr
            | Kind::VarDecl
            | Kind::Labeled
            | Kind::Switch
            | Kind::Try
            | Kind::Return
            | Kind::Break
            | Kind::Continue
            | Kind::Throw => Flow::Descend,
        };
        let children = match flow {
            Flow::Descend => self.node(id)?.children(),
            Flow::Skip => self.node(id)?.lambda_bodies(),
        };
        for child in children {
            self.walk(child, v)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::java::constructors::*;

    /// records the kinds of the loops it meets, and skips `do` loops
    #[derive(Default)]
    struct Loops(Vec<Kind>);

    impl Visitor for Loops {
        fn visit_while(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
            self.0.push(Kind::While);
            Ok(Flow::Descend)
        }
        fn visit_do_while(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
            self.0.push(Kind::DoWhile);
            Ok(Flow::Skip)
        }
        fn visit_for_each(&mut self, _rw: &mut Rewriter, _id: NodeId) -> RewriteResult<Flow> {
            self.0.push(Kind::ForEach);
            Ok(Flow::Descend)
        }
    }

    #[test]
    fn skip_stops_descent() {
        let mut ast = Ast::new();
        let inner = ast.expr_(id_("x"));
        let inner = ast.while_(id_("c"), inner);
        let skipped = ast.dowhile_(inner, id_("c"));
        let x = ast.expr_(id_("x"));
        let walked = ast.while_(id_("c"), x);
        let root = ast.block_(vec![skipped, walked]);
        let mut rw = Rewriter::new(&ast);
        let mut v = Loops::default();
        rw.walk(root, &mut v).unwrap();
        assert_eq!(v.0, vec![Kind::DoWhile, Kind::While]);
    }

    #[test]
    fn walks_into_lambdas_and_methods() {
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let loop_ = ast.foreach_("int", "i", id_("xs"), x);
        let body = ast.block_(vec![loop_]);
        let run = ast.expr_(call_(id_("run"), vec![lambda_(vec!["y"], body)]));
        let m = ast.method_("main", vec![], vec![run]);
        let class = ast.class_("A", vec![m]);
        let unit = ast.unit_(vec![class]);
        let mut rw = Rewriter::new(&ast);
        let mut v = Loops::default();
        rw.walk(unit, &mut v).unwrap();
        assert_eq!(v.0, vec![Kind::ForEach]);
    }

    #[test]
    fn skip_still_walks_lambdas_in_the_header() {
        // do { while (c) x; } while (f(() -> { for (int i : xs) y; }));
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let skipped = ast.while_(id_("c"), x);
        let y = ast.expr_(id_("y"));
        let each = ast.foreach_("int", "i", id_("xs"), y);
        let body = ast.block_(vec![each]);
        let test = call_(id_("f"), vec![lambda_(Vec::<&str>::new(), body)]);
        let root = ast.dowhile_(skipped, test);
        let mut rw = Rewriter::new(&ast);
        let mut v = Loops::default();
        rw.walk(root, &mut v).unwrap();
        assert_eq!(v.0, vec![Kind::DoWhile, Kind::ForEach]);
    }

    #[test]
    fn dangling_children_abort_the_walk() {
        let mut ast = Ast::new();
        let mut other = Ast::new();
        other.alloc(Node::Stmt(Stmt::Empty));
        let x = other.alloc(Node::Stmt(Stmt::Empty));
        let root = ast.block_(vec![x]);
        let mut rw = Rewriter::new(&ast);
        let result = rw.walk(root, &mut Loops::default());
        assert!(result.is_err());
    }

    #[test]
    fn or_descends_unless_both_skip() {
        assert_eq!(Flow::Skip.or(Flow::Skip), Flow::Skip);
        assert_eq!(Flow::Skip.or(Flow::Descend), Flow::Descend);
        assert_eq!(Flow::Descend.or(Flow::Skip), Flow::Descend);
    }
}
