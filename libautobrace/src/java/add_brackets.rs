//! a control statement whose body is a single statement is easy to misread
//! and easy to break by adding a second statement. this pass asks for every
//! such body to be wrapped in a block:
//!
//! - the then and else branches of `if` (but not the `if` of an `else if`)
//! - the body of `for`, enhanced `for`, `while` and `do ... while`
//!
//! the tree itself is left alone: every wrap is an edit in the [EditLog]

use super::rewriter::{EditLog, RewriteResult, Rewriter};
use super::syntax::*;
use super::walk::{Flow, Visitor};
use crate::opts::Opts;
use tracing::debug;

struct AddBrackets {
    enabled: bool,
}

impl AddBrackets {
    /// Asks for `stmt` to be replaced by `{ stmt }`, normalizing the copy
    /// inside the new block first. The copy is a fresh subtree that the
    /// enclosing walk will never reach, so it is walked here.
    fn wrap(&mut self, rw: &mut Rewriter, stmt: NodeId) -> RewriteResult<Flow> {
        if !self.enabled {
            return Ok(Flow::Descend);
        }
        let copy = rw.copy_subtree(stmt)?;
        let block = rw.alloc(Node::Stmt(Stmt::Block(vec![copy])));
        rw.walk(block, self)?;
        debug!(target_node = %stmt, block = %block, "wrapping body in a block");
        rw.replace(stmt, block)?;
        Ok(Flow::Skip)
    }

    /// Wraps a loop body unless it is a block already.
    fn loop_body(&mut self, rw: &mut Rewriter, body: NodeId) -> RewriteResult<Flow> {
        if rw.stmt(body)?.is_block() {
            return Ok(Flow::Descend);
        }
        self.wrap(rw, body)
    }
}

impl Visitor for AddBrackets {
    fn visit_if(&mut self, rw: &mut Rewriter, id: NodeId) -> RewriteResult<Flow> {
        let (then, other) = match rw.stmt(id)? {
            Stmt::If(_, then, other) => (*then, *other),
            s => unreachable!("visit_if on a {}", s.kind()),
        };
        let mut flow = Flow::Descend;
        if !rw.stmt(then)?.is_block() {
            flow = self.wrap(rw, then)?;
        }
        if let Some(other) = other {
            // an `else if` chain keeps its shape; the nested `if` gets its
            // own visit
            if !matches!(rw.stmt(other)?, Stmt::Block(..) | Stmt::If(..)) {
                return Ok(self.wrap(rw, other)?.or(flow));
            }
        }
        // Descend even when the then-branch was wrapped: the walker will not
        // enter it again, but the condition and an `else if` still need it.
        Ok(Flow::Descend)
    }

    fn visit_while(&mut self, rw: &mut Rewriter, id: NodeId) -> RewriteResult<Flow> {
        match rw.stmt(id)? {
            Stmt::While(_, body) => {
                let body = *body;
                self.loop_body(rw, body)
            }
            s => unreachable!("visit_while on a {}", s.kind()),
        }
    }

    fn visit_do_while(&mut self, rw: &mut Rewriter, id: NodeId) -> RewriteResult<Flow> {
        match rw.stmt(id)? {
            Stmt::DoWhile(body, _) => {
                let body = *body;
                self.loop_body(rw, body)
            }
            s => unreachable!("visit_do_while on a {}", s.kind()),
        }
    }

    fn visit_for(&mut self, rw: &mut Rewriter, id: NodeId) -> RewriteResult<Flow> {
        match rw.stmt(id)? {
            Stmt::For(.., body) => {
                let body = *body;
                self.loop_body(rw, body)
            }
            s => unreachable!("visit_for on a {}", s.kind()),
        }
    }

    fn visit_for_each(&mut self, rw: &mut Rewriter, id: NodeId) -> RewriteResult<Flow> {
        match rw.stmt(id)? {
            Stmt::ForEach(.., body) => {
                let body = *body;
                self.loop_body(rw, body)
            }
            s => unreachable!("visit_for_each on a {}", s.kind()),
        }
    }
}

/// Finds every control statement under `root` whose body is not a block and
/// returns the edits that wrap those bodies. `ast` is not modified.
pub fn add_brackets(ast: &Ast, root: NodeId, opts: &Opts) -> RewriteResult<EditLog> {
    let mut v = AddBrackets {
        enabled: opts.add_brackets,
    };
    let mut rw = Rewriter::new(ast);
    rw.walk(root, &mut v)?;
    let log = rw.finish();
    debug!(
        root = %root,
        edits = log.len(),
        enabled = opts.add_brackets,
        "add_brackets done"
    );
    Ok(log)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::java::constructors::*;
    use crate::java::{apply_edits, to_pretty};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use strum::IntoEnumIterator;
    use strum_macros::EnumIter;

    const WIDTH: usize = 80;

    fn run(ast: &Ast, root: NodeId) -> EditLog {
        add_brackets(ast, root, &Opts::new()).expect("add_brackets failed")
    }

    /// the tree after applying the edits, pretty-printed
    fn normalized(ast: &Ast, root: NodeId) -> String {
        let log = run(ast, root);
        let (out, out_root) = apply_edits(ast, root, &log).expect("apply failed");
        to_pretty(&out, out_root, WIDTH)
    }

    fn targets(log: &EditLog) -> Vec<NodeId> {
        log.entries().iter().map(|e| e.target).collect()
    }

    #[derive(Debug, Clone, Copy, EnumIter)]
    enum Loop {
        While,
        DoWhile,
        For,
        ForEach,
    }

    fn loop_(ast: &mut Ast, kind: Loop, body: NodeId) -> NodeId {
        match kind {
            Loop::While => ast.while_(id_("c"), body),
            Loop::DoWhile => ast.dowhile_(body, id_("c")),
            Loop::For => {
                let (init, test, update) = counting_("i", id_("n"));
                ast.for_(init, test, update, body)
            }
            Loop::ForEach => ast.foreach_("int", "i", id_("xs"), body),
        }
    }

    #[test]
    fn every_loop_kind_gets_a_block() {
        for kind in Loop::iter() {
            let mut ast = Ast::new();
            let x = ast.expr_(call_(id_("x"), vec![]));
            let l = loop_(&mut ast, kind, x);
            let log = run(&ast, l);
            assert_eq!(targets(&log), vec![x], "{:?}", kind);
            let block = log.entries()[0].replacement;
            match log.fragments().get(block) {
                Some(Node::Stmt(Stmt::Block(ss))) => {
                    assert_eq!(ss.len(), 1);
                    assert!(subtree_eq(&ast, x, log.fragments(), ss[0]));
                }
                other => panic!("expected a block, got {:?}", other),
            }
        }
    }

    #[test]
    fn loops_with_blocks_are_untouched() {
        for kind in Loop::iter() {
            let mut ast = Ast::new();
            let x = ast.expr_(id_("x"));
            let body = ast.block_(vec![x]);
            let l = loop_(&mut ast, kind, body);
            assert!(run(&ast, l).is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn if_then_and_else() {
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let y = ast.expr_(id_("y"));
        let i = ast.if_(id_("a"), x, Some(y));
        let log = run(&ast, i);
        assert_eq!(targets(&log), vec![x, y]);
        assert_eq!(
            normalized(&ast, i),
            "if (a) {\n  x;\n} else {\n  y;\n}"
        );
    }

    #[test]
    fn already_blocked_then_is_untouched() {
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let then = ast.block_(vec![x]);
        let i = ast.if_(id_("a"), then, None);
        assert!(run(&ast, i).is_empty());
    }

    #[test]
    fn else_if_chains_keep_their_shape() {
        // if (a) x; else if (b) y;
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let y = ast.expr_(id_("y"));
        let inner = ast.if_(id_("b"), y, None);
        let outer = ast.if_(id_("a"), x, Some(inner));
        let log = run(&ast, outer);
        assert_eq!(targets(&log), vec![x, y]);
        assert!(!log.is_target(inner));
        assert_eq!(
            normalized(&ast, outer),
            "if (a) {\n  x;\n} else if (b) {\n  y;\n}"
        );
    }

    #[test]
    fn long_else_if_chain_with_final_else() {
        // if (a) x; else if (b) y; else z;
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let y = ast.expr_(id_("y"));
        let z = ast.expr_(id_("z"));
        let inner = ast.if_(id_("b"), y, Some(z));
        let outer = ast.if_(id_("a"), x, Some(inner));
        let log = run(&ast, outer);
        assert_eq!(targets(&log), vec![x, y, z]);
        assert_eq!(
            normalized(&ast, outer),
            "if (a) {\n  x;\n} else if (b) {\n  y;\n} else {\n  z;\n}"
        );
    }

    #[test]
    fn wraps_recursively_inside_new_blocks() {
        // while (c) if (a) x;
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let i = ast.if_(id_("a"), x, None);
        let w = ast.while_(id_("c"), i);
        let log = run(&ast, w);
        // one edit for the loop body, one for the copy of the then-branch
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[1].target, i);
        assert!(!log.is_target(x));
        assert_eq!(
            normalized(&ast, w),
            "while (c) {\n  if (a) {\n    x;\n  }\n}"
        );
    }

    #[test]
    fn block_then_with_bare_else_still_walks_the_then_side() {
        // if (a) { while (c) y; } else z;
        let mut ast = Ast::new();
        let y = ast.expr_(id_("y"));
        let w = ast.while_(id_("c"), y);
        let then = ast.block_(vec![w]);
        let z = ast.expr_(id_("z"));
        let i = ast.if_(id_("a"), then, Some(z));
        let log = run(&ast, i);
        assert_eq!(targets(&log), vec![z, y]);
        assert_eq!(
            normalized(&ast, i),
            "if (a) {\n  while (c) {\n    y;\n  }\n} else {\n  z;\n}"
        );
    }

    #[test]
    fn wrapped_then_is_not_walked_twice() {
        // if (a) while (c) y;
        let mut ast = Ast::new();
        let y = ast.expr_(id_("y"));
        let w = ast.while_(id_("c"), y);
        let i = ast.if_(id_("a"), w, None);
        let log = run(&ast, i);
        // the loop body of the original `while` is dead after the wrap
        assert_eq!(log.len(), 2);
        assert!(!log.is_target(y));
        assert_eq!(
            normalized(&ast, i),
            "if (a) {\n  while (c) {\n    y;\n  }\n}"
        );
    }

    #[test]
    fn both_branches_wrapped_with_nested_loops() {
        // if (a) while (c) x; else for (int i = 0; i < n; i++) y;
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let w = ast.while_(id_("c"), x);
        let y = ast.expr_(id_("y"));
        let (init, test, update) = counting_("i", id_("n"));
        let f = ast.for_(init, test, update, y);
        let i = ast.if_(id_("a"), w, Some(f));
        let log = run(&ast, i);
        assert_eq!(log.len(), 4);
        // each copy is normalized before the branch itself is recorded
        assert_eq!(log.entries()[1].target, w);
        assert_eq!(log.entries()[3].target, f);
        assert!(!log.is_target(x));
        assert!(!log.is_target(y));
        assert_eq!(
            normalized(&ast, i),
            "if (a) {\n  while (c) {\n    x;\n  }\n} else {\n  \
             for (int i = 0; i < n; i++) {\n    y;\n  }\n}"
        );
    }

    #[test]
    fn lambdas_in_wrapped_headers_are_normalized() {
        // while (f(() -> { while (d) z; })) y;
        let mut ast = Ast::new();
        let z = ast.expr_(id_("z"));
        let inner = ast.while_(id_("d"), z);
        let body = ast.block_(vec![inner]);
        let y = ast.expr_(id_("y"));
        let cond = call_(id_("f"), vec![lambda_(Vec::<&str>::new(), body)]);
        let w = ast.while_(cond, y);
        let log = run(&ast, w);
        assert_eq!(targets(&log), vec![y, z]);
        let (once, once_root) = apply_edits(&ast, w, &log).unwrap();
        assert_eq!(
            to_pretty(&once, once_root, WIDTH),
            "while (f(() -> {\n  while (d) {\n    z;\n  }\n})) {\n  y;\n}"
        );
        assert!(run(&once, once_root).is_empty());
    }

    #[test]
    fn disabled_pass_records_nothing() {
        let mut ast = Ast::new();
        let x = ast.expr_(id_("x"));
        let i = ast.if_(id_("a"), x, None);
        let w = ast.while_(id_("c"), i);
        let opts = Opts {
            add_brackets: false,
        };
        let log = add_brackets(&ast, w, &opts).unwrap();
        assert!(log.is_empty());
        assert!(log.fragments().is_empty());
    }

    /// a class whose method has one statement of every shape the pass
    /// cares about, and the number of bare bodies in it
    fn sample_class(ast: &mut Ast) -> (NodeId, usize) {
        let mut stmts = vec![];
        let mut bare = 0;
        for kind in Loop::iter() {
            let x = ast.expr_(postinc_(id_("n")));
            stmts.push(loop_(ast, kind, x));
            bare += 1;
        }
        // if (a) return; else { b(); }
        let ret = ast.return_(None);
        let b = ast.expr_(call_(id_("b"), vec![]));
        let b = ast.block_(vec![b]);
        stmts.push(ast.if_(id_("a"), ret, Some(b)));
        bare += 1;
        // lambda bodies are walked: run(() -> { for (...) f(i); });
        let f = ast.expr_(call_(id_("f"), vec![id_("i")]));
        let (init, test, update) = counting_("i", int_(3));
        let inner = ast.for_(init, test, update, f);
        let body = ast.block_(vec![inner]);
        stmts.push(ast.expr_(call_(id_("run"), vec![lambda_(vec!["u"], body)])));
        bare += 1;
        // labels and switch cases are not statement positions
        let brk = ast.break_(Some("out"));
        let labeled_body = ast.while_(TRUE_, brk);
        stmts.push(ast.label_("out", labeled_body));
        bare += 1;
        // bare loops in lambdas of headers whose own bodies get wrapped
        // while (ok(v -> { while (d) z(); })) n++;
        let z = ast.expr_(call_(id_("z"), vec![]));
        let inner = ast.while_(id_("d"), z);
        let body = ast.block_(vec![inner]);
        let n = ast.expr_(postinc_(id_("n")));
        stmts.push(ast.while_(call_(id_("ok"), vec![lambda_(vec!["v"], body)]), n));
        bare += 2;
        // for (int i = 0; i < 3; i++, step(v -> { do w(); while (d); })) f(i);
        let w = ast.expr_(call_(id_("w"), vec![]));
        let inner = ast.dowhile_(w, id_("d"));
        let body = ast.block_(vec![inner]);
        let (init, test, mut update) = counting_("i", int_(3));
        update.push(call_(id_("step"), vec![lambda_(vec!["v"], body)]));
        let f = ast.expr_(call_(id_("f"), vec![id_("i")]));
        stmts.push(ast.for_(init, test, update, f));
        bare += 2;
        // if (test(v -> { for (int j : js) h(); })) p(); else q();
        let h = ast.expr_(call_(id_("h"), vec![]));
        let inner = ast.foreach_("int", "j", id_("js"), h);
        let body = ast.block_(vec![inner]);
        let p = ast.expr_(call_(id_("p"), vec![]));
        let q = ast.expr_(call_(id_("q"), vec![]));
        let cond = call_(id_("test"), vec![lambda_(vec!["v"], body)]);
        stmts.push(ast.if_(cond, p, Some(q)));
        bare += 3;
        let g = ast.expr_(call_(id_("g"), vec![]));
        stmts.push(ast.switch_(id_("k"), vec![(Some(int_(1)), vec![g])]));
        let m = ast.method_("main", vec![("String[]", "args")], stmts);
        let abs = ast.abstract_method_("other");
        (ast.class_("Main", vec![m, abs]), bare)
    }

    fn sample_unit(ast: &mut Ast) -> (NodeId, usize) {
        let (class, bare) = sample_class(ast);
        (ast.unit_(vec![class]), bare)
    }

    #[test]
    fn one_distinct_edit_per_bare_position() {
        let mut ast = Ast::new();
        let (unit, bare) = sample_unit(&mut ast);
        let log = run(&ast, unit);
        assert_eq!(log.len(), bare);
        let distinct: HashSet<_> = targets(&log).into_iter().collect();
        assert_eq!(distinct.len(), bare);
        for edit in log.entries() {
            assert!(ast.contains(edit.target));
        }
    }

    #[test]
    fn replacements_preserve_the_wrapped_statement() {
        let mut ast = Ast::new();
        let (unit, _) = sample_unit(&mut ast);
        let log = run(&ast, unit);
        let view = log.view(&ast);
        for edit in log.entries() {
            match view.node(edit.replacement) {
                Some(Node::Stmt(Stmt::Block(ss))) => {
                    assert_eq!(ss.len(), 1);
                    assert!(subtree_eq(&ast, edit.target, &view, ss[0]));
                }
                other => panic!("expected a block, got {:?}", other),
            }
        }
    }

    #[test]
    fn second_run_is_a_no_op() {
        let mut ast = Ast::new();
        let (class, _) = sample_class(&mut ast);
        let x = ast.expr_(id_("x"));
        let i = ast.if_(id_("a"), x, None);
        let w = ast.while_(id_("c"), i);
        let y = ast.expr_(id_("y"));
        let e = ast.if_(id_("d"), y, None);
        let chain = ast.if_(id_("b"), w, Some(e));
        let m = ast.method_("more", vec![], vec![chain]);
        let more = ast.class_("More", vec![m]);
        let root = ast.unit_(vec![class, more]);
        let log = run(&ast, root);
        assert!(!log.is_empty());
        let (once, once_root) = apply_edits(&ast, root, &log).unwrap();
        assert!(run(&once, once_root).is_empty());
    }

    #[test]
    fn statement_positions_must_hold_statements() {
        let mut ast = Ast::new();
        let class = ast.class_("Inner", vec![]);
        let w = ast.while_(id_("c"), class);
        assert_eq!(
            add_brackets(&ast, w, &Opts::new()).unwrap_err(),
            crate::java::RewriteError::NotAStatement(class, Kind::Class)
        );
    }

    #[test]
    fn the_tree_is_not_modified() {
        let mut ast = Ast::new();
        let (unit, _) = sample_unit(&mut ast);
        let before = ast.clone();
        let log = run(&ast, unit);
        assert!(!log.is_empty());
        assert_eq!(ast, before);
    }
}
