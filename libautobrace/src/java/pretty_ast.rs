//! Renders a subtree as Java-like source. Only meant for humans: logs, test
//! expectations, and hosts that want to eyeball an [super::EditLog].
use super::syntax::*;
use pretty::RcDoc;
use std::fmt;

pub const DEFAULT_WIDTH: usize = 80;

/// A subtree that can be printed with `{}`.
pub struct Printed<'a, N> {
    nodes: &'a N,
    id: NodeId,
    width: usize,
}

impl<N: Nodes> fmt::Display for Printed<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        node_doc(self.nodes, self.id).render_fmt(self.width, f)
    }
}

pub fn printed<N: Nodes>(nodes: &N, id: NodeId) -> Printed<'_, N> {
    Printed {
        nodes,
        id,
        width: DEFAULT_WIDTH,
    }
}

pub fn to_pretty<N: Nodes>(nodes: &N, id: NodeId, width: usize) -> String {
    Printed { nodes, id, width }.to_string()
}

fn is_block<N: Nodes>(nodes: &N, id: NodeId) -> bool {
    matches!(nodes.node(id), Some(Node::Stmt(Stmt::Block(..))))
}

/// `{` and `}` around `items`, one per line.
fn braced<'a>(items: Vec<RcDoc<'a, ()>>) -> RcDoc<'a, ()> {
    if items.is_empty() {
        return RcDoc::text("{}");
    }
    RcDoc::text("{")
        .append(
            RcDoc::hardline()
                .append(RcDoc::intersperse(items, RcDoc::hardline()))
                .nest(2),
        )
        .append(RcDoc::hardline())
        .append(RcDoc::text("}"))
}

/// The body of a control statement: blocks stay on the same line, anything
/// else goes on the next line, indented.
fn body_doc<'a, N: Nodes>(nodes: &'a N, id: NodeId) -> RcDoc<'a, ()> {
    if is_block(nodes, id) {
        RcDoc::space().append(node_doc(nodes, id))
    } else {
        RcDoc::hardline().append(node_doc(nodes, id)).nest(2)
    }
}

/// Whatever follows a body on the same statement (`else`, `while (c);`).
fn after_body<'a, N: Nodes>(nodes: &'a N, body: NodeId) -> RcDoc<'a, ()> {
    if is_block(nodes, body) {
        RcDoc::space()
    } else {
        RcDoc::hardline()
    }
}

fn params_doc(params: &[Param]) -> RcDoc<'_, ()> {
    RcDoc::text("(")
        .append(RcDoc::intersperse(
            params.iter().map(param_doc),
            RcDoc::text(", "),
        ))
        .append(RcDoc::text(")"))
}

fn param_doc(p: &Param) -> RcDoc<'_, ()> {
    RcDoc::text(p.ty.as_str())
        .append(RcDoc::space())
        .append(RcDoc::text(p.name.as_str()))
}

fn decl_doc<'a, N: Nodes>(nodes: &'a N, vd: &'a VarDecl) -> RcDoc<'a, ()> {
    let doc = RcDoc::text(vd.ty.as_str())
        .append(RcDoc::space())
        .append(RcDoc::text(vd.name.as_str()));
    match &vd.init {
        None => doc,
        Some(e) => doc.append(RcDoc::text(" = ")).append(expr_doc(nodes, e)),
    }
}

fn exprs_doc<'a, N: Nodes>(nodes: &'a N, es: &'a [Expr]) -> RcDoc<'a, ()> {
    RcDoc::intersperse(es.iter().map(|e| expr_doc(nodes, e)), RcDoc::text(", "))
}

pub fn node_doc<'a, N: Nodes>(nodes: &'a N, id: NodeId) -> RcDoc<'a, ()> {
    match nodes.node(id) {
        None => RcDoc::text(format!("/* missing {} */", id)),
        Some(Node::Unit(items)) => RcDoc::intersperse(
            items.iter().map(|i| node_doc(nodes, *i)),
            RcDoc::hardline().append(RcDoc::hardline()),
        ),
        Some(Node::Class(name, members)) => RcDoc::text("class ")
            .append(RcDoc::text(name.as_str()))
            .append(RcDoc::space())
            .append(braced(members.iter().map(|m| node_doc(nodes, *m)).collect())),
        Some(Node::Method(m)) => {
            let sig = RcDoc::text("void ")
                .append(RcDoc::text(m.name.as_str()))
                .append(params_doc(&m.params));
            match m.body {
                Some(body) => sig.append(RcDoc::space()).append(node_doc(nodes, body)),
                None => RcDoc::text("abstract ").append(sig).append(RcDoc::text(";")),
            }
        }
        Some(Node::Stmt(s)) => stmt_doc(nodes, s),
    }
}

fn stmt_doc<'a, N: Nodes>(nodes: &'a N, stmt: &'a Stmt) -> RcDoc<'a, ()> {
    use Stmt::*;
    match stmt {
        Block(ss) => braced(ss.iter().map(|s| node_doc(nodes, *s)).collect()),
        Empty => RcDoc::text(";"),
        Expr(e) => expr_doc(nodes, e).append(RcDoc::text(";")),
        VarDecl(vds) => RcDoc::intersperse(
            vds.iter().map(|vd| decl_doc(nodes, vd).append(RcDoc::text(";"))),
            RcDoc::space(),
        ),
        If(cond, then, other) => {
            let doc = RcDoc::text("if (")
                .append(expr_doc(nodes, cond))
                .append(RcDoc::text(")"))
                .append(body_doc(nodes, *then));
            match other {
                None => doc,
                Some(other) => {
                    let doc = doc
                        .append(after_body(nodes, *then))
                        .append(RcDoc::text("else"));
                    match nodes.node(*other) {
                        Some(Node::Stmt(If(..))) => doc
                            .append(RcDoc::space())
                            .append(node_doc(nodes, *other)),
                        _ => doc.append(body_doc(nodes, *other)),
                    }
                }
            }
        }
        While(cond, body) => RcDoc::text("while (")
            .append(expr_doc(nodes, cond))
            .append(RcDoc::text(")"))
            .append(body_doc(nodes, *body)),
        DoWhile(body, cond) => RcDoc::text("do")
            .append(body_doc(nodes, *body))
            .append(after_body(nodes, *body))
            .append(RcDoc::text("while ("))
            .append(expr_doc(nodes, cond))
            .append(RcDoc::text(");")),
        For(init, test, update, body) => {
            let init = match init {
                ForInit::Exprs(es) => exprs_doc(nodes, es),
                ForInit::Decls(vds) => match vds.split_first() {
                    None => RcDoc::nil(),
                    // Java allows a single type per declaration list
                    Some((first, rest)) => decl_doc(nodes, first).append(RcDoc::concat(
                        rest.iter().map(|vd| {
                            let doc = RcDoc::text(", ").append(RcDoc::text(vd.name.as_str()));
                            match &vd.init {
                                None => doc,
                                Some(e) => doc.append(RcDoc::text(" = ")).append(expr_doc(nodes, e)),
                            }
                        }),
                    )),
                },
            };
            let test = match test {
                None => RcDoc::nil(),
                Some(e) => RcDoc::space().append(expr_doc(nodes, e)),
            };
            let update = if update.is_empty() {
                RcDoc::nil()
            } else {
                RcDoc::space().append(exprs_doc(nodes, update))
            };
            RcDoc::text("for (")
                .append(init)
                .append(RcDoc::text(";"))
                .append(test)
                .append(RcDoc::text(";"))
                .append(update)
                .append(RcDoc::text(")"))
                .append(body_doc(nodes, *body))
        }
        ForEach(param, xs, body) => RcDoc::text("for (")
            .append(param_doc(param))
            .append(RcDoc::text(" : "))
            .append(expr_doc(nodes, xs))
            .append(RcDoc::text(")"))
            .append(body_doc(nodes, *body)),
        Labeled(label, body) => RcDoc::text(label.as_str())
            .append(RcDoc::text(": "))
            .append(node_doc(nodes, *body)),
        Switch(e, cases) => RcDoc::text("switch (")
            .append(expr_doc(nodes, e))
            .append(RcDoc::text(") "))
            .append(braced(
                cases
                    .iter()
                    .map(|case| {
                        let label = match &case.label {
                            None => RcDoc::text("default:"),
                            Some(l) => RcDoc::text("case ")
                                .append(expr_doc(nodes, l))
                                .append(RcDoc::text(":")),
                        };
                        label.append(RcDoc::concat(
                            case.body
                                .iter()
                                .map(|s| RcDoc::hardline().append(node_doc(nodes, *s)).nest(2)),
                        ))
                    })
                    .collect(),
            )),
        Try(body, catches, finally) => {
            let doc = RcDoc::text("try ").append(node_doc(nodes, *body));
            let doc = catches.iter().fold(doc, |doc, c| {
                doc.append(RcDoc::text(" catch ("))
                    .append(param_doc(&c.param))
                    .append(RcDoc::text(") "))
                    .append(node_doc(nodes, c.body))
            });
            match finally {
                None => doc,
                Some(f) => doc
                    .append(RcDoc::text(" finally "))
                    .append(node_doc(nodes, *f)),
            }
        }
        Return(None) => RcDoc::text("return;"),
        Return(Some(e)) => RcDoc::text("return ")
            .append(expr_doc(nodes, e))
            .append(RcDoc::text(";")),
        Break(None) => RcDoc::text("break;"),
        Break(Some(l)) => RcDoc::text("break ")
            .append(RcDoc::text(l.as_str()))
            .append(RcDoc::text(";")),
        Continue(None) => RcDoc::text("continue;"),
        Continue(Some(l)) => RcDoc::text("continue ")
            .append(RcDoc::text(l.as_str()))
            .append(RcDoc::text(";")),
        Throw(e) => RcDoc::text("throw ")
            .append(expr_doc(nodes, e))
            .append(RcDoc::text(";")),
    }
}

/// Operands that would bind differently without parentheses.
fn operand_doc<'a, N: Nodes>(nodes: &'a N, e: &'a Expr) -> RcDoc<'a, ()> {
    match e {
        Expr::Binary(..) | Expr::Cond(..) | Expr::Assign(..) | Expr::Lambda(..) => {
            RcDoc::text("(")
                .append(expr_doc(nodes, e))
                .append(RcDoc::text(")"))
        }
        _ => expr_doc(nodes, e),
    }
}

pub fn expr_doc<'a, N: Nodes>(nodes: &'a N, e: &'a Expr) -> RcDoc<'a, ()> {
    use Expr::*;
    match e {
        Lit(lit) => lit_doc(lit),
        Id(x) => RcDoc::text(x.as_str()),
        This => RcDoc::text("this"),
        Dot(e, field) => operand_doc(nodes, e)
            .append(RcDoc::text("."))
            .append(RcDoc::text(field.as_str())),
        Index(a, i) => operand_doc(nodes, a)
            .append(RcDoc::text("["))
            .append(expr_doc(nodes, i))
            .append(RcDoc::text("]")),
        Call(f, args) => operand_doc(nodes, f)
            .append(RcDoc::text("("))
            .append(exprs_doc(nodes, args))
            .append(RcDoc::text(")")),
        New(class, args) => RcDoc::text("new ")
            .append(RcDoc::text(class.as_str()))
            .append(RcDoc::text("("))
            .append(exprs_doc(nodes, args))
            .append(RcDoc::text(")")),
        Unary(op, e) => RcDoc::text(match op {
            UnaryOp::Neg => "-",
            UnaryOp::Not => "!",
        })
        .append(operand_doc(nodes, e)),
        Binary(op, a, b) => operand_doc(nodes, a)
            .append(RcDoc::space())
            .append(RcDoc::text(bin_op_str(*op)))
            .append(RcDoc::space())
            .append(operand_doc(nodes, b)),
        UnaryAssign(op, e) => match op {
            UnaryAssignOp::PreInc => RcDoc::text("++").append(operand_doc(nodes, e)),
            UnaryAssignOp::PreDec => RcDoc::text("--").append(operand_doc(nodes, e)),
            UnaryAssignOp::PostInc => operand_doc(nodes, e).append(RcDoc::text("++")),
            UnaryAssignOp::PostDec => operand_doc(nodes, e).append(RcDoc::text("--")),
        },
        Assign(op, lv, e) => expr_doc(nodes, lv)
            .append(RcDoc::text(match op {
                AssignOp::Equal => " = ",
                AssignOp::Add => " += ",
                AssignOp::Sub => " -= ",
            }))
            .append(expr_doc(nodes, e)),
        Cond(a, b, c) => operand_doc(nodes, a)
            .append(RcDoc::text(" ? "))
            .append(operand_doc(nodes, b))
            .append(RcDoc::text(" : "))
            .append(operand_doc(nodes, c)),
        Lambda(params, body) => RcDoc::text("(")
            .append(RcDoc::intersperse(
                params.iter().map(|p| RcDoc::text(p.as_str())),
                RcDoc::text(", "),
            ))
            .append(RcDoc::text(") -> "))
            .append(node_doc(nodes, *body)),
    }
}

fn lit_doc(lit: &Lit) -> RcDoc<'_, ()> {
    match lit {
        Lit::Int(n) => RcDoc::text(n.to_string()),
        Lit::Double(d) => RcDoc::text(format!("{:?}", d)),
        Lit::Bool(true) => RcDoc::text("true"),
        Lit::Bool(false) => RcDoc::text("false"),
        Lit::Char(c) => RcDoc::text(format!("{:?}", c)),
        Lit::String(s) => RcDoc::text(format!("{:?}", s)),
        Lit::Null => RcDoc::text("null"),
    }
}

fn bin_op_str(op: BinOp) -> &'static str {
    match op {
        BinOp::Add => "+",
        BinOp::Sub => "-",
        BinOp::Mul => "*",
        BinOp::Div => "/",
        BinOp::Rem => "%",
        BinOp::Lt => "<",
        BinOp::Le => "<=",
        BinOp::Gt => ">",
        BinOp::Ge => ">=",
        BinOp::Eq => "==",
        BinOp::Ne => "!=",
        BinOp::And => "&&",
        BinOp::Or => "||",
    }
}
