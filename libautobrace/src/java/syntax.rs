//! The syntax of a small Java-like language, stored in an arena.
//!
//! Statements refer to their sub-statements by [NodeId] rather than by
//! `Box`, so that a node has a stable identity that rewrites can name.
//! Expressions never need an identity and are plain owned trees.
use std::convert::TryFrom;
use strum_macros::Display;

pub type Id = String;

/// The identity of a node in an [Ast].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Int(i64),
    Double(f64),
    Bool(bool),
    Char(char),
    String(String),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryAssignOp {
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignOp {
    Equal,
    Add,
    Sub,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Lit),
    Id(Id),
    This,
    Dot(Box<Expr>, Id),
    Index(Box<Expr>, Box<Expr>),
    Call(Box<Expr>, Vec<Expr>),
    New(Id, Vec<Expr>),
    Unary(UnaryOp, Box<Expr>),
    Binary(BinOp, Box<Expr>, Box<Expr>),
    UnaryAssign(UnaryAssignOp, Box<Expr>),
    Assign(AssignOp, Box<Expr>, Box<Expr>),
    /// `a ? b : c`
    Cond(Box<Expr>, Box<Expr>, Box<Expr>),
    /// A lambda whose body is a statement (normally a block).
    Lambda(Vec<Id>, NodeId),
}

/// A typed name, as in a parameter or the variable of an enhanced `for`.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub ty: Id,
    pub name: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: Id,
    pub name: Id,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Exprs(Vec<Expr>),
    Decls(Vec<VarDecl>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    /// `None` is the `default:` label
    pub label: Option<Expr>,
    pub body: Vec<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Catch {
    pub param: Param,
    pub body: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Vec<NodeId>),
    Empty,
    Expr(Expr),
    VarDecl(Vec<VarDecl>),
    /// then-branch is mandatory, else-branch is not
    If(Expr, NodeId, Option<NodeId>),
    While(Expr, NodeId),
    DoWhile(NodeId, Expr),
    For(ForInit, Option<Expr>, Vec<Expr>, NodeId),
    /// `for (T x : xs) body`
    ForEach(Param, Expr, NodeId),
    Labeled(Id, NodeId),
    Switch(Expr, Vec<Case>),
    Try(NodeId, Vec<Catch>, Option<NodeId>),
    Return(Option<Expr>),
    Break(Option<Id>),
    Continue(Option<Id>),
    Throw(Expr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Id,
    pub params: Vec<Param>,
    /// `None` for abstract and interface methods
    pub body: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A compilation unit: the top-level declarations of one file.
    Unit(Vec<NodeId>),
    Class(Id, Vec<NodeId>),
    Method(Method),
    Stmt(Stmt),
}

/// The kind of a node, without its children. The walker dispatches on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    Unit,
    Class,
    Method,
    Block,
    Empty,
    Expr,
    VarDecl,
    If,
    While,
    DoWhile,
    For,
    ForEach,
    Labeled,
    Switch,
    Try,
    Return,
    Break,
    Continue,
    Throw,
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Node::Unit(..) => Kind::Unit,
            Node::Class(..) => Kind::Class,
            Node::Method(..) => Kind::Method,
            Node::Stmt(s) => s.kind(),
        }
    }

    /// The nodes directly below this one, in source order. Lambda bodies
    /// nested in expressions are included.
    pub fn children(&self) -> Vec<NodeId> {
        let mut out = vec![];
        match self {
            Node::Unit(items) | Node::Class(_, items) => out.extend(items.iter().copied()),
            Node::Method(m) => out.extend(m.body),
            Node::Stmt(s) => s.push_children(&mut out),
        }
        out
    }

    /// The bodies of lambdas in this node's own expressions, such as a
    /// condition or a `for` header. Statement children are left out.
    pub fn lambda_bodies(&self) -> Vec<NodeId> {
        let mut out = vec![];
        if let Node::Stmt(s) = self {
            for e in s.exprs() {
                e.push_lambda_bodies(&mut out);
            }
        }
        out
    }

    /// Rebuilds this node with every child id passed through `f`. Used to
    /// copy a subtree into another arena.
    pub fn try_map_children<E>(
        &self,
        f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
    ) -> Result<Node, E> {
        Ok(match self {
            Node::Unit(items) => Node::Unit(map_ids(items, f)?),
            Node::Class(name, members) => Node::Class(name.clone(), map_ids(members, f)?),
            Node::Method(m) => Node::Method(Method {
                name: m.name.clone(),
                params: m.params.clone(),
                body: m.body.map(&mut *f).transpose()?,
            }),
            Node::Stmt(s) => Node::Stmt(s.try_map_children(f)?),
        })
    }
}

fn map_ids<E>(
    ids: &[NodeId],
    f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
) -> Result<Vec<NodeId>, E> {
    ids.iter().map(|id| f(*id)).collect()
}

impl Stmt {
    pub fn kind(&self) -> Kind {
        use Stmt::*;
        match self {
            Block(..) => Kind::Block,
            Empty => Kind::Empty,
            Expr(..) => Kind::Expr,
            VarDecl(..) => Kind::VarDecl,
            If(..) => Kind::If,
            While(..) => Kind::While,
            DoWhile(..) => Kind::DoWhile,
            For(..) => Kind::For,
            ForEach(..) => Kind::ForEach,
            Labeled(..) => Kind::Labeled,
            Switch(..) => Kind::Switch,
            Try(..) => Kind::Try,
            Return(..) => Kind::Return,
            Break(..) => Kind::Break,
            Continue(..) => Kind::Continue,
            Throw(..) => Kind::Throw,
        }
    }

    pub fn is_block(&self) -> bool {
        matches!(self, Stmt::Block(..))
    }

    /// The expressions held directly by this statement, in source order.
    fn exprs(&self) -> Vec<&Expr> {
        use Stmt::*;
        match self {
            Empty | Break(_) | Continue(_) | Return(None) | Block(_) | Labeled(..) | Try(..) => {
                vec![]
            }
            Expr(e) | Throw(e) | Return(Some(e)) => vec![e],
            If(e, ..) | While(e, _) | ForEach(_, e, _) | DoWhile(_, e) => vec![e],
            VarDecl(vds) => vds.iter().filter_map(|vd| vd.init.as_ref()).collect(),
            For(init, test, update, _) => {
                let mut out: Vec<&self::Expr> = match init {
                    ForInit::Exprs(es) => es.iter().collect(),
                    ForInit::Decls(vds) => vds.iter().filter_map(|vd| vd.init.as_ref()).collect(),
                };
                out.extend(test);
                out.extend(update);
                out
            }
            Switch(e, cases) => {
                let mut out = vec![e];
                out.extend(cases.iter().filter_map(|c| c.label.as_ref()));
                out
            }
        }
    }

    fn push_children(&self, out: &mut Vec<NodeId>) {
        use Stmt::*;
        match self {
            // 0
            Empty | Break(_) | Continue(_) | Return(None) => (),
            // 1x[Stmt]
            Block(ss) => out.extend(ss.iter().copied()),
            // 1xExpr
            Expr(e) | Throw(e) | Return(Some(e)) => e.push_lambda_bodies(out),
            VarDecl(vds) => {
                for vd in vds {
                    vd.push_lambda_bodies(out);
                }
            }
            // 1xExpr, 1xStmt, maybe 1xStmt
            If(e, then, other) => {
                e.push_lambda_bodies(out);
                out.push(*then);
                out.extend(*other);
            }
            While(e, body) | ForEach(_, e, body) => {
                e.push_lambda_bodies(out);
                out.push(*body);
            }
            DoWhile(body, e) => {
                out.push(*body);
                e.push_lambda_bodies(out);
            }
            For(init, test, update, body) => {
                match init {
                    ForInit::Exprs(es) => es.iter().for_each(|e| e.push_lambda_bodies(out)),
                    ForInit::Decls(vds) => vds.iter().for_each(|vd| vd.push_lambda_bodies(out)),
                }
                if let Some(test) = test {
                    test.push_lambda_bodies(out);
                }
                update.iter().for_each(|e| e.push_lambda_bodies(out));
                out.push(*body);
            }
            Labeled(_, body) => out.push(*body),
            Switch(e, cases) => {
                e.push_lambda_bodies(out);
                for case in cases {
                    if let Some(label) = &case.label {
                        label.push_lambda_bodies(out);
                    }
                    out.extend(case.body.iter().copied());
                }
            }
            Try(body, catches, finally) => {
                out.push(*body);
                out.extend(catches.iter().map(|c| c.body));
                out.extend(*finally);
            }
        }
    }

    fn try_map_children<E>(
        &self,
        f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
    ) -> Result<Stmt, E> {
        use Stmt::*;
        Ok(match self {
            Empty => Empty,
            Break(l) => Break(l.clone()),
            Continue(l) => Continue(l.clone()),
            Return(e) => Return(e.as_ref().map(|e| e.try_map_lambdas(f)).transpose()?),
            Block(ss) => Block(map_ids(ss, f)?),
            Expr(e) => Expr(e.try_map_lambdas(f)?),
            Throw(e) => Throw(e.try_map_lambdas(f)?),
            VarDecl(vds) => VarDecl(
                vds.iter()
                    .map(|vd| vd.try_map_lambdas(f))
                    .collect::<Result<_, _>>()?,
            ),
            If(e, then, other) => If(
                e.try_map_lambdas(f)?,
                f(*then)?,
                other.map(&mut *f).transpose()?,
            ),
            While(e, body) => While(e.try_map_lambdas(f)?, f(*body)?),
            DoWhile(body, e) => {
                let body = f(*body)?;
                DoWhile(body, e.try_map_lambdas(f)?)
            }
            For(init, test, update, body) => {
                let init = match init {
                    ForInit::Exprs(es) => ForInit::Exprs(
                        es.iter()
                            .map(|e| e.try_map_lambdas(f))
                            .collect::<Result<_, _>>()?,
                    ),
                    ForInit::Decls(vds) => ForInit::Decls(
                        vds.iter()
                            .map(|vd| vd.try_map_lambdas(f))
                            .collect::<Result<_, _>>()?,
                    ),
                };
                let test = test.as_ref().map(|e| e.try_map_lambdas(f)).transpose()?;
                let update = update
                    .iter()
                    .map(|e| e.try_map_lambdas(f))
                    .collect::<Result<_, _>>()?;
                For(init, test, update, f(*body)?)
            }
            ForEach(param, e, body) => ForEach(param.clone(), e.try_map_lambdas(f)?, f(*body)?),
            Labeled(label, body) => Labeled(label.clone(), f(*body)?),
            Switch(e, cases) => {
                let e = e.try_map_lambdas(f)?;
                let mut new_cases = Vec::with_capacity(cases.len());
                for case in cases {
                    new_cases.push(Case {
                        label: case
                            .label
                            .as_ref()
                            .map(|l| l.try_map_lambdas(f))
                            .transpose()?,
                        body: map_ids(&case.body, f)?,
                    });
                }
                Switch(e, new_cases)
            }
            Try(body, catches, finally) => {
                let body = f(*body)?;
                let mut new_catches = Vec::with_capacity(catches.len());
                for c in catches {
                    new_catches.push(Catch {
                        param: c.param.clone(),
                        body: f(c.body)?,
                    });
                }
                Try(body, new_catches, finally.map(&mut *f).transpose()?)
            }
        })
    }
}

impl VarDecl {
    fn push_lambda_bodies(&self, out: &mut Vec<NodeId>) {
        if let Some(init) = &self.init {
            init.push_lambda_bodies(out);
        }
    }

    fn try_map_lambdas<E>(
        &self,
        f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
    ) -> Result<VarDecl, E> {
        Ok(VarDecl {
            ty: self.ty.clone(),
            name: self.name.clone(),
            init: self.init.as_ref().map(|e| e.try_map_lambdas(f)).transpose()?,
        })
    }
}

impl Expr {
    fn push_lambda_bodies(&self, out: &mut Vec<NodeId>) {
        use Expr::*;
        match self {
            Lit(_) | Id(_) | This => (),
            Lambda(_, body) => out.push(*body),
            Dot(e, _) | Unary(_, e) | UnaryAssign(_, e) => e.push_lambda_bodies(out),
            New(_, es) => es.iter().for_each(|e| e.push_lambda_bodies(out)),
            Call(e, es) => {
                e.push_lambda_bodies(out);
                es.iter().for_each(|e| e.push_lambda_bodies(out));
            }
            Index(a, b) | Binary(_, a, b) | Assign(_, a, b) => {
                a.push_lambda_bodies(out);
                b.push_lambda_bodies(out);
            }
            Cond(a, b, c) => {
                a.push_lambda_bodies(out);
                b.push_lambda_bodies(out);
                c.push_lambda_bodies(out);
            }
        }
    }

    fn try_map_lambdas<E>(
        &self,
        f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
    ) -> Result<Expr, E> {
        use Expr::*;
        let mut go = |e: &Expr| e.try_map_lambdas(f).map(Box::new);
        Ok(match self {
            Lit(_) | Id(_) | This => self.clone(),
            Lambda(params, body) => Lambda(params.clone(), f(*body)?),
            Dot(e, field) => Dot(go(e)?, field.clone()),
            Unary(op, e) => Unary(*op, go(e)?),
            UnaryAssign(op, e) => UnaryAssign(*op, go(e)?),
            Index(a, b) => Index(go(a)?, go(b)?),
            Binary(op, a, b) => Binary(*op, go(a)?, go(b)?),
            Assign(op, a, b) => Assign(*op, go(a)?, go(b)?),
            Cond(a, b, c) => Cond(go(a)?, go(b)?, go(c)?),
            Call(e, es) => {
                let e = go(e)?;
                Call(e, map_exprs(es, f)?)
            }
            New(class, es) => New(class.clone(), map_exprs(es, f)?),
        })
    }
}

fn map_exprs<E>(
    es: &[Expr],
    f: &mut impl FnMut(NodeId) -> Result<NodeId, E>,
) -> Result<Vec<Expr>, E> {
    es.iter().map(|e| e.try_map_lambdas(f)).collect()
}

/// Read access to nodes by identity. Implemented by [Ast] and by views that
/// layer freshly synthesized nodes over an existing tree.
pub trait Nodes {
    fn node(&self, id: NodeId) -> Option<&Node>;
}

/// An arena of nodes.
///
/// An arena may be stacked on top of another one with [Ast::above], in which
/// case its ids start where the lower arena's ids end. The two arenas can then
/// be read together through a [Layered] view without any id ever denoting two
/// different nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    first: u32,
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Ast {
        Ast::default()
    }

    /// An empty arena whose ids do not overlap with those of `base`.
    pub fn above(base: &Ast) -> Ast {
        Ast {
            first: base.end(),
            nodes: vec![],
        }
    }

    /// One past the largest id this arena can currently hold.
    ///
    /// # Panics
    ///
    /// If the ids of this arena and the ones below it no longer fit in a
    /// `u32`.
    fn end(&self) -> u32 {
        u32::try_from(self.nodes.len())
            .ok()
            .and_then(|n| self.first.checked_add(n))
            .unwrap_or_else(|| panic!("arena holds more than {} nodes", u32::MAX))
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.end());
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        id.0
            .checked_sub(self.first)
            .and_then(|i| self.nodes.get(i as usize))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All ids in allocation order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (self.first..self.end()).map(NodeId)
    }
}

impl Nodes for Ast {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.get(id)
    }
}

/// Two arenas read as one: `top` must have been created with
/// [Ast::above] from `base`, or from an arena stacked on `base`.
#[derive(Debug, Clone, Copy)]
pub struct Layered<'a> {
    pub base: &'a Ast,
    pub top: &'a Ast,
}

impl Nodes for Layered<'_> {
    fn node(&self, id: NodeId) -> Option<&Node> {
        self.base.get(id).or_else(|| self.top.get(id))
    }
}

/// Structural equality of two subtrees, ignoring node identities.
pub fn subtree_eq(lhs: &impl Nodes, a: NodeId, rhs: &impl Nodes, b: NodeId) -> bool {
    match (lhs.node(a), rhs.node(b)) {
        (Some(x), Some(y)) => {
            // Compare the node with its children erased, then the children.
            let erase = |n: &Node| -> Result<Node, ()> { n.try_map_children(&mut |_| Ok(NodeId(0))) };
            if erase(x) != erase(y) {
                return false;
            }
            let (xs, ys) = (x.children(), y.children());
            xs.len() == ys.len()
                && xs
                    .into_iter()
                    .zip(ys)
                    .all(|(c, d)| subtree_eq(lhs, c, rhs, d))
        }
        _ => false,
    }
}
