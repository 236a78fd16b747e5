//! Constructor functions, that facilitate building ASTs in code.
use super::syntax::*;

fn param_<T: Into<Id>, N: Into<Id>>(ty: T, name: N) -> Param {
    Param {
        ty: ty.into(),
        name: name.into(),
    }
}

// Declarations and statements allocate, so they live on the arena.
impl Ast {
    fn stmt_(&mut self, s: Stmt) -> NodeId {
        self.alloc(Node::Stmt(s))
    }

    pub fn unit_(&mut self, items: Vec<NodeId>) -> NodeId {
        self.alloc(Node::Unit(items))
    }

    pub fn class_<I: Into<Id>>(&mut self, name: I, members: Vec<NodeId>) -> NodeId {
        self.alloc(Node::Class(name.into(), members))
    }

    /// A method with a body. `params` are `(type, name)` pairs.
    pub fn method_<I: Into<Id>>(
        &mut self,
        name: I,
        params: Vec<(&str, &str)>,
        body: Vec<NodeId>,
    ) -> NodeId {
        let body = self.block_(body);
        self.alloc(Node::Method(Method {
            name: name.into(),
            params: params.into_iter().map(|(t, n)| param_(t, n)).collect(),
            body: Some(body),
        }))
    }

    pub fn abstract_method_<I: Into<Id>>(&mut self, name: I) -> NodeId {
        self.alloc(Node::Method(Method {
            name: name.into(),
            params: vec![],
            body: None,
        }))
    }

    pub fn block_(&mut self, ss: Vec<NodeId>) -> NodeId {
        self.stmt_(Stmt::Block(ss))
    }

    pub fn empty_(&mut self) -> NodeId {
        self.stmt_(Stmt::Empty)
    }

    pub fn expr_(&mut self, e: Expr) -> NodeId {
        self.stmt_(Stmt::Expr(e))
    }

    pub fn vardecl1_<T: Into<Id>, N: Into<Id>>(&mut self, ty: T, name: N, init: Expr) -> NodeId {
        self.stmt_(Stmt::VarDecl(vec![VarDecl {
            ty: ty.into(),
            name: name.into(),
            init: Some(init),
        }]))
    }

    pub fn if_(&mut self, a: Expr, b: NodeId, c: Option<NodeId>) -> NodeId {
        self.stmt_(Stmt::If(a, b, c))
    }

    pub fn while_(&mut self, a: Expr, b: NodeId) -> NodeId {
        self.stmt_(Stmt::While(a, b))
    }

    pub fn dowhile_(&mut self, a: NodeId, b: Expr) -> NodeId {
        self.stmt_(Stmt::DoWhile(a, b))
    }

    pub fn for_(&mut self, a: ForInit, b: Option<Expr>, c: Vec<Expr>, d: NodeId) -> NodeId {
        self.stmt_(Stmt::For(a, b, c, d))
    }

    pub fn foreach_<T: Into<Id>, N: Into<Id>>(
        &mut self,
        ty: T,
        name: N,
        xs: Expr,
        body: NodeId,
    ) -> NodeId {
        self.stmt_(Stmt::ForEach(param_(ty, name), xs, body))
    }

    pub fn label_<I: Into<Id>>(&mut self, a: I, b: NodeId) -> NodeId {
        self.stmt_(Stmt::Labeled(a.into(), b))
    }

    pub fn switch_(&mut self, a: Expr, cases: Vec<(Option<Expr>, Vec<NodeId>)>) -> NodeId {
        let cases = cases
            .into_iter()
            .map(|(label, body)| Case { label, body })
            .collect();
        self.stmt_(Stmt::Switch(a, cases))
    }

    /// `catches` are `(exception type, name, body)` triples.
    pub fn try_(
        &mut self,
        body: NodeId,
        catches: Vec<(&str, &str, NodeId)>,
        finally: Option<NodeId>,
    ) -> NodeId {
        let catches = catches
            .into_iter()
            .map(|(ty, name, body)| Catch {
                param: param_(ty, name),
                body,
            })
            .collect();
        self.stmt_(Stmt::Try(body, catches, finally))
    }

    pub fn return_(&mut self, a: Option<Expr>) -> NodeId {
        self.stmt_(Stmt::Return(a))
    }

    pub fn break_<I: Into<Id>>(&mut self, a: Option<I>) -> NodeId {
        self.stmt_(Stmt::Break(a.map(Into::into)))
    }

    pub fn continue_<I: Into<Id>>(&mut self, a: Option<I>) -> NodeId {
        self.stmt_(Stmt::Continue(a.map(Into::into)))
    }

    pub fn throw_(&mut self, a: Expr) -> NodeId {
        self.stmt_(Stmt::Throw(a))
    }
}

// Expressions
pub const TRUE_: Expr = Expr::Lit(Lit::Bool(true));
pub const FALSE_: Expr = Expr::Lit(Lit::Bool(false));
pub const NULL_: Expr = Expr::Lit(Lit::Null);

pub fn int_(n: i64) -> Expr {
    Expr::Lit(Lit::Int(n))
}

pub fn str_(st: impl Into<String>) -> Expr {
    Expr::Lit(Lit::String(st.into()))
}

pub fn id_<I: Into<Id>>(id: I) -> Expr {
    Expr::Id(id.into())
}

pub fn dot_<I: Into<Id>>(a: Expr, b: I) -> Expr {
    Expr::Dot(Box::new(a), b.into())
}

pub fn index_(a: Expr, b: Expr) -> Expr {
    Expr::Index(Box::new(a), Box::new(b))
}

pub fn call_(a: Expr, b: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(a), b)
}

pub fn new_<I: Into<Id>>(a: I, b: Vec<Expr>) -> Expr {
    Expr::New(a.into(), b)
}

pub fn not_(a: Expr) -> Expr {
    Expr::Unary(UnaryOp::Not, Box::new(a))
}

pub fn binary_(op: BinOp, a: Expr, b: Expr) -> Expr {
    Expr::Binary(op, Box::new(a), Box::new(b))
}

pub fn lt_(a: Expr, b: Expr) -> Expr {
    binary_(BinOp::Lt, a, b)
}

pub fn postinc_(a: Expr) -> Expr {
    Expr::UnaryAssign(UnaryAssignOp::PostInc, Box::new(a))
}

pub fn assign_(a: Expr, b: Expr) -> Expr {
    Expr::Assign(AssignOp::Equal, Box::new(a), Box::new(b))
}

pub fn cond_(a: Expr, b: Expr, c: Expr) -> Expr {
    Expr::Cond(Box::new(a), Box::new(b), Box::new(c))
}

pub fn lambda_<I: Into<Id>>(params: Vec<I>, body: NodeId) -> Expr {
    Expr::Lambda(params.into_iter().map(Into::into).collect(), body)
}

/// `for (int name = 0; name < bound; name++)`, the common case in tests.
pub fn counting_<I: Into<Id>>(name: I, bound: Expr) -> (ForInit, Option<Expr>, Vec<Expr>) {
    let name = name.into();
    (
        ForInit::Decls(vec![VarDecl {
            ty: "int".into(),
            name: name.clone(),
            init: Some(int_(0)),
        }]),
        Some(lt_(id_(name.clone()), bound)),
        vec![postinc_(id_(name))],
    )
}
