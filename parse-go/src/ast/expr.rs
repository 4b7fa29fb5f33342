use crate::loc::Loc;

#[derive(Clone, Debug)]
pub struct Ident {
  pub name: String,
  pub loc: Loc,
}

/// A parameter, result, receiver, struct field, or interface method.
///
/// Embedded fields and interface embeddings have no names; interface methods
/// carry their signature as a [`Expr::FuncType`].
#[derive(Clone, Debug)]
pub struct Field {
  pub names: Vec<Ident>,
  pub typ: Expr,
}

#[derive(Clone, Debug)]
pub struct FuncType {
  pub params: Vec<Field>,
  pub results: Vec<Field>,
  pub loc: Loc,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LitKind {
  Int,
  Float,
  Imag,
  Char,
  Str,
}

#[derive(Clone, Debug)]
pub struct BasicLit {
  pub kind: LitKind,
  pub loc: Loc,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UnaryOp {
  Plus,
  Minus,
  Not,
  Xor,
  And,
  Recv,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BinaryOp {
  LogicalOr,
  LogicalAnd,
  Eq,
  Neq,
  Lt,
  Leq,
  Gt,
  Geq,
  Add,
  Sub,
  Or,
  Xor,
  Mul,
  Div,
  Rem,
  Shl,
  Shr,
  And,
  AndNot,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ChanDir {
  Both,
  Send,
  Recv,
}

/// Expressions and type expressions, one variant per Go AST node kind.
///
/// A missing variant in a consumer is a compile-time error; that is the point
/// of modeling the closed set explicitly.
#[derive(Clone, Debug)]
pub enum Expr {
  /// Placeholder emitted when the parser recovers from a syntax error.
  Bad(Loc),
  Ident(Ident),
  Ellipsis {
    loc: Loc,
    elt: Option<Box<Expr>>,
  },
  Lit(BasicLit),
  FuncLit {
    sig: FuncType,
    body: Loc,
  },
  Composite {
    typ: Option<Box<Expr>>,
    elts: Vec<Expr>,
    loc: Loc,
  },
  Paren {
    inner: Box<Expr>,
    loc: Loc,
  },
  Selector {
    x: Box<Expr>,
    sel: Ident,
  },
  Index {
    x: Box<Expr>,
    index: Box<Expr>,
    loc: Loc,
  },
  Slice {
    x: Box<Expr>,
    low: Option<Box<Expr>>,
    high: Option<Box<Expr>>,
    max: Option<Box<Expr>>,
    loc: Loc,
  },
  TypeAssert {
    x: Box<Expr>,
    /// `None` for the `x.(type)` form inside type switches.
    typ: Option<Box<Expr>>,
    loc: Loc,
  },
  Call {
    func: Box<Expr>,
    args: Vec<Expr>,
    loc: Loc,
  },
  Star {
    x: Box<Expr>,
    loc: Loc,
  },
  Unary {
    op: UnaryOp,
    x: Box<Expr>,
    loc: Loc,
  },
  Binary {
    op: BinaryOp,
    x: Box<Expr>,
    y: Box<Expr>,
  },
  KeyValue {
    key: Box<Expr>,
    value: Box<Expr>,
  },
  ArrayType {
    /// `None` for slice types.
    len: Option<Box<Expr>>,
    elt: Box<Expr>,
    loc: Loc,
  },
  StructType {
    fields: Vec<Field>,
    loc: Loc,
  },
  FuncType(FuncType),
  InterfaceType {
    methods: Vec<Field>,
    loc: Loc,
  },
  MapType {
    key: Box<Expr>,
    value: Box<Expr>,
    loc: Loc,
  },
  ChanType {
    dir: ChanDir,
    value: Box<Expr>,
    loc: Loc,
  },
}

impl Expr {
  pub fn loc(&self) -> Loc {
    match self {
      Expr::Bad(loc) => *loc,
      Expr::Ident(id) => id.loc,
      Expr::Ellipsis { loc, .. } => *loc,
      Expr::Lit(lit) => lit.loc,
      Expr::FuncLit { sig, body } => sig.loc.extend(*body),
      Expr::Composite { loc, .. } => *loc,
      Expr::Paren { loc, .. } => *loc,
      Expr::Selector { x, sel } => x.loc().extend(sel.loc),
      Expr::Index { loc, .. } => *loc,
      Expr::Slice { loc, .. } => *loc,
      Expr::TypeAssert { loc, .. } => *loc,
      Expr::Call { loc, .. } => *loc,
      Expr::Star { loc, .. } => *loc,
      Expr::Unary { loc, .. } => *loc,
      Expr::Binary { x, y, .. } => x.loc().extend(y.loc()),
      Expr::KeyValue { key, value } => key.loc().extend(value.loc()),
      Expr::ArrayType { loc, .. } => *loc,
      Expr::StructType { loc, .. } => *loc,
      Expr::FuncType(sig) => sig.loc,
      Expr::InterfaceType { loc, .. } => *loc,
      Expr::MapType { loc, .. } => *loc,
      Expr::ChanType { loc, .. } => *loc,
    }
  }
}
