pub mod expr;

pub use expr::*;

use crate::loc::LineIndex;
use crate::loc::Loc;
use ahash::AHashMap;

/// One parsed source file.
///
/// Function bodies are represented only by their source span; every consumer
/// of this AST either skips bodies or is configured to ignore them.
#[derive(Clone, Debug)]
pub struct File {
  pub path: String,
  pub package: Ident,
  pub decls: Vec<Decl>,
  pub line_index: LineIndex,
}

impl File {
  /// All import specs of the file, in source order.
  ///
  /// Derived from `decls` so that stripping declarations is the single source
  /// of truth for which imports remain.
  pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
    self
      .decls
      .iter()
      .filter_map(decl_imports)
      .flatten()
      .filter_map(|spec| match spec {
        Spec::Import(is) => Some(is),
        _ => None,
      })
  }

  /// Top-level scope of the file: declared name to declaring construct.
  ///
  /// Methods never introduce package-scope names. `_` and `init` are not
  /// referenceable and are excluded. Later declarations win on duplicate
  /// names; duplicates are a checker error, not a parser error.
  pub fn scope(&self) -> AHashMap<&str, TopLevelDef<'_>> {
    let mut scope = AHashMap::new();
    for decl in &self.decls {
      match decl {
        Decl::Func(fd) => {
          if fd.recv.is_none() && fd.name.name != "_" && fd.name.name != "init" {
            scope.insert(fd.name.name.as_str(), TopLevelDef::Func(fd));
          }
        }
        Decl::Gen(gd) => {
          for spec in &gd.specs {
            match spec {
              Spec::Value(vs) => {
                for name in &vs.names {
                  if name.name != "_" {
                    scope.insert(name.name.as_str(), TopLevelDef::Value(vs));
                  }
                }
              }
              Spec::Type(ts) => {
                if ts.name.name != "_" {
                  scope.insert(ts.name.name.as_str(), TopLevelDef::Type(ts));
                }
              }
              Spec::Import(_) => {}
            }
          }
        }
        Decl::Bad(_) => {}
      }
    }
    scope
  }
}

fn decl_imports(decl: &Decl) -> Option<&[Spec]> {
  match decl {
    Decl::Gen(gd) if gd.kw == DeclKw::Import => Some(&gd.specs),
    _ => None,
  }
}

/// A top-level declaration, viewed through its declaring construct. This is
/// what file-scope identifiers resolve to.
#[derive(Clone, Copy, Debug)]
pub enum TopLevelDef<'a> {
  Func(&'a FuncDecl),
  Value(&'a ValueSpec),
  Type(&'a TypeSpec),
}

#[derive(Clone, Debug)]
pub enum Decl {
  /// Placeholder emitted when the parser recovers from a syntax error.
  Bad(Loc),
  Gen(GenDecl),
  Func(FuncDecl),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeclKw {
  Import,
  Const,
  Var,
  Type,
}

#[derive(Clone, Debug)]
pub struct GenDecl {
  pub kw: DeclKw,
  pub loc: Loc,
  pub specs: Vec<Spec>,
}

#[derive(Clone, Debug)]
pub enum Spec {
  Import(ImportSpec),
  Value(ValueSpec),
  Type(TypeSpec),
}

#[derive(Clone, Debug)]
pub struct ImportSpec {
  /// Explicit local name, including `.` and `_` forms. `None` means the
  /// binding name is the imported package's declared name.
  pub alias: Option<Ident>,
  /// Unquoted import path.
  pub path: String,
  pub loc: Loc,
}

#[derive(Clone, Debug)]
pub struct ValueSpec {
  pub names: Vec<Ident>,
  pub typ: Option<Expr>,
  pub values: Vec<Expr>,
}

#[derive(Clone, Debug)]
pub struct TypeSpec {
  pub name: Ident,
  /// `type A = B` alias declarations.
  pub alias: bool,
  pub typ: Expr,
}

#[derive(Clone, Debug)]
pub struct FuncDecl {
  /// Receiver field for methods.
  pub recv: Option<Field>,
  pub name: Ident,
  pub sig: FuncType,
  /// Span of the skipped body, if the function has one.
  pub body: Option<Loc>,
}
