use ahash::AHashSet;
use parse_go::ast::Expr;
use parse_go::ast::FuncDecl;

/// A monotone predicate over top-level identifier names.
///
/// `All` marks packages whose entire surface is needed (the seeds). `Named`
/// filters only ever grow; nothing is removed and `All` is never demoted.
/// That monotonicity is what makes the closure computation terminate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IdentFilter {
  All,
  Named(AHashSet<String>),
}

impl IdentFilter {
  pub fn all() -> IdentFilter {
    IdentFilter::All
  }

  pub fn empty() -> IdentFilter {
    IdentFilter::Named(AHashSet::new())
  }

  pub fn is_all(&self) -> bool {
    matches!(self, IdentFilter::All)
  }

  pub fn check(&self, name: &str) -> bool {
    match self {
      IdentFilter::All => true,
      IdentFilter::Named(names) => names.contains(name),
    }
  }

  /// Add a name. Returns true iff the filter grew; the closure engine uses
  /// this to decide whether a package needs reprocessing.
  pub fn add(&mut self, name: &str) -> bool {
    match self {
      IdentFilter::All => false,
      IdentFilter::Named(names) => names.insert(name.to_string()),
    }
  }

  /// Fold `other` into `self`. Returns true iff `self` grew.
  pub fn merge(&mut self, other: IdentFilter) -> bool {
    match (self, other) {
      (IdentFilter::All, _) => false,
      (slot @ IdentFilter::Named(_), IdentFilter::All) => {
        *slot = IdentFilter::All;
        true
      }
      (IdentFilter::Named(names), IdentFilter::Named(other)) => {
        let before = names.len();
        names.extend(other);
        names.len() > before
      }
    }
  }

  /// Decide whether a function declaration is wanted: plain functions by
  /// name, methods by receiver type name, unwrapping a single pointer
  /// indirection.
  pub fn check_func_decl(&self, fd: &FuncDecl) -> bool {
    match &fd.recv {
      None => self.check(&fd.name.name),
      Some(recv) => match receiver_type_name(&recv.typ) {
        Some(name) => self.check(name),
        None => false,
      },
    }
  }

  /// Names in a `Named` filter, for inspection and tests.
  pub fn names(&self) -> Option<&AHashSet<String>> {
    match self {
      IdentFilter::All => None,
      IdentFilter::Named(names) => Some(names),
    }
  }
}

fn receiver_type_name(typ: &Expr) -> Option<&str> {
  match typ {
    Expr::Ident(id) => Some(&id.name),
    Expr::Star { x, .. } => match &**x {
      Expr::Ident(id) => Some(&id.name),
      _ => None,
    },
    _ => None,
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn all_accepts_everything_and_never_grows() {
    let mut f = IdentFilter::all();
    assert!(f.check("anything"));
    assert!(!f.add("anything"));
    assert!(f.is_all());
  }

  #[test]
  fn named_grows_monotonically() {
    let mut f = IdentFilter::empty();
    assert!(!f.check("Reader"));
    assert!(f.add("Reader"));
    assert!(!f.add("Reader"));
    assert!(f.check("Reader"));
  }

  #[test]
  fn merge_promotes_to_all() {
    let mut f = IdentFilter::empty();
    f.add("A");
    assert!(f.merge(IdentFilter::all()));
    assert!(f.is_all());
    assert!(!f.merge(IdentFilter::empty()));
  }

  #[test]
  fn method_receivers_unwrap_one_pointer() {
    let file = parse_go::parse(
      "t.go",
      "package p\n\nfunc (r *Reader) Read(p []byte) (int, error) { return 0, nil }\nfunc Len() int { return 0 }\n",
    )
    .into_result()
    .unwrap();
    let mut f = IdentFilter::empty();
    f.add("Reader");
    let decls: Vec<_> = file.decls.iter().collect();
    let parse_go::ast::Decl::Func(method) = decls[0] else {
      panic!("expected method");
    };
    let parse_go::ast::Decl::Func(func) = decls[1] else {
      panic!("expected func");
    };
    assert!(f.check_func_decl(method));
    assert!(!f.check_func_decl(func));
    f.add("Len");
    assert!(f.check_func_decl(func));
  }
}
