use crate::error::Error;
use crate::filter::IdentFilter;
use ahash::AHashMap;
use parse_go::ast::Decl;
use parse_go::ast::DeclKw;
use parse_go::ast::Expr;
use parse_go::ast::Field;
use parse_go::ast::File;
use parse_go::ast::FuncDecl;
use parse_go::ast::GenDecl;
use parse_go::ast::Ident;
use parse_go::ast::ImportSpec;
use parse_go::ast::Spec;
use parse_go::ast::TopLevelDef;
use parse_go::ast::TypeSpec;
use parse_go::ast::ValueSpec;
use parse_go::loc::Loc;
use std::collections::VecDeque;

/// Merged top-level scope of all files in a package.
pub type PackageScope<'a> = AHashMap<&'a str, TopLevelDef<'a>>;

/// A qualified reference `X.Sel` found in a type-relevant position.
#[derive(Clone, Copy, Debug)]
pub struct SelectorRef<'a> {
  pub x: &'a Expr,
  pub sel: &'a Ident,
}

impl<'a> SelectorRef<'a> {
  /// Peel the receiver chain down to a simple identifier. Returns the
  /// package alias and the member adjacent to it: for `a.b.c` that is
  /// `(a, b)`. Chains that bottom out in anything else are not
  /// cross-package references.
  pub fn package_ident(&self) -> Option<(&'a str, &'a str)> {
    fn peel<'a>(x: &'a Expr, sel: &'a Ident) -> Option<(&'a str, &'a str)> {
      match x {
        Expr::Ident(id) => Some((&id.name, &sel.name)),
        Expr::Selector { x, sel } => peel(x, sel),
        _ => None,
      }
    }
    peel(self.x, self.sel)
  }
}

enum DeclItem<'a> {
  Whole(&'a Decl),
  Func(&'a FuncDecl),
}

enum SpecItem<'a> {
  Value {
    spec: &'a ValueSpec,
    /// The spec's single (possibly inherited) initializer is `iota`.
    iota: bool,
  },
  Type(&'a TypeSpec),
  Import(&'a ImportSpec),
}

/// Lazy producer of the qualified references reachable from a file's
/// top-level declarations, filtered by an identifier filter.
///
/// The walker drains three work lists in order: expressions, then
/// specifications, then declarations. Bare identifiers that name another
/// top-level construct in `scope` grow the filter mid-walk and requeue that
/// construct; that is how reachability crosses from one declaration to its
/// file-local helpers.
pub struct SelectorWalker<'a, 'f> {
  file: &'a File,
  decls: VecDeque<DeclItem<'a>>,
  specs: VecDeque<SpecItem<'a>>,
  exprs: VecDeque<&'a Expr>,
  filter: &'f mut IdentFilter,
  scope: &'a PackageScope<'a>,
}

impl<'a, 'f> SelectorWalker<'a, 'f> {
  pub fn new(
    file: &'a File,
    filter: &'f mut IdentFilter,
    scope: &'a PackageScope<'a>,
  ) -> SelectorWalker<'a, 'f> {
    SelectorWalker {
      file,
      decls: file.decls.iter().map(DeclItem::Whole).collect(),
      specs: VecDeque::new(),
      exprs: VecDeque::new(),
      filter,
      scope,
    }
  }

  /// The next qualified reference, or `None` when the walk is finished. The
  /// sequence is consumed exactly once.
  pub fn next_selector(&mut self) -> Result<Option<SelectorRef<'a>>, Error> {
    loop {
      if let Some(expr) = self.exprs.pop_front() {
        if let Some(sel) = self.process_expr(expr)? {
          return Ok(Some(sel));
        }
        continue;
      }
      if let Some(spec) = self.specs.pop_front() {
        self.process_spec(spec)?;
        continue;
      }
      if let Some(decl) = self.decls.pop_front() {
        self.process_decl(decl)?;
        continue;
      }
      return Ok(None);
    }
  }

  fn malformed(&self, loc: Loc) -> Error {
    let (line, column) = self.file.line_index.line_col(loc.0);
    Error::MalformedAst {
      path: self.file.path.clone(),
      line,
      column,
    }
  }

  fn push_signature(&mut self, params: &'a [Field], results: &'a [Field]) {
    for field in params.iter().chain(results) {
      self.exprs.push_back(&field.typ);
    }
  }

  fn process_decl(&mut self, item: DeclItem<'a>) -> Result<(), Error> {
    let decl = match item {
      DeclItem::Func(fd) => return Ok(self.process_func(fd)),
      DeclItem::Whole(decl) => decl,
    };
    match decl {
      Decl::Bad(loc) => Err(self.malformed(*loc)),
      Decl::Func(fd) => Ok(self.process_func(fd)),
      Decl::Gen(gd) => {
        // Imports contribute nothing to reachability.
        if gd.kw != DeclKw::Import {
          self.enqueue_specs(gd);
        }
        Ok(())
      }
    }
  }

  fn process_func(&mut self, fd: &'a FuncDecl) {
    if self.filter.check_func_decl(fd) {
      self.push_signature(&fd.sig.params, &fd.sig.results);
    }
  }

  fn enqueue_specs(&mut self, gd: &'a GenDecl) {
    // In a const group, a spec without initializers repeats the previous
    // initializer list, so `iota` propagates to every later member.
    let mut carried = false;
    for spec in &gd.specs {
      match spec {
        Spec::Value(vs) => {
          let explicit = vs.values.len() == 1 && is_iota(&vs.values[0]);
          if !vs.values.is_empty() {
            carried = explicit;
          }
          let iota = gd.kw == DeclKw::Const && if vs.values.is_empty() { carried } else { explicit };
          self.specs.push_back(SpecItem::Value { spec: vs, iota });
        }
        Spec::Type(ts) => self.specs.push_back(SpecItem::Type(ts)),
        Spec::Import(is) => self.specs.push_back(SpecItem::Import(is)),
      }
    }
  }

  fn process_spec(&mut self, item: SpecItem<'a>) -> Result<(), Error> {
    match item {
      SpecItem::Value { spec, iota } => {
        for (i, name) in spec.names.iter().enumerate() {
          if iota {
            self.filter.add(&name.name);
          }
          if iota || self.filter.check(&name.name) {
            if let Some(typ) = &spec.typ {
              self.exprs.push_back(typ);
            }
            if let Some(value) = spec.values.get(i) {
              self.exprs.push_back(value);
            }
          }
        }
        Ok(())
      }
      SpecItem::Type(ts) => {
        if self.filter.check(&ts.name.name) {
          self.exprs.push_back(&ts.typ);
        }
        Ok(())
      }
      SpecItem::Import(is) => Err(self.malformed(is.loc)),
    }
  }

  fn capture_local(&mut self, id: &Ident) {
    let Some(def) = self.scope.get(id.name.as_str()) else {
      return;
    };
    if self.filter.check(&id.name) {
      return;
    }
    self.filter.add(&id.name);
    match *def {
      TopLevelDef::Func(fd) => self.decls.push_back(DeclItem::Func(fd)),
      TopLevelDef::Value(vs) => self.specs.push_back(SpecItem::Value { spec: vs, iota: false }),
      TopLevelDef::Type(ts) => self.specs.push_back(SpecItem::Type(ts)),
    }
  }

  fn process_expr(&mut self, expr: &'a Expr) -> Result<Option<SelectorRef<'a>>, Error> {
    match expr {
      Expr::Selector { x, sel } => return Ok(Some(SelectorRef { x, sel })),
      Expr::Bad(loc) => return Err(self.malformed(*loc)),
      Expr::Ident(id) => self.capture_local(id),
      Expr::Ellipsis { elt, .. } => {
        if let Some(elt) = elt {
          self.exprs.push_back(elt);
        }
      }
      Expr::Lit(_) => {}
      Expr::FuncLit { sig, .. } => self.push_signature(&sig.params, &sig.results),
      Expr::Composite { typ, elts, .. } => {
        if let Some(typ) = typ {
          self.exprs.push_back(typ);
        }
        self.exprs.extend(elts.iter());
      }
      Expr::Paren { inner, .. } => self.exprs.push_back(inner),
      Expr::Index { x, index, .. } => {
        self.exprs.push_back(x);
        self.exprs.push_back(index);
      }
      Expr::Slice {
        x, low, high, max, ..
      } => {
        self.exprs.push_back(x);
        for part in [low, high, max].into_iter().flatten() {
          self.exprs.push_back(part);
        }
      }
      Expr::TypeAssert { x, typ, .. } => {
        self.exprs.push_back(x);
        if let Some(typ) = typ {
          self.exprs.push_back(typ);
        }
      }
      Expr::Call { func, args, .. } => {
        self.exprs.push_back(func);
        self.exprs.extend(args.iter());
      }
      Expr::Star { x, .. } => self.exprs.push_back(x),
      Expr::Unary { x, .. } => self.exprs.push_back(x),
      Expr::Binary { x, y, .. } => {
        self.exprs.push_back(x);
        self.exprs.push_back(y);
      }
      Expr::KeyValue { key, value } => {
        self.exprs.push_back(key);
        self.exprs.push_back(value);
      }
      Expr::ArrayType { len, elt, .. } => {
        if let Some(len) = len {
          self.exprs.push_back(len);
        }
        self.exprs.push_back(elt);
      }
      Expr::StructType { fields, .. } => {
        for field in fields {
          self.exprs.push_back(&field.typ);
        }
      }
      Expr::FuncType(sig) => self.push_signature(&sig.params, &sig.results),
      Expr::InterfaceType { methods, .. } => {
        for method in methods {
          self.exprs.push_back(&method.typ);
        }
      }
      Expr::MapType { key, value, .. } => {
        self.exprs.push_back(key);
        self.exprs.push_back(value);
      }
      Expr::ChanType { value, .. } => self.exprs.push_back(value),
    }
    Ok(None)
  }
}

fn is_iota(expr: &Expr) -> bool {
  matches!(expr, Expr::Ident(id) if id.name == "iota")
}

/// Merge the top-level scopes of all files of a package. Two files cannot
/// legally declare the same name; on malformed input the later file wins.
pub fn merge_scopes<'a>(files: &'a [std::sync::Arc<File>]) -> PackageScope<'a> {
  let mut scope = PackageScope::new();
  for file in files {
    scope.extend(file.scope());
  }
  scope
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse(source: &str) -> File {
    parse_go::parse("walk.go", source).into_result().unwrap()
  }

  fn drain(file: &File, filter: &mut IdentFilter) -> Vec<(String, String)> {
    let scope_map: PackageScope = file.scope();
    let mut walker = SelectorWalker::new(file, filter, &scope_map);
    let mut out = Vec::new();
    while let Some(sel) = walker.next_selector().unwrap() {
      let (pkg, member) = sel.package_ident().unwrap();
      out.push((pkg.to_string(), member.to_string()));
    }
    out
  }

  #[test]
  fn yields_the_single_qualified_reference() {
    let file = parse("package p\n\nimport \"io\"\n\nfunc W(w io.Writer) {}\n");
    let mut filter = IdentFilter::all();
    let sels = drain(&file, &mut filter);
    assert_eq!(sels, vec![("io".to_string(), "Writer".to_string())]);
  }

  #[test]
  fn filtered_out_declarations_are_skipped() {
    let file = parse(
      "package p\n\nfunc Wanted(w io.Writer) {}\n\nfunc unwanted(s unicode.SpecialCase) {}\n",
    );
    let mut filter = IdentFilter::empty();
    filter.add("Wanted");
    let sels = drain(&file, &mut filter);
    assert_eq!(sels, vec![("io".to_string(), "Writer".to_string())]);
  }

  #[test]
  fn local_helpers_are_captured_and_walked() {
    let file = parse(
      "package p\n\ntype Exported struct { h helper }\n\ntype helper struct { w io.Writer }\n",
    );
    let mut filter = IdentFilter::empty();
    filter.add("Exported");
    let sels = drain(&file, &mut filter);
    // The helper's own declaration is visited again when the declaration
    // list reaches it, so the reference may be reported more than once.
    assert!(!sels.is_empty());
    assert!(sels
      .iter()
      .all(|(pkg, member)| pkg == "io" && member == "Writer"));
    assert!(filter.check("helper"));
  }

  #[test]
  fn iota_groups_are_accepted_whole() {
    let file = parse(
      "package p\n\nconst (\n\tA = iota\n\tB\n\tC\n)\n\nconst D = 4\n",
    );
    let mut filter = IdentFilter::empty();
    drain(&file, &mut filter);
    assert!(filter.check("A"));
    assert!(filter.check("B"));
    assert!(filter.check("C"));
    assert!(!filter.check("D"));
  }

  #[test]
  fn multi_level_selectors_peel_to_the_inner_pair() {
    let file = parse("package p\n\nvar x = a.b.c\n");
    let scope_map: PackageScope = file.scope();
    let mut filter = IdentFilter::all();
    let mut walker = SelectorWalker::new(&file, &mut filter, &scope_map);
    let sel = walker.next_selector().unwrap().unwrap();
    assert_eq!(sel.package_ident(), Some(("a", "b")));
  }

  #[test]
  fn bad_expressions_are_malformed_ast() {
    use parse_go::loc::{LineIndex, Loc};
    let file = File {
      path: "bad.go".to_string(),
      package: Ident {
        name: "p".to_string(),
        loc: Loc(0, 0),
      },
      decls: vec![Decl::Gen(GenDecl {
        kw: DeclKw::Var,
        loc: Loc(0, 0),
        specs: vec![Spec::Value(ValueSpec {
          names: vec![Ident {
            name: "X".to_string(),
            loc: Loc(0, 0),
          }],
          typ: None,
          values: vec![Expr::Bad(Loc(0, 0))],
        })],
      })],
      line_index: LineIndex::new(""),
    };
    let scope_map = PackageScope::new();
    let mut filter = IdentFilter::all();
    let mut walker = SelectorWalker::new(&file, &mut filter, &scope_map);
    assert!(matches!(
      walker.next_selector(),
      Err(Error::MalformedAst { .. })
    ));
  }

  #[test]
  fn function_bodies_are_never_walked() {
    let file = parse(
      "package p\n\nfunc F() int {\n\tvar w io.Writer\n\t_ = w\n\treturn 0\n}\n",
    );
    let mut filter = IdentFilter::all();
    assert!(drain(&file, &mut filter).is_empty());
  }
}
