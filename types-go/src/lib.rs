//! Package model and declaration-level type checking for Go source.
//!
//! This crate plays the role of the standard type checker in the pruning
//! pipeline: it is configured with a continue-after-error sink, a
//! fake-`import "C"` switch, and an [`ImporterFrom`] callback through which
//! all imports are resolved recursively. Checking is deliberately limited to
//! declaration granularity — package scopes, signatures, type definitions,
//! and const/var initializers — which is exactly the surface that survives
//! AST pruning with function bodies ignored.

mod check;
mod importer;
mod package;
mod universe;

pub use check::check;
pub use check::CheckError;
pub use check::Config;
pub use check::TypeError;
pub use importer::ImportMode;
pub use importer::ImporterError;
pub use importer::ImporterFrom;
pub use package::is_exported;
pub use package::unsafe_package;
pub use package::ObjKind;
pub use package::Package;
pub use package::Scope;
pub use universe::predeclared;

#[cfg(test)]
mod tests {
  use super::*;
  use ahash::AHashMap;
  use std::path::Path;
  use std::sync::Arc;

  struct MapImporter {
    packages: AHashMap<String, Arc<Package>>,
  }

  impl MapImporter {
    fn new() -> MapImporter {
      MapImporter {
        packages: AHashMap::new(),
      }
    }

    fn insert(&mut self, path: &str, name: &str, exports: &[(&str, ObjKind)]) {
      let mut scope = Scope::default();
      for (export, kind) in exports {
        scope.insert(*export, *kind);
      }
      let mut pkg = Package::new(path, name, scope);
      pkg.mark_complete();
      self.packages.insert(path.to_string(), Arc::new(pkg));
    }
  }

  impl ImporterFrom for MapImporter {
    fn import_from(
      &mut self,
      path: &str,
      _src_dir: &Path,
      _mode: ImportMode,
    ) -> Result<Arc<Package>, ImporterError> {
      self
        .packages
        .get(path)
        .cloned()
        .ok_or_else(|| ImporterError::new(format!("cannot find package {:?}", path)))
    }
  }

  fn parse_file(path: &str, source: &str) -> parse_go::ast::File {
    parse_go::parse(path, source).into_result().unwrap()
  }

  fn run_check(
    importer: &mut MapImporter,
    files: &[parse_go::ast::File],
  ) -> (Result<Arc<Package>, CheckError>, Vec<TypeError>) {
    let mut errors = Vec::new();
    let mut sink = |err: TypeError| errors.push(err);
    let mut cfg = Config {
      ignore_func_bodies: true,
      fake_import_c: true,
      importer,
      error: Some(&mut sink),
    };
    let result = check(&mut cfg, "p", files);
    (result, errors)
  }

  #[test]
  fn resolves_qualified_references() {
    let mut importer = MapImporter::new();
    importer.insert("io", "io", &[("Writer", ObjKind::Type)]);
    let file = parse_file(
      "/src/p/p.go",
      "package p\n\nimport \"io\"\n\nfunc New(w io.Writer) io.Writer { return w }\n",
    );
    let (result, errors) = run_check(&mut importer, &[file]);
    let pkg = result.unwrap();
    assert!(pkg.complete());
    assert_eq!(pkg.scope().get("New"), Some(ObjKind::Func));
    assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
  }

  #[test]
  fn undeclared_member_is_a_hard_error() {
    let mut importer = MapImporter::new();
    importer.insert("io", "io", &[("Writer", ObjKind::Type)]);
    let file = parse_file(
      "/src/p/p.go",
      "package p\n\nimport \"io\"\n\nvar w io.Gopher\n",
    );
    let (result, errors) = run_check(&mut importer, &[file]);
    assert!(matches!(result, Err(CheckError::Type(ref e)) if !e.soft));
    assert!(errors.iter().any(|e| e.message.contains("not declared by package io")));
  }

  #[test]
  fn unused_import_is_soft() {
    let mut importer = MapImporter::new();
    importer.insert("io", "io", &[("Writer", ObjKind::Type)]);
    let file = parse_file("/src/p/p.go", "package p\n\nimport \"io\"\n\nvar x int\n");
    let (result, errors) = run_check(&mut importer, &[file]);
    assert!(result.is_ok());
    assert_eq!(errors.len(), 1);
    assert!(errors[0].soft);
    assert!(errors[0].message.contains("imported and not used"));
  }

  #[test]
  fn fake_import_c_skips_resolution() {
    let mut importer = MapImporter::new();
    let file = parse_file("/src/p/p.go", "package p\n\nimport \"C\"\n\nvar x int\n");
    let (result, errors) = run_check(&mut importer, &[file]);
    assert!(result.is_ok(), "unexpected failure: {:?}", errors);
    assert!(errors.is_empty());
  }

  #[test]
  fn redeclaration_across_files() {
    let mut importer = MapImporter::new();
    let a = parse_file("/src/p/a.go", "package p\n\nvar X int\n");
    let b = parse_file("/src/p/b.go", "package p\n\nfunc X() {}\n");
    let (result, errors) = run_check(&mut importer, &[a, b]);
    assert!(result.is_err());
    assert!(errors.iter().any(|e| e.message.contains("redeclared")));
  }

  #[test]
  fn cancelled_importer_aborts_the_check() {
    struct Cancelled;
    impl ImporterFrom for Cancelled {
      fn import_from(
        &mut self,
        _path: &str,
        _src_dir: &Path,
        _mode: ImportMode,
      ) -> Result<Arc<Package>, ImporterError> {
        Err(ImporterError::cancelled())
      }
    }
    let file = parse_file("/src/p/p.go", "package p\n\nimport \"io\"\n\nvar w io.Writer\n");
    let mut importer = Cancelled;
    let mut cfg = Config {
      ignore_func_bodies: true,
      fake_import_c: true,
      importer: &mut importer,
      error: None,
    };
    assert!(matches!(check(&mut cfg, "p", &[file]), Err(CheckError::Cancelled)));
  }

  #[test]
  fn local_and_universe_names_resolve() {
    let mut importer = MapImporter::new();
    let file = parse_file(
      "/src/p/p.go",
      "package p\n\ntype d [3]int32\n\ntype SpecialCase []d\n\nconst (\n\tA = iota\n\tB\n)\n",
    );
    let (result, errors) = run_check(&mut importer, &[file]);
    assert!(result.is_ok(), "unexpected errors: {:?}", errors);
    assert!(errors.is_empty());
  }
}
