use crate::importer::ImportMode;
use crate::importer::ImporterFrom;
use crate::package::is_exported;
use crate::package::ObjKind;
use crate::package::Package;
use crate::package::Scope;
use crate::universe::predeclared;
use ahash::AHashMap;
use parse_go::ast::Decl;
use parse_go::ast::DeclKw;
use parse_go::ast::Expr;
use parse_go::ast::Field;
use parse_go::ast::File;
use parse_go::ast::FuncType;
use parse_go::ast::Ident;
use parse_go::ast::Spec;
use parse_go::loc::Loc;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// A single diagnostic from the checker. Positions are one-based.
///
/// `soft` errors describe conclusively broken hygiene (such as unused
/// imports) that still leaves the package usable by importers; hard errors
/// mean the package's surface could not be fully resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{path}:{line}:{column}: {message}")]
pub struct TypeError {
  pub path: String,
  pub line: u32,
  pub column: u32,
  pub message: String,
  pub soft: bool,
}

#[derive(Debug, Error)]
pub enum CheckError {
  /// The importer observed a raised cancellation signal; no result.
  #[error("operation cancelled")]
  Cancelled,
  /// The first hard error. Soft errors never abort a check and are only
  /// delivered through the error sink.
  #[error("{0}")]
  Type(TypeError),
}

/// Checker configuration, deliberately shaped like a standard `types.Config`:
/// a continue-after-error sink, an import callback, and the two mode flags
/// the pruning pipeline depends on.
pub struct Config<'a> {
  /// Skip function bodies. This checker resolves declarations only, so the
  /// flag exists for configuration parity and is always honored.
  pub ignore_func_bodies: bool,
  /// Treat `import "C"` as a valid no-op instead of resolving it.
  pub fake_import_c: bool,
  pub importer: &'a mut dyn ImporterFrom,
  /// Receives every error, hard and soft, in source order per file.
  pub error: Option<&'a mut dyn FnMut(TypeError)>,
}

/// Type-check a package at declaration granularity.
///
/// On success the returned package is complete. A hard error yields
/// `CheckError::Type` carrying the first hard error; the sink (if any) has
/// already seen every error.
pub fn check(
  cfg: &mut Config,
  pkg_path: &str,
  files: &[File],
) -> Result<Arc<Package>, CheckError> {
  let mut checker = Checker {
    cfg,
    first_hard: None,
  };
  checker.check_package(pkg_path, files)
}

struct Checker<'c, 'a> {
  cfg: &'c mut Config<'a>,
  first_hard: Option<TypeError>,
}

struct Binding {
  pkg: Arc<Package>,
  import_path: String,
  loc: Loc,
  used: bool,
}

#[derive(Default)]
struct FileCtx {
  bindings: AHashMap<String, Binding>,
  dot: Vec<Binding>,
}

impl<'c, 'a> Checker<'c, 'a> {
  fn report(&mut self, err: TypeError) {
    if !err.soft && self.first_hard.is_none() {
      self.first_hard = Some(err.clone());
    }
    if let Some(sink) = self.cfg.error.as_mut() {
      sink(err);
    }
  }

  fn error_at(&mut self, file: &File, loc: Loc, message: String, soft: bool) {
    let (line, column) = file.line_index.line_col(loc.0);
    self.report(TypeError {
      path: file.path.clone(),
      line,
      column,
      message,
      soft,
    });
  }

  fn check_package(
    &mut self,
    pkg_path: &str,
    files: &[File],
  ) -> Result<Arc<Package>, CheckError> {
    if files.is_empty() {
      let err = TypeError {
        path: pkg_path.to_string(),
        line: 1,
        column: 1,
        message: format!("package {} has no Go files", pkg_path),
        soft: false,
      };
      self.report(err.clone());
      return Err(CheckError::Type(err));
    }

    let pkg_name = files
      .iter()
      .map(|f| f.package.name.clone())
      .find(|n| !n.is_empty())
      .unwrap_or_default();
    for file in files {
      if !file.package.name.is_empty() && file.package.name != pkg_name {
        self.error_at(
          file,
          file.package.loc,
          format!("found packages {} and {}", pkg_name, file.package.name),
          false,
        );
      }
    }

    let scope = self.collect_scope(files);

    for file in files {
      let mut fctx = self.resolve_imports(file)?;
      for decl in &file.decls {
        self.resolve_decl(file, &scope, &mut fctx, decl);
      }
      // With bodies in play an import may be used where this checker does
      // not look, so the soft unused-import errors are only meaningful when
      // bodies are ignored.
      if self.cfg.ignore_func_bodies {
        self.report_unused_imports(file, &fctx);
      }
    }

    if let Some(first) = self.first_hard.take() {
      return Err(CheckError::Type(first));
    }
    let mut pkg = Package::new(pkg_path, pkg_name, scope);
    pkg.mark_complete();
    Ok(Arc::new(pkg))
  }

  fn collect_scope(&mut self, files: &[File]) -> Scope {
    let mut scope = Scope::default();
    for file in files {
      for decl in &file.decls {
        match decl {
          Decl::Func(fd) => {
            if fd.recv.is_none() && fd.name.name != "init" {
              self.declare(file, &fd.name, ObjKind::Func, &mut scope);
            }
          }
          Decl::Gen(gd) => {
            let kind = match gd.kw {
              DeclKw::Const => ObjKind::Const,
              DeclKw::Var => ObjKind::Var,
              DeclKw::Type => ObjKind::Type,
              DeclKw::Import => continue,
            };
            for spec in &gd.specs {
              match spec {
                Spec::Value(vs) => {
                  for name in &vs.names {
                    self.declare(file, name, kind, &mut scope);
                  }
                }
                Spec::Type(ts) => self.declare(file, &ts.name, ObjKind::Type, &mut scope),
                Spec::Import(_) => {}
              }
            }
          }
          Decl::Bad(_) => {}
        }
      }
    }
    scope
  }

  fn declare(&mut self, file: &File, name: &Ident, kind: ObjKind, scope: &mut Scope) {
    if name.name == "_" {
      return;
    }
    if scope.insert(name.name.clone(), kind).is_some() {
      self.error_at(
        file,
        name.loc,
        format!("{} redeclared in this block", name.name),
        false,
      );
    }
  }

  fn resolve_imports(&mut self, file: &File) -> Result<FileCtx, CheckError> {
    let mut fctx = FileCtx::default();
    let src_dir = Path::new(&file.path)
      .parent()
      .unwrap_or_else(|| Path::new(""))
      .to_path_buf();
    let specs: Vec<_> = file
      .imports()
      .map(|s| (s.alias.as_ref().map(|a| a.name.clone()), s.path.clone(), s.loc))
      .collect();
    for (alias, path, loc) in specs {
      if path == "C" {
        if !self.cfg.fake_import_c {
          self.error_at(file, loc, "import \"C\" requires cgo".to_string(), false);
        }
        continue;
      }
      let pkg = match self
        .cfg
        .importer
        .import_from(&path, &src_dir, ImportMode::default())
      {
        Ok(pkg) => pkg,
        Err(err) if err.cancelled => return Err(CheckError::Cancelled),
        Err(err) => {
          self.error_at(
            file,
            loc,
            format!("could not import {} ({})", path, err.message),
            false,
          );
          continue;
        }
      };
      let binding = Binding {
        pkg: pkg.clone(),
        import_path: path,
        loc,
        used: false,
      };
      match alias.as_deref() {
        Some(".") => fctx.dot.push(binding),
        Some("_") => {}
        Some(name) => {
          fctx.bindings.insert(name.to_string(), binding);
        }
        None => {
          fctx.bindings.insert(pkg.name().to_string(), binding);
        }
      }
    }
    Ok(fctx)
  }

  fn report_unused_imports(&mut self, file: &File, fctx: &FileCtx) {
    let mut unused: Vec<&Binding> = fctx
      .bindings
      .values()
      .chain(fctx.dot.iter())
      .filter(|b| !b.used)
      .collect();
    unused.sort_by_key(|b| b.loc.0);
    for binding in unused {
      let message = format!("\"{}\" imported and not used", binding.import_path);
      self.error_at(file, binding.loc, message, true);
    }
  }

  fn resolve_decl(&mut self, file: &File, scope: &Scope, fctx: &mut FileCtx, decl: &Decl) {
    match decl {
      Decl::Bad(loc) => self.error_at(file, *loc, "invalid declaration".to_string(), false),
      Decl::Func(fd) => {
        if let Some(recv) = &fd.recv {
          self.resolve_expr(file, scope, fctx, &recv.typ);
        }
        self.resolve_signature(file, scope, fctx, &fd.sig);
      }
      Decl::Gen(gd) => {
        for spec in &gd.specs {
          match spec {
            Spec::Import(_) => {}
            Spec::Value(vs) => {
              if let Some(typ) = &vs.typ {
                self.resolve_expr(file, scope, fctx, typ);
              }
              for value in &vs.values {
                self.resolve_expr(file, scope, fctx, value);
              }
            }
            Spec::Type(ts) => self.resolve_expr(file, scope, fctx, &ts.typ),
          }
        }
      }
    }
  }

  fn resolve_signature(&mut self, file: &File, scope: &Scope, fctx: &mut FileCtx, sig: &FuncType) {
    self.resolve_fields(file, scope, fctx, &sig.params);
    self.resolve_fields(file, scope, fctx, &sig.results);
  }

  fn resolve_fields(&mut self, file: &File, scope: &Scope, fctx: &mut FileCtx, fields: &[Field]) {
    for field in fields {
      self.resolve_expr(file, scope, fctx, &field.typ);
    }
  }

  fn resolve_ident(&mut self, file: &File, scope: &Scope, fctx: &mut FileCtx, id: &Ident) {
    let name = id.name.as_str();
    if name == "_" || scope.contains(name) || predeclared(name) {
      return;
    }
    if let Some(binding) = fctx.bindings.get_mut(name) {
      binding.used = true;
      return;
    }
    for binding in &mut fctx.dot {
      if is_exported(name) && binding.pkg.scope().contains(name) {
        binding.used = true;
        return;
      }
    }
    self.error_at(file, id.loc, format!("undeclared name: {}", name), false);
  }

  fn resolve_expr(&mut self, file: &File, scope: &Scope, fctx: &mut FileCtx, expr: &Expr) {
    match expr {
      Expr::Bad(loc) => self.error_at(file, *loc, "invalid expression".to_string(), false),
      Expr::Ident(id) => self.resolve_ident(file, scope, fctx, id),
      Expr::Selector { x, sel } => {
        if let Expr::Ident(base) = &**x {
          // Selectors through the cgo pseudo-package typecheck as anything.
          if base.name == "C" && self.cfg.fake_import_c && !scope.contains("C") {
            return;
          }
          if let Some(binding) = fctx.bindings.get_mut(&base.name) {
            binding.used = true;
            let pkg = binding.pkg.clone();
            if !is_exported(&sel.name) {
              self.error_at(
                file,
                sel.loc,
                format!("{} not exported by package {}", sel.name, base.name),
                false,
              );
            } else if !pkg.scope().contains(&sel.name) {
              self.error_at(
                file,
                sel.loc,
                format!("{} not declared by package {}", sel.name, base.name),
                false,
              );
            }
            return;
          }
        }
        self.resolve_expr(file, scope, fctx, x);
      }
      Expr::Ellipsis { elt, .. } => {
        if let Some(elt) = elt {
          self.resolve_expr(file, scope, fctx, elt);
        }
      }
      Expr::Lit(_) => {}
      Expr::FuncLit { sig, .. } => self.resolve_signature(file, scope, fctx, sig),
      Expr::Composite { typ, elts, .. } => {
        if let Some(typ) = typ {
          self.resolve_expr(file, scope, fctx, typ);
        }
        for elt in elts {
          self.resolve_expr(file, scope, fctx, elt);
        }
      }
      Expr::Paren { inner, .. } => self.resolve_expr(file, scope, fctx, inner),
      Expr::Index { x, index, .. } => {
        self.resolve_expr(file, scope, fctx, x);
        self.resolve_expr(file, scope, fctx, index);
      }
      Expr::Slice {
        x, low, high, max, ..
      } => {
        self.resolve_expr(file, scope, fctx, x);
        for part in [low, high, max].into_iter().flatten() {
          self.resolve_expr(file, scope, fctx, part);
        }
      }
      Expr::TypeAssert { x, typ, .. } => {
        self.resolve_expr(file, scope, fctx, x);
        if let Some(typ) = typ {
          self.resolve_expr(file, scope, fctx, typ);
        }
      }
      Expr::Call { func, args, .. } => {
        self.resolve_expr(file, scope, fctx, func);
        for arg in args {
          self.resolve_expr(file, scope, fctx, arg);
        }
      }
      Expr::Star { x, .. } => self.resolve_expr(file, scope, fctx, x),
      Expr::Unary { x, .. } => self.resolve_expr(file, scope, fctx, x),
      Expr::Binary { x, y, .. } => {
        self.resolve_expr(file, scope, fctx, x);
        self.resolve_expr(file, scope, fctx, y);
      }
      Expr::KeyValue { key, value, .. } => {
        // Bare identifier keys are struct field names or map keys resolved
        // against the literal's type, which declaration-level checking does
        // not model.
        if !matches!(&**key, Expr::Ident(_)) {
          self.resolve_expr(file, scope, fctx, key);
        }
        self.resolve_expr(file, scope, fctx, value);
      }
      Expr::ArrayType { len, elt, .. } => {
        if let Some(len) = len {
          self.resolve_expr(file, scope, fctx, len);
        }
        self.resolve_expr(file, scope, fctx, elt);
      }
      Expr::StructType { fields, .. } => self.resolve_fields(file, scope, fctx, fields),
      Expr::FuncType(sig) => self.resolve_signature(file, scope, fctx, sig),
      Expr::InterfaceType { methods, .. } => self.resolve_fields(file, scope, fctx, methods),
      Expr::MapType { key, value, .. } => {
        self.resolve_expr(file, scope, fctx, key);
        self.resolve_expr(file, scope, fctx, value);
      }
      Expr::ChanType { value, .. } => self.resolve_expr(file, scope, fctx, value),
    }
  }
}
