use once_cell::sync::Lazy;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Kind of a package-scope object.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObjKind {
  Const,
  Var,
  Type,
  Func,
}

/// Package scope: declared top-level names and their kinds. Iteration order is
/// deterministic so export listings are stable.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scope {
  objects: BTreeMap<String, ObjKind>,
}

impl Scope {
  pub fn insert(&mut self, name: impl Into<String>, kind: ObjKind) -> Option<ObjKind> {
    self.objects.insert(name.into(), kind)
  }

  pub fn get(&self, name: &str) -> Option<ObjKind> {
    self.objects.get(name).copied()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.objects.contains_key(name)
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.objects.keys().map(|s| s.as_str())
  }

  pub fn len(&self) -> usize {
    self.objects.len()
  }

  pub fn is_empty(&self) -> bool {
    self.objects.is_empty()
  }
}

/// A checked package: canonical import path, declared name, and top-level
/// scope. `complete` distinguishes fully checked packages from placeholders
/// that must not be augmented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Package {
  path: String,
  name: String,
  scope: Scope,
  complete: bool,
}

impl Package {
  pub fn new(path: impl Into<String>, name: impl Into<String>, scope: Scope) -> Package {
    Package {
      path: path.into(),
      name: name.into(),
      scope,
      complete: false,
    }
  }

  pub fn path(&self) -> &str {
    &self.path
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn scope(&self) -> &Scope {
    &self.scope
  }

  pub fn complete(&self) -> bool {
    self.complete
  }

  pub fn mark_complete(&mut self) {
    self.complete = true;
  }
}

/// Whether a Go identifier is exported.
pub fn is_exported(name: &str) -> bool {
  name.chars().next().is_some_and(|c| c.is_uppercase())
}

static UNSAFE: Lazy<Arc<Package>> = Lazy::new(|| {
  let mut scope = Scope::default();
  scope.insert("ArbitraryType", ObjKind::Type);
  scope.insert("Pointer", ObjKind::Type);
  scope.insert("Sizeof", ObjKind::Func);
  scope.insert("Alignof", ObjKind::Func);
  scope.insert("Offsetof", ObjKind::Func);
  let mut pkg = Package::new("unsafe", "unsafe", scope);
  pkg.mark_complete();
  Arc::new(pkg)
});

/// The `unsafe` package known to the checker. Importing `unsafe` never reads
/// source files.
pub fn unsafe_package() -> Arc<Package> {
  UNSAFE.clone()
}
