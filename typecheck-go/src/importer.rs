use crate::build::BuildContext;
use crate::build::ImportMode as BuildMode;
use crate::cancel::CancelToken;
use crate::closure::PackageFilters;
use crate::error::Error;
use crate::filter::IdentFilter;
use ahash::AHashMap;
use ahash::AHashSet;
use parse_go::ast::Decl;
use parse_go::ast::DeclKw;
use parse_go::ast::File;
use parse_go::ast::Spec;
use rayon::prelude::*;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use types_go::unsafe_package;
use types_go::CheckError;
use types_go::Config;
use types_go::ImportMode;
use types_go::ImporterError;
use types_go::ImporterFrom;
use types_go::Package;

enum PackageEntry {
  /// Currently being imported; re-entry means an import cycle.
  Importing,
  /// Failed earlier in this session; not retried.
  Failed,
  Complete(Arc<Package>),
}

/// Imports packages from source on demand, pruning each package's ASTs to the
/// filters computed by the closure before typechecking it.
///
/// The importer is the import-resolution callback of the checker it invokes,
/// so dependencies resolve recursively through the same cache.
pub struct SourceImporter {
  bctx: Arc<BuildContext>,
  cancel: CancelToken,
  packages: AHashMap<String, PackageEntry>,
  filters: PackageFilters,
}

impl SourceImporter {
  pub fn new(
    bctx: Arc<BuildContext>,
    filters: PackageFilters,
    cancel: CancelToken,
  ) -> SourceImporter {
    SourceImporter {
      bctx,
      cancel,
      packages: AHashMap::new(),
      filters,
    }
  }

  /// Shorthand for importing with no originating directory.
  pub fn import(&mut self, path: &str) -> Result<Arc<Package>, Error> {
    self.import_package(path, Path::new(""), ImportMode::default())
  }

  /// Import the package `path` resolves to from `src_dir`, building it from
  /// pruned source if this session has not seen it yet.
  pub fn import_package(
    &mut self,
    path: &str,
    src_dir: &Path,
    mode: ImportMode,
  ) -> Result<Arc<Package>, Error> {
    self.cancel.check()?;
    if mode != ImportMode::default() {
      return Err(Error::BadConfig(format!("nonzero import mode {:?}", mode)));
    }

    let bp = if BuildContext::is_local_import(path) {
      self
        .bctx
        .import_dir(&crate::build::clean(&src_dir.join(path)), BuildMode::FIND_ONLY)?
    } else if Path::new(path).is_absolute() {
      return Err(Error::BadConfig(format!(
        "invalid absolute import path {:?}",
        path
      )));
    } else {
      self.bctx.import(path, src_dir, BuildMode::FIND_ONLY)?
    };

    // Known to the checker without reading any source.
    if bp.import_path == "unsafe" {
      return Ok(unsafe_package());
    }

    let key = bp.import_path.clone();
    match self.packages.get(&key) {
      Some(PackageEntry::Importing) => return Err(Error::ImportCycle { path: key }),
      Some(PackageEntry::Failed) => return Err(Error::PreviouslyFailed { path: key }),
      Some(PackageEntry::Complete(pkg)) if !pkg.complete() => {
        return Err(Error::PartialReimport { path: key });
      }
      Some(PackageEntry::Complete(pkg)) => return Ok(pkg.clone()),
      None => {}
    }

    self.packages.insert(key.clone(), PackageEntry::Importing);
    let result = self.load_package(&key, &bp.dir);
    match &result {
      Ok(pkg) => {
        self.packages.insert(key, PackageEntry::Complete(pkg.clone()));
      }
      Err(Error::Type(_)) => {
        // A hard type error poisons the package for the session.
        self.packages.insert(key, PackageEntry::Failed);
      }
      Err(_) => {
        // Leave the slot empty so a later cycle-free attempt may succeed.
        self.packages.remove(&key);
      }
    }
    result
  }

  fn load_package(&mut self, key: &str, dir: &Path) -> Result<Arc<Package>, Error> {
    let bp = self.bctx.import_dir(dir, BuildMode::empty())?;
    let mut filenames = bp.go_files.clone();
    filenames.extend(bp.cgo_files.iter().cloned());

    let idf = self
      .filters
      .ident_filters
      .get(dir)
      .cloned()
      .unwrap_or_else(IdentFilter::empty);
    let imf = self
      .filters
      .import_filters
      .get(dir)
      .cloned()
      .unwrap_or_default();

    let files = self.parse_and_strip(dir, &filenames, &idf, &imf)?;

    debug!(path = key, files = files.len(), "typechecking pruned package");
    let mut cfg = Config {
      ignore_func_bodies: true,
      fake_import_c: true,
      importer: self,
      error: None,
    };
    match types_go::check(&mut cfg, key, &files) {
      Ok(pkg) => Ok(pkg),
      Err(CheckError::Cancelled) => Err(Error::Cancelled),
      Err(CheckError::Type(first_hard)) => Err(Error::Type(first_hard)),
    }
  }

  /// Parse every file in parallel and strip each one in place. The error
  /// with the smallest file index wins.
  fn parse_and_strip(
    &self,
    dir: &Path,
    names: &[String],
    idf: &IdentFilter,
    imf: &AHashSet<String>,
  ) -> Result<Vec<File>, Error> {
    let bctx = &self.bctx;
    let results: Vec<Result<File, Error>> = names
      .par_iter()
      .map(|name| {
        let path = dir.join(name);
        let source = bctx.open_source(&path)?;
        let parsed = parse_go::parse(&path.to_string_lossy(), &source);
        if !parsed.errors.is_empty() {
          return Err(Error::parse(&parsed.file, &parsed.errors));
        }
        let mut file = parsed.file;
        strip_file(&mut file, imf, idf);
        Ok(file)
      })
      .collect();
    results.into_iter().collect()
  }
}

impl ImporterFrom for SourceImporter {
  fn import_from(
    &mut self,
    path: &str,
    src_dir: &Path,
    mode: ImportMode,
  ) -> Result<Arc<Package>, ImporterError> {
    self
      .import_package(path, src_dir, mode)
      .map_err(|err| match err {
        Error::Cancelled => ImporterError::cancelled(),
        other => ImporterError::new(other.to_string()),
      })
  }
}

/// Destructively prune a file: drop every declaration the identifier filter
/// rejects, and every import the import filter does not name. `import "C"`
/// survives unconditionally; the checker's fake-import-C mode absorbs it.
pub fn strip_file(file: &mut File, imports: &AHashSet<String>, idf: &IdentFilter) {
  debug!(file = %file.path, "stripping");
  file.decls.retain_mut(|decl| match decl {
    Decl::Func(fd) => idf.check_func_decl(fd),
    Decl::Gen(gd) => {
      match gd.kw {
        DeclKw::Import => gd.specs.retain(|spec| match spec {
          Spec::Import(is) => is.path == "C" || imports.contains(&is.path),
          _ => false,
        }),
        _ => gd.specs.retain(|spec| match spec {
          Spec::Import(_) => true,
          Spec::Value(vs) => vs.names.iter().any(|name| idf.check(&name.name)),
          Spec::Type(ts) => idf.check(&ts.name.name),
        }),
      }
      !gd.specs.is_empty()
    }
    Decl::Bad(_) => false,
  });
}
