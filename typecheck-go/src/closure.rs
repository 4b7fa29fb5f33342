use crate::build::BuildContext;
use crate::build::ImportMode;
use crate::cancel::CancelToken;
use crate::error::Error;
use crate::filter::IdentFilter;
use crate::parse_cache::ParseCache;
use crate::resolver::Import;
use crate::resolver::ImportResolver;
use crate::walker::merge_scopes;
use crate::walker::SelectorRef;
use crate::walker::SelectorWalker;
use ahash::AHashMap;
use ahash::AHashSet;
use parse_go::ast::File;
use rayon::prelude::*;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// The closure's output, consumed by the pruning importer: which top-level
/// identifiers of each package matter, and which of each package's imports
/// must survive pruning.
#[derive(Debug, Default)]
pub struct PackageFilters {
  pub ident_filters: AHashMap<PathBuf, IdentFilter>,
  pub import_filters: AHashMap<PathBuf, AHashSet<String>>,
}

/// Worklist traversal of the import graph rooted at the seed packages.
///
/// Each visited package is walked with its current filter; every qualified
/// reference grows the referenced package's filter, and growth puts that
/// package (back) on the frontier. Filters are monotone over a finite
/// universe, so the frontier drains.
pub struct FilterComputation {
  ident_filters: AHashMap<PathBuf, IdentFilter>,
  import_filters: AHashMap<PathBuf, AHashSet<String>>,
  next: Vec<PathBuf>,
  queued: AHashSet<PathBuf>,
  parse_cache: ParseCache,
  bctx: Arc<BuildContext>,
  resolver: ImportResolver,
  cancel: CancelToken,
  /// Seed directory whose in-package test files join the walk.
  test_seed: Option<PathBuf>,
}

impl FilterComputation {
  /// Seed the computation: every seed package starts with an `All` filter.
  pub fn new(bctx: Arc<BuildContext>, seeds: Vec<PathBuf>, cancel: CancelToken) -> FilterComputation {
    let mut fc = FilterComputation {
      ident_filters: AHashMap::new(),
      import_filters: AHashMap::new(),
      next: Vec::new(),
      queued: AHashSet::new(),
      parse_cache: ParseCache::new(),
      resolver: ImportResolver::new(bctx.clone()),
      bctx,
      cancel,
      test_seed: None,
    };
    for seed in seeds {
      fc.ident_filters.insert(seed.clone(), IdentFilter::all());
      fc.enqueue(seed);
    }
    fc
  }

  /// Include in-package test files when walking `dir`. Only meaningful for a
  /// seed; transitive dependencies never contribute test files.
  pub fn include_test_files(&mut self, dir: impl Into<PathBuf>) {
    self.test_seed = Some(dir.into());
  }

  pub fn ident_filters(&self) -> &AHashMap<PathBuf, IdentFilter> {
    &self.ident_filters
  }

  pub fn import_filters(&self) -> &AHashMap<PathBuf, AHashSet<String>> {
    &self.import_filters
  }

  pub fn into_filters(self) -> PackageFilters {
    PackageFilters {
      ident_filters: self.ident_filters,
      import_filters: self.import_filters,
    }
  }

  /// Run to fixed point. Aborts on the first error from any visited package.
  pub fn run(&mut self) -> Result<(), Error> {
    while let Some(dir) = self.next.pop() {
      self.queued.remove(&dir);
      self.cancel.check()?;
      self.process_package_dir(&dir)?;
    }
    Ok(())
  }

  fn enqueue(&mut self, dir: PathBuf) {
    if self.queued.insert(dir.clone()) {
      self.next.push(dir);
    }
  }

  fn process_package_dir(&mut self, dir: &Path) -> Result<(), Error> {
    let bp = self.bctx.import_dir(dir, ImportMode::empty())?;
    let mut names = bp.go_files.clone();
    if self.test_seed.as_deref() == Some(dir) {
      names.extend(bp.test_go_files.iter().cloned());
    }
    debug!(dir = %dir.display(), files = names.len(), "walking package");
    let files = self.parse_files(dir, &names)?;

    let mut idf = self.ident_filters.remove(dir).ok_or_else(|| {
      Error::BadConfig(format!(
        "package {} processed before its filter was seeded",
        dir.display()
      ))
    })?;
    let scope = merge_scopes(&files);
    let imports = self.merge_imports(&files, dir)?;

    // References into the package currently being walked cannot grow the
    // filter mid-walk (the walker holds it); they are folded in after each
    // file and trigger a revisit when new.
    let mut self_adds: Vec<String> = Vec::new();
    for file in files.iter() {
      let mut walker = SelectorWalker::new(file.as_ref(), &mut idf, &scope);
      while let Some(sel) = walker.next_selector()? {
        self.process_selector(sel, dir, &imports, &mut self_adds)?;
      }
      let mut grew = false;
      for name in self_adds.drain(..) {
        grew |= idf.add(&name);
      }
      if grew {
        self.enqueue(dir.to_path_buf());
      }
    }

    self.ident_filters.insert(dir.to_path_buf(), idf);
    Ok(())
  }

  /// Parse all files of one package concurrently. Errors are reconciled
  /// deterministically: the one with the smallest file index wins.
  fn parse_files(&self, dir: &Path, names: &[String]) -> Result<Vec<Arc<File>>, Error> {
    let cache = &self.parse_cache;
    let bctx = &self.bctx;
    let results: Vec<Result<Arc<File>, Error>> = names
      .par_iter()
      .map(|name| cache.parse(bctx, &dir.join(name)))
      .collect();
    results.into_iter().collect()
  }

  fn merge_imports(
    &mut self,
    files: &[Arc<File>],
    dir: &Path,
  ) -> Result<AHashMap<String, Import>, Error> {
    let mut merged = AHashMap::new();
    for file in files {
      merged.extend(self.resolver.resolve(file, dir)?);
    }
    Ok(merged)
  }

  fn process_selector(
    &mut self,
    sel: SelectorRef<'_>,
    src_dir: &Path,
    imports: &AHashMap<String, Import>,
    self_adds: &mut Vec<String>,
  ) -> Result<(), Error> {
    // Chains that do not bottom out in a simple identifier are not
    // cross-package references.
    let Some((alias, member)) = sel.package_ident() else {
      return Ok(());
    };
    let Some(import) = imports.get(alias) else {
      return Err(Error::UnresolvedImport {
        name: alias.to_string(),
      });
    };

    if import.src_dir == src_dir {
      self_adds.push(member.to_string());
    } else {
      let grew = self
        .ident_filters
        .entry(import.src_dir.clone())
        .or_insert_with(IdentFilter::empty)
        .add(member);
      if grew {
        debug!(pkg = %import.src_dir.display(), member, "filter grew");
        self.enqueue(import.src_dir.clone());
      }
    }

    self
      .import_filters
      .entry(src_dir.to_path_buf())
      .or_default()
      .insert(import.import_path.clone());
    Ok(())
  }
}
