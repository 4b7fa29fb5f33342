use crate::build::BuildContext;
use crate::build::ImportMode;
use crate::build::Package;
use crate::error::Error;
use ahash::AHashMap;
use parse_go::ast::File;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// A resolved import binding of one file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Import {
  /// Local binding name: the explicit alias, or the imported package's
  /// declared name.
  pub name: String,
  /// Directory of the imported package.
  pub src_dir: PathBuf,
  /// The path it was imported with.
  pub import_path: String,
}

/// Maps a file's import statements to [`Import`] bindings, memoizing the two
/// expensive steps separately: path-to-directory resolution (find-only, keyed
/// by importing directory and path) and package loading (keyed by directory,
/// needed only to discover declared names of alias-less imports).
pub struct ImportResolver {
  bctx: Arc<BuildContext>,
  find_cache: AHashMap<(PathBuf, String), PathBuf>,
  pkg_cache: AHashMap<PathBuf, Arc<Package>>,
}

impl ImportResolver {
  pub fn new(bctx: Arc<BuildContext>) -> ImportResolver {
    ImportResolver {
      bctx,
      find_cache: AHashMap::new(),
      pkg_cache: AHashMap::new(),
    }
  }

  /// Resolve all imports of `file`, keyed by local binding name. The
  /// pseudo-package `C` never resolves to a directory and is skipped.
  pub fn resolve(
    &mut self,
    file: &File,
    source_dir: &Path,
  ) -> Result<AHashMap<String, Import>, Error> {
    let mut result = AHashMap::new();
    for spec in file.imports() {
      if spec.path == "C" {
        continue;
      }
      let pkg_dir = self.package_dir(&spec.path, source_dir)?;
      let name = match &spec.alias {
        Some(alias) => alias.name.clone(),
        None => self.package(&pkg_dir)?.name.clone(),
      };
      result.insert(
        name.clone(),
        Import {
          name,
          src_dir: pkg_dir,
          import_path: spec.path.clone(),
        },
      );
    }
    Ok(result)
  }

  /// Directory of the package `import_path` resolves to from `src_dir`.
  pub fn package_dir(&mut self, import_path: &str, src_dir: &Path) -> Result<PathBuf, Error> {
    let key = (src_dir.to_path_buf(), import_path.to_string());
    if let Some(dir) = self.find_cache.get(&key) {
      return Ok(dir.clone());
    }
    let pkg = self.bctx.import(import_path, src_dir, ImportMode::FIND_ONLY)?;
    self.find_cache.insert(key, pkg.dir.clone());
    Ok(pkg.dir)
  }

  fn package(&mut self, pkg_dir: &Path) -> Result<Arc<Package>, Error> {
    if let Some(pkg) = self.pkg_cache.get(pkg_dir) {
      return Ok(pkg.clone());
    }
    let pkg = Arc::new(self.bctx.import_dir(pkg_dir, ImportMode::empty())?);
    self.pkg_cache.insert(pkg_dir.to_path_buf(), pkg.clone());
    Ok(pkg)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::memfs::MemoryFs;

  fn context() -> Arc<BuildContext> {
    let mut fs = MemoryFs::new();
    fs.add_file("/go/src/io/io.go", "package io\n\ntype Writer interface{}\n");
    fs.add_file("/go/src/encoding/json/json.go", "package json\n\nvar X int\n");
    Arc::new(BuildContext::new("/go", vec![], Arc::new(fs)))
  }

  #[test]
  fn alias_skips_package_loading() {
    let mut resolver = ImportResolver::new(context());
    let file = parse_go::parse(
      "/go/src/p/p.go",
      "package p\n\nimport (\n\tj \"encoding/json\"\n\t\"io\"\n)\n",
    )
    .into_result()
    .unwrap();
    let imports = resolver.resolve(&file, Path::new("/go/src/p")).unwrap();
    assert_eq!(imports.len(), 2);
    assert_eq!(imports["j"].import_path, "encoding/json");
    assert_eq!(imports["j"].src_dir, PathBuf::from("/go/src/encoding/json"));
    assert_eq!(imports["io"].name, "io");
  }

  #[test]
  fn unknown_imports_propagate_the_context_error() {
    let mut resolver = ImportResolver::new(context());
    let file = parse_go::parse("/go/src/p/p.go", "package p\n\nimport \"nosuch\"\n")
      .into_result()
      .unwrap();
    assert!(matches!(
      resolver.resolve(&file, Path::new("/go/src/p")),
      Err(Error::Io { .. })
    ));
  }

  #[test]
  fn cgo_pseudo_import_is_skipped() {
    let mut resolver = ImportResolver::new(context());
    let file = parse_go::parse("/go/src/p/p.go", "package p\n\nimport \"C\"\nimport \"io\"\n")
      .into_result()
      .unwrap();
    let imports = resolver.resolve(&file, Path::new("/go/src/p")).unwrap();
    assert_eq!(imports.len(), 1);
    assert!(imports.contains_key("io"));
  }
}
