use crate::error::Error;
use crate::error::ParsePosition;
use crate::vfs::FileSystem;
use bitflags::bitflags;
use parse_go::loc::LineIndex;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

bitflags! {
  /// Import resolution mode.
  #[derive(Clone, Copy, PartialEq, Eq, Debug)]
  pub struct ImportMode: u32 {
    /// Resolve the package directory only; do not enumerate or classify
    /// source files.
    const FIND_ONLY = 1 << 0;
  }
}

/// A resolved build package: its directory and classified source files.
///
/// File lists hold bare file names relative to `dir`, in lexical order.
#[derive(Clone, Debug, Default)]
pub struct Package {
  pub dir: PathBuf,
  /// Canonical import path. For directories outside GOROOT and GOPATH this
  /// degenerates to the directory path itself.
  pub import_path: String,
  /// Declared package name, from the last regular file scanned. Empty in
  /// find-only mode.
  pub name: String,
  pub go_files: Vec<String>,
  /// Files that import "C". Included when importing, tolerated by the
  /// checker's fake-import-C mode; cgo itself is never run.
  pub cgo_files: Vec<String>,
  /// In-package `_test.go` files.
  pub test_go_files: Vec<String>,
  /// `package foo_test` files.
  pub xtest_go_files: Vec<String>,
}

/// Maps import paths to package directories and enumerates package sources,
/// through a pluggable [`FileSystem`].
pub struct BuildContext {
  pub goroot: PathBuf,
  pub gopath: Vec<PathBuf>,
  /// Inspected by the session entry point; cgo is never invoked.
  pub cgo_enabled: bool,
  fs: Arc<dyn FileSystem>,
}

impl BuildContext {
  pub fn new(
    goroot: impl Into<PathBuf>,
    gopath: Vec<PathBuf>,
    fs: Arc<dyn FileSystem>,
  ) -> BuildContext {
    BuildContext {
      goroot: goroot.into(),
      gopath,
      cgo_enabled: true,
      fs,
    }
  }

  pub fn fs(&self) -> &Arc<dyn FileSystem> {
    &self.fs
  }

  pub fn is_dir(&self, path: &Path) -> bool {
    self.fs.is_dir(path)
  }

  /// Read a source file to a string through the filesystem collaborator.
  pub fn open_source(&self, path: &Path) -> Result<String, Error> {
    let mut reader = self.fs.open(path).map_err(|e| Error::io(path, e))?;
    let mut out = String::new();
    reader
      .read_to_string(&mut out)
      .map_err(|e| Error::io(path, e))?;
    Ok(out)
  }

  /// Whether an import path is relative to the importing directory.
  pub fn is_local_import(path: &str) -> bool {
    path == "." || path == ".." || path.starts_with("./") || path.starts_with("../")
  }

  /// Resolve an import path, searching GOROOT then each GOPATH entry.
  pub fn import(&self, path: &str, src_dir: &Path, mode: ImportMode) -> Result<Package, Error> {
    if path.is_empty() {
      return Err(Error::BadConfig("empty import path".to_string()));
    }
    if Self::is_local_import(path) {
      let dir = clean(&src_dir.join(path));
      return self.import_dir(&dir, mode);
    }
    for root in std::iter::once(&self.goroot).chain(self.gopath.iter()) {
      let dir = root.join("src").join(path);
      if self.fs.is_dir(&dir) {
        if mode.contains(ImportMode::FIND_ONLY) {
          return Ok(Package {
            dir,
            import_path: path.to_string(),
            ..Package::default()
          });
        }
        return self.scan_dir(&dir, path.to_string());
      }
    }
    Err(Error::Io {
      path: src_dir.to_path_buf(),
      message: format!("cannot find package {:?} in GOROOT or GOPATH", path),
    })
  }

  /// Resolve a package by directory.
  pub fn import_dir(&self, dir: &Path, mode: ImportMode) -> Result<Package, Error> {
    if !self.fs.is_dir(dir) {
      return Err(Error::Io {
        path: dir.to_path_buf(),
        message: "not a directory".to_string(),
      });
    }
    let import_path = self.derive_import_path(dir);
    if mode.contains(ImportMode::FIND_ONLY) {
      return Ok(Package {
        dir: dir.to_path_buf(),
        import_path,
        ..Package::default()
      });
    }
    self.scan_dir(dir, import_path)
  }

  /// Import path of a directory: the path relative to `GOROOT/src` or a
  /// matching `GOPATH/src`. Directories outside both map to themselves,
  /// which keeps the key canonical even for unrooted workspaces.
  pub fn derive_import_path(&self, dir: &Path) -> String {
    for root in std::iter::once(&self.goroot).chain(self.gopath.iter()) {
      if let Ok(rel) = dir.strip_prefix(root.join("src")) {
        if !rel.as_os_str().is_empty() {
          return rel.to_string_lossy().replace('\\', "/");
        }
      }
    }
    dir.to_string_lossy().into_owned()
  }

  fn scan_dir(&self, dir: &Path, import_path: String) -> Result<Package, Error> {
    let mut entries = self
      .fs
      .read_dir(dir)
      .map_err(|e| Error::io(dir, e))?;
    entries.sort_by(|a, b| a.name.cmp(&b.name));

    let mut pkg = Package {
      dir: dir.to_path_buf(),
      import_path,
      ..Package::default()
    };
    for entry in entries {
      if entry.is_dir
        || !entry.name.ends_with(".go")
        || entry.name.starts_with('_')
        || entry.name.starts_with('.')
      {
        continue;
      }
      let path = dir.join(&entry.name);
      let text = self.open_source(&path)?;
      let header = match parse_go::parse_header(&text) {
        Ok(header) => header,
        Err(err) => {
          let (line, column) = LineIndex::new(&text).line_col(err.loc.0);
          return Err(Error::Parse {
            path: path.to_string_lossy().into_owned(),
            errors: vec![ParsePosition {
              line,
              column,
              message: err.to_string(),
            }],
          });
        }
      };
      if header.package == "documentation" {
        continue;
      }
      if entry.name.ends_with("_test.go") {
        if header.package.ends_with("_test") {
          pkg.xtest_go_files.push(entry.name);
        } else {
          pkg.test_go_files.push(entry.name);
        }
        continue;
      }
      if header.imports.iter().any(|imp| imp.path == "C") {
        pkg.cgo_files.push(entry.name);
      } else {
        pkg.go_files.push(entry.name);
      }
      pkg.name = header.package;
    }
    if pkg.go_files.is_empty()
      && pkg.cgo_files.is_empty()
      && pkg.test_go_files.is_empty()
      && pkg.xtest_go_files.is_empty()
    {
      return Err(Error::Io {
        path: dir.to_path_buf(),
        message: "no buildable Go source files".to_string(),
      });
    }
    Ok(pkg)
  }
}

/// Lexically collapse `.` and `..` components.
pub(crate) fn clean(path: &Path) -> PathBuf {
  let mut out = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        out.pop();
      }
      other => out.push(other.as_os_str()),
    }
  }
  out
}
