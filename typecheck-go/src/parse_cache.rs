use crate::build::BuildContext;
use crate::error::Error;
use ahash::AHashMap;
use parse_go::ast::File;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

/// Memoizes `path -> parsed AST` under concurrent access.
///
/// Entries are never evicted within a session. Racing parsers of the same
/// path may both do the work; the later result overwrites the earlier, which
/// is harmless because parsing is deterministic. The lock is never held
/// across a parse or any I/O.
#[derive(Default)]
pub struct ParseCache {
  files: Mutex<AHashMap<PathBuf, Arc<File>>>,
}

impl ParseCache {
  pub fn new() -> ParseCache {
    ParseCache::default()
  }

  fn lock(&self) -> std::sync::MutexGuard<'_, AHashMap<PathBuf, Arc<File>>> {
    self.files.lock().unwrap_or_else(|e| e.into_inner())
  }

  pub fn get(&self, path: &Path) -> Option<Arc<File>> {
    self.lock().get(path).cloned()
  }

  /// Parse `path` through the build context, consulting the cache first.
  pub fn parse(&self, bctx: &BuildContext, path: &Path) -> Result<Arc<File>, Error> {
    if let Some(file) = self.get(path) {
      return Ok(file);
    }
    let source = bctx.open_source(path)?;
    let parsed = parse_go::parse(&path.to_string_lossy(), &source);
    if !parsed.errors.is_empty() {
      return Err(Error::parse(&parsed.file, &parsed.errors));
    }
    let file = Arc::new(parsed.file);
    self.lock().insert(path.to_path_buf(), file.clone());
    Ok(file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::build::BuildContext;
  use crate::memfs::MemoryFs;

  #[test]
  fn second_parse_hits_the_cache() {
    let mut fs = MemoryFs::new();
    fs.add_file("/go/src/p/p.go", "package p\n\nvar X int\n");
    let bctx = BuildContext::new("/go", vec![], Arc::new(fs));
    let cache = ParseCache::new();
    let a = cache.parse(&bctx, Path::new("/go/src/p/p.go")).unwrap();
    let b = cache.parse(&bctx, Path::new("/go/src/p/p.go")).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
  }

  #[test]
  fn parse_errors_are_not_cached() {
    let mut fs = MemoryFs::new();
    fs.add_file("/go/src/p/p.go", "package p\n\nvar = 1\n");
    let bctx = BuildContext::new("/go", vec![], Arc::new(fs));
    let cache = ParseCache::new();
    assert!(matches!(
      cache.parse(&bctx, Path::new("/go/src/p/p.go")),
      Err(Error::Parse { .. })
    ));
    assert!(cache.get(Path::new("/go/src/p/p.go")).is_none());
  }
}
