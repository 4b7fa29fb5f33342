use std::fs;
use std::io;
use std::io::Read;
use std::path::Path;

/// Filesystem view the build context operates through. An outer server
/// overlays open editor buffers on top of the real disk by providing its own
/// implementation; everything in this crate only ever touches these four
/// operations.
///
/// Implementations must be safe to call from multiple threads; parsing fans
/// out one task per file.
pub trait FileSystem: Send + Sync {
  /// Open a file for reading. The stream is closed when dropped.
  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
  fn is_dir(&self, path: &Path) -> bool;
  fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>>;
  fn stat(&self, path: &Path) -> io::Result<FileMeta>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirEntry {
  pub name: String,
  pub is_dir: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileMeta {
  pub is_dir: bool,
  pub size: u64,
}

/// The real filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
    Ok(Box::new(fs::File::open(path)?))
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }

  fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(path)? {
      let entry = entry?;
      entries.push(DirEntry {
        name: entry.file_name().to_string_lossy().into_owned(),
        is_dir: entry.file_type().map(|t| t.is_dir()).unwrap_or(false),
      });
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
  }

  fn stat(&self, path: &Path) -> io::Result<FileMeta> {
    let meta = fs::metadata(path)?;
    Ok(FileMeta {
      is_dir: meta.is_dir(),
      size: meta.len(),
    })
  }
}
