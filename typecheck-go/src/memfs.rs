use crate::vfs::DirEntry;
use crate::vfs::FileMeta;
use crate::vfs::FileSystem;
use ahash::AHashMap;
use ahash::AHashSet;
use std::io;
use std::io::Cursor;
use std::io::Read;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// In-memory [`FileSystem`] used by tests, examples, and doc snippets.
///
/// Populate it before wrapping it in an `Arc`; reads are lock-free.
///
/// ```rust
/// use typecheck_go::MemoryFs;
/// let mut fs = MemoryFs::new();
/// fs.add_file("/goroot/src/io/io.go", "package io\n");
/// assert!(typecheck_go::FileSystem::is_dir(&fs, "/goroot/src/io".as_ref()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct MemoryFs {
  files: AHashMap<PathBuf, String>,
  dirs: AHashSet<PathBuf>,
}

impl MemoryFs {
  pub fn new() -> MemoryFs {
    MemoryFs::default()
  }

  /// Add a file, creating all parent directories.
  pub fn add_file(&mut self, path: impl Into<PathBuf>, contents: impl Into<String>) {
    let path = normalize(&path.into());
    let mut dir = path.parent().map(Path::to_path_buf);
    while let Some(d) = dir {
      if !self.dirs.insert(d.clone()) {
        break;
      }
      dir = d.parent().map(Path::to_path_buf);
    }
    self.files.insert(path, contents.into());
  }

  pub fn add_dir(&mut self, path: impl Into<PathBuf>) {
    self.dirs.insert(normalize(&path.into()));
  }
}

fn normalize(path: &Path) -> PathBuf {
  // Collapse `.` and `..` components so build-context joins like
  // `src/./x` or `src/a/../b` hit the same keys the fixture was built with.
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

impl FileSystem for MemoryFs {
  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
    match self.files.get(&normalize(path)) {
      Some(contents) => Ok(Box::new(Cursor::new(contents.clone().into_bytes()))),
      None => Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
      )),
    }
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.dirs.contains(&normalize(path))
  }

  fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
    let path = normalize(path);
    if !self.dirs.contains(&path) {
      return Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such directory: {}", path.display()),
      ));
    }
    let mut entries = Vec::new();
    for file in self.files.keys() {
      if file.parent() == Some(path.as_path()) {
        entries.push(DirEntry {
          name: file.file_name().unwrap_or_default().to_string_lossy().into_owned(),
          is_dir: false,
        });
      }
    }
    for dir in &self.dirs {
      if dir.parent() == Some(path.as_path()) {
        entries.push(DirEntry {
          name: dir.file_name().unwrap_or_default().to_string_lossy().into_owned(),
          is_dir: true,
        });
      }
    }
    entries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entries)
  }

  fn stat(&self, path: &Path) -> io::Result<FileMeta> {
    let path = normalize(path);
    if self.dirs.contains(&path) {
      return Ok(FileMeta {
        is_dir: true,
        size: 0,
      });
    }
    match self.files.get(&path) {
      Some(contents) => Ok(FileMeta {
        is_dir: false,
        size: contents.len() as u64,
      }),
      None => Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!("no such file: {}", path.display()),
      )),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parents_are_created_and_listed() {
    let mut fs = MemoryFs::new();
    fs.add_file("/go/src/strings/reader.go", "package strings\n");
    fs.add_file("/go/src/strings/strings.go", "package strings\n");
    fs.add_file("/go/src/io/io.go", "package io\n");
    assert!(fs.is_dir(Path::new("/go/src")));
    let entries = fs.read_dir(Path::new("/go/src/strings")).unwrap();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, ["reader.go", "strings.go"]);
    let src = fs.read_dir(Path::new("/go/src")).unwrap();
    assert!(src.iter().all(|e| e.is_dir));
  }

  #[test]
  fn open_reads_contents() {
    let mut fs = MemoryFs::new();
    fs.add_file("/f.go", "package f\n");
    let mut out = String::new();
    fs.open(Path::new("/f.go")).unwrap().read_to_string(&mut out).unwrap();
    assert_eq!(out, "package f\n");
  }
}
