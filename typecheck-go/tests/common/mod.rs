// Not every test file uses every fixture helper.
#![allow(dead_code)]

use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use typecheck_go::BuildContext;
use typecheck_go::DirEntry;
use typecheck_go::FileMeta;
use typecheck_go::FileSystem;
use typecheck_go::MemoryFs;

pub const GOROOT: &str = "/goroot";
pub const GOPATH: &str = "/ws";

/// A miniature standard library shaped like the real one: `strings` pulls in
/// `io`, `unicode`, and `unsafe` through type-relevant positions only.
pub fn std_fs() -> MemoryFs {
  let mut fs = MemoryFs::new();
  fs.add_file(
    "/goroot/src/strings/strings.go",
    r#"package strings

import "unicode"

// Count counts the number of non-overlapping instances of substr in s.
func Count(s, substr string) int {
	n := 0
	return n
}

func ToUpperSpecial(c unicode.SpecialCase, s string) string {
	return s
}
"#,
  );
  fs.add_file(
    "/goroot/src/strings/reader.go",
    r#"package strings

import "io"

type Reader struct {
	s        string
	i        int64
	prevRune int
}

func (r *Reader) Len() int {
	return 0
}

func (r *Reader) WriteTo(w io.Writer) (n int64, err error) {
	return 0, nil
}

func NewReader(s string) *Reader {
	return &Reader{s, 0, -1}
}
"#,
  );
  fs.add_file(
    "/goroot/src/strings/builder.go",
    r#"package strings

import "unsafe"

type Builder struct {
	addr unsafe.Pointer
	buf  []byte
}

func (b *Builder) String() string {
	return ""
}

func (b *Builder) Grow(n int) {
}
"#,
  );
  fs.add_file(
    "/goroot/src/io/io.go",
    r#"package io

type Writer interface {
	Write(p []byte) (n int, err error)
}

type Reader interface {
	Read(p []byte) (n int, err error)
}
"#,
  );
  fs.add_file(
    "/goroot/src/unicode/unicode.go",
    r#"package unicode

type d [3]rune

type CaseRange struct {
	Lo    uint32
	Hi    uint32
	Delta d
}

type SpecialCase []CaseRange

func IsUpper(r rune) bool {
	return false
}
"#,
  );
  fs.add_file(
    "/goroot/src/unsafe/unsafe.go",
    r#"package unsafe

type ArbitraryType int

type Pointer *ArbitraryType

func Sizeof(x ArbitraryType) uintptr

func Alignof(x ArbitraryType) uintptr
"#,
  );
  fs.add_file(
    "/ws/src/hello/hello.go",
    r#"package hello

import "strings"

var Scratch strings.Builder

func Greet(r *strings.Reader) int {
	return r.Len()
}
"#,
  );
  fs
}

pub fn std_context() -> Arc<BuildContext> {
  Arc::new(BuildContext::new(
    GOROOT,
    vec![PathBuf::from(GOPATH)],
    Arc::new(std_fs()),
  ))
}

pub fn context_with(fs: MemoryFs) -> Arc<BuildContext> {
  Arc::new(BuildContext::new(
    GOROOT,
    vec![PathBuf::from(GOPATH)],
    Arc::new(fs),
  ))
}

pub fn strings_dir() -> PathBuf {
  PathBuf::from("/goroot/src/strings")
}

/// Counts `open` calls so tests can assert that cached work is not redone.
pub struct CountingFs {
  inner: MemoryFs,
  opens: AtomicUsize,
}

impl CountingFs {
  pub fn new(inner: MemoryFs) -> CountingFs {
    CountingFs {
      inner,
      opens: AtomicUsize::new(0),
    }
  }

  pub fn opens(&self) -> usize {
    self.opens.load(Ordering::SeqCst)
  }
}

impl FileSystem for CountingFs {
  fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
    self.opens.fetch_add(1, Ordering::SeqCst);
    self.inner.open(path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.inner.is_dir(path)
  }

  fn read_dir(&self, path: &Path) -> io::Result<Vec<DirEntry>> {
    self.inner.read_dir(path)
  }

  fn stat(&self, path: &Path) -> io::Result<FileMeta> {
    self.inner.stat(path)
  }
}
