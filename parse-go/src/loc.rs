use std::cmp::max;
use std::cmp::min;

/// A half-open byte range within a single source file.
///
/// Offsets are UTF-8 byte offsets into the original source text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  pub fn new(start: usize, end: usize) -> Loc {
    Loc(start, end)
  }

  pub fn start(&self) -> usize {
    self.0
  }

  pub fn end(&self) -> usize {
    self.1
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  /// Smallest range covering both `self` and `other`.
  pub fn extend(&self, other: Loc) -> Loc {
    Loc(min(self.0, other.0), max(self.1, other.1))
  }
}

/// Maps byte offsets to one-based line and column numbers.
///
/// Built once per file at parse time so downstream consumers (diagnostics,
/// the checker) never need the source text to report positions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LineIndex {
  // Byte offset of the first byte of each line. Always starts with 0.
  line_starts: Vec<u32>,
}

impl LineIndex {
  pub fn new(source: &str) -> LineIndex {
    let mut line_starts = vec![0u32];
    for (i, b) in source.bytes().enumerate() {
      if b == b'\n' {
        line_starts.push((i + 1) as u32);
      }
    }
    LineIndex { line_starts }
  }

  /// One-based (line, column) of a byte offset. Columns count bytes, matching
  /// the positions the Go toolchain reports.
  pub fn line_col(&self, offset: usize) -> (u32, u32) {
    let offset = offset as u32;
    let line = match self.line_starts.binary_search(&offset) {
      Ok(i) => i,
      Err(i) => i - 1,
    };
    (line as u32 + 1, offset - self.line_starts[line] + 1)
  }
}
