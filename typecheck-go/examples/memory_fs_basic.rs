//! Typecheck a tiny workspace held entirely in memory.
//!
//! Run with: `cargo run --example memory_fs_basic`

use std::path::Path;
use std::sync::Arc;
use typecheck_go::diagnostics;
use typecheck_go::BuildContext;
use typecheck_go::MemoryFs;
use typecheck_go::Session;

fn main() {
  let mut fs = MemoryFs::new();
  fs.add_file(
    "/goroot/src/io/io.go",
    "package io\n\ntype Writer interface {\n\tWrite(p []byte) (n int, err error)\n}\n",
  );
  fs.add_file(
    "/ws/src/hello/hello.go",
    "package hello\n\nimport \"io\"\n\nfunc Greet(w io.Writer) {}\n\nvar count io.Counter\n",
  );

  let bctx = BuildContext::new("/goroot", vec!["/ws".into()], Arc::new(fs));
  let session = Session::new(Arc::new(bctx));
  let errors = session.check_file(Path::new("/ws/src/hello/hello.go"));
  for diag in diagnostics(&errors, "/ws/src/hello/hello.go") {
    println!(
      "{}:{}:{}: {:?}: {}",
      diag.file, diag.line, diag.column, diag.severity, diag.message
    );
  }
}
