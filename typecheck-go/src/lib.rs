//! Lazy, demand-driven typechecking of Go packages.
//!
//! Given one entry file, [`Session::check_file`] reports the typecheck errors
//! of that file's package while parsing and typechecking the *minimum* slice
//! of dependent packages needed to resolve the entry package's types. Two
//! engines cooperate:
//!
//! - [`FilterComputation`] runs a worklist closure over the import graph and
//!   produces, per package, an [`IdentFilter`] of the top-level identifiers
//!   that matter and the set of imports that must survive pruning.
//! - [`SourceImporter`] parses each needed package, destructively strips
//!   every declaration and import the filters reject, and typechecks the
//!   remainder with function bodies ignored, serving as its own import
//!   callback so dependencies load recursively and memoized.
//!
//! The filesystem is abstracted behind [`FileSystem`] so an outer server can
//! overlay open editor buffers; [`MemoryFs`] is an in-memory implementation
//! for tests and examples.
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use typecheck_go::{BuildContext, MemoryFs, Session};
//!
//! let mut fs = MemoryFs::new();
//! fs.add_file(
//!   "/goroot/src/io/io.go",
//!   "package io\n\ntype Writer interface {\n\tWrite(p []byte) (n int, err error)\n}\n",
//! );
//! fs.add_file(
//!   "/ws/src/hello/hello.go",
//!   "package hello\n\nimport \"io\"\n\nfunc Greet(w io.Writer) {}\n",
//! );
//! let bctx = BuildContext::new("/goroot", vec!["/ws".into()], Arc::new(fs));
//! let session = Session::new(Arc::new(bctx));
//! let errors = session.check_file(Path::new("/ws/src/hello/hello.go"));
//! assert!(errors.is_empty());
//! ```

mod build;
mod cancel;
mod check;
mod closure;
mod diagnostic;
mod error;
mod filter;
mod importer;
mod memfs;
mod parse_cache;
mod resolver;
mod vfs;
mod walker;

pub use build::BuildContext;
pub use build::ImportMode;
pub use build::Package as BuildPackage;
pub use cancel::CancelToken;
pub use check::Session;
pub use closure::FilterComputation;
pub use closure::PackageFilters;
pub use diagnostic::diagnostics;
pub use diagnostic::Diagnostic;
pub use diagnostic::Severity;
pub use error::expand_errors;
pub use error::Error;
pub use error::ParsePosition;
pub use filter::IdentFilter;
pub use importer::strip_file;
pub use importer::SourceImporter;
pub use memfs::MemoryFs;
pub use parse_cache::ParseCache;
pub use resolver::Import;
pub use resolver::ImportResolver;
pub use vfs::DirEntry;
pub use vfs::FileMeta;
pub use vfs::FileSystem;
pub use vfs::OsFs;
pub use walker::merge_scopes;
pub use walker::PackageScope;
pub use walker::SelectorRef;
pub use walker::SelectorWalker;
