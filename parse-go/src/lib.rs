//! Declaration-level parser for Go source.
//!
//! The parser produces the full top-level structure of a file (imports,
//! const/var/type specs, function and method signatures) while skipping
//! function bodies at the token level; every consumer in this workspace
//! either never looks at bodies or is configured to ignore them. Syntax
//! errors are recovered at declaration boundaries, leaving `Bad` sentinel
//! nodes in the AST and reporting all errors alongside the parsed file.
//!
//! ```rust
//! let parsed = parse_go::parse("reader.go", "package p\n\nfunc Len() int { return 0 }\n");
//! let file = parsed.into_result().unwrap();
//! assert_eq!(file.package.name, "p");
//! assert_eq!(file.decls.len(), 1);
//! ```

pub mod ast;
pub mod error;
pub mod header;
pub mod lex;
pub mod loc;
pub mod parse;
pub mod token;

pub use error::SyntaxError;
pub use error::SyntaxErrorType;
pub use header::parse_header;
pub use header::FileHeader;
pub use parse::parse;
pub use parse::Parsed;
