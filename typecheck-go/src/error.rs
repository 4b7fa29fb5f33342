use parse_go::ast::File;
use parse_go::SyntaxError;
use std::path::PathBuf;
use thiserror::Error;
use types_go::TypeError;

/// One syntax error with its resolved position. Positions are one-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePosition {
  pub line: u32,
  pub column: u32,
  pub message: String,
}

#[derive(Debug, Clone, Error)]
pub enum Error {
  /// File open/read/enumerate failure from the build context.
  #[error("{}: {}", .path.display(), .message)]
  Io { path: PathBuf, message: String },
  /// Malformed source. Carries every error the parser recovered past;
  /// [`expand_errors`] flattens the list into one `Parse` per element.
  #[error("{path}:{}:{}: {}", first(.errors).line, first(.errors).column, first(.errors).message)]
  Parse { path: String, errors: Vec<ParsePosition> },
  /// The walker met a `Bad` declaration or expression sentinel.
  #[error("{path}:{line}:{column}: malformed syntax tree")]
  MalformedAst { path: String, line: u32, column: u32 },
  /// A selector referenced a package alias not among the file's imports.
  #[error("unknown import: {name}")]
  UnresolvedImport { name: String },
  /// The importer re-entered an import already in progress.
  #[error("import cycle through package {path:?}")]
  ImportCycle { path: String },
  /// The package failed to import earlier in this session.
  #[error("package {path:?} previously failed to import, not retrying")]
  PreviouslyFailed { path: String },
  /// The package exists in the session but is incomplete and cannot be
  /// augmented.
  #[error("reimported partially imported package {path:?}")]
  PartialReimport { path: String },
  #[error(transparent)]
  Type(#[from] TypeError),
  /// The session's cancellation signal was raised.
  #[error("operation cancelled")]
  Cancelled,
  /// Caller misuse: absolute import path, relative GOPATH entry, nonzero
  /// import mode.
  #[error("invalid configuration: {0}")]
  BadConfig(String),
}

fn first(errors: &[ParsePosition]) -> &ParsePosition {
  static EMPTY: ParsePosition = ParsePosition {
    line: 1,
    column: 1,
    message: String::new(),
  };
  errors.first().unwrap_or(&EMPTY)
}

impl Error {
  pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Error {
    Error::Io {
      path: path.into(),
      message: err.to_string(),
    }
  }

  /// Wrap the parser's recovered error list with positions resolved against
  /// the file's line index.
  pub fn parse(file: &File, errors: &[SyntaxError]) -> Error {
    Error::Parse {
      path: file.path.clone(),
      errors: errors
        .iter()
        .map(|err| {
          let (line, column) = file.line_index.line_col(err.loc.0);
          ParsePosition {
            line,
            column,
            message: err.to_string(),
          }
        })
        .collect(),
    }
  }

  /// Whether this error came from the checker and was marked soft.
  pub fn is_soft(&self) -> bool {
    matches!(self, Error::Type(e) if e.soft)
  }
}

/// Flatten list-valued errors into one error per element, preserving order.
/// All other errors pass through unchanged.
pub fn expand_errors(errors: Vec<Error>) -> Vec<Error> {
  let mut out = Vec::with_capacity(errors.len());
  for error in errors {
    match error {
      Error::Parse { path, errors } if errors.len() > 1 => {
        for position in errors {
          out.push(Error::Parse {
            path: path.clone(),
            errors: vec![position],
          });
        }
      }
      other => out.push(other),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn expand_splits_parse_error_lists() {
    let errors = vec![
      Error::Cancelled,
      Error::Parse {
        path: "a.go".to_string(),
        errors: vec![
          ParsePosition {
            line: 1,
            column: 1,
            message: "x".to_string(),
          },
          ParsePosition {
            line: 2,
            column: 5,
            message: "y".to_string(),
          },
        ],
      },
    ];
    let expanded = expand_errors(errors);
    assert_eq!(expanded.len(), 3);
    assert!(matches!(&expanded[1], Error::Parse { errors, .. } if errors.len() == 1));
    assert!(matches!(&expanded[2], Error::Parse { errors, .. } if errors[0].line == 2));
  }
}
