use crate::error::Error;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Severity {
  Error,
  Warning,
}

/// A renderable diagnostic. Line and column are one-based, as reported by the
/// checker; protocol layers that need zero-based positions subtract one.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Diagnostic {
  pub file: String,
  pub line: u32,
  pub column: u32,
  pub message: String,
  pub severity: Severity,
}

/// Convert a session's error list into diagnostics.
///
/// List-valued parse errors contribute one diagnostic per element. Soft type
/// errors become warnings. Errors without a source position (cancellation,
/// configuration, I/O) are attributed to `fallback_file` at 1:1.
pub fn diagnostics(errors: &[Error], fallback_file: &str) -> Vec<Diagnostic> {
  let mut out = Vec::with_capacity(errors.len());
  for error in errors {
    match error {
      Error::Parse { path, errors } => {
        for position in errors {
          out.push(Diagnostic {
            file: path.clone(),
            line: position.line,
            column: position.column,
            message: position.message.clone(),
            severity: Severity::Error,
          });
        }
      }
      Error::Type(err) => out.push(Diagnostic {
        file: err.path.clone(),
        line: err.line,
        column: err.column,
        message: err.message.clone(),
        severity: if err.soft {
          Severity::Warning
        } else {
          Severity::Error
        },
      }),
      Error::MalformedAst { path, line, column } => out.push(Diagnostic {
        file: path.clone(),
        line: *line,
        column: *column,
        message: "malformed syntax tree".to_string(),
        severity: Severity::Error,
      }),
      other => out.push(Diagnostic {
        file: fallback_file.to_string(),
        line: 1,
        column: 1,
        message: other.to_string(),
        severity: Severity::Error,
      }),
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::error::ParsePosition;

  #[test]
  fn soft_type_errors_become_warnings() {
    let errors = vec![Error::Type(types_go::TypeError {
      path: "a.go".to_string(),
      line: 3,
      column: 8,
      message: "\"io\" imported and not used".to_string(),
      soft: true,
    })];
    let diags = diagnostics(&errors, "entry.go");
    assert_eq!(diags[0].severity, Severity::Warning);
    assert_eq!(diags[0].line, 3);
  }

  #[test]
  fn parse_lists_fan_out() {
    let errors = vec![Error::Parse {
      path: "a.go".to_string(),
      errors: vec![
        ParsePosition {
          line: 1,
          column: 2,
          message: "x".to_string(),
        },
        ParsePosition {
          line: 4,
          column: 1,
          message: "y".to_string(),
        },
      ],
    }];
    assert_eq!(diagnostics(&errors, "entry.go").len(), 2);
  }

  #[test]
  fn unpositioned_errors_use_the_fallback_file() {
    let diags = diagnostics(&[Error::Cancelled], "entry.go");
    assert_eq!(diags[0].file, "entry.go");
    assert_eq!((diags[0].line, diags[0].column), (1, 1));
  }
}
