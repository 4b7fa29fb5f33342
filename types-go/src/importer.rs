use crate::package::Package;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Import mode passed through [`ImporterFrom::import_from`]. Must be zero;
/// nonzero modes are reserved and rejected by implementations.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ImportMode(pub u32);

/// Error returned by an [`ImporterFrom`].
///
/// `cancelled` is a structured channel for cooperative cancellation: the
/// checker aborts the entire check instead of recording a type error when the
/// importer reports it.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ImporterError {
  pub message: String,
  pub cancelled: bool,
}

impl ImporterError {
  pub fn new(message: impl Into<String>) -> ImporterError {
    ImporterError {
      message: message.into(),
      cancelled: false,
    }
  }

  pub fn cancelled() -> ImporterError {
    ImporterError {
      message: "operation cancelled".to_string(),
      cancelled: true,
    }
  }
}

/// Resolves an import path, relative to the directory of the importing
/// package, to a checked package. The checker calls this for every retained
/// import statement; implementations are expected to memoize.
pub trait ImporterFrom {
  fn import_from(
    &mut self,
    path: &str,
    src_dir: &Path,
    mode: ImportMode,
  ) -> Result<Arc<Package>, ImporterError>;
}
