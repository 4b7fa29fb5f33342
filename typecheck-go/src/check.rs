use crate::build::BuildContext;
use crate::build::ImportMode;
use crate::cancel::CancelToken;
use crate::closure::FilterComputation;
use crate::error::expand_errors;
use crate::error::Error;
use crate::importer::SourceImporter;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing::warn;
use types_go::CheckError;
use types_go::Config;
use types_go::TypeError;

/// One typecheck session: the scope over which all caches are valid.
///
/// A session is not reentrant; run one `check_file` at a time. The
/// cancellation token may be raised from any thread and fails all in-flight
/// work with [`Error::Cancelled`].
pub struct Session {
  bctx: Arc<BuildContext>,
  cancel: CancelToken,
}

impl Session {
  pub fn new(bctx: Arc<BuildContext>) -> Session {
    Session::with_cancel(bctx, CancelToken::new())
  }

  pub fn with_cancel(bctx: Arc<BuildContext>, cancel: CancelToken) -> Session {
    Session { bctx, cancel }
  }

  pub fn cancel_token(&self) -> CancelToken {
    self.cancel.clone()
  }

  /// Typecheck the package containing `filename`, loading the minimum slice
  /// of its dependency graph needed to resolve the package's types. Returns
  /// every error the checker reported; render with
  /// [`diagnostics`](crate::diagnostics).
  pub fn check_file(&self, filename: &Path) -> Vec<Error> {
    match self.check_file_inner(filename) {
      Ok(errors) => errors,
      Err(err) => expand_errors(vec![err]),
    }
  }

  fn check_file_inner(&self, filename: &Path) -> Result<Vec<Error>, Error> {
    let import_path = self.file_import_path(filename)?;

    // Fake import C only holds together when the build context claims cgo;
    // without it, report nothing rather than reporting wrongly.
    if !self.bctx.cgo_enabled {
      warn!("cgo disabled in the build context, skipping typecheck");
      return Ok(Vec::new());
    }

    // Resolving the entry package scans the whole directory; honor
    // cancellation before that I/O like every other import resolution.
    self.cancel.check()?;
    let bp = self
      .bctx
      .import(&import_path, Path::new(""), ImportMode::empty())?;
    let is_test = filename.to_string_lossy().ends_with("_test.go");

    let mut fc = FilterComputation::new(
      self.bctx.clone(),
      vec![bp.dir.clone()],
      self.cancel.clone(),
    );
    if is_test {
      fc.include_test_files(bp.dir.clone());
    }
    fc.run()?;
    let mut importer =
      SourceImporter::new(self.bctx.clone(), fc.into_filters(), self.cancel.clone());

    let names = if is_test {
      &bp.test_go_files
    } else {
      &bp.go_files
    };
    let mut files = Vec::with_capacity(names.len());
    for name in names {
      // Parsing is the expensive step; honor cancellation between files.
      self.cancel.check()?;
      let path = bp.dir.join(name);
      let source = self.bctx.open_source(&path)?;
      let parsed = parse_go::parse(&path.to_string_lossy(), &source);
      if !parsed.errors.is_empty() {
        return Err(Error::parse(&parsed.file, &parsed.errors));
      }
      files.push(parsed.file);
    }

    self.cancel.check()?;
    debug!(path = %import_path, "checking entry package");
    let mut errors: Vec<TypeError> = Vec::new();
    let result = {
      let mut sink = |err: TypeError| errors.push(err);
      let mut cfg = Config {
        ignore_func_bodies: false,
        fake_import_c: true,
        importer: &mut importer,
        error: Some(&mut sink),
      };
      types_go::check(&mut cfg, &import_path, &files)
    };
    if self.cancel.is_cancelled() || matches!(result, Err(CheckError::Cancelled)) {
      return Err(Error::Cancelled);
    }
    // The sink already saw the first hard error the result carries.
    Ok(expand_errors(errors.into_iter().map(Error::Type).collect()))
  }

  /// Import path of the package containing `filename`: its directory
  /// relative to `GOROOT/src` or a matching `GOPATH/src` entry. With no
  /// matching prefix the raw directory is used, which only resolves for
  /// workspaces rooted at the build context.
  fn file_import_path(&self, filename: &Path) -> Result<String, Error> {
    for gopath in &self.bctx.gopath {
      if !gopath.is_absolute() {
        return Err(Error::BadConfig(format!(
          "build context GOPATH must be an absolute path (GOPATH={:?})",
          gopath
        )));
      }
    }
    let pkg_dir = if self.bctx.is_dir(filename) {
      filename.to_path_buf()
    } else {
      filename
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .to_path_buf()
    };
    Ok(self.bctx.derive_import_path(&pkg_dir))
  }
}
