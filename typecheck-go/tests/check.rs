use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use typecheck_go::diagnostics;
use typecheck_go::BuildContext;
use typecheck_go::CancelToken;
use typecheck_go::Error;
use typecheck_go::Session;
use typecheck_go::Severity;

mod common;

#[test]
fn clean_entry_package_produces_no_errors() {
  let session = Session::new(common::std_context());
  let errors = session.check_file(Path::new("/ws/src/hello/hello.go"));
  assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn unknown_member_of_a_dependency_is_reported() {
  let mut fs = common::std_fs();
  fs.add_file(
    "/ws/src/oops/oops.go",
    "package oops\n\nimport \"strings\"\n\nvar b strings.Missing\n",
  );
  let session = Session::new(common::context_with(fs));
  let errors = session.check_file(Path::new("/ws/src/oops/oops.go"));
  assert_eq!(errors.len(), 1);
  let Error::Type(err) = &errors[0] else {
    panic!("expected a type error, got {:?}", errors[0]);
  };
  assert!(!err.soft);
  assert!(err.message.contains("Missing not declared by package strings"));
  assert_eq!(err.path, "/ws/src/oops/oops.go");

  let diags = diagnostics(&errors, "/ws/src/oops/oops.go");
  assert_eq!(diags[0].severity, Severity::Error);
  assert_eq!(diags[0].line, 5);
}

#[test]
fn parse_errors_in_the_entry_package_abort() {
  let mut fs = common::std_fs();
  fs.add_file(
    "/ws/src/syn/syn.go",
    "package syn\n\nvar x = +\n\nvar y = )\n",
  );
  let session = Session::new(common::context_with(fs));
  let errors = session.check_file(Path::new("/ws/src/syn/syn.go"));
  assert!(!errors.is_empty());
  assert!(errors.iter().all(|e| matches!(e, Error::Parse { .. })));
  // Expanded: one error per recovered parse failure.
  assert!(errors.len() >= 2, "expected expanded parse errors, got {:?}", errors);
}

#[test]
fn cancellation_yields_exactly_cancelled() {
  let cancel = CancelToken::new();
  cancel.cancel();
  let session = Session::with_cancel(common::std_context(), cancel);
  let errors = session.check_file(Path::new("/ws/src/hello/hello.go"));
  assert_eq!(errors.len(), 1);
  assert!(matches!(errors[0], Error::Cancelled));
}

#[test]
fn cancellation_can_be_cleared_between_checks() {
  let cancel = CancelToken::new();
  let session = Session::with_cancel(common::std_context(), cancel.clone());
  cancel.cancel();
  assert!(matches!(
    session.check_file(Path::new("/ws/src/hello/hello.go"))[0],
    Error::Cancelled
  ));
  cancel.clear();
  assert!(session.check_file(Path::new("/ws/src/hello/hello.go")).is_empty());
}

#[test]
fn test_file_entries_use_the_test_file_set() {
  let mut fs = common::std_fs();
  fs.add_file(
    "/ws/src/app/app.go",
    "package app\n\nvar Exported int\n",
  );
  fs.add_file(
    "/ws/src/app/app_test.go",
    "package app\n\nimport \"strings\"\n\nvar scratch strings.Builder\n",
  );
  let session = Session::new(common::context_with(fs));
  let errors = session.check_file(Path::new("/ws/src/app/app_test.go"));
  assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}

#[test]
fn cgo_disabled_reports_nothing() {
  let mut bctx = BuildContext::new(
    common::GOROOT,
    vec![PathBuf::from(common::GOPATH)],
    Arc::new(common::std_fs()),
  );
  bctx.cgo_enabled = false;
  let session = Session::new(Arc::new(bctx));
  assert!(session.check_file(Path::new("/ws/src/hello/hello.go")).is_empty());
}

#[test]
fn relative_gopath_entries_are_rejected() {
  let bctx = BuildContext::new(
    common::GOROOT,
    vec![PathBuf::from("relative/ws")],
    Arc::new(common::std_fs()),
  );
  let session = Session::new(Arc::new(bctx));
  let errors = session.check_file(Path::new("/ws/src/hello/hello.go"));
  assert_eq!(errors.len(), 1);
  assert!(matches!(&errors[0], Error::BadConfig(msg) if msg.contains("GOPATH")));
}

#[test]
fn soft_errors_surface_as_warnings_in_dependencies_only() {
  // An import of the entry package that the pruned dependency no longer
  // uses would be a false positive; make sure a clean entry stays clean
  // even though its dependency tree was pruned hard.
  let mut fs = common::std_fs();
  fs.add_file(
    "/ws/src/lean/lean.go",
    "package lean\n\nimport \"strings\"\n\nfunc Fill(b *strings.Builder) {}\n",
  );
  let session = Session::new(common::context_with(fs));
  let errors = session.check_file(Path::new("/ws/src/lean/lean.go"));
  assert!(errors.is_empty(), "unexpected errors: {:?}", errors);
}
