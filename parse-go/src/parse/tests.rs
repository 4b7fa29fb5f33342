use super::parse;
use crate::ast::Decl;
use crate::ast::DeclKw;
use crate::ast::Expr;
use crate::ast::Spec;

fn parse_ok(source: &str) -> crate::ast::File {
  let parsed = parse("test.go", source);
  assert!(parsed.errors.is_empty(), "unexpected errors: {:?}", parsed.errors);
  parsed.file
}

#[test]
fn package_clause_and_imports() {
  let file = parse_ok(
    r#"package strings

import (
	"errors"
	"io"
	u "unicode"
	_ "unsafe"
)

import "fmt"
"#,
  );
  assert_eq!(file.package.name, "strings");
  let imports: Vec<_> = file.imports().collect();
  assert_eq!(imports.len(), 5);
  assert_eq!(imports[0].path, "errors");
  assert_eq!(imports[2].path, "unicode");
  assert_eq!(imports[2].alias.as_ref().unwrap().name, "u");
  assert_eq!(imports[3].alias.as_ref().unwrap().name, "_");
  assert_eq!(imports[4].path, "fmt");
}

#[test]
fn func_decl_body_is_skipped() {
  let file = parse_ok(
    r#"package p

func Count(s, substr string) int {
	if substr == "" {
		return len(s) + 1
	}
	return 0
}
"#,
  );
  let Decl::Func(fd) = &file.decls[0] else {
    panic!("expected func decl");
  };
  assert_eq!(fd.name.name, "Count");
  assert_eq!(fd.sig.params.len(), 1);
  assert_eq!(fd.sig.params[0].names.len(), 2);
  assert_eq!(fd.sig.results.len(), 1);
  assert!(fd.body.is_some());
}

#[test]
fn method_with_pointer_receiver() {
  let file = parse_ok("package p\n\nfunc (r *Reader) Len() int { return 0 }\n");
  let Decl::Func(fd) = &file.decls[0] else {
    panic!("expected func decl");
  };
  let recv = fd.recv.as_ref().unwrap();
  assert_eq!(recv.names[0].name, "r");
  assert!(matches!(&recv.typ, Expr::Star { x, .. } if matches!(&**x, Expr::Ident(id) if id.name == "Reader")));
}

#[test]
fn qualified_types_in_signature() {
  let file = parse_ok("package p\n\nfunc Copy(dst io.Writer, src io.Reader) (int64, error)\n");
  let Decl::Func(fd) = &file.decls[0] else {
    panic!("expected func decl");
  };
  assert!(matches!(&fd.sig.params[0].typ, Expr::Selector { x, sel }
    if matches!(&**x, Expr::Ident(id) if id.name == "io") && sel.name == "Writer"));
  assert!(fd.body.is_none());
}

#[test]
fn const_group_with_iota() {
  let file = parse_ok("package p\n\nconst (\n\tA = iota\n\tB\n\tC\n)\n");
  let Decl::Gen(gd) = &file.decls[0] else {
    panic!("expected gen decl");
  };
  assert_eq!(gd.kw, DeclKw::Const);
  assert_eq!(gd.specs.len(), 3);
  let Spec::Value(vs) = &gd.specs[0] else {
    panic!("expected value spec");
  };
  assert_eq!(vs.values.len(), 1);
  let Spec::Value(vs) = &gd.specs[1] else {
    panic!("expected value spec");
  };
  assert!(vs.values.is_empty());
}

#[test]
fn struct_and_interface_types() {
  let file = parse_ok(
    r#"package p

type Reader struct {
	s        string
	i        int64
	prevRune int
}

type Runer interface {
	ReadRune() (ch rune, size int, err error)
	io.Seeker
}
"#,
  );
  let Decl::Gen(gd) = &file.decls[0] else {
    panic!("expected gen decl");
  };
  let Spec::Type(ts) = &gd.specs[0] else {
    panic!("expected type spec");
  };
  let Expr::StructType { fields, .. } = &ts.typ else {
    panic!("expected struct type");
  };
  assert_eq!(fields.len(), 3);
  let Decl::Gen(gd) = &file.decls[1] else {
    panic!("expected gen decl");
  };
  let Spec::Type(ts) = &gd.specs[0] else {
    panic!("expected type spec");
  };
  let Expr::InterfaceType { methods, .. } = &ts.typ else {
    panic!("expected interface type");
  };
  assert_eq!(methods.len(), 2);
  assert!(methods[1].names.is_empty());
}

#[test]
fn composite_literal_initializers() {
  let file = parse_ok(
    "package p\n\nvar replacements = map[string]Entry{\n\t\"a\": {Count: 1},\n\t\"b\": {Count: 2},\n}\n",
  );
  let Decl::Gen(gd) = &file.decls[0] else {
    panic!("expected gen decl");
  };
  let Spec::Value(vs) = &gd.specs[0] else {
    panic!("expected value spec");
  };
  let Expr::Composite { typ, elts, .. } = &vs.values[0] else {
    panic!("expected composite literal");
  };
  assert!(matches!(typ.as_deref(), Some(Expr::MapType { .. })));
  assert_eq!(elts.len(), 2);
}

#[test]
fn embedded_struct_fields() {
  let file = parse_ok("package p\n\ntype W struct {\n\tio.Writer\n\t*Reader\n\tName string `json:\"name\"`\n}\n");
  let Decl::Gen(gd) = &file.decls[0] else {
    panic!("expected gen decl");
  };
  let Spec::Type(ts) = &gd.specs[0] else {
    panic!("expected type spec");
  };
  let Expr::StructType { fields, .. } = &ts.typ else {
    panic!("expected struct type");
  };
  assert!(fields[0].names.is_empty());
  assert!(fields[1].names.is_empty());
  assert_eq!(fields[2].names[0].name, "Name");
}

#[test]
fn recovers_at_declaration_boundaries() {
  let parsed = parse(
    "test.go",
    "package p\n\nvar x = +\n\nfunc OK() int { return 1 }\n",
  );
  assert!(!parsed.errors.is_empty());
  assert!(parsed
    .file
    .decls
    .iter()
    .any(|d| matches!(d, Decl::Bad(_))));
  assert!(parsed
    .file
    .decls
    .iter()
    .any(|d| matches!(d, Decl::Func(fd) if fd.name.name == "OK")));
}

#[test]
fn file_scope_excludes_methods_and_blank() {
  let file = parse_ok(
    "package p\n\nfunc f() {}\nfunc (r Reader) m() {}\nfunc _() {}\nvar a, _ = 1, 2\ntype T int\n",
  );
  let scope = file.scope();
  assert!(scope.contains_key("f"));
  assert!(scope.contains_key("a"));
  assert!(scope.contains_key("T"));
  assert!(!scope.contains_key("m"));
  assert!(!scope.contains_key("_"));
}

#[test]
fn variadic_and_grouped_params() {
  let file = parse_ok("package p\n\nfunc Join(elems []string, sep string, extra ...int) string\n");
  let Decl::Func(fd) = &file.decls[0] else {
    panic!("expected func decl");
  };
  assert_eq!(fd.sig.params.len(), 3);
  assert!(matches!(&fd.sig.params[2].typ, Expr::Ellipsis { .. }));
}
