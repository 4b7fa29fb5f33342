use ahash::AHashSet;
use once_cell::sync::Lazy;

static UNIVERSE: Lazy<AHashSet<&'static str>> = Lazy::new(|| {
  [
    // Types.
    "any",
    "bool",
    "byte",
    "comparable",
    "complex64",
    "complex128",
    "error",
    "float32",
    "float64",
    "int",
    "int8",
    "int16",
    "int32",
    "int64",
    "rune",
    "string",
    "uint",
    "uint8",
    "uint16",
    "uint32",
    "uint64",
    "uintptr",
    // Constants.
    "true",
    "false",
    "iota",
    "nil",
    // Builtin functions.
    "append",
    "cap",
    "clear",
    "close",
    "complex",
    "copy",
    "delete",
    "imag",
    "len",
    "make",
    "max",
    "min",
    "new",
    "panic",
    "print",
    "println",
    "real",
    "recover",
  ]
  .into_iter()
  .collect()
});

/// Whether `name` is predeclared in the universe scope.
pub fn predeclared(name: &str) -> bool {
  UNIVERSE.contains(name)
}

#[cfg(test)]
mod tests {
  use super::predeclared;

  #[test]
  fn contains_types_constants_builtins() {
    assert!(predeclared("error"));
    assert!(predeclared("iota"));
    assert!(predeclared("len"));
    assert!(!predeclared("Writer"));
  }
}
