use crate::loc::Loc;
use crate::token::TT;
use std::error::Error;
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;

/// A stable classification of syntax errors produced by the lexer and parser.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum SyntaxErrorType {
  ExpectedSyntax(&'static str),
  InvalidCharacter,
  MalformedLiteral,
  RequiredTokenNotFound(TT),
  UnexpectedEnd,
  UnterminatedComment,
  UnterminatedString,
}

#[derive(Clone, Eq, PartialEq)]
pub struct SyntaxError {
  pub typ: SyntaxErrorType,
  pub loc: Loc,
  pub actual: Option<TT>,
}

impl SyntaxError {
  pub fn new(typ: SyntaxErrorType, loc: Loc, actual: Option<TT>) -> SyntaxError {
    SyntaxError { typ, loc, actual }
  }
}

impl Display for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    match &self.typ {
      SyntaxErrorType::ExpectedSyntax(what) => write!(f, "expected {}", what)?,
      SyntaxErrorType::InvalidCharacter => write!(f, "invalid character")?,
      SyntaxErrorType::MalformedLiteral => write!(f, "malformed literal")?,
      SyntaxErrorType::RequiredTokenNotFound(tt) => write!(f, "expected {:?}", tt)?,
      SyntaxErrorType::UnexpectedEnd => write!(f, "unexpected end of file")?,
      SyntaxErrorType::UnterminatedComment => write!(f, "comment not terminated")?,
      SyntaxErrorType::UnterminatedString => write!(f, "string literal not terminated")?,
    };
    if let Some(actual) = self.actual {
      write!(f, ", found {:?}", actual)?;
    }
    Ok(())
  }
}

impl fmt::Debug for SyntaxError {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "SyntaxError at {:?}: {}", self.loc, self)
  }
}

impl Error for SyntaxError {}

pub type SyntaxResult<T> = Result<T, SyntaxError>;

impl Loc {
  pub fn error(self, typ: SyntaxErrorType, actual: Option<TT>) -> SyntaxError {
    SyntaxError::new(typ, self, actual)
  }
}
