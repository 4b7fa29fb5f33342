use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::lex::lex;
use crate::token::Token;
use crate::token::TT;

/// Package clause and import block of one file, without parsing declarations.
///
/// Build contexts classify files by header only; parsing whole files just to
/// learn the package name would defeat the laziness of everything downstream.
#[derive(Clone, Debug)]
pub struct FileHeader {
  pub package: String,
  pub imports: Vec<HeaderImport>,
}

#[derive(Clone, Debug)]
pub struct HeaderImport {
  pub alias: Option<String>,
  pub path: String,
}

pub fn parse_header(source: &str) -> Result<FileHeader, SyntaxError> {
  let lexed = lex(source);
  let mut scanner = HeaderScanner {
    source,
    tokens: lexed.tokens,
    i: 0,
  };
  scanner.run()
}

struct HeaderScanner<'a> {
  source: &'a str,
  tokens: Vec<Token>,
  i: usize,
}

impl<'a> HeaderScanner<'a> {
  fn peek(&self) -> Token {
    self.tokens[self.i]
  }

  fn next(&mut self) -> Token {
    let t = self.tokens[self.i];
    if self.i + 1 < self.tokens.len() {
      self.i += 1;
    }
    t
  }

  fn eat(&mut self, tt: TT) -> bool {
    if self.peek().tt == tt {
      self.next();
      true
    } else {
      false
    }
  }

  fn require(&mut self, tt: TT) -> Result<Token, SyntaxError> {
    let t = self.peek();
    if t.tt != tt {
      return Err(t.loc.error(SyntaxErrorType::RequiredTokenNotFound(tt), Some(t.tt)));
    }
    Ok(self.next())
  }

  fn text(&self, t: Token) -> &'a str {
    &self.source[t.loc.0..t.loc.1]
  }

  fn run(&mut self) -> Result<FileHeader, SyntaxError> {
    self.require(TT::KeywordPackage)?;
    let package_tok = self.require(TT::Ident)?;
    let package = self.text(package_tok).to_string();
    self.require(TT::Semicolon)?;
    let mut imports = Vec::new();
    while self.peek().tt == TT::KeywordImport {
      self.next();
      if self.eat(TT::ParenOpen) {
        loop {
          while self.eat(TT::Semicolon) {}
          if self.eat(TT::ParenClose) {
            break;
          }
          imports.push(self.import_spec()?);
        }
      } else {
        imports.push(self.import_spec()?);
      }
      while self.eat(TT::Semicolon) {}
    }
    Ok(FileHeader { package, imports })
  }

  fn import_spec(&mut self) -> Result<HeaderImport, SyntaxError> {
    let t = self.peek();
    let alias = match t.tt {
      TT::Dot => {
        self.next();
        Some(".".to_string())
      }
      TT::Ident => {
        let tok = self.next();
        Some(self.text(tok).to_string())
      }
      _ => None,
    };
    let path_tok = self.peek();
    if !matches!(path_tok.tt, TT::LiteralStr | TT::LiteralStrRaw) {
      return Err(path_tok.loc.error(
        SyntaxErrorType::ExpectedSyntax("import path"),
        Some(path_tok.tt),
      ));
    }
    self.next();
    Ok(HeaderImport {
      alias,
      path: crate::parse::unquote(self.text(path_tok)),
    })
  }
}
