use super::unquote;
use super::Parser;
use crate::ast::Decl;
use crate::ast::DeclKw;
use crate::ast::Field;
use crate::ast::FuncDecl;
use crate::ast::GenDecl;
use crate::ast::Ident;
use crate::ast::ImportSpec;
use crate::ast::Spec;
use crate::ast::TypeSpec;
use crate::ast::ValueSpec;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_decl(&mut self) -> Result<Decl, SyntaxError> {
    let t = self.peek();
    match t.tt {
      TT::KeywordImport => self.parse_gen_decl(DeclKw::Import),
      TT::KeywordConst => self.parse_gen_decl(DeclKw::Const),
      TT::KeywordVar => self.parse_gen_decl(DeclKw::Var),
      TT::KeywordType => self.parse_gen_decl(DeclKw::Type),
      TT::KeywordFunc => self.parse_func_decl(),
      _ => Err(
        t.loc
          .error(SyntaxErrorType::ExpectedSyntax("declaration"), Some(t.tt)),
      ),
    }
  }

  fn parse_gen_decl(&mut self, kw: DeclKw) -> Result<Decl, SyntaxError> {
    let kw_tok = self.next();
    let mut specs = Vec::new();
    let mut end = kw_tok.loc.1;
    if self.eat(TT::ParenOpen) {
      loop {
        while self.eat(TT::Semicolon) {}
        if self.peek().tt == TT::ParenClose {
          end = self.next().loc.1;
          break;
        }
        if self.peek().tt == TT::EOF {
          let t = self.peek();
          return Err(t.loc.error(SyntaxErrorType::UnexpectedEnd, Some(t.tt)));
        }
        specs.push(self.parse_spec(kw)?);
      }
    } else {
      specs.push(self.parse_spec(kw)?);
      end = self.tokens[self.i.saturating_sub(1)].loc.1;
    }
    self.eat(TT::Semicolon);
    Ok(Decl::Gen(GenDecl {
      kw,
      loc: kw_tok.loc.extend(crate::loc::Loc(end, end)),
      specs,
    }))
  }

  fn parse_spec(&mut self, kw: DeclKw) -> Result<Spec, SyntaxError> {
    match kw {
      DeclKw::Import => self.parse_import_spec(),
      DeclKw::Const | DeclKw::Var => self.parse_value_spec(),
      DeclKw::Type => self.parse_type_spec(),
    }
  }

  fn parse_import_spec(&mut self) -> Result<Spec, SyntaxError> {
    let t = self.peek();
    let alias = match t.tt {
      TT::Dot => {
        self.next();
        Some(Ident {
          name: ".".to_string(),
          loc: t.loc,
        })
      }
      TT::Ident => Some(self.ident()?),
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
    Ok(Spec::Import(ImportSpec {
      alias,
      path: unquote(self.text(path_tok.loc)),
      loc: path_tok.loc,
    }))
  }

  fn parse_value_spec(&mut self) -> Result<Spec, SyntaxError> {
    let mut names = vec![self.ident()?];
    while self.eat(TT::Comma) {
      names.push(self.ident()?);
    }
    let typ = if self.starts_type(self.peek().tt) {
      Some(self.parse_type()?)
    } else {
      None
    };
    let mut values = Vec::new();
    if self.eat(TT::Equals) {
      values.push(self.parse_expr()?);
      while self.eat(TT::Comma) {
        values.push(self.parse_expr()?);
      }
    }
    Ok(Spec::Value(ValueSpec { names, typ, values }))
  }

  fn parse_type_spec(&mut self) -> Result<Spec, SyntaxError> {
    let name = self.ident()?;
    let alias = self.eat(TT::Equals);
    let typ = self.parse_type()?;
    Ok(Spec::Type(TypeSpec { name, alias, typ }))
  }

  fn parse_func_decl(&mut self) -> Result<Decl, SyntaxError> {
    self.require(TT::KeywordFunc)?;
    let recv = if self.peek().tt == TT::ParenOpen {
      Some(self.parse_receiver()?)
    } else {
      None
    };
    let name = self.ident()?;
    let sig = self.parse_signature()?;
    let body = if self.peek().tt == TT::BraceOpen {
      Some(self.skip_block()?)
    } else {
      None
    };
    self.eat(TT::Semicolon);
    Ok(Decl::Func(FuncDecl {
      recv,
      name,
      sig,
      body,
    }))
  }

  fn parse_receiver(&mut self) -> Result<Field, SyntaxError> {
    self.require(TT::ParenOpen)?;
    let mut names = Vec::new();
    // `(r T)`, `(r *T)`, `(T)`, or `(*T)`.
    if self.peek().tt == TT::Ident && self.peek_at(1).tt != TT::ParenClose {
      names.push(self.ident()?);
    }
    let typ = self.parse_type()?;
    self.require(TT::ParenClose)?;
    Ok(Field { names, typ })
  }
}
