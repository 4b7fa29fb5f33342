use super::Parser;
use crate::ast::ChanDir;
use crate::ast::Expr;
use crate::ast::Field;
use crate::ast::FuncType;
use crate::ast::Ident;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;

impl<'a> Parser<'a> {
  pub fn parse_type(&mut self) -> Result<Expr, SyntaxError> {
    let t = self.peek();
    match t.tt {
      TT::Ident => {
        let id = self.ident()?;
        self.qualified(id)
      }
      TT::Asterisk => {
        self.next();
        let x = self.parse_type()?;
        Ok(Expr::Star {
          loc: t.loc.extend(x.loc()),
          x: Box::new(x),
        })
      }
      TT::ParenOpen => {
        self.next();
        let inner = self.parse_type()?;
        let close = self.require(TT::ParenClose)?;
        Ok(Expr::Paren {
          inner: Box::new(inner),
          loc: t.loc.extend(close.loc),
        })
      }
      TT::BracketOpen => self.parse_array_type(),
      TT::KeywordMap => {
        self.next();
        self.require(TT::BracketOpen)?;
        let key = self.parse_type()?;
        self.require(TT::BracketClose)?;
        let value = self.parse_type()?;
        Ok(Expr::MapType {
          loc: t.loc.extend(value.loc()),
          key: Box::new(key),
          value: Box::new(value),
        })
      }
      TT::KeywordChan => {
        self.next();
        let dir = if self.eat(TT::ChevronLeftMinus) {
          ChanDir::Send
        } else {
          ChanDir::Both
        };
        let value = self.parse_type()?;
        Ok(Expr::ChanType {
          dir,
          loc: t.loc.extend(value.loc()),
          value: Box::new(value),
        })
      }
      TT::ChevronLeftMinus => {
        self.next();
        self.require(TT::KeywordChan)?;
        let value = self.parse_type()?;
        Ok(Expr::ChanType {
          dir: ChanDir::Recv,
          loc: t.loc.extend(value.loc()),
          value: Box::new(value),
        })
      }
      TT::KeywordFunc => {
        self.next();
        let sig = self.parse_signature()?;
        Ok(Expr::FuncType(sig))
      }
      TT::KeywordStruct => self.parse_struct_type(),
      TT::KeywordInterface => self.parse_interface_type(),
      _ => Err(t.loc.error(SyntaxErrorType::ExpectedSyntax("type"), Some(t.tt))),
    }
  }

  /// Extend an identifier to a qualified name if a selector follows.
  fn qualified(&mut self, id: Ident) -> Result<Expr, SyntaxError> {
    if self.peek().tt == TT::Dot && self.peek_at(1).tt == TT::Ident {
      self.next();
      let sel = self.ident()?;
      return Ok(Expr::Selector {
        x: Box::new(Expr::Ident(id)),
        sel,
      });
    }
    Ok(Expr::Ident(id))
  }

  fn parse_array_type(&mut self) -> Result<Expr, SyntaxError> {
    let open = self.require(TT::BracketOpen)?;
    let len = if self.peek().tt == TT::BracketClose {
      None
    } else if self.peek().tt == TT::Ellipsis {
      let t = self.next();
      Some(Box::new(Expr::Ellipsis {
        loc: t.loc,
        elt: None,
      }))
    } else {
      Some(Box::new(self.parse_expr()?))
    };
    self.require(TT::BracketClose)?;
    let elt = self.parse_type()?;
    Ok(Expr::ArrayType {
      len,
      loc: open.loc.extend(elt.loc()),
      elt: Box::new(elt),
    })
  }

  fn parse_struct_type(&mut self) -> Result<Expr, SyntaxError> {
    let kw = self.require(TT::KeywordStruct)?;
    self.require(TT::BraceOpen)?;
    let mut fields = Vec::new();
    loop {
      while self.eat(TT::Semicolon) {}
      if self.peek().tt == TT::BraceClose {
        break;
      }
      fields.push(self.parse_struct_field()?);
    }
    let close = self.require(TT::BraceClose)?;
    Ok(Expr::StructType {
      fields,
      loc: kw.loc.extend(close.loc),
    })
  }

  fn parse_struct_field(&mut self) -> Result<Field, SyntaxError> {
    // Either `Name, Name Type` or an embedded `T` / `pkg.T` / `*pkg.T`.
    let first = self.parse_type()?;
    let field = if let Expr::Ident(id) = &first {
      if self.peek().tt == TT::Comma || self.starts_type(self.peek().tt) {
        let mut names = vec![id.clone()];
        while self.eat(TT::Comma) {
          names.push(self.ident()?);
        }
        let typ = self.parse_type()?;
        Field { names, typ }
      } else {
        Field {
          names: Vec::new(),
          typ: first,
        }
      }
    } else {
      Field {
        names: Vec::new(),
        typ: first,
      }
    };
    // Optional struct tag; its contents are irrelevant to every consumer.
    if matches!(self.peek().tt, TT::LiteralStr | TT::LiteralStrRaw) {
      self.next();
    }
    Ok(field)
  }

  fn parse_interface_type(&mut self) -> Result<Expr, SyntaxError> {
    let kw = self.require(TT::KeywordInterface)?;
    self.require(TT::BraceOpen)?;
    let mut methods = Vec::new();
    loop {
      while self.eat(TT::Semicolon) {}
      if self.peek().tt == TT::BraceClose {
        break;
      }
      if self.peek().tt == TT::Ident && self.peek_at(1).tt == TT::ParenOpen {
        let name = self.ident()?;
        let sig = self.parse_signature()?;
        methods.push(Field {
          names: vec![name],
          typ: Expr::FuncType(sig),
        });
      } else {
        let typ = self.parse_type()?;
        methods.push(Field {
          names: Vec::new(),
          typ,
        });
      }
    }
    let close = self.require(TT::BraceClose)?;
    Ok(Expr::InterfaceType {
      methods,
      loc: kw.loc.extend(close.loc),
    })
  }

  /// Parameters plus results, after the `func` keyword or method name.
  pub fn parse_signature(&mut self) -> Result<FuncType, SyntaxError> {
    let open = self.peek().loc;
    let params = self.parse_params()?;
    let mut end = self.tokens[self.i.saturating_sub(1)].loc;
    let results = if self.peek().tt == TT::ParenOpen {
      let r = self.parse_params()?;
      end = self.tokens[self.i.saturating_sub(1)].loc;
      r
    } else if self.starts_type(self.peek().tt) {
      let typ = self.parse_type()?;
      end = typ.loc();
      vec![Field {
        names: Vec::new(),
        typ,
      }]
    } else {
      Vec::new()
    };
    Ok(FuncType {
      params,
      results,
      loc: open.extend(end),
    })
  }

  /// A parenthesized parameter list, resolving Go's names-versus-types
  /// ambiguity: parse every item optimistically as a type, then regroup
  /// pending bare identifiers as names once a `name Type` item appears.
  fn parse_params(&mut self) -> Result<Vec<Field>, SyntaxError> {
    self.require(TT::ParenOpen)?;
    enum Item {
      Unnamed(Expr),
      Named(Ident, Expr),
    }
    let mut items = Vec::new();
    let mut any_named = false;
    loop {
      while self.eat(TT::Semicolon) {}
      if self.peek().tt == TT::ParenClose {
        break;
      }
      if self.eat(TT::Ellipsis) {
        let loc = self.tokens[self.i - 1].loc;
        let elt = self.parse_type()?;
        items.push(Item::Unnamed(Expr::Ellipsis {
          loc: loc.extend(elt.loc()),
          elt: Some(Box::new(elt)),
        }));
      } else {
        let first = self.parse_type()?;
        let named = match &first {
          Expr::Ident(_) => self.starts_type(self.peek().tt) || self.peek().tt == TT::Ellipsis,
          _ => false,
        };
        if named {
          let Expr::Ident(name) = first else { unreachable!() };
          any_named = true;
          let typ = if self.eat(TT::Ellipsis) {
            let loc = self.tokens[self.i - 1].loc;
            let elt = self.parse_type()?;
            Expr::Ellipsis {
              loc: loc.extend(elt.loc()),
              elt: Some(Box::new(elt)),
            }
          } else {
            self.parse_type()?
          };
          items.push(Item::Named(name, typ));
        } else {
          items.push(Item::Unnamed(first));
        }
      }
      if !self.eat(TT::Comma) {
        while self.eat(TT::Semicolon) {}
        break;
      }
    }
    self.require(TT::ParenClose)?;

    let mut fields = Vec::new();
    if !any_named {
      for item in items {
        let Item::Unnamed(typ) = item else { unreachable!() };
        fields.push(Field {
          names: Vec::new(),
          typ,
        });
      }
      return Ok(fields);
    }
    // Named list: bare identifiers are names sharing the next item's type.
    let mut pending: Vec<Ident> = Vec::new();
    for item in items {
      match item {
        Item::Unnamed(Expr::Ident(id)) => pending.push(id),
        Item::Unnamed(typ) => {
          // Malformed mix of named and unnamed parameters; keep the type.
          fields.push(Field {
            names: std::mem::take(&mut pending),
            typ,
          });
        }
        Item::Named(name, typ) => {
          pending.push(name);
          fields.push(Field {
            names: std::mem::take(&mut pending),
            typ,
          });
        }
      }
    }
    for id in pending {
      let loc = id.loc;
      fields.push(Field {
        names: vec![id],
        typ: Expr::Bad(loc),
      });
    }
    Ok(fields)
  }
}
