use super::Parser;
use crate::ast::BasicLit;
use crate::ast::BinaryOp;
use crate::ast::Expr;
use crate::ast::LitKind;
use crate::ast::UnaryOp;
use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::token::TT;

fn binary_op(tt: TT) -> Option<(BinaryOp, u8)> {
  Some(match tt {
    TT::BarBar => (BinaryOp::LogicalOr, 1),
    TT::AmpersandAmpersand => (BinaryOp::LogicalAnd, 2),
    TT::EqualsEquals => (BinaryOp::Eq, 3),
    TT::ExclamationEquals => (BinaryOp::Neq, 3),
    TT::ChevronLeft => (BinaryOp::Lt, 3),
    TT::ChevronLeftEquals => (BinaryOp::Leq, 3),
    TT::ChevronRight => (BinaryOp::Gt, 3),
    TT::ChevronRightEquals => (BinaryOp::Geq, 3),
    TT::Plus => (BinaryOp::Add, 4),
    TT::Minus => (BinaryOp::Sub, 4),
    TT::Bar => (BinaryOp::Or, 4),
    TT::Caret => (BinaryOp::Xor, 4),
    TT::Asterisk => (BinaryOp::Mul, 5),
    TT::Slash => (BinaryOp::Div, 5),
    TT::Percent => (BinaryOp::Rem, 5),
    TT::ChevronLeftChevronLeft => (BinaryOp::Shl, 5),
    TT::ChevronRightChevronRight => (BinaryOp::Shr, 5),
    TT::Ampersand => (BinaryOp::And, 5),
    TT::AmpersandCaret => (BinaryOp::AndNot, 5),
    _ => return None,
  })
}

fn lit_kind(tt: TT) -> Option<LitKind> {
  Some(match tt {
    TT::LiteralInt => LitKind::Int,
    TT::LiteralFloat => LitKind::Float,
    TT::LiteralImag => LitKind::Imag,
    TT::LiteralChar => LitKind::Char,
    TT::LiteralStr | TT::LiteralStrRaw => LitKind::Str,
    _ => return None,
  })
}

/// Whether `x` can be the type of a composite literal `T{...}`.
fn composite_type(x: &Expr) -> bool {
  matches!(
    x,
    Expr::Ident(_)
      | Expr::Selector { .. }
      | Expr::ArrayType { .. }
      | Expr::MapType { .. }
      | Expr::StructType { .. }
      | Expr::Index { .. }
  )
}

impl<'a> Parser<'a> {
  pub fn parse_expr(&mut self) -> Result<Expr, SyntaxError> {
    self.parse_binary(1)
  }

  fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, SyntaxError> {
    let mut x = self.parse_unary()?;
    while let Some((op, prec)) = binary_op(self.peek().tt) {
      if prec < min_prec {
        break;
      }
      self.next();
      let y = self.parse_binary(prec + 1)?;
      x = Expr::Binary {
        op,
        x: Box::new(x),
        y: Box::new(y),
      };
    }
    Ok(x)
  }

  fn parse_unary(&mut self) -> Result<Expr, SyntaxError> {
    let t = self.peek();
    let op = match t.tt {
      TT::Plus => Some(UnaryOp::Plus),
      TT::Minus => Some(UnaryOp::Minus),
      TT::Exclamation => Some(UnaryOp::Not),
      TT::Caret => Some(UnaryOp::Xor),
      TT::Ampersand => Some(UnaryOp::And),
      TT::ChevronLeftMinus => Some(UnaryOp::Recv),
      _ => None,
    };
    if let Some(op) = op {
      self.next();
      let x = self.parse_unary()?;
      return Ok(Expr::Unary {
        op,
        loc: t.loc.extend(x.loc()),
        x: Box::new(x),
      });
    }
    if t.tt == TT::Asterisk {
      self.next();
      let x = self.parse_unary()?;
      return Ok(Expr::Star {
        loc: t.loc.extend(x.loc()),
        x: Box::new(x),
      });
    }
    self.parse_primary()
  }

  fn parse_primary(&mut self) -> Result<Expr, SyntaxError> {
    let x = self.parse_operand()?;
    self.parse_postfix(x)
  }

  fn parse_operand(&mut self) -> Result<Expr, SyntaxError> {
    let t = self.peek();
    if let Some(kind) = lit_kind(t.tt) {
      self.next();
      return Ok(Expr::Lit(BasicLit { kind, loc: t.loc }));
    }
    match t.tt {
      TT::Ident => Ok(Expr::Ident(self.ident()?)),
      TT::ParenOpen => {
        self.next();
        let inner = self.parse_expr()?;
        let close = self.require(TT::ParenClose)?;
        Ok(Expr::Paren {
          inner: Box::new(inner),
          loc: t.loc.extend(close.loc),
        })
      }
      TT::KeywordFunc => {
        self.next();
        let sig = self.parse_signature()?;
        if self.peek().tt == TT::BraceOpen {
          let body = self.skip_block()?;
          Ok(Expr::FuncLit { sig, body })
        } else {
          Ok(Expr::FuncType(sig))
        }
      }
      TT::BracketOpen | TT::KeywordMap | TT::KeywordChan | TT::KeywordStruct
      | TT::KeywordInterface => self.parse_type(),
      _ => Err(
        t.loc
          .error(SyntaxErrorType::ExpectedSyntax("expression"), Some(t.tt)),
      ),
    }
  }

  fn parse_postfix(&mut self, mut x: Expr) -> Result<Expr, SyntaxError> {
    loop {
      match self.peek().tt {
        TT::Dot => {
          self.next();
          if self.peek().tt == TT::ParenOpen {
            let open = self.next();
            let typ = if self.eat(TT::KeywordType) {
              None
            } else {
              Some(Box::new(self.parse_type()?))
            };
            let close = self.require(TT::ParenClose)?;
            x = Expr::TypeAssert {
              x: Box::new(x),
              typ,
              loc: open.loc.extend(close.loc),
            };
          } else {
            let sel = self.ident()?;
            x = Expr::Selector {
              x: Box::new(x),
              sel,
            };
          }
        }
        TT::ParenOpen => {
          let open = self.next();
          let mut args = Vec::new();
          loop {
            while self.eat(TT::Semicolon) {}
            if self.peek().tt == TT::ParenClose {
              break;
            }
            let mut arg = self.parse_expr()?;
            if self.peek().tt == TT::Ellipsis {
              let t = self.next();
              arg = Expr::Ellipsis {
                loc: arg.loc().extend(t.loc),
                elt: Some(Box::new(arg)),
              };
            }
            args.push(arg);
            if !self.eat(TT::Comma) {
              while self.eat(TT::Semicolon) {}
              break;
            }
          }
          let close = self.require(TT::ParenClose)?;
          x = Expr::Call {
            func: Box::new(x),
            args,
            loc: open.loc.extend(close.loc),
          };
        }
        TT::BracketOpen => {
          let open = self.next();
          x = self.parse_index_or_slice(x, open.loc)?;
        }
        TT::BraceOpen if composite_type(&x) => {
          let (elts, loc) = self.parse_composite_body()?;
          x = Expr::Composite {
            loc: x.loc().extend(loc),
            typ: Some(Box::new(x)),
            elts,
          };
        }
        _ => return Ok(x),
      }
    }
  }

  fn parse_index_or_slice(&mut self, x: Expr, open: crate::loc::Loc) -> Result<Expr, SyntaxError> {
    let low = if matches!(self.peek().tt, TT::Colon) {
      None
    } else {
      Some(self.parse_expr()?)
    };
    if self.eat(TT::Colon) {
      let high = if matches!(self.peek().tt, TT::Colon | TT::BracketClose) {
        None
      } else {
        Some(Box::new(self.parse_expr()?))
      };
      let max = if self.eat(TT::Colon) {
        Some(Box::new(self.parse_expr()?))
      } else {
        None
      };
      let close = self.require(TT::BracketClose)?;
      return Ok(Expr::Slice {
        x: Box::new(x),
        low: low.map(Box::new),
        high,
        max,
        loc: open.extend(close.loc),
      });
    }
    let close = self.require(TT::BracketClose)?;
    let index = low.ok_or_else(|| {
      close
        .loc
        .error(SyntaxErrorType::ExpectedSyntax("index expression"), Some(close.tt))
    })?;
    Ok(Expr::Index {
      x: Box::new(x),
      index: Box::new(index),
      loc: open.extend(close.loc),
    })
  }

  fn parse_composite_body(&mut self) -> Result<(Vec<Expr>, crate::loc::Loc), SyntaxError> {
    let open = self.require(TT::BraceOpen)?;
    let mut elts = Vec::new();
    loop {
      while self.eat(TT::Semicolon) {}
      if self.peek().tt == TT::BraceClose {
        break;
      }
      elts.push(self.parse_composite_elt()?);
      if !self.eat(TT::Comma) {
        while self.eat(TT::Semicolon) {}
        break;
      }
    }
    let close = self.require(TT::BraceClose)?;
    Ok((elts, open.loc.extend(close.loc)))
  }

  fn parse_composite_elt(&mut self) -> Result<Expr, SyntaxError> {
    let first = self.parse_composite_value()?;
    if self.eat(TT::Colon) {
      let value = self.parse_composite_value()?;
      return Ok(Expr::KeyValue {
        key: Box::new(first),
        value: Box::new(value),
      });
    }
    Ok(first)
  }

  fn parse_composite_value(&mut self) -> Result<Expr, SyntaxError> {
    if self.peek().tt == TT::BraceOpen {
      let (elts, loc) = self.parse_composite_body()?;
      return Ok(Expr::Composite {
        typ: None,
        elts,
        loc,
      });
    }
    self.parse_expr()
  }
}
