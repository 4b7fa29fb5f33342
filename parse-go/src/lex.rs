use crate::error::SyntaxError;
use crate::error::SyntaxErrorType;
use crate::loc::Loc;
use crate::token::keyword;
use crate::token::Token;
use crate::token::TT;

/// Lexed view of one source file.
///
/// The lexer never fails: unlexable input becomes [`TT::Invalid`] tokens and
/// the corresponding errors are recorded on the side, so the parser can keep
/// recovering at declaration boundaries.
pub struct LexOutput {
  pub tokens: Vec<Token>,
  pub errors: Vec<SyntaxError>,
}

pub fn lex(source: &str) -> LexOutput {
  let mut lexer = Lexer {
    src: source.as_bytes(),
    source,
    i: 0,
    tokens: Vec::new(),
    errors: Vec::new(),
    insert_semi: false,
  };
  lexer.run();
  LexOutput {
    tokens: lexer.tokens,
    errors: lexer.errors,
  }
}

struct Lexer<'a> {
  src: &'a [u8],
  source: &'a str,
  i: usize,
  tokens: Vec<Token>,
  errors: Vec<SyntaxError>,
  // Whether a line break at the current position inserts a semicolon.
  insert_semi: bool,
}

fn is_ident_start(c: char) -> bool {
  c == '_' || c.is_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
  c == '_' || c.is_alphanumeric()
}

impl<'a> Lexer<'a> {
  fn run(&mut self) {
    while self.i < self.src.len() {
      match self.src[self.i] {
        b' ' | b'\t' | b'\r' => self.i += 1,
        b'\n' => {
          self.line_break();
          self.i += 1;
        }
        b'/' if self.peek(1) == Some(b'/') => {
          while self.i < self.src.len() && self.src[self.i] != b'\n' {
            self.i += 1;
          }
        }
        b'/' if self.peek(1) == Some(b'*') => self.block_comment(),
        b'"' => self.interpreted_string(),
        b'`' => self.raw_string(),
        b'\'' => self.rune(),
        c if c.is_ascii_digit() => self.number(),
        b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.number(),
        c if c.is_ascii() && !is_ident_start(c as char) => self.operator(),
        _ => self.ident_or_keyword(),
      }
    }
    // The end of the source acts like a line break.
    self.line_break();
    let end = Loc(self.src.len(), self.src.len());
    self.tokens.push(Token::new(TT::EOF, end));
  }

  fn peek(&self, n: usize) -> Option<u8> {
    self.src.get(self.i + n).copied()
  }

  fn push(&mut self, tt: TT, start: usize) {
    self.tokens.push(Token::new(tt, Loc(start, self.i)));
    self.insert_semi = tt.can_end_statement();
  }

  fn line_break(&mut self) {
    if self.insert_semi {
      self.tokens.push(Token::new(TT::Semicolon, Loc(self.i, self.i)));
      self.insert_semi = false;
    }
  }

  fn error(&mut self, typ: SyntaxErrorType, start: usize) {
    self.errors.push(Loc(start, self.i).error(typ, None));
  }

  fn block_comment(&mut self) {
    let start = self.i;
    self.i += 2;
    let mut newline = false;
    loop {
      match self.src.get(self.i) {
        None => {
          self.error(SyntaxErrorType::UnterminatedComment, start);
          return;
        }
        Some(b'\n') => {
          newline = true;
          self.i += 1;
        }
        Some(b'*') if self.peek(1) == Some(b'/') => {
          self.i += 2;
          break;
        }
        Some(_) => self.i += 1,
      }
    }
    // A general comment containing a line break acts like a line break.
    if newline {
      self.line_break();
    }
  }

  fn ident_or_keyword(&mut self) {
    let start = self.i;
    let rest = &self.source[self.i..];
    let mut chars = rest.char_indices();
    match chars.next() {
      Some((_, c)) if is_ident_start(c) => {}
      Some((_, c)) => {
        self.i += c.len_utf8();
        self.error(SyntaxErrorType::InvalidCharacter, start);
        self.push(TT::Invalid, start);
        return;
      }
      None => return,
    }
    let mut end = rest.len();
    for (i, c) in chars {
      if !is_ident_continue(c) {
        end = i;
        break;
      }
    }
    self.i = start + end;
    let text = &self.source[start..self.i];
    self.push(keyword(text).unwrap_or(TT::Ident), start);
  }

  fn number(&mut self) {
    let start = self.i;
    let mut tt = TT::LiteralInt;
    if self.src[self.i] == b'0' && matches!(self.peek(1), Some(b'x' | b'X' | b'b' | b'B' | b'o' | b'O')) {
      self.i += 2;
      self.digits(16);
    } else {
      self.digits(10);
      if self.peek(0) == Some(b'.') {
        tt = TT::LiteralFloat;
        self.i += 1;
        self.digits(10);
      }
      if matches!(self.peek(0), Some(b'e' | b'E')) {
        tt = TT::LiteralFloat;
        self.i += 1;
        if matches!(self.peek(0), Some(b'+' | b'-')) {
          self.i += 1;
        }
        if !self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
          self.error(SyntaxErrorType::MalformedLiteral, start);
        }
        self.digits(10);
      }
    }
    if self.peek(0) == Some(b'i') {
      tt = TT::LiteralImag;
      self.i += 1;
    }
    self.push(tt, start);
  }

  fn digits(&mut self, radix: u8) {
    while let Some(c) = self.peek(0) {
      let ok = match radix {
        16 => c.is_ascii_hexdigit(),
        _ => c.is_ascii_digit(),
      };
      if ok || c == b'_' {
        self.i += 1;
      } else {
        break;
      }
    }
  }

  fn interpreted_string(&mut self) {
    let start = self.i;
    self.i += 1;
    loop {
      match self.src.get(self.i) {
        None | Some(b'\n') => {
          self.error(SyntaxErrorType::UnterminatedString, start);
          self.push(TT::Invalid, start);
          return;
        }
        Some(b'\\') => self.i += 2,
        Some(b'"') => {
          self.i += 1;
          break;
        }
        Some(_) => self.i += 1,
      }
    }
    self.push(TT::LiteralStr, start);
  }

  fn raw_string(&mut self) {
    let start = self.i;
    self.i += 1;
    loop {
      match self.src.get(self.i) {
        None => {
          self.error(SyntaxErrorType::UnterminatedString, start);
          self.push(TT::Invalid, start);
          return;
        }
        Some(b'`') => {
          self.i += 1;
          break;
        }
        Some(_) => self.i += 1,
      }
    }
    self.push(TT::LiteralStrRaw, start);
  }

  fn rune(&mut self) {
    let start = self.i;
    self.i += 1;
    loop {
      match self.src.get(self.i) {
        None | Some(b'\n') => {
          self.error(SyntaxErrorType::UnterminatedString, start);
          self.push(TT::Invalid, start);
          return;
        }
        Some(b'\\') => self.i += 2,
        Some(b'\'') => {
          self.i += 1;
          break;
        }
        Some(_) => self.i += 1,
      }
    }
    self.push(TT::LiteralChar, start);
  }

  fn operator(&mut self) {
    let start = self.i;
    let one = self.src[self.i];
    let two = self.peek(1);
    let three = self.peek(2);
    let (tt, len) = match (one, two, three) {
      (b'&', Some(b'^'), Some(b'=')) => (TT::AmpersandCaretEquals, 3),
      (b'<', Some(b'<'), Some(b'=')) => (TT::ChevronLeftChevronLeftEquals, 3),
      (b'>', Some(b'>'), Some(b'=')) => (TT::ChevronRightChevronRightEquals, 3),
      (b'.', Some(b'.'), Some(b'.')) => (TT::Ellipsis, 3),
      (b'&', Some(b'&'), _) => (TT::AmpersandAmpersand, 2),
      (b'&', Some(b'^'), _) => (TT::AmpersandCaret, 2),
      (b'&', Some(b'='), _) => (TT::AmpersandEquals, 2),
      (b'|', Some(b'|'), _) => (TT::BarBar, 2),
      (b'|', Some(b'='), _) => (TT::BarEquals, 2),
      (b'^', Some(b'='), _) => (TT::CaretEquals, 2),
      (b'<', Some(b'-'), _) => (TT::ChevronLeftMinus, 2),
      (b'<', Some(b'<'), _) => (TT::ChevronLeftChevronLeft, 2),
      (b'<', Some(b'='), _) => (TT::ChevronLeftEquals, 2),
      (b'>', Some(b'>'), _) => (TT::ChevronRightChevronRight, 2),
      (b'>', Some(b'='), _) => (TT::ChevronRightEquals, 2),
      (b':', Some(b'='), _) => (TT::ColonEquals, 2),
      (b'=', Some(b'='), _) => (TT::EqualsEquals, 2),
      (b'!', Some(b'='), _) => (TT::ExclamationEquals, 2),
      (b'-', Some(b'-'), _) => (TT::MinusMinus, 2),
      (b'-', Some(b'='), _) => (TT::MinusEquals, 2),
      (b'+', Some(b'+'), _) => (TT::PlusPlus, 2),
      (b'+', Some(b'='), _) => (TT::PlusEquals, 2),
      (b'*', Some(b'='), _) => (TT::AsteriskEquals, 2),
      (b'/', Some(b'='), _) => (TT::SlashEquals, 2),
      (b'%', Some(b'='), _) => (TT::PercentEquals, 2),
      (b'&', _, _) => (TT::Ampersand, 1),
      (b'|', _, _) => (TT::Bar, 1),
      (b'^', _, _) => (TT::Caret, 1),
      (b'<', _, _) => (TT::ChevronLeft, 1),
      (b'>', _, _) => (TT::ChevronRight, 1),
      (b':', _, _) => (TT::Colon, 1),
      (b'=', _, _) => (TT::Equals, 1),
      (b'!', _, _) => (TT::Exclamation, 1),
      (b'-', _, _) => (TT::Minus, 1),
      (b'+', _, _) => (TT::Plus, 1),
      (b'*', _, _) => (TT::Asterisk, 1),
      (b'/', _, _) => (TT::Slash, 1),
      (b'%', _, _) => (TT::Percent, 1),
      (b'.', _, _) => (TT::Dot, 1),
      (b',', _, _) => (TT::Comma, 1),
      (b';', _, _) => (TT::Semicolon, 1),
      (b'(', _, _) => (TT::ParenOpen, 1),
      (b')', _, _) => (TT::ParenClose, 1),
      (b'[', _, _) => (TT::BracketOpen, 1),
      (b']', _, _) => (TT::BracketClose, 1),
      (b'{', _, _) => (TT::BraceOpen, 1),
      (b'}', _, _) => (TT::BraceClose, 1),
      _ => {
        self.i += 1;
        self.error(SyntaxErrorType::InvalidCharacter, start);
        self.push(TT::Invalid, start);
        return;
      }
    };
    self.i += len;
    self.push(tt, start);
  }
}
