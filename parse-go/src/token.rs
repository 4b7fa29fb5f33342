use crate::loc::Loc;

/// Token types for Go source.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum TT {
  // Special token representing the end of the source code. Easier than
  // handling Option everywhere.
  EOF,
  // Special token representing invalid source code, so the lexer never has to
  // fail; the corresponding error is recorded on the side.
  Invalid,

  Ident,
  LiteralChar,
  LiteralFloat,
  LiteralImag,
  LiteralInt,
  LiteralStr,
  LiteralStrRaw,

  Ampersand,
  AmpersandAmpersand,
  AmpersandCaret,
  AmpersandCaretEquals,
  AmpersandEquals,
  Asterisk,
  AsteriskEquals,
  Bar,
  BarBar,
  BarEquals,
  BraceClose,
  BraceOpen,
  BracketClose,
  BracketOpen,
  Caret,
  CaretEquals,
  ChevronLeft,
  ChevronLeftChevronLeft,
  ChevronLeftChevronLeftEquals,
  ChevronLeftEquals,
  ChevronLeftMinus,
  ChevronRight,
  ChevronRightChevronRight,
  ChevronRightChevronRightEquals,
  ChevronRightEquals,
  Colon,
  ColonEquals,
  Comma,
  Dot,
  Ellipsis,
  Equals,
  EqualsEquals,
  Exclamation,
  ExclamationEquals,
  Minus,
  MinusEquals,
  MinusMinus,
  ParenClose,
  ParenOpen,
  Percent,
  PercentEquals,
  Plus,
  PlusEquals,
  PlusPlus,
  Semicolon,
  Slash,
  SlashEquals,

  KeywordBreak,
  KeywordCase,
  KeywordChan,
  KeywordConst,
  KeywordContinue,
  KeywordDefault,
  KeywordDefer,
  KeywordElse,
  KeywordFallthrough,
  KeywordFor,
  KeywordFunc,
  KeywordGo,
  KeywordGoto,
  KeywordIf,
  KeywordImport,
  KeywordInterface,
  KeywordMap,
  KeywordPackage,
  KeywordRange,
  KeywordReturn,
  KeywordSelect,
  KeywordStruct,
  KeywordSwitch,
  KeywordType,
  KeywordVar,
}

impl TT {
  /// Whether Go inserts a semicolon when a line ends after this token.
  pub fn can_end_statement(self) -> bool {
    matches!(
      self,
      TT::Ident
        | TT::LiteralChar
        | TT::LiteralFloat
        | TT::LiteralImag
        | TT::LiteralInt
        | TT::LiteralStr
        | TT::LiteralStrRaw
        | TT::KeywordBreak
        | TT::KeywordContinue
        | TT::KeywordFallthrough
        | TT::KeywordReturn
        | TT::PlusPlus
        | TT::MinusMinus
        | TT::ParenClose
        | TT::BracketClose
        | TT::BraceClose
    )
  }
}

pub fn keyword(name: &str) -> Option<TT> {
  Some(match name {
    "break" => TT::KeywordBreak,
    "case" => TT::KeywordCase,
    "chan" => TT::KeywordChan,
    "const" => TT::KeywordConst,
    "continue" => TT::KeywordContinue,
    "default" => TT::KeywordDefault,
    "defer" => TT::KeywordDefer,
    "else" => TT::KeywordElse,
    "fallthrough" => TT::KeywordFallthrough,
    "for" => TT::KeywordFor,
    "func" => TT::KeywordFunc,
    "go" => TT::KeywordGo,
    "goto" => TT::KeywordGoto,
    "if" => TT::KeywordIf,
    "import" => TT::KeywordImport,
    "interface" => TT::KeywordInterface,
    "map" => TT::KeywordMap,
    "package" => TT::KeywordPackage,
    "range" => TT::KeywordRange,
    "return" => TT::KeywordReturn,
    "select" => TT::KeywordSelect,
    "struct" => TT::KeywordStruct,
    "switch" => TT::KeywordSwitch,
    "type" => TT::KeywordType,
    "var" => TT::KeywordVar,
    _ => return None,
  })
}

#[derive(Copy, Clone, Debug)]
pub struct Token {
  pub tt: TT,
  pub loc: Loc,
}

impl Token {
  pub fn new(tt: TT, loc: Loc) -> Token {
    Token { tt, loc }
  }
}
