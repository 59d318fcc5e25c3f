//! Token stream types
//!
//! `TokenKind` is closed: every kind is assigned exactly one `TokenEffect`
//! in [`TokenKind::effect`], and that match has no wildcard arm, so adding a
//! side-effect-bearing construct is a single compile-checked change.

use serde::Serialize;

/// What a token contributes to a scan on its own, before any lookahead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenEffect {
    /// Declarations, bindings, inclusion, jumps, unbinding
    ScopePollution,
    /// Object construction or raising: pollution plus an unresolved constructor
    ScopePollutionMaybe,
    ProcessExit,
    /// Output-producing statements and literal text emission
    Output,
    /// Shell execution
    InputOutput,
    Inert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    // Named type and function declarations
    Class,
    Interface,
    Trait,
    Enum,
    Function,
    // Other scope-polluting constructs
    New,
    Eval,
    Exit,
    Global,
    Goto,
    HaltCompiler,
    Include,
    IncludeOnce,
    Require,
    RequireOnce,
    Throw,
    Unset,
    UnsetCast,
    // Output-producing constructs
    Echo,
    Print,
    InlineHtml,
    OpenTagWithEcho,
    /// Backtick command
    ShellExec,

    OpenTag,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,
    Variable,
    Identifier,
    /// `Foo\bar`
    NameQualified,
    /// `\foo`
    NameFullyQualified,
    /// `namespace\foo`
    NameRelative,
    Static,
    /// Any other reserved word
    Keyword,
    MagicConstant,
    LNumber,
    DNumber,
    ConstantString,
    EncapsedAndWhitespace,
    StartHeredoc,
    EndHeredoc,
    /// `"` delimiting an interpolated string
    Quote,
    /// `{$` inside an interpolated string
    CurlyOpen,
    /// `${` inside an interpolated string
    DollarOpenCurlyBraces,
    Cast,
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleColon,
    /// `#[`
    Attribute,
    Operator,
    OpenParen,
    CloseParen,
    OpenBrace,
    CloseBrace,
    OpenBracket,
    CloseBracket,
    Ampersand,
    Semicolon,
    Comma,
    Dollar,
    Punctuation,
}

impl TokenKind {
    pub fn effect(self) -> TokenEffect {
        use TokenKind::*;
        match self {
            Class | Interface | Trait | Enum | Function | Eval | Global | Goto | HaltCompiler
            | Include | IncludeOnce | Require | RequireOnce | Unset | UnsetCast => {
                TokenEffect::ScopePollution
            }
            New | Throw => TokenEffect::ScopePollutionMaybe,
            Exit => TokenEffect::ProcessExit,
            Echo | Print | InlineHtml | OpenTagWithEcho => TokenEffect::Output,
            ShellExec => TokenEffect::InputOutput,
            OpenTag | CloseTag | Whitespace | Comment | DocComment | Variable | Identifier
            | NameQualified | NameFullyQualified | NameRelative | Static | Keyword
            | MagicConstant | LNumber | DNumber | ConstantString | EncapsedAndWhitespace
            | StartHeredoc | EndHeredoc | Quote | CurlyOpen | DollarOpenCurlyBraces | Cast
            | ObjectOperator | NullsafeObjectOperator | DoubleColon | Attribute | Operator
            | OpenParen | CloseParen | OpenBrace | CloseBrace | OpenBracket | CloseBracket
            | Ampersand | Semicolon | Comma | Dollar | Punctuation => TokenEffect::Inert,
        }
    }

    /// Skipped by every lookahead
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment | Self::DocComment)
    }

    /// Identifier-like tokens that can name a function
    pub fn is_name(self) -> bool {
        matches!(
            self,
            Self::Identifier | Self::NameQualified | Self::NameFullyQualified | Self::NameRelative
        )
    }

    /// `->`, `?->` or `::`
    pub fn is_member_access(self) -> bool {
        matches!(
            self,
            Self::ObjectOperator | Self::NullsafeObjectOperator | Self::DoubleColon
        )
    }
}

/// A classified lexeme with its source position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset of the first character
    pub offset: usize,
    /// 1-based line of the first character
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize, line: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
            line,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
