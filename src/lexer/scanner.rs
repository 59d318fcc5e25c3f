//! PHP tokenizer
//!
//! Produces the token stream the classifier consumes. The scanner never
//! fails: unterminated strings, comments and heredocs run to the end of
//! the input, and any byte it does not recognise becomes `Punctuation`.
//! Concatenating the text of every token reproduces the input exactly.

use super::token::{Token, TokenKind};

const CAST_TYPES: &[&str] = &[
    "int", "integer", "bool", "boolean", "float", "double", "real", "string", "binary", "array",
    "object", "unset",
];

/// Multi-character operators, longest first
const OPERATORS: &[&str] = &[
    "<=>", "**=", "...", "<<=", ">>=", "===", "!==", "??=", "?->", "->", "=>", "::", "==", "!=",
    "<>", "<=", ">=", "&&", "||", "??", "++", "--", "+=", "-=", "*=", "/=", ".=", "%=", "&=", "|=",
    "^=", "<<", ">>", "**",
];

const MAGIC_CONSTANTS: &[&str] = &[
    "__class__",
    "__dir__",
    "__file__",
    "__function__",
    "__line__",
    "__method__",
    "__namespace__",
    "__trait__",
    "__property__",
];

/// Deepest `{$ ... }` nesting lexed as code; strings opened deeper are opaque
const MAX_INTERPOLATION_DEPTH: usize = 64;

/// Tokenize PHP source, starting in inline HTML mode like the PHP runtime.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).run()
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

fn is_ident_char(b: u8) -> bool {
    is_ident_start(b) || b.is_ascii_digit()
}

fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let kind = match word {
        "class" => Class,
        "interface" => Interface,
        "trait" => Trait,
        "function" => Function,
        "new" => New,
        "eval" => Eval,
        "exit" | "die" => Exit,
        "global" => Global,
        "goto" => Goto,
        "__halt_compiler" => HaltCompiler,
        "include" => Include,
        "include_once" => IncludeOnce,
        "require" => Require,
        "require_once" => RequireOnce,
        "throw" => Throw,
        "unset" => Unset,
        "echo" => Echo,
        "print" => Print,
        "static" => Static,
        "abstract" | "and" | "array" | "as" | "break" | "callable" | "case" | "catch"
        | "clone" | "const" | "continue" | "declare" | "default" | "do" | "else" | "elseif"
        | "empty" | "enddeclare" | "endfor" | "endforeach" | "endif" | "endswitch"
        | "endwhile" | "extends" | "final" | "finally" | "fn" | "for" | "foreach" | "if"
        | "implements" | "instanceof" | "insteadof" | "isset" | "list" | "match"
        | "namespace" | "or" | "private" | "protected" | "public" | "readonly" | "return"
        | "switch" | "try" | "use" | "var" | "while" | "xor" | "yield" => Keyword,
        _ if MAGIC_CONSTANTS.contains(&word) => MagicConstant,
        _ => return None,
    };
    Some(kind)
}

/// Where an interpolated string ends
#[derive(Clone, Copy)]
enum StringEnd<'a> {
    DoubleQuote,
    Heredoc(&'a str),
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    pos: usize,
    line: usize,
    in_php: bool,
    /// Depth of `{$ ... }` code blocks inside strings; `?>` is not a close tag there
    nesting: usize,
    tokens: Vec<Token>,
}

impl<'a> Scanner<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            bytes: src.as_bytes(),
            pos: 0,
            line: 1,
            in_php: false,
            nesting: 0,
            tokens: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<Token> {
        while self.pos < self.bytes.len() {
            if self.in_php {
                self.lex_php_token();
            } else {
                self.lex_inline_html();
            }
        }
        self.tokens
    }

    fn peek(&self, ahead: usize) -> Option<u8> {
        self.bytes.get(self.pos + ahead).copied()
    }

    fn starts_with(&self, s: &str) -> bool {
        self.bytes[self.pos..].starts_with(s.as_bytes())
    }

    fn starts_with_ignore_case(&self, s: &str) -> bool {
        self.bytes
            .get(self.pos..self.pos + s.len())
            .is_some_and(|slice| slice.eq_ignore_ascii_case(s.as_bytes()))
    }

    /// Emit everything from `start` to the current position as one token
    fn push(&mut self, kind: TokenKind, start: usize) {
        if start >= self.pos {
            return;
        }
        let text = &self.src[start..self.pos];
        self.tokens.push(Token::new(kind, text, start, self.line));
        self.line += text.bytes().filter(|&b| b == b'\n').count();
    }

    fn last_significant(&self) -> Option<TokenKind> {
        self.tokens
            .iter()
            .rev()
            .map(|t| t.kind)
            .find(|kind| !kind.is_trivia())
    }

    fn lex_inline_html(&mut self) {
        let start = self.pos;
        let open = self.src[self.pos..].find("<?").map(|i| self.pos + i);
        let Some(open) = open else {
            self.pos = self.bytes.len();
            self.push(TokenKind::InlineHtml, start);
            return;
        };
        self.pos = open;
        self.push(TokenKind::InlineHtml, start);

        let tag_start = self.pos;
        if self.starts_with("<?=") {
            self.pos += 3;
            self.in_php = true;
            self.push(TokenKind::OpenTagWithEcho, tag_start);
            return;
        }
        if self.starts_with_ignore_case("<?php")
            && self.peek(5).map_or(true, is_whitespace)
        {
            self.pos += 5;
            // The open tag owns one trailing newline or space
            if self.starts_with("\r\n") {
                self.pos += 2;
            } else if self.peek(0).is_some() {
                self.pos += 1;
            }
        } else {
            self.pos += 2;
        }
        self.in_php = true;
        self.push(TokenKind::OpenTag, tag_start);
    }

    fn lex_php_token(&mut self) {
        let start = self.pos;
        let b = self.bytes[self.pos];

        if is_whitespace(b) {
            while self.peek(0).is_some_and(is_whitespace) {
                self.pos += 1;
            }
            self.push(TokenKind::Whitespace, start);
            return;
        }

        if self.nesting == 0 && self.starts_with("?>") {
            self.pos += 2;
            if self.starts_with("\r\n") {
                self.pos += 2;
            } else if self.peek(0) == Some(b'\n') {
                self.pos += 1;
            }
            self.in_php = false;
            self.push(TokenKind::CloseTag, start);
            return;
        }

        match b {
            b'#' if self.peek(1) == Some(b'[') => {
                self.pos += 2;
                self.push(TokenKind::Attribute, start);
            }
            b'#' => self.lex_line_comment(start),
            b'/' if self.peek(1) == Some(b'/') => self.lex_line_comment(start),
            b'/' if self.peek(1) == Some(b'*') => self.lex_block_comment(start),
            b'$' if self.peek(1).is_some_and(is_ident_start) => {
                self.pos += 1;
                self.consume_ident();
                self.push(TokenKind::Variable, start);
            }
            b'$' => {
                self.pos += 1;
                self.push(TokenKind::Dollar, start);
            }
            b'\\' if self.peek(1).is_some_and(is_ident_start) => self.lex_name(start),
            _ if is_ident_start(b) => self.lex_name(start),
            _ if b.is_ascii_digit() => self.lex_number(start),
            b'.' if self.peek(1).is_some_and(|c| c.is_ascii_digit()) => self.lex_number(start),
            b'\'' => self.lex_single_quoted(start),
            b'"' => self.lex_double_quoted(start),
            b'`' => self.lex_backtick(start),
            b'<' if self.starts_with("<<<") => self.lex_heredoc(start),
            b'(' => {
                if !self.try_lex_cast(start) {
                    self.pos += 1;
                    self.push(TokenKind::OpenParen, start);
                }
            }
            _ => self.lex_operator(start),
        }
    }

    fn lex_line_comment(&mut self, start: usize) {
        while let Some(c) = self.peek(0) {
            if c == b'\n' {
                self.pos += 1;
                break;
            }
            if self.nesting == 0 && self.starts_with("?>") {
                break;
            }
            self.pos += 1;
        }
        self.push(TokenKind::Comment, start);
    }

    fn lex_block_comment(&mut self, start: usize) {
        let is_doc = self.starts_with("/**") && self.peek(3).is_some_and(is_whitespace);
        self.pos += 2;
        match self.src[self.pos..].find("*/") {
            Some(i) => self.pos += i + 2,
            None => self.pos = self.bytes.len(),
        }
        let kind = if is_doc {
            TokenKind::DocComment
        } else {
            TokenKind::Comment
        };
        self.push(kind, start);
    }

    fn consume_ident(&mut self) {
        while self.peek(0).is_some_and(is_ident_char) {
            self.pos += 1;
        }
    }

    /// Identifiers, keywords and namespaced names
    fn lex_name(&mut self, start: usize) {
        let mut qualified = false;
        loop {
            if self.peek(0) == Some(b'\\') && self.peek(1).is_some_and(is_ident_start) {
                qualified = true;
                self.pos += 1;
            }
            self.consume_ident();
            if !(self.peek(0) == Some(b'\\') && self.peek(1).is_some_and(is_ident_start)) {
                break;
            }
        }

        let text = &self.src[start..self.pos];
        let kind = if qualified {
            if text.starts_with('\\') {
                TokenKind::NameFullyQualified
            } else if text
                .get(..10)
                .is_some_and(|p| p.eq_ignore_ascii_case("namespace\\"))
            {
                TokenKind::NameRelative
            } else {
                TokenKind::NameQualified
            }
        } else if self.last_significant().is_some_and(TokenKind::is_member_access) {
            // Member names may be reserved words: `$x->list()`, `Foo::class`
            TokenKind::Identifier
        } else {
            let lower = text.to_ascii_lowercase();
            if lower == "enum" {
                if self.enum_declaration_follows() {
                    TokenKind::Enum
                } else {
                    TokenKind::Identifier
                }
            } else {
                keyword_kind(&lower).unwrap_or(TokenKind::Identifier)
            }
        };
        self.push(kind, start);
    }

    /// `enum` is a keyword only in `enum Name`
    fn enum_declaration_follows(&self) -> bool {
        let mut i = self.pos;
        let mut saw_space = false;
        while self.bytes.get(i).copied().is_some_and(is_whitespace) {
            i += 1;
            saw_space = true;
        }
        if !saw_space || !self.bytes.get(i).copied().is_some_and(is_ident_start) {
            return false;
        }
        let word_start = i;
        while self.bytes.get(i).copied().is_some_and(is_ident_char) {
            i += 1;
        }
        let word = self.src[word_start..i].to_ascii_lowercase();
        word != "extends" && word != "implements"
    }

    fn lex_number(&mut self, start: usize) {
        let mut is_float = false;
        let prefix = self.peek(1).map(|c| c.to_ascii_lowercase());
        if self.peek(0) == Some(b'0') && matches!(prefix, Some(b'x') | Some(b'b') | Some(b'o')) {
            self.pos += 2;
            while self
                .peek(0)
                .is_some_and(|c| c.is_ascii_hexdigit() || c == b'_')
            {
                self.pos += 1;
            }
            self.push(TokenKind::LNumber, start);
            return;
        }

        self.consume_digits();
        if self.peek(0) == Some(b'.') && self.peek(1).map_or(true, |c| c != b'.') {
            is_float = true;
            self.pos += 1;
            self.consume_digits();
        }
        if matches!(self.peek(0), Some(b'e') | Some(b'E')) {
            let sign = usize::from(matches!(self.peek(1), Some(b'+') | Some(b'-')));
            if self.peek(1 + sign).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.pos += 1 + sign;
                self.consume_digits();
            }
        }
        let kind = if is_float {
            TokenKind::DNumber
        } else {
            TokenKind::LNumber
        };
        self.push(kind, start);
    }

    fn consume_digits(&mut self) {
        while self.peek(0).is_some_and(|c| c.is_ascii_digit() || c == b'_') {
            self.pos += 1;
        }
    }

    fn lex_single_quoted(&mut self, start: usize) {
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            self.pos += 1;
            match c {
                b'\\' => self.pos = (self.pos + 1).min(self.bytes.len()),
                b'\'' => break,
                _ => {}
            }
        }
        self.push(TokenKind::ConstantString, start);
    }

    fn lex_backtick(&mut self, start: usize) {
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            self.pos += 1;
            match c {
                b'\\' => self.pos = (self.pos + 1).min(self.bytes.len()),
                b'`' => break,
                _ => {}
            }
        }
        self.push(TokenKind::ShellExec, start);
    }

    /// Whether `$name`, `{$` or `${` starts at byte `i`
    fn interpolation_at(&self, i: usize) -> bool {
        let next = self.bytes.get(i + 1).copied();
        match self.bytes[i] {
            b'$' => next.is_some_and(|c| is_ident_start(c) || c == b'{'),
            b'{' => next == Some(b'$'),
            _ => false,
        }
    }

    fn lex_double_quoted(&mut self, start: usize) {
        let mut i = self.pos + 1;
        let mut interpolated = false;
        while i < self.bytes.len() {
            match self.bytes[i] {
                b'\\' => i += 2,
                b'"' => break,
                _ => {
                    interpolated |= self.interpolation_at(i);
                    i += 1;
                }
            }
        }

        if !interpolated || self.nesting >= MAX_INTERPOLATION_DEPTH {
            self.pos = (i + 1).min(self.bytes.len());
            self.push(TokenKind::ConstantString, start);
            return;
        }

        self.pos += 1;
        self.push(TokenKind::Quote, start);
        self.lex_interpolated(StringEnd::DoubleQuote);
        if self.peek(0) == Some(b'"') {
            let quote = self.pos;
            self.pos += 1;
            self.push(TokenKind::Quote, quote);
        }
    }

    fn lex_heredoc(&mut self, start: usize) {
        let mut i = self.pos + 3;
        while matches!(self.bytes.get(i), Some(b' ') | Some(b'\t')) {
            i += 1;
        }
        let quote = match self.bytes.get(i) {
            Some(&q) if q == b'\'' || q == b'"' => {
                i += 1;
                Some(q)
            }
            _ => None,
        };
        let label_start = i;
        while self.bytes.get(i).copied().is_some_and(is_ident_char) {
            i += 1;
        }
        let label_end = i;
        if let Some(q) = quote {
            if self.bytes.get(i) != Some(&q) {
                return self.lex_operator(start);
            }
            i += 1;
        }
        let newline = match (self.bytes.get(i), self.bytes.get(i + 1)) {
            (Some(b'\n'), _) => 1,
            (Some(b'\r'), Some(b'\n')) => 2,
            _ => 0,
        };
        if label_start == label_end || newline == 0 {
            return self.lex_operator(start);
        }

        self.pos = i + newline;
        self.push(TokenKind::StartHeredoc, start);
        let label = &self.src[label_start..label_end];

        if quote == Some(b'\'') {
            let body_start = self.pos;
            self.pos = self
                .find_heredoc_close(self.pos, label)
                .unwrap_or(self.bytes.len());
            self.push(TokenKind::EncapsedAndWhitespace, body_start);
        } else {
            let close = self.find_heredoc_close(self.pos, label);
            let has_interpolation = (self.pos..close.unwrap_or(self.bytes.len()))
                .any(|j| self.interpolation_at(j) && (j == 0 || self.bytes[j - 1] != b'\\'));
            if has_interpolation && self.nesting < MAX_INTERPOLATION_DEPTH {
                self.lex_interpolated(StringEnd::Heredoc(label));
            } else {
                let body_start = self.pos;
                self.pos = close.unwrap_or(self.bytes.len());
                self.push(TokenKind::EncapsedAndWhitespace, body_start);
            }
        }

        if self.pos < self.bytes.len() {
            let end_start = self.pos;
            while matches!(self.peek(0), Some(b' ') | Some(b'\t')) {
                self.pos += 1;
            }
            self.pos += label.len();
            self.push(TokenKind::EndHeredoc, end_start);
        }
    }

    /// Start of the line holding the closing label, searching line starts from `from`
    fn find_heredoc_close(&self, from: usize, label: &str) -> Option<usize> {
        let mut line_start = from;
        loop {
            if self.heredoc_closes_at(line_start, label) {
                return Some(line_start);
            }
            let newline = self.src[line_start..].find('\n')?;
            line_start += newline + 1;
        }
    }

    fn heredoc_closes_at(&self, line_start: usize, label: &str) -> bool {
        let mut i = line_start;
        while matches!(self.bytes.get(i), Some(b' ') | Some(b'\t')) {
            i += 1;
        }
        self.bytes[i.min(self.bytes.len())..].starts_with(label.as_bytes())
            && !self
                .bytes
                .get(i + label.len())
                .copied()
                .is_some_and(is_ident_char)
    }

    fn at_string_end(&self, end: StringEnd<'_>) -> bool {
        match end {
            StringEnd::DoubleQuote => self.peek(0) == Some(b'"'),
            StringEnd::Heredoc(label) => {
                (self.pos == 0 || self.bytes[self.pos - 1] == b'\n')
                    && self.heredoc_closes_at(self.pos, label)
            }
        }
    }

    /// Lex the inside of an interpolated string up to (not including) its terminator
    fn lex_interpolated(&mut self, end: StringEnd<'_>) {
        while self.pos < self.bytes.len() && !self.at_string_end(end) {
            let start = self.pos;
            while self.pos < self.bytes.len()
                && !self.at_string_end(end)
                && !self.interpolation_at(self.pos)
            {
                self.pos += if self.bytes[self.pos] == b'\\' { 2 } else { 1 };
            }
            self.pos = self.pos.min(self.bytes.len());
            self.push(TokenKind::EncapsedAndWhitespace, start);

            if self.pos >= self.bytes.len() || self.at_string_end(end) {
                break;
            }
            let start = self.pos;
            match (self.bytes[self.pos], self.peek(1)) {
                (b'{', _) => {
                    self.pos += 1;
                    self.push(TokenKind::CurlyOpen, start);
                    self.lex_embedded_code();
                }
                (b'$', Some(b'{')) => {
                    self.pos += 2;
                    self.push(TokenKind::DollarOpenCurlyBraces, start);
                    self.lex_embedded_code();
                }
                _ => self.lex_simple_interpolation(),
            }
        }
    }

    /// `$name`, `$name[offset]`, `$name->prop`
    fn lex_simple_interpolation(&mut self) {
        let start = self.pos;
        self.pos += 1;
        self.consume_ident();
        self.push(TokenKind::Variable, start);

        if self.peek(0) == Some(b'[') {
            let open = self.pos;
            self.pos += 1;
            self.push(TokenKind::OpenBracket, open);
            let inner = self.pos;
            match self.peek(0) {
                Some(b'$') if self.peek(1).is_some_and(is_ident_start) => {
                    self.pos += 1;
                    self.consume_ident();
                    self.push(TokenKind::Variable, inner);
                }
                Some(b'-') | Some(b'0'..=b'9') => {
                    if self.peek(0) == Some(b'-') {
                        self.pos += 1;
                        self.push(TokenKind::Operator, inner);
                    }
                    let digits = self.pos;
                    self.consume_digits();
                    self.push(TokenKind::LNumber, digits);
                }
                Some(c) if is_ident_start(c) => {
                    self.consume_ident();
                    self.push(TokenKind::Identifier, inner);
                }
                _ => {}
            }
            if self.peek(0) == Some(b']') {
                let close = self.pos;
                self.pos += 1;
                self.push(TokenKind::CloseBracket, close);
            }
        } else if self.starts_with("->") && self.peek(2).is_some_and(is_ident_start) {
            let arrow = self.pos;
            self.pos += 2;
            self.push(TokenKind::ObjectOperator, arrow);
            let name = self.pos;
            self.consume_ident();
            self.push(TokenKind::Identifier, name);
        } else if self.starts_with("?->") && self.peek(3).is_some_and(is_ident_start) {
            let arrow = self.pos;
            self.pos += 3;
            self.push(TokenKind::NullsafeObjectOperator, arrow);
            let name = self.pos;
            self.consume_ident();
            self.push(TokenKind::Identifier, name);
        }
    }

    /// Ordinary code inside `{$ ... }` / `${ ... }`, through the matching brace
    fn lex_embedded_code(&mut self) {
        let mut depth = 1usize;
        self.nesting += 1;
        while self.pos < self.bytes.len() {
            self.lex_php_token();
            match self.tokens.last().map(|t| t.kind) {
                Some(TokenKind::OpenBrace) => depth += 1,
                Some(TokenKind::CloseBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
        self.nesting -= 1;
    }

    /// `(int)`, `( string )`, `(unset)`
    fn try_lex_cast(&mut self, start: usize) -> bool {
        let mut i = self.pos + 1;
        while matches!(self.bytes.get(i), Some(b' ') | Some(b'\t')) {
            i += 1;
        }
        let word_start = i;
        while self.bytes.get(i).is_some_and(|c| c.is_ascii_alphabetic()) {
            i += 1;
        }
        let word = self.src[word_start..i].to_ascii_lowercase();
        while matches!(self.bytes.get(i), Some(b' ') | Some(b'\t')) {
            i += 1;
        }
        if self.bytes.get(i) != Some(&b')') || !CAST_TYPES.contains(&word.as_str()) {
            return false;
        }
        self.pos = i + 1;
        let kind = if word == "unset" {
            TokenKind::UnsetCast
        } else {
            TokenKind::Cast
        };
        self.push(kind, start);
        true
    }

    fn lex_operator(&mut self, start: usize) {
        if let Some(op) = OPERATORS.iter().find(|op| self.starts_with(op)) {
            self.pos += op.len();
            let kind = match *op {
                "->" => TokenKind::ObjectOperator,
                "?->" => TokenKind::NullsafeObjectOperator,
                "::" => TokenKind::DoubleColon,
                _ => TokenKind::Operator,
            };
            self.push(kind, start);
            return;
        }

        let b = self.bytes[self.pos];
        if b >= 0x80 {
            // Unreachable through lex_php_token; keeps UTF-8 boundaries intact anyway
            self.consume_ident();
            self.push(TokenKind::Identifier, start);
            return;
        }
        self.pos += 1;
        let kind = match b {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'{' => TokenKind::OpenBrace,
            b'}' => TokenKind::CloseBrace,
            b'[' => TokenKind::OpenBracket,
            b']' => TokenKind::CloseBracket,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b'&' => TokenKind::Ampersand,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'=' | b'<' | b'>' | b'!' | b'.' | b'?' | b':'
            | b'|' | b'^' | b'~' | b'@' => TokenKind::Operator,
            _ => TokenKind::Punctuation,
        };
        self.push(kind, start);
    }
}
