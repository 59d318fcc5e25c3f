//! Syntactic recognizers
//!
//! Stateless predicates over a token window. Each takes the whole stream
//! and an index, looks around it while skipping whitespace and comments,
//! and never consumes anything: on a miss the scan simply moves on to the
//! next token.

use crate::lexer::{Token, TokenKind};

/// Variables that always reach outside the fragment's own scope
pub const NON_LOCAL_VARIABLES: &[&str] = &[
    "$this",
    "$GLOBALS",
    "$_SERVER",
    "$_GET",
    "$_POST",
    "$_FILES",
    "$_COOKIE",
    "$_SESSION",
    "$_REQUEST",
    "$_ENV",
];

fn kind_at(tokens: &[Token], index: Option<usize>) -> Option<TokenKind> {
    index.and_then(|i| tokens.get(i)).map(|t| t.kind)
}

/// Index of the first non-trivia token after `index`
pub fn next_significant(tokens: &[Token], index: usize) -> Option<usize> {
    (index + 1..tokens.len()).find(|&i| !tokens[i].kind.is_trivia())
}

/// Index of the last non-trivia token before `index`
pub fn previous_significant(tokens: &[Token], index: usize) -> Option<usize> {
    (0..index.min(tokens.len()))
        .rev()
        .find(|&i| !tokens[i].kind.is_trivia())
}

/// `function (`, or `function &(` for closures returning by reference.
pub fn is_anonymous_function(tokens: &[Token], index: usize) -> bool {
    if !tokens.get(index).is_some_and(|t| t.is(TokenKind::Function)) {
        return false;
    }
    let mut next = next_significant(tokens, index);
    if kind_at(tokens, next) == Some(TokenKind::Ampersand) {
        next = next.and_then(|i| next_significant(tokens, i));
    }
    kind_at(tokens, next) == Some(TokenKind::OpenParen)
}

/// If `index` is a plain function call, the callable name as the table keys it.
///
/// Names right after `function` (declarations), `new` (instantiation) or a
/// member operator (method names) are not function calls.
pub fn function_call_at(tokens: &[Token], index: usize) -> Option<&str> {
    let token = tokens.get(index)?;
    if !token.kind.is_name() {
        return None;
    }
    if kind_at(tokens, next_significant(tokens, index)) != Some(TokenKind::OpenParen) {
        return None;
    }
    let mut previous = previous_significant(tokens, index);
    if kind_at(tokens, previous).is_some_and(TokenKind::is_member_access) {
        return None;
    }
    if kind_at(tokens, previous) == Some(TokenKind::Ampersand) {
        // `function &name()` returns by reference
        let before = previous.and_then(|i| previous_significant(tokens, i));
        if kind_at(tokens, before) == Some(TokenKind::Function) {
            return None;
        }
    }
    if matches!(
        kind_at(tokens, previous),
        Some(TokenKind::Function) | Some(TokenKind::New)
    ) {
        return None;
    }
    Some(token.text.strip_prefix('\\').unwrap_or(&token.text))
}

fn is_receiver(kind: TokenKind) -> bool {
    kind.is_name() || matches!(kind, TokenKind::Variable | TokenKind::Static)
}

/// `$obj->run(`, `$obj?->run(`, `Foo::create(`, `static::make(`, `$obj->$name(`
pub fn is_method_call(tokens: &[Token], index: usize) -> bool {
    if !tokens.get(index).is_some_and(|t| is_receiver(t.kind)) {
        return false;
    }
    next_significant(tokens, index).is_some_and(|operator| is_member_call(tokens, operator))
}

/// A member operator at `index` that invokes a method, whatever the receiver:
/// `$items[0]->delete(`, `make()->run(`, `$obj->{$name}(`
pub fn is_member_call(tokens: &[Token], index: usize) -> bool {
    if !tokens.get(index).is_some_and(|t| t.kind.is_member_access()) {
        return false;
    }
    let Some(member) = next_significant(tokens, index) else {
        return false;
    };
    let member_end = match tokens[member].kind {
        TokenKind::Identifier | TokenKind::Variable => Some(member),
        TokenKind::OpenBrace => matching_brace(tokens, member),
        _ => None,
    };
    kind_at(tokens, member_end.and_then(|i| next_significant(tokens, i)))
        == Some(TokenKind::OpenParen)
}

fn matching_brace(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token.kind {
            TokenKind::OpenBrace | TokenKind::CurlyOpen | TokenKind::DollarOpenCurlyBraces => {
                depth += 1
            }
            TokenKind::CloseBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `Foo::$counter`, `static::$cache`, `self::$x`
pub fn is_static_property_access(tokens: &[Token], index: usize) -> bool {
    let Some(token) = tokens.get(index) else {
        return false;
    };
    if !(token.kind.is_name() || token.is(TokenKind::Static)) {
        return false;
    }
    let operator = next_significant(tokens, index);
    if kind_at(tokens, operator) != Some(TokenKind::DoubleColon) {
        return false;
    }
    kind_at(tokens, operator.and_then(|i| next_significant(tokens, i)))
        == Some(TokenKind::Variable)
}

/// `$callback(...)`: invokes whatever the variable holds
pub fn is_variable_call(tokens: &[Token], index: usize) -> bool {
    tokens.get(index).is_some_and(|t| t.is(TokenKind::Variable))
        && kind_at(tokens, next_significant(tokens, index)) == Some(TokenKind::OpenParen)
}

/// `$this` and the superglobals, read or written
pub fn is_non_local_variable(tokens: &[Token], index: usize) -> bool {
    tokens.get(index).is_some_and(|t| {
        t.is(TokenKind::Variable) && NON_LOCAL_VARIABLES.contains(&t.text.as_str())
    })
}

/// For `#[` at `index`, the index of the `]` closing the attribute group.
///
/// Attributes are metadata; nothing inside them runs when the fragment runs.
/// An unterminated group extends to the end of the stream.
pub fn attribute_group_end(tokens: &[Token], index: usize) -> Option<usize> {
    if !tokens.get(index)?.is(TokenKind::Attribute) {
        return None;
    }
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(index) {
        match token.kind {
            TokenKind::Attribute | TokenKind::OpenBracket => depth += 1,
            TokenKind::CloseBracket => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    Some(tokens.len() - 1)
}
