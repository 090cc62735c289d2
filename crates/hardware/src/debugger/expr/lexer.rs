//! Expression tokenizer.
//!
//! Rules are tried in table order at each position; the first rule that accepts a
//! non-empty prefix produces the token. After tokenizing, `+`, `-` and `*` that cannot
//! be binary (they follow an operator, an opening parenthesis, or nothing) are
//! reclassified as unary.

use crate::common::error::ExprError;

/// Longest token text accepted, exclusive.
pub const MAX_TOKEN_LEN: usize = 32;

/// Most tokens accepted in one expression, exclusive.
pub const MAX_TOKENS: usize = 32;

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Discarded.
    Space,
    /// `||`
    LogicOr,
    /// `&&`
    LogicAnd,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<=`
    Le,
    /// `>=`
    Ge,
    /// Binary `+`.
    Add,
    /// Binary `-`.
    Sub,
    /// Binary `*`.
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `<`
    Lt,
    /// `>`
    Gt,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `&`
    BitAnd,
    /// `0x` followed by hexadecimal digits.
    Hex,
    /// Decimal digits.
    Dec,
    /// `$` followed by a register name.
    Reg,
    /// Symbol name.
    Ident,
    /// Unary `+`.
    Pos,
    /// Unary `-`.
    Neg,
    /// Unary `*` (8-byte memory read).
    Deref,
}

impl TokenKind {
    /// Binding rank of an operator; lower binds looser. `None` for operands and
    /// parentheses.
    pub const fn rank(self) -> Option<u8> {
        Some(match self {
            Self::LogicOr => 0,
            Self::LogicAnd => 1,
            Self::BitOr => 2,
            Self::BitXor => 3,
            Self::BitAnd => 4,
            Self::Eq | Self::Ne => 5,
            Self::Lt | Self::Gt | Self::Le | Self::Ge => 6,
            Self::Add | Self::Sub => 7,
            Self::Mul | Self::Div | Self::Rem => 8,
            Self::Pos | Self::Neg | Self::Deref => 9,
            _ => return None,
        })
    }

    /// Whether this is a prefix operator.
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Pos | Self::Neg | Self::Deref)
    }

    /// Whether a `+ - *` after this token is binary.
    const fn ends_operand(self) -> bool {
        matches!(
            self,
            Self::RParen | Self::Hex | Self::Dec | Self::Reg | Self::Ident
        )
    }
}

/// A token and the text it was read from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Kind.
    pub kind: TokenKind,
    /// Source text.
    pub text: String,
}

type Matcher = fn(&str) -> usize;

const fn lit(s: &str, pat: &str) -> usize {
    let (s, p) = (s.as_bytes(), pat.as_bytes());
    if s.len() < p.len() {
        return 0;
    }
    let mut i = 0;
    while i < p.len() {
        if s[i] != p[i] {
            return 0;
        }
        i += 1;
    }
    p.len()
}

fn span(s: &str, pred: impl Fn(u8) -> bool) -> usize {
    s.bytes().take_while(|&b| pred(b)).count()
}

fn space(s: &str) -> usize {
    span(s, |b| b == b' ' || b == b'\t')
}

fn hex(s: &str) -> usize {
    if lit(s, "0x") == 0 {
        return 0;
    }
    match span(&s[2..], |b| b.is_ascii_hexdigit()) {
        0 => 0,
        n => n + 2,
    }
}

fn dec(s: &str) -> usize {
    span(s, |b| b.is_ascii_digit())
}

fn reg(s: &str) -> usize {
    if !s.starts_with('$') {
        return 0;
    }
    match span(&s[1..], |b| b.is_ascii_alphanumeric()) {
        0 => 0,
        n => n + 1,
    }
}

fn ident(s: &str) -> usize {
    match s.bytes().next() {
        Some(b) if b.is_ascii_alphabetic() || b == b'_' => {
            span(s, |b| b.is_ascii_alphanumeric() || b == b'_')
        }
        _ => 0,
    }
}

static RULES: [(Matcher, TokenKind); 23] = [
    (space, TokenKind::Space),
    (|s| lit(s, "||"), TokenKind::LogicOr),
    (|s| lit(s, "&&"), TokenKind::LogicAnd),
    (|s| lit(s, "=="), TokenKind::Eq),
    (|s| lit(s, "!="), TokenKind::Ne),
    (|s| lit(s, "<="), TokenKind::Le),
    (|s| lit(s, ">="), TokenKind::Ge),
    (|s| lit(s, "+"), TokenKind::Add),
    (|s| lit(s, "-"), TokenKind::Sub),
    (|s| lit(s, "*"), TokenKind::Mul),
    (|s| lit(s, "/"), TokenKind::Div),
    (|s| lit(s, "%"), TokenKind::Rem),
    (|s| lit(s, "("), TokenKind::LParen),
    (|s| lit(s, ")"), TokenKind::RParen),
    (|s| lit(s, "<"), TokenKind::Lt),
    (|s| lit(s, ">"), TokenKind::Gt),
    (|s| lit(s, "|"), TokenKind::BitOr),
    (|s| lit(s, "^"), TokenKind::BitXor),
    (|s| lit(s, "&"), TokenKind::BitAnd),
    (hex, TokenKind::Hex),
    (dec, TokenKind::Dec),
    (reg, TokenKind::Reg),
    (ident, TokenKind::Ident),
];

/// Splits `expr` into tokens.
///
/// # Errors
///
/// * [`ExprError::NoMatch`] when no rule accepts the text at some position.
/// * [`ExprError::TokenTooLong`] for a token of [`MAX_TOKEN_LEN`] bytes or more.
/// * [`ExprError::TooManyTokens`] for [`MAX_TOKENS`] tokens or more.
///
/// ```
/// use rvsdb_core::debugger::expr::lexer::{tokenize, TokenKind};
///
/// let kinds: Vec<_> = tokenize("-(1 - $a0)").unwrap().iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Neg, TokenKind::LParen, TokenKind::Dec, TokenKind::Sub, TokenKind::Reg, TokenKind::RParen]
/// );
/// ```
pub fn tokenize(expr: &str) -> Result<Vec<Token>, ExprError> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut pos = 0;

    while pos < expr.len() {
        let rest = &expr[pos..];
        let (len, kind) = RULES
            .iter()
            .find_map(|&(m, kind)| match m(rest) {
                0 => None,
                n => Some((n, kind)),
            })
            .ok_or_else(|| ExprError::NoMatch {
                expr: expr.to_owned(),
                position: pos,
            })?;

        if kind != TokenKind::Space {
            if len >= MAX_TOKEN_LEN {
                return Err(ExprError::TokenTooLong { position: pos });
            }
            if tokens.len() + 1 >= MAX_TOKENS {
                return Err(ExprError::TooManyTokens);
            }
            let kind = match (kind, tokens.last()) {
                (TokenKind::Add | TokenKind::Sub | TokenKind::Mul, prev)
                    if !prev.is_some_and(|t| t.kind.ends_operand()) =>
                {
                    unary(kind)
                }
                _ => kind,
            };
            tokens.push(Token {
                kind,
                text: rest[..len].to_owned(),
            });
        }
        pos += len;
    }
    Ok(tokens)
}

const fn unary(kind: TokenKind) -> TokenKind {
    match kind {
        TokenKind::Add => TokenKind::Pos,
        TokenKind::Sub => TokenKind::Neg,
        TokenKind::Mul => TokenKind::Deref,
        other => other,
    }
}
