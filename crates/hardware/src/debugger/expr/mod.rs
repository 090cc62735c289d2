//! Debugger expression evaluator.
//!
//! Expressions are C-like integer expressions over 64-bit unsigned values:
//!
//! | rank | operators            |
//! |------|----------------------|
//! | 0    | `\|\|`               |
//! | 1    | `&&`                 |
//! | 2    | `\|`                 |
//! | 3    | `^`                  |
//! | 4    | `&`                  |
//! | 5    | `==` `!=`            |
//! | 6    | `<` `>` `<=` `>=`    |
//! | 7    | `+` `-`              |
//! | 8    | `*` `/` `%`          |
//! | 9    | unary `+` `-` `*`    |
//!
//! Operands are decimal or `0x` hexadecimal literals, `$`-prefixed registers and
//! function names. Evaluation splits the token range at its loosest-binding operator
//! outside parentheses and recurses on both sides.

pub mod lexer;

use crate::common::error::ExprError;
use lexer::{Token, TokenKind, tokenize};

/// Machine state an expression can observe.
pub trait ExprContext {
    /// Value of the register called `name` (without the `$`).
    fn reg(&self, name: &str) -> Option<u64>;

    /// Reads the 8-byte little-endian value at `addr`.
    ///
    /// # Errors
    ///
    /// [`ExprError::BadAddress`] if `addr` is not backed by memory.
    fn read_mem(&self, addr: u64) -> Result<u64, ExprError>;

    /// Start address of the function called `name`.
    fn symbol(&self, name: &str) -> Option<u64>;
}

/// Tokenizes and evaluates `expr`.
///
/// # Errors
///
/// The first [`ExprError`] met while tokenizing or evaluating.
///
/// ```
/// use rvsdb_core::debugger::expr::{evaluate, ExprContext};
/// use rvsdb_core::common::ExprError;
///
/// struct Bare;
/// impl ExprContext for Bare {
///     fn reg(&self, _: &str) -> Option<u64> { None }
///     fn read_mem(&self, addr: u64) -> Result<u64, ExprError> { Err(ExprError::BadAddress(addr)) }
///     fn symbol(&self, _: &str) -> Option<u64> { None }
/// }
///
/// assert_eq!(evaluate("1 + 2 * 3", &Bare), Ok(7));
/// assert_eq!(evaluate("(1 + 2) * 3", &Bare), Ok(9));
/// assert_eq!(evaluate("1 / 0", &Bare), Err(ExprError::DivideByZero));
/// ```
pub fn evaluate(expr: &str, ctx: &dyn ExprContext) -> Result<u64, ExprError> {
    let tokens = tokenize(expr)?;
    check_balance(&tokens)?;
    eval(&tokens, ctx)
}

fn check_balance(tokens: &[Token]) -> Result<(), ExprError> {
    let mut depth = 0usize;
    for t in tokens {
        match t.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.checked_sub(1).ok_or(ExprError::UnbalancedParens)?;
            }
            _ => {}
        }
    }
    if depth == 0 {
        Ok(())
    } else {
        Err(ExprError::UnbalancedParens)
    }
}

/// Whether the opening parenthesis at the start closes at the very end.
fn wrapped(tokens: &[Token]) -> bool {
    if tokens.len() < 2
        || tokens[0].kind != TokenKind::LParen
        || tokens[tokens.len() - 1].kind != TokenKind::RParen
    {
        return false;
    }
    let mut depth = 0usize;
    for (i, t) in tokens.iter().enumerate() {
        match t.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i == tokens.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}

/// Index of the operator the range splits at.
fn dominant_op(tokens: &[Token]) -> Option<usize> {
    let mut depth = 0usize;
    let mut pick: Option<(usize, u8)> = None;
    for (i, t) in tokens.iter().enumerate() {
        match t.kind {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => depth = depth.saturating_sub(1),
            kind if depth == 0 => {
                let Some(rank) = kind.rank() else { continue };
                let replace = match pick {
                    None => true,
                    Some((_, best)) => rank < best || (rank == best && !kind.is_unary()),
                };
                if replace {
                    pick = Some((i, rank));
                }
            }
            _ => {}
        }
    }
    pick.map(|(i, _)| i)
}

fn eval(tokens: &[Token], ctx: &dyn ExprContext) -> Result<u64, ExprError> {
    match tokens {
        [] => Err(ExprError::BadExpression),
        [t] => operand(t, ctx),
        _ if wrapped(tokens) => eval(&tokens[1..tokens.len() - 1], ctx),
        _ => {
            let op = dominant_op(tokens).ok_or(ExprError::BadExpression)?;
            let kind = tokens[op].kind;
            if kind.is_unary() {
                if op != 0 {
                    return Err(ExprError::BadExpression);
                }
                let val = eval(&tokens[1..], ctx)?;
                return match kind {
                    TokenKind::Neg => Ok(val.wrapping_neg()),
                    TokenKind::Deref => ctx.read_mem(val),
                    _ => Ok(val),
                };
            }
            let lhs = eval(&tokens[..op], ctx)?;
            let rhs = eval(&tokens[op + 1..], ctx)?;
            binary(kind, lhs, rhs)
        }
    }
}

fn operand(t: &Token, ctx: &dyn ExprContext) -> Result<u64, ExprError> {
    let bad_number = || ExprError::BadNumber(t.text.clone());
    match t.kind {
        TokenKind::Hex => u64::from_str_radix(&t.text[2..], 16).map_err(|_| bad_number()),
        TokenKind::Dec => t.text.parse().map_err(|_| bad_number()),
        TokenKind::Reg => ctx
            .reg(&t.text[1..])
            .ok_or_else(|| ExprError::UnknownRegister(t.text.clone())),
        TokenKind::Ident => ctx
            .symbol(&t.text)
            .ok_or_else(|| ExprError::UnknownSymbol(t.text.clone())),
        _ => Err(ExprError::BadExpression),
    }
}

fn binary(kind: TokenKind, a: u64, b: u64) -> Result<u64, ExprError> {
    let val = match kind {
        TokenKind::Add => a.wrapping_add(b),
        TokenKind::Sub => a.wrapping_sub(b),
        TokenKind::Mul => a.wrapping_mul(b),
        TokenKind::Div | TokenKind::Rem if b == 0 => return Err(ExprError::DivideByZero),
        TokenKind::Div => (a as i64).wrapping_div(b as i64) as u64,
        TokenKind::Rem => (a as i64).wrapping_rem(b as i64) as u64,
        TokenKind::BitAnd => a & b,
        TokenKind::BitOr => a | b,
        TokenKind::BitXor => a ^ b,
        TokenKind::Eq => u64::from(a == b),
        TokenKind::Ne => u64::from(a != b),
        TokenKind::Lt => u64::from(a < b),
        TokenKind::Gt => u64::from(a > b),
        TokenKind::Le => u64::from(a <= b),
        TokenKind::Ge => u64::from(a >= b),
        TokenKind::LogicAnd => u64::from(a != 0 && b != 0),
        TokenKind::LogicOr => u64::from(a != 0 || b != 0),
        _ => return Err(ExprError::BadExpression),
    };
    Ok(val)
}
