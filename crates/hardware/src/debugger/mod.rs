//! Interactive debugger.
//!
//! 1. **Expressions:** Tokenizer and evaluator for `p`, `x` and `w` ([`expr`]).
//! 2. **Watchpoints:** The fixed pool polled after every step ([`watchpoint`]).
//! 3. **Command loop:** Line reader and command table ([`sdb`]).

/// Expression tokenizer and evaluator.
pub mod expr;

/// Command loop.
pub mod sdb;

/// Watchpoint pool.
pub mod watchpoint;

pub use sdb::Sdb;
