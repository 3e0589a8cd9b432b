//! rpn - Reverse Polish Notation calculator
//!
//! # Overview
//!
//! Numbers are pushed onto a stack; operators pop their operands from it and
//! push their result. Evaluation order is the order the tokens are written in.
//!
//! ```text
//! 3 5 -                # 3 - 5 -> [-2]
//! 1 2 + dup *          # [9]
//! 9 3 repeat dup * *   # dup runs 3 times, then * twice -> [9 729]
//! ```
//!
//! # Variables and Macros
//!
//! ```text
//! 42 answer=           # pop 42 into answer
//! answer 1 +           # [43]
//! macro kb 1024 *      # store tokens, re-digested on every reference
//! 4 kb                 # [4096]
//! ```
//!
//! # Example
//!
//! ```rust
//! use rpn::{Digester, Value};
//!
//! let mut d = Digester::new();
//! d.digest_line("macro sq dup *").unwrap();
//! d.digest_line("7 sq").unwrap();
//! assert_eq!(d.stack().top(), Some(&Value::Int(49)));
//!
//! assert_eq!(rpn::eval("1 2 +").unwrap(), Some(Value::Int(3)));
//! ```

pub mod classify;
pub mod config;
pub mod digest;
pub mod env;
pub mod ops;
pub mod present;
pub mod stack;
pub mod value;

// Re-export commonly used items
pub use classify::{classify, Token};
pub use config::Config;
pub use digest::{DigestError, Digester, Flow};
pub use env::{Base, Binding, Environment, Orientation};
pub use ops::{Category, Invocation, Op, OpError, OpSpec, Outcome, OPERATORS};
pub use stack::Stack;
pub use value::Value;

/// Evaluate one line on a fresh calculator and return the top of the stack
pub fn eval(input: &str) -> Result<Option<Value>, DigestError> {
    let mut digester = Digester::new();
    digester.digest_line(input)?;
    Ok(digester.stack().top().copied())
}
