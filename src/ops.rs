//! Operator table
//!
//! A closed set of operators, each described once by an [`OpSpec`] with its
//! spellings, arity, category and help text. Operands are popped from the
//! stack before the operator runs: for two operands the first popped is the
//! right hand side, so `3 5 -` computes `3 - 5`.
//!
//! Operands are not restored when an operator fails.

use crate::env::{Base, Environment};
use crate::stack::Stack;
use crate::value::Value;
use rand::rngs::OsRng;
use rand::Rng;
use std::f64::consts;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("math domain error")]
    Domain,
    #[error("result out of range")]
    Overflow,
    #[error("{0} is not an integer")]
    NotIntegral(Value),
    #[error("{0} is not a valid count")]
    InvalidCount(Value),
    #[error("negative shift count {0}")]
    NegativeShift(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Arithmetic,
    Numeric,
    Mathematic,
    Trigonometric,
    Constants,
    Random,
    Bitwise,
    Boolean,
    Comparison,
    Networking,
    Stack,
    Extra,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Arithmetic => "arithmetic",
            Category::Numeric => "numeric",
            Category::Mathematic => "mathematic",
            Category::Trigonometric => "trigonometric",
            Category::Constants => "constants",
            Category::Random => "random",
            Category::Bitwise => "bitwise",
            Category::Boolean => "boolean",
            Category::Comparison => "comparison",
            Category::Networking => "networking",
            Category::Stack => "stack",
            Category::Extra => "extra",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Add,
    Sub,
    Div,
    Mul,
    Mod,
    Increment,
    Decrement,
    Ceil,
    Floor,
    Round,
    IntPart,
    FracPart,
    Sign,
    Abs,
    Max,
    Min,
    Exp,
    Fact,
    Sqrt,
    Ln,
    Log,
    Pow,
    Sin,
    Asin,
    Sinh,
    Asinh,
    Cos,
    Acos,
    Cosh,
    Acosh,
    Tan,
    Atan,
    Tanh,
    Atanh,
    Pi,
    E,
    Rand,
    BitAnd,
    BitOr,
    BitXor,
    BitNot,
    ShiftRight,
    ShiftLeft,
    And,
    Or,
    Not,
    Xor,
    Less,
    LessEq,
    Equal,
    NotEqual,
    More,
    MoreEq,
    HostToNetLong,
    HostToNetShort,
    NetToHostLong,
    NetToHostShort,
    Pick,
    Depth,
    Drop,
    DropN,
    Dup,
    DupN,
    Roll,
    RollDown,
    Swap,
    ClearAll,
    ClearStack,
    ClearVars,
    Repeat,
    ToggleStack,
    ToggleVerbose,
    Vars,
    Binary,
    Octal,
    Decimal,
    Hexadecimal,
    Exit,
}

/// Immutable description of one operator
#[derive(Debug, PartialEq)]
pub struct OpSpec {
    pub op: Op,
    /// Identifier used in diagnostics
    pub name: &'static str,
    pub spellings: &'static [&'static str],
    /// Values popped before the operator runs
    pub arity: usize,
    pub category: Category,
    pub description: &'static str,
}

/// What the caller has to do after an operator ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// Show the variable/macro bindings
    ShowVars,
    /// End the session
    Exit,
}

/// Result of invoking one operator against the stack
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Applied(Outcome),
    /// Not enough operands; nothing was popped
    Skipped { needed: usize, found: usize },
    /// The operands are gone
    Failed(OpError),
}

macro_rules! op {
    ($op:ident, $name:literal, [$($sp:literal),+], $arity:literal, $cat:ident, $desc:literal) => {
        OpSpec {
            op: Op::$op,
            name: $name,
            spellings: &[$($sp),+],
            arity: $arity,
            category: Category::$cat,
            description: $desc,
        }
    };
}

/// Every operator, in catalog order
pub static OPERATORS: &[OpSpec] = &[
    op!(Add, "add", ["+"], 2, Arithmetic, "Add the 2 top numbers on the stack."),
    op!(Sub, "sub", ["-"], 2, Arithmetic, "Subtract the top number from the one below it."),
    op!(Div, "div", ["/"], 2, Arithmetic, "Divide the second number by the top number."),
    op!(Mul, "mul", ["*"], 2, Arithmetic, "Multiply the 2 top numbers on the stack."),
    op!(Mod, "mod", ["%"], 2, Arithmetic, "Remainder of dividing the second number by the top number."),
    op!(Increment, "increment", ["++"], 1, Arithmetic, "Increment the top number."),
    op!(Decrement, "decrement", ["--"], 1, Arithmetic, "Decrement the top number."),
    op!(Ceil, "ceil", ["ceil"], 1, Numeric, "Round the top number up."),
    op!(Floor, "floor", ["floor"], 1, Numeric, "Round the top number down."),
    op!(Round, "round", ["round"], 1, Numeric, "Round the top number to the nearest integer."),
    op!(IntPart, "ip", ["ip"], 1, Numeric, "Integer part of the top number."),
    op!(FracPart, "fp", ["fp"], 1, Numeric, "Fractional part of the top number."),
    op!(Sign, "sign", ["sign"], 2, Numeric, "Magnitude of the second number with the sign of the top number."),
    op!(Abs, "abs", ["abs"], 1, Numeric, "Absolute value of the top number."),
    op!(Max, "max", ["max"], 2, Numeric, "Larger of the 2 top numbers."),
    op!(Min, "min", ["min"], 2, Numeric, "Smaller of the 2 top numbers."),
    op!(Exp, "exp", ["exp"], 1, Mathematic, "e raised to the top number."),
    op!(Fact, "fact", ["fact"], 1, Mathematic, "Factorial of the top number."),
    op!(Sqrt, "sqrt", ["sqrt"], 1, Mathematic, "Square root of the top number."),
    op!(Ln, "nlog", ["ln"], 2, Mathematic, "Logarithm of the second number in the base given on top."),
    op!(Log, "log", ["log"], 1, Mathematic, "Base 10 logarithm of the top number."),
    op!(Pow, "pow", ["pow"], 2, Mathematic, "Second number raised to the top number."),
    op!(Sin, "sin", ["sin"], 1, Trigonometric, "Sine of the top number."),
    op!(Asin, "asin", ["asin"], 1, Trigonometric, "Arc sine of the top number."),
    op!(Sinh, "sinh", ["sinh"], 1, Trigonometric, "Hyperbolic sine of the top number."),
    op!(Asinh, "asinh", ["asinh"], 1, Trigonometric, "Inverse hyperbolic sine of the top number."),
    op!(Cos, "cos", ["cos"], 1, Trigonometric, "Cosine of the top number."),
    op!(Acos, "acos", ["acos"], 1, Trigonometric, "Arc cosine of the top number."),
    op!(Cosh, "cosh", ["cosh"], 1, Trigonometric, "Hyperbolic cosine of the top number."),
    op!(Acosh, "acosh", ["acosh"], 1, Trigonometric, "Inverse hyperbolic cosine of the top number."),
    op!(Tan, "tan", ["tan"], 1, Trigonometric, "Tangent of the top number."),
    op!(Atan, "atan", ["atan"], 1, Trigonometric, "Arc tangent of the top number."),
    op!(Tanh, "tanh", ["tanh"], 1, Trigonometric, "Hyperbolic tangent of the top number."),
    op!(Atanh, "atanh", ["atanh"], 1, Trigonometric, "Inverse hyperbolic tangent of the top number."),
    op!(Pi, "pi", ["pi"], 0, Constants, "Push the constant pi."),
    op!(E, "e", ["e"], 0, Constants, "Push the constant e."),
    op!(Rand, "rand", ["rand"], 0, Random, "Push a random number in [0, 1) from the OS generator."),
    op!(BitAnd, "bit_and", ["&"], 2, Bitwise, "Bitwise AND of the 2 top numbers."),
    op!(BitOr, "bit_or", ["|"], 2, Bitwise, "Bitwise OR of the 2 top numbers."),
    op!(BitXor, "bit_xor", ["^"], 2, Bitwise, "Bitwise XOR of the 2 top numbers."),
    op!(BitNot, "bit_not", ["~"], 1, Bitwise, "Bitwise NOT of the top number."),
    op!(ShiftRight, "bit_rshift", [">>", "rshft"], 2, Bitwise, "Shift the second number right by the top number of bits."),
    op!(ShiftLeft, "bit_lshift", ["<<", "lshft"], 2, Bitwise, "Shift the second number left by the top number of bits."),
    op!(And, "bool_and", ["&&", "and"], 2, Boolean, "1 if both top numbers are non-zero, else 0."),
    op!(Or, "bool_or", ["||", "or"], 2, Boolean, "1 if either top number is non-zero, else 0."),
    op!(Not, "bool_not", ["!", "not"], 1, Boolean, "1 if the top number is zero, else 0."),
    op!(Xor, "bool_xor", ["^^"], 2, Boolean, "1 if exactly one of the 2 top numbers is non-zero, else 0."),
    op!(Less, "less", ["<", "less"], 2, Comparison, "1 if the second number is less than the top number."),
    op!(LessEq, "less_equals", ["<=", "lesseq"], 2, Comparison, "1 if the second number is less than or equal to the top number."),
    op!(Equal, "equals", ["==", "eq"], 2, Comparison, "1 if the 2 top numbers are equal."),
    op!(NotEqual, "not_equals", ["!=", "neq"], 2, Comparison, "1 if the 2 top numbers differ."),
    op!(More, "more", [">", "more"], 2, Comparison, "1 if the second number is greater than the top number."),
    op!(MoreEq, "more_equals", [">=", "moreeq"], 2, Comparison, "1 if the second number is greater than or equal to the top number."),
    op!(HostToNetLong, "hnl", ["hnl"], 1, Networking, "Convert a 32 bit number from host to network byte order."),
    op!(HostToNetShort, "hns", ["hns"], 1, Networking, "Convert a 16 bit number from host to network byte order."),
    op!(NetToHostLong, "nhl", ["nhl"], 1, Networking, "Convert a 32 bit number from network to host byte order."),
    op!(NetToHostShort, "nhs", ["nhs"], 1, Networking, "Convert a 16 bit number from network to host byte order."),
    op!(Pick, "pick", ["pick"], 1, Stack, "Move the n-th item from the top onto the top."),
    op!(Depth, "depth", ["depth"], 0, Stack, "Push the current stack depth."),
    op!(Drop, "drop", ["drop"], 0, Stack, "Drop the top item."),
    op!(DropN, "dropn", ["dropn"], 1, Stack, "Drop n items."),
    op!(Dup, "dup", ["dup"], 0, Stack, "Duplicate the top item."),
    op!(DupN, "dupn", ["dupn"], 1, Stack, "Duplicate the top n items in order."),
    op!(Roll, "roll", ["roll"], 1, Stack, "Rotate the stack upwards by n."),
    op!(RollDown, "rolld", ["rolld"], 1, Stack, "Rotate the stack downwards by n."),
    op!(Swap, "swap", ["swap"], 0, Stack, "Swap the 2 top items."),
    op!(ClearAll, "cla", ["cla"], 0, Stack, "Clear the stack and the variables."),
    op!(ClearStack, "clr", ["clr"], 0, Stack, "Clear the stack."),
    op!(ClearVars, "clv", ["clv"], 0, Stack, "Clear the variables and macros."),
    op!(Repeat, "repeat", ["repeat"], 1, Extra, "Run the next operator n times."),
    op!(ToggleStack, "toggle_stack", ["stack", "mode"], 0, Extra, "Toggle the stack display between horizontal and vertical."),
    op!(ToggleVerbose, "toggle_verbose", ["verbose", "debug", "dbg"], 0, Extra, "Toggle verbose mode."),
    op!(Vars, "show_vars", ["vars"], 0, Extra, "Show the current variables."),
    op!(Binary, "binary", ["binary", "bin"], 0, Extra, "Display integers in binary."),
    op!(Octal, "octal", ["octal", "oct"], 0, Extra, "Display integers in octal."),
    op!(Decimal, "decimal", ["decimal"], 0, Extra, "Display integers in decimal."),
    op!(Hexadecimal, "hexadecimal", ["hexadecimal", "hex"], 0, Extra, "Display integers in hexadecimal."),
    op!(Exit, "exit", ["exit", "quit"], 0, Extra, "Exit the calculator."),
];

/// Line forms that are listed next to the operators but handled by the digester
pub static SYNTAX_FORMS: &[(&str, &str)] = &[
    ("macro", "Store the rest of the line as a macro, e.g. macro kb 1024 *"),
    ("var=", "Pop the top number into the variable \"var\", e.g. some_var="),
];

/// Find the operator spelled `token`
pub fn lookup(token: &str) -> Option<&'static OpSpec> {
    OPERATORS.iter().find(|spec| spec.spellings.contains(&token))
}

pub fn is_operator(token: &str) -> bool {
    lookup(token).is_some()
}

/// One line of the operator listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub spelling: &'static str,
    pub category: Category,
    pub description: &'static str,
}

/// Every spelling with its description, grouped by category in table order
pub fn catalog() -> Vec<CatalogEntry> {
    let mut entries: Vec<CatalogEntry> = OPERATORS
        .iter()
        .flat_map(|spec| {
            spec.spellings.iter().map(move |&spelling| CatalogEntry {
                spelling,
                category: spec.category,
                description: spec.description,
            })
        })
        .collect();
    entries.extend(SYNTAX_FORMS.iter().map(|&(spelling, description)| CatalogEntry {
        spelling,
        category: Category::Extra,
        description,
    }));
    entries
}

impl OpSpec {
    /// Pop the operands and run the operator once
    pub fn invoke(&self, stack: &mut Stack, env: &mut Environment) -> Invocation {
        let args = match stack.pop_n(self.arity) {
            Some(args) => args,
            None => {
                return Invocation::Skipped {
                    needed: self.arity,
                    found: stack.size(),
                }
            }
        };
        match self.op.apply(&args, stack, env) {
            Ok(outcome) => Invocation::Applied(outcome),
            Err(e) => Invocation::Failed(e),
        }
    }
}

impl Op {
    /// `args` holds exactly the operator's arity, oldest first
    fn apply(self, args: &[Value], stack: &mut Stack, env: &mut Environment) -> Result<Outcome, OpError> {
        let result = match (self, args) {
            (Op::Add, &[a, b]) => arith(a, b, i64::checked_add, |x, y| x + y)?,
            (Op::Sub, &[a, b]) => arith(a, b, i64::checked_sub, |x, y| x - y)?,
            (Op::Mul, &[a, b]) => arith(a, b, i64::checked_mul, |x, y| x * y)?,
            (Op::Div, &[a, b]) => {
                if b.is_zero() {
                    return Err(OpError::DivisionByZero);
                }
                Value::Float(a.as_f64() / b.as_f64())
            }
            (Op::Mod, &[a, b]) => {
                if b.is_zero() {
                    return Err(OpError::DivisionByZero);
                }
                arith(a, b, floored_rem, |x, y| {
                    let r = x % y;
                    if r != 0.0 && (r < 0.0) != (y < 0.0) { r + y } else { r }
                })?
            }
            (Op::Increment, &[a]) => unary(a, |x| x.checked_add(1), |x| x + 1.0)?,
            (Op::Decrement, &[a]) => unary(a, |x| x.checked_sub(1), |x| x - 1.0)?,

            (Op::Ceil, &[a]) => to_int(a, f64::ceil)?,
            (Op::Floor, &[a]) => to_int(a, f64::floor)?,
            (Op::Round, &[a]) => to_int(a, f64::round_ties_even)?,
            (Op::IntPart, &[a]) => Value::Float(a.as_f64().trunc()),
            (Op::FracPart, &[a]) => Value::Float(a.as_f64().fract()),
            (Op::Sign, &[a, b]) => Value::Float(a.as_f64().copysign(b.as_f64())),
            (Op::Abs, &[a]) => unary(a, i64::checked_abs, f64::abs)?,
            (Op::Max, &[a, b]) => if b > a { b } else { a },
            (Op::Min, &[a, b]) => if b < a { b } else { a },

            (Op::Exp, &[a]) => real(a, f64::exp)?,
            (Op::Fact, &[a]) => factorial(a)?,
            (Op::Sqrt, &[a]) => real(a, f64::sqrt)?,
            (Op::Ln, &[a, b]) => log_base(a, b)?,
            (Op::Log, &[a]) => {
                if a.as_f64() <= 0.0 {
                    return Err(OpError::Domain);
                }
                real(a, f64::log10)?
            }
            (Op::Pow, &[a, b]) => checked(&[a.as_f64(), b.as_f64()], a.as_f64().powf(b.as_f64()))?,

            (Op::Sin, &[a]) => real(a, f64::sin)?,
            (Op::Asin, &[a]) => real(a, f64::asin)?,
            (Op::Sinh, &[a]) => real(a, f64::sinh)?,
            (Op::Asinh, &[a]) => real(a, f64::asinh)?,
            (Op::Cos, &[a]) => real(a, f64::cos)?,
            (Op::Acos, &[a]) => real(a, f64::acos)?,
            (Op::Cosh, &[a]) => real(a, f64::cosh)?,
            (Op::Acosh, &[a]) => real(a, f64::acosh)?,
            (Op::Tan, &[a]) => real(a, f64::tan)?,
            (Op::Atan, &[a]) => real(a, f64::atan)?,
            (Op::Tanh, &[a]) => real(a, f64::tanh)?,
            (Op::Atanh, &[a]) => {
                if a.as_f64().abs() >= 1.0 {
                    return Err(OpError::Domain);
                }
                real(a, f64::atanh)?
            }

            (Op::Pi, []) => Value::Float(consts::PI),
            (Op::E, []) => Value::Float(consts::E),
            (Op::Rand, []) => Value::Float(OsRng.gen::<f64>()),

            (Op::BitAnd, &[a, b]) => Value::Int(integral(a)? & integral(b)?),
            (Op::BitOr, &[a, b]) => Value::Int(integral(a)? | integral(b)?),
            (Op::BitXor, &[a, b]) => Value::Int(integral(a)? ^ integral(b)?),
            (Op::BitNot, &[a]) => Value::Int(!integral(a)?),
            (Op::ShiftRight, &[a, b]) => {
                let (x, s) = (integral(a)?, shift_count(b)?);
                Value::Int(x >> s.min(63))
            }
            (Op::ShiftLeft, &[a, b]) => shift_left(integral(a)?, shift_count(b)?)?,

            (Op::And, &[a, b]) => Value::from(a.is_truthy() && b.is_truthy()),
            (Op::Or, &[a, b]) => Value::from(a.is_truthy() || b.is_truthy()),
            (Op::Not, &[a]) => Value::from(!a.is_truthy()),
            (Op::Xor, &[a, b]) => Value::from(a.is_truthy() != b.is_truthy()),

            (Op::Less, &[a, b]) => Value::from(a < b),
            (Op::LessEq, &[a, b]) => Value::from(a <= b),
            (Op::Equal, &[a, b]) => Value::from(a.partial_cmp(&b) == Some(std::cmp::Ordering::Equal)),
            (Op::NotEqual, &[a, b]) => Value::from(a.partial_cmp(&b) != Some(std::cmp::Ordering::Equal)),
            (Op::More, &[a, b]) => Value::from(a > b),
            (Op::MoreEq, &[a, b]) => Value::from(a >= b),

            (Op::HostToNetLong, &[a]) => Value::Int(u32::try_from(truncated(a)?).map_err(|_| OpError::Overflow)?.to_be() as i64),
            (Op::HostToNetShort, &[a]) => Value::Int(u16::try_from(truncated(a)?).map_err(|_| OpError::Overflow)?.to_be() as i64),
            (Op::NetToHostLong, &[a]) => Value::Int(u32::from_be(u32::try_from(truncated(a)?).map_err(|_| OpError::Overflow)?) as i64),
            (Op::NetToHostShort, &[a]) => Value::Int(u16::from_be(u16::try_from(truncated(a)?).map_err(|_| OpError::Overflow)?) as i64),

            (op, args) => return op.apply_effect(args, stack, env),
        };
        stack.push(result);
        Ok(Outcome::Continue)
    }

    /// Operators that change the stack shape or the environment instead of pushing a result
    fn apply_effect(self, args: &[Value], stack: &mut Stack, env: &mut Environment) -> Result<Outcome, OpError> {
        match (self, args) {
            (Op::Pick, &[n]) => stack.pick(count(n)?),
            (Op::Depth, []) => stack.depth(),
            (Op::Drop, []) => stack.drop_n(1),
            (Op::DropN, &[n]) => stack.drop_n(count(n)?),
            (Op::Dup, []) => stack.duplicate(1),
            (Op::DupN, &[n]) => stack.duplicate(count(n)?),
            (Op::Roll, &[n]) => stack.roll(integral(n)?),
            (Op::RollDown, &[n]) => stack.rolld(integral(n)?),
            (Op::Swap, []) => stack.swap(),
            (Op::ClearAll, []) => {
                stack.clear();
                env.clear_bindings();
            }
            (Op::ClearStack, []) => stack.clear(),
            (Op::ClearVars, []) => env.clear_bindings(),

            (Op::Repeat, &[n]) => env.repeat = count(n)?,
            (Op::ToggleStack, []) => env.orientation = env.orientation.toggled(),
            (Op::ToggleVerbose, []) => env.verbose = !env.verbose,
            (Op::Vars, []) => return Ok(Outcome::ShowVars),
            (Op::Binary, []) => env.base = Base::Binary,
            (Op::Octal, []) => env.base = Base::Octal,
            (Op::Decimal, []) => env.base = Base::Decimal,
            (Op::Hexadecimal, []) => env.base = Base::Hexadecimal,
            (Op::Exit, []) => return Ok(Outcome::Exit),

            // arity is fixed by the table, every (op, arity) pair is matched above
            (op, args) => unreachable!("{:?} invoked with {} operands", op, args.len()),
        }
        Ok(Outcome::Continue)
    }
}

fn arith(a: Value, b: Value, int_op: fn(i64, i64) -> Option<i64>, float_op: fn(f64, f64) -> f64) -> Result<Value, OpError> {
    match (a, b) {
        (Value::Int(x), Value::Int(y)) => int_op(x, y).map(Value::Int).ok_or(OpError::Overflow),
        _ => Ok(Value::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

fn unary(a: Value, int_op: fn(i64) -> Option<i64>, float_op: fn(f64) -> f64) -> Result<Value, OpError> {
    match a {
        Value::Int(x) => int_op(x).map(Value::Int).ok_or(OpError::Overflow),
        Value::Float(x) => Ok(Value::Float(float_op(x))),
    }
}

/// Remainder taking the sign of the divisor
fn floored_rem(x: i64, y: i64) -> Option<i64> {
    let r = x.checked_rem(y)?;
    if r != 0 && (r < 0) != (y < 0) {
        r.checked_add(y)
    } else {
        Some(r)
    }
}

/// Float to integer rounding; integers pass through untouched
fn to_int(a: Value, round: fn(f64) -> f64) -> Result<Value, OpError> {
    match a {
        Value::Int(_) => Ok(a),
        Value::Float(x) if x.is_nan() => Err(OpError::Domain),
        Value::Float(x) => Value::Float(round(x)).integral().map(Value::Int).ok_or(OpError::Overflow),
    }
}

/// A finite input giving a non-finite result is a failure
fn checked(inputs: &[f64], out: f64) -> Result<Value, OpError> {
    if inputs.iter().all(|x| x.is_finite()) {
        if out.is_nan() {
            return Err(OpError::Domain);
        }
        if out.is_infinite() {
            return Err(OpError::Overflow);
        }
    }
    Ok(Value::Float(out))
}

fn real(a: Value, f: fn(f64) -> f64) -> Result<Value, OpError> {
    let x = a.as_f64();
    checked(&[x], f(x))
}

fn factorial(a: Value) -> Result<Value, OpError> {
    let n = a.integral().ok_or(OpError::NotIntegral(a))?;
    if n < 0 {
        return Err(OpError::Domain);
    }
    (1..=n)
        .try_fold(1i64, |acc, k| acc.checked_mul(k))
        .map(Value::Int)
        .ok_or(OpError::Overflow)
}

/// Base 2 and 10 get their exact functions, anything else divides natural logs
fn log_base(a: Value, base: Value) -> Result<Value, OpError> {
    let (x, b) = (a.as_f64(), base.as_f64());
    if x <= 0.0 {
        return Err(OpError::Domain);
    }
    if b == 2.0 {
        return real(a, f64::log2);
    }
    if b == 10.0 {
        return real(a, f64::log10);
    }
    if b <= 0.0 {
        return Err(OpError::Domain);
    }
    if b == 1.0 {
        return Err(OpError::DivisionByZero);
    }
    checked(&[x, b], x.ln() / b.ln())
}

fn integral(v: Value) -> Result<i64, OpError> {
    v.integral().ok_or(OpError::NotIntegral(v))
}

fn truncated(v: Value) -> Result<i64, OpError> {
    v.truncated().ok_or(OpError::NotIntegral(v))
}

/// Non-negative integer used as an item count
fn count(v: Value) -> Result<usize, OpError> {
    v.integral()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(OpError::InvalidCount(v))
}

fn shift_count(v: Value) -> Result<u32, OpError> {
    let s = integral(v)?;
    if s < 0 {
        return Err(OpError::NegativeShift(s));
    }
    Ok(u32::try_from(s).unwrap_or(u32::MAX))
}

fn shift_left(x: i64, s: u32) -> Result<Value, OpError> {
    if x == 0 {
        return Ok(Value::Int(0));
    }
    if s >= 63 {
        return Err(OpError::Overflow);
    }
    let shifted = x << s;
    if shifted >> s != x {
        return Err(OpError::Overflow);
    }
    Ok(Value::Int(shifted))
}
