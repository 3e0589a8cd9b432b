//! Rendering of the stack, the bindings and the operator catalog
//!
//! Read-only: nothing here changes the stack or the environment.

use crate::env::{Base, Environment, Orientation};
use crate::ops::{self, Category};
use crate::stack::Stack;
use crate::value::Value;

const RULE: &str = "================";
const ITEM_RULE: &str = "--------";

/// Integers in the display base; floats always in decimal
pub fn format_value(v: &Value, base: Base) -> String {
    match *v {
        Value::Int(n) => {
            let sign = if n < 0 { "-" } else { "" };
            let m = n.unsigned_abs();
            match base {
                Base::Binary => format!("{}{:b}", sign, m),
                Base::Octal => format!("{}{:o}", sign, m),
                Base::Decimal => n.to_string(),
                Base::Hexadecimal => format!("{}{:x}", sign, m),
            }
        }
        Value::Float(_) => v.to_string(),
    }
}

/// `[1 2 3]`, or nothing for an empty stack
pub fn stack_line(stack: &Stack, base: Base) -> String {
    if stack.is_empty() {
        return String::new();
    }
    let items: Vec<String> = stack.as_slice().iter().map(|v| format_value(v, base)).collect();
    format!("[{}]", items.join(" "))
}

/// `name=definition` pairs joined by commas
pub fn variables_line(env: &Environment) -> String {
    env.bindings()
        .map(|(name, binding)| format!("{}={}", name, binding))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Text shown before the cursor, without the trailing `> `
pub fn prompt(stack: &Stack, env: &Environment) -> String {
    match env.orientation {
        Orientation::Horizontal => {
            let mut out = String::new();
            if env.verbose && env.has_bindings() {
                out.push_str(&variables_line(env));
                out.push(' ');
            }
            out.push_str(&stack_line(stack, env.base));
            out
        }
        Orientation::Vertical => {
            let mut out = String::new();
            if env.verbose && env.has_bindings() {
                out.push_str("Variables:\n");
                out.push_str(RULE);
                out.push('\n');
                for (name, binding) in env.bindings() {
                    out.push_str(&format!("{}={}\n", name, binding));
                }
            }
            if !stack.is_empty() {
                out.push_str("Stack:\n");
                out.push_str(RULE);
                out.push('\n');
                for v in stack.as_slice() {
                    out.push_str(&format_value(v, env.base));
                    out.push('\n');
                    out.push_str(ITEM_RULE);
                    out.push('\n');
                }
            }
            out
        }
    }
}

fn heading(category: Category) -> String {
    let label = category.label();
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => format!("{}{} Operators", first.to_ascii_uppercase(), chars.as_str()),
        None => String::from("Operators"),
    }
}

/// Operator listing grouped by category
pub fn catalog_text() -> String {
    let mut out = String::from("\nAVAILABLE OPERATORS.\n");
    let mut current: Option<Category> = None;
    for entry in ops::catalog() {
        if current != Some(entry.category) {
            out.push_str(&format!("\n{}\n{}\n", heading(entry.category), "=".repeat(79)));
            current = Some(entry.category);
        }
        out.push_str(&format!("{}\t: {}\n", entry.spelling, entry.description));
    }
    out
}
