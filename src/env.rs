//! Calculator settings and the variable/macro namespace

use crate::value::Value;
use std::fmt;

/// Numeral system used when rendering integers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Base {
    Binary,
    Octal,
    #[default]
    Decimal,
    Hexadecimal,
}

impl Base {
    /// Parse a radix given as text: "2", "8", "10" or "16"
    pub fn from_radix(radix: &str) -> Option<Base> {
        match radix {
            "2" => Some(Base::Binary),
            "8" => Some(Base::Octal),
            "10" => Some(Base::Decimal),
            "16" => Some(Base::Hexadecimal),
            _ => None,
        }
    }
}

/// Stack layout in the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn from_flag(flag: &str) -> Option<Orientation> {
        match flag {
            "h" => Some(Orientation::Horizontal),
            "v" => Some(Orientation::Vertical),
            _ => None,
        }
    }

    pub fn toggled(self) -> Orientation {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }
}

/// What a name refers to
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    /// A single stored value
    Variable(Value),
    /// Stored tokens, re-digested on reference
    Macro(Vec<String>),
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Variable(v) => write!(f, "{}", v),
            Binding::Macro(tokens) => write!(f, "{}", tokens.join(" ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    pub base: Base,
    pub orientation: Orientation,
    pub verbose: bool,
    /// Times the next operator runs; reset to 1 after it does
    pub repeat: usize,
    /// Insertion ordered, one namespace for variables and macros
    bindings: Vec<(String, Binding)>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            base: Base::default(),
            orientation: Orientation::default(),
            verbose: false,
            repeat: 1,
            bindings: Vec::new(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|(n, _)| n == name).map(|(_, b)| b)
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Overwrites silently, keeping the original position
    pub fn bind(&mut self, name: &str, binding: Binding) {
        match self.bindings.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = binding,
            None => self.bindings.push((name.to_string(), binding)),
        }
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.bindings.iter().map(|(n, b)| (n.as_str(), b))
    }

    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Display settings and the repeat count survive this
    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }
}
