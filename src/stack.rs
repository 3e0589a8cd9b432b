//! The value stack
//!
//! Last element is the top. Every operation that lacks enough elements is a
//! silent no-op here; callers decide whether that is worth reporting.

use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stack {
    items: Vec<Value>,
}

impl Stack {
    pub fn new() -> Self {
        Stack { items: Vec::new() }
    }

    pub fn push(&mut self, v: Value) {
        self.items.push(v);
    }

    pub fn pop(&mut self) -> Option<Value> {
        self.items.pop()
    }

    /// Pop `n` values, oldest first. Nothing is removed if fewer than `n` exist.
    pub fn pop_n(&mut self, n: usize) -> Option<Vec<Value>> {
        if self.items.len() < n {
            return None;
        }
        Some(self.items.split_off(self.items.len() - n))
    }

    /// Top `n` values, oldest first, or empty if there are fewer than `n`
    pub fn peek(&self, n: usize) -> &[Value] {
        if self.items.len() >= n {
            &self.items[self.items.len() - n..]
        } else {
            &[]
        }
    }

    pub fn top(&self) -> Option<&Value> {
        self.items.last()
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whole stack, bottom first
    pub fn as_slice(&self) -> &[Value] {
        &self.items
    }

    /// Push the current size
    pub fn depth(&mut self) {
        let size = self.items.len() as i64;
        self.items.push(Value::Int(size));
    }

    /// Copy the top `n` values, keeping their order: [a b] -> [a b a b]
    pub fn duplicate(&mut self, n: usize) {
        if n == 0 || self.items.len() < n {
            return;
        }
        let start = self.items.len() - n;
        self.items.extend_from_within(start..);
    }

    pub fn drop_n(&mut self, n: usize) {
        if self.items.len() >= n {
            self.items.truncate(self.items.len() - n);
        }
    }

    pub fn swap(&mut self) {
        let len = self.items.len();
        if len >= 2 {
            self.items.swap(len - 1, len - 2);
        }
    }

    /// Move the item `n` positions from the top (1 = top) onto the top
    pub fn pick(&mut self, n: usize) {
        let len = self.items.len();
        if n == 0 || n > len {
            return;
        }
        let item = self.items.remove(len - n);
        self.items.push(item);
    }

    /// Rotate the whole stack `n` places towards the top; negative rotates down.
    /// `[1 2 3]` rolled by 1 becomes `[3 1 2]`.
    pub fn roll(&mut self, n: i64) {
        let len = self.items.len();
        if len == 0 {
            return;
        }
        let shift = n.rem_euclid(len as i64) as usize;
        self.items.rotate_right(shift);
    }

    pub fn rolld(&mut self, n: i64) {
        self.roll(n.wrapping_neg());
    }
}
