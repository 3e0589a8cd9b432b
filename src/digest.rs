//! Digester - turns lines of tokens into stack and environment changes
//!
//! A line is handled in one of three ways, decided by its first token:
//! - `macro name tokens...` stores `tokens` under `name`
//! - `name=` pops the top of the stack into the variable `name`
//! - anything else is digested token by token, left to right
//!
//! Macro references re-enter the same line handling with their stored
//! tokens, so a macro may itself define macros or assign variables.
//! Nesting is bounded by `Config::max_depth`.

use crate::classify::{assignment_target, classify, Token};
use crate::config::{Config, MAX_DEPTH_CEILING};
use crate::env::{Base, Binding, Environment, Orientation};
use crate::ops::{Invocation, Op, OpSpec, Outcome};
use crate::present;
use crate::stack::Stack;
use crate::value::Value;
use std::mem;
use thiserror::Error;
use tracing::{debug, trace};

/// Leading token that turns a line into a macro definition
pub const MACRO_KEYWORD: &str = "macro";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DigestError {
    #[error("{0} is not a number or a supported operator.")]
    Unrecognized(String),
    #[error("expansion of {name} nested deeper than {limit} levels")]
    ExpansionTooDeep { name: String, limit: usize },
}

impl DigestError {
    /// Fatal errors end the process; the rest only abort the current line
    pub fn is_fatal(&self) -> bool {
        matches!(self, DigestError::Unrecognized(_))
    }
}

/// What the caller should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    /// `exit`/`quit` ran; tokens after it were not digested
    Exit,
}

#[derive(Debug, Clone)]
pub struct Digester {
    stack: Stack,
    env: Environment,
    max_depth: usize,
    /// User-facing output waiting to be printed by the caller
    messages: Vec<String>,
}

impl Default for Digester {
    fn default() -> Self {
        Self::new()
    }
}

impl Digester {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Digester {
            stack: Stack::new(),
            env: Environment::new(),
            max_depth: config.max_depth.min(MAX_DEPTH_CEILING),
            messages: Vec::new(),
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn set_base(&mut self, base: Base) {
        self.env.base = base;
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.env.orientation = orientation;
    }

    pub fn set_verbose(&mut self, verbose: bool) {
        self.env.verbose = verbose;
    }

    /// Drain the queued diagnostics and `vars` dumps, oldest first
    pub fn take_messages(&mut self) -> Vec<String> {
        mem::take(&mut self.messages)
    }

    /// Prompt text for the current state, without the trailing `> `
    pub fn prompt(&self) -> String {
        present::prompt(&self.stack, &self.env)
    }

    pub fn pop_top(&mut self) -> Option<Value> {
        self.stack.pop()
    }

    /// Format a value in the current display base
    pub fn render(&self, v: &Value) -> String {
        present::format_value(v, self.env.base)
    }

    /// Digest one line of whitespace separated tokens.
    ///
    /// On error the effects of the tokens before the failing one are kept.
    pub fn digest_line(&mut self, line: &str) -> Result<Flow, DigestError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        self.digest_words(&words, 0)
    }

    /// Digest tokens that were already split, as one line
    pub fn digest_tokens<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<Flow, DigestError> {
        self.digest_words(tokens, 0)
    }

    fn digest_words<S: AsRef<str>>(&mut self, words: &[S], depth: usize) -> Result<Flow, DigestError> {
        let first = match words.first() {
            Some(w) => w.as_ref(),
            None => return Ok(Flow::Continue),
        };
        if first == MACRO_KEYWORD {
            self.define_macro(&words[1..]);
            return Ok(Flow::Continue);
        }
        if let Some(name) = assignment_target(first) {
            self.assign(name);
            return Ok(Flow::Continue);
        }
        for word in words {
            if self.digest_word(word.as_ref(), depth)? == Flow::Exit {
                return Ok(Flow::Exit);
            }
        }
        Ok(Flow::Continue)
    }

    fn digest_word(&mut self, word: &str, depth: usize) -> Result<Flow, DigestError> {
        trace!(token = word, depth, "digest");
        match classify(word, &self.env) {
            Token::Number(v) => self.stack.push(v),
            Token::Reference(name) => return self.expand(name, depth),
            Token::Operator(spec) => return Ok(self.dispatch(spec)),
            // `name=` later in a line assigns too instead of ending the process
            Token::Unrecognized(w) => match assignment_target(w) {
                Some(name) => self.assign(name),
                None => return Err(DigestError::Unrecognized(w.to_string())),
            },
        }
        Ok(Flow::Continue)
    }

    fn expand(&mut self, name: &str, depth: usize) -> Result<Flow, DigestError> {
        match self.env.lookup(name).cloned() {
            // back through its text, so a whole float comes out as an integer
            Some(Binding::Variable(v)) => self.digest_word(&v.to_string(), depth),
            Some(Binding::Macro(tokens)) => {
                if depth >= self.max_depth {
                    debug!(name = %name, limit = self.max_depth, "expansion too deep");
                    return Err(DigestError::ExpansionTooDeep {
                        name: name.to_string(),
                        limit: self.max_depth,
                    });
                }
                self.digest_words(&tokens, depth + 1)
            }
            None => Err(DigestError::Unrecognized(name.to_string())),
        }
    }

    /// Run an operator as many times as the pending repeat count says.
    /// `repeat` itself always runs once and leaves the count alone.
    fn dispatch(&mut self, spec: &'static OpSpec) -> Flow {
        if spec.op == Op::Repeat {
            return self.invoke(spec);
        }
        let times = mem::replace(&mut self.env.repeat, 1);
        for _ in 0..times {
            if self.invoke(spec) == Flow::Exit {
                return Flow::Exit;
            }
        }
        Flow::Continue
    }

    fn invoke(&mut self, spec: &'static OpSpec) -> Flow {
        match spec.invoke(&mut self.stack, &mut self.env) {
            Invocation::Applied(Outcome::Continue) => {}
            Invocation::Applied(Outcome::ShowVars) => {
                let line = if self.env.has_bindings() {
                    present::variables_line(&self.env)
                } else {
                    String::from("no variables")
                };
                self.messages.push(line);
            }
            Invocation::Applied(Outcome::Exit) => return Flow::Exit,
            Invocation::Skipped { needed, found } => {
                debug!(op = spec.name, needed, found, "operator skipped");
                self.note(format!("{}() skipped: needs {} operand(s)", spec.name, needed));
            }
            Invocation::Failed(e) => {
                debug!(op = spec.name, error = %e, "operator failed");
                self.note(format!("{}() failed: {}", spec.name, e));
            }
        }
        Flow::Continue
    }

    fn define_macro<S: AsRef<str>>(&mut self, words: &[S]) {
        let (name, body) = match words.split_first() {
            Some((name, body)) => (name.as_ref(), body),
            None => {
                self.note(String::from("macro skipped: needs a name"));
                return;
            }
        };
        let tokens: Vec<String> = body.iter().map(|t| t.as_ref().to_string()).collect();
        debug!(name = %name, body = %tokens.join(" "), "macro defined");
        self.env.bind(name, Binding::Macro(tokens));
    }

    fn assign(&mut self, name: &str) {
        match self.stack.pop() {
            Some(v) => {
                debug!(name = %name, value = %v, "variable assigned");
                self.env.bind(name, Binding::Variable(v));
            }
            None => self.note(format!("{}= skipped: stack is empty", name)),
        }
    }

    /// Queue a diagnostic, only shown in verbose mode
    fn note(&mut self, message: String) {
        if self.env.verbose {
            self.messages.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value::{Float as F, Int as I};

    fn digest(lines: &[&str]) -> Digester {
        let mut d = Digester::new();
        for line in lines {
            d.digest_line(line).unwrap();
        }
        d
    }

    fn stack_of(lines: &[&str]) -> Vec<Value> {
        digest(lines).stack().as_slice().to_vec()
    }

    #[test]
    fn operands_in_entry_order() {
        assert_eq!(stack_of(&["3 5 -"]), vec![I(-2)]);
        assert_eq!(stack_of(&["7 2 /"]), vec![F(3.5)]);
        assert_eq!(stack_of(&["2 10 pow"]), vec![F(1024.0)]);
    }

    #[test]
    fn repeat_applies_to_the_next_operator_only() {
        assert_eq!(stack_of(&["2 3 repeat dup *"]), vec![I(2), I(2), I(4)]);
        assert_eq!(stack_of(&["9 3 repeat dup * *"]), vec![I(9), I(729)]);
        assert_eq!(digest(&["3 repeat"]).env().repeat, 3);
        assert_eq!(digest(&["3 repeat dup"]).env().repeat, 1);
    }

    #[test]
    fn repeat_carries_across_lines() {
        assert_eq!(stack_of(&["1 2 3 4", "3 repeat", "+"]), vec![I(10)]);
    }

    #[test]
    fn zero_repeat_skips_the_next_operator() {
        assert_eq!(stack_of(&["5 0 repeat ++ ++"]), vec![I(6)]);
    }

    #[test]
    fn insufficient_operands_are_ignored() {
        assert_eq!(stack_of(&["+"]), vec![]);
        assert_eq!(stack_of(&["1 +"]), vec![I(1)]);
        assert_eq!(stack_of(&["1 swap"]), vec![I(1)]);
    }

    #[test]
    fn unrecognized_token_stops_the_line() {
        let mut d = Digester::new();
        let err = d.digest_line("1 2 foo +").unwrap_err();
        assert_eq!(err, DigestError::Unrecognized("foo".into()));
        assert!(err.is_fatal());
        assert_eq!(err.to_string(), "foo is not a number or a supported operator.");
        assert_eq!(d.stack().as_slice(), &[I(1), I(2)]);
    }

    #[test]
    fn variables() {
        assert_eq!(stack_of(&["5", "x=", "x x +"]), vec![I(10)]);
        assert_eq!(stack_of(&["5 x=", "x x +"]), vec![I(10)]);
        let d = digest(&["2.5", "rate="]);
        assert_eq!(d.env().lookup("rate"), Some(&Binding::Variable(F(2.5))));
        assert!(d.stack().is_empty());
    }

    #[test]
    fn whole_float_variable_comes_back_as_an_integer() {
        let d = digest(&["510 2 /", "x=", "hex x"]);
        assert_eq!(d.env().lookup("x"), Some(&Binding::Variable(F(255.0))));
        assert_eq!(d.stack().as_slice(), &[I(255)]);
        assert_eq!(d.render(&I(255)), "ff");
        assert_eq!(stack_of(&["2.5 rate=", "rate"]), vec![F(2.5)]);
    }

    #[test]
    fn assignment_consumes_the_whole_line() {
        let d = digest(&["4", "x= 1 2"]);
        assert!(d.stack().is_empty());
        assert_eq!(d.env().lookup("x"), Some(&Binding::Variable(I(4))));
    }

    #[test]
    fn assignment_on_empty_stack() {
        let mut d = Digester::new();
        d.set_verbose(true);
        d.digest_line("x=").unwrap();
        assert!(!d.env().is_bound("x"));
        assert_eq!(d.take_messages(), vec!["x= skipped: stack is empty"]);
    }

    #[test]
    fn macros_expand_inline() {
        assert_eq!(stack_of(&["macro kb 1024 *", "4 kb"]), vec![I(4096)]);
        assert_eq!(stack_of(&["macro kb 1024 *", "macro mb kb 1024 *", "1 mb"]), vec![I(1048576)]);
    }

    #[test]
    fn macros_may_assign() {
        let d = digest(&["macro keep x=", "42 keep", "x 1 +"]);
        assert_eq!(d.stack().as_slice(), &[I(43)]);
    }

    #[test]
    fn redefinition_overwrites() {
        let d = digest(&["macro sq dup *", "macro sq dup dup * *", "2 sq"]);
        assert_eq!(d.stack().as_slice(), &[I(8)]);
        assert_eq!(d.env().bindings().count(), 1);
    }

    #[test]
    fn names_shadow_operators() {
        assert_eq!(stack_of(&["macro dup 7", "1 dup"]), vec![I(1), I(7)]);
    }

    #[test]
    fn macro_without_a_name() {
        let mut d = Digester::new();
        d.set_verbose(true);
        assert_eq!(d.digest_line("macro").unwrap(), Flow::Continue);
        assert!(!d.env().has_bindings());
        assert_eq!(d.take_messages(), vec!["macro skipped: needs a name"]);
    }

    #[test]
    fn empty_macro_expands_to_nothing() {
        assert_eq!(stack_of(&["macro nothing", "1 nothing"]), vec![I(1)]);
    }

    #[test]
    fn unrecognized_token_inside_a_macro_is_fatal() {
        let mut d = digest(&["macro bad 1 nope"]);
        let err = d.digest_line("bad 2").unwrap_err();
        assert_eq!(err, DigestError::Unrecognized("nope".into()));
        assert_eq!(d.stack().as_slice(), &[I(1)]);
    }

    #[test]
    fn self_reference_hits_the_depth_limit() {
        let config = Config { max_depth: 8, ..Config::default() };
        let mut d = Digester::with_config(&config);
        d.digest_line("macro forever 1 forever").unwrap();
        let err = d.digest_line("forever").unwrap_err();
        assert_eq!(err, DigestError::ExpansionTooDeep { name: "forever".into(), limit: 8 });
        assert!(!err.is_fatal());
        assert_eq!(d.stack().size(), 8);
        // still usable afterwards
        assert_eq!(d.digest_line("clr 1 2 +").unwrap(), Flow::Continue);
        assert_eq!(d.stack().as_slice(), &[I(3)]);
    }

    #[test]
    fn depth_limit_is_capped() {
        // a full-depth expansion needs more room than a default test thread has
        let worker = std::thread::Builder::new().stack_size(64 << 20).spawn(|| {
            let config = Config { max_depth: 10_000_000, ..Config::default() };
            let mut d = Digester::with_config(&config);
            d.digest_line("macro r r").unwrap();
            d.digest_line("r")
        });
        let result = worker.unwrap().join().unwrap();
        assert_eq!(result, Err(DigestError::ExpansionTooDeep { name: "r".into(), limit: MAX_DEPTH_CEILING }));
    }

    #[test]
    fn exit_stops_digestion() {
        let mut d = Digester::new();
        assert_eq!(d.digest_line("1 exit 2").unwrap(), Flow::Exit);
        assert_eq!(d.stack().as_slice(), &[I(1)]);
        assert_eq!(d.digest_line("quit").unwrap(), Flow::Exit);
        d.digest_line("macro bye 3 quit").unwrap();
        assert_eq!(d.digest_line("bye 4").unwrap(), Flow::Exit);
        assert_eq!(d.stack().as_slice(), &[I(1), I(3)]);
    }

    #[test]
    fn diagnostics_only_when_verbose() {
        let mut d = digest(&["1 0 /", "+"]);
        assert!(d.take_messages().is_empty());
        assert!(d.stack().is_empty());

        d.digest_line("verbose 1 0 / +").unwrap();
        assert_eq!(
            d.take_messages(),
            vec!["div() failed: division by zero", "add() skipped: needs 2 operand(s)"]
        );
        assert!(d.take_messages().is_empty());
    }

    #[test]
    fn vars_lists_bindings() {
        let mut d = digest(&["vars"]);
        assert_eq!(d.take_messages(), vec!["no variables"]);
        d.digest_line("macro kb 1024 *").unwrap();
        d.digest_line("3 x=").unwrap();
        d.digest_line("vars").unwrap();
        assert_eq!(d.take_messages(), vec!["kb=1024 *, x=3"]);
    }

    #[test]
    fn clear_commands() {
        let d = digest(&["macro kb 1024 *", "1 2 hex 3 repeat cla"]);
        assert!(d.stack().is_empty());
        assert!(!d.env().has_bindings());
        assert_eq!(d.env().base, Base::Hexadecimal);
        assert_eq!(d.env().repeat, 1);
    }

    #[test]
    fn base_affects_rendering_only() {
        let mut d = digest(&["hex 255"]);
        assert_eq!(d.prompt(), "[ff]");
        let top = d.pop_top().unwrap();
        assert_eq!(top, I(255));
        assert_eq!(d.render(&top), "ff");
        assert_eq!(d.render(&F(2.5)), "2.5");
    }

    #[test]
    fn settings_from_the_caller() {
        let mut d = Digester::new();
        d.set_base(Base::Binary);
        d.set_orientation(Orientation::Vertical);
        d.digest_line("5").unwrap();
        assert_eq!(d.prompt(), "Stack:\n================\n101\n--------\n");
        d.digest_line("stack").unwrap();
        assert_eq!(d.prompt(), "[101]");
    }

    #[test]
    fn blank_lines_do_nothing() {
        let mut d = Digester::new();
        assert_eq!(d.digest_line("").unwrap(), Flow::Continue);
        assert_eq!(d.digest_line("   \t ").unwrap(), Flow::Continue);
        assert!(d.stack().is_empty());
    }

    #[test]
    fn pre_split_tokens() {
        let mut d = Digester::new();
        d.digest_tokens(&["6", "7", "*"]).unwrap();
        assert_eq!(d.stack().as_slice(), &[I(42)]);
        d.digest_tokens(&[String::from("answer=")]).unwrap();
        assert!(d.env().is_bound("answer"));
    }

    #[test]
    fn earlier_tokens_survive_a_failed_operator() {
        assert_eq!(stack_of(&["1 2 0 / 3"]), vec![I(1), I(3)]);
    }
}
