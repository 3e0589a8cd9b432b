//! Common test utilities for rpn integration tests

#![allow(dead_code)]

pub use rpn::{DigestError, Digester, Flow, Value};

/// Digest each line on one calculator, panicking on any error
pub fn run(lines: &[&str]) -> Digester {
    let mut digester = Digester::new();
    for line in lines {
        digester.digest_line(line).unwrap();
    }
    digester
}

/// Stack contents after digesting `lines`, bottom first
pub fn stack(lines: &[&str]) -> Vec<Value> {
    run(lines).stack().as_slice().to_vec()
}

/// Top of the stack rendered in the display base, like command-line mode prints it
pub fn top(lines: &[&str]) -> Option<String> {
    let mut digester = run(lines);
    let value = digester.pop_top()?;
    Some(digester.render(&value))
}

/// `rpn` binary with a private, empty HOME so no real startup file is read
pub fn rpn_cmd(home: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("rpn").unwrap();
    cmd.env("HOME", home).env_remove("RPN_RC").env_remove("RPN_MAX_DEPTH").env_remove("RPN_LOG");
    cmd
}
