use rpn::{Base, Digester, Flow, Orientation};
use std::process::ExitCode;
use thiserror::Error;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug, PartialEq)]
pub(crate) enum UsageError {
    #[error("option '{0}' requires a value")]
    MissingValue(String),
    #[error("invalid value '{value}' for '{flag}' (choose from {choices})")]
    InvalidChoice {
        flag: String,
        value: String,
        choices: &'static str,
    },
}

/// Parsed command-line arguments
#[derive(Debug, PartialEq)]
pub(crate) struct CliArgs {
    pub(crate) verbose: bool,
    pub(crate) ops: bool,
    pub(crate) examples: bool,
    pub(crate) base: Base,
    pub(crate) mode: Orientation,
    pub(crate) help: bool,
    pub(crate) version: bool,
    /// Everything that is not a known flag, in order
    pub(crate) expression: Vec<String>,
}

/// Parse command-line arguments.
///
/// Only known flags are options; anything else, `-`, `--` and `-5`
/// included, is part of the expression.
pub(crate) fn parse_args(args: &[String]) -> Result<CliArgs, UsageError> {
    let mut cli = CliArgs {
        verbose: false,
        ops: false,
        examples: false,
        base: Base::Decimal,
        mode: Orientation::Horizontal,
        help: false,
        version: false,
        expression: Vec::new(),
    };

    let mut i = 1; // Skip program name
    while i < args.len() {
        let arg = args[i].as_str();
        let (flag, inline) = match arg.split_once('=') {
            Some((f, v)) if f.starts_with("--") => (f, Some(v)),
            _ => (arg, None),
        };
        match flag {
            "-v" | "--verbose" => cli.verbose = true,
            "-o" | "--ops" => cli.ops = true,
            "-e" | "--eg" => cli.examples = true,
            "-h" | "--help" => cli.help = true,
            "-V" | "--version" => cli.version = true,
            "-b" | "--base" => {
                let value = option_value(args, &mut i, flag, inline)?;
                cli.base = Base::from_radix(&value).ok_or(UsageError::InvalidChoice {
                    flag: flag.to_string(),
                    value,
                    choices: "2, 8, 10, 16",
                })?;
            }
            "-m" | "--mode" => {
                let value = option_value(args, &mut i, flag, inline)?;
                cli.mode = Orientation::from_flag(&value).ok_or(UsageError::InvalidChoice {
                    flag: flag.to_string(),
                    value,
                    choices: "h, v",
                })?;
            }
            _ => cli.expression.push(args[i].clone()),
        }
        i += 1;
    }

    Ok(cli)
}

fn option_value(args: &[String], i: &mut usize, flag: &str, inline: Option<&str>) -> Result<String, UsageError> {
    if let Some(v) = inline {
        return Ok(v.to_string());
    }
    *i += 1;
    args.get(*i).cloned().ok_or_else(|| UsageError::MissingValue(flag.to_string()))
}

pub(crate) fn print_help() {
    println!(
        r#"rpn-{} Reverse Polish Notation calculator

USAGE:
    rpn [OPTIONS]                 Start interactive mode
    rpn [OPTIONS] <EXPRESSION>    Evaluate a one line expression

OPTIONS:
    -v, --verbose           Start in verbose mode
    -o, --ops               Show available operators
    -e, --eg                Show usage examples
    -b, --base <BASE>       Display base: 2, 8, 10 or 16 [default: 10]
    -m, --mode <MODE>       Stack display: h (horizontal) or v (vertical) [default: h]
    -V, --version           Show version
    -h, --help              Show this help message

STARTUP:
    ~/.rpnrc                Digested line by line before any input
    RPN_RC                  Use another startup file
    RPN_MAX_DEPTH           Macro nesting limit [default: 256]
    RPN_LOG                 Log filter written to stderr [default: warn]"#,
        VERSION
    );
}

pub(crate) fn print_version() {
    println!("{}", VERSION);
}

pub(crate) fn print_examples() {
    println!(
        r#"
USAGE EXAMPLES.

rpn                       - launch in interactive mode
rpn [expression]          - evaluate a one line expression

One line expression examples:
-----------------------------
$ rpn 1 2 +
3
$ rpn -b 16 255
ff
$ rpn 1 2 + dup '*' 3 repeat dup '*' '*' swap drop sqrt pi '*' 20 / round
4

Interactive mode example:
-----------------------------
$ rpn
> 1 2 +
[3]> dup *
[9]> 3 repeat dup * *
[9 729]> swap drop sqrt
[27.0]> macro kb 1024 *
[27.0]> dbg
kb=1024 * [27.0]> clr 4 kb
kb=1024 * [4096]> x=
kb=1024 *, x=4096 > x 2 /
kb=1024 *, x=4096 [2048.0]> exit
"#
    );
}

/// Digest the expression as one line and print the top of the stack
pub(crate) fn run_expression(digester: &mut Digester, expression: &[String]) -> ExitCode {
    let line = expression.join(" ");
    let result = digester.digest_line(&line);
    crate::print_messages(digester);
    match result {
        Ok(Flow::Exit) => return ExitCode::SUCCESS,
        Ok(Flow::Continue) => {}
        Err(e) => return crate::report_error(&e),
    }

    if digester.env().verbose {
        println!("{}", digester.prompt());
    }
    if let Some(top) = digester.pop_top() {
        println!("{}", digester.render(&top));
    }
    ExitCode::SUCCESS
}
