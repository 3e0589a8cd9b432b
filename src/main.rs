//! rpn - Reverse Polish Notation calculator
//!
//! Usage:
//!   rpn                  Start interactive mode
//!   rpn 1 2 +            Evaluate a one line expression
//!   rpn --ops            List the operators

mod cli;
mod rcfile;
mod repl;

use rpn::config::DEFAULT_LOG_FILTER;
use rpn::{present, Config, DigestError, Digester, Flow};
use std::env;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit status for unrecognized input and bad usage
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();
    let cli = match cli::parse_args(&args) {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Try 'rpn --help' for more information.");
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if cli.help {
        cli::print_help();
        return ExitCode::SUCCESS;
    }
    if cli.version {
        cli::print_version();
        return ExitCode::SUCCESS;
    }

    let config = Config::from_env();
    init_tracing(&config);

    if cli.ops {
        print!("{}", present::catalog_text());
    }
    if cli.examples {
        cli::print_examples();
    }
    if (cli.ops || cli.examples) && cli.expression.is_empty() {
        return ExitCode::SUCCESS;
    }

    let mut digester = Digester::with_config(&config);
    digester.set_verbose(cli.verbose);
    digester.set_base(cli.base);
    digester.set_orientation(cli.mode);

    if let Some(ref path) = config.rc_path {
        match rcfile::load_rc(&mut digester, path) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return ExitCode::SUCCESS,
            Err(e) => return report_error(&e),
        }
    }

    if !cli.expression.is_empty() {
        return cli::run_expression(&mut digester, &cli.expression);
    }

    match repl::run_repl(&mut digester, &config) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries results only
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print queued diagnostics and `vars` output
pub(crate) fn print_messages(digester: &mut Digester) {
    for message in digester.take_messages() {
        println!("{}", message);
    }
}

pub(crate) fn report_error(e: &DigestError) -> ExitCode {
    if e.is_fatal() {
        eprintln!("ERROR: {}", e);
        ExitCode::from(EXIT_USAGE)
    } else {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    }
}
