use rpn::{Config, Digester, Environment, Flow, OPERATORS};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper, Result as RlResult};
use std::process::ExitCode;
use tracing::debug;

/// Tab completion over operator spellings and the current bindings
struct RpnHelper {
    names: Vec<String>,
}

impl RpnHelper {
    fn new() -> Self {
        RpnHelper { names: Vec::new() }
    }

    fn refresh(&mut self, env: &Environment) {
        self.names = env.bindings().map(|(name, _)| name.to_string()).collect();
    }

    fn candidates(&self, prefix: &str) -> Vec<String> {
        let spellings = OPERATORS.iter().flat_map(|spec| spec.spellings.iter().copied());
        let mut found: Vec<String> = spellings
            .chain(self.names.iter().map(String::as_str))
            .filter(|word| word.starts_with(prefix))
            .map(String::from)
            .collect();
        found.sort();
        found.dedup();
        found
    }
}

/// Byte offset where the word ending at `pos` begins
fn word_start(line: &str, pos: usize) -> usize {
    let word = line[..pos].rsplit(char::is_whitespace).next().unwrap_or("");
    pos - word.len()
}

impl Helper for RpnHelper {}

impl Completer for RpnHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &rustyline::Context<'_>) -> rustyline::Result<(usize, Vec<Pair>)> {
        let start = word_start(line, pos);
        let prefix = &line[start..pos];
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        let pairs = self
            .candidates(prefix)
            .into_iter()
            .map(|c| Pair {
                display: c.clone(),
                replacement: c,
            })
            .collect();
        Ok((start, pairs))
    }
}

impl Hinter for RpnHelper {
    type Hint = String;
}

impl Highlighter for RpnHelper {}

impl Validator for RpnHelper {}

/// Read lines until `exit`, Ctrl-C or Ctrl-D
pub(crate) fn run_repl(digester: &mut Digester, config: &Config) -> RlResult<ExitCode> {
    let mut rl: Editor<RpnHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(RpnHelper::new()));

    if let Some(ref path) = config.history_path {
        if let Err(e) = rl.load_history(path) {
            debug!(path = %path.display(), error = %e, "no history loaded");
        }
    }

    let code = loop {
        if let Some(helper) = rl.helper_mut() {
            helper.refresh(digester.env());
        }
        let prompt = format!("{}> ", digester.prompt());

        match rl.readline(&prompt) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                let result = digester.digest_line(&line);
                crate::print_messages(digester);
                match result {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Exit) => break ExitCode::SUCCESS,
                    Err(e) if e.is_fatal() => break crate::report_error(&e),
                    Err(e) => eprintln!("Error: {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break ExitCode::FAILURE;
            }
        }
    };

    if let Some(ref path) = config.history_path {
        if let Err(e) = rl.save_history(path) {
            debug!(path = %path.display(), error = %e, "history not saved");
        }
    }

    Ok(code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rpn::{Binding, Value};

    #[test]
    fn completes_operators_and_bindings() {
        let mut helper = RpnHelper::new();
        let mut env = Environment::new();
        env.bind("hexa", Binding::Variable(Value::Int(1)));
        helper.refresh(&env);
        assert_eq!(helper.candidates("hex"), vec!["hex", "hexa", "hexadecimal"]);
        assert_eq!(helper.candidates("rol"), vec!["roll", "rolld"]);
        assert!(helper.candidates("zzz").is_empty());
    }

    #[test]
    fn word_start_after_wide_whitespace() {
        let line = "1\u{3000}he";
        assert_eq!(word_start(line, line.len()), 4);
        assert_eq!(&line[word_start(line, line.len())..], "he");
        assert_eq!(word_start("1 2 ro", 6), 4);
        assert_eq!(word_start("dup", 3), 0);
        assert_eq!(word_start("1 ", 2), 2);
    }
}
