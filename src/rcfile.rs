use rpn::{DigestError, Digester, Flow};
use std::fs;
use std::io;
use std::path::Path;
use tracing::{debug, warn};

/// Digest a startup file line by line.
///
/// A missing file is not an error. Blank lines and `#` comments are skipped.
/// Unrecognized tokens are fatal here like anywhere else; other digest errors
/// only skip the offending line.
pub(crate) fn load_rc(digester: &mut Digester, path: &Path) -> Result<Flow, DigestError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Flow::Continue),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read startup file");
            return Ok(Flow::Continue);
        }
    };
    debug!(path = %path.display(), "loading startup file");
    load_rc_content(digester, &content, path)
}

fn load_rc_content(digester: &mut Digester, content: &str, source: &Path) -> Result<Flow, DigestError> {
    for (line_num, line) in content.lines().enumerate() {
        let trimmed = line.trim();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let result = digester.digest_line(trimmed);
        crate::print_messages(digester);
        match result {
            Ok(Flow::Continue) => {}
            Ok(Flow::Exit) => return Ok(Flow::Exit),
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => warn!(source = %source.display(), line = line_num + 1, error = %e, "startup line skipped"),
        }
    }
    Ok(Flow::Continue)
}
