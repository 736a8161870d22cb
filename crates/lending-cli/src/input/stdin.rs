use serde_json::Value;
use std::io::{self, Read};

/// Loan terms, applications or account records piped in as JSON, e.g.
/// `echo '{"principal":"50000",...}' | lend emi`.
///
/// Returns `None` when stdin is a terminal or the pipe is empty, so the
/// command falls back to its flags.
pub fn read_stdin() -> Result<Option<Value>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;

    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let value: Value = serde_json::from_str(trimmed)
        .map_err(|e| format!("Failed to parse piped input as JSON: {}", e))?;
    tracing::debug!(bytes = trimmed.len(), "read input from stdin");
    Ok(Some(value))
}
