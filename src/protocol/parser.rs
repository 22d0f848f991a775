// src/protocol/parser.rs - Explicit tokenizer for the command grammar
//
// Accepts `verb(arg1,arg2,...)` with an optional trailing `;`. The verb is an
// alphanumeric/underscore token; the argument region runs to the first `)` and
// is split on commas only, so arguments cannot themselves contain literal
// commas or closing parentheses.
use super::{Command, ParseError};

pub fn parse_command(line: &str) -> Result<Command, ParseError> {
    let line = line.trim();
    tracing::debug!("Parsing message command: {}", line);

    let bytes = line.as_bytes();
    let mut pos = 0;

    // Verb token: [A-Za-z0-9_]+
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'_') {
        pos += 1;
    }
    if pos == 0 {
        return Err(malformed(line));
    }
    let verb = &line[..pos];

    // Opening parenthesis
    if pos >= bytes.len() || bytes[pos] != b'(' {
        return Err(malformed(line));
    }
    pos += 1;

    // Argument region: everything up to the first `)`
    let args_start = pos;
    while pos < bytes.len() && bytes[pos] != b')' {
        pos += 1;
    }
    if pos >= bytes.len() {
        return Err(malformed(line));
    }
    let args_region = &line[args_start..pos];
    pos += 1;

    // Optional trailing semicolon, then end of input
    if pos < bytes.len() && bytes[pos] == b';' {
        pos += 1;
    }
    if pos != bytes.len() {
        return Err(malformed(line));
    }

    let args = split_args(args_region);

    tracing::debug!("Command parsed: {}", verb);
    tracing::debug!("Parameters parsed: {}", args.len());

    Ok(Command {
        verb: verb.to_string(),
        args,
    })
}

fn split_args(region: &str) -> Vec<String> {
    if region.is_empty() {
        return Vec::new();
    }
    let mut args: Vec<String> = region
        .split(',')
        .map(|arg| unquote(arg.trim()).to_string())
        .collect();
    // A single trailing comma does not introduce an empty final argument
    if region.ends_with(',') {
        args.pop();
    }
    args
}

/// Strips one matching pair of surrounding double quotes, trimming the
/// unwrapped content. Unquoted input passes through unchanged.
fn unquote(input: &str) -> &str {
    if input.len() >= 2 && input.starts_with('"') && input.ends_with('"') {
        input[1..input.len() - 1].trim()
    } else {
        input
    }
}

fn malformed(line: &str) -> ParseError {
    tracing::error!("Invalid message command: {}", line);
    ParseError::Malformed(line.to_string())
}
