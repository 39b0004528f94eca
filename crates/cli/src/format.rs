//! Rendering server responses to stdout/stderr and mapping them to a
//! process exit code.
//!
//! Exit codes follow a plain three-way split: `0` the call succeeded,
//! `1` the node answered but rejected the request, `2` the command
//! itself could not be understood (bad arguments, malformed JSON).

use serde_json::Value;

use crate::client::ClientError;

/// Exit code for a successful call.
pub const EXIT_OK: i32 = 0;
/// Exit code for an application-level rejection (not found, not leader, conflict, ...).
pub const EXIT_APP_ERROR: i32 = 1;
/// Exit code for a usage error: bad arguments, malformed JSON, unparsable input.
pub const EXIT_USAGE_ERROR: i32 = 2;

/// Print a successful response body, either as raw JSON or, where it adds
/// nothing beyond the JSON, as a short human-readable line.
pub fn print_success(body: &Value, as_json: bool) {
    if as_json {
        println!("{}", serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string()));
        return;
    }
    match body.get("status").and_then(Value::as_str) {
        Some("skipped_by_lww") => {
            let winner = body.get("winning_version").and_then(Value::as_u64).unwrap_or(0);
            println!("skipped: a newer write (version {}) already won", winner);
        }
        Some("ok") => match body.get("version").and_then(Value::as_u64) {
            Some(v) => println!("ok (version {})", v),
            None => println!("ok"),
        },
        _ => println!("{}", serde_json::to_string_pretty(body).unwrap_or_else(|_| body.to_string())),
    }
}

/// Print a `ClientError` to stderr and return the exit code it maps to.
pub fn print_client_error(err: &ClientError) -> i32 {
    match err {
        ClientError::Transport(msg) => {
            eprintln!("error: {}", msg);
            EXIT_APP_ERROR
        }
        ClientError::Api { status, body } => {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request failed");
            eprintln!("error: {}", message);
            if let Some(leader_addr) = body.get("leader_addr").and_then(Value::as_str) {
                eprintln!("hint: current leader is at {}", leader_addr);
            }
            if *status == 400 {
                EXIT_USAGE_ERROR
            } else {
                EXIT_APP_ERROR
            }
        }
    }
}

/// Print a usage error (bad CLI argument, malformed JSON payload) and
/// return its exit code.
pub fn print_usage_error(message: &str) -> i32 {
    eprintln!("error: {}", message);
    EXIT_USAGE_ERROR
}
