use tracing::debug;

use crate::config::ApiConfig;

/// Try to run a CLI command and capture stdout as a token
fn try_cli_token(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            return Some(token);
        }
    }
    None
}

fn env_token(var: &str) -> Option<String> {
    let token = std::env::var(var).ok()?;
    let token = token.trim().to_string();
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Find an API token, trying in order:
/// 1. the configured env var
/// 2. the configured CLI command
///
/// Public repositories are readable without one, so `None` is not an error.
pub fn resolve_token(api: &ApiConfig) -> Option<String> {
    if let Some(token) = api.token_env.as_deref().and_then(env_token) {
        debug!("using token from environment");
        return Some(token);
    }

    if let Some(token) = api.token_command.as_deref().and_then(try_cli_token) {
        debug!("using token from command");
        return Some(token);
    }

    debug!("no token found, requests are unauthenticated");
    None
}
