use md5::{Digest, Md5};

use crate::config::ApiConfig;
use crate::error::{CatalogError, Result};

/// Public/private key pair for the catalog API. Opaque to everything but
/// request signing.
#[derive(Clone)]
pub struct Credentials {
    pub public_key: String,
    private_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl Credentials {
    pub fn new(public_key: String, private_key: String) -> Self {
        Self {
            public_key,
            private_key,
        }
    }

    /// `md5(ts + private_key + public_key)` as 32 lowercase hex digits.
    pub fn sign(&self, ts: &str) -> String {
        let mut hasher = Md5::new();
        hasher.update(ts.as_bytes());
        hasher.update(self.private_key.as_bytes());
        hasher.update(self.public_key.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

/// Current Unix time in milliseconds, the timestamp format the API expects.
pub fn timestamp() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

/// Try to run a CLI command and capture the first line of stdout as a key
fn try_cli_key(command: &str) -> Option<String> {
    let output = std::process::Command::new("sh")
        .args(["-c", command])
        .output()
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let key = stdout.lines().next().unwrap_or("").trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

fn try_env_key(var: &str) -> Option<String> {
    let key = std::env::var(var).ok()?;
    let key = key.trim().to_string();
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// Resolve one key: environment variable first, then the configured command.
fn resolve_key(label: &str, env: Option<&str>, command: Option<&str>) -> Result<String> {
    if let Some(key) = env.and_then(try_env_key) {
        return Ok(key);
    }

    if let Some(key) = command.and_then(try_cli_key) {
        return Ok(key);
    }

    Err(CatalogError::Config(format!(
        "No {} key found. Set {} or configure a {}_key_command.",
        label,
        env.unwrap_or("a key env var"),
        label
    )))
}

pub fn load_credentials(api: &ApiConfig) -> Result<Credentials> {
    let public_key = resolve_key(
        "public",
        api.public_key_env.as_deref(),
        api.public_key_command.as_deref(),
    )?;
    let private_key = resolve_key(
        "private",
        api.private_key_env.as_deref(),
        api.private_key_command.as_deref(),
    )?;
    Ok(Credentials::new(public_key, private_key))
}
