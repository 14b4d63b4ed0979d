use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::LazyLock;

// Match OpenAI-style keys: sk-..., sk-proj-...
static API_KEY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"sk-[a-zA-Z0-9_-]{16,}").expect("valid api key pattern"));

// Match Bearer tokens in Authorization headers
static BEARER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9_\-\.]+").expect("valid bearer pattern"));

// Match generic key/token fields
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(["']?(?:api_key|apikey|x-api-key|token|secret)["']?\s*[:=]\s*)["']?[a-zA-Z0-9_\-\.]{8,}["']?"#)
        .expect("valid token pattern")
});

/// Scrubs sensitive data from text before it reaches a log sink
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = API_KEY_PATTERN.replace_all(message, "[API_KEY_REDACTED]");
        let scrubbed = replace(scrubbed, &BEARER_PATTERN, "Bearer [TOKEN_REDACTED]");
        let scrubbed = replace(scrubbed, &TOKEN_PATTERN, "${1}[REDACTED]");
        scrubbed.into_owned()
    }
}

fn replace<'a>(text: Cow<'a, str>, pattern: &Regex, replacement: &str) -> Cow<'a, str> {
    match pattern.replace_all(&text, replacement) {
        Cow::Borrowed(_) => text,
        Cow::Owned(owned) => Cow::Owned(owned),
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}

/// Show only the first 8 characters of a credential
pub fn mask_key(key: &str) -> String {
    if key.chars().count() > 8 {
        format!("{}...[REDACTED]", key.chars().take(8).collect::<String>())
    } else {
        "[REDACTED]".to_string()
    }
}
