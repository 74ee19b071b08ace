use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::SecureLendError;

static API_KEY_PATTERN: OnceLock<Regex> = OnceLock::new();

fn api_key_pattern() -> &'static Regex {
    API_KEY_PATTERN.get_or_init(|| {
        Regex::new(r"^sk_(test|live)_[A-Za-z0-9]{32,}$").expect("api key pattern compiles")
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEnvironment {
    Test,
    Live,
}

impl KeyEnvironment {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Live => "live",
        }
    }
}

/// A SecureLend API key that passed format validation.
///
/// `Debug` and `Display` never print the secret part.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey {
    value: String,
    environment: KeyEnvironment,
}

impl ApiKey {
    pub fn parse(raw: &str) -> Result<Self, SecureLendError> {
        let captures = api_key_pattern()
            .captures(raw)
            .ok_or_else(SecureLendError::credential_format)?;
        let environment = match captures.get(1).map(|m| m.as_str()) {
            Some("live") => KeyEnvironment::Live,
            _ => KeyEnvironment::Test,
        };
        Ok(Self {
            value: raw.to_string(),
            environment,
        })
    }

    pub fn environment(&self) -> KeyEnvironment {
        self.environment
    }

    pub fn expose(&self) -> &str {
        &self.value
    }

    fn redacted(&self) -> String {
        let tail_start = self.value.len().saturating_sub(4);
        format!(
            "sk_{}_****{}",
            self.environment.as_str(),
            &self.value[tail_start..]
        )
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ApiKey").field(&self.redacted()).finish()
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}
