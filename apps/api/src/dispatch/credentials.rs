use std::fmt;
use std::sync::Arc;

/// An opaque API key. Formatting never reveals the secret, only its last four characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn secret(&self) -> &str {
        &self.0
    }

    /// `...abcd` — safe to log.
    pub fn hint(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
        format!("...{tail}")
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Credential").field(&self.hint()).finish()
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hint())
    }
}

/// Immutable set of interchangeable credentials, loaded once at startup.
///
/// Cloning shares the same backing slice; nothing mutates it after construction.
#[derive(Clone, Debug)]
pub struct CredentialPool {
    credentials: Arc<[Credential]>,
}

impl CredentialPool {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self {
            credentials: credentials.into(),
        }
    }

    /// Parses a comma-separated key list. Whitespace is trimmed and blank entries dropped.
    pub fn from_comma_separated(raw: &str) -> Self {
        Self::new(
            raw.split(',')
                .map(str::trim)
                .filter(|key| !key.is_empty())
                .map(Credential::new)
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn as_slice(&self) -> &[Credential] {
        &self.credentials
    }
}
