use crate::foundation::error::{StartupMovieError, StartupMovieResult};

/// Maximum encoded length of a [`LevelId`], in bytes.
pub const MAX_LEVEL_ID_BYTES: usize = 255;

/// Name of a game level, as used in slot file names and in the persisted state.
///
/// Identifiers are compared by exact byte equality. Construction truncates input longer than
/// [`MAX_LEVEL_ID_BYTES`] at the last UTF-8 character boundary that fits; a truncated name can
/// only miss a match, it cannot alias a different slot directory.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
#[serde(transparent)]
pub struct LevelId(String);

impl LevelId {
    /// Build an identifier from narrow text, truncating and validating it.
    ///
    /// Rejects empty names and names containing `/`, `\` or NUL.
    pub fn new(name: &str) -> StartupMovieResult<Self> {
        let truncated = truncate_to_boundary(name, MAX_LEVEL_ID_BYTES);
        if truncated.len() < name.len() {
            tracing::debug!(
                original_len = name.len(),
                kept = truncated.len(),
                "level identifier truncated"
            );
        }
        validate(truncated)?;
        Ok(Self(truncated.to_owned()))
    }

    /// Build an identifier from host wide text (UTF-16 code units, no terminator).
    ///
    /// Unpaired surrogates decode to U+FFFD.
    pub fn from_wide(units: &[u16]) -> StartupMovieResult<Self> {
        let mut lossy = false;
        let decoded: String = char::decode_utf16(units.iter().copied())
            .map(|r| {
                r.unwrap_or_else(|_| {
                    lossy = true;
                    char::REPLACEMENT_CHARACTER
                })
            })
            .collect();
        if lossy {
            tracing::warn!(name = %decoded, "level identifier contained unpaired surrogates");
        }
        Self::new(&decoded)
    }

    /// Borrow the identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Borrow the identifier bytes, as written to the state file.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl std::fmt::Display for LevelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for LevelId {
    type Err = StartupMovieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl<'de> serde::Deserialize<'de> for LevelId {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::new(&s).map_err(serde::de::Error::custom)
    }
}

fn truncate_to_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn validate(name: &str) -> StartupMovieResult<()> {
    if name.is_empty() {
        return Err(StartupMovieError::validation(
            "level identifier must be non-empty",
        ));
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(StartupMovieError::validation(format!(
            "level identifier {name:?} must not contain {c:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/level.rs"]
mod tests;
