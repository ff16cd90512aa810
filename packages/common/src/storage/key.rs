/// Reasons a fragment id cannot be used as a storage key on disk.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyError {
    /// Id is empty or whitespace-only.
    Empty,
    /// Id contains path separators (`/` or `\`).
    ContainsPathSeparator,
    /// Id is `.` or `..`.
    PathTraversal,
    /// Id starts with a dot and would be a hidden file.
    Hidden,
    /// Id contains NUL or other control characters.
    ControlCharacter,
}

impl KeyError {
    /// Returns a human-readable error message.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "fragment id cannot be empty",
            Self::ContainsPathSeparator => "fragment id must not contain path separators",
            Self::PathTraversal => "fragment id must not be '.' or '..'",
            Self::Hidden => "fragment id must not start with '.'",
            Self::ControlCharacter => "fragment id must not contain control characters",
        }
    }
}

/// Validates that a fragment id can be used as a single flat file name.
pub fn validate_fragment_id(id: &str) -> Result<&str, KeyError> {
    if id.trim().is_empty() {
        return Err(KeyError::Empty);
    }

    if id.chars().any(|c| c.is_control()) {
        return Err(KeyError::ControlCharacter);
    }

    if id.contains('/') || id.contains('\\') {
        return Err(KeyError::ContainsPathSeparator);
    }

    if id == "." || id == ".." {
        return Err(KeyError::PathTraversal);
    }

    if id.starts_with('.') {
        return Err(KeyError::Hidden);
    }

    Ok(id)
}
