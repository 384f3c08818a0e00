use unicode_normalization::UnicodeNormalization;

/// Error type for folder validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderValidationError {
    Empty,
    ContainsNullByte,
    ContainsBackslash,
    AbsolutePath,
    EmptySegment,
    IsSpecialDirectory,
}

impl FolderValidationError {
    pub fn message(&self) -> &'static str {
        match self {
            FolderValidationError::Empty => "Folder cannot be empty",
            FolderValidationError::ContainsNullByte => "Folder cannot contain null bytes",
            FolderValidationError::ContainsBackslash => "Folder cannot contain backslashes",
            FolderValidationError::AbsolutePath => "Folder cannot start with '/'",
            FolderValidationError::EmptySegment => "Folder cannot contain empty segments",
            FolderValidationError::IsSpecialDirectory => {
                "Folder segments cannot be '.' or '..'"
            }
        }
    }
}

impl std::fmt::Display for FolderValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for FolderValidationError {}

/// Validate a folder so it can only address keys below itself.
/// `/` separates segments; every segment must be a plain name.
pub fn validate_folder(folder: &str) -> Result<(), FolderValidationError> {
    if folder.trim().is_empty() {
        return Err(FolderValidationError::Empty);
    }

    if folder.contains('\0') {
        return Err(FolderValidationError::ContainsNullByte);
    }

    if folder.contains('\\') {
        return Err(FolderValidationError::ContainsBackslash);
    }

    if folder.starts_with('/') {
        return Err(FolderValidationError::AbsolutePath);
    }

    for segment in folder.split('/') {
        if segment.is_empty() {
            return Err(FolderValidationError::EmptySegment);
        }
        if segment == "." || segment == ".." {
            return Err(FolderValidationError::IsSpecialDirectory);
        }
    }

    Ok(())
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// The name is NFKD-decomposed first so accented letters keep their base
/// letter. Path separators become whitespace, whitespace runs are joined
/// with `_`, anything outside `[A-Za-z0-9_.-]` is dropped and leading or
/// trailing `.`/`_` are stripped. An empty result means nothing usable was
/// left.
pub fn sanitize_filename(filename: &str) -> String {
    let spaced: String = filename
        .nfkd()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_matches(|c| c == '.' || c == '_').replace(' ', "_")
}
