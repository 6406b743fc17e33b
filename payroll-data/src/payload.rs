use std::fs;
use std::path::Path;

use clap::ValueEnum;
use serde_json::Value;

use crate::csv_loader;
use crate::error::LoadError;
use crate::json_loader;

/// File formats an employee payload can arrive in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadFormat {
    Json,
    Csv,
}

impl PayloadFormat {
    /// Infer the format from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }

    /// Parse `input` into raw, untranslated employee records.
    pub fn parse(
        self,
        input: &str,
    ) -> Result<Vec<Value>, LoadError> {
        match self {
            Self::Json => json_loader::parse_payload(input),
            Self::Csv => csv_loader::parse_rows(input),
        }
    }
}

/// Read a payload file from disk and parse it.
///
/// `format` overrides the extension-based guess.
///
/// # Errors
///
/// * [`LoadError::UnknownFormat`] when no format is given and the extension
///   is not recognised.
/// * [`LoadError::Io`] when the file cannot be read.
/// * Any parse error of the chosen format.
pub fn load_file(
    path: &Path,
    format: Option<PayloadFormat>,
) -> Result<Vec<Value>, LoadError> {
    let format = format
        .or_else(|| PayloadFormat::from_path(path))
        .ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;

    let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), ?format, "parsing payload");
    format.parse(&contents)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn format_is_inferred_from_extension() {
        assert_eq!(PayloadFormat::from_path(Path::new("a.json")), Some(PayloadFormat::Json));
        assert_eq!(PayloadFormat::from_path(Path::new("dir/B.CSV")), Some(PayloadFormat::Csv));
        assert_eq!(PayloadFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(PayloadFormat::from_path(Path::new("no_extension")), None);
    }

    #[test]
    fn unknown_extension_without_override_is_rejected() {
        let err = load_file(Path::new("employees.xlsx"), None).expect_err("unknown format");

        assert!(matches!(err, LoadError::UnknownFormat(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = load_file(Path::new("/this/path/does/not/exist.json"), None)
            .expect_err("missing file");

        assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
    }
}
