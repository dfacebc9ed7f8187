//! Uploaded file validation and filename sanitising

use regex::Regex;
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};
use crate::types::FileType;

/// A validated upload ready for extraction
#[derive(Debug, Clone)]
pub struct Upload {
    /// Sanitised filename
    pub filename: String,
    pub file_type: FileType,
    pub data: Vec<u8>,
}

impl Upload {
    /// Validate a raw multipart file part
    ///
    /// `None` means the request had no `file` part at all.
    pub fn from_part(part: Option<(String, Vec<u8>)>) -> Result<Self> {
        let (raw_name, data) =
            part.ok_or_else(|| Error::validation("No file part in the request."))?;

        if raw_name.is_empty() {
            return Err(Error::validation("No selected file."));
        }
        if FileType::from_filename(&raw_name).is_none() {
            return Err(Error::validation("File type not allowed."));
        }

        let filename = sanitize_filename(&raw_name);
        let file_type = FileType::from_filename(&filename)
            .ok_or_else(|| Error::validation("File type not allowed."))?;

        Ok(Self {
            filename,
            file_type,
            data,
        })
    }
}

fn unsafe_chars() -> &'static Regex {
    static UNSAFE: OnceLock<Regex> = OnceLock::new();
    UNSAFE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid filename pattern"))
}

/// Reduce a client-supplied filename to a safe flat name
///
/// Accents are folded (NFKD) before non-ASCII is dropped. Path separators
/// become word breaks, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` trimmed.
pub fn sanitize_filename(name: &str) -> String {
    let ascii: String = name
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    unsafe_chars()
        .replace_all(&joined, "")
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
