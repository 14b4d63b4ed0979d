//! Persona loading
//!
//! The persona is the system instruction sent with every chat request. It is
//! read once from a PDF at startup and never fails: any problem falls back to
//! [`DEFAULT_PERSONA`].

use std::path::Path;

use tracing::{info, warn};

use crate::infrastructure::pdf;

/// Used when the persona PDF is missing, unreadable or blank
pub const DEFAULT_PERSONA: &str = "You are a helpful, friendly assistant. \
Answer clearly and concisely, and say so when you do not know the answer.";

/// Load the persona text from `path`, trimmed, or the default persona
pub fn load_persona(path: &Path) -> String {
    match pdf::extract_text(path) {
        Ok(text) => {
            let text = text.trim();
            if text.is_empty() {
                warn!(path = %path.display(), "Persona PDF has no text, using default persona");
                DEFAULT_PERSONA.to_string()
            } else {
                info!(path = %path.display(), chars = text.chars().count(), "Loaded persona");
                text.to_string()
            }
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load persona, using default persona");
            DEFAULT_PERSONA.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::pdf::testing::write_text_pdf;

    #[test]
    fn test_missing_file_falls_back() {
        assert_eq!(load_persona(Path::new("/no/such/persona.pdf")), DEFAULT_PERSONA);
    }

    #[test]
    fn test_corrupt_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.pdf");
        std::fs::write(&path, b"%PDF-1.4 truncated garbage").unwrap();

        assert_eq!(load_persona(&path), DEFAULT_PERSONA);
    }

    #[test]
    fn test_empty_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.pdf");
        std::fs::write(&path, b"").unwrap();

        assert_eq!(load_persona(&path), DEFAULT_PERSONA);
    }

    #[test]
    fn test_blank_pdf_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.pdf");
        write_text_pdf(&path, &[""]);

        assert_eq!(load_persona(&path), DEFAULT_PERSONA);
    }

    #[test]
    fn test_loads_pdf_text_idempotently() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persona.pdf");
        write_text_pdf(&path, &["You are Gabe, a cheerful Steam support agent."]);

        let first = load_persona(&path);
        let second = load_persona(&path);

        assert!(first.contains("cheerful Steam support agent"));
        assert_eq!(first, first.trim());
        assert_eq!(first, second);
    }
}
