//! Where the email text comes from: a file, stdin, or an inline flag

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum Source {
    Inline(String),
    File(PathBuf),
    Stdin,
}

impl Source {
    pub fn new(file: Option<PathBuf>, text: Option<String>) -> Self {
        match (text, file) {
            (Some(text), _) => Source::Inline(text),
            (None, Some(path)) if path.as_os_str() != "-" => Source::File(path),
            _ => Source::Stdin,
        }
    }

    /// Read the full email text
    pub fn read(&self) -> Result<String> {
        match self {
            Source::Inline(text) => Ok(text.clone()),
            Source::File(path) => read_file(path),
            Source::Stdin => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read email text from stdin")?;
                Ok(buf)
            }
        }
    }
}

pub fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read email file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_selection() {
        assert!(matches!(
            Source::new(Some("a.txt".into()), Some("x".into())),
            Source::Inline(_)
        ));
        assert!(matches!(Source::new(Some("a.txt".into()), None), Source::File(_)));
        assert!(matches!(Source::new(Some("-".into()), None), Source::Stdin));
        assert!(matches!(Source::new(None, None), Source::Stdin));
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = Source::File("/nonexistent/email.txt".into()).read().unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/email.txt"));
    }
}
