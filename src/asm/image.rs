//! Program image file format.
//!
//! A simple text format for assembled byte sequences:
//! - one hex byte per line
//! - lines starting with `;` are comments
//! - blank lines are ignored
//!
//! The origin is not part of the file; images are positioned when loaded
//! into a machine.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use thiserror::Error;

/// A loaded image file.
#[derive(Debug, Clone, Default)]
pub struct ImageFile {
    /// The program bytes.
    pub bytes: Vec<u8>,
}

impl ImageFile {
    /// Create an empty image file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Load an image file from disk.
pub fn load_image_file<P: AsRef<Path>>(path: P) -> Result<ImageFile, ImageError> {
    let file = std::fs::File::open(path.as_ref()).map_err(|e| ImageError::Io(e.to_string()))?;
    let reader = BufReader::new(file);

    let mut image = ImageFile::new();
    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result.map_err(|e| ImageError::Io(e.to_string()))?;
        if let Some(byte) = parse_line(&line, line_num + 1)? {
            image.bytes.push(byte);
        }
    }
    Ok(image)
}

/// Save a byte sequence to disk as an image file.
pub fn save_image_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<(), ImageError> {
    let mut file =
        std::fs::File::create(path.as_ref()).map_err(|e| ImageError::Io(e.to_string()))?;

    writeln!(file, "; micro181 image").map_err(|e| ImageError::Io(e.to_string()))?;
    writeln!(file, "; {} bytes", bytes.len()).map_err(|e| ImageError::Io(e.to_string()))?;
    writeln!(file).map_err(|e| ImageError::Io(e.to_string()))?;

    for (i, byte) in bytes.iter().enumerate() {
        writeln!(file, "{:02x} ; {:03}", byte, i).map_err(|e| ImageError::Io(e.to_string()))?;
    }
    Ok(())
}

/// Parse one line: `None` for blanks and comments, the byte otherwise.
fn parse_line(line: &str, line_num: usize) -> Result<Option<u8>, ImageError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with(';') {
        return Ok(None);
    }
    let field = match trimmed.find(';') {
        Some(idx) => trimmed[..idx].trim(),
        None => trimmed,
    };
    u8::from_str_radix(field, 16)
        .map(Some)
        .map_err(|_| ImageError::Parse {
            line: line_num,
            text: field.to_string(),
        })
}

/// Errors that can occur during image file operations.
#[derive(Debug, Clone, Error)]
pub enum ImageError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("parse error on line {line}: {text:?} is not a hex byte")]
    Parse { line: usize, text: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("", 1).unwrap(), None);
        assert_eq!(parse_line("; comment", 1).unwrap(), None);
        assert_eq!(parse_line("a7", 1).unwrap(), Some(0xa7));
        assert_eq!(parse_line("  0f ; trailing note", 1).unwrap(), Some(0x0f));
        assert!(parse_line("not hex", 1).is_err());
    }

    #[test]
    fn test_file_roundtrip() {
        let bytes = [0x01u8, 0xb8, 0xaa, 0xbb];
        let path = std::env::temp_dir().join("micro181-image-test.txt");
        save_image_file(&path, &bytes).unwrap();
        let loaded = load_image_file(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(loaded.bytes, bytes);
    }
}
