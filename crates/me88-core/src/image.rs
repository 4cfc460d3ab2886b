//! Binary-text program image codec.
//!
//! An image holds one byte per line, written as exactly eight `0`/`1`
//! characters, most significant bit first. Blank lines are skipped and
//! `\r\n` endings are accepted.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure while reading, decoding or placing a program image.
#[derive(Debug, Error)]
pub enum ImageError {
    /// The image file could not be read.
    #[error("failed to read image {path}: {source}")]
    Io {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// A line is not an 8-digit binary literal.
    #[error("line {line}: expected 8 binary digits, found {content:?}")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
        /// Offending line text.
        content: String,
    },
    /// The image does not fit in its target device.
    #[error("image of {len} bytes does not fit in {capacity} bytes")]
    TooLarge {
        /// Image length.
        len: usize,
        /// Remaining device capacity from the load address.
        capacity: usize,
    },
}

/// Width of one image line in digits.
pub const DIGITS_PER_LINE: usize = 8;

/// Decodes image text into bytes.
///
/// # Errors
///
/// Returns [`ImageError::MalformedLine`] for the first line that is not
/// exactly eight binary digits.
pub fn parse_image(text: &str) -> Result<Vec<u8>, ImageError> {
    let mut bytes = Vec::new();
    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        bytes.push(parse_line(line).ok_or_else(|| ImageError::MalformedLine {
            line: index + 1,
            content: line.to_string(),
        })?);
    }
    Ok(bytes)
}

fn parse_line(line: &str) -> Option<u8> {
    if line.len() != DIGITS_PER_LINE || !line.bytes().all(|b| b == b'0' || b == b'1') {
        return None;
    }
    u8::from_str_radix(line, 2).ok()
}

/// Encodes bytes as image text, one newline-terminated line per byte.
#[must_use]
pub fn encode_image(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * (DIGITS_PER_LINE + 1));
    for byte in bytes {
        text.push_str(&format!("{byte:08b}\n"));
    }
    text
}

/// Reads and decodes an image file.
///
/// # Errors
///
/// Returns [`ImageError::Io`] when the file cannot be read, or
/// [`ImageError::MalformedLine`] when its contents do not decode.
pub fn load_image(path: &Path) -> Result<Vec<u8>, ImageError> {
    let text = std::fs::read_to_string(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_image(&text)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use proptest::prelude::*;

    use super::{encode_image, load_image, parse_image, ImageError};

    #[test]
    fn parses_one_byte_per_line() {
        let bytes = parse_image("01100000\n00000101\r\n\n00010101\n").expect("valid image");
        assert_eq!(bytes, vec![0x60, 0x05, 0x15]);
    }

    #[test]
    fn reports_first_malformed_line() {
        let err = parse_image("00000001\n0000002\n1111111x\n").expect_err("bad line");
        match err {
            ImageError::MalformedLine { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "0000002");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_binary_digits() {
        assert!(matches!(
            parse_image("0000000x"),
            Err(ImageError::MalformedLine { line: 1, .. })
        ));
        assert!(matches!(
            parse_image("000000001"),
            Err(ImageError::MalformedLine { line: 1, .. })
        ));
    }

    #[test]
    fn encodes_most_significant_bit_first() {
        assert_eq!(encode_image(&[0x80, 0x01]), "10000000\n00000001\n");
    }

    #[test]
    fn loads_image_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "01100000\n00000101\n").expect("write image");
        assert_eq!(load_image(file.path()).expect("load"), vec![0x60, 0x05]);
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("absent.txt");
        let err = load_image(&path).expect_err("missing file");
        assert!(matches!(err, ImageError::Io { .. }));
        assert!(err.to_string().contains("absent.txt"));
    }

    proptest! {
        #[test]
        fn encoded_images_decode_to_the_same_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
            prop_assert_eq!(parse_image(&encode_image(&bytes)).expect("encoded image"), bytes);
        }

        #[test]
        fn arbitrary_text_never_panics(text in ".{0,64}") {
            let _ = parse_image(&text);
        }
    }
}
