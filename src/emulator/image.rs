//! Program images: a stream of big-endian 16-bit words, the first one being the origin address.
use crate::errors::LoadProgramError;
use std::fs;
use std::path::Path;

/// Splits `bytes` into big-endian words, origin first.
///
/// # Errors
/// - fewer than two bytes, so no origin can be read
pub fn parse_image(bytes: &[u8]) -> Result<Vec<u16>, LoadProgramError> {
    if bytes.len() < 2 {
        return Err(LoadProgramError::ProgramMissingOrigHeader);
    }
    let chunks = bytes.chunks_exact(2);
    if !chunks.remainder().is_empty() {
        tracing::warn!("Ignoring trailing odd byte of program image");
    }
    Ok(chunks
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect())
}

/// Reads and parses the image file at `path`.
///
/// # Errors
/// - file cannot be read
/// - file too short to contain an origin
pub fn read_image_file(path: impl AsRef<Path>) -> Result<Vec<u16>, LoadProgramError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| LoadProgramError::ImageUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    parse_image(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use googletest::prelude::*;

    #[gtest]
    pub fn test_parse_image_big_endian() {
        let words = parse_image(&[0x30, 0x00, 0x12, 0x34, 0xF0, 0x25]).unwrap();
        expect_that!(words, eq(&vec![0x3000, 0x1234, 0xF025]));
    }
    #[gtest]
    pub fn test_parse_image_ignores_odd_byte() {
        let words = parse_image(&[0x30, 0x00, 0x12]).unwrap();
        expect_that!(words, eq(&vec![0x3000]));
    }
    #[gtest]
    pub fn test_parse_image_too_short() {
        expect_that!(
            parse_image(&[0x30]).unwrap_err().to_string(),
            eq("Program is missing valid .ORIG header")
        );
        expect_that!(
            parse_image(&[]).unwrap_err().to_string(),
            eq("Program is missing valid .ORIG header")
        );
    }
    #[gtest]
    pub fn test_read_missing_image_file() {
        let err = read_image_file("does/not/exist.obj").unwrap_err();
        expect_that!(
            err.to_string(),
            starts_with("Could not read program image does/not/exist.obj: ")
        );
    }
}
