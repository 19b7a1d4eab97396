use std::io::Read;

use crate::Result;

/// Read the whole hook payload from `reader`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected.
/// Returns `None` when the input is empty or only whitespace.
pub fn read_input(mut reader: impl Read) -> Result<Option<String>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(decode_input(&bytes))
}

pub fn decode_input(bytes: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
