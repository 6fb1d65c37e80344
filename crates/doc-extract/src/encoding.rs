//! Byte-to-text decoding that never fails

/// Decode document bytes to a `String`.
///
/// Tries UTF-8 first, then UTF-16 when a byte-order mark is present, and
/// finally falls back to Latin-1, which maps every byte to a char.
pub fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    if let Some(s) = decode_utf16_with_bom(bytes) {
        return s;
    }

    latin1(bytes)
}

/// UTF-16 decoding when the bytes start with a BOM (FE FF or FF FE)
pub fn decode_utf16_with_bom(bytes: &[u8]) -> Option<String> {
    if bytes.len() < 2 {
        return None;
    }
    let big_endian = match (bytes[0], bytes[1]) {
        (0xFE, 0xFF) => true,
        (0xFF, 0xFE) => false,
        _ => return None,
    };

    let units: Vec<u16> = bytes[2..]
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    Some(String::from_utf16_lossy(&units))
}

pub fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}
