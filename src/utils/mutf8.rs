/*
 * SPDX-FileCopyrightText: 2023 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

/*!

Modified UTF-8, the text encoding of length-prefixed strings.

It differs from standard UTF-8 in two ways: the NUL character is encoded on
two bytes (`0xC0 0x80`), so encoded text never contains a zero byte, and
characters outside the basic multilingual plane are encoded as two
three-byte surrogates instead of one four-byte sequence.

*/

use crate::traits::{Result, StreamError};

/// Encode `text` in modified UTF-8.
#[must_use]
pub fn encode(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for unit in text.encode_utf16() {
        match unit {
            0x0001..=0x007F => bytes.push(unit as u8),
            0x0000 | 0x0080..=0x07FF => {
                bytes.push(0xC0 | (unit >> 6) as u8);
                bytes.push(0x80 | (unit & 0x3F) as u8);
            }
            _ => {
                bytes.push(0xE0 | (unit >> 12) as u8);
                bytes.push(0x80 | ((unit >> 6) & 0x3F) as u8);
                bytes.push(0x80 | (unit & 0x3F) as u8);
            }
        }
    }
    bytes
}

/// The number of bytes [`encode`] would produce for `text`.
#[must_use]
pub fn encoded_len(text: &str) -> usize {
    text.encode_utf16()
        .map(|unit| match unit {
            0x0001..=0x007F => 1,
            0x0000 | 0x0080..=0x07FF => 2,
            _ => 3,
        })
        .sum()
}

#[inline(always)]
fn continuation(bytes: &[u8], index: usize) -> Result<u16> {
    match bytes.get(index) {
        Some(&byte) if byte & 0xC0 == 0x80 => Ok((byte & 0x3F) as u16),
        Some(_) => Err(StreamError::MalformedText("invalid continuation byte")),
        None => Err(StreamError::MalformedText("truncated multi-byte sequence")),
    }
}

/// Decode modified UTF-8.
///
/// Unpaired surrogates cannot be represented by a Rust string, so they are
/// rejected along with every other malformed sequence.
pub fn decode(bytes: &[u8]) -> Result<String> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let lead = bytes[i];
        match lead >> 4 {
            0x0..=0x7 => {
                units.push(lead as u16);
                i += 1;
            }
            0xC | 0xD => {
                units.push(((lead & 0x1F) as u16) << 6 | continuation(bytes, i + 1)?);
                i += 2;
            }
            0xE => {
                units.push(
                    ((lead & 0x0F) as u16) << 12
                        | continuation(bytes, i + 1)? << 6
                        | continuation(bytes, i + 2)?,
                );
                i += 3;
            }
            _ => return Err(StreamError::MalformedText("invalid leading byte")),
        }
    }
    String::from_utf16(&units).map_err(|_| StreamError::MalformedText("unpaired surrogate"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encodings() {
        assert_eq!(encode("abc"), b"abc");
        assert_eq!(encode("\0"), [0xC0, 0x80]);
        assert_eq!(encode("é"), [0xC3, 0xA9]);
        assert_eq!(encode("箪"), "箪".as_bytes());
        // U+1F600 is the surrogate pair D83D DE00
        assert_eq!(encode("😀"), [0xED, 0xA0, 0xBD, 0xED, 0xB8, 0x80]);
        for text in ["", "abc", "\0x\0", "é箪😀"] {
            assert_eq!(encoded_len(text), encode(text).len());
            assert_eq!(decode(&encode(text)).unwrap(), text);
        }
    }

    #[test]
    fn test_malformed() {
        assert!(decode(&[0xC3]).is_err());
        assert!(decode(&[0xFF]).is_err());
        assert!(decode(&[0xE0, 0x41, 0x80]).is_err());
        // A lone high surrogate
        assert!(decode(&[0xED, 0xA0, 0xBD]).is_err());
    }
}
