//! Parses an IEEE EUI-48 hardware address written as six hex pairs separated
//! by either hyphens or colons.
use std::fmt;
use std::str::FromStr;

use log::debug;
use thiserror::Error;

/// Length of the textual form, `XX:XX:XX:XX:XX:XX`.
pub const TEXT_LEN: usize = 17;

/// Number of hex digits left once separators are stripped.
pub const HEX_LEN: usize = 12;

const SEPARATORS: [u8; 3] = [b'-', b':', b'.'];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    /// Structure, length or alphabet is wrong.
    #[error("invalid hardware address format, expected XX:XX:XX:XX:XX:XX or XX-XX-XX-XX-XX-XX")]
    InvalidFormat,

    /// A digit pair could not be decoded.
    #[error("unable to decode hex pair at position {position}")]
    Decode { position: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HardwareAddress([u8; 6]);

impl HardwareAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl From<[u8; 6]> for HardwareAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

impl FromStr for HardwareAddress {
    type Err = AddressError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if !validate(input) {
            return Err(AddressError::InvalidFormat);
        }
        let addr = decode(&clean(input))?;
        debug!("parsed hardware address {}", addr);
        Ok(addr)
    }
}

impl fmt::Display for HardwareAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

/// Checks the textual structure of a hardware address.
///
/// Every third character must be the same separator, either `:` or `-`, as the
/// one found at index 2. All other characters must be hex digits.
pub fn validate(input: &str) -> bool {
    let bytes = input.as_bytes();
    if bytes.len() != TEXT_LEN {
        return false;
    }

    let separator = bytes[2];
    if separator != b':' && separator != b'-' {
        return false;
    }

    bytes.iter().enumerate().all(|(index, &c)| {
        if index % 3 == 2 {
            c == separator
        } else {
            c.is_ascii_hexdigit()
        }
    })
}

/// Strips separators and packs the remaining characters into a fixed buffer.
///
/// No structural checks happen here; run [`validate`] first. Characters beyond
/// the twelfth are dropped and unfilled slots stay zero.
pub fn clean(input: &str) -> [u8; HEX_LEN] {
    let mut out = [0u8; HEX_LEN];
    let digits = input.bytes().filter(|c| !SEPARATORS.contains(c));
    for (slot, c) in out.iter_mut().zip(digits) {
        *slot = c;
    }
    out
}

/// Decodes twelve hex characters into six octets.
pub fn decode(cleaned: &[u8; HEX_LEN]) -> Result<HardwareAddress, AddressError> {
    let mut octets = [0u8; 6];
    for (i, pair) in cleaned.chunks_exact(2).enumerate() {
        let hi = nibble(pair[0]);
        let lo = nibble(pair[1]);
        match (hi, lo) {
            (Some(hi), Some(lo)) => octets[i] = hi << 4 | lo,
            _ => return Err(AddressError::Decode { position: i * 2 }),
        }
    }
    Ok(HardwareAddress(octets))
}

fn nibble(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: [u8; 6] = [0x70, 0x85, 0xC2, 0x9D, 0x41, 0x70];

    #[test]
    fn validate_accepts_colons_and_hyphens() {
        assert!(validate("70:85:C2:9D:41:70"));
        assert!(validate("70-85-c2-9d-41-70"));
        assert!(validate("aA:bB:cC:dD:eE:fF"));
    }

    #[test]
    fn validate_rejects_mixed_separators() {
        assert!(!validate("AA-aa:aa-aa-aa-aa"));
        assert!(!validate("70:85:C2:9D:41-70"));
    }

    #[test]
    fn validate_rejects_wrong_length() {
        assert!(!validate(""));
        assert!(!validate("ab-cd"));
        assert!(!validate("70:85:C2:9D:41:70:"));
        assert!(!validate("ab-cd-ab-cd-ab-cd-ab-cd-ab"));
    }

    #[test]
    fn validate_rejects_non_hex() {
        assert!(!validate("00:1A:2B:3C:4G:5E"));
        assert!(!validate("he-js-an-cc-dd-ee"));
        assert!(!validate("-----abababababab"));
    }

    #[test]
    fn validate_rejects_dot_separator() {
        assert!(!validate("70.85.C2.9D.41.70"));
    }

    #[test]
    fn validate_rejects_multibyte_input() {
        // 17 bytes, but not ASCII
        assert!(!validate("70:85:C2:9D:41:é"));
    }

    #[test]
    fn clean_strips_separators() {
        assert_eq!(&clean("70:85:C2:9D:41:70"), b"7085C29D4170");
        assert_eq!(&clean("70-85-C2-9D-41-70"), b"7085C29D4170");
        assert_eq!(&clean("7085.C29D.4170"), b"7085C29D4170");
    }

    #[test]
    fn clean_leaves_short_input_zero_padded() {
        let cleaned = clean("ab-cd");
        assert_eq!(&cleaned[..4], b"abcd");
        assert!(cleaned[4..].iter().all(|&c| c == 0));
    }

    #[test]
    fn decode_pairs() {
        let addr = decode(b"7085C29D4170").unwrap();
        assert_eq!(addr.octets(), EXPECTED);
    }

    #[test]
    fn decode_reports_bad_pair() {
        assert_eq!(
            decode(b"7085C29D4G70"),
            Err(AddressError::Decode { position: 8 })
        );
        assert_eq!(
            decode(&clean("ab-cd")),
            Err(AddressError::Decode { position: 4 })
        );
    }

    #[test]
    fn parse_from_str() {
        let addr: HardwareAddress = "70-85-c2-9d-41-70".parse().unwrap();
        assert_eq!(addr.octets(), EXPECTED);
        assert_eq!(addr.to_string(), "70:85:C2:9D:41:70");
    }

    #[test]
    fn parse_rejects_invalid() {
        assert_eq!(
            "00:1A:2B:3C:4G:5E".parse::<HardwareAddress>(),
            Err(AddressError::InvalidFormat)
        );
    }
}
