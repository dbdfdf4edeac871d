//! Utility functions for the decawave-ble-survey crate.

use std::fmt::Write as _;

/// Render bytes as a contiguous lowercase hex string.
///
/// This is the form advertising payloads take in the report.
///
/// # Arguments
///
/// * `bytes` - Raw payload bytes
///
/// # Example
///
/// ```
/// use decawave_ble_survey::to_hex;
///
/// assert_eq!(to_hex(&[0x5a, 0x00, 0xff]), "5a00ff");
/// ```
pub fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        // Writing into a String cannot fail.
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Render a 16-bit value as little-endian hex, the on-air byte order.
#[inline]
pub fn u16_to_le_hex(value: u16) -> String {
    to_hex(&value.to_le_bytes())
}
