// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use core::fmt;

/// Write bytes as `0x`-prefixed hex, truncating long payloads so logs stay readable.
pub fn hexf(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{}", truncate(to_hex(data)))
}

/// Short form used for ciphertext handles in log lines, eg. `0x1a2b3c4d..`
pub fn short_hex(data: &[u8]) -> String {
    let hex = to_hex(data);
    if hex.len() <= 8 {
        return format!("0x{}", hex);
    }
    format!("0x{}..", &hex[..8])
}

fn to_hex(data: &[u8]) -> String {
    data.iter().map(|b| format!("{:02x}", b)).collect()
}

fn truncate(s: String) -> String {
    let threshold = 100;
    let limit = 50;
    let cutoff = limit / 2;
    if s.len() <= threshold {
        format!("0x{}", s)
    } else {
        let start = &s[..cutoff];
        let end = &s[s.len() - (limit - cutoff)..];
        format!("<bytes({}):0x{}..{}>", s.len(), start, end)
    }
}
