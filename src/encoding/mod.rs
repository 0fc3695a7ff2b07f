// OutlierCrab - GPL-3.0-or-later
// This file is part of OutlierCrab.
//
// Copyright (C) 2026 OutlierCrab contributors
//
// OutlierCrab is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// OutlierCrab is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with OutlierCrab.  If not, see <https://www.gnu.org/licenses/>.

//! Probes analyzers run on raw field values.
//!
//! None of these fail: input that is not what the probe looks for yields
//! `None`, `false` or zero entropy.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use fancy_regex::Regex;
use std::net::IpAddr;
use std::sync::LazyLock;

#[allow(clippy::unwrap_used)]
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^[a-z][a-z0-9+.\-]*://(?:[^\s:@/]+(?::[^\s@/]*)?@)?(?:\d{1,3}(?:\.\d{1,3}){3}|\[[0-9a-f:.]+\]|(?:[a-z0-9¡-￿](?:[a-z0-9¡-￿\-]{0,61}[a-z0-9¡-￿])?\.)+[a-z¡-￿]{2,63})(?::\d{1,5})?(?:[/?#]\S*)?$",
    )
    .unwrap()
});

/// Shannon entropy of `data` in bits per character.
///
/// Only characters in the first 256 code points are counted, but every
/// character contributes to the total length.
pub fn shannon_entropy(data: &str) -> f64 {
    let mut char_counts = [0u32; 256];
    let mut total = 0usize;

    for c in data.chars() {
        total += 1;
        if let Ok(byte) = u8::try_from(u32::from(c)) {
            char_counts[usize::from(byte)] += 1;
        }
    }

    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let mut entropy = 0.0;
    for &count in &char_counts {
        if count > 0 {
            let p = f64::from(count) / total;
            entropy -= p * p.log2();
        }
    }

    entropy
}

/// Decoded text of a canonical base64 string.
///
/// Only non-empty strings that re-encode to themselves and decode to ASCII
/// qualify.
pub fn decode_base64(text: &str) -> Option<String> {
    if text.is_empty() {
        return None;
    }
    let decoded = STANDARD.decode(text).ok()?;
    if STANDARD.encode(&decoded) != text || !decoded.is_ascii() {
        return None;
    }
    String::from_utf8(decoded).ok()
}

/// Decimal form of a base-16 integer literal such as `ff`, `0x1F` or `-a`.
pub fn decode_hex(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let (negative, unsigned) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };
    let digits = unsigned
        .strip_prefix("0x")
        .or_else(|| unsigned.strip_prefix("0X"))
        .map_or(unsigned, |rest| rest.strip_prefix('_').unwrap_or(rest));

    if digits.is_empty()
        || digits.starts_with('_')
        || digits.ends_with('_')
        || digits.contains("__")
    {
        return None;
    }
    let cleaned: String = digits.chars().filter(|&c| c != '_').collect();
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let value = u128::from_str_radix(&cleaned, 16).ok()?;
    if negative && value != 0 {
        Some(format!("-{value}"))
    } else {
        Some(value.to_string())
    }
}

/// Whether `text` looks like an absolute URL with a routable host.
pub fn is_url(text: &str) -> bool {
    URL_PATTERN.is_match(text).unwrap_or(false)
}

/// Whether `ip` lies in any of `ranges` (CIDR notation or single addresses).
///
/// Malformed addresses never match; malformed ranges are skipped.
pub fn ip_in_ranges(ip: &str, ranges: &[&str]) -> bool {
    let Ok(address) = ip.trim().parse::<IpAddr>() else {
        return false;
    };

    ranges.iter().any(|range| match parse_range(range) {
        Some((network, prefix)) => in_network(address, network, prefix),
        None => {
            tracing::debug!("Skipping malformed address range '{range}'");
            false
        }
    })
}

fn parse_range(range: &str) -> Option<(IpAddr, u32)> {
    let range = range.trim();
    let (address, prefix) = match range.split_once('/') {
        Some((address, prefix)) => (address.parse::<IpAddr>().ok()?, Some(prefix.parse::<u32>().ok()?)),
        None => (range.parse::<IpAddr>().ok()?, None),
    };
    let max = match address {
        IpAddr::V4(_) => 32,
        IpAddr::V6(_) => 128,
    };
    let prefix = prefix.unwrap_or(max);
    (prefix <= max).then_some((address, prefix))
}

fn in_network(address: IpAddr, network: IpAddr, prefix: u32) -> bool {
    match (address, network) {
        (IpAddr::V4(a), IpAddr::V4(n)) => {
            let mask = u32::MAX.checked_shl(32 - prefix).unwrap_or(0);
            u32::from(a) & mask == u32::from(n) & mask
        }
        (IpAddr::V6(a), IpAddr::V6(n)) => {
            let mask = u128::MAX.checked_shl(128 - prefix).unwrap_or(0);
            u128::from(a) & mask == u128::from(n) & mask
        }
        (IpAddr::V4(_), IpAddr::V6(_)) | (IpAddr::V6(_), IpAddr::V4(_)) => false,
    }
}
