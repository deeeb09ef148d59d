//! Parses a textual IP address and maps IPv6 forms that embed an IPv4
//! address back onto the v4 number space, per the database's own
//! convention: IPv4-mapped, 6to4 and Teredo addresses are resolved
//! against the v4 section rather than the v6 one.

use std::net::IpAddr;
use std::str::FromStr;

/// Start of the IPv4-mapped IPv6 range (`::ffff:0:0/96`).
const FROM_V4_MAPPED: u128 = 0xffff_0000_0000;
/// End of the IPv4-mapped IPv6 range.
const TO_V4_MAPPED: u128 = 0xffff_ffff_ffff;

/// Start of the 6to4 IPv6 range (`2002::/16`).
const FROM_6TO4: u128 = 0x2002_0000_0000_0000_0000_0000_0000_0000;
/// End of the 6to4 IPv6 range.
const TO_6TO4: u128 = 0x2002_ffff_ffff_ffff_ffff_ffff_ffff_ffff;

/// Start of the Teredo IPv6 range (`2001:0000::/32`).
const FROM_TEREDO: u128 = 0x2001_0000_0000_0000_0000_0000_0000_0000;
/// End of the Teredo IPv6 range.
const TO_TEREDO: u128 = 0x2001_0000_ffff_ffff_ffff_ffff_ffff_ffff;

pub const MAX_IPV4: u32 = u32::MAX;
pub const MAX_IPV6: u128 = u128::MAX;

/// A textual address, resolved to the numeric space the lookup engine
/// actually searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NormalizedAddress {
    V4(u32),
    V6(u128),
    Invalid,
}

impl NormalizedAddress {
    /// The top 16 bits used to consult a first-octet index table, or
    /// `None` for an invalid address.
    pub(crate) fn index_prefix(self) -> Option<u16> {
        match self {
            NormalizedAddress::V4(num) => Some((num >> 16) as u16),
            NormalizedAddress::V6(num) => Some((num >> 112) as u16),
            NormalizedAddress::Invalid => None,
        }
    }
}

/// Parses `text` and resolves any IPv4-embedding IPv6 form to its
/// underlying v4 number.
pub(crate) fn normalize(text: &str) -> NormalizedAddress {
    let addr = match IpAddr::from_str(text) {
        Ok(addr) => addr,
        Err(_) => return NormalizedAddress::Invalid,
    };

    match addr {
        IpAddr::V4(v4) => NormalizedAddress::V4(u32::from(v4)),
        IpAddr::V6(v6) => normalize_v6(u128::from(v6)),
    }
}

fn normalize_v6(num: u128) -> NormalizedAddress {
    if (FROM_V4_MAPPED..=TO_V4_MAPPED).contains(&num) {
        NormalizedAddress::V4((num - FROM_V4_MAPPED) as u32)
    } else if (FROM_6TO4..=TO_6TO4).contains(&num) {
        NormalizedAddress::V4(((num >> 80) & 0xffff_ffff) as u32)
    } else if (FROM_TEREDO..=TO_TEREDO).contains(&num) {
        NormalizedAddress::V4((!num & 0xffff_ffff) as u32)
    } else {
        NormalizedAddress::V6(num)
    }
}
