//! Decoding of IP addresses embedded in subdomains.
//!
//! A subdomain here is the part of a queried name left of the zone, lowercase and without a
//! trailing dot. Two encodings are understood, and any labels to the left of the encoded address
//! are ignored so users can prefix a readable name:
//!
//! | Subdomain                     | Decodes as      |
//! |-------------------------------|-----------------|
//! | `192.168.0.1`                 | `192.168.0.1`   |
//! | `api.192-168-0-1`             | `192.168.0.1`   |
//! | `2001.db8.0.0.0.0.0.1`        | `2001:db8::1`   |
//! | `api.2001-db8--1`             | `2001:db8::1`   |
//!
//! A dash in the last label selects the dashed form, where `--` compresses zeros like `::`.
//! Otherwise the trailing dotted labels are the groups. Groups may be zero padded.

use std::net::{Ipv4Addr, Ipv6Addr};

const IPV4_GROUPS: usize = 4;
const IPV6_GROUPS: usize = 8;

/// Decode an IPv4 address from the end of `subdomain`, if one is there.
///
/// Octets may carry leading zeros, `010.0.0.1` is `10.0.0.1`.
#[must_use]
pub fn decode_ipv4(subdomain: &str) -> Option<Ipv4Addr> {
    let groups = groups(subdomain, IPV4_GROUPS)?;
    if groups.len() != IPV4_GROUPS {
        return None;
    }
    let mut octets = [0_u8; IPV4_GROUPS];
    for (octet, group) in octets.iter_mut().zip(groups) {
        if group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *octet = group.parse().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// Decode an IPv6 address from the end of `subdomain`, if one is there.
///
/// All eight groups may be spelled out, with or without zero padding. The dashed form may also
/// compress zeros with `--`.
#[must_use]
pub fn decode_ipv6(subdomain: &str) -> Option<Ipv6Addr> {
    let groups = groups(subdomain, IPV6_GROUPS)?;
    if groups.iter().any(|group| group.is_empty()) {
        return groups.join(":").parse().ok();
    }
    if groups.len() != IPV6_GROUPS {
        return None;
    }
    let mut segments = [0_u16; IPV6_GROUPS];
    for (segment, group) in segments.iter_mut().zip(groups) {
        if !group.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        *segment = u16::from_str_radix(group, 16).ok()?;
    }
    Some(Ipv6Addr::from(segments))
}

/// Split the trailing address of `subdomain` into its groups.
///
/// A dash in the last label selects the dashed form and only that label is split. Otherwise the
/// last `count` labels are the groups.
fn groups(subdomain: &str, count: usize) -> Option<Vec<&str>> {
    if subdomain.is_empty() {
        return None;
    }
    let labels: Vec<&str> = subdomain.split('.').collect();
    let last = labels.last()?;
    if last.contains('-') {
        return Some(last.split('-').collect());
    }
    if labels.len() < count {
        return None;
    }
    Some(labels[labels.len() - count..].to_vec())
}
