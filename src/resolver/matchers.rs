//! Named subdomain patterns, tried in order until one matches.

use crate::resolver::subdomain;
use std::net::IpAddr;

/// What a subdomain refers to within the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Apex,
    Www,
    Alpha,
    Omega,
    /// An address spelled out in the queried name.
    Address(IpAddr),
}

pub struct Matcher {
    pub name: &'static str,
    matches: fn(&str) -> Option<Owner>,
}

/// Patterns in precedence order. The first to match decides what the name refers to.
pub const MATCHERS: [Matcher; 6] = [
    Matcher {
        name: "apex",
        matches: apex,
    },
    Matcher {
        name: "www",
        matches: www,
    },
    Matcher {
        name: "alpha",
        matches: alpha,
    },
    Matcher {
        name: "omega",
        matches: omega,
    },
    Matcher {
        name: "ipv6",
        matches: embedded_ipv6,
    },
    Matcher {
        name: "ipv4",
        matches: embedded_ipv4,
    },
];

/// Find the first matcher accepting `subdomain`, returning its name and the match.
#[must_use]
pub fn match_subdomain(subdomain: &str) -> Option<(&'static str, Owner)> {
    MATCHERS
        .iter()
        .find_map(|m| (m.matches)(subdomain).map(|owner| (m.name, owner)))
}

fn apex(subdomain: &str) -> Option<Owner> {
    subdomain.is_empty().then_some(Owner::Apex)
}

fn www(subdomain: &str) -> Option<Owner> {
    (subdomain == "www").then_some(Owner::Www)
}

fn alpha(subdomain: &str) -> Option<Owner> {
    (subdomain == "alpha").then_some(Owner::Alpha)
}

fn omega(subdomain: &str) -> Option<Owner> {
    (subdomain == "omega").then_some(Owner::Omega)
}

fn embedded_ipv6(subdomain: &str) -> Option<Owner> {
    subdomain::decode_ipv6(subdomain).map(|ip| Owner::Address(IpAddr::V6(ip)))
}

fn embedded_ipv4(subdomain: &str) -> Option<Owner> {
    subdomain::decode_ipv4(subdomain).map(|ip| Owner::Address(IpAddr::V4(ip)))
}
