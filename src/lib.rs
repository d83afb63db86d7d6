//! backname
//!
//! An authoritative DNS server that answers for a whole zone from a handful of settings instead
//! of a zone file. Any name that spells out an IP address resolves to that address, which makes
//! the zone usable for local TLS testing and tunnel style hostnames:
//!
//! ```text
//! 127.0.0.1.example.com       A     127.0.0.1
//! api.192-168-0-1.example.com A     192.168.0.1
//! 2001-db8--1.example.com     AAAA  2001:db8::1
//! ```
//!
//! The zone apex and `www` serve the website addresses, `alpha` and `omega` serve the
//! nameservers. See the [dns] module for the full behavior and [config] for the settings.
//!
#![warn(clippy::pedantic)]

pub mod blocklist;
pub mod config;
pub mod dns;
pub mod error;
pub mod resolver;
pub mod zone;

pub use config::{Config, SharedConfig};
pub use dns::new as new_dns;
pub use resolver::{resolve, Resolved};
pub use zone::{SharedZone, ZoneConfig};
