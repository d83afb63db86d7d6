//! Authoritative DNS server.
//!
//! backname answers for a single zone without a zone file. Every answer is synthesized from the
//! [Config][`crate::config::Config`] by the [resolver][crate::resolver], and all responses are
//! marked authoritative. Requests that don't carry exactly one question are `REFUSED`, and
//! opcodes other than `QUERY` get `NOTIMP`. Requests are served over UDP, and over TCP when a
//! TCP address is configured.
//!
//! E.g. with config:
//! ```json
//! {
//!   "dns_udp_bind_addr": "127.0.0.1:5353",
//!   "zone": {
//!     "name": "example.com",
//!     "website_a": ["93.184.216.34"],
//!     "nameserver_a": ["192.0.2.1", "192.0.2.2"],
//!     "root_txt": ["v=spf1 -all"]
//!   }
//! }
//! ```
//!
//! # Apex
//!
//! `A` and `AAAA` queries for the zone itself return the website addresses, `TXT` queries return
//! the configured strings as one record. The apex always exists, so an unconfigured type is an
//! empty answer rather than `NXDOMAIN`.
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 example.com +short A
//! 93.184.216.34
//! ```
//!
//! # www
//!
//! `www.<zone>` is an alias of the apex, and only exists when a website address is configured.
//! Address queries get the `CNAME` along with the addresses it leads to.
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 www.example.com +short A
//! example.com.
//! 93.184.216.34
//! ```
//!
//! # NS
//!
//! `NS` queries at any name in the zone return `alpha.<zone>`, plus `omega.<zone>` when a second
//! nameserver address is configured. At names that don't otherwise exist the response code is
//! still `NXDOMAIN`. The nameserver names resolve to the nameserver addresses, and
//! `omega.<zone>` only has an `AAAA` record when both nameservers have an IPv6 address.
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 example.com +short NS
//! alpha.example.com.
//! omega.example.com.
//! ```
//!
//! # Addresses in names
//!
//! Any other name ending in an IP address resolves to that address, with dots or dashes as
//! separators and an optional prefix:
//!
//! ```bash
//! ❯ dig @127.0.0.1 -p 5353 api.10-0-0-1.example.com +short A
//! 10.0.0.1
//! ❯ dig @127.0.0.1 -p 5353 2001-db8--1.example.com +short AAAA
//! 2001:db8::1
//! ```
//!
//! Addresses on the [blocklist][crate::blocklist] are never answered; such names are `NXDOMAIN`.

mod handlers;
pub mod server;

pub use handlers::Handler;
pub use server::{new, Server};
