//! Error types.

use trust_dns_server::proto::error::ProtoError;

/// Error enumerates the possible backname error states.
///
/// All of these are startup errors. Once a [`ZoneConfig`][crate::zone::ZoneConfig] has been
/// built, resolving a query can't fail: every outcome is expressed as a DNS response code.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Returned when the configured zone is missing, empty or the DNS root.
    #[error("zone must be set to a non-root domain name")]
    EmptyZone,

    /// Returned when no IPv4 nameserver address is configured. At least one is needed to
    /// answer for `alpha.<zone>`.
    #[error("at least one nameserver IPv4 address must be configured")]
    MissingNameserver,

    /// Returned when more than two nameserver addresses of one family are configured. Only
    /// `alpha.<zone>` and `omega.<zone>` exist.
    #[error("{setting} must contain at most two addresses, found {count}")]
    TooManyNameservers { setting: &'static str, count: usize },

    /// Returned when IPv6 nameserver addresses are configured but not one per IPv4 nameserver
    /// address.
    #[error("nameserver_aaaa must contain as many addresses as nameserver_a ({ipv4} != {ipv6})")]
    NameserverCountMismatch { ipv4: usize, ipv6: usize },

    /// Returned when an environment setting can't be parsed, e.g. a malformed IP literal.
    #[error("{key} is invalid: \"{value}\"")]
    InvalidSetting { key: &'static str, value: String },

    /// Returned when a generic IO error occurs.
    #[error("an IO error occurred")]
    IO(#[from] std::io::Error),

    /// Returned when [trying to load a `Config`][crate::config::Config::try_from_file] from a
    /// file that doesn't hold valid JSON, or valid settings.
    #[error("invalid JSON")]
    InvalidJSON(#[from] serde_json::Error),

    /// Returned when a DNS protocol error occurs, e.g. a zone name that is too long to hold
    /// the `www`, `alpha` and `omega` labels.
    #[error("DNS error")]
    DNSError(#[from] ProtoError),
}
