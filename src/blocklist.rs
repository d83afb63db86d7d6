//! Addresses that must never be synthesized into answers.
//!
//! Entries are single addresses (`169.254.169.254`) or networks (`fd00::/8`). A bare address is
//! treated as a host network (`/32` or `/128`).

use ipnetwork::IpNetwork;
use serde::Deserialize;
use std::net::IpAddr;

/// Which answers the [`Blocklist`] is enforced on.
#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BlocklistScope {
    /// Only addresses decoded from the queried name are checked.
    #[default]
    Decoded,
    /// Operator configured website and nameserver addresses are checked as well.
    All,
}

impl std::str::FromStr for BlocklistScope {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "decoded" => Ok(BlocklistScope::Decoded),
            "all" => Ok(BlocklistScope::All),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    networks: Vec<IpNetwork>,
    scope: BlocklistScope,
}

impl Blocklist {
    #[must_use]
    pub fn new(networks: Vec<IpNetwork>, scope: BlocklistScope) -> Self {
        Blocklist { networks, scope }
    }

    /// Returns true if `ip` falls within any blocked network.
    #[must_use]
    pub fn contains(&self, ip: IpAddr) -> bool {
        self.networks.iter().any(|network| network.contains(ip))
    }

    /// Returns true if `ip`, taken from the operator's own configuration, must be withheld.
    #[must_use]
    pub fn blocks_configured(&self, ip: IpAddr) -> bool {
        self.scope == BlocklistScope::All && self.contains(ip)
    }
}
