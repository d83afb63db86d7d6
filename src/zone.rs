//! The validated, immutable zone description the [resolver][crate::resolver] answers from.

use crate::blocklist::Blocklist;
use crate::config::ZoneSettings;
use crate::error::Error;
use std::net::{Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use trust_dns_server::client::rr::Name;

pub type SharedZone = Arc<ZoneConfig>;

/// TTL used for every synthesized record unless configured otherwise.
pub const DEFAULT_TTL: u32 = 86_400;

/// Everything the resolver needs to answer for a zone.
///
/// Built once at startup by [`ZoneConfig::try_from`] and never mutated afterwards, so it can be
/// shared between any number of concurrent queries without locking.
#[derive(Debug, Clone)]
pub struct ZoneConfig {
    apex: Name,
    www: Name,
    alpha: Name,
    omega: Name,
    pub website_a: Vec<Ipv4Addr>,
    pub website_aaaa: Vec<Ipv6Addr>,
    pub nameserver_a: Vec<Ipv4Addr>,
    pub nameserver_aaaa: Vec<Ipv6Addr>,
    pub root_txt: Vec<String>,
    pub blocklist: Blocklist,
    pub ttl: u32,
}

impl ZoneConfig {
    /// The lowercase, fully qualified zone name.
    #[must_use]
    pub fn apex(&self) -> &Name {
        &self.apex
    }

    #[must_use]
    pub fn www(&self) -> &Name {
        &self.www
    }

    /// Name of the first nameserver.
    #[must_use]
    pub(crate) fn alpha(&self) -> &Name {
        &self.alpha
    }

    /// Name of the second nameserver. Only served when [`ZoneConfig::has_omega`] is true.
    #[must_use]
    pub(crate) fn omega(&self) -> &Name {
        &self.omega
    }

    #[must_use]
    pub fn has_website(&self) -> bool {
        !self.website_a.is_empty() || !self.website_aaaa.is_empty()
    }

    #[must_use]
    pub fn has_omega(&self) -> bool {
        self.nameserver_a.len() > 1
    }

    /// Names of the configured nameservers, in order.
    #[must_use]
    pub fn nameservers(&self) -> Vec<&Name> {
        if self.has_omega() {
            vec![self.alpha(), self.omega()]
        } else {
            vec![self.alpha()]
        }
    }
}

impl TryFrom<&ZoneSettings> for ZoneConfig {
    type Error = Error;

    fn try_from(settings: &ZoneSettings) -> Result<Self, Self::Error> {
        let mut apex = settings.name.to_lowercase();
        if apex.is_root() {
            return Err(Error::EmptyZone);
        }
        apex.set_fqdn(true);

        match settings.nameserver_a.len() {
            0 => return Err(Error::MissingNameserver),
            1 | 2 => {}
            count => {
                return Err(Error::TooManyNameservers {
                    setting: "nameserver_a",
                    count,
                })
            }
        }
        match settings.nameserver_aaaa.len() {
            0 => {}
            count if count > 2 => {
                return Err(Error::TooManyNameservers {
                    setting: "nameserver_aaaa",
                    count,
                })
            }
            count if count != settings.nameserver_a.len() => {
                return Err(Error::NameserverCountMismatch {
                    ipv4: settings.nameserver_a.len(),
                    ipv6: count,
                })
            }
            _ => {}
        }

        Ok(ZoneConfig {
            www: Name::from_ascii("www")?.append_domain(&apex)?,
            alpha: Name::from_ascii("alpha")?.append_domain(&apex)?,
            omega: Name::from_ascii("omega")?.append_domain(&apex)?,
            apex,
            website_a: settings.website_a.clone(),
            website_aaaa: settings.website_aaaa.clone(),
            nameserver_a: settings.nameserver_a.clone(),
            nameserver_aaaa: settings.nameserver_aaaa.clone(),
            root_txt: settings.root_txt.clone(),
            blocklist: Blocklist::new(settings.blocklist.clone(), settings.blocklist_scope),
            ttl: settings.ttl,
        })
    }
}
