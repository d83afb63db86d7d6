use crate::blocklist::BlocklistScope;
use crate::error::Error;
use crate::zone::{ZoneConfig, DEFAULT_TTL};
use ipnetwork::IpNetwork;
use serde::Deserialize;
use serde_with::{serde_as, DurationSeconds};
use std::fs::File;
use std::io::BufReader;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use trust_dns_server::client::rr::Name;

pub type SharedConfig = Arc<Config>;

#[serde_as]
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_udp_bind_addr")]
    pub dns_udp_bind_addr: SocketAddr,
    #[serde(default)]
    pub dns_tcp_bind_addr: Option<SocketAddr>,
    #[serde_as(as = "DurationSeconds<u64>")]
    #[serde(default = "default_tcp_timeout")]
    pub dns_tcp_timeout: Duration,
    pub zone: ZoneSettings,
}

/// The zone as written by the operator. See [`ZoneConfig`] for the validated form.
#[derive(Deserialize, Debug, Clone)]
pub struct ZoneSettings {
    pub name: Name,
    #[serde(default)]
    pub website_a: Vec<Ipv4Addr>,
    #[serde(default)]
    pub website_aaaa: Vec<Ipv6Addr>,
    #[serde(default)]
    pub nameserver_a: Vec<Ipv4Addr>,
    #[serde(default)]
    pub nameserver_aaaa: Vec<Ipv6Addr>,
    #[serde(default)]
    pub root_txt: Vec<String>,
    #[serde(default)]
    pub blocklist: Vec<IpNetwork>,
    #[serde(default)]
    pub blocklist_scope: BlocklistScope,
    #[serde(default = "default_ttl")]
    pub ttl: u32,
}

fn default_udp_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 53))
}

fn default_tcp_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_ttl() -> u32 {
    DEFAULT_TTL
}

impl Config {
    pub fn try_from_file(p: impl AsRef<Path>) -> Result<Self, Error> {
        let f = File::open(p)?;
        let reader = BufReader::new(f);
        let conf: Config = serde_json::from_reader(reader)?;
        conf.zone_config()?;
        Ok(conf)
    }

    /// Build a config from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Config::from_lookup`].
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from `KEY=value` settings provided by `lookup`.
    ///
    /// Recognized keys are `ZONE`, `WEBSITE_A`, `WEBSITE_AAAA`, `NAMESERVER_A`,
    /// `NAMESERVER_AAAA`, `ROOT_TXT`, `BLOCKLIST`, `BLOCKLIST_SCOPE`, `TTL`,
    /// `DNS_UDP_BIND_ADDR` and `DNS_TCP_BIND_ADDR`. Lists are comma separated. Unset and empty
    /// values are treated the same.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyZone`] if `ZONE` isn't set, [`Error::InvalidSetting`] for any value
    /// that can't be parsed, and any error [`ZoneConfig::try_from`] returns for the resulting
    /// zone.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let zone_name = get("ZONE").ok_or(Error::EmptyZone)?;
        let name = Name::from_str(zone_name.trim()).map_err(|_| Error::InvalidSetting {
            key: "ZONE",
            value: zone_name.clone(),
        })?;

        let zone = ZoneSettings {
            name,
            website_a: parse_list("WEBSITE_A", get("WEBSITE_A"))?,
            website_aaaa: parse_list("WEBSITE_AAAA", get("WEBSITE_AAAA"))?,
            nameserver_a: parse_list("NAMESERVER_A", get("NAMESERVER_A"))?,
            nameserver_aaaa: parse_list("NAMESERVER_AAAA", get("NAMESERVER_AAAA"))?,
            // TXT strings are taken verbatim, only split on commas.
            root_txt: get("ROOT_TXT")
                .map(|raw| raw.split(',').map(ToString::to_string).collect())
                .unwrap_or_default(),
            blocklist: parse_list("BLOCKLIST", get("BLOCKLIST"))?,
            blocklist_scope: parse_one("BLOCKLIST_SCOPE", get("BLOCKLIST_SCOPE"))?
                .unwrap_or_default(),
            ttl: parse_one("TTL", get("TTL"))?.unwrap_or(DEFAULT_TTL),
        };

        let conf = Config {
            dns_udp_bind_addr: parse_one("DNS_UDP_BIND_ADDR", get("DNS_UDP_BIND_ADDR"))?
                .unwrap_or_else(default_udp_bind_addr),
            dns_tcp_bind_addr: parse_one("DNS_TCP_BIND_ADDR", get("DNS_TCP_BIND_ADDR"))?,
            dns_tcp_timeout: default_tcp_timeout(),
            zone,
        };
        conf.zone_config()?;
        Ok(conf)
    }

    /// Validate the zone settings, producing the value the resolver works from.
    ///
    /// # Errors
    ///
    /// See [`ZoneConfig::try_from`].
    pub fn zone_config(&self) -> Result<ZoneConfig, Error> {
        ZoneConfig::try_from(&self.zone)
    }
}

fn parse_one<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Option<T>, Error> {
    raw.map(|raw| {
        let raw = raw.trim();
        raw.parse().map_err(|_| Error::InvalidSetting {
            key,
            value: raw.to_string(),
        })
    })
    .transpose()
}

fn parse_list<T: FromStr>(key: &'static str, raw: Option<String>) -> Result<Vec<T>, Error> {
    match raw {
        None => Ok(Vec::default()),
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .map(|item| {
                item.parse().map_err(|_| Error::InvalidSetting {
                    key,
                    value: item.to_string(),
                })
            })
            .collect(),
    }
}
