//! Answer synthesis.
//!
//! [`resolve`] maps a single question to the records and response code for it, using nothing
//! but the [`ZoneConfig`]. It holds no state and does no I/O, so the same question always gets
//! the same answer and any number of queries can be resolved concurrently.
//!
//! Names are resolved as follows, in order:
//!
//! 1. Queries for a class other than `IN` are `NOTIMP`.
//! 2. Names outside the zone are `NOTZONE`.
//! 3. `NS` queries get `alpha.<zone>` (and `omega.<zone>` when a second nameserver is
//!    configured) at every name in the zone, whether or not the name otherwise exists.
//! 4. The subdomain is matched against the [named patterns][matchers::MATCHERS]: the apex,
//!    `www`, `alpha`, `omega`, then an embedded IPv6 and finally an embedded IPv4 address.
//!    Names that match nothing, or that refer to something the zone doesn't define, are
//!    `NXDOMAIN`, keeping any `NS` records from the previous step.
//! 5. Names that exist but have no data of the queried type get an empty `NOERROR` answer.
//!
//! The apex is never `NXDOMAIN`. When the [blocklist][crate::blocklist] covers configured website
//! addresses, those are left out of apex answers rather than failing the query.

pub mod matchers;
pub mod subdomain;

use crate::zone::ZoneConfig;
use matchers::Owner;
use std::iter;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tracing::trace;
use trust_dns_proto::op::{Query, ResponseCode};
use trust_dns_proto::rr::rdata::TXT;
use trust_dns_proto::rr::{DNSClass, Name, RData, Record, RecordType};

/// The answer section and response code for one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub records: Vec<Record>,
    pub response_code: ResponseCode,
}

impl Resolved {
    fn answer(records: Vec<Record>) -> Self {
        Resolved {
            records,
            response_code: ResponseCode::NoError,
        }
    }

    fn error(response_code: ResponseCode) -> Self {
        Resolved {
            records: Vec::new(),
            response_code,
        }
    }
}

/// Resolve `query` against `zone`.
#[must_use]
pub fn resolve(query: &Query, zone: &ZoneConfig) -> Resolved {
    if query.query_class() != DNSClass::IN {
        return Resolved::error(ResponseCode::NotImp);
    }

    let name = query.name();
    if !zone.apex().zone_of(name) {
        return Resolved::error(ResponseCode::NotZone);
    }

    let mut records = Vec::new();
    if query.query_type() == RecordType::NS {
        records.extend(
            zone.nameservers()
                .into_iter()
                .map(|ns| record(name, zone.ttl, RData::NS(ns.clone()))),
        );
    }

    let subdomain = subdomain_of(name, zone.apex());
    let owner = match matchers::match_subdomain(&subdomain) {
        Some((matcher, owner)) if defined(owner, query.query_type(), zone) => {
            trace!("{name} matched {matcher}");
            owner
        }
        _ => {
            return Resolved {
                records,
                response_code: ResponseCode::NXDomain,
            }
        }
    };

    let blocks = |record: &Record| {
        address(record).map_or(false, |ip| zone.blocklist.blocks_configured(ip))
    };
    let (blocked, allowed): (Vec<Record>, Vec<Record>) =
        synthesize(owner, query, zone).into_iter().partition(blocks);
    if !blocked.is_empty() {
        if owner != Owner::Apex {
            return Resolved::error(ResponseCode::NXDomain);
        }
        trace!("withholding {} blocked records for {name}", blocked.len());
    }
    records.extend(allowed);
    Resolved::answer(records)
}

/// The lowercase labels of `name` left of `apex`, joined by dots. Empty for the apex itself.
fn subdomain_of(name: &Name, apex: &Name) -> String {
    let depth = name.iter().count().saturating_sub(apex.iter().count());
    name.iter()
        .take(depth)
        .map(|label| String::from_utf8_lossy(label).to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join(".")
}

/// Whether the zone defines `owner` for `query_type`. Undefined names are `NXDOMAIN`.
fn defined(owner: Owner, query_type: RecordType, zone: &ZoneConfig) -> bool {
    match owner {
        Owner::Apex | Owner::Alpha => true,
        Owner::Www => zone.has_website(),
        // omega has an IPv6 address only when both nameservers have one.
        Owner::Omega => {
            zone.has_omega()
                && (query_type != RecordType::AAAA || zone.nameserver_aaaa.len() > 1)
        }
        Owner::Address(ip) => !zone.blocklist.contains(ip),
    }
}

fn synthesize(owner: Owner, query: &Query, zone: &ZoneConfig) -> Vec<Record> {
    let name = query.name();
    let ttl = zone.ttl;
    let a = |owner: &Name, ips: &[Ipv4Addr]| -> Vec<Record> {
        ips.iter()
            .map(|ip| record(owner, ttl, RData::A(*ip)))
            .collect()
    };
    let aaaa = |owner: &Name, ips: &[Ipv6Addr]| -> Vec<Record> {
        ips.iter()
            .map(|ip| record(owner, ttl, RData::AAAA(*ip)))
            .collect()
    };
    let www_cname = || record(name, ttl, RData::CNAME(zone.apex().clone()));

    match (owner, query.query_type()) {
        (Owner::Apex, RecordType::A) => a(name, &zone.website_a),
        (Owner::Apex, RecordType::AAAA) => aaaa(name, &zone.website_aaaa),
        (Owner::Apex, RecordType::TXT) if !zone.root_txt.is_empty() => {
            vec![record(name, ttl, RData::TXT(TXT::new(zone.root_txt.clone())))]
        }
        (Owner::Www, RecordType::CNAME) => vec![www_cname()],
        // The alias is returned together with the addresses it leads to.
        (Owner::Www, RecordType::A) if !zone.website_a.is_empty() => iter::once(www_cname())
            .chain(a(zone.www(), &zone.website_a))
            .collect(),
        (Owner::Www, RecordType::AAAA) if !zone.website_aaaa.is_empty() => {
            iter::once(www_cname())
                .chain(aaaa(zone.www(), &zone.website_aaaa))
                .collect()
        }
        (Owner::Alpha, RecordType::A) => a(name, nth(&zone.nameserver_a, 0)),
        (Owner::Alpha, RecordType::AAAA) => aaaa(name, nth(&zone.nameserver_aaaa, 0)),
        (Owner::Omega, RecordType::A) => a(name, nth(&zone.nameserver_a, 1)),
        (Owner::Omega, RecordType::AAAA) => aaaa(name, nth(&zone.nameserver_aaaa, 1)),
        (Owner::Address(IpAddr::V4(ip)), RecordType::A) => a(name, &[ip]),
        (Owner::Address(IpAddr::V6(ip)), RecordType::AAAA) => aaaa(name, &[ip]),
        _ => Vec::new(),
    }
}

/// The `n`th element of `items` as a slice of length one, or an empty slice.
fn nth<T>(items: &[T], n: usize) -> &[T] {
    items.get(n..=n).unwrap_or_default()
}

fn record(owner: &Name, ttl: u32, rdata: RData) -> Record {
    let mut record = Record::from_rdata(owner.clone(), ttl, rdata);
    record.set_dns_class(DNSClass::IN);
    record
}

fn address(record: &Record) -> Option<IpAddr> {
    match record.data()? {
        RData::A(ip) => Some(IpAddr::V4(*ip)),
        RData::AAAA(ip) => Some(IpAddr::V6(*ip)),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
