use super::*;
use crate::config::ZoneSettings;
use crate::zone::DEFAULT_TTL;
use serde_json::json;
use std::str::FromStr;

const NS_A: &str = "127.0.0.1";
const WEBSITE_A: &str = "192.168.0.1";
const WEBSITE_AAAA: &str = "2001:db8::1";

fn zone(value: serde_json::Value) -> ZoneConfig {
    let settings: ZoneSettings = serde_json::from_value(value).unwrap();
    ZoneConfig::try_from(&settings).unwrap()
}

fn bare_zone() -> ZoneConfig {
    zone(json!({ "name": "example.com", "nameserver_a": [NS_A] }))
}

fn website_zone() -> ZoneConfig {
    zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "website_a": [WEBSITE_A],
        "website_aaaa": [WEBSITE_AAAA]
    }))
}

fn name(s: &str) -> Name {
    Name::from_str(s).unwrap()
}

fn query(qname: &str, query_type: RecordType) -> Query {
    Query::query(name(qname), query_type)
}

fn a(owner: &str, ip: &str) -> Record {
    Record::from_rdata(name(owner), DEFAULT_TTL, RData::A(ip.parse().unwrap()))
}

fn aaaa(owner: &str, ip: &str) -> Record {
    Record::from_rdata(name(owner), DEFAULT_TTL, RData::AAAA(ip.parse().unwrap()))
}

fn cname(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), DEFAULT_TTL, RData::CNAME(name(target)))
}

fn ns(owner: &str, target: &str) -> Record {
    Record::from_rdata(name(owner), DEFAULT_TTL, RData::NS(name(target)))
}

fn answer(records: Vec<Record>) -> Resolved {
    Resolved::answer(records)
}

fn empty() -> Resolved {
    Resolved::answer(Vec::new())
}

fn nxdomain() -> Resolved {
    Resolved::error(ResponseCode::NXDomain)
}

#[test]
fn resolves_for_nameservers() {
    let zone = bare_zone();

    assert_eq!(
        resolve(&query("example.com.", RecordType::NS), &zone),
        answer(vec![ns("example.com.", "alpha.example.com.")])
    );
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::A), &zone),
        answer(vec![a("alpha.example.com.", NS_A)])
    );
    // The name exists, it just has no IPv6 address.
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::AAAA), &zone),
        empty()
    );
}

#[test]
fn ns_records_at_every_name_in_zone() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": ["192.0.2.1", "192.0.2.2"]
    }));
    let ns_set = |qname: &str| {
        vec![
            ns(qname, "alpha.example.com."),
            ns(qname, "omega.example.com."),
        ]
    };

    for qname in ["example.com.", "omega.example.com.", "10.0.0.1.example.com."] {
        assert_eq!(
            resolve(&query(qname, RecordType::NS), &zone),
            answer(ns_set(qname)),
            "NS at {qname}"
        );
    }

    // Names that don't exist still list the nameservers, but keep their NXDOMAIN.
    for qname in ["does.not.exist.example.com.", "www.example.com."] {
        assert_eq!(
            resolve(&query(qname, RecordType::NS), &zone),
            Resolved {
                records: ns_set(qname),
                response_code: ResponseCode::NXDomain,
            },
            "NS at {qname}"
        );
    }
}

#[test]
fn omega_requires_second_nameserver() {
    let zone = bare_zone();
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::A), &zone),
        nxdomain()
    );
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::AAAA), &zone),
        nxdomain()
    );
}

#[test]
fn resolves_for_two_nameservers() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": ["192.0.2.1", "192.0.2.2"],
        "nameserver_aaaa": ["2001:db8::53", "2001:db8::54"]
    }));

    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::A), &zone),
        answer(vec![a("alpha.example.com.", "192.0.2.1")])
    );
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::AAAA), &zone),
        answer(vec![aaaa("alpha.example.com.", "2001:db8::53")])
    );
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::A), &zone),
        answer(vec![a("omega.example.com.", "192.0.2.2")])
    );
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::AAAA), &zone),
        answer(vec![aaaa("omega.example.com.", "2001:db8::54")])
    );
}

#[test]
fn omega_without_ipv6_has_no_aaaa() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": ["192.0.2.1", "192.0.2.2"]
    }));
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::A), &zone),
        answer(vec![a("omega.example.com.", "192.0.2.2")])
    );
    assert_eq!(
        resolve(&query("omega.example.com.", RecordType::AAAA), &zone),
        nxdomain()
    );
    // alpha still exists without an IPv6 address.
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::AAAA), &zone),
        empty()
    );
}

#[test]
fn does_not_resolve_for_website_if_unconfigured() {
    let zone = bare_zone();

    assert_eq!(resolve(&query("example.com.", RecordType::A), &zone), empty());
    assert_eq!(
        resolve(&query("example.com.", RecordType::AAAA), &zone),
        empty()
    );
    assert_eq!(
        resolve(&query("example.com.", RecordType::CNAME), &zone),
        empty()
    );
    assert_eq!(
        resolve(&query("example.com.", RecordType::TXT), &zone),
        empty()
    );

    for query_type in [RecordType::A, RecordType::AAAA, RecordType::CNAME] {
        assert_eq!(
            resolve(&query("www.example.com.", query_type), &zone),
            nxdomain(),
            "www {query_type}"
        );
    }
}

#[test]
fn resolves_for_website_if_configured() {
    let zone = website_zone();

    assert_eq!(
        resolve(&query("example.com.", RecordType::A), &zone),
        answer(vec![a("example.com.", WEBSITE_A)])
    );
    assert_eq!(
        resolve(&query("example.com.", RecordType::AAAA), &zone),
        answer(vec![aaaa("example.com.", WEBSITE_AAAA)])
    );
    assert_eq!(
        resolve(&query("example.com.", RecordType::CNAME), &zone),
        empty()
    );

    assert_eq!(
        resolve(&query("www.example.com.", RecordType::A), &zone),
        answer(vec![
            cname("www.example.com.", "example.com."),
            a("www.example.com.", WEBSITE_A),
        ])
    );
    assert_eq!(
        resolve(&query("www.example.com.", RecordType::AAAA), &zone),
        answer(vec![
            cname("www.example.com.", "example.com."),
            aaaa("www.example.com.", WEBSITE_AAAA),
        ])
    );
    assert_eq!(
        resolve(&query("www.example.com.", RecordType::CNAME), &zone),
        answer(vec![cname("www.example.com.", "example.com.")])
    );
}

#[test]
fn apex_returns_every_website_address() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "website_a": ["192.0.2.10", "192.0.2.11"]
    }));
    assert_eq!(
        resolve(&query("example.com.", RecordType::A), &zone),
        answer(vec![
            a("example.com.", "192.0.2.10"),
            a("example.com.", "192.0.2.11"),
        ])
    );
}

#[test]
fn www_with_one_family_configured() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "website_a": [WEBSITE_A]
    }));

    assert_eq!(
        resolve(&query("www.example.com.", RecordType::AAAA), &zone),
        empty()
    );
    assert_eq!(
        resolve(&query("www.example.com.", RecordType::A), &zone),
        answer(vec![
            cname("www.example.com.", "example.com."),
            a("www.example.com.", WEBSITE_A),
        ])
    );
}

#[test]
fn apex_txt() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "root_txt": ["v=spf1 -all", "hello"]
    }));
    let txt = TXT::new(vec!["v=spf1 -all".to_string(), "hello".to_string()]);
    assert_eq!(
        resolve(&query("example.com.", RecordType::TXT), &zone),
        answer(vec![Record::from_rdata(
            name("example.com."),
            DEFAULT_TTL,
            RData::TXT(txt)
        )])
    );
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::TXT), &zone),
        empty()
    );
}

#[test]
fn resolves_ipv4_subdomains() {
    let zone = bare_zone();

    for (qname, ip) in [
        ("127.0.0.1.example.com.", "127.0.0.1"),
        ("foo.127.0.0.1.example.com.", "127.0.0.1"),
        ("200-0-0-4.example.com.", "200.0.0.4"),
        ("foo.200-0-0-4.example.com.", "200.0.0.4"),
    ] {
        assert_eq!(
            resolve(&query(qname, RecordType::A), &zone),
            answer(vec![a(qname, ip)]),
            "A {qname}"
        );
        assert_eq!(
            resolve(&query(qname, RecordType::AAAA), &zone),
            empty(),
            "AAAA {qname}"
        );
    }
}

#[test]
fn resolves_ipv6_subdomains() {
    let zone = bare_zone();

    for qname in [
        "2001.db8.0.0.0.0.0.1.example.com.",
        "foo.2001.db8.0.0.0.0.0.1.example.com.",
        "2001-db8--1.example.com.",
        "foo.2001-db8--1.example.com.",
    ] {
        assert_eq!(
            resolve(&query(qname, RecordType::AAAA), &zone),
            answer(vec![aaaa(qname, "2001:db8::1")]),
            "AAAA {qname}"
        );
        assert_eq!(
            resolve(&query(qname, RecordType::A), &zone),
            empty(),
            "A {qname}"
        );
    }
}

#[test]
fn unmatched_names_do_not_exist() {
    let zone = website_zone();
    for qname in [
        "foo.example.com.",
        "ns.example.com.",
        "www.www.example.com.",
        "1-2-3.example.com.",
    ] {
        assert_eq!(
            resolve(&query(qname, RecordType::A), &zone),
            nxdomain(),
            "{qname}"
        );
    }
}

#[test]
fn names_outside_zone() {
    let zone = website_zone();
    for qname in ["notexample.com.", "example.org.", "com.", "127.0.0.1.example.net."] {
        for query_type in [RecordType::A, RecordType::NS, RecordType::TXT] {
            assert_eq!(
                resolve(&query(qname, query_type), &zone),
                Resolved::error(ResponseCode::NotZone),
                "{query_type} {qname}"
            );
        }
    }
}

#[test]
fn non_internet_class_is_not_implemented() {
    let zone = website_zone();
    let mut q = query("example.com.", RecordType::A);
    q.set_query_class(DNSClass::CH);
    assert_eq!(resolve(&q, &zone), Resolved::error(ResponseCode::NotImp));
}

#[test]
fn owner_keeps_queried_case() {
    let zone = website_zone();
    let resolved = resolve(&query("WWW.Example.COM.", RecordType::A), &zone);
    assert_eq!(resolved.response_code, ResponseCode::NoError);

    let owners: Vec<String> = resolved.records.iter().map(|r| r.name().to_string()).collect();
    assert_eq!(owners, vec!["WWW.Example.COM.", "www.example.com."]);
    let types: Vec<RecordType> = resolved.records.iter().map(Record::record_type).collect();
    assert_eq!(types, vec![RecordType::CNAME, RecordType::A]);
}

#[test]
fn records_use_configured_ttl_and_class() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "ttl": 60
    }));
    let resolved = resolve(&query("10-1-2-3.example.com.", RecordType::A), &zone);
    assert_eq!(resolved.records.len(), 1);
    assert_eq!(resolved.records[0].ttl(), 60);
    assert_eq!(resolved.records[0].dns_class(), DNSClass::IN);
}

#[test]
fn blocklisted_addresses_do_not_exist() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "blocklist": ["169.254.169.254", "fd00::/8"]
    }));

    for qname in [
        "169.254.169.254.example.com.",
        "metadata.169-254-169-254.example.com.",
        "fd00--1.example.com.",
    ] {
        for query_type in [RecordType::A, RecordType::AAAA] {
            assert_eq!(
                resolve(&query(qname, query_type), &zone),
                nxdomain(),
                "{query_type} {qname}"
            );
        }
        assert_eq!(
            resolve(&query(qname, RecordType::NS), &zone),
            Resolved {
                records: vec![ns(qname, "alpha.example.com.")],
                response_code: ResponseCode::NXDomain,
            }
        );
    }

    assert_eq!(
        resolve(&query("169.254.169.253.example.com.", RecordType::A), &zone),
        answer(vec![a("169.254.169.253.example.com.", "169.254.169.253")])
    );
}

#[test]
fn blocklist_scope_for_configured_addresses() {
    let decoded = zone(json!({
        "name": "example.com",
        "nameserver_a": ["10.0.0.53"],
        "website_a": ["10.0.0.1"],
        "blocklist": ["10.0.0.0/8"]
    }));
    assert_eq!(
        resolve(&query("example.com.", RecordType::A), &decoded),
        answer(vec![a("example.com.", "10.0.0.1")])
    );
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::A), &decoded),
        answer(vec![a("alpha.example.com.", "10.0.0.53")])
    );
    assert_eq!(
        resolve(&query("10.0.0.1.example.com.", RecordType::A), &decoded),
        nxdomain()
    );

    let all = zone(json!({
        "name": "example.com",
        "nameserver_a": ["10.0.0.53"],
        "website_a": ["10.0.0.1"],
        "blocklist": ["10.0.0.0/8"],
        "blocklist_scope": "all"
    }));
    // The apex always exists, blocked addresses are just left out.
    assert_eq!(resolve(&query("example.com.", RecordType::A), &all), empty());
    assert_eq!(
        resolve(&query("www.example.com.", RecordType::A), &all),
        nxdomain()
    );
    assert_eq!(
        resolve(&query("alpha.example.com.", RecordType::A), &all),
        nxdomain()
    );
    // Nothing blocked is returned for the other family.
    assert_eq!(
        resolve(&query("example.com.", RecordType::AAAA), &all),
        empty()
    );
}

#[test]
fn apex_keeps_unblocked_website_addresses() {
    let zone = zone(json!({
        "name": "example.com",
        "nameserver_a": [NS_A],
        "website_a": ["10.0.0.1", "192.0.2.10"],
        "blocklist": ["10.0.0.0/8"],
        "blocklist_scope": "all"
    }));
    assert_eq!(
        resolve(&query("example.com.", RecordType::A), &zone),
        answer(vec![a("example.com.", "192.0.2.10")])
    );
}

#[test]
fn resolving_is_idempotent() {
    let zone = website_zone();
    for (qname, query_type) in [
        ("www.example.com.", RecordType::A),
        ("foo.2001-db8--1.example.com.", RecordType::AAAA),
        ("nothing.example.com.", RecordType::TXT),
    ] {
        let q = query(qname, query_type);
        assert_eq!(resolve(&q, &zone), resolve(&q, &zone));
    }
}

#[test]
fn single_nameserver_example() {
    let zone = zone(json!({ "name": "example.com.", "nameserver_a": ["10.0.0.1"] }));
    assert_eq!(
        resolve(&query("127.0.0.1.example.com.", RecordType::A), &zone),
        answer(vec![a("127.0.0.1.example.com.", "127.0.0.1")])
    );
}

#[test]
fn subdomain_extraction() {
    let apex = name("example.com.");
    assert_eq!(subdomain_of(&name("example.com."), &apex), "");
    assert_eq!(subdomain_of(&name("WWW.example.com."), &apex), "www");
    assert_eq!(
        subdomain_of(&name("Foo.192-168-0-1.example.com."), &apex),
        "foo.192-168-0-1"
    );
}
