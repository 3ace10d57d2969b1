// Expected-state construction.
//
// Pure transformation, no I/O: the cross-product of rule templates and
// resolved addresses, keyed by canonical rule identity.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::model::{ExpectedRule, ResolvedAddresses, RuleKey, RuleTemplate};

/// Expand every (template, domain, address) triple into an expected rule,
/// keyed by canonical identity.
///
/// A domain with zero resolved addresses contributes no entries — that is
/// not an error. Templates that expand to the same key collapse last-wins;
/// template uniqueness is the catalog author's responsibility.
pub fn build_expected(
    templates: &[RuleTemplate],
    resolved: &ResolvedAddresses,
) -> BTreeMap<RuleKey, ExpectedRule> {
    let mut expected = BTreeMap::new();

    for template in templates {
        for (domain, addresses) in resolved {
            for address in addresses {
                let rule = ExpectedRule {
                    protocol: template.protocol.clone(),
                    from_port: template.from_port,
                    to_port: template.to_port,
                    address: *address,
                    domain: domain.clone(),
                    description: render_description(&template.description, domain, *address),
                };
                expected.insert(rule.key(), rule);
            }
        }
    }

    expected
}

/// Substitute `{domain}` and `{address}` placeholders in a description
/// template.
fn render_description(template: &str, domain: &str, address: Ipv4Addr) -> String {
    template
        .replace("{domain}", domain)
        .replace("{address}", &address.to_string())
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    use super::*;

    fn template(protocol: &str, from_port: u16, to_port: u16, description: &str) -> RuleTemplate {
        RuleTemplate {
            protocol: protocol.into(),
            from_port,
            to_port,
            description: description.into(),
        }
    }

    fn addr(s: &str) -> Ipv4Addr {
        s.parse().expect("test address should parse")
    }

    #[test]
    fn expands_one_template_across_all_addresses() {
        let templates = vec![template("tcp", 443, 443, "HTTPS")];
        let resolved: ResolvedAddresses = IndexMap::from([(
            "example.com".to_string(),
            vec![addr("1.1.1.1"), addr("2.2.2.2")],
        )]);

        let expected = build_expected(&templates, &resolved);

        let keys: Vec<&str> = expected.keys().map(RuleKey::as_str).collect();
        assert_eq!(keys, vec!["tcp-443-443-1.1.1.1/32", "tcp-443-443-2.2.2.2/32"]);
    }

    #[test]
    fn zero_address_domain_contributes_nothing() {
        let templates = vec![template("tcp", 443, 443, "HTTPS")];
        let resolved: ResolvedAddresses = IndexMap::from([
            ("empty.example.com".to_string(), vec![]),
            ("ad.example.com".to_string(), vec![addr("10.0.0.1")]),
        ]);

        let expected = build_expected(&templates, &resolved);

        assert_eq!(expected.len(), 1);
        assert!(expected.contains_key(&RuleKey::new("tcp", 443, 443, addr("10.0.0.1"))));
    }

    #[test]
    fn same_address_from_two_domains_collapses_to_one_key() {
        let templates = vec![template("tcp", 443, 443, "HTTPS to {domain}")];
        let resolved: ResolvedAddresses = IndexMap::from([
            ("a.example.com".to_string(), vec![addr("3.3.3.3")]),
            ("b.example.com".to_string(), vec![addr("3.3.3.3")]),
        ]);

        let expected = build_expected(&templates, &resolved);

        assert_eq!(expected.len(), 1);
        // Later domain wins, same as colliding templates.
        let rule = expected
            .values()
            .next()
            .expect("one entry should be present");
        assert_eq!(rule.domain, "b.example.com");
    }

    #[test]
    fn colliding_templates_collapse_last_wins() {
        let templates = vec![
            template("tcp", 443, 443, "first"),
            template("tcp", 443, 443, "second"),
        ];
        let resolved: ResolvedAddresses =
            IndexMap::from([("example.com".to_string(), vec![addr("1.1.1.1")])]);

        let expected = build_expected(&templates, &resolved);

        assert_eq!(expected.len(), 1);
        let rule = expected
            .values()
            .next()
            .expect("one entry should be present");
        assert_eq!(rule.description, "second");
    }

    #[test]
    fn keys_do_not_depend_on_input_ordering() {
        let forward = vec![
            template("tcp", 443, 443, "HTTPS"),
            template("udp", 53, 53, "DNS"),
        ];
        let reversed: Vec<RuleTemplate> = forward.iter().rev().cloned().collect();

        let resolved_forward: ResolvedAddresses = IndexMap::from([
            ("a.example.com".to_string(), vec![addr("1.1.1.1")]),
            ("b.example.com".to_string(), vec![addr("2.2.2.2")]),
        ]);
        let resolved_reversed: ResolvedAddresses = IndexMap::from([
            ("b.example.com".to_string(), vec![addr("2.2.2.2")]),
            ("a.example.com".to_string(), vec![addr("1.1.1.1")]),
        ]);

        let first = build_expected(&forward, &resolved_forward);
        let second = build_expected(&reversed, &resolved_reversed);

        let first_keys: Vec<&RuleKey> = first.keys().collect();
        let second_keys: Vec<&RuleKey> = second.keys().collect();
        assert_eq!(first_keys, second_keys);
    }

    #[test]
    fn description_placeholders_are_substituted() {
        let templates = vec![template("tcp", 389, 389, "LDAP to {domain} ({address})")];
        let resolved: ResolvedAddresses =
            IndexMap::from([("ad.example.com".to_string(), vec![addr("10.1.2.3")])]);

        let expected = build_expected(&templates, &resolved);

        let rule = expected
            .values()
            .next()
            .expect("one entry should be present");
        assert_eq!(rule.description, "LDAP to ad.example.com (10.1.2.3)");
    }
}
