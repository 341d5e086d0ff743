use serde::{Deserialize, Serialize};

use crate::l10n::Messages;
use crate::models::MeasureEnhanced;

/// Display order of the domains the platform ships with.
pub const KNOWN_DOMAINS: [&str; 8] = [
    "Releasability",
    "Reliability",
    "Security",
    "Maintainability",
    "Coverage",
    "Duplications",
    "Size",
    "Complexity",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainGroup {
    pub name: String,
    pub measures: Vec<MeasureEnhanced>,
}

/// Sort rank of a domain: its position in [`KNOWN_DOMAINS`], then any other
/// named domain, then the unnamed group.
pub fn domain_rank(name: &str) -> usize {
    if name.is_empty() {
        return KNOWN_DOMAINS.len() + 1;
    }
    KNOWN_DOMAINS
        .iter()
        .position(|d| *d == name)
        .unwrap_or(KNOWN_DOMAINS.len())
}

/// Partition measures by metric domain.
///
/// Measures inside a group are ordered by localized metric name. Groups are
/// ordered by [`domain_rank`], ties broken by domain name. Metrics without a
/// domain land in a group with an empty name.
pub fn group_by_domains(measures: &[MeasureEnhanced], messages: &Messages) -> Vec<DomainGroup> {
    let mut groups: Vec<DomainGroup> = Vec::new();

    for measure in measures {
        let name = measure.domain().unwrap_or_default();
        match groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.measures.push(measure.clone()),
            None => groups.push(DomainGroup {
                name: name.to_string(),
                measures: vec![measure.clone()],
            }),
        }
    }

    for group in &mut groups {
        group
            .measures
            .sort_by_cached_key(|m| messages.localized_metric_name(&m.metric));
    }

    groups.sort_by(|a, b| {
        domain_rank(&a.name)
            .cmp(&domain_rank(&b.name))
            .then_with(|| a.name.cmp(&b.name))
    });

    groups
}
