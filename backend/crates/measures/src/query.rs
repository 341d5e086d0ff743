use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// URL query parameters as received from the client.
pub type RawQuery = BTreeMap<String, String>;

pub const DEFAULT_VIEW: &str = "list";

const DOMAIN_PARAM: &str = "domain";
const METRIC_PARAM: &str = "metric";
const VIEW_PARAM: &str = "view";

/// Typed state of the measures page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub domain: Option<String>,
    pub metric: Option<String>,
    pub view: String,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            domain: None,
            metric: None,
            view: DEFAULT_VIEW.to_string(),
        }
    }
}

/// An absent or empty parameter reads as `None`.
pub fn parse_as_string(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).cloned()
}

/// Empty strings are not written to the URL.
pub fn serialize_string(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_owned)
}

/// Drop every parameter without a value.
pub fn clean_query<I, K>(entries: I) -> RawQuery
where
    I: IntoIterator<Item = (K, Option<String>)>,
    K: Into<String>,
{
    entries
        .into_iter()
        .filter_map(|(k, v)| v.map(|v| (k.into(), v)))
        .collect()
}

pub fn parse_query(raw: &RawQuery) -> Query {
    Query {
        domain: parse_as_string(raw.get(DOMAIN_PARAM)),
        metric: parse_as_string(raw.get(METRIC_PARAM)),
        view: parse_as_string(raw.get(VIEW_PARAM)).unwrap_or_else(|| DEFAULT_VIEW.to_string()),
    }
}

/// Inverse of [`parse_query`]. Keys holding their default are omitted so the
/// URL stays canonical.
pub fn serialize_query(query: &Query) -> RawQuery {
    let view = if query.view == DEFAULT_VIEW {
        None
    } else {
        serialize_string(Some(query.view.as_str()))
    };

    clean_query([
        (DOMAIN_PARAM, serialize_string(query.domain.as_deref())),
        (METRIC_PARAM, serialize_string(query.metric.as_deref())),
        (VIEW_PARAM, view),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> RawQuery {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_applies_default_view() {
        let q = parse_query(&raw(&[("domain", "Security")]));
        assert_eq!(q.domain.as_deref(), Some("Security"));
        assert_eq!(q.metric, None);
        assert_eq!(q.view, DEFAULT_VIEW);
    }

    #[test]
    fn parse_treats_empty_values_as_absent() {
        let q = parse_query(&raw(&[("domain", ""), ("metric", ""), ("view", "")]));
        assert_eq!(q, Query::default());
    }

    #[test]
    fn parse_ignores_unknown_keys() {
        let q = parse_query(&raw(&[("id", "my:project"), ("metric", "coverage")]));
        assert_eq!(q.metric.as_deref(), Some("coverage"));
        assert_eq!(q.domain, None);
    }

    #[test]
    fn serialize_omits_default_view_and_absent_keys() {
        let q = Query {
            domain: None,
            metric: Some("ncloc".to_string()),
            view: DEFAULT_VIEW.to_string(),
        };
        assert_eq!(serialize_query(&q), raw(&[("metric", "ncloc")]));
        assert!(serialize_query(&Query::default()).is_empty());
    }

    #[test]
    fn serialize_keeps_non_default_view() {
        let q = Query {
            domain: Some("Coverage".to_string()),
            metric: None,
            view: "tree".to_string(),
        };
        assert_eq!(
            serialize_query(&q),
            raw(&[("domain", "Coverage"), ("view", "tree")])
        );
    }

    #[test]
    fn parse_inverts_serialize() {
        let queries = [
            Query {
                domain: Some("Reliability".to_string()),
                metric: Some("bugs".to_string()),
                view: "treemap".to_string(),
            },
            Query {
                domain: None,
                metric: Some("coverage".to_string()),
                view: "tree".to_string(),
            },
            Query::default(),
        ];
        for q in queries {
            assert_eq!(parse_query(&serialize_query(&q)), q);
        }
    }

    #[test]
    fn clean_query_drops_missing_values() {
        let cleaned = clean_query([("a", Some("1".to_string())), ("b", None)]);
        assert_eq!(cleaned, raw(&[("a", "1")]));
    }
}
