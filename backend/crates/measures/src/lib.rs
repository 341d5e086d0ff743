pub mod domains;
pub mod l10n;
pub mod layout;
pub mod leak;
pub mod models;
pub mod query;
pub mod view;

pub use domains::{group_by_domains, DomainGroup, KNOWN_DOMAINS};
pub use l10n::Messages;
pub use layout::Layout;
pub use leak::get_leak_value;
pub use models::{Component, Measure, MeasureEnhanced, MeasurePeriod, Metric, Metrics, Period};
pub use query::{parse_query, serialize_query, Query, RawQuery, DEFAULT_VIEW};
pub use view::{FetchTicket, MeasuresFetcher, MeasuresPayload, MeasuresView, ViewProps, ViewState};
