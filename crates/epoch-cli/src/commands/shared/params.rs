//! Flag values funnelled through the same parameter parsing the HTTP API uses,
//! so the CLI and the server accept and reject identical input.

use std::collections::HashMap;

use epoch_core::query::{QueryDefaults, SnapshotPageQuery, TimelineQuery};

use crate::cli::root_commands::DateRangeArgs;

#[derive(Debug, Default)]
pub struct ParamMap(HashMap<String, String>);

impl ParamMap {
    pub fn set(&mut self, key: &str, value: Option<impl ToString>) -> &mut Self {
        if let Some(value) = value {
            self.0.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn range(&mut self, range: &DateRangeArgs) -> &mut Self {
        self.set("startDate", range.start_date.as_deref())
            .set("endDate", range.end_date.as_deref())
    }

    pub fn timeline_query(&self, defaults: &QueryDefaults) -> anyhow::Result<TimelineQuery> {
        Ok(TimelineQuery::from_params(&self.0, defaults)?)
    }

    pub fn page_query(&self, defaults: &QueryDefaults) -> anyhow::Result<SnapshotPageQuery> {
        Ok(SnapshotPageQuery::from_params(&self.0, defaults)?)
    }
}

#[cfg(test)]
mod tests {
    use epoch_core::dates::utc_date;
    use epoch_core::query::QueryDefaults;
    use pretty_assertions::assert_eq;

    use super::ParamMap;
    use crate::cli::root_commands::DateRangeArgs;

    #[test]
    fn absent_flags_fall_back_to_defaults() {
        let query = ParamMap::default()
            .timeline_query(&QueryDefaults::default())
            .expect("defaults parse");
        assert_eq!(query.limit, 50);
        assert_eq!(query.range.start, None);
    }

    #[test]
    fn range_and_limit_are_parsed() {
        let mut params = ParamMap::default();
        params
            .range(&DateRangeArgs {
                start_date: Some("2005-01-01".into()),
                end_date: None,
            })
            .set("limit", Some(3));
        let query = params.timeline_query(&QueryDefaults::default()).expect("parse");
        assert_eq!(query.limit, 3);
        assert_eq!(query.range.start, utc_date(2005, 1, 1));
    }

    #[test]
    fn page_limit_is_capped() {
        let mut params = ParamMap::default();
        params.set("limit", Some(1000)).set("majorChangesOnly", Some(true));
        let query = params.page_query(&QueryDefaults::default()).expect("parse");
        assert_eq!(query.limit, 100);
        assert!(query.major_changes_only);
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut params = ParamMap::default();
        params.range(&DateRangeArgs {
            start_date: Some("yesterday".into()),
            end_date: None,
        });
        let err = params
            .timeline_query(&QueryDefaults::default())
            .expect_err("bad date");
        assert!(err.to_string().contains("startDate"), "{err}");
    }
}
