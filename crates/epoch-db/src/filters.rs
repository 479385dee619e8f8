//! Query filters shared by the snapshot and milestone repos.
//!
//! Each filter renders a `WHERE` clause with positional `?N` parameters.

use epoch_core::query::DateRange;

use crate::helpers::format_datetime;

/// A rendered `WHERE` clause (empty when unfiltered) and its parameters.
#[derive(Debug, Default)]
pub(crate) struct WhereClause {
    pub sql: String,
    pub params: Vec<libsql::Value>,
}

#[derive(Default)]
struct Conditions {
    parts: Vec<String>,
    params: Vec<libsql::Value>,
}

impl Conditions {
    fn push(&mut self, template: &str, value: libsql::Value) {
        self.params.push(value);
        self.parts
            .push(template.replace("{}", &format!("?{}", self.params.len())));
    }

    fn push_range(&mut self, column: &str, range: &DateRange) {
        if let Some(start) = range.start {
            self.push(&format!("{column} >= {{}}"), format_datetime(start).into());
        }
        if let Some(end) = range.end {
            self.push(&format!("{column} <= {{}}"), format_datetime(end).into());
        }
    }

    fn finish(self) -> WhereClause {
        let sql = if self.parts.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.parts.join(" AND "))
        };
        WhereClause {
            sql,
            params: self.params,
        }
    }
}

/// Filter for snapshot listings. Results are always date-ascending.
#[derive(Debug, Clone, Default)]
pub struct SnapshotFilter {
    pub company_id: Option<String>,
    pub range: DateRange,
    pub major_changes_only: bool,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
}

impl SnapshotFilter {
    #[must_use]
    pub fn for_company(company_id: &str) -> Self {
        Self {
            company_id: Some(company_id.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn where_clause(&self) -> WhereClause {
        let mut conditions = Conditions::default();
        if let Some(ref company_id) = self.company_id {
            conditions.push("company_id = {}", company_id.clone().into());
        }
        conditions.push_range("snapshot_date", &self.range);
        if self.major_changes_only {
            conditions.parts.push("is_major_change = 1".to_string());
        }
        conditions.finish()
    }

    /// `LIMIT`/`OFFSET` suffix. SQLite needs a LIMIT before an OFFSET.
    pub(crate) fn page_clause(&self) -> String {
        match (self.limit, self.offset) {
            (Some(limit), Some(offset)) => format!("LIMIT {limit} OFFSET {offset}"),
            (Some(limit), None) => format!("LIMIT {limit}"),
            (None, Some(offset)) => format!("LIMIT -1 OFFSET {offset}"),
            (None, None) => String::new(),
        }
    }
}

/// Filter for milestone listings. Results are always date-ascending.
#[derive(Debug, Clone, Default)]
pub struct MilestoneFilter {
    pub company_id: Option<String>,
    pub range: DateRange,
}

impl MilestoneFilter {
    pub(crate) fn where_clause(&self) -> WhereClause {
        let mut conditions = Conditions::default();
        if let Some(ref company_id) = self.company_id {
            conditions.push("company_id = {}", company_id.clone().into());
        }
        conditions.push_range("milestone_date", &self.range);
        conditions.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use epoch_core::dates::utc_date;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_filter_renders_nothing() {
        let clause = SnapshotFilter::default().where_clause();
        assert_eq!(clause.sql, "");
        assert!(clause.params.is_empty());
        assert_eq!(SnapshotFilter::default().page_clause(), "");
    }

    #[test]
    fn snapshot_filter_numbers_params_in_order() {
        let filter = SnapshotFilter {
            company_id: Some("cmp-1".into()),
            range: DateRange {
                start: utc_date(2000, 1, 1),
                end: utc_date(2005, 1, 1),
            },
            major_changes_only: true,
            limit: Some(10),
            offset: Some(20),
        };
        let clause = filter.where_clause();
        assert_eq!(
            clause.sql,
            "WHERE company_id = ?1 AND snapshot_date >= ?2 AND snapshot_date <= ?3 AND is_major_change = 1"
        );
        assert_eq!(clause.params.len(), 3);
        assert_eq!(filter.page_clause(), "LIMIT 10 OFFSET 20");
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let filter = SnapshotFilter {
            offset: Some(5),
            ..SnapshotFilter::default()
        };
        assert_eq!(filter.page_clause(), "LIMIT -1 OFFSET 5");
    }

    #[test]
    fn milestone_filter_open_end() {
        let filter = MilestoneFilter {
            company_id: Some("cmp-1".into()),
            range: DateRange {
                start: None,
                end: utc_date(2005, 1, 1),
            },
        };
        assert_eq!(
            filter.where_clause().sql,
            "WHERE company_id = ?1 AND milestone_date <= ?2"
        );
    }
}
