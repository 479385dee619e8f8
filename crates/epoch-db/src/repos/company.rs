//! Company repository: list with counts, detail, create, partial update.

use chrono::Utc;

use epoch_core::entities::{Company, CompanyCounts, CompanyDetail};
use epoch_core::errors::CoreError;
use epoch_core::ids::PREFIX_COMPANY;
use epoch_core::requests::NewCompany;

use crate::error::DatabaseError;
use crate::filters::{MilestoneFilter, SnapshotFilter};
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_optional_datetime};
use crate::repos::snapshot::Attachments;
use crate::service::EpochService;
use crate::updates::company::CompanyUpdate;

const SELECT_COLS: &str = "id, name, domain, founded_date, industry, created_at, updated_at";

fn row_to_company(row: &libsql::Row) -> Result<Company, DatabaseError> {
    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        domain: row.get(2)?,
        founded_date: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        industry: get_opt_string(row, 4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
        updated_at: parse_datetime(&row.get::<String>(6)?)?,
        counts: None,
    })
}

fn count(n: i64) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

impl EpochService {
    /// Insert a company.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Core` when validation fails, or a libSQL error.
    pub async fn create_company(&self, input: &NewCompany) -> Result<Company, DatabaseError> {
        input.validate()?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_COMPANY).await?;

        self.db()
            .conn()
            .execute(
                &format!("INSERT INTO companies ({SELECT_COLS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
                libsql::params![
                    id.as_str(),
                    input.name.as_str(),
                    input.domain.as_str(),
                    input.founded_date.map(format_datetime),
                    input.industry.as_deref(),
                    format_datetime(now),
                    format_datetime(now)
                ],
            )
            .await?;

        tracing::debug!(%id, name = %input.name, "company created");
        self.get_company(&id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no company has this id.
    pub async fn get_company(&self, id: &str) -> Result<Company, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(&format!("SELECT {SELECT_COLS} FROM companies WHERE id = ?1"), [id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_company(&row)
    }

    /// All companies ordered by name, each with snapshot and milestone counts.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_companies(&self) -> Result<Vec<Company>, DatabaseError> {
        let mut rows = self
            .db()
            .conn()
            .query(
                "SELECT c.id, c.name, c.domain, c.founded_date, c.industry, c.created_at, c.updated_at, \
                 (SELECT COUNT(*) FROM snapshots s WHERE s.company_id = c.id), \
                 (SELECT COUNT(*) FROM milestones m WHERE m.company_id = c.id) \
                 FROM companies c ORDER BY c.name ASC, c.id ASC",
                (),
            )
            .await?;

        let mut companies = Vec::new();
        while let Some(row) = rows.next().await? {
            let mut company = row_to_company(&row)?;
            company.counts = Some(CompanyCounts {
                snapshots: count(row.get::<i64>(7)?),
                milestones: count(row.get::<i64>(8)?),
            });
            companies.push(company);
        }
        Ok(companies)
    }

    /// A company with every snapshot (with all attachments) and milestone,
    /// both date-ascending.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no company has this id.
    pub async fn get_company_detail(&self, id: &str) -> Result<CompanyDetail, DatabaseError> {
        let company = self.get_company(id).await?;
        let snapshots = self
            .list_snapshots(&SnapshotFilter::for_company(id), Attachments::full())
            .await?;
        let milestones = self
            .list_milestones(&MilestoneFilter {
                company_id: Some(id.to_string()),
                ..MilestoneFilter::default()
            })
            .await?;
        Ok(CompanyDetail {
            company,
            snapshots,
            milestones,
        })
    }

    /// Apply a partial update. An empty update returns the current row.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no company has this id, or
    /// `DatabaseError::Core` if a new name or domain is blank.
    pub async fn update_company(
        &self,
        id: &str,
        update: CompanyUpdate,
    ) -> Result<Company, DatabaseError> {
        if update.is_empty() {
            return self.get_company(id).await;
        }

        let mut sets = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();
        let mut idx = 1usize;

        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(CoreError::Validation("name is required".into()).into());
            }
            sets.push(format!("name = ?{idx}"));
            params.push(name.clone().into());
            idx += 1;
        }
        if let Some(ref domain) = update.domain {
            if domain.trim().is_empty() {
                return Err(CoreError::Validation("domain is required".into()).into());
            }
            sets.push(format!("domain = ?{idx}"));
            params.push(domain.clone().into());
            idx += 1;
        }
        if let Some(founded_date) = update.founded_date {
            sets.push(format!("founded_date = ?{idx}"));
            params.push(founded_date.map_or(libsql::Value::Null, |d| format_datetime(d).into()));
            idx += 1;
        }
        if let Some(ref industry) = update.industry {
            sets.push(format!("industry = ?{idx}"));
            params.push(industry.clone().map_or(libsql::Value::Null, Into::into));
            idx += 1;
        }

        sets.push(format!("updated_at = ?{idx}"));
        params.push(format_datetime(Utc::now()).into());
        idx += 1;

        params.push(id.into());
        let sql = format!("UPDATE companies SET {} WHERE id = ?{idx}", sets.join(", "));
        let changed = self
            .db()
            .conn()
            .execute(&sql, libsql::params_from_iter(params))
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }

        self.get_company(id).await
    }
}
