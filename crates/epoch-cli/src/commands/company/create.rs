use epoch_core::dates::parse_date_param;
use epoch_core::requests::NewCompany;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn run(
    name: &str,
    domain: &str,
    founded: Option<&str>,
    industry: Option<&str>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let input = NewCompany {
        name: name.to_string(),
        domain: domain.to_string(),
        founded_date: founded.map(|raw| parse_date_param("founded", raw)).transpose()?,
        industry: industry.map(str::to_string),
    };
    let company = ctx.service.create_company(&input).await?;
    tracing::info!(id = %company.id, name = %company.name, "company created");
    output(&company, flags.format)
}
