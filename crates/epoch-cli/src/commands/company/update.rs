use anyhow::bail;
use epoch_core::dates::parse_date_param;
use epoch_core::requests::CompanyPatch;
use epoch_db::updates::company::CompanyUpdate;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub struct Fields<'a> {
    pub name: Option<&'a str>,
    pub domain: Option<&'a str>,
    pub founded: Option<&'a str>,
    pub industry: Option<&'a str>,
}

pub async fn run(
    id: &str,
    fields: Fields<'_>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let patch = CompanyPatch {
        name: fields.name.map(str::to_string),
        domain: fields.domain.map(str::to_string),
        founded_date: fields
            .founded
            .map(|raw| parse_date_param("founded", raw))
            .transpose()?,
        industry: fields.industry.map(str::to_string),
    };
    if patch == CompanyPatch::default() {
        bail!("nothing to update: pass at least one of --name, --domain, --founded, --industry");
    }
    patch.validate()?;

    let company = ctx
        .service
        .update_company(id, CompanyUpdate::from(patch))
        .await?;
    output(&company, flags.format)
}
