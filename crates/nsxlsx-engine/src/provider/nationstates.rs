//! NationStates API provider
//!
//! Fetches one nation's economy, government spending, freedom scores and
//! causes of death from the public XML API and reshapes them into four
//! sheets.

use std::time::Duration;

use nsxlsx_core::snapshot::TIMESTAMP_FIELD;
use nsxlsx_core::{NodeId, SnapshotTree};
use serde::Deserialize;

use super::{acquisition_error, capture_timestamp, not_configured, Provider, ProviderKind};
use crate::config::{
    Configurable, Configuration, OPT_API_BASE_URL, OPT_REQUEST_TIMEOUT_SECS,
    OPT_SOURCE_IDENTIFIER, OPT_USER_AGENT,
};
use nsxlsx_core::errors::NsxError;
use nsxlsx_store::errors::Result;

pub const DEFAULT_API_BASE_URL: &str = "https://www.nationstates.net/cgi-bin/api.cgi";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const SHARDS: &str = "deaths+gdp+publicsector+govt+income+sectors+freedomscores";

pub const SHEET_ECONOMY: &str = "Economy";
pub const SHEET_EXPENDITURE: &str = "Government expenditure";
pub const SHEET_RIGHTS: &str = "Rights";
pub const SHEET_DEATHS: &str = "Causes of death";

/// Elements absent from a response deserialize as empty strings; the
/// missing ones are reported by `missing_tags`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
struct NationXml {
    gdp: String,
    income: String,
    publicsector: String,
    govt: GovtXml,
    sectors: SectorsXml,
    freedomscores: FreedomScoresXml,
    deaths: DeathsXml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
struct GovtXml {
    administration: String,
    defence: String,
    education: String,
    environment: String,
    healthcare: String,
    commerce: String,
    internationalaid: String,
    lawandorder: String,
    publictransport: String,
    socialequality: String,
    spirituality: String,
    welfare: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
struct SectorsXml {
    blackmarket: String,
    government: String,
    industry: String,
    public: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE", default)]
struct FreedomScoresXml {
    civilrights: String,
    economy: String,
    politicalfreedom: String,
}

#[derive(Debug, Default, Deserialize)]
struct DeathsXml {
    #[serde(rename = "CAUSE", default)]
    causes: Vec<CauseXml>,
}

#[derive(Debug, Deserialize)]
struct CauseXml {
    #[serde(rename = "@type")]
    kind: String,
    #[serde(rename = "$text", default)]
    value: String,
}

/// `None` for an absent element, an error for one that is not a number
fn parse_number(field: &str, raw: &str) -> Result<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<f64>().map(Some).map_err(|_| {
        acquisition_error(
            "parse_nation",
            format!("{} is not numeric: '{}'", field, raw),
        )
    })
}

/// Paths of the expected elements a response left out or left empty
fn missing_tags(nation: &NationXml) -> Vec<&'static str> {
    let govt = &nation.govt;
    let sectors = &nation.sectors;
    let scores = &nation.freedomscores;
    let expected: [(&'static str, &str); 22] = [
        ("GDP", nation.gdp.as_str()),
        ("INCOME", nation.income.as_str()),
        ("PUBLICSECTOR", nation.publicsector.as_str()),
        ("GOVT/ADMINISTRATION", govt.administration.as_str()),
        ("GOVT/DEFENCE", govt.defence.as_str()),
        ("GOVT/EDUCATION", govt.education.as_str()),
        ("GOVT/ENVIRONMENT", govt.environment.as_str()),
        ("GOVT/HEALTHCARE", govt.healthcare.as_str()),
        ("GOVT/COMMERCE", govt.commerce.as_str()),
        ("GOVT/INTERNATIONALAID", govt.internationalaid.as_str()),
        ("GOVT/LAWANDORDER", govt.lawandorder.as_str()),
        ("GOVT/PUBLICTRANSPORT", govt.publictransport.as_str()),
        ("GOVT/SOCIALEQUALITY", govt.socialequality.as_str()),
        ("GOVT/SPIRITUALITY", govt.spirituality.as_str()),
        ("GOVT/WELFARE", govt.welfare.as_str()),
        ("SECTORS/BLACKMARKET", sectors.blackmarket.as_str()),
        ("SECTORS/GOVERNMENT", sectors.government.as_str()),
        ("SECTORS/INDUSTRY", sectors.industry.as_str()),
        ("SECTORS/PUBLIC", sectors.public.as_str()),
        ("FREEDOMSCORES/CIVILRIGHTS", scores.civilrights.as_str()),
        ("FREEDOMSCORES/ECONOMY", scores.economy.as_str()),
        ("FREEDOMSCORES/POLITICALFREEDOM", scores.politicalfreedom.as_str()),
    ];
    let mut missing: Vec<&'static str> = expected
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(tag, _)| *tag)
        .collect();
    if nation.deaths.causes.is_empty() {
        missing.push("DEATHS/CAUSE");
    }
    missing
}

fn sheet(tree: &mut SnapshotTree, name: &str) -> Result<NodeId> {
    Ok(tree.add_or_get_child(SnapshotTree::ROOT, name)?)
}

fn leaves(tree: &mut SnapshotTree, sheet: NodeId, fields: &[(&str, &str)]) -> Result<()> {
    for (key, value) in fields {
        tree.insert_leaf(sheet, key, value.trim())?;
    }
    Ok(())
}

/// Reshape an API response into the four statistics sheets
///
/// GDP is reported in billions with three decimals; expenditure is the
/// public sector share of that rounded figure. Every sheet gets `timestamp`
/// as its `Timestamp` field. Elements missing from the response become
/// blank fields, which leave their cells empty, and are logged as a warning.
///
/// # Errors
///
/// `ERR_ACQUISITION` for malformed XML or a GDP or public sector share that
/// is present but not numeric.
pub fn parse_nation(xml: &str, timestamp: &str) -> Result<SnapshotTree> {
    let nation: NationXml = quick_xml::de::from_str(xml)
        .map_err(|e| acquisition_error("parse_nation", format!("Malformed API response: {}", e)))?;

    let missing = missing_tags(&nation);
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            count = missing.len(),
            "response lacks expected elements"
        );
    }

    let gdp = parse_number("GDP", nation.gdp.as_str())?;
    let public_sector = parse_number("PUBLICSECTOR", nation.publicsector.as_str())?;
    let gdp_billions = gdp
        .map(|gdp| format!("{:.3}", gdp / 1e9))
        .unwrap_or_default();
    let expenditure = match (public_sector, parse_number("GDP", gdp_billions.as_str())?) {
        (Some(share), Some(rounded_gdp)) => format!("{:.3}", share / 100.0 * rounded_gdp),
        _ => String::new(),
    };

    let mut tree = SnapshotTree::with_root_key("nation");

    let economy = sheet(&mut tree, SHEET_ECONOMY)?;
    leaves(
        &mut tree,
        economy,
        &[
            ("GDP (billion)", gdp_billions.as_str()),
            ("Ave. wage", nation.income.as_str()),
            ("Government", nation.sectors.government.as_str()),
            ("State-owned Industry", nation.sectors.public.as_str()),
            ("Private Industry", nation.sectors.industry.as_str()),
            ("Black Market", nation.sectors.blackmarket.as_str()),
            (TIMESTAMP_FIELD, timestamp),
        ],
    )?;

    let govt = &nation.govt;
    let spending = sheet(&mut tree, SHEET_EXPENDITURE)?;
    leaves(
        &mut tree,
        spending,
        &[
            ("Expenditure (billion)", expenditure.as_str()),
            ("% of GDP", nation.publicsector.as_str()),
            ("Administration", govt.administration.as_str()),
            ("Defence", govt.defence.as_str()),
            ("Education", govt.education.as_str()),
            ("Environment", govt.environment.as_str()),
            ("Healthcare", govt.healthcare.as_str()),
            ("Commerce", govt.commerce.as_str()),
            ("International aid", govt.internationalaid.as_str()),
            ("Law and Order", govt.lawandorder.as_str()),
            ("Public Transport", govt.publictransport.as_str()),
            ("Social Equality", govt.socialequality.as_str()),
            ("Spirituality", govt.spirituality.as_str()),
            ("Welfare", govt.welfare.as_str()),
            (TIMESTAMP_FIELD, timestamp),
        ],
    )?;

    let scores = &nation.freedomscores;
    let rights = sheet(&mut tree, SHEET_RIGHTS)?;
    leaves(
        &mut tree,
        rights,
        &[
            ("Civil Rights", scores.civilrights.as_str()),
            ("Economy", scores.economy.as_str()),
            ("Political Freedom", scores.politicalfreedom.as_str()),
            (TIMESTAMP_FIELD, timestamp),
        ],
    )?;

    let deaths = sheet(&mut tree, SHEET_DEATHS)?;
    for cause in &nation.deaths.causes {
        tree.insert_leaf(deaths, cause.kind.trim(), cause.value.trim())?;
    }
    tree.insert_leaf(deaths, TIMESTAMP_FIELD, timestamp)?;

    Ok(tree)
}

/// Nation names are lowercased with spaces as underscores
fn canonical_nation(raw: &str) -> std::result::Result<String, NsxError> {
    let name = raw.trim().to_lowercase().replace(' ', "_");
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(NsxError::InvalidOption {
            key: OPT_SOURCE_IDENTIFIER.to_string(),
            reason: format!("'{}' is not a valid nation name", raw),
        });
    }
    Ok(name)
}

#[derive(Debug, Clone)]
struct Settings {
    nation: String,
    api_base_url: String,
    user_agent: String,
    timeout: Duration,
}

/// Provider backed by the NationStates HTTP API
#[derive(Debug, Clone, Default)]
pub struct NationStatesProvider {
    settings: Option<Settings>,
}

impl NationStatesProvider {
    /// Request URL for the configured nation
    pub fn request_url(&self) -> Option<String> {
        self.settings.as_ref().map(|s| {
            format!(
                "{}?nation={}&q={}",
                s.api_base_url.trim_end_matches('?'),
                s.nation,
                SHARDS
            )
        })
    }

    fn fetch(&self, settings: &Settings) -> Result<String> {
        let url = self.request_url().unwrap_or_default();
        tracing::debug!(url = %url, "fetching nation");

        let client = reqwest::blocking::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()
            .map_err(|e| acquisition_error("http_client", e.to_string()))?;

        let response = client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                acquisition_error("fetch_nation", format!("Request for '{}' failed: {}", settings.nation, e))
            })?;

        response
            .text()
            .map_err(|e| acquisition_error("fetch_nation", e.to_string()))
    }
}

impl Configurable for NationStatesProvider {
    fn configure(&mut self, config: &Configuration) -> Result<()> {
        let nation = canonical_nation(config.require(OPT_SOURCE_IDENTIFIER)?)?;
        let timeout_secs = config
            .get_parsed::<u64>(OPT_REQUEST_TIMEOUT_SECS)?
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let user_agent = config
            .get(OPT_USER_AGENT)
            .map(str::to_string)
            .unwrap_or_else(|| format!("nsxlsx/{}", env!("CARGO_PKG_VERSION")));
        let api_base_url = config
            .get(OPT_API_BASE_URL)
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();

        self.settings = Some(Settings {
            nation,
            api_base_url,
            user_agent,
            timeout: Duration::from_secs(timeout_secs),
        });
        Ok(())
    }
}

impl Provider for NationStatesProvider {
    fn get(&self) -> Result<SnapshotTree> {
        let settings = self
            .settings
            .as_ref()
            .ok_or_else(|| not_configured(ProviderKind::NationStates))?;
        let xml = self.fetch(settings)?;
        parse_nation(&xml, &capture_timestamp())
    }
}
