//! Reports computed over the in-memory datasets

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Account, Organization};
use crate::normalizer::Record;
use crate::source::Dataset;

/// Placeholder shown when an organization has no account
const NO_ACCOUNT: &str = "NULL";

#[derive(Debug, Clone, PartialEq)]
pub enum ReportError {
    /// No organization has the requested domain
    NotFound(String),
    /// The organization exists but has no optimization settings
    MissingSetup(String),
    /// The dataset was never synced
    NotLoaded(Dataset),
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportError::NotFound(domain) => {
                write!(f, "No organization found with domain '{}'", domain)
            }
            ReportError::MissingSetup(domain) => {
                write!(f, "Organization '{}' has no optimization settings", domain)
            }
            ReportError::NotLoaded(dataset) => {
                write!(f, "The {} data has not been loaded", dataset)
            }
        }
    }
}

impl std::error::Error for ReportError {}

/// One line of the oldest-to-newest roster
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterRow {
    #[serde(rename = "ORG NAME")]
    pub org_name: Option<String>,
    #[serde(rename = "CREATED DATE")]
    pub created_date: String,
    #[serde(rename = "STATUS")]
    pub status: Option<String>,
    #[serde(rename = "PLAN NAME")]
    pub plan_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelledRow {
    #[serde(rename = "ORGANIZATION NAME")]
    pub org_name: Option<String>,
}

/// Optimization settings of the organization owning `domain`, keys upper-cased
pub fn optimization_by_domain(
    organizations: &[Organization],
    domain: &str,
) -> Result<Map<String, Value>, ReportError> {
    let org = organizations
        .iter()
        .find(|org| org.my_shopify_domain.as_deref() == Some(domain))
        .ok_or_else(|| ReportError::NotFound(domain.to_string()))?;

    let optimization = org
        .setup
        .as_ref()
        .and_then(|setup| setup.optimization.as_ref())
        .ok_or_else(|| ReportError::MissingSetup(domain.to_string()))?;

    Ok(optimization
        .iter()
        .map(|(key, value)| (key.to_uppercase(), value.clone()))
        .collect())
}

/// First organization named `name`
pub fn organization_by_name<'a>(
    organizations: &'a [Organization],
    name: &str,
) -> Option<&'a Organization> {
    organizations
        .iter()
        .find(|org| org.org_name.as_deref() == Some(name))
}

/// The record shown for a name lookup, optionally with blob columns decoded
pub fn organization_details(org: &Organization, expand: bool) -> Record {
    if expand {
        org.expanded_record()
    } else {
        org.raw.clone()
    }
}

/// Every organization with its first account, oldest first
pub fn chronological_roster(organizations: &[Organization], accounts: &[Account]) -> Vec<RosterRow> {
    let mut rows: Vec<(Option<DateTime<Utc>>, &Organization, Option<&Account>)> = organizations
        .iter()
        .map(|org| {
            let account = accounts.iter().find(|acc| acc.belongs_to(org.id.as_deref()));
            (org.created_at(), org, account)
        })
        .collect();

    // Stable; undated organizations go last in input order
    rows.sort_by_key(|(created_at, _, _)| (created_at.is_none(), *created_at));

    rows.into_iter()
        .map(|(created_at, org, account)| RosterRow {
            org_name: org.org_name.clone(),
            created_date: match created_at {
                Some(dt) => format_date(&dt),
                None => org.created_date.clone().unwrap_or_default(),
            },
            status: match account {
                Some(acc) => acc.status.clone(),
                None => Some(NO_ACCOUNT.to_string()),
            },
            plan_name: match account {
                Some(acc) => acc.plan_name.clone(),
                None => Some(NO_ACCOUNT.to_string()),
            },
        })
        .collect()
}

/// Organizations with at least one cancelled account, one row each
pub fn cancelled_roster(organizations: &[Organization], accounts: &[Account]) -> Vec<CancelledRow> {
    organizations
        .iter()
        .filter(|org| {
            accounts
                .iter()
                .any(|acc| acc.belongs_to(org.id.as_deref()) && acc.is_cancelled())
        })
        .map(|org| CancelledRow {
            org_name: org.org_name.clone(),
        })
        .collect()
}

/// DD/MM/YYYY in UTC
pub fn format_date(dt: &DateTime<Utc>) -> String {
    dt.format("%d/%m/%Y").to_string()
}
