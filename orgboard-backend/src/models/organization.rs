use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use super::{cell_blob, cell_text, JsonBlob};
use crate::normalizer::Record;

/// Columns of the `organization` table, in sheet order
pub const ORGANIZATION_COLUMNS: &[&str] = &[
    "createdDate",
    "updatedDate",
    "deletedAt",
    "id",
    "orgName",
    "shopifyStoreId",
    "myShopifyDomain",
    "numBillingRetries",
    "numFailedCyclesBeforeCancel",
    "delayBetweenRetries",
    "logo",
    "billingTime",
    "billingTimezone",
    "initialSubscriptionImportComplete",
    "monthly_fee",
    "per_transaction_fee",
    "per_transaction_percentage_fee",
    "billing_start_date",
    "account",
    "alloyUserId",
    "activeWorkflows",
    "setup",
    "outOfStockBehavior",
    "cancellationMessage",
    "hasVisitedRetention",
    "rewardsPointMeaningId",
    "hasOTPEnabled",
    "instagramUserData",
    "lookerDashboardPrefix",
];

/// Parsed `setup` blob of an organization
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgSetup {
    /// Optimization settings; None when absent or not an object
    pub optimization: Option<Map<String, Value>>,
    /// Every other setup key, untouched
    pub other: Map<String, Value>,
}

impl OrgSetup {
    fn from_blob(blob: &JsonBlob) -> Option<OrgSetup> {
        let Value::Object(map) = blob.as_json()? else {
            return None;
        };
        let mut other = map.clone();
        let optimization = match other.remove("optimization") {
            Some(Value::Object(o)) => Some(o),
            _ => None,
        };
        Some(OrgSetup { optimization, other })
    }

    fn to_value(&self) -> Value {
        let mut map = self.other.clone();
        if let Some(optimization) = &self.optimization {
            map.insert("optimization".to_string(), Value::Object(optimization.clone()));
        }
        Value::Object(map)
    }
}

/// Tenant record mirrored from the organization sheet
#[derive(Debug, Clone)]
pub struct Organization {
    pub id: Option<String>,
    pub org_name: Option<String>,
    pub my_shopify_domain: Option<String>,
    pub created_date: Option<String>,
    pub setup: Option<OrgSetup>,
    pub account: Option<JsonBlob>,
    pub active_workflows: Option<JsonBlob>,
    pub instagram_user_data: Option<JsonBlob>,
    /// The record exactly as received from the sheet
    pub raw: Record,
}

impl Organization {
    pub fn from_record(record: Record) -> Self {
        Self {
            id: cell_text(&record, "id"),
            org_name: cell_text(&record, "orgName"),
            my_shopify_domain: cell_text(&record, "myShopifyDomain"),
            created_date: cell_text(&record, "createdDate"),
            setup: cell_blob(&record, "setup").as_ref().and_then(OrgSetup::from_blob),
            account: cell_blob(&record, "account"),
            active_workflows: cell_blob(&record, "activeWorkflows"),
            instagram_user_data: cell_blob(&record, "instagramUserData"),
            raw: record,
        }
    }

    /// Creation timestamp, if `createdDate` holds a recognisable date
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_date.as_deref().and_then(parse_timestamp)
    }

    /// The source record with every parsed blob column replaced by its JSON value
    pub fn expanded_record(&self) -> Record {
        let mut record = self.raw.clone();
        if let Some(setup) = &self.setup {
            record.insert("setup".to_string(), setup.to_value());
        }
        let blobs = [
            ("account", &self.account),
            ("activeWorkflows", &self.active_workflows),
            ("instagramUserData", &self.instagram_user_data),
        ];
        for (column, blob) in blobs {
            if let Some(JsonBlob::Json(value)) = blob {
                record.insert(column.to_string(), value.clone());
            }
        }
        record
    }
}

/// Parse the timestamp shapes the sheet produces. Zone-less values are UTC.
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    fn record(v: Value) -> Record {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_from_record_reads_typed_fields() {
        let org = Organization::from_record(record(json!({
            "id": 42,
            "orgName": "Acme",
            "myShopifyDomain": "acme.myshopify.com",
            "createdDate": "2023-01-20T04:07:20.185Z",
            "setup": "{\"optimization\":{\"enabled\":true},\"theme\":\"dark\"}"
        })));

        assert_eq!(org.id.as_deref(), Some("42"));
        assert_eq!(org.org_name.as_deref(), Some("Acme"));
        let setup = org.setup.unwrap();
        assert_eq!(setup.optimization.unwrap()["enabled"], json!(true));
        assert_eq!(setup.other["theme"], json!("dark"));
        assert_eq!(org.raw["id"], json!(42));
    }

    #[test]
    fn test_setup_without_optimization() {
        let org = Organization::from_record(record(json!({"setup": "{\"theme\":\"dark\"}"})));
        let setup = org.setup.unwrap();
        assert!(setup.optimization.is_none());

        let org = Organization::from_record(record(json!({"setup": "not json"})));
        assert!(org.setup.is_none());
    }

    #[test]
    fn test_expanded_record_decodes_blobs() {
        let org = Organization::from_record(record(json!({
            "id": "1",
            "account": "{\"owner\":\"jane\"}",
            "activeWorkflows": "[1,2]",
            "instagramUserData": "broken{",
            "setup": "{\"optimization\":{\"mode\":\"fast\"}}"
        })));

        let expanded = org.expanded_record();
        assert_eq!(expanded["account"], json!({"owner": "jane"}));
        assert_eq!(expanded["activeWorkflows"], json!([1, 2]));
        assert_eq!(expanded["instagramUserData"], json!("broken{"));
        assert_eq!(expanded["setup"], json!({"optimization": {"mode": "fast"}}));
        // column order is preserved
        let keys: Vec<&str> = expanded.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["id", "account", "activeWorkflows", "instagramUserData", "setup"]);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let dt = parse_timestamp("2023-01-20T04:07:20.185Z").unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day(), dt.hour()), (2023, 1, 20, 4));

        let dt = parse_timestamp("2023-01-20T23:30:00-02:00").unwrap();
        assert_eq!((dt.day(), dt.hour()), (21, 1));

        assert!(parse_timestamp("2023-01-20 04:07:20").is_some());
        assert!(parse_timestamp("2023-01-20T04:07:20.5").is_some());
        assert!(parse_timestamp("2023-01-20").is_some());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
