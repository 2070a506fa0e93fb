use super::cell_text;
use crate::normalizer::Record;

/// Columns of the `account` table, in sheet order
pub const ACCOUNT_COLUMNS: &[&str] = &[
    "createdDate",
    "updatedDate",
    "deletedAt",
    "id",
    "shopifyId",
    "uniqueShopifyId",
    "receivedFromShopifyDate",
    "shopifyUpdateDate",
    "planName",
    "status",
    "approvedAt",
    "trialDays",
    "usageLineItemShopifyId",
    "planFee",
    "transactionFee",
    "percentageFee",
    "organizationId",
    "features",
    "confirmationUrl",
    "trialPeriodStart",
    "trialPeriodEnd",
    "reportUsageAt",
];

/// Status value of a cancelled plan
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// Subscription plan record mirrored from the account sheet. Only the
/// columns the in-memory reports read are kept; `features` is queried in SQL.
#[derive(Debug, Clone)]
pub struct Account {
    pub organization_id: Option<String>,
    pub status: Option<String>,
    pub plan_name: Option<String>,
}

impl Account {
    pub fn from_record(record: Record) -> Self {
        Self {
            organization_id: cell_text(&record, "organizationId"),
            status: cell_text(&record, "status"),
            plan_name: cell_text(&record, "planName"),
        }
    }

    pub fn belongs_to(&self, organization_id: Option<&str>) -> bool {
        match (self.organization_id.as_deref(), organization_id) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.status.as_deref() == Some(STATUS_CANCELLED)
    }
}
