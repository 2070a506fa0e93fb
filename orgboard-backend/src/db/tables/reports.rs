//! SQL report queries over the mirrored tables

use rusqlite::Result as SqliteResult;

use super::super::Database;

impl Database {
    /// Organizations with no account row referencing them
    pub fn count_orgs_without_accounts(&self) -> SqliteResult<i64> {
        let conn = self.lock();
        conn.query_row(
            "SELECT COUNT(org.orgName) FROM organization org
             LEFT JOIN account acc ON acc.organizationId = org.id
             WHERE acc.organizationId IS NULL",
            [],
            |row| row.get(0),
        )
    }

    /// Organizations referenced by more than one account row
    pub fn count_orgs_with_multiple_accounts(&self) -> SqliteResult<i64> {
        let conn = self.lock();
        conn.query_row(
            "SELECT COUNT(org.orgName) FROM organization org
             INNER JOIN (
                 SELECT organizationId FROM account
                 GROUP BY organizationId HAVING COUNT(organizationId) > 1
             ) acc ON org.id = acc.organizationId",
            [],
            |row| row.get(0),
        )
    }

    /// Names of organizations referenced by exactly one account row
    pub fn orgs_with_single_account(&self) -> SqliteResult<Vec<Option<String>>> {
        self.query_org_names(
            "SELECT org.orgName FROM organization org
             INNER JOIN (
                 SELECT organizationId FROM account
                 GROUP BY organizationId HAVING COUNT(organizationId) = 1
             ) acc ON org.id = acc.organizationId",
        )
    }

    /// Names of organizations with an account whose PASSWORDLESS feature is on.
    /// Accounts whose `features` is not valid JSON are skipped.
    pub fn passwordless_orgs(&self) -> SqliteResult<Vec<Option<String>>> {
        self.query_org_names(
            "SELECT org.orgName FROM organization org
             INNER JOIN account acc ON org.id = acc.organizationId
             WHERE CASE WHEN json_valid(acc.features)
                   THEN json_extract(acc.features, '$.PASSWORDLESS') END = 1",
        )
    }

    fn query_org_names(&self, sql: &str) -> SqliteResult<Vec<Option<String>>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(sql)?;
        let names = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(names)
    }
}
