//! SQLite persistence for the `predictive_insights` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::actions::{InsightQuery, InsightQueryResult};
use crate::framework::{ResourceStore, StoreError};
use crate::model::{yes_no, Insight};

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS predictive_insights (
    Insight_ID TEXT PRIMARY KEY,
    Campaign_Name TEXT NOT NULL,
    Spend REAL NOT NULL DEFAULT 0,
    Status TEXT NOT NULL DEFAULT 'Active',
    CPC REAL NOT NULL DEFAULT 0,
    Bidding_Strategy TEXT NOT NULL DEFAULT '',
    Conversions INTEGER NOT NULL DEFAULT 0,
    Revenue REAL NOT NULL DEFAULT 0,
    Profitable TEXT NOT NULL DEFAULT 'No',
    Recommendation TEXT NOT NULL DEFAULT ''
);
"#;

const SELECT_COLUMNS: &str =
    "Insight_ID, Campaign_Name, Spend, Status, CPC, Bidding_Strategy, Conversions, Revenue, Profitable, Recommendation";

const INSERT_SQL: &str = "INSERT INTO predictive_insights
    (Insight_ID, Campaign_Name, Spend, Status, CPC, Bidding_Strategy, Conversions, Revenue, Profitable, Recommendation)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";

/// Owns the connection used by the insight actor.
pub struct SqliteInsightStore {
    conn: Connection,
}

impl SqliteInsightStore {
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    fn row_to_insight(row: &Row<'_>) -> rusqlite::Result<Insight> {
        let status: String = row.get(3)?;
        let profitable: String = row.get(8)?;
        Ok(Insight {
            id: row.get(0)?,
            campaign_name: row.get(1)?,
            spend: row.get(2)?,
            status: status.parse().map_err(|e: String| {
                rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, e.into())
            })?,
            cpc: row.get(4)?,
            bidding_strategy: row.get(5)?,
            conversions: row.get(6)?,
            revenue: row.get(7)?,
            profitable: yes_no::parse(&profitable).unwrap_or(false),
            recommendation: row.get(9)?,
        })
    }

    fn bind(conn: &Connection, item: &Insight) -> rusqlite::Result<usize> {
        conn.prepare_cached(INSERT_SQL)?.execute(params![
            item.id,
            item.campaign_name,
            item.spend,
            item.status.to_string(),
            item.cpc,
            item.bidding_strategy,
            item.conversions,
            item.revenue,
            yes_no::as_str(item.profitable),
            item.recommendation,
        ])
    }

    fn all(&self) -> Result<Vec<Insight>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM predictive_insights ORDER BY Campaign_Name ASC");
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], Self::row_to_insight)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn replace_all(&mut self, items: &[Insight]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM predictive_insights", [])?;
        for item in items {
            Self::bind(&tx, item)?;
        }
        tx.commit()?;
        Ok(items.len())
    }
}

impl ResourceStore<Insight> for SqliteInsightStore {
    fn insert(&mut self, item: &Insight) -> Result<(), StoreError> {
        Self::bind(&self.conn, item)?;
        Ok(())
    }

    fn fetch(&self, id: &String) -> Result<Option<Insight>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM predictive_insights WHERE Insight_ID = ?1");
        let insight = self.conn.query_row(&sql, [id], Self::row_to_insight).optional()?;
        Ok(insight)
    }

    fn save(&mut self, item: &Insight) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE predictive_insights SET Campaign_Name = ?2, Spend = ?3, Status = ?4, CPC = ?5,
                Bidding_Strategy = ?6, Conversions = ?7, Revenue = ?8, Profitable = ?9, Recommendation = ?10
             WHERE Insight_ID = ?1",
            params![
                item.id,
                item.campaign_name,
                item.spend,
                item.status.to_string(),
                item.cpc,
                item.bidding_strategy,
                item.conversions,
                item.revenue,
                yes_no::as_str(item.profitable),
                item.recommendation,
            ],
        )?;
        Ok(())
    }

    fn remove(&mut self, id: &String) -> Result<bool, StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM predictive_insights WHERE Insight_ID = ?1", [id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM predictive_insights", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query(&mut self, query: InsightQuery) -> Result<InsightQueryResult, StoreError> {
        match query {
            InsightQuery::All => Ok(InsightQueryResult::All(self.all()?)),
            InsightQuery::ReplaceAll(items) => Ok(InsightQueryResult::ReplaceAll(self.replace_all(&items)?)),
        }
    }
}
