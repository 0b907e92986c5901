//! SQLite persistence for the `campaigns` table.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use super::queries::{CampaignQuery, CampaignQueryResult, CampaignTotals, DailyTotals, GroupTotals};
use crate::db;
use crate::framework::{ResourceStore, StoreError};
use crate::model::Campaign;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    Ad_ID TEXT PRIMARY KEY,
    Campaign_Name TEXT NOT NULL DEFAULT 'Unknown',
    Platform TEXT NOT NULL DEFAULT '',
    Device TEXT NOT NULL DEFAULT '',
    Keyword TEXT NOT NULL DEFAULT '',
    Location TEXT NOT NULL DEFAULT '',
    Ad_Date TEXT,
    Cost REAL NOT NULL DEFAULT 0,
    Sale_Amount REAL NOT NULL DEFAULT 0,
    Impressions INTEGER NOT NULL DEFAULT 0,
    Clicks INTEGER NOT NULL DEFAULT 0,
    Conversions INTEGER NOT NULL DEFAULT 0,
    Leads INTEGER NOT NULL DEFAULT 0,
    "Conversion Rate" REAL NOT NULL DEFAULT 0,
    Budget_Distribution TEXT
);
CREATE INDEX IF NOT EXISTS idx_campaigns_name ON campaigns (Campaign_Name);
CREATE INDEX IF NOT EXISTS idx_campaigns_date ON campaigns (Ad_Date);
"#;

const SELECT_COLUMNS: &str = r#"Ad_ID, Campaign_Name, Platform, Device, Keyword, Location, Ad_Date,
    Cost, Sale_Amount, Impressions, Clicks, Conversions, Leads, "Conversion Rate", Budget_Distribution"#;

const INSERT_SQL: &str = r#"INSERT INTO campaigns (Ad_ID, Campaign_Name, Platform, Device, Keyword, Location, Ad_Date,
    Cost, Sale_Amount, Impressions, Clicks, Conversions, Leads, "Conversion Rate", Budget_Distribution)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#;

const INSERT_OR_IGNORE_SQL: &str = r#"INSERT OR IGNORE INTO campaigns (Ad_ID, Campaign_Name, Platform, Device, Keyword, Location, Ad_Date,
    Cost, Sale_Amount, Impressions, Clicks, Conversions, Leads, "Conversion Rate", Budget_Distribution)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)"#;

/// Grouping column for [`SqliteCampaignStore::group_totals`]. Blank values fall into `Unknown`.
#[derive(Debug, Clone, Copy)]
enum GroupBy {
    CampaignName,
    Device,
    Platform,
}

impl GroupBy {
    fn key_expr(self) -> &'static str {
        match self {
            GroupBy::CampaignName => "COALESCE(NULLIF(TRIM(Campaign_Name), ''), 'Unknown')",
            GroupBy::Device => "COALESCE(NULLIF(TRIM(Device), ''), 'Unknown')",
            GroupBy::Platform => "COALESCE(NULLIF(TRIM(Platform), ''), 'Unknown')",
        }
    }

    fn order_expr(self) -> &'static str {
        match self {
            GroupBy::CampaignName | GroupBy::Platform => "SUM(Sale_Amount) DESC, key ASC",
            GroupBy::Device => "SUM(Impressions) DESC, key ASC",
        }
    }
}

/// Owns the connection used by the campaign actor.
pub struct SqliteCampaignStore {
    conn: Connection,
}

impl SqliteCampaignStore {
    /// Wraps a connection, creating the table and applying migrations.
    pub fn new(conn: Connection) -> Result<Self, StoreError> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA_SQL)?;
        self.run_migrations()
    }

    /// Brings tables created by older loaders up to the current column set.
    fn run_migrations(&self) -> Result<(), StoreError> {
        let columns = db::table_columns(&self.conn, "campaigns")?;
        if !columns.iter().any(|c| c == "Budget_Distribution") {
            self.conn
                .execute("ALTER TABLE campaigns ADD COLUMN Budget_Distribution TEXT", [])?;
            info!("Added Budget_Distribution column to campaigns table");
        }
        Ok(())
    }

    fn row_to_campaign(row: &Row<'_>) -> rusqlite::Result<Campaign> {
        Ok(Campaign {
            ad_id: row.get(0)?,
            campaign_name: row.get(1)?,
            platform: row.get(2)?,
            device: row.get(3)?,
            keyword: row.get(4)?,
            location: row.get(5)?,
            ad_date: row.get::<_, Option<NaiveDate>>(6)?,
            cost: row.get(7)?,
            sale_amount: row.get(8)?,
            impressions: row.get(9)?,
            clicks: row.get(10)?,
            conversions: row.get(11)?,
            leads: row.get(12)?,
            conversion_rate: row.get(13)?,
            budget_distribution: row.get(14)?,
        })
    }

    fn bind(conn: &Connection, sql: &str, item: &Campaign) -> rusqlite::Result<usize> {
        conn.prepare_cached(sql)?.execute(params![
            item.ad_id,
            item.campaign_name,
            item.platform,
            item.device,
            item.keyword,
            item.location,
            item.ad_date,
            item.cost,
            item.sale_amount,
            item.impressions,
            item.clicks,
            item.conversions,
            item.leads,
            item.conversion_rate,
            item.budget_distribution,
        ])
    }

    fn totals(&self) -> Result<CampaignTotals, StoreError> {
        let totals = self.conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT Campaign_Name),
                    COALESCE(SUM(Cost), 0.0), COALESCE(SUM(Sale_Amount), 0.0),
                    COALESCE(SUM(Impressions), 0), COALESCE(SUM(Clicks), 0),
                    COALESCE(SUM(Conversions), 0), COALESCE(SUM(Leads), 0)
             FROM campaigns",
            [],
            |row| {
                Ok(CampaignTotals {
                    rows: row.get(0)?,
                    campaigns: row.get(1)?,
                    cost: row.get(2)?,
                    sale_amount: row.get(3)?,
                    impressions: row.get(4)?,
                    clicks: row.get(5)?,
                    conversions: row.get(6)?,
                    leads: row.get(7)?,
                })
            },
        )?;
        Ok(totals)
    }

    fn group_totals(&self, group: GroupBy, limit: Option<usize>) -> Result<Vec<GroupTotals>, StoreError> {
        let sql = format!(
            "SELECT {key} AS key, COUNT(*),
                    COALESCE(SUM(Cost), 0.0), COALESCE(SUM(Sale_Amount), 0.0),
                    COALESCE(SUM(Impressions), 0), COALESCE(SUM(Clicks), 0),
                    COALESCE(SUM(Conversions), 0)
             FROM campaigns
             GROUP BY key
             ORDER BY {order}
             LIMIT ?1",
            key = group.key_expr(),
            order = group.order_expr(),
        );
        // SQLite treats a negative LIMIT as "no limit"
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([limit], |row| {
                Ok(GroupTotals {
                    key: row.get(0)?,
                    rows: row.get(1)?,
                    cost: row.get(2)?,
                    sale_amount: row.get(3)?,
                    impressions: row.get(4)?,
                    clicks: row.get(5)?,
                    conversions: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn daily_totals(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<DailyTotals>, StoreError> {
        if from > to {
            return Err(StoreError::InvalidQuery(format!("empty date range {from}..={to}")));
        }
        let mut stmt = self.conn.prepare(
            "SELECT Ad_Date, COALESCE(SUM(Impressions), 0), COALESCE(SUM(Clicks), 0), COALESCE(SUM(Conversions), 0)
             FROM campaigns
             WHERE Ad_Date BETWEEN ?1 AND ?2
             GROUP BY Ad_Date
             ORDER BY Ad_Date ASC",
        )?;
        let rows = stmt
            .query_map(params![from, to], |row| {
                Ok(DailyTotals {
                    date: row.get(0)?,
                    impressions: row.get(1)?,
                    clicks: row.get(2)?,
                    conversions: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn latest_by_name(&self, name: &str) -> Result<Option<Campaign>, StoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM campaigns
             WHERE Campaign_Name = ?1
             ORDER BY Ad_Date IS NULL, Ad_Date DESC, rowid DESC
             LIMIT 1"
        );
        let campaign = self
            .conn
            .query_row(&sql, [name], Self::row_to_campaign)
            .optional()?;
        Ok(campaign)
    }

    fn sample_ids(&self, limit: usize) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT Ad_ID FROM campaigns ORDER BY RANDOM() LIMIT ?1")?;
        let ids = stmt
            .query_map([limit as i64], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    fn bulk_insert(&mut self, items: &[Campaign]) -> Result<usize, StoreError> {
        let tx = self.conn.transaction()?;
        let mut inserted = 0;
        for item in items {
            inserted += Self::bind(&tx, INSERT_OR_IGNORE_SQL, item)?;
        }
        tx.commit()?;
        Ok(inserted)
    }
}

impl ResourceStore<Campaign> for SqliteCampaignStore {
    fn insert(&mut self, item: &Campaign) -> Result<(), StoreError> {
        Self::bind(&self.conn, INSERT_SQL, item).map_err(|e| match StoreError::from(e) {
            StoreError::Duplicate(_) => StoreError::Duplicate(item.ad_id.clone()),
            other => other,
        })?;
        Ok(())
    }

    fn fetch(&self, id: &String) -> Result<Option<Campaign>, StoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM campaigns WHERE Ad_ID = ?1");
        let campaign = self
            .conn
            .query_row(&sql, [id], Self::row_to_campaign)
            .optional()?;
        Ok(campaign)
    }

    fn save(&mut self, item: &Campaign) -> Result<(), StoreError> {
        self.conn.execute(
            r#"UPDATE campaigns SET Campaign_Name = ?2, Platform = ?3, Device = ?4, Keyword = ?5,
                Location = ?6, Ad_Date = ?7, Cost = ?8, Sale_Amount = ?9, Impressions = ?10,
                Clicks = ?11, Conversions = ?12, Leads = ?13, "Conversion Rate" = ?14,
                Budget_Distribution = ?15
               WHERE Ad_ID = ?1"#,
            params![
                item.ad_id,
                item.campaign_name,
                item.platform,
                item.device,
                item.keyword,
                item.location,
                item.ad_date,
                item.cost,
                item.sale_amount,
                item.impressions,
                item.clicks,
                item.conversions,
                item.leads,
                item.conversion_rate,
                item.budget_distribution,
            ],
        )?;
        Ok(())
    }

    fn remove(&mut self, id: &String) -> Result<bool, StoreError> {
        let changed = self.conn.execute("DELETE FROM campaigns WHERE Ad_ID = ?1", [id])?;
        Ok(changed > 0)
    }

    fn count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM campaigns", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn query(&mut self, query: CampaignQuery) -> Result<CampaignQueryResult, StoreError> {
        let result = match query {
            CampaignQuery::Totals => CampaignQueryResult::Totals(self.totals()?),
            CampaignQuery::PerCampaign { limit } => {
                CampaignQueryResult::PerCampaign(self.group_totals(GroupBy::CampaignName, limit)?)
            }
            CampaignQuery::ByDevice => CampaignQueryResult::ByDevice(self.group_totals(GroupBy::Device, None)?),
            CampaignQuery::ByPlatform => {
                CampaignQueryResult::ByPlatform(self.group_totals(GroupBy::Platform, None)?)
            }
            CampaignQuery::DailyTotals { from, to } => CampaignQueryResult::DailyTotals(self.daily_totals(from, to)?),
            CampaignQuery::LatestByName(name) => CampaignQueryResult::LatestByName(self.latest_by_name(&name)?),
            CampaignQuery::SampleIds { limit } => CampaignQueryResult::SampleIds(self.sample_ids(limit)?),
            CampaignQuery::BulkInsert(items) => CampaignQueryResult::BulkInsert(self.bulk_insert(&items)?),
        };
        Ok(result)
    }
}
