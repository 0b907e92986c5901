//! Bulk loading of campaign exports.
//!
//! The CSV is streamed record by record and inserted in chunks, one
//! transaction per chunk. Rows that fail to parse or validate are counted and
//! skipped; rows whose `Ad_ID` already exists are left untouched.

use std::io::Read;
use std::path::Path;

use csv::Trim;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::campaign_actor::CampaignError;
use crate::clients::{BulkInsertSummary, CampaignClient};
use crate::model::CampaignCreate;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("chunk size must be greater than zero")]
    ZeroChunkSize,
    #[error(transparent)]
    Campaign(#[from] CampaignError),
}

/// Running totals for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub rows_read: usize,
    pub inserted: usize,
    pub duplicates: usize,
    /// Rows that could not be parsed or failed validation.
    pub invalid: usize,
    pub chunks: usize,
}

impl LoadSummary {
    fn add_chunk(&mut self, chunk: BulkInsertSummary) {
        self.inserted += chunk.inserted;
        self.duplicates += chunk.duplicates;
        self.invalid += chunk.invalid;
        self.chunks += 1;
    }
}

pub async fn load_csv_file(
    path: &Path,
    client: &CampaignClient,
    chunk_size: usize,
) -> Result<LoadSummary, IngestError> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::Open {
        path: path.display().to_string(),
        source,
    })?;
    info!(path = %path.display(), chunk_size, "Loading CSV");
    load_csv(file, client, chunk_size).await
}

/// Loads every record of `reader`, whose first line holds the column headers.
pub async fn load_csv<R: Read>(
    reader: R,
    client: &CampaignClient,
    chunk_size: usize,
) -> Result<LoadSummary, IngestError> {
    if chunk_size == 0 {
        return Err(IngestError::ZeroChunkSize);
    }
    let mut csv = csv::ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);
    let headers = csv.headers()?.clone();

    let mut summary = LoadSummary::default();
    let mut chunk = Vec::with_capacity(chunk_size);
    let mut record = csv::StringRecord::new();

    while csv.read_record(&mut record)? {
        summary.rows_read += 1;
        match record.deserialize::<CampaignCreate>(Some(&headers)) {
            Ok(row) => chunk.push(row),
            Err(e) => {
                debug!(line = record.position().map(|p| p.line()), error = %e, "Unparseable row");
                summary.invalid += 1;
            }
        }
        if chunk.len() == chunk_size {
            summary.add_chunk(client.bulk_insert(std::mem::take(&mut chunk)).await?);
            debug!(rows_read = summary.rows_read, "Chunk committed");
        }
    }
    if !chunk.is_empty() {
        summary.add_chunk(client.bulk_insert(chunk).await?);
    }

    if summary.invalid > 0 {
        warn!(invalid = summary.invalid, "Skipped invalid rows");
    }
    info!(
        rows_read = summary.rows_read,
        inserted = summary.inserted,
        duplicates = summary.duplicates,
        chunks = summary.chunks,
        "CSV load finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::DashboardSystem;

    const EXPORT: &str = "\
Ad_ID,Campaign_Name,Clicks,Impressions,Cost,Leads,Conversions,Conversion Rate,Sale_Amount,Ad_Date,Location,Device,Keyword
A1000,Data Analytics Course,104,4498,$231.88,14,7,0.058,\"$1,892.00\",2024-11-16,hyderabad,desktop,learn data analytics
A1001,Data Analytics Course,173,5107,$216.84,10,8,0.046,\"$1,679.00\",20-11-2024,hyderabad,mobile,data analytics online
A1002,Data Analytics Course,90,4544,$203.66,26,9,0.1,$0,2024/11/16,hyderabad,Desktop,data analitics online
A1003,,not-a-number,3185,$237.66,17,6,,,2024-11-18,HYDERABAD,tablet,data anaytics training
A1000,Duplicate Row,1,1,1,1,1,1,1,2024-11-16,hyderabad,desktop,dup
";

    #[tokio::test]
    async fn test_load_counts_inserted_duplicates_and_invalid() {
        let system = DashboardSystem::in_memory().unwrap();
        let summary = load_csv(EXPORT.as_bytes(), &system.campaign_client, 2).await.unwrap();

        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.inserted, 3);
        assert_eq!(summary.duplicates, 1);
        assert_eq!(summary.invalid, 1);
        assert_eq!(summary.chunks, 2);

        let totals = system.campaign_client.totals().await.unwrap();
        assert_eq!(totals.rows, 3);
        assert_eq!(totals.clicks, 104 + 173 + 90);
        assert!((totals.sale_amount - 3571.0).abs() < 1e-9);
        system.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_zero_chunk_size_is_rejected() {
        let system = DashboardSystem::in_memory().unwrap();
        let err = load_csv(EXPORT.as_bytes(), &system.campaign_client, 0).await.unwrap_err();
        assert!(matches!(err, IngestError::ZeroChunkSize));
        system.shutdown().await.unwrap();
    }
}
