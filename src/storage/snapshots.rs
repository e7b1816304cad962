//! Overview snapshot storage

use anyhow::Result;
use chrono::Utc;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::info;

use crate::types::ProtocolOverview;

#[derive(Serialize)]
struct SnapshotRecord<'a> {
    id: String,
    #[serde(flatten)]
    overview: &'a ProtocolOverview,
}

pub fn save_overview_snapshot(overview: &ProtocolOverview) -> Result<()> {
    let filename = format!("output/snapshots/stats_{}.jsonl",
        Utc::now().format("%Y-%m-%d"));

    let record = SnapshotRecord {
        id: uuid::Uuid::new_v4().to_string(),
        overview,
    };

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&filename)?;

    writeln!(file, "{}", serde_json::to_string(&record)?)?;

    info!(
        snapshot_id = %record.id,
        tvl = %overview.tvl_usd,
        pools = overview.pools.len(),
        "Saved overview snapshot"
    );

    Ok(())
}
