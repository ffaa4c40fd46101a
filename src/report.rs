//! # Decode Reports
//!
//! Batch decoding of a captured hex dump into a JSON report: every decoded
//! record plus the fueling aggregate. Also renders the plain-text fueling
//! summary shown on the console.

use crate::error::MepsanError;
use crate::protocol::classify::{decode_bytes, DecoderConfig};
use crate::protocol::record::FrameRecord;
use crate::session::aggregate::{aggregate_fueling, FuelingAggregator, FuelingReport, IncrementMode};
use crate::util::hex::parse_dump;
use log::info;
use serde::Serialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Full result of decoding one capture.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecodeReport {
    pub source_file: String,
    pub total_frames_decoded: usize,
    pub fueling_report: FuelingReport,
    pub all_frames: Vec<FrameRecord>,
}

impl DecodeReport {
    /// Build a report from already decoded records.
    pub fn from_records(
        source: impl Into<String>,
        records: Vec<FrameRecord>,
        config: &DecoderConfig,
        mode: IncrementMode,
    ) -> Self {
        let fueling_report = aggregate_fueling(&records, config.unit_price, mode);
        DecodeReport {
            source_file: source.into(),
            total_frames_decoded: records.len(),
            fueling_report,
            all_frames: records,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, MepsanError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the pretty JSON report to `path`.
    pub fn write_to(&self, path: &Path) -> Result<(), MepsanError> {
        std::fs::write(path, self.to_json_pretty()?)?;
        info!("wrote decode report to {}", path.display());
        Ok(())
    }
}

/// Decode the text of a capture (hex bytes, optionally after `DATA:` markers).
pub fn decode_dump(raw: &str, config: &DecoderConfig) -> Result<Vec<FrameRecord>, MepsanError> {
    let bytes = parse_dump(raw)?;
    Ok(decode_bytes(&bytes, config))
}

/// `logs.txt` becomes `logs_decoded.json`; other names get the suffix appended.
pub fn report_path_for(input: &Path) -> PathBuf {
    let name = input.to_string_lossy();
    match name.strip_suffix(".txt") {
        Some(stem) => PathBuf::from(format!("{stem}_decoded.json")),
        None => PathBuf::from(format!("{name}_decoded.json")),
    }
}

/// Plain-text fueling summary over plain fueling records.
pub fn render_summary(records: &[FrameRecord], unit_price: f64) -> String {
    let mut aggregator = FuelingAggregator::new(unit_price);
    records
        .iter()
        .filter(|r| matches!(r, FrameRecord::Fueling(_)))
        .for_each(|r| {
            aggregator.push(r);
        });

    if aggregator.updates().is_empty() {
        return "No fueling frames found in the log.\n".to_string();
    }

    let rule = "=".repeat(60);
    let mut out = String::new();
    let _ = writeln!(out, "{rule}\nFUELING SESSION REPORT - Real-time Updates\n{rule}\n");
    for u in aggregator.updates() {
        let _ = writeln!(
            out,
            "Update #{:3} | Pump {:02X} | {:6.2} L (+{:5.2} L) | {:6.2} SAR (+{:5.2} SAR) | Price: {:.2} SAR/L",
            u.update_number,
            u.pump,
            u.liters,
            u.liters_increment,
            u.money_sar,
            u.money_increment,
            u.unit_price
        );
    }

    let report = aggregator.finish();
    if let Some(total) = report.final_total {
        let _ = writeln!(
            out,
            "\n{rule}\nFINAL TOTAL: {:.2} Liters | {:.2} SAR\n{rule}",
            total.liters, total.money_sar
        );
    }
    out
}
