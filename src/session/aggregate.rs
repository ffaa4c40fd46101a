//! # Fueling Aggregation
//!
//! Turns an ordered list of fueling records into per-update increments and
//! session totals. Fueling frames report cumulative values, so an increment is
//! the current value minus the previous one.
//!
//! By default the previous value is a single running value shared by every pump
//! ([`IncrementMode::Global`]). With two pumps interleaving this produces
//! negative or meaningless increments; that is how the existing reports behave
//! and it is kept as the default. [`IncrementMode::PerPump`] keys the previous
//! value on the pump number instead.

use crate::constants::PUMP_NUMBER_MASK;
use crate::protocol::fields::round_to;
use crate::protocol::record::FrameRecord;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::HashMap;

/// How the previous cumulative value is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IncrementMode {
    /// One running previous value across all pumps.
    #[default]
    Global,
    /// Previous value per pump number (`address & 0x0F`).
    PerPump,
}

fn pump_label<S: Serializer>(pump: &u8, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{:02X}", pump))
}

/// One fueling record with its increments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FuelingUpdate {
    /// 1-based position among fueling records.
    pub update_number: usize,
    #[serde(serialize_with = "pump_label")]
    pub pump: u8,
    pub liters: f64,
    pub liters_increment: f64,
    pub money_sar: f64,
    pub money_increment: f64,
    pub unit_price: f64,
    pub frame_hex: String,
    pub liters_hex: String,
    pub money_hex: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinalTotal {
    pub liters: f64,
    pub money_sar: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Success,
    NoFuelingData,
}

/// Aggregate over all fueling records of a run.
///
/// A report without fueling data serializes as
/// `{"status": "no_fueling_data", "total_frames": 0, "fueling_updates": []}`.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelingReport {
    pub status: ReportStatus,
    pub total_updates: usize,
    pub unit_price_sar_per_liter: f64,
    pub final_total: Option<FinalTotal>,
    pub fueling_updates: Vec<FuelingUpdate>,
}

impl Serialize for FuelingReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.final_total {
            Some(total) => {
                let mut state = serializer.serialize_struct("FuelingReport", 5)?;
                state.serialize_field("status", &self.status)?;
                state.serialize_field("total_updates", &self.total_updates)?;
                state.serialize_field("unit_price_sar_per_liter", &self.unit_price_sar_per_liter)?;
                state.serialize_field("final_total", total)?;
                state.serialize_field("fueling_updates", &self.fueling_updates)?;
                state.end()
            }
            None => {
                let mut state = serializer.serialize_struct("FuelingReport", 3)?;
                state.serialize_field("status", &self.status)?;
                state.serialize_field("total_frames", &0usize)?;
                state.serialize_field("fueling_updates", &self.fueling_updates)?;
                state.end()
            }
        }
    }
}

/// Incremental aggregator; feed records in stream order.
#[derive(Debug, Clone)]
pub struct FuelingAggregator {
    mode: IncrementMode,
    unit_price: f64,
    previous: (f64, f64),
    per_pump: HashMap<u8, (f64, f64)>,
    updates: Vec<FuelingUpdate>,
}

impl FuelingAggregator {
    pub fn new(unit_price: f64) -> Self {
        Self::with_mode(unit_price, IncrementMode::Global)
    }

    pub fn with_mode(unit_price: f64, mode: IncrementMode) -> Self {
        FuelingAggregator {
            mode,
            unit_price,
            previous: (0.0, 0.0),
            per_pump: HashMap::new(),
            updates: Vec::new(),
        }
    }

    /// Record one frame. Non-fueling records are ignored and return `None`.
    ///
    /// A fueling-with-extra record whose embedded frame did not decode counts
    /// as zero liters and zero money.
    pub fn push(&mut self, record: &FrameRecord) -> Option<&FuelingUpdate> {
        let (pump, frame_hex) = match record {
            FrameRecord::Fueling(r) => (r.pump, r.frame_hex.clone()),
            FrameRecord::FuelingWithExtra(r) => (r.pump, r.frame_hex.clone()),
            _ => return None,
        };
        let reading = record.fueling_reading();
        let liters = reading.map_or(0.0, |r| r.liters);
        let money = reading.map_or(0.0, |r| r.money_sar);

        let previous = match self.mode {
            IncrementMode::Global => &mut self.previous,
            IncrementMode::PerPump => self
                .per_pump
                .entry(pump & PUMP_NUMBER_MASK)
                .or_insert((0.0, 0.0)),
        };
        let (prev_liters, prev_money) = *previous;
        *previous = (liters, money);

        self.updates.push(FuelingUpdate {
            update_number: self.updates.len() + 1,
            pump,
            liters: round_to(liters, 2),
            liters_increment: round_to(liters - prev_liters, 2),
            money_sar: round_to(money, 2),
            money_increment: round_to(money - prev_money, 2),
            unit_price: reading.map_or(0.0, |r| r.unit_price),
            frame_hex,
            liters_hex: reading.map(|r| r.liters_hex.clone()).unwrap_or_default(),
            money_hex: reading.map(|r| r.money_hex.clone()).unwrap_or_default(),
        });
        self.updates.last()
    }

    pub fn updates(&self) -> &[FuelingUpdate] {
        &self.updates
    }

    pub fn finish(self) -> FuelingReport {
        let final_total = self.updates.last().map(|last| FinalTotal {
            liters: last.liters,
            money_sar: last.money_sar,
        });
        let status = if self.updates.is_empty() {
            ReportStatus::NoFuelingData
        } else {
            ReportStatus::Success
        };

        FuelingReport {
            status,
            total_updates: self.updates.len(),
            unit_price_sar_per_liter: self.unit_price,
            final_total,
            fueling_updates: self.updates,
        }
    }
}

/// Build a report from all records of a run.
pub fn aggregate_fueling(records: &[FrameRecord], unit_price: f64, mode: IncrementMode) -> FuelingReport {
    let mut aggregator = FuelingAggregator::with_mode(unit_price, mode);
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}
