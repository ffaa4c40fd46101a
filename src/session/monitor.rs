//! # Live Pump Monitor
//!
//! Fueling-focused view of a live stream. The monitor owns one
//! [`FuelingSession`] per pump number; the caller owns the monitor, so several
//! independent monitors can run side by side.
//!
//! Only fueling records produce events. Plain fueling frames are reported when
//! a pump starts with a non-zero reading and afterwards only when the dispensed
//! liters grew; fueling-with-extra frames are always reported.

use crate::protocol::record::{FrameRecord, FuelingReading};
use chrono::{DateTime, Local};
use log::warn;
use std::collections::HashMap;
use std::fmt;

/// Last reading seen for a pump.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FuelingSession {
    pub last_liters: f64,
    pub last_money: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FuelingEventKind {
    Started,
    Update,
}

/// One line of the live display.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelingEvent {
    pub at: DateTime<Local>,
    /// Pump number (`address & 0x0F`).
    pub pump_number: u8,
    pub kind: FuelingEventKind,
    pub liters: f64,
    pub money_sar: f64,
    /// Increments since the pump's previous reading; zero for `Started`.
    pub liters_increment: f64,
    pub money_increment: f64,
    pub unit_price: f64,
}

impl fmt::Display for FuelingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let time = self.at.format("%H:%M:%S");
        match self.kind {
            FuelingEventKind::Started => {
                writeln!(f, "[{time}] Pump #{} - Fueling Started", self.pump_number)?;
                writeln!(f, "   Fuel Dispensed: {:.2} liters", self.liters)?;
                writeln!(f, "   Total Amount: {:.2} SAR", self.money_sar)?;
            }
            FuelingEventKind::Update => {
                writeln!(f, "[{time}] Pump #{} - Fueling Update", self.pump_number)?;
                writeln!(
                    f,
                    "   Fuel Dispensed: {:.2} liters (+{:.2} L)",
                    self.liters, self.liters_increment
                )?;
                writeln!(
                    f,
                    "   Total Amount: {:.2} SAR (+{:.2} SAR)",
                    self.money_sar, self.money_increment
                )?;
            }
        }
        write!(f, "   Unit Price: {:.2} SAR/L", self.unit_price)
    }
}

/// Per-pump session state for the live display.
#[derive(Debug, Default, Clone)]
pub struct PumpMonitor {
    sessions: HashMap<u8, FuelingSession>,
}

impl PumpMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one record; returns the event to display, if any.
    pub fn observe(&mut self, record: &FrameRecord) -> Option<FuelingEvent> {
        self.observe_at(record, Local::now())
    }

    /// As [`PumpMonitor::observe`], stamping the event with `at`.
    pub fn observe_at(&mut self, record: &FrameRecord, at: DateTime<Local>) -> Option<FuelingEvent> {
        let (pump_number, reading, always_report) = match record {
            FrameRecord::Fueling(r) => (r.pump_number(), &r.reading, false),
            FrameRecord::FuelingWithExtra(r) => match &r.reading {
                Some(reading) => (r.pump_number(), reading, true),
                None => {
                    warn!("pump {:#04x}: fueling frame with extra data did not decode: {}", r.pump, r.frame_hex);
                    return None;
                }
            },
            _ => return None,
        };

        let previous = self.sessions.insert(
            pump_number,
            FuelingSession {
                last_liters: reading.liters,
                last_money: reading.money_sar,
            },
        );

        let event = |kind, liters_increment, money_increment| FuelingEvent {
            at,
            pump_number,
            kind,
            liters: reading.liters,
            money_sar: reading.money_sar,
            liters_increment,
            money_increment,
            unit_price: reading.unit_price,
        };

        match previous {
            Some(prev) => {
                let liters_inc = reading.liters - prev.last_liters;
                let money_inc = reading.money_sar - prev.last_money;
                (always_report || liters_inc > 0.0)
                    .then(|| event(FuelingEventKind::Update, liters_inc, money_inc))
            }
            None => (always_report || has_volume(reading))
                .then(|| event(FuelingEventKind::Started, 0.0, 0.0)),
        }
    }

    pub fn session(&self, pump_number: u8) -> Option<&FuelingSession> {
        self.sessions.get(&pump_number)
    }

    pub fn sessions(&self) -> &HashMap<u8, FuelingSession> {
        &self.sessions
    }
}

fn has_volume(reading: &FuelingReading) -> bool {
    reading.liters > 0.0 || reading.money_sar > 0.0
}
