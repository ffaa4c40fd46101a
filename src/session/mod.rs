//! Fueling session tracking: batch aggregation for reports and the per-pump
//! live monitor.

pub mod aggregate;
pub mod monitor;

pub use aggregate::{
    aggregate_fueling, FinalTotal, FuelingAggregator, FuelingReport, FuelingUpdate, IncrementMode,
    ReportStatus,
};
pub use monitor::{FuelingEvent, FuelingEventKind, FuelingSession, PumpMonitor};
