//! # Live Decoding Loop
//!
//! Drives a [`ByteSource`] through a [`StreamDecoder`] and a [`PumpMonitor`],
//! handing every fueling event to a callback. Processing is strictly
//! sequential: a chunk is fully decoded before the next one is read. To stop,
//! drop the future (for example from a `tokio::select!` on Ctrl-C).

use crate::error::MepsanError;
use crate::protocol::source::ByteSource;
use crate::protocol::stream::{StreamDecoder, StreamStats};
use crate::session::monitor::{FuelingEvent, PumpMonitor};
use log::{debug, info};

/// Run until the source is exhausted. Returns the decoder statistics.
pub async fn run_live<S, F>(
    source: &mut S,
    decoder: &mut StreamDecoder,
    monitor: &mut PumpMonitor,
    mut on_event: F,
) -> Result<StreamStats, MepsanError>
where
    S: ByteSource + ?Sized,
    F: FnMut(FuelingEvent) + Send,
{
    while let Some(chunk) = source.next_chunk().await? {
        if chunk.is_empty() {
            continue;
        }
        let records = decoder.ingest(&chunk);
        debug!("chunk of {} bytes produced {} records", chunk.len(), records.len());
        records
            .iter()
            .filter_map(|record| monitor.observe(record))
            .for_each(&mut on_event);
    }

    let stats = decoder.stats();
    info!(
        "source exhausted: {} frames, {} heartbeats, {} records",
        stats.frames, stats.heartbeats, stats.records
    );
    Ok(stats)
}
