//! Newline-delimited JSON event intake

use herald_core::{Event, EventDispatcher};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

/// Counters for one intake run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct IntakeStats {
    pub dispatched: u64,
    pub skipped: u64,
}

/// Feed every event in `reader` to the dispatcher until EOF.
///
/// Lines that are not a JSON event, including ones that are not valid UTF-8,
/// are skipped and counted.
pub async fn pump_events<R>(
    mut reader: R,
    dispatcher: &EventDispatcher,
) -> herald_core::Result<IntakeStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut stats = IntakeStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        if buf.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<Event>(&buf) {
            Ok(event) => {
                dispatcher.dispatch(event).await?;
                stats.dispatched += 1;
            }
            Err(e) => {
                warn!("Skipping malformed event: {}", e);
                stats.skipped += 1;
            }
        }
    }

    debug!(
        "Event intake finished: {} dispatched, {} skipped",
        stats.dispatched, stats.skipped
    );
    Ok(stats)
}
