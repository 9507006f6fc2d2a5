use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

use crate::channel::SessionEventChannel;
use crate::result::OperationResult;

/// Shared flag that stops [`run_heartbeat_loop`] once set.
pub type CancellationSignal = Arc<AtomicBool>;

const CANCEL_POLL: Duration = Duration::from_millis(25);

/// Send a heartbeat immediately and then once per `interval` until `cancel`
/// is set. Failed heartbeats are logged and do not stop the loop.
///
/// Returns the number of heartbeats sent, successful or not.
pub async fn run_heartbeat_loop(
    channel: &SessionEventChannel,
    session_id: &str,
    interval: Duration,
    cancel: CancellationSignal,
) -> usize {
    let mut sent = 0usize;
    while !cancel.load(Ordering::SeqCst) {
        match channel.heartbeat(session_id).await {
            OperationResult::Success(session) => {
                debug!(session_id, status = session.status.as_str(), "heartbeat sent");
            }
            OperationResult::Empty => {
                warn!(session_id, "heartbeat returned no session");
            }
            OperationResult::Failure(errors) => {
                let message = errors.first().map(ToString::to_string).unwrap_or_default();
                warn!(session_id, "heartbeat failed: {message}");
            }
        }
        sent += 1;

        let deadline = Instant::now() + interval;
        while Instant::now() < deadline {
            if cancel.load(Ordering::SeqCst) {
                return sent;
            }
            sleep(CANCEL_POLL.min(deadline - Instant::now())).await;
        }
    }
    sent
}
