//! Netlify CLI session client for OneGraph.
//!
//! [`SessionEventChannel`] polls and acknowledges the server-held event
//! queue of a CLI session and drives the session's liveness. Every call is
//! a single GraphQL round-trip; results carry server errors inline instead
//! of failing the future.

pub mod apps;
pub mod channel;
pub mod event;
pub mod heartbeat;
pub mod model;
pub mod operations;
pub mod persisted;
pub mod result;
mod session;

pub use apps::Apps;
pub use channel::{
    normalize_batch_size, ProcessOutcome, SessionEventChannel, DEFAULT_BATCH_SIZE,
};
pub use event::{describe_event, describe_kind, CliEvent, EventKind};
pub use heartbeat::{run_heartbeat_loop, CancellationSignal};
pub use model::{
    AckResult, App, NewPersistedQuery, PersistedQuery, Session, SessionCredentials, SessionStatus,
};
pub use persisted::PersistedQueries;
pub use result::{EventBatch, OperationResult};
