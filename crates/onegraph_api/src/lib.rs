//! Transport-only OneGraph client primitives.
//!
//! This crate owns endpoint, header, request and response handling for the
//! OneGraph GraphQL API. It contains no session or document semantics and no
//! token acquisition.
//!
//! Two failure policies coexist:
//! - [`GraphqlTransport::execute`] folds every failure into the inline
//!   `errors` array of a [`GraphqlResponse`].
//! - [`HttpTransport::fetch_schema_json`] logs and degrades to `None`.

pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod operation;
pub mod retry;
pub mod schema;
pub mod transport;
pub mod url;

pub use client::HttpTransport;
pub use config::OneGraphConfig;
pub use error::{GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, OneGraphError};
pub use operation::{GraphqlRequest, GraphqlResponse, RoutingContext};
pub use retry::RetryPolicy;
pub use transport::GraphqlTransport;
pub use url::{graphql_endpoint, normalize_base_url, schema_endpoint};
