use std::sync::Arc;

use async_trait::async_trait;

use crate::operation::{GraphqlRequest, GraphqlResponse};

/// Executes one GraphQL operation and returns `{data, errors}`.
///
/// Implementations never fail out-of-band: transport, status and decoding
/// failures are reported as entries in [`GraphqlResponse::errors`].
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    async fn execute(&self, request: GraphqlRequest) -> GraphqlResponse;
}

#[async_trait]
impl<T> GraphqlTransport for Arc<T>
where
    T: GraphqlTransport + ?Sized,
{
    async fn execute(&self, request: GraphqlRequest) -> GraphqlResponse {
        (**self).execute(request).await
    }
}
