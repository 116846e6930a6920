//! HTTP service implementation for the coordinator.
//!
//! Every path and method lands in one handler, which maps the request to an
//! [`Operation`] and applies it. Unrecognised requests get a 500 with an
//! empty body.

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::Router;
use tokio::net::TcpListener;

use tilefarm_core::Operation;

use crate::state::CoordinatorState;

/// Build the router serving `/hello`, `/tile` and `/done`.
pub fn router(state: Arc<CoordinatorState>) -> Router {
    Router::new().fallback(handle_request).with_state(state)
}

async fn handle_request(
    State(state): State<Arc<CoordinatorState>>,
    uri: Uri,
) -> (StatusCode, String) {
    match Operation::from_request(uri.path(), uri.query()) {
        Ok(op) => {
            let reply = state.apply(op).await;
            (StatusCode::OK, reply.body())
        }
        Err(e) => {
            tracing::warn!("Rejecting request {}: {}", uri, e);
            (StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

/// Serve requests on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    state: Arc<CoordinatorState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
