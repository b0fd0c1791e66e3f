//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? Failure → restart. |
//! | **Readiness** | `/readyz` | Can the customer store be reached? Failure → pulled from load-balancer. |

use tracing::warn;

use crate::routes::AppState;
use crate::{Request, Response, Status};

/// Always returns `200 OK` with body `"ok"`. No dependencies.
pub async fn liveness(_req: Request, _state: AppState) -> Response {
    Response::text("ok")
}

/// `200 OK` with body `"ready"` when the store answers a ping, otherwise
/// `503 Service Unavailable`.
pub async fn readiness(_req: Request, state: AppState) -> Response {
    match state.store().ping().await {
        Ok(()) => Response::text("ready"),
        Err(e) => {
            warn!(error = %e, "readiness check failed");
            Response::error(Status::ServiceUnavailable, "Customer store unavailable")
        }
    }
}
