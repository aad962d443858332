use std::sync::Arc;
use tracing::{debug, warn};

use super::{DispatchError, RetryPolicy};
use crate::metrics;
use crate::model::{MatrixRequest, MatrixResponse};
use crate::pool::{EvictionReason, WorkerPool};
use crate::upstream::{TransportError, WorkerClient};

/// Routes computations to the least loaded worker.
pub struct Dispatcher {
    pool: Arc<WorkerPool>,
    client: Arc<dyn WorkerClient>,
    policy: RetryPolicy,
}

impl Dispatcher {
    pub fn new(pool: Arc<WorkerPool>, client: Arc<dyn WorkerClient>, policy: RetryPolicy) -> Self {
        Self {
            pool,
            client,
            policy,
        }
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Runs one request to completion.
    ///
    /// A worker answer, including one carrying an application error, is
    /// returned as is. A transport failure evicts the worker and starts over
    /// from selection until the attempt budget runs out.
    pub async fn dispatch(&self, req: &MatrixRequest) -> Result<MatrixResponse, DispatchError> {
        let mut last_error: Option<TransportError> = None;
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;

            let reservation = match self.pool.select_and_reserve() {
                Ok(reservation) => reservation,
                Err(_) => return Err(self.fail(attempt - 1, last_error)),
            };
            let address = reservation.address().to_string();

            debug!(
                component = "dispatch",
                event = "worker_selected",
                worker = %address,
                operation = %req.operation,
                attempt = attempt,
                "dispatching computation"
            );

            let outcome = self.client.compute(&address, req).await;
            // RELEASE happens here on every path.
            drop(reservation);

            match outcome {
                Ok(resp) => {
                    self.pool.touch(&address);
                    metrics::inc_dispatched();
                    return Ok(resp);
                }
                Err(err) => {
                    warn!(
                        component = "dispatch",
                        event = "worker_call_failed",
                        worker = %address,
                        attempt = attempt,
                        dial = err.is_dial(),
                        error = %err,
                        "worker call failed, evicting"
                    );
                    self.pool.evict(&address, EvictionReason::Unreachable);
                    last_error = Some(err);

                    if !self.policy.allows_retry_after(attempt) {
                        return Err(self.fail(attempt, last_error));
                    }
                    metrics::inc_retries();
                }
            }
        }
    }

    fn fail(&self, attempts: u32, last_error: Option<TransportError>) -> DispatchError {
        let err = match last_error {
            Some(last_error) => DispatchError::WorkerUnavailable {
                attempts,
                last_error,
            },
            None => DispatchError::NoWorkersAvailable,
        };
        metrics::inc_dispatch_failures(err.reason());
        warn!(
            component = "dispatch",
            event = "dispatch_failed",
            reason = err.reason(),
            error = %err,
            "computation could not be placed"
        );
        err
    }
}
