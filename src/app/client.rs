// Demo client: fires the reference computations at the coordinator.

use futures::future::join_all;
use tracing::{info, warn};

use crate::config::{Config, ConfigTrait};
use crate::http::client::create_client;
use crate::model::{Matrix, MatrixRequest};
use crate::upstream::CoordinatorClient;

/// Result of one submitted computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub operation: String,
    pub result: Result<Matrix, String>,
}

pub struct ClientApp {
    coordinator: CoordinatorClient,
    rounds: usize,
}

impl ClientApp {
    pub fn new(cfg: &Config) -> Self {
        let c = cfg.client();
        Self {
            coordinator: CoordinatorClient::new(create_client(), c.coordinator.clone(), c.timeout),
            rounds: c.rounds,
        }
    }

    /// Add, multiply and transpose over the fixed sample grids.
    pub fn reference_requests() -> Vec<MatrixRequest> {
        let a = Matrix::from_rows(vec![vec![2, 2], vec![3, 4]]);
        let b = Matrix::from_rows(vec![vec![4, 6], vec![1, 2]]);
        let c = Matrix::from_rows(vec![vec![2, 3, 5], vec![1, 4, 6]]);
        vec![
            MatrixRequest::add(a.clone(), b.clone()),
            MatrixRequest::multiply(a, b),
            MatrixRequest::transpose(c),
        ]
    }

    /// Sends every reference request `rounds` times, all concurrently, and
    /// returns outcomes in submission order.
    pub async fn run(&self) -> Vec<Outcome> {
        let requests: Vec<MatrixRequest> = (0..self.rounds)
            .flat_map(|_| Self::reference_requests())
            .collect();

        info!(
            component = "client",
            event = "submitting",
            coordinator = self.coordinator.address(),
            requests = requests.len(),
            "submitting computations"
        );

        join_all(requests.iter().map(|req| async move {
            let result = match self.coordinator.compute(req).await {
                Ok(resp) => resp.into_result(),
                Err(e) => Err(e.to_string()),
            };
            if let Err(ref e) = result {
                warn!(
                    component = "client",
                    event = "computation_failed",
                    operation = %req.operation,
                    error = %e,
                    "computation failed"
                );
            }
            Outcome {
                operation: req.operation.clone(),
                result,
            }
        }))
        .await
    }
}
