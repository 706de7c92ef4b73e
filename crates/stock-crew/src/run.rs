//! Running the crew and delivering its report

use crate::error::Result;
use crew_notify::{DeliveryResult, Notify};
use crew_workflow::{Pipeline, PipelineOutput};
use tracing::{info, warn};

/// Where the final report goes
#[derive(Clone, Copy)]
pub struct Delivery<'a> {
    pub notifier: &'a dyn Notify,
    pub destination: &'a str,
}

/// Outcome of a crew run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub output: PipelineOutput,
    /// `None` when delivery was skipped
    pub delivery: Option<DeliveryResult>,
}

impl RunReport {
    /// The final report text
    pub fn report(&self) -> &str {
        &self.output.raw
    }
}

/// Run the pipeline and, when it succeeds, deliver the final output once
///
/// A pipeline failure is returned as an error and nothing is delivered. A
/// failed delivery is not an error: it is logged and reported in
/// [`RunReport::delivery`].
pub async fn run_and_deliver(
    pipeline: &mut Pipeline,
    delivery: Option<Delivery<'_>>,
) -> Result<RunReport> {
    let output = pipeline.kickoff().await?;

    let delivery = match delivery {
        Some(Delivery {
            notifier,
            destination,
        }) => {
            let result = notifier.deliver(destination, &output.raw).await;
            if result.success {
                info!(status = ?result.status, "Report sent");
            } else {
                warn!(status = ?result.status, "Report could not be sent");
            }
            Some(result)
        }
        None => {
            info!("Delivery skipped");
            None
        }
    };

    Ok(RunReport { output, delivery })
}
