mod config;
mod error;
mod severity;

pub use config::*;
pub use error::*;
pub use severity::*;

use tracing::debug;

use crate::tempager::{self, DeviceReading};

pub const PLUGIN_NAME: &str = "check-tempager-3e-temperature";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub severity: Severity,

    pub message: String,
}

impl Outcome {
    pub fn status_line(&self) -> String {
        format!("{PLUGIN_NAME} {}: {}", self.severity, self.message)
    }
}

impl From<CheckError> for Outcome {
    fn from(e: CheckError) -> Self {
        Self {
            severity: Severity::Critical,
            message: e.to_string(),
        }
    }
}

/// Runs the whole check against `config`. Failures become CRITICAL outcomes.
pub async fn run(config: &CheckConfiguration) -> Outcome {
    match evaluate(config).await {
        Ok(outcome) => outcome,
        Err(e) => {
            debug!("Check failed: {e:?}");
            Outcome::from(e)
        }
    }
}

pub async fn evaluate(config: &CheckConfiguration) -> Result<Outcome, CheckError> {
    let address = config.validate()?;

    let values = tempager::read_values(address, config).await?;
    let reading = DeviceReading::decode(values)?;
    debug!("Decoded reading: {reading:?}");

    let report = reading.report();
    let severity = config.thresholds.classify(report.external_celsius);
    debug!(
        "External temperature {:.2}c is {severity} against {:?}",
        report.external_celsius, config.thresholds
    );

    Ok(Outcome {
        severity,
        message: report.summary(),
    })
}
