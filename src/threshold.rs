//! Volume threshold delegate.
//!
//! Forwards a volume pair and a scalar threshold to the host's blocking
//! command execution facility. This has nothing to do with fiducial
//! pre-alignment; it is carried over from the module scaffold and kept
//! isolated here (the panel hides it unless
//! [`FeatureFlags::threshold_section`](crate::config::FeatureFlags) is set).

use crate::host::{CommandError, CommandParams, CommandRunner, NodeId};

/// Name of the host command module the delegate invokes.
pub const THRESHOLD_MODULE: &str = "thresholdscalarvolume";

#[derive(Debug, thiserror::Error)]
pub enum ThresholdError {
    /// Input and output volume are the same node.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Command(#[from] CommandError),
}

pub struct ThresholdDelegate {
    runner: Box<dyn CommandRunner>,
}

impl ThresholdDelegate {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Threshold `input` into `output`, keeping voxels above `threshold`.
    ///
    /// Fails without invoking the runner when input and output are the same
    /// node (identity comparison). Otherwise blocks on the host command
    /// module until it completes. `take_screenshot` is accepted for scaffold
    /// parity; the delegate has no rendering access, so it is only logged.
    pub fn run(
        &mut self,
        input: &NodeId,
        output: &NodeId,
        threshold: f64,
        take_screenshot: bool,
    ) -> Result<(), ThresholdError> {
        if input == output {
            log::debug!("threshold run rejected: input and output volume are the same");
            return Err(ThresholdError::InvalidInput(
                "input and output volume are the same; select a different output volume"
                    .to_string(),
            ));
        }

        let mut params = CommandParams::new();
        params
            .insert("InputVolume", input.as_str())
            .insert("OutputVolume", output.as_str())
            .insert("ThresholdValue", threshold)
            .insert("ThresholdType", "Above");

        log::debug!("running {THRESHOLD_MODULE} with threshold {threshold}");
        self.runner.run_blocking(THRESHOLD_MODULE, &params)?;

        if take_screenshot {
            log::info!("screenshot requested after threshold run; not supported here");
        }
        Ok(())
    }
}
