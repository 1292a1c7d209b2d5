use thiserror::Error;

/// Failures that can only happen while building the engine or talking to it
/// from the control thread. The render path never produces one of these.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("sample rate must be a positive, finite number of Hz (got {0})")]
    InvalidSampleRate(f32),

    #[error("maximum delay must be a positive, finite number of seconds (got {0})")]
    InvalidMaxDelay(f32),

    #[error("unknown control name `{0}`")]
    UnknownControl(String),
}

pub(crate) fn check_sample_rate(sample_rate: f32) -> Result<f32, EngineError> {
    if sample_rate.is_finite() && sample_rate > 0.0 {
        Ok(sample_rate)
    } else {
        Err(EngineError::InvalidSampleRate(sample_rate))
    }
}
