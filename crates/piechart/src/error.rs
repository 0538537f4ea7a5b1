use crate::model::Label;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("highlight strength cannot be negative (got {0})")]
    NegativeHighlightStrength(f32),
    #[error("slice fraction must be within (0, 1] (got {0})")]
    InvalidFraction(f32),
    #[error("no item labelled '{0}'")]
    ItemNotFound(Label),
    #[error("item index {index} out of range for {len} items")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("fling velocity downscale must be at least 1")]
    ZeroDownscale,
    #[error("fling deceleration must be positive and finite (got {0})")]
    InvalidDeceleration(f64),
}
