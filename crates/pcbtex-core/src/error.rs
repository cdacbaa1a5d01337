use thiserror::Error;

/// Reasons a feature's geometry cannot be drawn.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("Non-finite coordinate at vertex {index}")]
    NonFiniteVertex { index: usize },

    #[error("Non-finite {field}")]
    NonFinite { field: &'static str },

    #[error("Dimension {field} must be positive, got {value}")]
    NonPositiveDimension { field: &'static str, value: f64 },

    #[error("Too few points: {0}")]
    TooFewPoints(usize),
}
