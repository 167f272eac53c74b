use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregateError {
    #[error("Cannot average an empty set of readings")]
    EmptyInput,
}

impl AggregateError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput => "No readings to average.",
        }
    }
}

/// Arithmetic mean of `values`.
pub fn mean(values: &[f64]) -> Result<f64, AggregateError> {
    if values.is_empty() {
        return Err(AggregateError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}
