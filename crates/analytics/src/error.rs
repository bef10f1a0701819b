use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("An unexpected error occurred during analytics calculation: {0}")]
    Internal(String),
}
