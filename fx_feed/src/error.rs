use thiserror::Error;

#[derive(Debug, Error)]
pub enum FxFeedError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid response from the rate service: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Rate query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The rate service reported an unsuccessful result: {0}")]
    Unsuccessful(String),
}
