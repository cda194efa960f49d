use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("No nearby nodes found for snapping")]
    NoPointsFound,
    #[error("Invalid node index")]
    InvalidNodeIndex,
    #[error("No path between nodes {from} and {to}")]
    Unreachable { from: i64, to: i64 },
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Search budget of {0} settled nodes exhausted")]
    SearchLimitExceeded(usize),
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}
