use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Photometry error: {0}")]
    Photometry(#[from] PhotometryError),

    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors that mean a file cannot be interpreted safely.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhotometryError {
    #[error("Invalid photometric file format: {0}")]
    InvalidFormat(String),

    #[error("Invalid luminous opening: width={width}, length={length}, height={height}")]
    InvalidLuminousOpening {
        width: f64,
        length: f64,
        height: f64,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Division by zero while computing {0}")]
    DivisionByZero(&'static str),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
