use thiserror::Error;

#[derive(Error, Debug)]
pub enum BrandScanError {
    #[error("Invalid target URL: {0}")]
    InvalidTarget(String),

    #[error("Scan error: {0}")]
    Scan(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
