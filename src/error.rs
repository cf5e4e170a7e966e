use thiserror::Error;

pub type Result<T> = std::result::Result<T, FinviewError>;

#[derive(Error, Debug)]
pub enum FinviewError {
    /// Scan call failed: network error, non-success status or malformed JSON.
    /// Fatal for the current cycle only.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// One ticker's price series could not be fetched or parsed.
    #[error("price provider error for {coin}: {reason}")]
    FallbackProvider { coin: String, reason: String },

    #[error("scan already in progress")]
    ScanInProgress,

    #[error("configuration error: {0}")]
    Config(String),
}

impl FinviewError {
    pub fn fallback(coin: &str, reason: impl ToString) -> Self {
        Self::FallbackProvider {
            coin: coin.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_error_names_coin() {
        let err = FinviewError::fallback("bitcoin", "timed out");
        assert_eq!(err.to_string(), "price provider error for bitcoin: timed out");
    }
}
