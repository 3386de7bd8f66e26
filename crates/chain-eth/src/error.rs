use thiserror::Error;

/// EVM encoding and parsing errors.
#[derive(Debug, Error)]
pub enum EthError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unsupported chain: {0}")]
    UnsupportedChain(String),
}

impl From<alloy_primitives::utils::UnitsError> for EthError {
    fn from(e: alloy_primitives::utils::UnitsError) -> Self {
        EthError::InvalidAmount(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_invalid_address() {
        let err = EthError::InvalidAddress("bad checksum".into());
        assert_eq!(err.to_string(), "invalid address: bad checksum");
    }

    #[test]
    fn display_invalid_amount() {
        let err = EthError::InvalidAmount("negative".into());
        assert_eq!(err.to_string(), "invalid amount: negative");
    }

    #[test]
    fn display_unexpected_response() {
        let err = EthError::UnexpectedResponse("expected string".into());
        assert_eq!(err.to_string(), "unexpected response: expected string");
    }

    #[test]
    fn display_unsupported_chain() {
        let err = EthError::UnsupportedChain("0x3e7".into());
        assert_eq!(err.to_string(), "unsupported chain: 0x3e7");
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(EthError::EncodingError("test".into()));
        assert!(err.to_string().contains("test"));
    }
}
