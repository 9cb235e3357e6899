use thiserror::Error;

/// Outcomes the gift contract can hand back, plus the generic transport
/// failure. Only `Network` is worth retrying; the rest are authoritative.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChainError {
    #[error("gift has already been claimed")]
    AlreadyClaimed,
    #[error("gift has not been deposited yet")]
    NotDeposited,
    #[error("claim is locked for another {0} seconds")]
    LockedOut(u64),
    #[error("signer is not authorized for this call")]
    Unauthorized,
    #[error("gift not found")]
    NotFound,
    #[error("network error: {0}")]
    Network(String),
}

impl ChainError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChainError::Network(_))
    }

    /// Classify a raw RPC/revert message the way the contract phrases its
    /// require strings.
    pub fn from_rpc_message(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("already claimed") || lower.contains("claimed") && lower.contains("revert")
        {
            ChainError::AlreadyClaimed
        } else if lower.contains("not deposited") {
            ChainError::NotDeposited
        } else if lower.contains("locked") {
            ChainError::LockedOut(0)
        } else if lower.contains("only bot") || lower.contains("unauthorized") {
            ChainError::Unauthorized
        } else {
            ChainError::Network(message.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_reason_mapping() {
        assert_eq!(
            ChainError::from_rpc_message("execution reverted: Locked"),
            ChainError::LockedOut(0)
        );
        assert_eq!(
            ChainError::from_rpc_message("execution reverted: Only bot"),
            ChainError::Unauthorized
        );
        assert_eq!(
            ChainError::from_rpc_message("execution reverted: Not deposited"),
            ChainError::NotDeposited
        );
        assert!(matches!(
            ChainError::from_rpc_message("connection timed out"),
            ChainError::Network(_)
        ));
    }

    #[test]
    fn test_only_network_is_retryable() {
        assert!(ChainError::Network("timeout".into()).is_retryable());
        assert!(!ChainError::AlreadyClaimed.is_retryable());
        assert!(!ChainError::LockedOut(120).is_retryable());
    }
}
