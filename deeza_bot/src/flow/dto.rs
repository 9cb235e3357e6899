use alloy_primitives::U256;

/// One inbound chat message, already reduced to what the orchestrator needs.
#[derive(Clone, Debug)]
pub struct Inbound {
    pub chat_id: i64,
    pub text: String,
    pub display_name: String,
    pub handle: Option<String>,
}

/// An outbound message produced by the orchestrator. `reply` marks messages
/// that should quote the inbound message; cross-chat notifications don't.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub chat_id: i64,
    pub text: String,
    pub reply: bool,
    pub html: bool,
}

impl Reply {
    pub fn plain(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply: true,
            html: false,
        }
    }

    pub fn html(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply: true,
            html: true,
        }
    }

    /// Best-effort notification to another chat.
    pub fn notice(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply: false,
            html: true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FlowConfig {
    pub native_symbol: String,
    pub is_testnet: bool,
    pub zazz_address: Option<String>,
    pub deposit_url: String,
    pub explorer_url: String,
    pub lockout_minutes: u64,
    pub max_wrong_attempts: u8,
    /// Upper bound on a whole-token amount; keeps the 10^18 scale-up inside
    /// the representable range instead of silently overflowing.
    pub max_amount: f64,
    pub bonus_amount: U256,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            native_symbol: "STT".to_string(),
            is_testnet: true,
            zazz_address: None,
            deposit_url: "https://deeza-website.vercel.app/deposit".to_string(),
            explorer_url: "https://shannon-explorer.somnia.network".to_string(),
            lockout_minutes: 30,
            max_wrong_attempts: 3,
            max_amount: 1_000_000_000.0,
            bonus_amount: U256::from(100_000u64) * U256::from(10u64).pow(U256::from(18u64)),
        }
    }
}

/// Scale a validated display amount to 18-decimal base units.
pub fn to_base_units(amount: f64) -> U256 {
    U256::from((amount * 1e18) as u128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_base_units_is_exact_for_whole_amounts() {
        let ten = U256::from(10u64) * U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(to_base_units(10.0), ten);
    }
}
