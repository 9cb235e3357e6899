use alloy_primitives::{keccak256, B256};
use rand::Rng;
use regex::Regex;

/// Pull the first EVM address out of free text, if any.
pub fn extract_wallet_address(text: &str) -> Option<String> {
    let re = Regex::new(r"0x[a-fA-F0-9]{40}").unwrap();
    re.find(text).map(|m| m.as_str().to_string())
}

/// A gift code is the recipient handle plus a short random suffix, e.g.
/// `bob42`. Codes are what humans type; ids are what the contract keys on.
pub fn generate_gift_code(recipient: &str) -> String {
    let suffix: u8 = rand::thread_rng().gen_range(0..100);
    format!("{}{}", recipient.to_lowercase(), suffix)
}

/// Deterministic on-chain id for a code: keccak256 over the UTF-8 bytes,
/// matching `ethers.id` on the contract side.
pub fn derive_gift_id(code: &str) -> B256 {
    keccak256(code.as_bytes())
}

/// Render a remaining-lockout duration the way a human reads it.
pub fn format_lockout(seconds: u64) -> String {
    let minutes = seconds.div_ceil(60);
    if minutes <= 1 {
        "1 more minute".to_string()
    } else {
        format!("{} more minutes", minutes)
    }
}

/// Shorten an address for display: `0x12345678...abcd`.
pub fn short_address(address: &str) -> String {
    if address.len() >= 42 {
        format!("{}...{}", &address[..10], &address[38..])
    } else {
        address.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_wallet_address() {
        let text = "gift @bob 5 USDC 0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B please";
        assert_eq!(
            extract_wallet_address(text),
            Some("0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B".to_string())
        );
        assert_eq!(extract_wallet_address("no address here"), None);
        // Too short to be an address
        assert_eq!(extract_wallet_address("0x1234"), None);
    }

    #[test]
    fn test_gift_code_shape() {
        for _ in 0..20 {
            let code = generate_gift_code("Bob");
            assert!(code.starts_with("bob"));
            let suffix = &code[3..];
            let n: u8 = suffix.parse().expect("numeric suffix");
            assert!(n < 100);
        }
    }

    #[test]
    fn test_gift_id_is_deterministic() {
        let a = derive_gift_id("bob42");
        let b = derive_gift_id("bob42");
        let c = derive_gift_id("bob43");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_format_lockout() {
        assert_eq!(format_lockout(30), "1 more minute");
        assert_eq!(format_lockout(61), "2 more minutes");
        assert_eq!(format_lockout(1800), "30 more minutes");
    }

    #[test]
    fn test_short_address() {
        let addr = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";
        assert_eq!(short_address(addr), "0xAb5801a7...eC9B");
    }
}
