//! Utility functions for deeza_bot.

use alloy_primitives::U256;

/// Natural-language cancel utterances that abort any active flow. The
/// `/cancel` command goes through the command tree and lands in the same
/// place.
const CANCEL_UTTERANCES: &[&str] = &["cancel", "cancel this", "stop", "reset"];

const CONFIRM_WORDS: &[&str] = &[
    "yes", "yep", "yeah", "ok", "okay", "sure", "confirm", "go", "change", "create", "proceed",
    "alright", "fine",
];
const CONFIRM_PHRASES: &[&str] = &["do it", "go ahead", "sounds good", "let's go"];

const CANCEL_WORDS: &[&str] = &[
    "no", "nah", "cancel", "abort", "stop", "dont", "don't", "nope", "nevermind",
];

const SKIP_WORDS: &[&str] = &["skip", "no", "n", "none"];

pub fn is_cancel_utterance(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    CANCEL_UTTERANCES.contains(&lower.as_str())
}

fn tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

pub fn contains_confirm_word(text: &str) -> bool {
    let lower = text.to_lowercase();
    tokens(text).iter().any(|t| CONFIRM_WORDS.contains(&t.as_str()))
        || CONFIRM_PHRASES.iter().any(|p| lower.contains(p))
}

pub fn contains_cancel_word(text: &str) -> bool {
    tokens(text).iter().any(|t| CANCEL_WORDS.contains(&t.as_str()))
}

pub fn is_skip(text: &str) -> bool {
    let lower = text.trim().to_lowercase();
    lower.is_empty() || SKIP_WORDS.contains(&lower.as_str())
}

/// Render base units as a decimal token amount, trimming trailing zeros.
pub fn format_units(amount: U256, decimals: u32) -> String {
    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = amount / scale;
    let frac = amount % scale;
    if frac.is_zero() {
        return whole.to_string();
    }
    let frac_str = format!("{:0>width$}", frac, width = decimals as usize);
    let trimmed = frac_str.trim_end_matches('0');
    format!("{}.{}", whole, trimmed)
}

pub fn escape_html(text: &str) -> String {
    teloxide::utils::html::escape(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_utterances_are_exact() {
        assert!(is_cancel_utterance("cancel"));
        assert!(is_cancel_utterance("  Cancel This "));
        assert!(is_cancel_utterance("STOP"));
        assert!(!is_cancel_utterance("stop it please"));
        assert!(!is_cancel_utterance("cancellation policy"));
    }

    #[test]
    fn test_confirm_and_cancel_words_are_token_based() {
        assert!(contains_confirm_word("yes please"));
        assert!(contains_confirm_word("ok, do it"));
        assert!(contains_confirm_word("go ahead!"));
        assert!(!contains_confirm_word("i don't know"));
        assert!(contains_cancel_word("no way"));
        assert!(contains_cancel_word("nevermind"));
        // "know" must not match "no"
        assert!(!contains_cancel_word("know"));
    }

    #[test]
    fn test_skip_words() {
        assert!(is_skip("skip"));
        assert!(is_skip("No"));
        assert!(is_skip(""));
        assert!(!is_skip("no message for you"));
    }

    #[test]
    fn test_format_units() {
        let one = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_units(one * U256::from(10u64), 18), "10");
        assert_eq!(
            format_units(one / U256::from(2u64), 18),
            "0.5"
        );
        assert_eq!(format_units(U256::ZERO, 18), "0");
    }
}
