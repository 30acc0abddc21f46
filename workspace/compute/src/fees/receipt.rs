use chrono::NaiveDate;
use rand::Rng;

pub const RECEIPT_PREFIX: &str = "RCPT";
pub const RECEIPT_TOKEN_LEN: usize = 6;

const TOKEN_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Supplies the random part of a receipt number.
pub trait ReceiptTokenSource: Send + Sync {
    /// Returns `RECEIPT_TOKEN_LEN` uppercase alphanumeric characters.
    fn next_token(&self) -> String;
}

/// Tokens drawn from the thread-local CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomReceiptTokens;

impl ReceiptTokenSource for RandomReceiptTokens {
    fn next_token(&self) -> String {
        let mut rng = rand::rng();
        (0..RECEIPT_TOKEN_LEN)
            .map(|_| TOKEN_ALPHABET[rng.random_range(0..TOKEN_ALPHABET.len())] as char)
            .collect()
    }
}

/// `RCPT-YYYYMMDD-XXXXXX`
pub fn format_receipt_number(date: NaiveDate, token: &str) -> String {
    format!("{}-{}-{}", RECEIPT_PREFIX, date.format("%Y%m%d"), token)
}

/// Checks the shape of a receipt number, not whether it was ever issued.
pub fn is_receipt_number(value: &str) -> bool {
    let mut parts = value.split('-');
    let (Some(prefix), Some(date), Some(token), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    prefix == RECEIPT_PREFIX
        && date.len() == 8
        && NaiveDate::parse_from_str(date, "%Y%m%d").is_ok()
        && token.len() == RECEIPT_TOKEN_LEN
        && token
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_receipt_number() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(
            format_receipt_number(date, "AB12CD"),
            "RCPT-20240105-AB12CD"
        );
    }

    #[test]
    fn test_random_tokens_have_receipt_shape() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let source = RandomReceiptTokens;
        for _ in 0..200 {
            let token = source.next_token();
            assert_eq!(token.len(), RECEIPT_TOKEN_LEN);
            assert!(is_receipt_number(&format_receipt_number(date, &token)), "{}", token);
        }
    }

    #[test]
    fn test_is_receipt_number_rejects_malformed() {
        assert!(is_receipt_number("RCPT-20240105-A1B2C3"));
        assert!(!is_receipt_number("RCPT-20240105-a1b2c3"));
        assert!(!is_receipt_number("RCPT-20240105-A1B2C"));
        assert!(!is_receipt_number("RCPT-20241305-A1B2C3"));
        assert!(!is_receipt_number("RCT-20240105-A1B2C3"));
        assert!(!is_receipt_number("RCPT-20240105-A1B2C3-X"));
    }
}
