//! Format checks behind the boolean-gated string rules
//!
//! Pre-compiled regex validators for email, URL, hex color, credit card and
//! numeric text. IP addresses go through the std parser.

use once_cell::sync::Lazy;
use regex::Regex;
use std::net::IpAddr;

// ============================================================================
// Pre-compiled Regex Patterns
// ============================================================================

/// Email regex pattern (RFC 5322 simplified)
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9-]+(\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}$").unwrap()
});

/// URL regex pattern (http/https/ftp)
static URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(https?|ftp)://[^\s/$.?#][^\s]*$").unwrap()
});

/// Hex color: #rgb or #rrggbb, leading `#` optional
static HEX_COLOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap()
});

/// Card numbers: 13-19 ASCII digits once spaces and dashes are removed
static CARD_DIGITS_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{13,19}$").unwrap());

static INT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[+-]?[0-9]+$").unwrap());

static DECIMAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)$").unwrap()
});

// ============================================================================
// Format Validators
// ============================================================================

/// Validate email format
///
/// # Example
/// ```
/// use formrule::formats::validate_email;
///
/// assert!(validate_email("user@example.com"));
/// assert!(!validate_email("invalid-email"));
/// ```
pub fn validate_email(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate URL format
pub fn validate_url(value: &str) -> bool {
    URL_REGEX.is_match(value)
}

/// Validate hex color format
pub fn validate_hex_color(value: &str) -> bool {
    HEX_COLOR_REGEX.is_match(value)
}

/// Validate an IPv4 or IPv6 address
pub fn validate_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Validate a credit card number (length check plus Luhn checksum)
///
/// # Example
/// ```
/// use formrule::formats::validate_credit_card;
///
/// assert!(validate_credit_card("4111 1111 1111 1111"));
/// assert!(!validate_credit_card("4111 1111 1111 1112"));
/// ```
pub fn validate_credit_card(value: &str) -> bool {
    let digits: String = value.chars().filter(|c| *c != ' ' && *c != '-').collect();
    CARD_DIGITS_REGEX.is_match(&digits) && luhn_checksum(&digits)
}

/// Validate integer text (optional sign, digits only)
pub fn validate_int(value: &str) -> bool {
    INT_REGEX.is_match(value)
}

/// Validate decimal text (`1`, `1.5`, `.5`, `-2.`)
pub fn validate_decimal(value: &str) -> bool {
    DECIMAL_REGEX.is_match(value)
}

fn luhn_checksum(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 {
                    doubled - 9
                } else {
                    doubled
                }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}
