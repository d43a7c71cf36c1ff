//! Postal-code (CEP) format check.
//!
//! Both hops guard their own input with the same predicate, so a request that
//! reaches the orchestrator directly is held to the same rule as one arriving
//! through the gateway.

use std::sync::LazyLock;

use regex::Regex;

// `\d` would accept any Unicode decimal digit; CEPs are ASCII only.
static CEP_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9]{8}$").expect("CEP pattern is a valid regex")
});

/// Returns true when `code` is exactly eight ASCII digits with nothing around them.
pub fn is_valid_cep(code: &str) -> bool {
    CEP_FORMAT.is_match(code)
}
