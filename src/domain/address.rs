use alloy::primitives::Address;

use crate::error::{JagerError, Result};

/// Parse an account or contract address and validate its EIP-55 checksum.
///
/// All-lowercase and all-uppercase hex is accepted as-is. Mixed-case input
/// must carry the correct checksum, since a wrong one usually means a typo.
pub fn normalize_address(raw: &str) -> Result<Address> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(JagerError::AddressParsing(format!(
            "'{}' is not a 20-byte hex address",
            raw
        )));
    }

    let address: Address = body
        .parse()
        .map_err(|e| JagerError::AddressParsing(format!("Invalid address {}: {}", raw, e)))?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        let expected = address.to_checksum(None);
        if expected[2..] != *body {
            return Err(JagerError::AddressParsing(format!(
                "Checksum mismatch for {} (expected {})",
                raw, expected
            )));
        }
    }

    Ok(address)
}

/// Checksummed string form, the way addresses are shown in logs and output.
pub fn checksum(address: &Address) -> String {
    address.to_checksum(None)
}
