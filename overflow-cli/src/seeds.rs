use anyhow::{Result, bail};

const DEFAULT_SEED: u64 = 1337;

/// Resolve the `--seed` argument.
///
/// Accepts decimal integers (negative values use their magnitude) and
/// `0x`-prefixed hex. An empty token falls back to the default seed.
pub fn resolve_seed_token(token: &str) -> Result<u64> {
    let token = token.trim();
    if token.is_empty() {
        return Ok(DEFAULT_SEED);
    }

    if let Ok(value) = token.parse::<i64>() {
        return Ok(value.unsigned_abs());
    }

    if let Ok(value) = token.parse::<u64>() {
        return Ok(value);
    }

    let hex = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"));
    if let Some(digits) = hex
        && let Ok(value) = u64::from_str_radix(digits, 16)
    {
        return Ok(value);
    }

    bail!("Unrecognized seed token: {token}");
}
