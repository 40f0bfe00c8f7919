//! Size parsing and unit conversion.
//!
//! Sizes coming from `du` are counted in blocks; thresholds typed by the
//! user are human strings like `"100MB"` or `"1.5GiB"`. Both end up as bytes.

use anyhow::{Result, anyhow, bail};

/// Unit suffixes and their multipliers. Matching is case-insensitive.
const UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("B", 1),
    ("K", 1_024),
    ("KB", 1_000),
    ("KIB", 1_024),
    ("M", 1_048_576),
    ("MB", 1_000_000),
    ("MIB", 1_048_576),
    ("G", 1_073_741_824),
    ("GB", 1_000_000_000),
    ("GIB", 1_073_741_824),
    ("T", 1_099_511_627_776),
    ("TB", 1_000_000_000_000),
    ("TIB", 1_099_511_627_776),
];

/// Digits of the fractional part that are taken into account.
const MAX_FRACTION_DIGITS: usize = 9;

/// Parse a human-readable size string into bytes.
///
/// Accepts plain byte counts (`"4096"`), decimal units (`KB`, `MB`, `GB`,
/// `TB`), binary units (`KiB`, `MiB`, `GiB`, `TiB`), the single-letter
/// binary shorthands that `du -h` prints (`K`, `M`, `G`, `T`) and a
/// fractional part (`"1.5GB"`). Fractions below one byte are truncated.
///
/// # Errors
///
/// Returns an error when the number or unit is not recognised, when the
/// fraction has more than nine digits, or when the result overflows `u64`.
///
/// # Examples
///
/// ```
/// # use dir_usage::utils::parse_size;
/// assert_eq!(parse_size("100KB").unwrap(), 100_000);
/// assert_eq!(parse_size("1.5K").unwrap(), 1_536);
/// ```
pub fn parse_size(input: &str) -> Result<u64> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    if number.is_empty() {
        bail!("Invalid size: {input:?}");
    }

    let unit = unit.trim().to_ascii_uppercase();
    let multiplier = UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|(_, m)| *m)
        .ok_or_else(|| anyhow!("Unknown size unit {unit:?} in {input:?}"))?;

    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if fraction.contains('.') {
        bail!("Invalid size: {input:?}");
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse()? };
    let whole_bytes = whole
        .checked_mul(multiplier)
        .ok_or_else(|| anyhow!("Size {input:?} is too large"))?;

    whole_bytes
        .checked_add(fraction_bytes(fraction, multiplier)?)
        .ok_or_else(|| anyhow!("Size {input:?} is too large"))
}

/// Bytes contributed by the fractional digits of a size.
fn fraction_bytes(fraction: &str, multiplier: u64) -> Result<u64> {
    if fraction.is_empty() {
        return Ok(0);
    }
    if fraction.len() > MAX_FRACTION_DIGITS {
        bail!("Too many decimal places: {fraction}");
    }

    let scale = 10u128.pow(u32::try_from(fraction.len())?);
    let numerator: u128 = fraction.parse()?;
    let bytes = numerator * u128::from(multiplier) / scale;

    Ok(u64::try_from(bytes)?)
}

/// Convert a block count reported by `du` into bytes, saturating on overflow.
#[must_use]
pub const fn blocks_to_bytes(blocks: u64, block_size: u64) -> u64 {
    blocks.saturating_mul(block_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(parse_size("0").unwrap(), 0);
        assert_eq!(parse_size("4096").unwrap(), 4096);
        assert_eq!(parse_size(" 12 ").unwrap(), 12);
        assert_eq!(parse_size("12B").unwrap(), 12);
    }

    #[test]
    fn test_decimal_and_binary_units() {
        assert_eq!(parse_size("100KB").unwrap(), 100_000);
        assert_eq!(parse_size("2MB").unwrap(), 2_000_000);
        assert_eq!(parse_size("1GB").unwrap(), 1_000_000_000);
        assert_eq!(parse_size("1KiB").unwrap(), 1_024);
        assert_eq!(parse_size("10MiB").unwrap(), 10_485_760);
        assert_eq!(parse_size("1GiB").unwrap(), 1_073_741_824);
        assert_eq!(parse_size("1TiB").unwrap(), 1_099_511_627_776);
    }

    #[test]
    fn test_du_style_shorthands() {
        assert_eq!(parse_size("4K").unwrap(), 4_096);
        assert_eq!(parse_size("1M").unwrap(), 1_048_576);
        assert_eq!(parse_size("2g").unwrap(), 2_147_483_648);
    }

    #[test]
    fn test_case_insensitive_and_spaced_units() {
        assert_eq!(parse_size("1mb").unwrap(), 1_000_000);
        assert_eq!(parse_size("1 MiB").unwrap(), 1_048_576);
    }

    #[test]
    fn test_fractions() {
        assert_eq!(parse_size("1.5KB").unwrap(), 1_500);
        assert_eq!(parse_size("1.5MiB").unwrap(), 1_572_864);
        assert_eq!(parse_size(".5KB").unwrap(), 500);
        assert_eq!(parse_size("0.001KB").unwrap(), 1);
        assert_eq!(parse_size("3.14159KB").unwrap(), 3_141);
        assert!(parse_size("1.1234567891KB").is_err());
    }

    #[test]
    fn test_invalid_sizes() {
        assert!(parse_size("").is_err());
        assert!(parse_size("MB").is_err());
        assert!(parse_size("abc").is_err());
        assert!(parse_size("1.2.3MB").is_err());
        assert!(parse_size("1XB").is_err());
        assert!(parse_size("-1MB").is_err());
    }

    #[test]
    fn test_overflow() {
        assert!(parse_size(&u64::MAX.to_string()).is_ok());
        assert!(parse_size(&format!("{}GB", u64::MAX / 1_000_000_000 + 1)).is_err());
    }

    #[test]
    fn test_blocks_to_bytes() {
        assert_eq!(blocks_to_bytes(4, 1_024), 4_096);
        assert_eq!(blocks_to_bytes(u64::MAX, 2), u64::MAX);
    }
}
