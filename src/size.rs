/// Binary unit multipliers accepted in a memory limit string
const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

/// Convert a size string such as `"256M"` or `"1G"` into bytes
///
/// The leading digits are read as a base-10 integer (0 if absent) and the
/// remainder, lower-cased, selects the multiplier: `g`, `m` or `k` scale by
/// powers of 1024, anything else leaves the value in bytes. Never fails;
/// overflow saturates at `u64::MAX`.
pub fn parse_byte_size_string(limit: &str) -> u64 {
    let limit = limit.trim();
    let digits_end = limit
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(limit.len());
    let (digits, unit) = limit.split_at(digits_end);

    let value = digits.bytes().fold(0u64, |acc, b| {
        acc.saturating_mul(10).saturating_add(u64::from(b - b'0'))
    });

    value.saturating_mul(unit_multiplier(unit))
}

fn unit_multiplier(unit: &str) -> u64 {
    match unit.to_lowercase().as_str() {
        "g" => GIB,
        "m" => MIB,
        "k" => KIB,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units() {
        assert_eq!(parse_byte_size_string("1K"), 1024);
        assert_eq!(parse_byte_size_string("2M"), 2 * 1024 * 1024);
        assert_eq!(parse_byte_size_string("3G"), 3 * 1024 * 1024 * 1024);
        assert_eq!(parse_byte_size_string("128m"), 128 * 1024 * 1024);
        assert_eq!(parse_byte_size_string("500"), 500);
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(parse_byte_size_string(""), 0);
        assert_eq!(parse_byte_size_string("5x"), 5);
        assert_eq!(parse_byte_size_string("G"), 0);
        assert_eq!(parse_byte_size_string("-1"), 0);
        assert_eq!(parse_byte_size_string("  64k "), 64 * 1024);
        // Multi-character suffixes are not units
        assert_eq!(parse_byte_size_string("10KB"), 10);
    }

    #[test]
    fn test_saturates() {
        assert_eq!(parse_byte_size_string("99999999999999999999999"), u64::MAX);
        assert_eq!(parse_byte_size_string("18446744073709551615G"), u64::MAX);
    }
}
