const UNIT_SECONDS: [(char, u64); 4] = [('s', 1), ('m', 60), ('h', 3_600), ('d', 86_400)];

fn unit_multiplier(unit: char) -> Option<u64> {
    let lower = unit.to_ascii_lowercase();
    UNIT_SECONDS
        .into_iter()
        .find_map(|(ch, seconds)| (ch == lower).then_some(seconds))
}

/// Parse a compact duration like `30s`, `10m`, `2h`, `1d`, `1h30m`, or a
/// bare number of seconds. Zero durations come back as `None`.
pub fn parse_duration_seconds(raw: &str) -> Option<u64> {
    let compact: String = raw.chars().filter(|ch| !ch.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    // A bare number is taken as seconds.
    if compact.bytes().all(|b| b.is_ascii_digit()) {
        let seconds = compact.parse::<u64>().ok()?;
        return (seconds > 0).then_some(seconds);
    }

    // Otherwise every segment must carry a unit.
    let mut total: u64 = 0;
    for segment in compact.split_inclusive(|ch: char| ch.is_ascii_alphabetic()) {
        let unit = segment.chars().last()?;
        let multiplier = unit_multiplier(unit)?;

        let amount = segment[..segment.len() - unit.len_utf8()]
            .parse::<u64>()
            .ok()?;
        if amount == 0 {
            return None;
        }

        total = total.checked_add(amount.checked_mul(multiplier)?)?;
    }

    (total > 0).then_some(total)
}

pub fn has_duration_unit(raw: &str) -> bool {
    raw.trim()
        .chars()
        .last()
        .is_some_and(|last| unit_multiplier(last).is_some())
}

/// Parse a six-digit hex color like `#5865F2` or `5865f2` into its RGB value.
pub fn parse_hex_color(raw: &str) -> Option<u32> {
    let value = raw.trim();
    let digits = value.strip_prefix('#').unwrap_or(value);

    if digits.len() != 6 || !digits.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }

    u32::from_str_radix(digits, 16).ok()
}

/// Parse a channel mention like `<#123>` or a raw channel id.
///
/// Snowflake ids are never zero, so zero is rejected.
pub fn parse_channel_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    let digits = if value.starts_with("<#") && value.ends_with('>') {
        value.trim_start_matches("<#").trim_end_matches('>')
    } else {
        value
    };

    digits.parse::<u64>().ok().filter(|&id| id > 0)
}

/// Parse a role mention like `<@&123>` or a raw role id.
///
/// Snowflake ids are never zero, so zero is rejected.
pub fn parse_role_id(raw: &str) -> Option<u64> {
    let value = raw.trim();
    let digits = if value.starts_with("<@&") && value.ends_with('>') {
        value.trim_start_matches("<@&").trim_end_matches('>')
    } else {
        value
    };

    digits.parse::<u64>().ok().filter(|&id| id > 0)
}

#[cfg(test)]
mod tests {
    use super::{
        has_duration_unit, parse_channel_id, parse_duration_seconds, parse_hex_color, parse_role_id,
    };

    #[test]
    fn parses_single_unit_durations() {
        assert_eq!(parse_duration_seconds("30s"), Some(30));
        assert_eq!(parse_duration_seconds("10m"), Some(600));
        assert_eq!(parse_duration_seconds("2h"), Some(7_200));
        assert_eq!(parse_duration_seconds("1d"), Some(86_400));
        assert_eq!(parse_duration_seconds("90"), Some(90));
    }

    #[test]
    fn parses_compound_durations() {
        assert_eq!(parse_duration_seconds("1h 30m"), Some(5_400));
        assert_eq!(parse_duration_seconds("1d2h"), Some(93_600));
    }

    #[test]
    fn rejects_malformed_durations() {
        assert_eq!(parse_duration_seconds(""), None);
        assert_eq!(parse_duration_seconds("0s"), None);
        assert_eq!(parse_duration_seconds("abc"), None);
        assert_eq!(parse_duration_seconds("10x"), None);
        assert_eq!(parse_duration_seconds("1h 30"), None);
        assert_eq!(parse_duration_seconds("1é"), None);
    }

    #[test]
    fn detects_duration_units() {
        assert!(has_duration_unit("30s"));
        assert!(has_duration_unit("2H"));
        assert!(!has_duration_unit("90"));
        assert!(!has_duration_unit(""));
    }

    #[test]
    fn parses_hex_colors_with_and_without_hash() {
        assert_eq!(parse_hex_color("#5865F2"), Some(0x58_65_F2));
        assert_eq!(parse_hex_color("5865f2"), Some(0x58_65_F2));
        assert_eq!(parse_hex_color("  #FF0000  "), Some(0xFF_00_00));
        assert_eq!(parse_hex_color("#000000"), Some(0));
    }

    #[test]
    fn rejects_malformed_hex_colors() {
        assert_eq!(parse_hex_color(""), None);
        assert_eq!(parse_hex_color("#FFF"), None);
        assert_eq!(parse_hex_color("#12345G"), None);
        assert_eq!(parse_hex_color("#1234567"), None);
        assert_eq!(parse_hex_color("blurple"), None);
    }

    #[test]
    fn parses_channel_mentions_and_ids() {
        assert_eq!(parse_channel_id("<#123456>"), Some(123_456));
        assert_eq!(parse_channel_id("123456"), Some(123_456));
        assert_eq!(parse_channel_id(" <#42> "), Some(42));
        assert_eq!(parse_channel_id("<#abc>"), None);
        assert_eq!(parse_channel_id("#general"), None);
        assert_eq!(parse_channel_id("0"), None);
    }

    #[test]
    fn parses_role_mentions_and_ids() {
        assert_eq!(parse_role_id("<@&123456>"), Some(123_456));
        assert_eq!(parse_role_id("123456"), Some(123_456));
        assert_eq!(parse_role_id("<@123456>"), None);
        assert_eq!(parse_role_id("@everyone"), None);
        assert_eq!(parse_role_id("<@&0>"), None);
    }
}
