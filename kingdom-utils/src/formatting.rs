/// Render a progress fraction as a bar of `length` segments, e.g.
/// `▰▰▰▱▱▱▱▱▱▱` for 35%. The fraction is clamped to [0, 100].
pub fn progress_bar(percent: f64, length: usize) -> String {
    let percent = if percent.is_finite() {
        percent.clamp(0.0, 100.0)
    } else {
        0.0
    };

    let filled = ((length as f64) * percent / 100.0) as usize;
    let filled = filled.min(length);

    let mut bar = String::with_capacity(length * 3);
    for _ in 0..filled {
        bar.push('▰');
    }
    for _ in filled..length {
        bar.push('▱');
    }
    bar
}

/// Format a count with thousands separators (e.g. 1234567 -> "1,234,567").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

/// Fill a level-up announcement template. `{user}` becomes the member's
/// mention and `{level}` the level just reached.
pub fn format_level_up_message(template: &str, user_mention: &str, level: u64) -> String {
    template
        .replace("{user}", user_mention)
        .replace("{level}", &level.to_string())
}

/// Seconds as a compact duration: every nonzero unit from days down,
/// e.g. "45s", "1m 30s", "1h 1m 10s", "1d 2h".
pub fn format_compact_duration(total_seconds: u64) -> String {
    if total_seconds == 0 {
        return "0s".to_owned();
    }

    let units = [
        (total_seconds / 86_400, 'd'),
        (total_seconds % 86_400 / 3_600, 'h'),
        (total_seconds % 3_600 / 60, 'm'),
        (total_seconds % 60, 's'),
    ];

    units
        .into_iter()
        .filter(|(amount, _)| *amount > 0)
        .map(|(amount, unit)| format!("{amount}{unit}"))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{format_compact_duration, format_count, format_level_up_message, progress_bar};

    #[test]
    fn progress_bar_fills_proportionally() {
        assert_eq!(progress_bar(0.0, 10), "▱▱▱▱▱▱▱▱▱▱");
        assert_eq!(progress_bar(35.0, 10), "▰▰▰▱▱▱▱▱▱▱");
        assert_eq!(progress_bar(50.0, 10), "▰▰▰▰▰▱▱▱▱▱");
        assert_eq!(progress_bar(100.0, 10), "▰▰▰▰▰▰▰▰▰▰");
    }

    #[test]
    fn progress_bar_clamps_out_of_range_input() {
        assert_eq!(progress_bar(-20.0, 4), "▱▱▱▱");
        assert_eq!(progress_bar(250.0, 4), "▰▰▰▰");
        assert_eq!(progress_bar(f64::NAN, 4), "▱▱▱▱");
    }

    #[test]
    fn counts_get_thousands_separators() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn level_up_template_substitutes_placeholders() {
        assert_eq!(
            format_level_up_message("🎉 {user} leveled up to **Level {level}**!", "<@42>", 7),
            "🎉 <@42> leveled up to **Level 7**!"
        );
        assert_eq!(
            format_level_up_message("GG {user}, {level} already? {level}!", "<@1>", 3),
            "GG <@1>, 3 already? 3!"
        );
        assert_eq!(format_level_up_message("no placeholders", "<@1>", 3), "no placeholders");
    }

    #[test]
    fn compact_duration_skips_zero_units() {
        assert_eq!(format_compact_duration(0), "0s");
        assert_eq!(format_compact_duration(59), "59s");
        assert_eq!(format_compact_duration(60), "1m");
        assert_eq!(format_compact_duration(90), "1m 30s");
        assert_eq!(format_compact_duration(3600), "1h");
        assert_eq!(format_compact_duration(3670), "1h 1m 10s");
        assert_eq!(format_compact_duration(86400), "1d");
        assert_eq!(format_compact_duration(90000), "1d 1h");
    }
}
