use std::cmp::Ordering;

const COUNT_UNITS: [(f64, &str); 3] = [(1e9, "B"), (1e6, "M"), (1e3, "K")];

/// One decimal place, with a trailing `.0` dropped.
fn trim_one_decimal(value: f64) -> String {
    let formatted = format!("{value:.1}");
    match formatted.strip_suffix(".0") {
        Some(whole) => whole.to_string(),
        None => formatted,
    }
}

/// Short view count as shown on video cards: `999`, `1.2K`, `2.4M`, `1B`.
pub fn format_compact_count(count: u64) -> String {
    let value = count as f64;
    for (i, (scale, suffix)) in COUNT_UNITS.iter().enumerate() {
        if value < *scale {
            continue;
        }
        let scaled = (value / scale * 10.0).round() / 10.0;
        // 999_960 rounds to 1000.0K, show it as 1M instead
        if scaled >= 1000.0 && i > 0 {
            let (bigger_scale, bigger_suffix) = COUNT_UNITS[i - 1];
            let bumped = (value / bigger_scale * 10.0).round() / 10.0;
            return format!("{}{bigger_suffix}", trim_one_decimal(bumped));
        }
        return format!("{}{suffix}", trim_one_decimal(scaled));
    }
    count.to_string()
}

pub fn format_viral_factor(views_ratio: f64) -> String {
    format!("{}x", trim_one_decimal(views_ratio))
}

/// Descending comparison for float metrics. Incomparable values are treated as equal.
pub fn compare_desc(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_counts_are_printed_as_is() {
        assert_eq!(format_compact_count(0), "0");
        assert_eq!(format_compact_count(999), "999");
    }

    #[test]
    fn counts_use_the_largest_fitting_unit() {
        assert_eq!(format_compact_count(1_200), "1.2K");
        assert_eq!(format_compact_count(2_400_000), "2.4M");
        assert_eq!(format_compact_count(6_000_000), "6M");
        assert_eq!(format_compact_count(1_100_000_000), "1.1B");
    }

    #[test]
    fn rounding_up_moves_to_the_next_unit() {
        assert_eq!(format_compact_count(999_960), "1M");
    }

    #[test]
    fn viral_factor_drops_zero_decimal() {
        assert_eq!(format_viral_factor(4.8), "4.8x");
        assert_eq!(format_viral_factor(6.0), "6x");
        assert_eq!(format_viral_factor(10.04), "10x");
    }

    #[test]
    fn compare_desc_sorts_largest_first() {
        let mut ratios = vec![1.5, 10.0, 3.2];
        ratios.sort_by(|a, b| compare_desc(*a, *b));
        assert_eq!(ratios, vec![10.0, 3.2, 1.5]);
        assert_eq!(compare_desc(f64::NAN, 1.0), Ordering::Equal);
    }
}
