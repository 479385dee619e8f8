//! Human-readable formatting for milestone metrics.

use crate::entities::MetricValue;

/// Compact form with one decimal: `21.6K`, `24.0B`. Below 1000 prints as-is.
#[must_use]
pub fn compact_number(n: f64) -> String {
    let abs = n.abs();
    if abs >= 1e9 {
        format!("{:.1}B", n / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", n / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", n / 1e3)
    } else {
        format!("{n}")
    }
}

/// Display label for a metric key.
#[must_use]
pub fn metric_label(key: &str) -> String {
    match key {
        "employees" => "Employees".to_string(),
        "revenue" => "Revenue".to_string(),
        "users" => "Users".to_string(),
        "marketCap" => "Market Cap".to_string(),
        "funding" => "Total Funding".to_string(),
        other => {
            let mut chars = other.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        }
    }
}

/// Display value for a metric. Money-like keys get a `$` prefix.
#[must_use]
pub fn metric_display(key: &str, value: &MetricValue) -> String {
    match (key, value.as_number()) {
        ("revenue" | "marketCap" | "funding", Some(n)) => format!("${}", compact_number(n)),
        ("employees" | "users", Some(n)) => compact_number(n),
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(999.0, "999")]
    #[case(21_600.0, "21.6K")]
    #[case(3_000.0, "3.0K")]
    #[case(2_500_000.0, "2.5M")]
    #[case(24_000_000_000.0, "24.0B")]
    fn compacts(#[case] n: f64, #[case] expected: &str) {
        assert_eq!(compact_number(n), expected);
    }

    #[test]
    fn labels() {
        assert_eq!(metric_label("marketCap"), "Market Cap");
        assert_eq!(metric_label("stores"), "Stores");
        assert_eq!(metric_label(""), "");
    }

    #[test]
    fn money_gets_dollar_sign() {
        assert_eq!(metric_display("revenue", &MetricValue::Number(24e9)), "$24.0B");
        assert_eq!(metric_display("employees", &MetricValue::Number(21_600.0)), "21.6K");
        assert_eq!(metric_display("hq", &MetricValue::from("Cupertino")), "Cupertino");
    }
}
