//! Display formatting for cards and the details panel.

use chrono::{Datelike, NaiveDate};

use cinebrowse_api::catalog::CatalogItem;

/// Formats a number with thousands separators (e.g. 169940 -> "169,940").
#[must_use]
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let len = digits.len();
    let mut out = String::with_capacity(len.saturating_add(len / 3));
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && len.saturating_sub(i).is_multiple_of(3) {
            out.push(',');
        }
        out.push(c);
    }
    out
}

const fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// `YYYY-MM-DD` as `Month Dth YYYY`; unparseable text passes through.
#[must_use]
pub fn release_date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return String::from("Unknown date");
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_or_else(
        |_| String::from(raw),
        |date| {
            format!(
                "{} {}{} {}",
                date.format("%B"),
                date.day(),
                ordinal_suffix(date.day()),
                date.year()
            )
        },
    )
}

/// Vote average with one decimal.
#[must_use]
pub fn rating(vote_average: f64) -> String {
    format!("{vote_average:.1}")
}

/// Minutes as `Xh Ym`.
#[must_use]
pub fn runtime(minutes: Option<u32>) -> Option<String> {
    minutes
        .filter(|m| *m > 0)
        .map(|m| format!("{}h {}m", m / 60, m % 60))
}

/// Trending rank label for 0-based `position`.
#[must_use]
pub fn rank_label(position: usize) -> String {
    format!("#{} Trending", position.saturating_add(1))
}

/// Popularity as a whole view count.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::as_conversions)]
pub fn views(popularity: f64) -> String {
    let whole = if popularity.is_finite() && popularity > 0.0 {
        popularity.round() as u64
    } else {
        0
    };
    format!("{} views", thousands(whole))
}

/// Revenue in dollars; `None` when unknown or zero.
#[must_use]
pub fn revenue(amount: Option<u64>) -> Option<String> {
    amount.filter(|n| *n > 0).map(|n| format!("${}", thousands(n)))
}

/// One-line card summary used by lists and rows.
#[must_use]
pub fn card_line(item: &CatalogItem) -> String {
    format!(
        "{} ({})  ★ {}  {}",
        item.title,
        release_date(item.release_date.as_deref()),
        rating(item.vote_average),
        views(item.popularity)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        // Arrange & Act & Assert
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(100_853_753), "100,853,753");
    }

    #[test]
    fn test_release_date_ordinals() {
        // Arrange & Act & Assert
        assert_eq!(release_date(Some("1999-10-15")), "October 15th 1999");
        assert_eq!(release_date(Some("2024-03-01")), "March 1st 2024");
        assert_eq!(release_date(Some("2024-03-22")), "March 22nd 2024");
        assert_eq!(release_date(Some("2024-03-23")), "March 23rd 2024");
        assert_eq!(release_date(Some("2024-03-11")), "March 11th 2024");
        assert_eq!(release_date(Some("2024-03-12")), "March 12th 2024");
    }

    #[test]
    fn test_release_date_fallbacks() {
        // Arrange & Act & Assert
        assert_eq!(release_date(None), "Unknown date");
        assert_eq!(release_date(Some("")), "Unknown date");
        assert_eq!(release_date(Some("2024")), "2024");
    }

    #[test]
    fn test_runtime() {
        // Arrange & Act & Assert
        assert_eq!(runtime(Some(139)).as_deref(), Some("2h 19m"));
        assert_eq!(runtime(Some(45)).as_deref(), Some("0h 45m"));
        assert_eq!(runtime(Some(0)), None);
        assert_eq!(runtime(None), None);
    }

    #[test]
    fn test_rating_rank_and_views() {
        // Arrange & Act & Assert
        assert_eq!(rating(8.438), "8.4");
        assert_eq!(rank_label(0), "#1 Trending");
        assert_eq!(views(1234.6), "1,235 views");
        assert_eq!(views(f64::NAN), "0 views");
        assert_eq!(revenue(Some(0)), None);
        assert_eq!(revenue(Some(1_000_000)).as_deref(), Some("$1,000,000"));
    }
}
