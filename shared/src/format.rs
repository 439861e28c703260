use chrono::{DateTime, Utc};

use crate::models::Price;

pub const PREVIEW_LEN: usize = 100;

/// Filled and empty stars, e.g. `★★★☆☆`.
pub fn stars(rating: f32) -> String {
    let filled = rating.round().clamp(0.0, 5.0) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

pub fn price_label(price: &Price) -> String {
    if price.is_free() {
        "Free".to_string()
    } else {
        format!("₹{:.2}", price.amount())
    }
}

/// Cut at a char boundary and append `...` when longer than `max` chars.
pub fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((end, _)) => format!("{}...", &text[..end]),
        None => text.to_string(),
    }
}

pub fn date(value: Option<&DateTime<Utc>>) -> String {
    value
        .map(|d| d.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn hours(n: u32) -> String {
    if n == 1 {
        "1 hour".to_string()
    } else {
        format!("{n} hours")
    }
}

pub fn minutes(n: u32) -> String {
    format!("{n} min")
}

pub fn role_label(is_teacher: bool, is_semi_admin: bool) -> &'static str {
    match (is_semi_admin, is_teacher) {
        (true, _) => "Admin",
        (false, true) => "Teacher",
        (false, false) => "Student",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse_timestamp;

    #[test]
    fn star_strings() {
        assert_eq!(stars(3.6), "★★★★☆");
        assert_eq!(stars(0.0), "☆☆☆☆☆");
        assert_eq!(stars(9.0), "★★★★★");
    }

    #[test]
    fn prices() {
        assert_eq!(price_label(&Price::new("0.00")), "Free");
        assert_eq!(price_label(&Price::new("499")), "₹499.00");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("short", PREVIEW_LEN), "short");
        let long = "é".repeat(120);
        let cut = truncate(&long, PREVIEW_LEN);
        assert_eq!(cut.chars().count(), 103);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn dates() {
        let ts = parse_timestamp("2025-01-05T10:00:00Z");
        assert_eq!(date(ts.as_ref()), "Jan 05, 2025");
        assert_eq!(date(None), "N/A");
    }

    #[test]
    fn roles() {
        assert_eq!(role_label(true, true), "Admin");
        assert_eq!(role_label(true, false), "Teacher");
        assert_eq!(role_label(false, false), "Student");
    }
}
