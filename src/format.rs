// src/format.rs

//! Display formatting for inventory units.
//!
//! Every missing-value fallback lives here: absent prices read
//! "Call for Price", absent measurements "N/A", absent images a placeholder.

use std::sync::LazyLock;

use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

use crate::models::{Condition, InventoryUnit};

pub const CALL_FOR_PRICE: &str = "Call for Price";
pub const NOT_AVAILABLE: &str = "N/A";

/// Inline SVG shown when a unit has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "data:image/svg+xml,%3Csvg xmlns='http://www.w3.org/2000/svg' width='400' height='300' viewBox='0 0 400 300'%3E%3Crect fill='%23e5e7eb' width='400' height='300'/%3E%3Ctext fill='%239ca3af' font-family='system-ui' font-size='16' x='50%25' y='50%25' text-anchor='middle' dy='.3em'%3ENo Image%3C/text%3E%3C/svg%3E";

static NON_SLUG_CHARS: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9]+").ok());

static TRAILING_DIGITS: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(\d+)$").ok());

/// `$12,345`, rounded to whole dollars.
pub fn format_price(price: Option<f64>) -> String {
    match price.filter(|p| p.is_finite()) {
        Some(p) => {
            let sign = if p.round() < 0.0 { "-" } else { "" };
            format!("{}${}", sign, group_digits(p.abs(), 0))
        }
        None => CALL_FOR_PRICE.to_string(),
    }
}

/// `12,345` with up to three decimals, or `N/A`.
pub fn format_number(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let sign = if v < 0.0 && group_digits(v.abs(), 3) != "0" {
                "-"
            } else {
                ""
            };
            format!("{}{}", sign, group_digits(v.abs(), 3))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Thousands-separated rendering of a non-negative value.
fn group_digits(value: f64, max_fraction: usize) -> String {
    let scale = 10f64.powi(max_fraction as i32);
    let rounded = (value * scale).round() / scale;
    let text = format!("{:.*}", max_fraction, rounded);
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let frac = frac_part.trim_end_matches('0');
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// The image URL, or the placeholder when there is none.
pub fn image_url(url: Option<&str>) -> &str {
    url.map(str::trim)
        .filter(|u| !u.is_empty())
        .unwrap_or(PLACEHOLDER_IMAGE)
}

/// Lowercase ASCII words joined by single hyphens.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let Some(re) = NON_SLUG_CHARS.as_ref() else {
        return lower;
    };
    re.replace_all(&lower, "-").trim_matches('-').to_string()
}

/// Detail-page slug: year, make, model, then the unit id,
/// e.g. `2024-grand-design-solitude-1234`.
pub fn unit_slug(unit: &InventoryUnit) -> String {
    let year = unit.year.map(|y| y.to_string());
    let id = unit.id.to_string();
    let parts: Vec<&str> = [
        year.as_deref(),
        unit.make_name(),
        unit.model_name(),
        Some(id.as_str()),
    ]
    .into_iter()
    .flatten()
    .collect();
    slugify(&parts.join(" "))
}

/// The unit id at the end of a slug made by [`unit_slug`].
pub fn parse_unit_id_from_slug(slug: &str) -> Option<u64> {
    let re = TRAILING_DIGITS.as_ref()?;
    re.captures(slug.trim())?.get(1)?.as_str().parse().ok()
}

/// MSRP minus current price, never negative. Zero when either is unknown.
pub fn calculate_savings(msrp: Option<f64>, current: Option<f64>) -> f64 {
    match (msrp, current) {
        (Some(msrp), Some(current)) => (msrp - current).max(0.0),
        _ => 0.0,
    }
}

/// Cut `text` to at most `max_len` characters and append `...`.
///
/// Counts grapheme clusters, so accented letters and emoji are never split.
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let graphemes: Vec<&str> = text.graphemes(true).collect();
    if graphemes.len() <= max_len {
        return text.to_string();
    }
    format!("{}...", graphemes[..max_len].concat().trim_end())
}

/// Condition label, whichever shape the API sent.
pub fn condition_name(condition: Option<&Condition>) -> &str {
    condition.and_then(Condition::name).unwrap_or(NOT_AVAILABLE)
}

/// `2024 Grand Design Solitude`, skipping unknown parts.
pub fn unit_title(unit: &InventoryUnit) -> String {
    let year = unit.year.map(|y| y.to_string());
    let parts: Vec<&str> = [year.as_deref(), unit.make_name(), unit.model_name()]
        .into_iter()
        .flatten()
        .collect();

    if parts.is_empty() {
        format!("Unit #{}", unit.id)
    } else {
        parts.join(" ")
    }
}

/// One line of the side-by-side comparison table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecRow {
    pub label: &'static str,
    /// One cell per unit, in the order the units were given.
    pub values: Vec<String>,
}

/// Zero reads as "not given" for these measurements.
fn with_suffix(value: Option<f64>, suffix: &str) -> String {
    match value.filter(|v| *v != 0.0) {
        Some(v) => format!("{} {}", format_number(Some(v)), suffix),
        None => NOT_AVAILABLE.to_string(),
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// The comparison table for `units`, one column per unit.
pub fn comparison_rows(units: &[InventoryUnit]) -> Vec<SpecRow> {
    let row = |label: &'static str, cell: &dyn Fn(&InventoryUnit) -> String| SpecRow {
        label,
        values: units.iter().map(cell).collect(),
    };

    vec![
        row("Price", &|u| format_price(u.price_current)),
        row("MSRP", &|u| format_price(u.price_msrp)),
        row("Year", &|u| or_na(u.year)),
        row("Condition", &|u| condition_name(u.condition.as_ref()).to_string()),
        row("Type", &|u| or_na(u.classification_name())),
        row("Length", &|u| {
            or_na(
                u.vehicle_body_length
                    .filter(|v| *v != 0.0)
                    .map(|len| format!("{} ft", len.round())),
            )
        }),
        row("Dry Weight", &|u| with_suffix(u.dry_weight, "lbs")),
        row("GVWR", &|u| with_suffix(u.gvwr, "lbs")),
        row("Sleeps", &|u| {
            or_na(
                u.max_sleeping_count
                    .filter(|n| *n != 0)
                    .map(|n| format!("{} people", n)),
            )
        }),
        // Zero slideouts is a real answer
        row("Slideouts", &|u| or_na(u.number_of_slideouts)),
        row("Fresh Water", &|u| {
            with_suffix(u.total_fresh_water_tank_capacity, "gal")
        }),
        row("AC BTU", &|u| {
            or_na(
                u.air_conditioning_btu
                    .filter(|v| *v != 0.0)
                    .map(|btu| format_number(Some(btu))),
            )
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NamedRef;

    fn named(name: &str) -> Option<NamedRef> {
        Some(NamedRef {
            id: None,
            name: Some(name.to_string()),
        })
    }

    fn solitude() -> InventoryUnit {
        InventoryUnit {
            id: 1234,
            year: Some(2024),
            unit_make: named("Grand Design"),
            unit_model: named("Solitude 390RK"),
            price_msrp: Some(98_500.0),
            price_current: Some(84_999.0),
            vehicle_body_length: Some(42.6),
            dry_weight: Some(13_250.0),
            max_sleeping_count: Some(4),
            number_of_slideouts: Some(0),
            ..InventoryUnit::default()
        }
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Some(84_999.0)), "$84,999");
        assert_eq!(format_price(Some(1_234_567.5)), "$1,234,568");
        assert_eq!(format_price(Some(0.0)), "$0");
        assert_eq!(format_price(Some(999.4)), "$999");
        assert_eq!(format_price(None), "Call for Price");
        assert_eq!(format_price(Some(f64::NAN)), "Call for Price");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(13_250.0)), "13,250");
        assert_eq!(format_number(Some(42.5)), "42.5");
        assert_eq!(format_number(Some(1.23456)), "1.235");
        assert_eq!(format_number(Some(-1500.0)), "-1,500");
        assert_eq!(format_number(Some(100.0)), "100");
        assert_eq!(format_number(None), "N/A");
    }

    #[test]
    fn test_image_url_fallback() {
        assert_eq!(
            image_url(Some("https://cdn.example.com/a.jpg")),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(image_url(None), PLACEHOLDER_IMAGE);
        assert_eq!(image_url(Some("  ")), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Grand Design Solitude 390RK"), "grand-design-solitude-390rk");
        assert_eq!(slugify("  --Fifth  Wheel!! "), "fifth-wheel");
        assert_eq!(slugify("Café"), "caf");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_unit_slug_ends_with_id() {
        let unit = solitude();
        let slug = unit_slug(&unit);
        assert_eq!(slug, "2024-grand-design-solitude-390rk-1234");
        assert_eq!(parse_unit_id_from_slug(&slug), Some(1234));

        let bare = InventoryUnit {
            id: 77,
            ..InventoryUnit::default()
        };
        assert_eq!(unit_slug(&bare), "77");
    }

    #[test]
    fn test_parse_unit_id_from_slug() {
        assert_eq!(parse_unit_id_from_slug("2023-keystone-cougar-55"), Some(55));
        assert_eq!(parse_unit_id_from_slug("keystone-cougar"), None);
        assert_eq!(parse_unit_id_from_slug(""), None);
    }

    #[test]
    fn test_calculate_savings() {
        assert_eq!(calculate_savings(Some(98_500.0), Some(84_999.0)), 13_501.0);
        assert_eq!(calculate_savings(Some(50_000.0), Some(55_000.0)), 0.0);
        assert_eq!(calculate_savings(None, Some(10.0)), 0.0);
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("Spacious rear kitchen", 8), "Spacious...");
        assert_eq!(truncate_text("Lots of room here", 8), "Lots of...");
        // "e" plus a combining accent is one grapheme
        assert_eq!(truncate_text("cafe\u{301} latte", 4), "cafe\u{301}...");
    }

    #[test]
    fn test_titles_and_conditions() {
        let mut unit = solitude();
        assert_eq!(unit_title(&unit), "2024 Grand Design Solitude 390RK");
        assert_eq!(condition_name(unit.condition.as_ref()), "N/A");

        unit.condition = Some(Condition::Text("New".to_string()));
        assert_eq!(condition_name(unit.condition.as_ref()), "New");

        let bare = InventoryUnit {
            id: 5,
            ..InventoryUnit::default()
        };
        assert_eq!(unit_title(&bare), "Unit #5");
    }

    #[test]
    fn test_comparison_rows() {
        let other = InventoryUnit {
            id: 2,
            ..InventoryUnit::default()
        };
        let rows = comparison_rows(&[solitude(), other]);

        let labels: Vec<&str> = rows.iter().map(|r| r.label).collect();
        assert_eq!(
            labels,
            vec![
                "Price",
                "MSRP",
                "Year",
                "Condition",
                "Type",
                "Length",
                "Dry Weight",
                "GVWR",
                "Sleeps",
                "Slideouts",
                "Fresh Water",
                "AC BTU"
            ]
        );

        let cell = |label: &str| {
            rows.iter()
                .find(|r| r.label == label)
                .map(|r| r.values.clone())
                .unwrap()
        };
        assert_eq!(cell("Price"), vec!["$84,999", "Call for Price"]);
        assert_eq!(cell("Year"), vec!["2024", "N/A"]);
        assert_eq!(cell("Length"), vec!["43 ft", "N/A"]);
        assert_eq!(cell("Dry Weight"), vec!["13,250 lbs", "N/A"]);
        assert_eq!(cell("Sleeps"), vec!["4 people", "N/A"]);
        assert_eq!(cell("Slideouts"), vec!["0", "N/A"]);
        assert_eq!(cell("AC BTU"), vec!["N/A", "N/A"]);
    }

    #[test]
    fn test_comparison_rows_without_units() {
        let rows = comparison_rows(&[]);
        assert_eq!(rows.len(), 12);
        assert!(rows.iter().all(|r| r.values.is_empty()));
    }
}
