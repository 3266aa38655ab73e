//! Sugar model — pure functions over a cached product.
//!
//! The "saving" of a sugar-free product is measured against a fixed
//! reference sugary drink (the nemesis): choosing a sugar-free substitute
//! at serving volume V avoids `V / 100 × nemesis_sugar_per_100ml` grams.
//! A product counts as sugar-free below 0.5 g sugar per 100 g/mL, the
//! labelling threshold.
//!
//! Malformed numeric fields never fail — they degrade to the documented
//! defaults (missing sugar reads as 0, unparseable serving as 330 mL).

use crate::catalog::Product;
use crate::config::{EngineConfig, IntakeSource};

/// Products at or above this sugars_100g are treated as sugary.
pub const SUGAR_FREE_THRESHOLD_G: f64 = 0.5;

/// Serving volume in mL, parsed as the first digit run embedded in the
/// free-text serving size (`"330ml"` → 330, `"Bottle 500 ml"` → 500).
/// Falls back to `default_ml` when the field is absent or has no digits.
pub fn serving_ml(product: &Product, default_ml: f64) -> f64 {
    let Some(text) = product.serving_size.as_deref() else {
        return default_ml;
    };
    parse_leading_int(text).unwrap_or(default_ml)
}

/// First contiguous run of ASCII digits in `text`, as f64.
fn parse_leading_int(text: &str) -> Option<f64> {
    let start = text.find(|c: char| c.is_ascii_digit())?;
    let rest = &text[start..];
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    rest[..end].parse::<f64>().ok()
}

/// Grams of sugar avoided by choosing this product over the nemesis
/// drink at the product's serving volume. Zero for sugary products.
pub fn sugar_saving(product: &Product, cfg: &EngineConfig) -> f64 {
    let per_100 = product.nutriments.sugars_100g.unwrap_or(0.0);
    if per_100 < SUGAR_FREE_THRESHOLD_G {
        serving_ml(product, cfg.default_serving_ml) / 100.0 * cfg.nemesis_sugar_per_100ml
    } else {
        0.0
    }
}

/// Grams of sugar actually consumed by logging this product, per the
/// configured intake source.
pub fn sugar_intake(product: &Product, cfg: &EngineConfig) -> f64 {
    match cfg.intake_source {
        IntakeSource::ReportedServing => product.nutriments.sugars_serving.unwrap_or(0.0),
        IntakeSource::Computed => {
            serving_ml(product, cfg.default_serving_ml) / 100.0
                * product.nutriments.sugars_100g.unwrap_or(0.0)
        }
    }
}

/// Saving for a logged glass of water: one default serving of a
/// sugar-free drink versus the nemesis.
pub fn water_saving(cfg: &EngineConfig) -> f64 {
    cfg.default_serving_ml / 100.0 * cfg.nemesis_sugar_per_100ml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Nutriments, Product};

    fn product(serving: Option<&str>, sugars_100g: Option<f64>, sugars_serving: Option<f64>) -> Product {
        Product {
            product_name: Some("Test Drink".to_string()),
            serving_size: serving.map(str::to_string),
            nutriments: Nutriments {
                sugars_100g,
                sugars_serving,
            },
        }
    }

    #[test]
    fn serving_parses_first_digit_run() {
        let cfg = EngineConfig::default();
        assert_eq!(serving_ml(&product(Some("330ml"), None, None), cfg.default_serving_ml), 330.0);
        assert_eq!(serving_ml(&product(Some("Bottle 500 ml"), None, None), cfg.default_serving_ml), 500.0);
        assert_eq!(serving_ml(&product(Some("25cl can"), None, None), cfg.default_serving_ml), 25.0);
    }

    #[test]
    fn serving_defaults_when_missing_or_unparseable() {
        let cfg = EngineConfig::default();
        assert_eq!(serving_ml(&product(None, None, None), cfg.default_serving_ml), 330.0);
        assert_eq!(serving_ml(&product(Some("a glass"), None, None), cfg.default_serving_ml), 330.0);
        assert_eq!(serving_ml(&product(Some(""), None, None), cfg.default_serving_ml), 330.0);
    }

    #[test]
    fn sugar_free_drink_saves_against_nemesis() {
        let cfg = EngineConfig::default();
        let zero = product(Some("330ml"), Some(0.0), None);
        let expected = 3.3 * 10.6;
        assert!((sugar_saving(&zero, &cfg) - expected).abs() < 1e-9);

        // Just under the labelling threshold still counts as sugar-free.
        let trace = product(Some("500ml"), Some(0.4), None);
        assert!((sugar_saving(&trace, &cfg) - 5.0 * 10.6).abs() < 1e-9);
    }

    #[test]
    fn sugary_drink_saves_nothing() {
        let cfg = EngineConfig::default();
        let sugary = product(Some("500ml"), Some(11.0), None);
        assert_eq!(sugar_saving(&sugary, &cfg), 0.0);
        let threshold = product(Some("330ml"), Some(0.5), None);
        assert_eq!(sugar_saving(&threshold, &cfg), 0.0);
    }

    #[test]
    fn missing_sugar_field_reads_as_sugar_free() {
        let cfg = EngineConfig::default();
        let unknown = product(Some("330ml"), None, None);
        assert!(sugar_saving(&unknown, &cfg) > 0.0);
    }

    #[test]
    fn intake_reported_serving() {
        let cfg = EngineConfig::default();
        assert_eq!(sugar_intake(&product(None, None, Some(25.0)), &cfg), 25.0);
        assert_eq!(sugar_intake(&product(None, None, None), &cfg), 0.0);
        assert_eq!(sugar_intake(&product(None, None, Some(0.0)), &cfg), 0.0);
    }

    #[test]
    fn intake_computed_from_serving() {
        let cfg = EngineConfig {
            intake_source: IntakeSource::Computed,
            ..EngineConfig::default()
        };
        let p = product(Some("500ml"), Some(11.0), Some(999.0));
        assert!((sugar_intake(&p, &cfg) - 55.0).abs() < 1e-9);
    }

    #[test]
    fn water_matches_one_default_serving() {
        let cfg = EngineConfig::default();
        assert!((water_saving(&cfg) - 34.98).abs() < 1e-9);
    }
}
