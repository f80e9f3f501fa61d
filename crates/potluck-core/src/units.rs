//! Unit conversion for ingredient quantities.
//!
//! Every ingredient is stored with its entered quantity and unit, plus a
//! metric quantity (grams or millilitres) and an imperial quantity (ounces
//! or fluid ounces) when the unit is one we recognise.

use serde::{Deserialize, Serialize};

pub const GRAMS_PER_OUNCE: f64 = 28.3495;
pub const MILLILITERS_PER_FLUID_OUNCE: f64 = 29.5735;

const GRAMS_PER_KILOGRAM: f64 = 1000.0;
const OUNCES_PER_POUND: f64 = 16.0;
const MILLILITERS_PER_LITER: f64 = 1000.0;
const FLUID_OUNCES_PER_CUP: f64 = 8.0;
const FLUID_OUNCES_PER_TABLESPOON: f64 = 0.5;
const FLUID_OUNCES_PER_TEASPOON: f64 = 1.0 / 6.0;

/// Units with a known conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Gram,
    Kilogram,
    Ounce,
    Pound,
    Milliliter,
    Liter,
    FluidOunce,
    Cup,
    Tablespoon,
    Teaspoon,
}

impl Unit {
    /// Parse a free-text unit. Case and surrounding whitespace are ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let normalized = text.trim().to_ascii_lowercase();
        let unit = match normalized.trim_end_matches('.') {
            "g" | "gram" | "grams" | "gr" => Unit::Gram,
            "kg" | "kilogram" | "kilograms" | "kilo" | "kilos" => Unit::Kilogram,
            "oz" | "ounce" | "ounces" => Unit::Ounce,
            "lb" | "lbs" | "pound" | "pounds" => Unit::Pound,
            "ml" | "milliliter" | "milliliters" | "millilitre" | "millilitres" => Unit::Milliliter,
            "l" | "liter" | "liters" | "litre" | "litres" => Unit::Liter,
            "fl oz" | "floz" | "fl. oz" | "fluid ounce" | "fluid ounces" => Unit::FluidOunce,
            "cup" | "cups" => Unit::Cup,
            "tbsp" | "tablespoon" | "tablespoons" | "tbs" => Unit::Tablespoon,
            "tsp" | "teaspoon" | "teaspoons" => Unit::Teaspoon,
            _ => return None,
        };
        Some(unit)
    }
}

/// Metric and imperial renderings of a quantity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConvertedQuantity {
    /// Grams for mass, millilitres for volume.
    pub metric: Option<f64>,
    /// Ounces for mass, fluid ounces for volume.
    pub imperial: Option<f64>,
}

pub fn grams_to_ounces(grams: f64) -> f64 {
    grams / GRAMS_PER_OUNCE
}

pub fn ounces_to_grams(ounces: f64) -> f64 {
    ounces * GRAMS_PER_OUNCE
}

pub fn milliliters_to_fluid_ounces(ml: f64) -> f64 {
    ml / MILLILITERS_PER_FLUID_OUNCE
}

pub fn fluid_ounces_to_milliliters(fl_oz: f64) -> f64 {
    fl_oz * MILLILITERS_PER_FLUID_OUNCE
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Convert `quantity` expressed in the free-text `unit`.
///
/// Unknown units yield an empty [`ConvertedQuantity`]. Results are rounded
/// to two decimal places.
pub fn convert(quantity: f64, unit: &str) -> ConvertedQuantity {
    let Some(unit) = Unit::parse(unit) else {
        return ConvertedQuantity::default();
    };

    let (metric, imperial) = match unit {
        Unit::Gram => (quantity, grams_to_ounces(quantity)),
        Unit::Kilogram => {
            let grams = quantity * GRAMS_PER_KILOGRAM;
            (grams, grams_to_ounces(grams))
        }
        Unit::Ounce => (ounces_to_grams(quantity), quantity),
        Unit::Pound => {
            let ounces = quantity * OUNCES_PER_POUND;
            (ounces_to_grams(ounces), ounces)
        }
        Unit::Milliliter => (quantity, milliliters_to_fluid_ounces(quantity)),
        Unit::Liter => {
            let ml = quantity * MILLILITERS_PER_LITER;
            (ml, milliliters_to_fluid_ounces(ml))
        }
        Unit::FluidOunce => (fluid_ounces_to_milliliters(quantity), quantity),
        Unit::Cup => {
            let fl_oz = quantity * FLUID_OUNCES_PER_CUP;
            (fluid_ounces_to_milliliters(fl_oz), fl_oz)
        }
        Unit::Tablespoon => {
            let fl_oz = quantity * FLUID_OUNCES_PER_TABLESPOON;
            (fluid_ounces_to_milliliters(fl_oz), fl_oz)
        }
        Unit::Teaspoon => {
            let fl_oz = quantity * FLUID_OUNCES_PER_TEASPOON;
            (fluid_ounces_to_milliliters(fl_oz), fl_oz)
        }
    };

    ConvertedQuantity {
        metric: Some(round_to(metric, 2)),
        imperial: Some(round_to(imperial, 2)),
    }
}
