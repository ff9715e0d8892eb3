//! Body Mass Index with WHO adult weight categories.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::CalcHubError;
use crate::types::{with_metadata, ComputationOutput};
use crate::validation::{self, HEIGHT, WEIGHT};
use crate::CalcHubResult;

/// Conversion factor for pounds / inches².
const IMPERIAL_FACTOR: Decimal = dec!(703);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilograms and centimetres.
    #[default]
    Metric,
    /// Pounds and inches.
    Imperial,
}

/// Half-open range `[min, max)`; `max == None` is unbounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BmiCategory {
    pub name: &'static str,
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub advice: &'static str,
}

impl BmiCategory {
    pub fn contains(&self, bmi: Decimal) -> bool {
        bmi >= self.min && self.max.map_or(true, |max| bmi < max)
    }
}

pub static CATEGORIES: [BmiCategory; 4] = [
    BmiCategory {
        name: "Underweight",
        min: dec!(0),
        max: Some(dec!(18.5)),
        advice: "Consider consulting with a healthcare provider about healthy weight gain strategies.",
    },
    BmiCategory {
        name: "Normal weight",
        min: dec!(18.5),
        max: Some(dec!(25)),
        advice: "Maintain your healthy lifestyle with balanced diet and regular exercise.",
    },
    BmiCategory {
        name: "Overweight",
        min: dec!(25),
        max: Some(dec!(30)),
        advice: "Consider lifestyle changes like increased physical activity and balanced nutrition.",
    },
    BmiCategory {
        name: "Obese",
        min: dec!(30),
        max: None,
        advice: "Consult with a healthcare provider for personalized weight management advice.",
    },
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BmiInput {
    pub weight: Decimal,
    pub height: Decimal,
    #[serde(default)]
    pub unit: UnitSystem,
}

#[derive(Debug, Clone, Serialize)]
pub struct BmiOutput {
    pub bmi: Decimal,
    pub category: &'static str,
    pub category_min: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_max: Option<Decimal>,
    pub advice: &'static str,
}

/// Raw BMI. Metric height is in centimetres, imperial in inches.
pub fn compute_bmi(weight: Decimal, height: Decimal, unit: UnitSystem) -> CalcHubResult<Decimal> {
    if weight <= Decimal::ZERO || height <= Decimal::ZERO {
        return Err(CalcHubError::InvalidInput {
            field: "weight/height".into(),
            reason: "Invalid weight or height".into(),
        });
    }

    let (height, factor) = match unit {
        UnitSystem::Metric => (height / dec!(100), Decimal::ONE),
        UnitSystem::Imperial => (height, IMPERIAL_FACTOR),
    };
    let squared = height.checked_mul(height).ok_or_else(|| CalcHubError::Overflow {
        context: "height squared".into(),
    })?;
    let ratio = weight.checked_div(squared).ok_or_else(|| CalcHubError::DivisionByZero {
        context: "BMI height squared".into(),
    })?;
    ratio.checked_mul(factor).ok_or_else(|| CalcHubError::Overflow {
        context: "BMI".into(),
    })
}

/// First category whose range contains `bmi`, falling back to the first one.
pub fn categorize(bmi: Decimal) -> &'static BmiCategory {
    CATEGORIES
        .iter()
        .find(|c| c.contains(bmi))
        .unwrap_or(&CATEGORIES[0])
}

pub fn calculate_bmi(input: &BmiInput) -> CalcHubResult<ComputationOutput<BmiOutput>> {
    let start = Instant::now();
    validation::validate_all(&[(Some(input.weight), &WEIGHT), (Some(input.height), &HEIGHT)])?;

    let bmi = compute_bmi(input.weight, input.height, input.unit)?;
    let category = categorize(bmi);

    let output = BmiOutput {
        bmi,
        category: category.name,
        category_min: category.min,
        category_max: category.max,
        advice: category.advice,
    };

    let methodology = match input.unit {
        UnitSystem::Metric => "BMI = kg / m²",
        UnitSystem::Imperial => "BMI = 703 × lb / in²",
    };
    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(methodology, input, Vec::new(), elapsed, output))
}
