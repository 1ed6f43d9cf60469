//! Raw score sums and model adjustments.

use risk_types::{AppliedFactor, FactorKind};

use crate::category_set::CategorySet;

/// Unadjusted coefficient sums.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawScores {
    /// Sum over every category.
    pub total: f64,
    /// Sum over disease and disease-interaction categories.
    pub disease: f64,
    /// Sum over demographic and demographic-interaction categories.
    pub demographic: f64,
}

impl RawScores {
    /// Sums coefficients in set order.
    pub fn from_categories(categories: &CategorySet) -> Self {
        categories.iter().fold(Self::default(), |mut scores, category| {
            scores.total += category.coefficient;
            if category.kind.is_disease_component() {
                scores.disease += category.coefficient;
            }
            if category.kind.is_demographic_component() {
                scores.demographic += category.coefficient;
            }
            scores
        })
    }
}

/// One arithmetic step of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdjustmentOp {
    /// Multiply by a factor.
    Multiply(f64),
    /// Divide by a factor.
    Divide(f64),
}

impl AdjustmentOp {
    /// The factor, whichever way it is applied.
    pub fn factor(self) -> f64 {
        match self {
            Self::Multiply(factor) | Self::Divide(factor) => factor,
        }
    }
}

/// An operation followed by rounding to `precision` decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentStep {
    /// Published factor the step applies.
    pub kind: FactorKind,
    /// Operation.
    pub op: AdjustmentOp,
    /// Decimal places kept after the operation.
    pub precision: u32,
}

/// An ordered chain of rounded steps turning a raw score into a final score.
///
/// Each step rounds before the next runs; rounding only once at the end
/// gives different results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Adjustment {
    steps: Vec<AdjustmentStep>,
}

impl Adjustment {
    /// An adjustment that returns its input.
    pub fn identity() -> Self {
        Self::default()
    }

    /// Appends a multiply-then-round step.
    pub fn multiply(mut self, kind: FactorKind, factor: f64, precision: u32) -> Self {
        self.steps.push(AdjustmentStep {
            kind,
            op: AdjustmentOp::Multiply(factor),
            precision,
        });
        self
    }

    /// Appends a divide-then-round step.
    pub fn divide(mut self, kind: FactorKind, factor: f64, precision: u32) -> Self {
        self.steps.push(AdjustmentStep {
            kind,
            op: AdjustmentOp::Divide(factor),
            precision,
        });
        self
    }

    /// Steps in application order.
    pub fn steps(&self) -> &[AdjustmentStep] {
        &self.steps
    }

    /// The factors applied, for reporting alongside a result.
    pub fn factors(&self) -> Vec<AppliedFactor> {
        self.steps
            .iter()
            .map(|step| AppliedFactor {
                kind: step.kind,
                value: step.op.factor(),
                precision: step.precision,
            })
            .collect()
    }

    /// Applies every step in order.
    pub fn apply(&self, raw: f64) -> f64 {
        self.steps.iter().fold(raw, |value, step| {
            let value = match step.op {
                AdjustmentOp::Multiply(factor) => value * factor,
                AdjustmentOp::Divide(factor) => value / factor,
            };
            round_to(value, step.precision)
        })
    }
}

/// Rounds to `digits` decimal places using the exact binary value of the input.
///
/// Matches the published calculators: `2.675` rounds to `2.67` because the
/// nearest double lies just below the midpoint.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let digits = digits as usize;
    format!("{value:.digits$}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_types::{Category, CategoryDefinition, CategoryKind};

    fn category(name: &str, kind: CategoryKind, coefficient: f64) -> Category {
        Category::new(name, &CategoryDefinition::new(kind, name), coefficient)
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.080268, 4), 1.0803);
        assert_eq!(round_to(0.94265, 3), 0.943);
        assert_eq!(round_to(2.675, 2), 2.67);
        assert_eq!(round_to(1.284, 3), 1.284);
        assert_eq!(round_to(-0.12345, 2), -0.12);
        assert!(round_to(f64::NAN, 2).is_nan());
    }

    #[test]
    fn test_medicare_rounding_order() {
        let adjustment = Adjustment::identity()
            .multiply(FactorKind::CodingIntensity, 0.941, 4)
            .divide(FactorKind::Normalization, 1.146, 4);
        assert_eq!(adjustment.apply(1.148), 0.9427);

        // Rounding once at the end lands on a different value.
        assert_eq!(round_to(1.148 * 0.941 / 1.146, 4), 0.9426);
    }

    #[test]
    fn test_commercial_csr() {
        let adjustment = Adjustment::identity().multiply(FactorKind::CostSharingReduction, 1.07, 3);
        assert_eq!(adjustment.apply(1.2), 1.284);
        assert_eq!(adjustment.steps().len(), 1);
        assert_eq!(Adjustment::identity().apply(0.123456), 0.123456);
    }

    #[test]
    fn test_factors_reported_in_order() {
        let adjustment = Adjustment::identity()
            .multiply(FactorKind::CodingIntensity, 0.941, 4)
            .divide(FactorKind::Normalization, 1.146, 4);

        let factors = adjustment.factors();
        assert_eq!(
            factors,
            vec![
                AppliedFactor { kind: FactorKind::CodingIntensity, value: 0.941, precision: 4 },
                AppliedFactor { kind: FactorKind::Normalization, value: 1.146, precision: 4 },
            ]
        );
        assert!(Adjustment::identity().factors().is_empty());
    }

    #[test]
    fn test_raw_scores_by_kind() {
        let set: CategorySet = vec![
            category("M65_69", CategoryKind::Demographic, 0.3),
            category("OriginallyDisabled_Male", CategoryKind::DemographicInteraction, 0.2),
            category("HCC18", CategoryKind::Disease, 0.3),
            category("DIABETES_CHF", CategoryKind::DiseaseInteraction, 0.1),
            category("D2", CategoryKind::Count, 0.05),
            category("G01", CategoryKind::Group, 0.4),
            category("RXC_06", CategoryKind::Rx, 0.25),
        ]
        .into_iter()
        .collect();

        let scores = RawScores::from_categories(&set);
        assert!((scores.total - 1.6).abs() < 1e-12);
        assert!((scores.disease - 0.4).abs() < 1e-12);
        assert!((scores.demographic - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set_scores_zero() {
        assert_eq!(RawScores::from_categories(&CategorySet::new()), RawScores::default());
    }
}
