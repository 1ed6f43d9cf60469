//! Rules shared by the Medicare CMS-HCC versions.

use chrono::NaiveDate;
use risk_types::{well_known, FactorKind, ModelVersion};

use crate::aggregate::Adjustment;
use crate::demographics::AgeBand;
use crate::interactions::{CountBucket, CountRule};

/// Continuing-enrollee bands.
pub(super) const BANDS: &[AgeBand] = &[
    AgeBand::between(0, 34, "0_34"),
    AgeBand::between(35, 44, "35_44"),
    AgeBand::between(45, 54, "45_54"),
    AgeBand::between(55, 59, "55_59"),
    AgeBand::between(60, 64, "60_64"),
    AgeBand::between(65, 69, "65_69"),
    AgeBand::between(70, 74, "70_74"),
    AgeBand::between(75, 79, "75_79"),
    AgeBand::between(80, 84, "80_84"),
    AgeBand::between(85, 89, "85_89"),
    AgeBand::between(90, 94, "90_94"),
    AgeBand::at_least(95, "95_GT"),
];

/// New-enrollee bands: single years around first eligibility.
pub(super) const NEW_ENROLLEE_BANDS: &[AgeBand] = &[
    AgeBand::between(0, 34, "0_34"),
    AgeBand::between(35, 44, "35_44"),
    AgeBand::between(45, 54, "45_54"),
    AgeBand::between(55, 59, "55_59"),
    AgeBand::between(60, 64, "60_64"),
    AgeBand::single(65, "65"),
    AgeBand::single(66, "66"),
    AgeBand::single(67, "67"),
    AgeBand::single(68, "68"),
    AgeBand::single(69, "69"),
    AgeBand::between(70, 74, "70_74"),
    AgeBand::between(75, 79, "75_79"),
    AgeBand::between(80, 84, "80_84"),
    AgeBand::between(85, 89, "85_89"),
    AgeBand::between(90, 94, "90_94"),
    AgeBand::at_least(95, "95_GT"),
];

const PAYMENT_BUCKETS: &[CountBucket] = &[
    CountBucket::numbered(1, 9, "D"),
    CountBucket::at_least(10, "D10P"),
];

/// Disease count: `D1`..`D9`, then `D10P`.
pub(super) const PAYMENT_COUNT: &[CountRule] = &[CountRule::always(PAYMENT_BUCKETS)];

/// COPD, bronchitis and emphysema codes shared by the V24 and V28 edits.
pub(super) const CHRONIC_LUNG_CODES: &[&str] = &[
    "J410", "J411", "J418", "J42", "J430", "J431", "J432", "J438", "J439", "J440", "J441", "J449",
    "J982", "J983",
];

/// Coding intensity adjuster for a payment year.
pub(super) fn coding_intensity(year: u16) -> Option<f64> {
    matches!(year, 2020..=2025).then_some(0.941)
}

/// Normalization factor for a version and payment year.
pub(super) fn normalization(version: ModelVersion, year: u16) -> Option<f64> {
    match (version, year) {
        (ModelVersion::MedicareV24, 2020) => Some(1.069),
        (ModelVersion::MedicareV24, 2021) => Some(1.097),
        (ModelVersion::MedicareV24, 2022) => Some(1.118),
        (ModelVersion::MedicareV24, 2023) => Some(1.127),
        (ModelVersion::MedicareV24, 2024) => Some(1.146),
        (ModelVersion::MedicareV24, 2025) => Some(1.153),
        (ModelVersion::MedicareV28, 2024) => Some(1.015),
        (ModelVersion::MedicareV28, 2025) => Some(1.045),
        _ => None,
    }
}

/// Coding intensity then normalization, each rounded to four places.
pub(super) fn adjustment(version: ModelVersion, year: u16) -> Adjustment {
    let intensity = coding_intensity(year).unwrap_or_else(|| {
        tracing::warn!(year, "no coding intensity adjuster, using 1.0");
        1.0
    });
    let normalization = normalization(version, year).unwrap_or_else(|| {
        tracing::warn!(%version, year, "no normalization factor, using 1.0");
        1.0
    });
    Adjustment::identity()
        .multiply(FactorKind::CodingIntensity, intensity, 4)
        .divide(FactorKind::Normalization, normalization, 4)
}

/// February 1 of the model year.
pub(super) fn reference_date(year: u16) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(
        i32::from(year),
        well_known::MEDICARE_REFERENCE_MONTH,
        well_known::MEDICARE_REFERENCE_DAY,
    )
}
