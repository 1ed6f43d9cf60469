//! Age/sex bands and demographic interactions.

use crate::beneficiary::Beneficiary;
use crate::error::InputError;

/// An inclusive age range with the label used in category names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    /// Lowest age in the band.
    pub lower: u32,
    /// Highest age in the band; `None` for the open-ended top band.
    pub upper: Option<u32>,
    /// Label, e.g. `65_69`, `67` or `95_GT`.
    pub label: &'static str,
}

impl AgeBand {
    /// A closed band.
    pub const fn between(lower: u32, upper: u32, label: &'static str) -> Self {
        Self {
            lower,
            upper: Some(upper),
            label,
        }
    }

    /// A single-year band.
    pub const fn single(age: u32, label: &'static str) -> Self {
        Self::between(age, age, label)
    }

    /// An open-ended band.
    pub const fn at_least(lower: u32, label: &'static str) -> Self {
        Self {
            lower,
            upper: None,
            label,
        }
    }

    /// Returns true if the band contains the age.
    pub fn contains(&self, age: u32) -> bool {
        age >= self.lower && self.upper.map_or(true, |upper| age <= upper)
    }
}

/// Returns the first band containing the age.
pub fn find_band(bands: &[AgeBand], age: u32) -> Result<&AgeBand, InputError> {
    bands
        .iter()
        .find(|band| band.contains(age))
        .ok_or(InputError::AgeOutsideBands { age })
}

/// How a band category name is built from sex and band label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandNaming {
    /// `{sex}{band}`, e.g. `M65_69`; new enrollees get an `NE` prefix.
    SexBand,
    /// `{sex}AGE_LAST_{band}`, e.g. `FAGE_LAST_35_39`.
    SexAgeLast,
}

/// Member flag a demographic interaction tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeneficiaryFlag {
    /// Originally entitled by disability.
    OriginallyDisabled,
    /// Enrolled in Medicaid.
    Medicaid,
}

impl BeneficiaryFlag {
    fn holds(self, beneficiary: &Beneficiary) -> bool {
        match self {
            Self::OriginallyDisabled => beneficiary.is_originally_disabled(),
            Self::Medicaid => beneficiary.is_medicaid(),
        }
    }
}

/// Name of a demographic interaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionName {
    /// Fixed name.
    Fixed(&'static str),
    /// `{prefix}_{Male|Female}`.
    BySex(&'static str),
}

/// A demographic interaction: a category added whenever a flag holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemographicInteraction {
    /// Flag tested.
    pub flag: BeneficiaryFlag,
    /// Category produced.
    pub name: InteractionName,
}

/// Buckets a member into demographic categories.
#[derive(Debug, Clone, Copy)]
pub struct DemographicClassifier {
    /// Bands for continuing enrollees.
    pub bands: &'static [AgeBand],
    /// Bands for new enrollees, when the model distinguishes them.
    pub new_enrollee_bands: Option<&'static [AgeBand]>,
    /// Category naming scheme.
    pub naming: BandNaming,
    /// Demographic interactions, in reporting order.
    pub interactions: &'static [DemographicInteraction],
}

impl DemographicClassifier {
    /// Returns the band category followed by any demographic interactions.
    pub fn classify(&self, beneficiary: &Beneficiary) -> Result<Vec<String>, InputError> {
        let mut categories = vec![self.band_category(beneficiary)?];
        categories.extend(self.interaction_categories(beneficiary));
        Ok(categories)
    }

    /// Returns the age/sex band category.
    pub fn band_category(&self, beneficiary: &Beneficiary) -> Result<String, InputError> {
        let new_enrollee = beneficiary.is_new_enrollee();
        let bands = match self.new_enrollee_bands {
            Some(bands) if new_enrollee => bands,
            _ => self.bands,
        };
        let band = find_band(bands, beneficiary.age)?;
        let sex = beneficiary.sex.code();

        Ok(match self.naming {
            BandNaming::SexBand if new_enrollee => format!("NE{sex}{}", band.label),
            BandNaming::SexBand => format!("{sex}{}", band.label),
            BandNaming::SexAgeLast => format!("{sex}AGE_LAST_{}", band.label),
        })
    }

    /// Returns the demographic interactions whose flags hold.
    pub fn interaction_categories(&self, beneficiary: &Beneficiary) -> Vec<String> {
        self.interactions
            .iter()
            .filter(|interaction| interaction.flag.holds(beneficiary))
            .map(|interaction| match interaction.name {
                InteractionName::Fixed(name) => name.to_string(),
                InteractionName::BySex(prefix) => format!("{prefix}_{}", beneficiary.sex.label()),
            })
            .collect()
    }
}
