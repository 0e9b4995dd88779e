mod panel;
mod records;
mod results;

pub use panel::{EducationTier, Household, HouseholdId, HouseholdObservation, WealthMeasure};
pub use records::{BalanceAnswer, RawRecord, SURVEY_COLUMNS};
pub use results::{
    DistributionOutput, DistributionReport, InitialIncomeMoments, LORENZ_THRESHOLDS, LorenzPoint,
    TierReport,
};
