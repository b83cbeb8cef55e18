mod fetch_outcome;
mod fetch_result;
mod measurement_record;

pub use self::{
    fetch_outcome::FetchOutcome, fetch_result::FetchResult,
    measurement_record::MeasurementRecord,
};
