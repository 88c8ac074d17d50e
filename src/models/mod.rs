pub mod appliance;
pub mod coerce;
pub mod report;
pub mod request;

pub use appliance::{Appliance, RecordRejection, Recommendation};
pub use report::{ApplianceReport, BatchReport};
pub use request::CalculateRequest;
