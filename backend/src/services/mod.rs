//! Business logic services for the Replenishment Dashboard

pub mod planning;
pub mod reporting;
pub mod spreadsheet;

pub use planning::PlanningService;
pub use reporting::ReportingService;
