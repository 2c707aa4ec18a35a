//! Scheduling engine: scoring, search, residual adjustment, and coordination.

pub mod adjuster;
/// Multi-appliance sequential placement.
pub mod coordinator;
pub mod error;
/// Best-start search over a production series.
pub mod finder;
pub mod options;
pub mod schedule;
/// Window alignment scoring.
pub mod scorer;
pub mod series;
pub mod summary;

// Re-export the main types for convenience
pub use adjuster::SeriesAdjuster;
pub use coordinator::ScheduleCoordinator;
pub use error::ScheduleError;
pub use finder::{Candidate, OptimalStartFinder, SearchRange};
pub use options::{EngineOptions, OutputMode, Sequencing, WindowFallback};
pub use schedule::{NO_FEASIBLE_WINDOW, Outcome, Schedule, ScheduleEntry, TIME_FORMAT};
pub use scorer::{CycleWindow, ScoringMode, WindowScorer};
pub use series::{ProductionSample, ProductionSeries};
pub use summary::DailySummary;
