pub mod plan;
pub mod profile;
pub mod readiness;
pub mod workout;

pub use plan::{DayDetails, DayPlan, SessionType, WeeklyPlan};
pub use profile::{HrZone, UserProfile};
pub use readiness::{ReadinessDefaults, ReadinessSnapshot};
pub use workout::{WorkoutRecord, WorkoutType};
