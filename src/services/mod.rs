pub mod roster;
pub mod scheduler;
pub mod session;

pub use roster::{RenderedRoster, RosterService};
pub use scheduler::{HttpScheduleService, ScheduleService, SchedulerError};
pub use session::{SessionSnapshot, SessionState, SessionStore};
