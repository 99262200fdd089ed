//! Domain layer: readings, commands, session identity and time ranges.
//!
//! These types carry no I/O. The session engine, the reading store and the
//! read view all speak in terms of them.

pub mod command;
pub mod reading;
pub mod session_id;
pub mod time_range;

pub use command::Command;
pub use reading::Reading;
pub use session_id::SessionId;
pub use time_range::TimeRange;
