pub mod delayed_task;
pub mod errors;
pub mod time;

pub use delayed_task::DelayedTask;
pub use errors::PlaybackError;
pub use time::format_time;
