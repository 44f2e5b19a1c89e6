pub mod mocks;

pub use builders::{ConfigBuilder, TestContext};
pub use mocks::{MockPlayer, PlayerCall, RecordingView, ViewState};
