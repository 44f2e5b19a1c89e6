pub mod controls_visibility;
pub mod loading_overlay;
pub mod seek_bar;
pub mod tracing_view;
pub mod view;

pub use controls_visibility::{ControlState, ControlsVisibility, HideStep};
pub use loading_overlay::LoadingOverlay;
pub use seek_bar::SeekBar;
pub use tracing_view::TracingView;
pub use view::{ButtonIcon, PlaybackView, TransportButton, VideoBounds};
