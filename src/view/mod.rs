pub mod state;
pub mod synchronizer;

pub use state::{RefreshPolicy, ToggleState, ViewKind};
pub use synchronizer::ViewSynchronizer;
