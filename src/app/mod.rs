pub mod events;
mod state;

pub use events::DomEvent;
pub use state::{PanelView, Selection, ViewMode, ViewState};
