mod cards;
pub mod document;
pub mod html;
mod stats;
pub mod time;

use crate::app::{ViewMode, ViewState};
use crate::config::PanelConfig;

pub use cards::EMPTY_STATE;

/// Rendering knobs that come from configuration rather than view state
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub date_format: String,
    /// Whether the optional copilot export control exists
    pub copilot_export: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_config(&PanelConfig::default())
    }
}

impl RenderOptions {
    pub fn from_config(config: &PanelConfig) -> Self {
        Self {
            date_format: config.display.date_format.clone(),
            copilot_export: config.features.copilot_export,
        }
    }
}

/// Every region of the panel after one render pass.
/// A host shim can patch each region in place; `document::to_document` stitches them into a page.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPanel {
    pub stats: String,
    pub tag_options: String,
    pub list: String,
    pub view_mode: ViewMode,
    pub selected_count: usize,
    pub export_selected_enabled: bool,
    pub all_selected: bool,
    pub copilot_export: bool,
}

/// Render the entire panel from state
pub fn render_panel(state: &ViewState, opts: &RenderOptions, now_ms: i64) -> RenderedPanel {
    let selected_count = state.selection.len();
    RenderedPanel {
        stats: stats::render_stats(&state.stats),
        tag_options: stats::render_tag_options(&state.stats.tags),
        list: cards::render_list(state, opts, now_ms),
        view_mode: state.view_mode,
        selected_count,
        export_selected_enabled: selected_count > 0,
        all_selected: state.all_selected(),
        copilot_export: opts.copilot_export,
    }
}
