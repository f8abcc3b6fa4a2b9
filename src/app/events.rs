//! Declarative event binding.
//!
//! Rendered markup tags every interactive element with a `data-action`
//! attribute (plus `data-id` on card controls) and every form control with a
//! `data-bind` name. The webview forwards raw events as [`DomEvent`]s and this
//! module maps them to [`UiAction`]s without ever querying the document.

use super::ViewMode;
use serde::{Deserialize, Serialize};

/// `data-action` values shared by the renderer and the binding layer
pub mod action {
    pub const CLEAR_FILTERS: &str = "clearFilters";
    pub const ADD: &str = "add";
    pub const EXPORT: &str = "export";
    pub const EXPORT_COPILOT: &str = "exportCopilot";
    pub const EXPORT_SELECTED: &str = "exportSelected";
    pub const SELECT_ALL: &str = "selectAll";
    pub const RESOLVE_ALL: &str = "resolveAll";
    pub const DELETE_RESOLVED: &str = "deleteResolved";
    pub const VIEW_GROUPED: &str = "viewGrouped";
    pub const VIEW_LIST: &str = "viewList";
    pub const SELECT: &str = "select";
    pub const OPEN: &str = "open";
    pub const VIEW: &str = "view";
    pub const EDIT: &str = "edit";
    pub const TOGGLE_RESOLVED: &str = "toggleResolved";
    pub const REMOVE: &str = "remove";
}

/// `data-bind` names of the toolbar form controls
pub mod bind {
    pub const SEARCH: &str = "search";
    pub const STATUS: &str = "status";
    pub const TAG: &str = "tag";
}

// ── Raw events ──

/// One element on the path from the event target up to the document,
/// reduced to its binding attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionTarget {
    pub action: String,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPress {
    pub key: String,
    #[serde(default)]
    pub ctrl_key: bool,
    #[serde(default)]
    pub meta_key: bool,
    #[serde(default)]
    pub shift_key: bool,
    #[serde(default)]
    pub alt_key: bool,
    /// Set when focus is inside an input or textarea
    #[serde(default)]
    pub in_text_field: bool,
}

/// A browser event as forwarded by the webview shim
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DomEvent {
    /// `path` lists tagged elements innermost first
    Click {
        #[serde(default)]
        path: Vec<ActionTarget>,
    },
    Input {
        bind: String,
        #[serde(default)]
        value: String,
    },
    Change {
        bind: String,
        #[serde(default)]
        value: String,
    },
    Keydown(KeyPress),
}

// ── Resolved actions ──

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardCommand {
    View,
    Edit,
    ToggleResolved,
    Remove,
}

/// What the user asked for, independent of how it was triggered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Search(String),
    FilterByStatus(String),
    FilterByTag(String),
    ClearFilters,
    AddAnnotation,
    Export,
    ExportCopilot,
    ExportSelected,
    ResolveAll,
    DeleteResolved,
    ShowShortcuts,
    ToggleSelectAll,
    SetViewMode(ViewMode),
    ToggleSelection(String),
    OpenCard(String),
    Card(CardCommand, String),
}

impl DomEvent {
    pub fn resolve(&self) -> Option<UiAction> {
        match self {
            // Only the innermost tagged element handles a click, so a button
            // inside a card never also opens the card.
            DomEvent::Click { path } => path.first().and_then(resolve_click),
            DomEvent::Input { bind, value } | DomEvent::Change { bind, value } => {
                resolve_bound_value(bind, value)
            }
            DomEvent::Keydown(key) => resolve_key(key),
        }
    }
}

fn resolve_click(target: &ActionTarget) -> Option<UiAction> {
    let id = || target.id.clone();
    let action = match target.action.as_str() {
        action::CLEAR_FILTERS => UiAction::ClearFilters,
        action::ADD => UiAction::AddAnnotation,
        action::EXPORT => UiAction::Export,
        action::EXPORT_COPILOT => UiAction::ExportCopilot,
        action::EXPORT_SELECTED => UiAction::ExportSelected,
        action::SELECT_ALL => UiAction::ToggleSelectAll,
        action::RESOLVE_ALL => UiAction::ResolveAll,
        action::DELETE_RESOLVED => UiAction::DeleteResolved,
        action::VIEW_GROUPED => UiAction::SetViewMode(ViewMode::Grouped),
        action::VIEW_LIST => UiAction::SetViewMode(ViewMode::List),
        action::SELECT => UiAction::ToggleSelection(id()?),
        action::OPEN => UiAction::OpenCard(id()?),
        action::VIEW => UiAction::Card(CardCommand::View, id()?),
        action::EDIT => UiAction::Card(CardCommand::Edit, id()?),
        action::TOGGLE_RESOLVED => UiAction::Card(CardCommand::ToggleResolved, id()?),
        action::REMOVE => UiAction::Card(CardCommand::Remove, id()?),
        other => {
            tracing::debug!(action = other, "unbound click action");
            return None;
        }
    };
    Some(action)
}

fn resolve_bound_value(name: &str, value: &str) -> Option<UiAction> {
    let value = value.to_string();
    match name {
        bind::SEARCH => Some(UiAction::Search(value)),
        bind::STATUS => Some(UiAction::FilterByStatus(value)),
        bind::TAG => Some(UiAction::FilterByTag(value)),
        _ => None,
    }
}

/// Keyboard surface: Ctrl/Cmd+Shift+A adds, Ctrl/Cmd+E exports, bare `?` shows shortcuts
pub fn resolve_key(key: &KeyPress) -> Option<UiAction> {
    let chord = key.ctrl_key || key.meta_key;
    if chord && key.shift_key && key.key.eq_ignore_ascii_case("a") {
        return Some(UiAction::AddAnnotation);
    }
    if chord && !key.shift_key && key.key.eq_ignore_ascii_case("e") {
        return Some(UiAction::Export);
    }
    // `?` needs Shift on most layouts, so Shift is allowed here
    if key.key == "?" && !chord && !key.alt_key && !key.in_text_field {
        return Some(UiAction::ShowShortcuts);
    }
    None
}
