use crate::model::{Annotation, StatsSnapshot};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Host → View ──

/// Full replacement of the panel's domain data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub annotations: Vec<Annotation>,
    pub stats: StatsSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HostMessage {
    UpdateAnnotations(Snapshot),
}

pub const UPDATE_ANNOTATIONS: &str = "updateAnnotations";

/// Parse one message from the host.
///
/// Returns `Ok(None)` for commands the view does not consume. Fields are read
/// leniently: a `null` or mistyped field of an annotation or of `stats` reads as
/// its default, and only annotation entries that are not JSON objects are dropped.
pub fn parse_host_message(raw: &str) -> Result<Option<HostMessage>> {
    let value: Value = serde_json::from_str(raw).context("host message is not valid JSON")?;
    host_message_from_value(value)
}

pub fn host_message_from_value(mut value: Value) -> Result<Option<HostMessage>> {
    let command = value
        .get("command")
        .and_then(Value::as_str)
        .context("host message has no command")?;
    if command != UPDATE_ANNOTATIONS {
        tracing::debug!(command, "ignoring host command");
        return Ok(None);
    }

    let annotations = match value.get_mut("annotations").map(Value::take) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| {
                if !item.is_object() {
                    tracing::warn!(entry = %item, "dropping non-object annotation entry");
                    return None;
                }
                // Fields are individually lenient, so an object always yields a card
                serde_json::from_value::<Annotation>(item)
                    .map_err(|err| tracing::warn!(%err, "dropping unreadable annotation"))
                    .ok()
            })
            .collect(),
        _ => Vec::new(),
    };

    let stats = match value.get_mut("stats").map(Value::take) {
        Some(v @ Value::Object(_)) => serde_json::from_value::<StatsSnapshot>(v).unwrap_or_default(),
        _ => StatsSnapshot::default(),
    };

    Ok(Some(HostMessage::UpdateAnnotations(Snapshot { annotations, stats })))
}

// ── View → Host ──

/// One-way notification describing an action the user asked for.
/// No response is awaited; the host answers, if at all, with a new snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Intent {
    Search { query: String },
    FilterByStatus { status: String },
    FilterByTag { tag: String },
    ClearFilters,
    AddAnnotation,
    Export,
    ExportCopilot,
    ExportSelected { ids: Vec<String> },
    ResolveAll,
    DeleteResolved,
    GoToAnnotation { id: String },
    ViewAnnotation { id: String },
    EditAnnotation { id: String },
    ToggleResolved { id: String },
    RemoveAnnotation { id: String },
    ShowShortcuts,
    Refresh,
}

impl Intent {
    pub fn command(&self) -> &'static str {
        match self {
            Intent::Search { .. } => "search",
            Intent::FilterByStatus { .. } => "filterByStatus",
            Intent::FilterByTag { .. } => "filterByTag",
            Intent::ClearFilters => "clearFilters",
            Intent::AddAnnotation => "addAnnotation",
            Intent::Export => "export",
            Intent::ExportCopilot => "exportCopilot",
            Intent::ExportSelected { .. } => "exportSelected",
            Intent::ResolveAll => "resolveAll",
            Intent::DeleteResolved => "deleteResolved",
            Intent::GoToAnnotation { .. } => "goToAnnotation",
            Intent::ViewAnnotation { .. } => "viewAnnotation",
            Intent::EditAnnotation { .. } => "editAnnotation",
            Intent::ToggleResolved { .. } => "toggleResolved",
            Intent::RemoveAnnotation { .. } => "removeAnnotation",
            Intent::ShowShortcuts => "showShortcuts",
            Intent::Refresh => "refresh",
        }
    }
}
