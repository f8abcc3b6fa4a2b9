use super::events::{CardCommand, DomEvent, UiAction};
use crate::model::{Annotation, StatsSnapshot};
use crate::protocol::{self, HostMessage, Intent, Snapshot};
use crate::transport::Transport;
use crate::ui::{self, RenderOptions, RenderedPanel};
use anyhow::Result;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

// ── Enums ──

/// How the annotation list is laid out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// One section per file, sections sorted by path
    #[default]
    Grouped,
    /// Flat list in host order
    List,
}

impl ViewMode {
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Grouped => "Grouped",
            ViewMode::List => "List",
        }
    }
}

// ── Selection ──

/// Selected annotation ids, kept in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: IndexSet<String>,
}

impl Selection {
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Selected ids in selection order
    pub fn ids(&self) -> Vec<String> {
        self.ids.iter().cloned().collect()
    }

    /// Add the id if absent, remove it if present. Removal keeps the order of the rest.
    pub fn toggle(&mut self, id: &str) {
        if !self.ids.shift_remove(id) {
            self.ids.insert(id.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    fn insert(&mut self, id: &str) {
        if !self.ids.contains(id) {
            self.ids.insert(id.to_string());
        }
    }
}

// ── View State ──

/// Everything the panel remembers between renders
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub annotations: Vec<Annotation>,
    pub stats: StatsSnapshot,
    pub view_mode: ViewMode,
    pub selection: Selection,
    /// False until the first snapshot arrives; nothing is rendered before that
    pub has_snapshot: bool,
}

impl ViewState {
    pub fn new(view_mode: ViewMode) -> Self {
        Self {
            view_mode,
            ..Self::default()
        }
    }

    /// Replace domain data wholesale. Selection survives untouched, so ids
    /// that reappear in a later snapshot come back selected.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.annotations = snapshot.annotations;
        self.stats = snapshot.stats;
        self.has_snapshot = true;
    }

    /// True when there is at least one annotation and every one of them is selected
    pub fn all_selected(&self) -> bool {
        !self.annotations.is_empty()
            && self.annotations.iter().all(|a| self.selection.contains(&a.id))
    }

    /// Select every visible annotation, or clear the selection if all are already selected
    pub fn toggle_select_all(&mut self) {
        if self.all_selected() {
            self.selection.clear();
        } else {
            for a in &self.annotations {
                self.selection.insert(&a.id);
            }
        }
    }

    /// Returns true if the mode actually changed
    pub fn set_view_mode(&mut self, mode: ViewMode) -> bool {
        if self.view_mode == mode {
            return false;
        }
        self.view_mode = mode;
        true
    }
}

// ── Panel ──

/// The annotation panel: owns view state and relays user intents to the host
pub struct PanelView<T: Transport> {
    pub state: ViewState,
    pub options: RenderOptions,
    transport: T,
}

impl<T: Transport> PanelView<T> {
    /// Create the panel and ask the host for its first snapshot
    pub fn open(transport: T, view_mode: ViewMode, options: RenderOptions) -> Self {
        let mut panel = Self {
            state: ViewState::new(view_mode),
            options,
            transport,
        };
        panel.post(Intent::Refresh);
        panel
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Fire-and-forget: a failed post is logged and otherwise ignored
    fn post(&mut self, intent: Intent) {
        tracing::debug!(command = intent.command(), "posting intent");
        if let Err(err) = self.transport.post(&intent) {
            tracing::warn!(command = intent.command(), "failed to post intent: {:#}", err);
        }
    }

    /// Apply a message from the host. Returns true if the panel needs a re-render.
    pub fn receive(&mut self, msg: HostMessage) -> bool {
        match msg {
            HostMessage::UpdateAnnotations(snapshot) => {
                tracing::debug!(
                    annotations = snapshot.annotations.len(),
                    total = snapshot.stats.total,
                    "applying snapshot"
                );
                self.state.apply_snapshot(snapshot);
                true
            }
        }
    }

    /// Parse and apply a raw JSON message from the host
    pub fn receive_raw(&mut self, raw: &str) -> Result<bool> {
        Ok(match protocol::parse_host_message(raw)? {
            Some(msg) => self.receive(msg),
            None => false,
        })
    }

    /// Resolve a raw webview event through the binding layer and dispatch it
    pub fn handle_event(&mut self, event: &DomEvent) -> bool {
        match event.resolve() {
            Some(action) => self.dispatch(action),
            None => false,
        }
    }

    /// Run one user action. Returns true if local state changed and the panel needs a re-render.
    pub fn dispatch(&mut self, action: UiAction) -> bool {
        match action {
            UiAction::Search(query) => self.post(Intent::Search { query }),
            UiAction::FilterByStatus(status) => self.post(Intent::FilterByStatus { status }),
            UiAction::FilterByTag(tag) => self.post(Intent::FilterByTag { tag }),
            UiAction::ClearFilters => self.post(Intent::ClearFilters),
            UiAction::AddAnnotation => self.post(Intent::AddAnnotation),
            UiAction::Export => self.post(Intent::Export),
            UiAction::ExportCopilot => {
                if self.options.copilot_export {
                    self.post(Intent::ExportCopilot);
                } else {
                    tracing::debug!("copilot export control is disabled, ignoring");
                }
            }
            UiAction::ExportSelected => {
                // The control is disabled while nothing is selected
                if !self.state.selection.is_empty() {
                    let ids = self.state.selection.ids();
                    self.post(Intent::ExportSelected { ids });
                }
            }
            UiAction::ResolveAll => self.post(Intent::ResolveAll),
            UiAction::DeleteResolved => self.post(Intent::DeleteResolved),
            UiAction::ShowShortcuts => self.post(Intent::ShowShortcuts),
            UiAction::OpenCard(id) => self.post(Intent::GoToAnnotation { id }),
            UiAction::Card(command, id) => self.post(match command {
                CardCommand::View => Intent::ViewAnnotation { id },
                CardCommand::Edit => Intent::EditAnnotation { id },
                CardCommand::ToggleResolved => Intent::ToggleResolved { id },
                CardCommand::Remove => Intent::RemoveAnnotation { id },
            }),
            UiAction::ToggleSelection(id) => {
                self.state.selection.toggle(&id);
                return true;
            }
            UiAction::ToggleSelectAll => {
                self.state.toggle_select_all();
                return true;
            }
            UiAction::SetViewMode(mode) => return self.state.set_view_mode(mode),
        }
        false
    }

    /// Render every region of the panel, or None before the first snapshot
    pub fn render(&self, now_ms: i64) -> Option<RenderedPanel> {
        if !self.state.has_snapshot {
            return None;
        }
        Some(ui::render_panel(&self.state, &self.options, now_ms))
    }
}
