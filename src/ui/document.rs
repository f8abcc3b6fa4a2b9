use super::html::flag;
use super::RenderedPanel;
use crate::app::events::{action, bind};
use crate::app::ViewMode;

const STYLE: &str = r#"
body { font-family: var(--vscode-font-family, sans-serif); margin: 0; padding: 8px; }
.toolbar, .view-toggle, .selection-bar { display: flex; gap: 4px; flex-wrap: wrap; margin-bottom: 6px; }
.stats { display: flex; gap: 12px; margin-bottom: 8px; }
.stat { display: flex; flex-direction: column; align-items: center; }
.stat-value { font-weight: bold; }
.file-group-header { display: flex; justify-content: space-between; font-weight: bold; margin: 8px 0 4px; }
.annotation-card { border: 1px solid #444; border-radius: 4px; padding: 6px; margin-bottom: 6px; cursor: pointer; }
.annotation-card.resolved { opacity: 0.7; }
.annotation-card.selected { border-color: #60a5fa; }
.status-badge.resolved { color: #4ade80; }
.status-badge.unresolved { color: #facc15; }
.code-snippet { overflow-x: auto; }
.tag { border-radius: 3px; padding: 0 4px; margin-right: 4px; background: #333; }
.card-footer { display: flex; gap: 8px; align-items: center; }
.card-actions { margin-left: auto; }
.active { font-weight: bold; text-decoration: underline; }
.empty-state { text-align: center; opacity: 0.7; padding: 24px; }
"#;

/// Static toolbar controls. Form controls carry `data-bind`, buttons carry `data-action`.
fn render_toolbar(panel: &RenderedPanel) -> String {
    let mut out = String::from("<div class=\"toolbar\">");
    out.push_str(&format!(
        "<input type=\"text\" id=\"search-input\" placeholder=\"Search annotations...\" data-bind=\"{}\">",
        bind::SEARCH
    ));
    out.push_str(&format!(
        "<select id=\"status-filter\" data-bind=\"{}\">\
<option value=\"all\">All</option>\
<option value=\"unresolved\">Unresolved</option>\
<option value=\"resolved\">Resolved</option></select>",
        bind::STATUS
    ));
    out.push_str(&format!(
        "<select id=\"tag-filter\" data-bind=\"{}\">{}</select>",
        bind::TAG,
        panel.tag_options
    ));
    let mut buttons = vec![
        (action::CLEAR_FILTERS, "Clear Filters"),
        (action::ADD, "Add"),
        (action::EXPORT, "Export"),
    ];
    if panel.copilot_export {
        buttons.push((action::EXPORT_COPILOT, "Export for Copilot"));
    }
    buttons.push((action::RESOLVE_ALL, "Resolve All"));
    buttons.push((action::DELETE_RESOLVED, "Delete Resolved"));
    for (act, label) in buttons {
        out.push_str(&format!("<button data-action=\"{}\">{}</button>", act, label));
    }
    out.push_str("</div>");
    out
}

fn render_selection_bar(panel: &RenderedPanel) -> String {
    format!(
        "<div class=\"selection-bar\">\
<button data-action=\"{}\">{}</button>\
<span class=\"selection-count\">{} selected</span>\
<button data-action=\"{}\"{}>Export Selected</button></div>",
        action::SELECT_ALL,
        if panel.all_selected { "Deselect All" } else { "Select All" },
        panel.selected_count,
        action::EXPORT_SELECTED,
        flag("disabled", !panel.export_selected_enabled)
    )
}

/// Mode selector buttons with the current mode marked active
pub fn render_view_toggle(mode: ViewMode) -> String {
    let mut out = String::from("<div class=\"view-toggle\">");
    for (act, m) in [(action::VIEW_GROUPED, ViewMode::Grouped), (action::VIEW_LIST, ViewMode::List)] {
        out.push_str(&format!(
            "<button class=\"view-btn{}\" data-action=\"{}\">{}</button>",
            if m == mode { " active" } else { "" },
            act,
            m.label()
        ));
    }
    out.push_str("</div>");
    out
}

/// Stitch all regions into a standalone page
pub fn to_document(panel: &RenderedPanel) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
<title>Annotations</title>\n<style>{}</style>\n</head>\n<body>\n\
{}\n<div id=\"stats\">{}</div>\n{}\n{}\n<div id=\"annotations\">{}</div>\n</body>\n</html>\n",
        STYLE,
        render_toolbar(panel),
        panel.stats,
        render_view_toggle(panel.view_mode),
        render_selection_bar(panel),
        panel.list
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel() -> RenderedPanel {
        RenderedPanel {
            stats: "<div class=\"stats\"></div>".into(),
            tag_options: "<option value=\"\">All Tags</option><option value=\"bug\">bug</option>".into(),
            list: "<div class=\"annotation-list\"></div>".into(),
            view_mode: ViewMode::Grouped,
            selected_count: 0,
            export_selected_enabled: false,
            all_selected: false,
            copilot_export: false,
        }
    }

    #[test]
    fn document_contains_every_region() {
        let p = panel();
        let doc = to_document(&p);
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains(&p.stats));
        assert!(doc.contains(&p.tag_options));
        assert!(doc.contains(&p.list));
    }

    #[test]
    fn export_selected_disabled_without_selection() {
        let doc = to_document(&panel());
        assert!(doc.contains("data-action=\"exportSelected\" disabled>"));
        assert!(doc.contains("0 selected"));
    }

    #[test]
    fn export_selected_enabled_with_selection() {
        let p = RenderedPanel {
            selected_count: 2,
            export_selected_enabled: true,
            all_selected: true,
            ..panel()
        };
        let doc = to_document(&p);
        assert!(doc.contains("data-action=\"exportSelected\">"));
        assert!(doc.contains("2 selected"));
        assert!(doc.contains(">Deselect All</button>"));
    }

    #[test]
    fn copilot_button_only_when_enabled() {
        assert!(!to_document(&panel()).contains("exportCopilot"));
        let p = RenderedPanel { copilot_export: true, ..panel() };
        assert!(to_document(&p).contains("data-action=\"exportCopilot\""));
    }

    #[test]
    fn view_toggle_marks_active_mode() {
        let grouped = render_view_toggle(ViewMode::Grouped);
        assert!(grouped.contains("view-btn active\" data-action=\"viewGrouped\""));
        assert!(grouped.contains("view-btn\" data-action=\"viewList\""));
        let list = render_view_toggle(ViewMode::List);
        assert!(list.contains("view-btn active\" data-action=\"viewList\""));
    }
}
