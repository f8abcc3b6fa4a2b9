use super::html::{escape, flag};
use super::time::format_relative;
use super::RenderOptions;
use crate::app::events::action;
use crate::app::{Selection, ViewMode, ViewState};
use crate::model::Annotation;
use std::collections::BTreeMap;

/// Shown instead of the list when the snapshot has no annotations
pub const EMPTY_STATE: &str = "<div class=\"empty-state\">\
<p>No annotations yet</p>\
<p class=\"hint\">Select some code and press Ctrl+Shift+A to add one.</p>\
</div>";

/// Render the annotation list region for the current view mode
pub fn render_list(state: &ViewState, opts: &RenderOptions, now_ms: i64) -> String {
    if state.annotations.is_empty() {
        return EMPTY_STATE.to_string();
    }
    let card = |a: &Annotation| render_card(a, &state.selection, opts, now_ms);

    match state.view_mode {
        ViewMode::List => {
            let mut out = String::from("<div class=\"annotation-list\">");
            for a in &state.annotations {
                out.push_str(&card(a));
            }
            out.push_str("</div>");
            out
        }
        ViewMode::Grouped => {
            let mut out = String::from("<div class=\"annotation-groups\">");
            for (path, group) in group_by_file(&state.annotations) {
                let unresolved = group.iter().filter(|a| !a.resolved).count();
                out.push_str(&format!(
                    "<div class=\"file-group\"><div class=\"file-group-header\">\
<span class=\"file-path\">{}</span><span class=\"file-count\">{}/{}</span></div>",
                    escape(path),
                    unresolved,
                    group.len()
                ));
                for a in group {
                    out.push_str(&card(a));
                }
                out.push_str("</div>");
            }
            out.push_str("</div>");
            out
        }
    }
}

/// Partition by file path; keys come out sorted, members keep host order
fn group_by_file(annotations: &[Annotation]) -> BTreeMap<&str, Vec<&Annotation>> {
    let mut groups: BTreeMap<&str, Vec<&Annotation>> = BTreeMap::new();
    for a in annotations {
        groups.entry(a.file_path.as_str()).or_default().push(a);
    }
    groups
}

fn render_card(a: &Annotation, selection: &Selection, opts: &RenderOptions, now_ms: i64) -> String {
    let id = escape(&a.id);
    let selected = selection.contains(&a.id);
    let (status_class, badge, toggle_label) = if a.resolved {
        ("resolved", "Resolved", "Reopen")
    } else {
        ("unresolved", "Open", "Resolve")
    };

    let mut out = format!(
        "<div class=\"annotation-card {}{}\" data-action=\"{}\" data-id=\"{}\">",
        status_class,
        if selected { " selected" } else { "" },
        action::OPEN,
        id
    );

    out.push_str(&format!(
        "<div class=\"card-header\">\
<input type=\"checkbox\" class=\"select-checkbox\" data-action=\"{}\" data-id=\"{}\"{}>\
<span class=\"status-badge {}\">{}</span>\
<span class=\"location\"><span class=\"file\">{}</span> <span class=\"lines\">{}</span></span></div>",
        action::SELECT,
        id,
        flag("checked", selected),
        status_class,
        badge,
        escape(&a.file_path),
        a.range.line_label()
    ));

    out.push_str(&format!("<div class=\"comment\">{}</div>", escape(&a.comment)));
    out.push_str(&format!(
        "<pre class=\"code-snippet\"><code>{}</code></pre>",
        escape(&a.code_snippet)
    ));

    if !a.tags.is_empty() {
        out.push_str("<div class=\"tags\">");
        for tag in &a.tags {
            out.push_str(&format!("<span class=\"tag\">{}</span>", escape(tag)));
        }
        out.push_str("</div>");
    }

    out.push_str(&format!(
        "<div class=\"card-footer\"><span class=\"author\">{}</span>\
<span class=\"time\">{}</span><div class=\"card-actions\">",
        escape(&a.author),
        format_relative(a.timestamp, now_ms, &opts.date_format)
    ));
    for (act, label) in [
        (action::VIEW, "View"),
        (action::EDIT, "Edit"),
        (action::TOGGLE_RESOLVED, toggle_label),
        (action::REMOVE, "Delete"),
    ] {
        out.push_str(&format!(
            "<button class=\"card-action\" data-action=\"{}\" data-id=\"{}\">{}</button>",
            act, id, label
        ));
    }
    out.push_str("</div></div></div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Position, SourceRange};

    const NOW: i64 = 1_750_000_000_000;

    fn ann(id: &str, file: &str, resolved: bool) -> Annotation {
        Annotation {
            id: id.to_string(),
            file_path: file.to_string(),
            resolved,
            comment: format!("note {}", id),
            author: "dev".to_string(),
            timestamp: NOW - 5 * 60_000,
            ..Default::default()
        }
    }

    fn state(annotations: Vec<Annotation>, view_mode: ViewMode) -> ViewState {
        ViewState {
            annotations,
            view_mode,
            has_snapshot: true,
            ..Default::default()
        }
    }

    fn render(state: &ViewState) -> String {
        render_list(state, &RenderOptions::default(), NOW)
    }

    #[test]
    fn empty_list_is_exactly_placeholder() {
        assert_eq!(render(&state(vec![], ViewMode::Grouped)), EMPTY_STATE);
        assert_eq!(render(&state(vec![], ViewMode::List)), EMPTY_STATE);
    }

    #[test]
    fn grouped_headers_sorted_by_path() {
        let s = state(
            vec![ann("1", "src/z.rs", false), ann("2", "lib/a.rs", false), ann("3", "src/b.rs", false)],
            ViewMode::Grouped,
        );
        let out = render(&s);
        let lib = out.find("<span class=\"file-path\">lib/a.rs</span>").unwrap();
        let b = out.find("<span class=\"file-path\">src/b.rs</span>").unwrap();
        let z = out.find("<span class=\"file-path\">src/z.rs</span>").unwrap();
        assert!(lib < b && b < z);
    }

    #[test]
    fn group_ratio_counts_only_its_own_file() {
        let s = state(
            vec![
                ann("1", "a.rs", false),
                ann("2", "b.rs", true),
                ann("3", "a.rs", true),
                ann("4", "a.rs", false),
                ann("5", "b.rs", false),
            ],
            ViewMode::Grouped,
        );
        let out = render(&s);
        assert!(out.contains("<span class=\"file-path\">a.rs</span><span class=\"file-count\">2/3</span>"));
        assert!(out.contains("<span class=\"file-path\">b.rs</span><span class=\"file-count\">1/2</span>"));
    }

    #[test]
    fn group_members_keep_host_order() {
        let s = state(
            vec![ann("c", "a.rs", false), ann("x", "b.rs", false), ann("a", "a.rs", false)],
            ViewMode::Grouped,
        );
        let out = render(&s);
        let c = out.find("data-action=\"open\" data-id=\"c\"").unwrap();
        let a = out.find("data-action=\"open\" data-id=\"a\"").unwrap();
        let x = out.find("data-action=\"open\" data-id=\"x\"").unwrap();
        assert!(c < a);
        assert!(a < x);
    }

    #[test]
    fn list_mode_keeps_host_order_ungrouped() {
        let s = state(
            vec![ann("2", "z.rs", false), ann("1", "a.rs", false)],
            ViewMode::List,
        );
        let out = render(&s);
        assert!(!out.contains("file-group"));
        let two = out.find("data-id=\"2\"").unwrap();
        let one = out.find("data-id=\"1\"").unwrap();
        assert!(two < one);
    }

    #[test]
    fn hostile_text_renders_literally() {
        let mut a = ann("1", "<img src=x>.rs", false);
        a.comment = "<script>alert(1)</script> & more".to_string();
        a.code_snippet = "if a < b && c > d {}".to_string();
        a.author = "<b>eve</b>".to_string();
        a.tags = vec!["<i>tag</i>".to_string()];
        let out = render(&state(vec![a], ViewMode::List));
        assert!(out.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; more"));
        assert!(out.contains("if a &lt; b &amp;&amp; c &gt; d {}"));
        assert!(out.contains("&lt;b&gt;eve&lt;/b&gt;"));
        assert!(out.contains("&lt;i&gt;tag&lt;/i&gt;"));
        assert!(out.contains("&lt;img src=x&gt;.rs"));
        assert!(!out.contains("<script>"));
        assert!(!out.contains("<img"));
    }

    #[test]
    fn hostile_id_cannot_break_attributes() {
        let a = ann("\" onclick=\"x", "a.rs", false);
        let out = render(&state(vec![a], ViewMode::List));
        assert!(!out.contains("\" onclick=\""));
        assert!(out.contains("data-id=\"&quot; onclick=&quot;x\""));
    }

    #[test]
    fn tags_omitted_when_empty() {
        let out = render(&state(vec![ann("1", "a.rs", false)], ViewMode::List));
        assert!(!out.contains("class=\"tags\""));

        let mut tagged = ann("2", "a.rs", false);
        tagged.tags = vec!["perf".into(), "bug".into()];
        let out = render(&state(vec![tagged], ViewMode::List));
        assert!(out.contains("<div class=\"tags\"><span class=\"tag\">perf</span><span class=\"tag\">bug</span></div>"));
    }

    #[test]
    fn card_shows_line_range_status_and_time() {
        let mut a = ann("1", "a.rs", true);
        a.range = SourceRange {
            start: Position { line: 2, character: 0 },
            end: Position { line: 5, character: 1 },
        };
        let out = render(&state(vec![a], ViewMode::List));
        assert!(out.contains("<span class=\"lines\">Lines 3-6</span>"));
        assert!(out.contains("<span class=\"status-badge resolved\">Resolved</span>"));
        assert!(out.contains("<span class=\"time\">5m ago</span>"));
        assert!(out.contains(">Reopen</button>"));
    }

    #[test]
    fn card_has_four_actions() {
        let out = render(&state(vec![ann("k", "a.rs", false)], ViewMode::List));
        for act in ["view", "edit", "toggleResolved", "remove"] {
            assert!(out.contains(&format!("data-action=\"{}\" data-id=\"k\"", act)));
        }
        assert_eq!(out.matches("<button").count(), 4);
        assert!(out.contains(">Resolve</button>"));
    }

    #[test]
    fn checkbox_reflects_selection() {
        let mut s = state(vec![ann("a", "x.rs", false), ann("b", "x.rs", false)], ViewMode::List);
        s.selection.toggle("b");
        let out = render(&s);
        assert!(out.contains("data-action=\"select\" data-id=\"b\" checked>"));
        assert!(out.contains("data-action=\"select\" data-id=\"a\">"));
        assert!(out.contains("annotation-card unresolved selected\" data-action=\"open\" data-id=\"b\""));
    }
}
