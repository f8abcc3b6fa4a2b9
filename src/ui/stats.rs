use super::html::escape;
use crate::model::StatsSnapshot;

pub fn render_stats(stats: &StatsSnapshot) -> String {
    let items = [
        ("total", "Total", stats.total),
        ("unresolved", "Unresolved", stats.unresolved),
        ("resolved", "Resolved", stats.resolved),
        ("files", "Files", stats.files),
    ];
    let mut out = String::from("<div class=\"stats\">");
    for (key, label, value) in items {
        out.push_str(&format!(
            "<div class=\"stat stat-{}\"><span class=\"stat-value\">{}</span><span class=\"stat-label\">{}</span></div>",
            key, value, label
        ));
    }
    out.push_str("</div>");
    out
}

/// Options for the tag filter select. The empty value means "all tags".
pub fn render_tag_options(tags: &[String]) -> String {
    let mut out = String::from("<option value=\"\">All Tags</option>");
    for tag in tags {
        let tag = escape(tag);
        out.push_str(&format!("<option value=\"{}\">{}</option>", tag, tag));
    }
    out
}
