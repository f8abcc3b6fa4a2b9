/// Escape text for use in HTML element content or a double-quoted attribute.
/// Every user-supplied string passes through here before reaching markup.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// ` disabled` / ` checked` style boolean attribute
pub fn flag(name: &str, on: bool) -> String {
    if on {
        format!(" {}", name)
    } else {
        String::new()
    }
}
