//! Iframe snippet for embedding the tool in a host page

/// Default iframe width
pub const DEFAULT_WIDTH: &str = "100%";

/// Default iframe height
pub const DEFAULT_HEIGHT: &str = "600px";

/// Build the iframe HTML for a configured widget URL
pub fn iframe_embed_code(config_url: &str, width: Option<&str>, height: Option<&str>) -> String {
    let width = width.unwrap_or(DEFAULT_WIDTH);
    let height = height.unwrap_or(DEFAULT_HEIGHT);

    format!(
        "<iframe \n  src=\"{}\" \n  width=\"{}\" \n  height=\"{}\" \n  frameborder=\"0\" \n  \
         style=\"border: none; border-radius: 8px; box-shadow: 0 4px 6px rgba(0,0,0,0.1);\">\n\
         </iframe>",
        escape_attribute(config_url),
        escape_attribute(width),
        escape_attribute(height)
    )
}

fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
