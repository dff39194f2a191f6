//! HTML fragments for the htmx front end.
//!
//! Every function returns a fragment as a `String`. Any user-supplied text
//! goes through [`escape`] before it is interpolated.

pub mod form;
pub mod grid;
pub mod layout;

/// Escape text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
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

/// One `<p>` per message inside an `error-messages` block.
pub fn error_messages(errors: &[String]) -> String {
    let items: String = errors
        .iter()
        .map(|e| format!("<p>{}</p>", escape(e)))
        .collect();
    format!(r#"<div class="error-messages">{items}</div>"#)
}

/// A terminal "not found" message. Carries no polling attributes, so an
/// htmx swap of this fragment stops any polling loop.
pub fn not_found(message: &str) -> String {
    format!(r#"<div class="error"><p>{}</p></div>"#, escape(message))
}
