//! Embedded page and script templates.
//!
//! Templates are plain files under `templates/` with `{{NAME}}` placeholders.
//! Rendering is literal string substitution; callers escape values for the
//! target context with [`html_escape`] or [`js_string`].

use anyhow::{anyhow, Result};
use include_dir::{include_dir, Dir};

static TEMPLATES: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/templates");

/// Render template `name`, replacing each `{{KEY}}` with its value.
pub fn render(name: &str, vars: &[(&str, &str)]) -> Result<String> {
    let source = TEMPLATES
        .get_file(name)
        .ok_or_else(|| anyhow!("template {name} not found"))?
        .contents_utf8()
        .ok_or_else(|| anyhow!("template {name} is not valid UTF-8"))?;

    Ok(substitute(source, vars))
}

/// Single left-to-right pass: inserted values are never scanned again, so a
/// value that itself contains `{{KEY}}` is emitted verbatim.
fn substitute(source: &str, vars: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let value = after.find("}}").and_then(|end| {
            let key = &after[..end];
            vars.iter()
                .find(|(name, _)| *name == key)
                .map(|(_, value)| (*value, end))
        });
        match value {
            Some((value, end)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Escape text for an HTML element body or a quoted attribute.
pub fn html_escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Quoted JavaScript string literal for `raw`.
///
/// JSON string syntax is valid JavaScript; `<` is additionally escaped so the
/// value cannot close an enclosing `<script>` element.
pub fn js_string(raw: &str) -> String {
    serde_json::Value::from(raw)
        .to_string()
        .replace('<', "\\u003c")
}
