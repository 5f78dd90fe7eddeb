use regex::{Captures, Regex};

use crate::context::AppContext;
use crate::theme::RootAttributes;

/// Render a site page: theme attributes on `<html>`, shared layout injected,
/// `{{placeholders}}` filled and leftovers stripped.
pub async fn render_page(
    ctx: &AppContext,
    page_html: &str,
    request_path: &str,
    root: &RootAttributes,
    values: &[(&str, String)],
) -> String {
    let html = set_root_attributes(page_html, root);
    let html = ctx.composer().render(&html, request_path).await;

    let mut vars: Vec<(&str, String)> = vec![
        ("site_name", html_escape(&ctx.config.site.name)),
        ("year", chrono::Utc::now().format("%Y").to_string()),
        ("current_path", html_escape(request_path)),
    ];
    vars.extend(values.iter().cloned());

    fill(&html, &vars)
}

/// Splice root attributes into the `<html>` start tag, replacing any
/// existing attributes of the same name.
pub fn set_root_attributes(html: &str, root: &RootAttributes) -> String {
    let re = match Regex::new(r#"<html\b([^>]*)>"#) {
        Ok(r) => r,
        Err(_) => return html.to_string(),
    };
    let stale = match Regex::new(r#"\s+data-(?:theme|scheme)="[^"]*""#) {
        Ok(r) => r,
        Err(_) => return html.to_string(),
    };
    re.replacen(html, 1, |caps: &Captures| {
        let kept = stale.replace_all(&caps[1], "");
        format!("<html{}{}>", kept, root.render())
    })
    .into_owned()
}

/// Substitute `{{key}}` tags in a single pass. Tags without a value are
/// dropped. Substituted text is never rescanned, so values keep any braces.
pub fn fill(html: &str, values: &[(&str, String)]) -> String {
    let mut result = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        match after.find("}}") {
            Some(end) if is_placeholder_key(&after[..end]) => {
                result.push_str(&rest[..start]);
                let key = &after[..end];
                if let Some((_, value)) = values.iter().find(|(k, _)| *k == key) {
                    result.push_str(value);
                }
                rest = &after[end + 2..];
            }
            _ => {
                result.push_str(&rest[..start + 2]);
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

fn is_placeholder_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase() || b == b'_')
}

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
