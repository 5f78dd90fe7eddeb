use std::path::{Path, PathBuf};

use regex::{Captures, Regex};

use crate::config::LayoutConfig;

pub const HEADER_PLACEHOLDER: &str = "header-placeholder";
pub const FOOTER_PLACEHOLDER: &str = "footer-placeholder";

/// Where header/footer markup comes from.
#[rocket::async_trait]
pub trait FragmentSource: Send + Sync {
    async fn fetch(&self, name: &str) -> Result<String, String>;
}

/// Loads one dependent script and returns the tag that includes it.
pub trait ScriptLoader: Send + Sync {
    fn load(&self, src: &str) -> Result<String, String>;
}

// ── Fragment sources ──────────────────────────────────

/// Fragments read from a directory on disk, e.g. `site/components`.
pub struct DirFragments {
    root: PathBuf,
}

impl DirFragments {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirFragments { root: root.into() }
    }
}

#[rocket::async_trait]
impl FragmentSource for DirFragments {
    async fn fetch(&self, name: &str) -> Result<String, String> {
        if name.contains("..") {
            return Err(format!("Refusing fragment path '{}'", name));
        }
        let path = self.root.join(name);
        rocket::tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))
    }
}

/// Scripts served from the site's asset directory. A script "loads" when its
/// file is present; the tag uses `defer` so browsers execute in document order.
pub struct AssetScripts {
    site_root: PathBuf,
}

impl AssetScripts {
    pub fn new(site_root: impl Into<PathBuf>) -> Self {
        AssetScripts {
            site_root: site_root.into(),
        }
    }
}

impl ScriptLoader for AssetScripts {
    fn load(&self, src: &str) -> Result<String, String> {
        let rel = src.trim_start_matches('/');
        if rel.contains("..") {
            return Err(format!("Refusing script path '{}'", src));
        }
        let path = self.site_root.join(rel);
        if !path.is_file() {
            return Err(format!("{} not found", path.display()));
        }
        Ok(format!("<script src=\"/{}\" defer></script>", rel))
    }
}

// ── Composition ───────────────────────────────────────

/// Header and footer ready for injection, plus the script tags that loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedLayout {
    pub header: String,
    pub footer: String,
    pub scripts: Vec<String>,
}

pub struct LayoutComposer<'a> {
    config: &'a LayoutConfig,
    fragments: &'a dyn FragmentSource,
    scripts: &'a dyn ScriptLoader,
}

impl<'a> LayoutComposer<'a> {
    pub fn new(
        config: &'a LayoutConfig,
        fragments: &'a dyn FragmentSource,
        scripts: &'a dyn ScriptLoader,
    ) -> Self {
        LayoutComposer {
            config,
            fragments,
            scripts,
        }
    }

    /// Fetch both fragments concurrently; both must succeed.
    pub async fn fetch_fragments(&self) -> Result<(String, String), String> {
        let (header, footer) = rocket::tokio::join!(
            self.fragments.fetch(&self.config.header),
            self.fragments.fetch(&self.config.footer),
        );
        Ok((header?, footer?))
    }

    /// Load configured scripts strictly in order. The first failure ends
    /// the chain; scripts after it are never attempted.
    pub fn load_scripts(&self) -> Vec<String> {
        let mut tags = Vec::with_capacity(self.config.scripts.len());
        for src in &self.config.scripts {
            match self.scripts.load(src) {
                Ok(tag) => tags.push(tag),
                Err(e) => {
                    log::error!("Error loading scripts: {}", e);
                    break;
                }
            }
        }
        tags
    }

    pub async fn compose(&self, request_path: &str) -> Result<ComposedLayout, String> {
        let (header, footer) = self
            .fetch_fragments()
            .await
            .map_err(|e| format!("Failed to load layout components: {}", e))?;
        let header = mark_active_nav(&header, &current_page(request_path));
        let scripts = self.load_scripts();
        log::debug!("Layout composed for {} with {} script(s)", request_path, scripts.len());
        Ok(ComposedLayout {
            header,
            footer,
            scripts,
        })
    }

    /// Compose and inject into `page`. On a fragment failure the page comes
    /// back untouched: placeholders stay empty and no scripts are added.
    pub async fn render(&self, page: &str, request_path: &str) -> String {
        match self.compose(request_path).await {
            Ok(layout) => inject(page, &layout),
            Err(e) => {
                log::error!("{}", e);
                page.to_string()
            }
        }
    }
}

// ── Markup helpers ────────────────────────────────────

/// Replace the contents of the element with `id` by `content`. Nested
/// elements of the same tag are skipped when looking for the close.
pub fn fill_placeholder(html: &str, id: &str, content: &str) -> String {
    let open_re = match Regex::new(&format!(
        r#"<([a-zA-Z][a-zA-Z0-9]*)\b[^>]*\bid="{}"[^>]*>"#,
        regex::escape(id)
    )) {
        Ok(r) => r,
        Err(e) => {
            log::error!("Bad placeholder pattern for '{}': {}", id, e);
            return html.to_string();
        }
    };
    let (start, tag) = match open_re.captures(html) {
        Some(caps) => match caps.get(0) {
            Some(m) => (m.end(), caps[1].to_string()),
            None => return html.to_string(),
        },
        None => return html.to_string(),
    };
    let tag_re = match Regex::new(&format!(r"(?i)<(/?){}\b[^>]*>", regex::escape(&tag))) {
        Ok(r) => r,
        Err(_) => return html.to_string(),
    };

    let mut depth = 1usize;
    for caps in tag_re.captures_iter(&html[start..]) {
        if &caps[1] == "/" {
            depth -= 1;
            if depth == 0 {
                let close = start + caps.get(0).map(|m| m.start()).unwrap_or(0);
                return format!("{}{}{}", &html[..start], content, &html[close..]);
            }
        } else {
            depth += 1;
        }
    }
    log::warn!("Placeholder '{}' has no closing </{}>", id, tag);
    html.to_string()
}

pub fn inject(page: &str, layout: &ComposedLayout) -> String {
    let html = fill_placeholder(page, HEADER_PLACEHOLDER, &layout.header);
    let html = fill_placeholder(&html, FOOTER_PLACEHOLDER, &layout.footer);
    if layout.scripts.is_empty() {
        return html;
    }
    let tags = layout.scripts.join("\n");
    match html.rfind("</body>") {
        Some(pos) => format!("{}{}\n{}", &html[..pos], tags, &html[pos..]),
        None => format!("{}\n{}", html, tags),
    }
}

/// Filename of the page being served; empty paths are the index.
pub fn current_page(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or("");
    match path.rsplit('/').next() {
        Some(last) if !last.is_empty() => last.to_string(),
        _ => "index.html".to_string(),
    }
}

/// Mark every `li > a` inside the `navbar-nav` list whose target is
/// `current` as active, on both the link and its list item.
pub fn mark_active_nav(header: &str, current: &str) -> String {
    let (nav_re, item_re, href_re) = match (
        Regex::new(r#"(?s)<ul\b[^>]*\bclass="[^"]*\bnavbar-nav\b[^"]*"[^>]*>.*?</ul>"#),
        Regex::new(r#"<li\b([^>]*)>(\s*)<a\b([^>]*)>"#),
        Regex::new(r#"\bhref="([^"]*)""#),
    ) {
        (Ok(a), Ok(b), Ok(c)) => (a, b, c),
        _ => return header.to_string(),
    };

    nav_re
        .replace_all(header, |nav: &Captures| {
            item_re
                .replace_all(&nav[0], |item: &Captures| {
                    let target = href_re
                        .captures(&item[3])
                        .map(|h| h[1].to_string())
                        .unwrap_or_default();
                    if !links_to(&target, current) {
                        return item[0].to_string();
                    }
                    format!(
                        "<li{}>{}<a{}>",
                        add_class(&item[1], "active"),
                        &item[2],
                        add_class(&item[3], "active")
                    )
                })
                .into_owned()
        })
        .into_owned()
}

fn links_to(href: &str, current: &str) -> bool {
    if href.is_empty() || href.starts_with('#') || href.contains("://") || href.starts_with("mailto:") {
        return false;
    }
    current_page(href) == current
}

fn add_class(attrs: &str, class: &str) -> String {
    match attrs.find("class=\"") {
        Some(pos) => {
            let start = pos + "class=\"".len();
            let end = attrs[start..].find('"').map(|e| start + e).unwrap_or(attrs.len());
            let existing = &attrs[start..end];
            if existing.split_whitespace().any(|c| c == class) {
                return attrs.to_string();
            }
            let joined = if existing.trim().is_empty() {
                class.to_string()
            } else {
                format!("{} {}", existing, class)
            };
            format!("{}{}{}", &attrs[..start], joined, &attrs[end..])
        }
        None => format!("{} class=\"{}\"", attrs, class),
    }
}

pub fn missing_fragments(dir: &Path, config: &LayoutConfig) -> Vec<PathBuf> {
    [&config.header, &config.footer]
        .iter()
        .map(|name| dir.join(name))
        .filter(|p| !p.is_file())
        .collect()
}
