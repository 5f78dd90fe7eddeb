use log::{error, info, warn};
use std::fs;
use std::path::Path;
use std::process;

use crate::config::SiteConfig;
use crate::layout;

/// Pages the site links to from the shared header.
const EXPECTED_PAGES: &[&str] = &["index.html", "contact.html"];

/// Run all boot checks. Call this before Rocket launches.
/// Creates missing directories, warns about missing files, and
/// aborts if the shared layout fragments are absent.
pub fn run(config: &SiteConfig) {
    info!("{} boot check starting...", config.site.name);

    let mut warnings = 0u32;
    let mut errors = 0u32;

    // ── 1. Directories ─────────────────────────────────
    let dirs = [
        config.site.root.clone(),
        config.components_dir(),
        config.pages_dir(),
        config.assets_dir(),
        format!("{}/templates", config.site.root),
    ];
    for dir in &dirs {
        let path = Path::new(dir);
        if !path.exists() {
            match fs::create_dir_all(path) {
                Ok(_) => info!("  Created directory: {}", dir),
                Err(e) => {
                    error!("  FAILED to create directory {}: {}", dir, e);
                    errors += 1;
                }
            }
        }
    }

    // ── 2. Layout fragments ────────────────────────────
    let components = config.components_dir();
    for missing in layout::missing_fragments(Path::new(&components), &config.layout) {
        error!("  MISSING layout fragment: {}", missing.display());
        errors += 1;
    }

    // ── 3. Dependent scripts ───────────────────────────
    for script in &config.layout.scripts {
        let path = Path::new(&config.site.root).join(script.trim_start_matches('/'));
        if !path.is_file() {
            warn!(
                "  Missing script: {} (it and every script after it will be skipped)",
                path.display()
            );
            warnings += 1;
        }
    }

    // ── 4. Pages ───────────────────────────────────────
    for page in EXPECTED_PAGES {
        let path = Path::new(&config.pages_dir()).join(page);
        if !path.exists() {
            warn!("  Missing page: {} (requests for it will 404)", path.display());
            warnings += 1;
        }
    }

    // ── 5. Rocket.toml exists ───────────────────────────
    if !Path::new("Rocket.toml").exists() {
        warn!("  Rocket.toml not found, using default config");
        warnings += 1;
    }

    // ── Summary ─────────────────────────────────────────
    if errors > 0 {
        error!(
            "Boot check FAILED: {} error(s), {} warning(s). Aborting.",
            errors, warnings
        );
        process::exit(1);
    }

    if warnings > 0 {
        warn!(
            "Boot check passed with {} warning(s). Some features may not work correctly.",
            warnings
        );
    } else {
        info!("Boot check passed. All systems go.");
    }
}
