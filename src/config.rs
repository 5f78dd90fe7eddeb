use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Environment variable that points at the site config file.
pub const CONFIG_ENV: &str = "AZAD_SITE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "site.toml";

/// Everything the site renders from: themes, layout, contact form, and page content.
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteInfo,
    pub themes: ThemeConfig,
    pub layout: LayoutConfig,
    pub contact: ContactConfig,
    pub payments: PaymentsConfig,
    pub social: SocialLinks,
    pub projects: Vec<Project>,
    pub faq: Vec<FaqEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteInfo {
    pub name: String,
    /// Directory holding `components/`, `pages/`, `assets/` and `templates/`.
    pub root: String,
}

// ── Themes ────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: Palette,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub dark_bg: String,
    pub light_bg: String,
    pub light_text: String,
    pub border: String,
}

impl Palette {
    /// Named colours in palette order.
    pub fn entries(&self) -> [(&'static str, &str); 7] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("dark-bg", &self.dark_bg),
            ("light-bg", &self.light_bg),
            ("light-text", &self.light_text),
            ("border", &self.border),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub themes: Vec<Theme>,
    pub default: String,
    pub storage_key: String,
    pub scheme_key: String,
}

impl ThemeConfig {
    pub fn find(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn is_valid(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

// ── Layout ────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub header: String,
    pub footer: String,
    /// Loaded strictly in this order; each one only after the previous succeeded.
    pub scripts: Vec<String>,
}

// ── Contact ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Email,
    Textarea,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    #[serde(default = "default_true")]
    pub required: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    /// Mail relay URL. Left as the placeholder until the site owner deploys one.
    pub endpoint: String,
    pub fields: Vec<FieldSpec>,
    pub rate_limit_attempts: u64,
    pub rate_limit_window_secs: u64,
}

pub const ENDPOINT_PLACEHOLDER: &str = "YOUR_DEPLOYMENT_ID";

impl ContactConfig {
    pub fn endpoint_configured(&self) -> bool {
        !self.endpoint.trim().is_empty() && !self.endpoint.contains(ENDPOINT_PLACEHOLDER)
    }
}

// ── Content ───────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub icon: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub qr_code: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, String>,
    #[serde(default)]
    pub instructions: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentsConfig {
    pub pakistan: Vec<PaymentMethod>,
    pub international: Vec<PaymentMethod>,
    pub crypto: Vec<PaymentMethod>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialLinks {
    pub work: BTreeMap<String, String>,
    pub personal: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub category: String,
    pub icon: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub links: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

// ── Loading ───────────────────────────────────────────

impl SiteConfig {
    /// Load config from `path`. A missing file yields the built-in site;
    /// a present but invalid file is an error.
    pub fn load(path: &Path) -> Result<SiteConfig, String> {
        if !path.exists() {
            log::warn!(
                "Site config {} not found, using built-in defaults",
                path.display()
            );
            return Ok(SiteConfig::default());
        }
        let raw = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
        let config = Self::parse(&raw)?;
        log::info!("Loaded site config from {}", path.display());
        Ok(config)
    }

    pub fn parse(raw: &str) -> Result<SiteConfig, String> {
        let config: SiteConfig =
            toml::from_str(raw).map_err(|e| format!("Invalid site config: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Path from `AZAD_SITE_CONFIG`, falling back to `site.toml`.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.themes.themes.is_empty() {
            return Err("No themes defined".into());
        }
        let mut seen = HashSet::new();
        for theme in &self.themes.themes {
            if theme.id.trim().is_empty() {
                return Err(format!("Theme '{}' has an empty id", theme.name));
            }
            if !seen.insert(theme.id.as_str()) {
                return Err(format!("Duplicate theme id '{}'", theme.id));
            }
        }
        if !self.themes.is_valid(&self.themes.default) {
            return Err(format!(
                "Default theme '{}' is not a defined theme",
                self.themes.default
            ));
        }
        if self.themes.storage_key == self.themes.scheme_key {
            return Err("Theme and scheme storage keys must differ".into());
        }
        let mut names = HashSet::new();
        for field in &self.contact.fields {
            if !names.insert(field.name.as_str()) {
                return Err(format!("Duplicate contact field '{}'", field.name));
            }
        }
        Ok(())
    }

    pub fn components_dir(&self) -> String {
        format!("{}/components", self.site.root)
    }

    pub fn pages_dir(&self) -> String {
        format!("{}/pages", self.site.root)
    }

    pub fn assets_dir(&self) -> String {
        format!("{}/assets", self.site.root)
    }
}

// ── Built-in content ──────────────────────────────────

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            site: SiteInfo::default(),
            themes: ThemeConfig::default(),
            layout: LayoutConfig::default(),
            contact: ContactConfig::default(),
            payments: PaymentsConfig::builtin(),
            social: SocialLinks::builtin(),
            projects: builtin_projects(),
            faq: builtin_faq(),
        }
    }
}

impl Default for SiteInfo {
    fn default() -> Self {
        SiteInfo {
            name: "AzAd".to_string(),
            root: "site".to_string(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            header: "header.html".to_string(),
            footer: "footer.html".to_string(),
            scripts: vec![
                "assets/js/validnavs.js".to_string(),
                "assets/js/main.js".to_string(),
            ],
        }
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        let field = |name: &str, label: &str, kind: FieldKind| FieldSpec {
            name: name.to_string(),
            label: label.to_string(),
            kind,
            required: true,
        };
        ContactConfig {
            endpoint: format!("https://script.google.com/macros/s/{}/exec", ENDPOINT_PLACEHOLDER),
            fields: vec![
                field("name", "Your Name", FieldKind::Text),
                field("email", "Email Address", FieldKind::Email),
                field("subject", "Subject", FieldKind::Text),
                field("message", "Message", FieldKind::Textarea),
            ],
            rate_limit_attempts: 5,
            rate_limit_window_secs: 15 * 60,
        }
    }
}

fn theme(id: &str, name: &str, description: &str, c: [&str; 7]) -> Theme {
    Theme {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        colors: Palette {
            primary: c[0].to_string(),
            secondary: c[1].to_string(),
            accent: c[2].to_string(),
            dark_bg: c[3].to_string(),
            light_text: c[4].to_string(),
            light_bg: c[5].to_string(),
            border: c[6].to_string(),
        },
    }
}

impl Default for ThemeConfig {
    fn default() -> Self {
        // colours: primary, secondary, accent, dark bg, light text, light bg, border
        ThemeConfig {
            themes: vec![
                theme("tech-modern", "Tech Modern", "Professional & Modern",
                    ["#0F766E", "#7B4AED", "#FDB022", "#0F172A", "#F1F5F9", "#1E293B", "#334155"]),
                theme("green-growth", "Green Growth", "Sustainable & Community",
                    ["#10B981", "#3B82F6", "#F59E0B", "#1F2937", "#F3F4F6", "#111827", "#374151"]),
                theme("sunset-pakistan", "Sunset Pakistan", "Cultural Identity",
                    ["#DC2626", "#1E40AF", "#FBBF24", "#1F2937", "#F9FAFB", "#111827", "#4B5563"]),
                theme("minimalist", "Minimalist", "Elegant & Timeless",
                    ["#000000", "#FFFFFF", "#EC4899", "#1F2937", "#F3F4F6", "#111827", "#4B5563"]),
                theme("cyberpunk", "Cyberpunk", "Bold & Eye-Catching",
                    ["#00D9FF", "#FF006E", "#FFBE0B", "#0A0E27", "#FFFFFF", "#1A1F3A", "#00D9FF"]),
            ],
            default: "minimalist".to_string(),
            storage_key: "azad-theme".to_string(),
            scheme_key: "azad-scheme".to_string(),
        }
    }
}

fn payment(icon: &str, name: &str, description: &str, details: &[(&str, &str)]) -> PaymentMethod {
    PaymentMethod {
        icon: icon.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        qr_code: None,
        link: None,
        details: details
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        instructions: Vec::new(),
    }
}

fn steps(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

impl PaymentsConfig {
    fn builtin() -> Self {
        let pakistan = vec![
            PaymentMethod {
                qr_code: Some("easypaisa-qr.png".into()),
                ..payment("💳", "Easypaisa", "Mobile account transfer", &[
                    ("Account Holder", "Ayaz Ahmed"),
                    ("Account #", "0313-756 3344"),
                    ("IBAN", "PK51TMFB0000000040676854"),
                ])
            },
            PaymentMethod {
                qr_code: Some("jazzcash-qr.png".into()),
                ..payment("📱", "JazzCash", "Quick payment service", &[
                    ("Account Holder", "Ayyaz Ahmad"),
                    ("Account #", "0313-756 3344"),
                    ("IBAN", "PK80JCMA1301923137563344"),
                ])
            },
            payment("🔐", "RAST (Instant Transfer)", "Real-time bank transfer", &[
                ("RAST ID", "03217563344"),
                ("Method", "National payment system"),
            ]),
            payment("🏦", "UBL Bank", "United Bank Limited", &[
                ("Account Title", "Ayyaz Ahmad"),
                ("Account #", "010-3471-1"),
                ("Branch", "Ichhra-559"),
                ("SWIFT", "UNILPKKA"),
                ("IBAN", "PK09UNIL0112055901034711"),
            ]),
            payment("💰", "Standard Chartered", "International bank transfer", &[
                ("Account Title", "Ayyaz Ahmad"),
                ("Account #", "01-7025981-01"),
                ("Branch", "Shadman Lahore - 082"),
                ("SWIFT", "SCBLPKKXLHR"),
                ("IBAN", "PK42SCBL0000001702598101"),
            ]),
        ];

        let international = vec![
            PaymentMethod {
                link: Some("https://wise.com/pay/recipient/your-wise-id".into()),
                ..payment("💸", "Wise", "Fast international transfers", &[
                    ("Method", "Bank transfer from any country"),
                    ("Fees", "Low international rates"),
                ])
            },
            PaymentMethod {
                link: Some("https://patreon.com/AyyazAhmad".into()),
                ..payment("❤️", "Patreon", "Monthly recurring support", &[
                    ("Type", "Membership support"),
                    ("Benefits", "Exclusive content & updates"),
                ])
            },
            PaymentMethod {
                link: Some("https://ko-fi.com/ayyazahmad".into()),
                ..payment("☕", "Ko-fi", "One-time or recurring donations", &[
                    ("Method", "Card payments worldwide"),
                    ("Fee", "No platform fee option"),
                ])
            },
        ];

        let crypto = vec![
            PaymentMethod {
                qr_code: Some("binance-qr.png".into()),
                instructions: steps(&[
                    "Open your wallet or exchange",
                    "Create new transaction",
                    "Copy BTC address or scan QR",
                    "Enter amount and confirm",
                    "Transaction complete",
                ]),
                ..payment("₿", "Bitcoin (BTC)", "Decentralized peer-to-peer", &[
                    ("Address", "bc1qxxxxxxxxxxxxxxxxxxxxxxxxxx"),
                    ("Network", "Bitcoin"),
                    ("Min Amount", "Any amount"),
                ])
            },
            PaymentMethod {
                instructions: steps(&[
                    "Open MetaMask or exchange",
                    "Send to Ethereum address",
                    "Use any stablecoin (USDC/USDT)",
                    "Transaction complete instantly",
                ]),
                ..payment("Ξ", "Ethereum / USDC", "Fast & flexible payments", &[
                    ("Address", "0xxxxxxxxxxxxxxxxxxxxxxxxxxx"),
                    ("Chain", "Ethereum (ETH)"),
                    ("Also Accepts", "USDC, USDT"),
                ])
            },
            PaymentMethod {
                qr_code: Some("binance-qr.png".into()),
                instructions: steps(&[
                    "Open Binance App",
                    "Tap Wallets → Funding",
                    "Tap Pay → Send",
                    "Enter Pay ID: 1047913156 or Email",
                    "Select USDT currency",
                    "Enter amount & Confirm",
                ]),
                ..payment("₿", "Binance Pay", "USDT without fees", &[
                    ("Pay ID", "1047913156"),
                    ("Username", "AyyazBTC"),
                    ("Crypto", "USDT (stable)"),
                    ("Fees", "Zero Fee"),
                ])
            },
        ];

        PaymentsConfig {
            pakistan,
            international,
            crypto,
        }
    }
}

impl SocialLinks {
    fn builtin() -> Self {
        let map = |pairs: &[(&str, &str)]| -> BTreeMap<String, String> {
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect()
        };
        SocialLinks {
            work: map(&[
                ("github", "https://github.com/ayyazahmad"),
                ("twitter", "https://twitter.com/ayyazahmad"),
                ("website", "https://ayyazahmad.com"),
                ("email", "ayyaz@azad.co"),
                ("linkedin", "https://linkedin.com/in/ayyazahmad"),
            ]),
            personal: map(&[
                ("instagram", "https://instagram.com/ayyazahmad"),
                ("facebook", "https://facebook.com/ayyazahmad"),
                ("twitter_personal", "https://twitter.com/ayyaz_personal"),
            ]),
        }
    }
}

fn builtin_projects() -> Vec<Project> {
    let project = |id: &str, name: &str, category: &str, icon: &str, description: &str,
                   features: &[&str], links: &[(&str, &str)]| Project {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        icon: icon.to_string(),
        description: description.to_string(),
        features: steps(features),
        links: links
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };
    vec![
        project(
            "browserkit", "AzAd BrowserKit", "browser", "🔧",
            "Complete suite of developer tools for Chrome/Edge browsers",
            &["Color Picker", "Font Inspector", "Link Collector", "Email Extractor", "Table Extractor", "Hover Zoom"],
            &[
                ("github", "https://github.com/ayyazahmad/AzAd-BrowserKit"),
                ("store", "https://chromewebstore.google.com/detail/azad-browserkit/fpoeafhnjjhpicifmdpcfbnlofpompcf"),
            ],
        ),
        project(
            "downloader", "Smart Downloader", "wordpress", "📥",
            "WordPress plugin for fast batch downloads and file management",
            &["Batch Download", "Auto Backup", "File Manager", "Progress Tracking", "Resume Support"],
            &[
                ("github", "https://github.com/ayyazahmad/AzAd-Smart-Downloader"),
                ("store", "https://chromewebstore.google.com/detail/azad-smart-downloader/kmhffijpjfhleppnokojhcecipegeajl"),
                ("wordpress", "https://wordpress.org/plugins/"),
            ],
        ),
        project(
            "admin-security", "Admin Security Suite", "wordpress", "🔒",
            "WordPress security hardening plugin for admin panel",
            &["Login Protection", "Admin Security", "Audit Logs", "Two-Factor Auth", "IP Whitelist"],
            &[
                ("github", "https://github.com/ayyazahmad"),
                ("wordpress", "https://wordpress.org/plugins/"),
            ],
        ),
    ]
}

fn builtin_faq() -> Vec<FaqEntry> {
    let qa = |q: &str, a: &str| FaqEntry {
        question: q.to_string(),
        answer: a.to_string(),
    };
    vec![
        qa("How do I support AzAd projects?",
           "You can support through multiple methods: Pakistan bank transfers, international transfers (Wise, Patreon), cryptocurrency (Bitcoin, Ethereum, USDT), or one-time donations through Ko-fi."),
        qa("What payment methods work in Pakistan?",
           "In Pakistan, you can use Easypaisa, JazzCash, RAST ID, UBL Bank, or Standard Chartered bank transfers directly. QR codes are provided for mobile payments."),
        qa("Are there recurring donation options?",
           "Yes! Patreon and Ko-fi both offer monthly subscription options. You can also make regular manual transfers via Wise or bank transfer."),
        qa("Is cryptocurrency supported?",
           "Yes, we accept Bitcoin (BTC), Ethereum (ETH), and stablecoins (USDC/USDT) including Binance Pay with zero fees."),
        qa("How will my donation be used?",
           "Your donation helps us develop new features, fix bugs, improve documentation, and dedicate more time to open source development."),
        qa("Can I get an invoice or receipt?",
           "Yes, most payment methods provide automatic receipts. For bank transfers, your bank statement serves as proof."),
    ]
}
