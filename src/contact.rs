use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex::Regex;

use crate::captcha::{self, CaptchaFailure, Challenge};
use crate::config::{ContactConfig, FieldKind, FieldSpec};
use crate::render::html_escape;

pub const CHECK_FIELD: &str = "captcha_check";
pub const ANSWER_FIELD: &str = "captcha_answer";

const NOT_CONFIGURED: &str = "Contact form not yet configured. Please contact site administrator.";
pub const SENT_MESSAGE: &str = "Thank you! Your message has been sent.";

/// Result of running a submission through every gate, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum GateOutcome {
    /// All gates passed; the declared fields, trimmed, in form order.
    Pass(Vec<(String, String)>),
    Challenge(CaptchaFailure),
    NotConfigured,
    /// Field name → message for every offending field.
    Invalid(BTreeMap<String, String>),
}

impl GateOutcome {
    pub fn banner(&self) -> Option<&'static str> {
        match self {
            GateOutcome::NotConfigured => Some(NOT_CONFIGURED),
            _ => None,
        }
    }
}

/// Challenge first, then relay configuration, then field validation.
pub fn check(
    config: &ContactConfig,
    challenge: Option<&Challenge>,
    form: &HashMap<String, String>,
) -> GateOutcome {
    let checked = form
        .get(CHECK_FIELD)
        .map(|v| !v.is_empty() && v != "false" && v != "off")
        .unwrap_or(false);
    let answer = form.get(ANSWER_FIELD).map(|s| s.as_str()).unwrap_or("");
    if let Err(failure) = captcha::verify(challenge, checked, answer) {
        return GateOutcome::Challenge(failure);
    }

    if !config.endpoint_configured() {
        return GateOutcome::NotConfigured;
    }

    let errors = validate_fields(&config.fields, form);
    if !errors.is_empty() {
        return GateOutcome::Invalid(errors);
    }

    GateOutcome::Pass(
        config
            .fields
            .iter()
            .map(|f| {
                let value = form.get(&f.name).map(|v| v.trim()).unwrap_or("");
                (f.name.clone(), value.to_string())
            })
            .collect(),
    )
}

pub fn validate_fields(
    fields: &[FieldSpec],
    form: &HashMap<String, String>,
) -> BTreeMap<String, String> {
    let mut errors = BTreeMap::new();
    for field in fields.iter().filter(|f| f.required) {
        let value = form.get(&field.name).map(|v| v.trim()).unwrap_or("");
        let message = if value.is_empty() {
            format!("{} is required", field.label)
        } else if field.kind == FieldKind::Email && !is_valid_email(value) {
            "Please enter a valid email address".to_string()
        } else if value.chars().count() < 2 {
            format!("{} must be at least 2 characters", field.name)
        } else {
            continue;
        };
        errors.insert(field.name.clone(), message);
    }
    errors
}

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok())
        .as_ref()
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

// ── Rendering ─────────────────────────────────────────

/// What the form shows on this render.
pub struct FormView<'a> {
    pub challenge: &'a Challenge,
    pub values: &'a HashMap<String, String>,
    pub errors: &'a BTreeMap<String, String>,
    pub captcha_error: Option<&'a str>,
    /// `("success" | "error", message)`
    pub flash: Option<(&'a str, &'a str)>,
}

/// Build the contact form HTML (everything inside `{{contact_form}}`).
pub fn render_form(fields: &[FieldSpec], view: &FormView<'_>) -> String {
    let mut html = String::new();

    if let Some((kind, message)) = view.flash {
        let id = if kind == "success" { "formSuccess" } else { "formError" };
        html.push_str(&format!(
            "<div id=\"{}\" class=\"form-alert form-alert-{}\" role=\"alert\">{}</div>\n",
            id,
            html_escape(kind),
            html_escape(message)
        ));
    }

    html.push_str("<form id=\"contact-form\" method=\"post\" action=\"/contact.html\" novalidate>\n");

    for field in fields {
        let value = view.values.get(&field.name).map(|v| v.as_str()).unwrap_or("");
        let error = view.errors.get(&field.name);
        let class = if error.is_some() { " class=\"error\"" } else { "" };
        let required = if field.required { " required" } else { "" };
        let input = match field.kind {
            FieldKind::Textarea => format!(
                "<textarea id=\"{name}\" name=\"{name}\" rows=\"5\"{class}{required}>{value}</textarea>",
                name = html_escape(&field.name),
                class = class,
                required = required,
                value = html_escape(value),
            ),
            FieldKind::Text | FieldKind::Email => format!(
                "<input type=\"{kind}\" id=\"{name}\" name=\"{name}\" value=\"{value}\"{class}{required}>",
                kind = if field.kind == FieldKind::Email { "email" } else { "text" },
                name = html_escape(&field.name),
                value = html_escape(value),
                class = class,
                required = required,
            ),
        };
        let error_html = match error {
            Some(msg) => format!(
                "<div class=\"form-error\" style=\"display:block\">{}</div>",
                html_escape(msg)
            ),
            None => "<div class=\"form-error\"></div>".to_string(),
        };
        html.push_str(&format!(
            "<div class=\"form-group\"><label for=\"{}\">{}</label>{}{}</div>\n",
            html_escape(&field.name),
            html_escape(&field.label),
            input,
            error_html
        ));
    }

    html.push_str(&format!(
        "<div class=\"captcha-box\">\
         <label><input type=\"checkbox\" id=\"captchaCheck\" name=\"{check}\"> I'm human</label> \
         <span class=\"captcha-question\"><span id=\"num1\">{a}</span> + <span id=\"num2\">{b}</span> = </span>\
         <input type=\"text\" inputmode=\"numeric\" id=\"captchaAnswer\" name=\"{answer}\" autocomplete=\"off\">\
         <div id=\"captchaError\" class=\"form-error\"{style}>{error}</div>\
         </div>\n",
        check = CHECK_FIELD,
        answer = ANSWER_FIELD,
        a = view.challenge.a,
        b = view.challenge.b,
        style = if view.captcha_error.is_some() { " style=\"display:block\"" } else { "" },
        error = view.captcha_error.map(html_escape).unwrap_or_default(),
    ));

    html.push_str("<button type=\"submit\" class=\"btn btn-primary\">Send Message</button>\n</form>\n");
    html
}
