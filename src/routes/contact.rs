use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::content::RawHtml;
use rocket::State;

use crate::captcha::{self, CaptchaFailure, Challenge};
use crate::contact::{self, FormView, GateOutcome};
use crate::context::AppContext;
use crate::guards::ClientIp;
use crate::rate_limit::hash_ip;
use crate::routes::public::serve_page;

const PAGE: &str = "contact.html";
const PATH: &str = "/contact.html";

async fn render(
    ctx: &AppContext,
    cookies: &CookieJar<'_>,
    view: &FormView<'_>,
) -> Option<RawHtml<String>> {
    let form_html = contact::render_form(&ctx.config.contact.fields, view);
    serve_page(ctx, cookies, PAGE, PATH, &[("contact_form", form_html)]).await
}

#[get("/contact.html")]
pub async fn contact_page(ctx: &State<AppContext>, cookies: &CookieJar<'_>) -> Option<RawHtml<String>> {
    let challenge = captcha::issue(cookies);
    render(
        ctx,
        cookies,
        &FormView {
            challenge: &challenge,
            values: &HashMap::new(),
            errors: &BTreeMap::new(),
            captcha_error: None,
            flash: None,
        },
    )
    .await
}

#[post("/contact.html", data = "<form>")]
pub async fn contact_submit(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    client_ip: ClientIp,
    form: Form<HashMap<String, String>>,
) -> Option<RawHtml<String>> {
    let values = form.into_inner();
    let no_errors = BTreeMap::new();

    let limits = &ctx.config.contact;
    let rate_key = format!("contact:{}", hash_ip(&client_ip.0));
    let window = Duration::from_secs(limits.rate_limit_window_secs);
    ctx.limiter.cleanup(window);
    log::debug!("Contact limiter tracking {} client(s)", ctx.limiter.tracked_keys());
    if !ctx
        .limiter
        .check_and_record(&rate_key, limits.rate_limit_attempts.max(1), window)
    {
        log::warn!("Contact form rate limit hit for {}", rate_key);
        let challenge = captcha::issue(cookies);
        return render(
            ctx,
            cookies,
            &FormView {
                challenge: &challenge,
                values: &values,
                errors: &no_errors,
                captcha_error: None,
                flash: Some(("error", "Too many messages. Please try again later.")),
            },
        )
        .await;
    }

    let current = captcha::current(cookies);
    let outcome = contact::check(&ctx.config.contact, current.as_ref(), &values);

    let fields = match outcome {
        GateOutcome::Pass(fields) => fields,
        GateOutcome::Challenge(failure) => {
            // A wrong answer burns the challenge; an unticked box keeps it.
            let challenge = match (failure, current) {
                (CaptchaFailure::NotChecked, Some(c)) => c,
                _ => captcha::issue(cookies),
            };
            return render(
                ctx,
                cookies,
                &FormView {
                    challenge: &challenge,
                    values: &values,
                    errors: &no_errors,
                    captcha_error: Some(failure.message()),
                    flash: None,
                },
            )
            .await;
        }
        GateOutcome::Invalid(errors) => {
            let challenge = current_or_issue(current, cookies);
            return render(
                ctx,
                cookies,
                &FormView {
                    challenge: &challenge,
                    values: &values,
                    errors: &errors,
                    captcha_error: None,
                    flash: None,
                },
            )
            .await;
        }
        GateOutcome::NotConfigured => {
            log::error!("Contact form submitted but no mail relay endpoint is configured");
            let challenge = current_or_issue(current, cookies);
            return render(
                ctx,
                cookies,
                &FormView {
                    challenge: &challenge,
                    values: &values,
                    errors: &no_errors,
                    captcha_error: None,
                    flash: GateOutcome::NotConfigured.banner().map(|m| ("error", m)),
                },
            )
            .await;
        }
    };

    let relay = Arc::clone(&ctx.relay);
    let sent = rocket::tokio::task::spawn_blocking(move || relay.submit(&fields))
        .await
        .map_err(|e| format!("Failed to send message: {}", e))
        .and_then(|r| r);

    match sent {
        Ok(()) => {
            log::info!("Contact message relayed");
            let challenge = captcha::issue(cookies);
            render(
                ctx,
                cookies,
                &FormView {
                    challenge: &challenge,
                    values: &HashMap::new(),
                    errors: &no_errors,
                    captcha_error: None,
                    flash: Some(("success", contact::SENT_MESSAGE)),
                },
            )
            .await
        }
        Err(e) => {
            log::error!("Form submission error: {}", e);
            let challenge = current_or_issue(current, cookies);
            render(
                ctx,
                cookies,
                &FormView {
                    challenge: &challenge,
                    values: &values,
                    errors: &no_errors,
                    captcha_error: None,
                    flash: Some(("error", e.as_str())),
                },
            )
            .await
        }
    }
}

fn current_or_issue(current: Option<Challenge>, cookies: &CookieJar<'_>) -> Challenge {
    current.unwrap_or_else(|| captcha::issue(cookies))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![contact_page, contact_submit]
}
