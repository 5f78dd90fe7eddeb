use rocket::http::{ContentType, CookieJar, Status};
use rocket::http::uri::Origin;
use rocket::response::content::RawHtml;
use rocket::State;
use rocket_dyn_templates::Metadata;
use serde_json::json;

use crate::context::AppContext;
use crate::render;
use crate::store::CookieStore;
use crate::theme;

/// Compose `name` from `pages/` for the visitor behind `cookies`.
pub async fn serve_page(
    ctx: &AppContext,
    cookies: &CookieJar<'_>,
    name: &str,
    request_path: &str,
    values: &[(&str, String)],
) -> Option<RawHtml<String>> {
    let page = ctx.read_page(name)?;
    let root = ctx.theme_controller(CookieStore::new(cookies)).root().clone();
    Some(RawHtml(
        render::render_page(ctx, &page, request_path, &root, values).await,
    ))
}

// ── Pages ──────────────────────────────────────────────

#[get("/")]
pub async fn index(ctx: &State<AppContext>, cookies: &CookieJar<'_>) -> Option<RawHtml<String>> {
    serve_page(ctx, cookies, "index.html", "/", &[]).await
}

#[get("/<page>", rank = 12)]
pub async fn site_page(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    page: &str,
    origin: &Origin<'_>,
) -> Option<RawHtml<String>> {
    serve_page(ctx, cookies, page, origin.path().as_str(), &[]).await
}

// ── Theme palettes ─────────────────────────────────────

#[get("/assets/themes.css")]
pub fn themes_css(ctx: &State<AppContext>) -> (ContentType, String) {
    (ContentType::CSS, theme::palette_css(&ctx.config.themes))
}

// ── Support ────────────────────────────────────────────

/// Tera renders the content; the shared layout is composed around it like
/// any other page.
#[get("/support")]
pub async fn support(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    templates: Metadata<'_>,
) -> Result<RawHtml<String>, Status> {
    let controller = ctx.theme_controller(CookieStore::new(cookies));
    let root = controller.root().clone();
    let config = &ctx.config;
    let (_, page) = templates
        .render(
            "support",
            json!({
                "site_name": config.site.name,
                "theme": controller.theme(),
                "themes": config.themes.themes,
                "payments": config.payments,
                "social": config.social,
                "projects": config.projects,
                "faq": config.faq,
            }),
        )
        .ok_or_else(|| {
            log::error!("Support template failed to render");
            Status::InternalServerError
        })?;
    drop(controller);
    Ok(RawHtml(
        render::render_page(ctx, &page, "/support", &root, &[]).await,
    ))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![index, site_page, themes_css, support]
}
