use rocket::http::CookieJar;
use rocket::serde::json::Json;
use rocket::State;
use serde_json::{json, Value};

use crate::context::AppContext;
use crate::prefs::PreferenceStore;
use crate::store::CookieStore;

/// Current preferences, read without applying or persisting anything.
#[get("/prefs")]
pub fn prefs(ctx: &State<AppContext>, cookies: &CookieJar<'_>) -> Json<Value> {
    let prefs = PreferenceStore::new(CookieStore::new(cookies), &ctx.config.themes);
    Json(json!({
        "theme": prefs.get_theme(),
        "scheme": prefs.get_scheme(),
    }))
}

#[get("/themes")]
pub fn themes(ctx: &State<AppContext>) -> Json<Value> {
    Json(json!({
        "default": ctx.config.themes.default,
        "themes": ctx.config.themes.themes,
    }))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![prefs, themes]
}
