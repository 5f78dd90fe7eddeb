use rocket::form::Form;
use rocket::http::CookieJar;
use rocket::response::Redirect;
use rocket::State;

use crate::context::AppContext;
use crate::guards::safe_next;
use crate::prefs::Scheme;
use crate::store::CookieStore;

#[derive(Debug, FromForm)]
pub struct ThemeForm {
    pub theme: String,
    pub next: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct SchemeForm {
    pub scheme: String,
    pub next: Option<String>,
}

#[derive(Debug, FromForm)]
pub struct ToggleForm {
    pub next: Option<String>,
}

#[post("/prefs/theme", data = "<form>")]
pub fn set_theme(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    form: Form<ThemeForm>,
) -> Redirect {
    let mut controller = ctx.theme_controller(CookieStore::new(cookies));
    controller.apply_theme(form.theme.trim());
    Redirect::to(safe_next(form.next.as_deref()))
}

#[post("/prefs/scheme", data = "<form>")]
pub fn set_scheme(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    form: Form<SchemeForm>,
) -> Redirect {
    match form.scheme.parse::<Scheme>() {
        Ok(scheme) => ctx
            .theme_controller(CookieStore::new(cookies))
            .apply_scheme(scheme),
        Err(e) => log::warn!("Ignoring scheme change: {}", e),
    }
    Redirect::to(safe_next(form.next.as_deref()))
}

#[post("/prefs/scheme/toggle", data = "<form>")]
pub fn toggle_scheme(
    ctx: &State<AppContext>,
    cookies: &CookieJar<'_>,
    form: Form<ToggleForm>,
) -> Redirect {
    ctx.theme_controller(CookieStore::new(cookies)).toggle_scheme();
    Redirect::to(safe_next(form.next.as_deref()))
}

pub fn routes() -> Vec<rocket::Route> {
    routes![set_theme, set_scheme, toggle_scheme]
}
