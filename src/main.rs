#[macro_use]
extern crate rocket;

use std::path::Path;
use std::process;

use rocket::fs::FileServer;
use rocket::response::content::RawHtml;
use rocket::{Build, Rocket};
use rocket_dyn_templates::Template;

mod boot;
mod captcha;
mod config;
mod contact;
mod context;
mod events;
mod guards;
mod layout;
mod prefs;
mod rate_limit;
mod relay;
mod render;
mod routes;
mod store;
mod theme;


use config::SiteConfig;
use context::AppContext;

#[catch(404)]
fn not_found() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>404</h1><p>Page not found.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[catch(500)]
fn server_error() -> RawHtml<String> {
    RawHtml("<html><body style='font-family:sans-serif;text-align:center;padding:80px'><h1>500</h1><p>Internal server error.</p><a href='/'>← Home</a></body></html>".to_string())
}

#[launch]
fn rocket() -> _ {
    env_logger::init();

    let config_path = SiteConfig::path_from_env();
    let config = match SiteConfig::load(Path::new(&config_path)) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            process::exit(1);
        }
    };

    // Boot check: create directories and verify layout fragments
    boot::run(&config);

    let assets = config.assets_dir();
    let ctx = AppContext::new(config);
    log::info!("{} preference listener(s) registered", ctx.bus.handler_count());
    if !ctx.config.contact.endpoint_configured() {
        log::warn!("Contact relay endpoint not configured; submissions will be refused");
    }

    app(ctx, assets)
}

/// Mount every route and catcher around a built context.
fn app(ctx: AppContext, assets: String) -> Rocket<Build> {
    rocket::build()
        .manage(ctx)
        .attach(Template::fairing())
        .mount("/assets", FileServer::from(assets))
        .mount("/", routes::public::routes())
        .mount("/", routes::contact::routes())
        .mount("/", routes::prefs::routes())
        .mount("/api", routes::api::routes())
        .register("/", catchers![not_found, server_error])
}
