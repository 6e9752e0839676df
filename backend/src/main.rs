#[macro_use]
extern crate rocket;

mod api;
mod config;
mod error;
mod models;
mod services;
mod utils;

use crate::services::youtube_service::VideoPlatform;
use log::error;
use rocket::{Build, Rocket};
use std::sync::Arc;
use std::time::Duration;

pub struct AppState {
    pub platform: Arc<dyn VideoPlatform>,
    pub search_timeout: Duration,
}

pub fn build_rocket(state: AppState) -> Rocket<Build> {
    rocket::build()
        .manage(state)
        .mount("/", routes![api::index, api::health])
        .mount("/search", routes![api::viral_search])
        .mount("/api/youtube/search", routes![api::viral_search])
}

#[launch]
fn rocket() -> Rocket<Build> {
    config::load_environment();
    config::init_logger();

    let state = match config::create_app_state() {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {e:?}");
            std::process::exit(1);
        }
    };

    let cors = match config::create_cors() {
        Ok(cors) => cors,
        Err(e) => {
            error!("Failed to create CORS fairing: {e:?}");
            std::process::exit(1);
        }
    };

    build_rocket(state).attach(cors)
}
