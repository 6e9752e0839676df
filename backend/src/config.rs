use crate::services::youtube_service::YouTubeClient;
use crate::AppState;
use anyhow::{bail, Result};
use env_logger::{Builder, Env};
use lazy_static::lazy_static;
use log::info;
use rocket::http::Method;
use rocket_cors::{AllowedHeaders, AllowedOrigins, CorsOptions};
use std::env;
use std::sync::Arc;
use std::time::Duration;

lazy_static! {
    pub static ref YOUTUBE_API_KEY: String = env::var("YOUTUBE_API_KEY").unwrap_or_default();
    pub static ref YOUTUBE_API_URL: String = env::var("YOUTUBE_API_URL")
        .unwrap_or_else(|_| "https://www.googleapis.com/youtube/v3".to_string());
    pub static ref UPSTREAM_TIMEOUT_SECS: u64 = env::var("UPSTREAM_TIMEOUT_SECS")
        .unwrap_or_else(|_| "10".to_string())
        .parse::<u64>()
        .unwrap_or(10);
    pub static ref SEARCH_TIMEOUT_SECS: u64 = env::var("SEARCH_TIMEOUT_SECS")
        .unwrap_or_else(|_| "30".to_string())
        .parse::<u64>()
        .unwrap_or(30);
    pub static ref CORS_ALLOWED_ORIGIN: String = env::var("CORS_ALLOWED_ORIGIN")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());
}

pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    info!("Starting viral search backend...");
}

pub fn load_environment() {
    dotenv::dotenv().ok();
}

pub fn create_youtube_client() -> Result<YouTubeClient> {
    let api_key = &*YOUTUBE_API_KEY;
    if api_key.trim().is_empty() {
        bail!("YOUTUBE_API_KEY environment variable must be set");
    }

    let api_url = &*YOUTUBE_API_URL;
    info!(
        "Using YouTube Data API at {api_url} (call timeout {}s)",
        *UPSTREAM_TIMEOUT_SECS
    );
    YouTubeClient::new(
        api_url,
        api_key,
        Duration::from_secs(*UPSTREAM_TIMEOUT_SECS),
    )
}

pub fn create_app_state() -> Result<AppState> {
    let client = create_youtube_client()?;

    Ok(AppState {
        platform: Arc::new(client),
        search_timeout: Duration::from_secs(*SEARCH_TIMEOUT_SECS),
    })
}

pub fn create_cors() -> Result<rocket_cors::Cors> {
    let cors = CorsOptions::default()
        .allowed_origins(AllowedOrigins::some_exact(&[CORS_ALLOWED_ORIGIN.as_str()]))
        .allowed_methods(
            vec![Method::Get, Method::Options]
                .into_iter()
                .map(From::from)
                .collect(),
        )
        .allowed_headers(AllowedHeaders::some(&["Accept", "Content-Type"]))
        .to_cors()
        .map_err(|e| anyhow::anyhow!("Failed to create CORS options: {}", e))?;

    Ok(cors)
}
