use crate::error::SearchError;
use crate::models::SearchVideosResponse;
use crate::services::virality_service::find_viral_videos;
use crate::AppState;
use chrono::Utc;
use log::info;
use rocket::serde::json::Json;
use rocket::{get, State};

#[get("/?<q>")]
pub async fn viral_search(
    q: Option<String>,
    state: &State<AppState>,
) -> Result<Json<SearchVideosResponse>, SearchError> {
    let query = q.unwrap_or_default();
    info!("Viral search request: '{query}'");

    let search = find_viral_videos(state.platform.as_ref(), &query, Utc::now());
    let videos = tokio::time::timeout(state.search_timeout, search)
        .await
        .map_err(|_| SearchError::TimedOut(state.search_timeout))??;

    Ok(Json(SearchVideosResponse { videos }))
}
