use chrono::{DateTime, Utc};
use rocket::serde::{Deserialize, Serialize};

/// A video as returned by the YouTube videos endpoint, reduced to the fields we score on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoCandidate {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
    pub channel_id: String,
    pub channel_title: String,
    pub published_at: DateTime<Utc>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    /// `None` when the channel hides its subscriber count.
    pub subscriber_count: Option<u64>,
    pub video_count: u64,
    pub total_view_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSummary {
    pub subscriber_count: Option<u64>,
    pub video_count: u64,
    pub average_views: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViralMetrics {
    pub views_ratio: f64,
    pub engagement_rate: f64,
    pub days_ago: i64,
    pub is_viral: bool,
}

/// Pre-formatted numbers for cards, e.g. `2.4M` views and a `4.8x` viral factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayStats {
    pub views: String,
    pub viral_factor: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredVideo {
    #[serde(flatten)]
    pub video: VideoCandidate,
    pub channel_stats: ChannelSummary,
    pub metrics: ViralMetrics,
    pub display: DisplayStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchVideosResponse {
    pub videos: Vec<ScoredVideo>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
