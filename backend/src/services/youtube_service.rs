use crate::error::{SearchError, UpstreamStage};
use crate::models::{ChannelStats, VideoCandidate};
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use reqwest::{Client, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Read-only view of the video platform used by the viral search.
#[rocket::async_trait]
pub trait VideoPlatform: Send + Sync {
    /// Ids of videos matching `query`, published at or after `published_after`.
    async fn search_videos(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<String>, SearchError>;

    async fn video_details(&self, video_id: &str) -> Result<VideoCandidate, SearchError>;

    async fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats, SearchError>;
}

// Documentation: https://developers.google.com/youtube/v3/docs
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    id: String,
    snippet: VideoSnippet,
    statistics: VideoStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoSnippet {
    title: String,
    channel_id: String,
    channel_title: String,
    published_at: DateTime<Utc>,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Default, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    medium: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoStatistics {
    view_count: Option<String>,
    like_count: Option<String>,
    comment_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    statistics: ChannelStatistics,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelStatistics {
    view_count: Option<String>,
    subscriber_count: Option<String>,
    #[serde(default)]
    hidden_subscriber_count: bool,
    video_count: Option<String>,
}

/// Counts are sent as decimal strings by the API.
fn parse_count(stage: UpstreamStage, field: &str, value: Option<&str>) -> Result<u64, SearchError> {
    let raw = value.ok_or_else(|| SearchError::upstream(stage, format!("missing {field}")))?;
    raw.parse::<u64>()
        .map_err(|e| SearchError::upstream(stage, format!("invalid {field} {raw:?}: {e}")))
}

fn parse_optional_count(
    stage: UpstreamStage,
    field: &str,
    value: Option<&str>,
) -> Result<u64, SearchError> {
    match value {
        Some(_) => parse_count(stage, field, value),
        None => Ok(0),
    }
}

impl VideoItem {
    fn into_candidate(self) -> Result<VideoCandidate, SearchError> {
        let stage = UpstreamStage::VideoDetails;
        let stats = &self.statistics;
        let view_count = parse_count(stage, "viewCount", stats.view_count.as_deref())?;
        let like_count = parse_optional_count(stage, "likeCount", stats.like_count.as_deref())?;
        let comment_count =
            parse_optional_count(stage, "commentCount", stats.comment_count.as_deref())?;

        let thumbnails = self.snippet.thumbnails;
        let thumbnail = thumbnails
            .high
            .or(thumbnails.medium)
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_default();

        Ok(VideoCandidate {
            video_id: self.id,
            title: self.snippet.title,
            thumbnail,
            channel_id: self.snippet.channel_id,
            channel_title: self.snippet.channel_title,
            published_at: self.snippet.published_at,
            view_count,
            like_count,
            comment_count,
        })
    }
}

impl ChannelStatistics {
    fn into_stats(self) -> Result<ChannelStats, SearchError> {
        let stage = UpstreamStage::ChannelStats;
        let subscriber_count = if self.hidden_subscriber_count {
            None
        } else {
            self.subscriber_count
                .as_deref()
                .map(|raw| parse_count(stage, "subscriberCount", Some(raw)))
                .transpose()?
        };
        Ok(ChannelStats {
            subscriber_count,
            video_count: parse_count(stage, "videoCount", self.video_count.as_deref())?,
            total_view_count: parse_count(stage, "viewCount", self.view_count.as_deref())?,
        })
    }
}

fn first_item<T>(stage: UpstreamStage, id: &str, response: ListResponse<T>) -> Result<T, SearchError> {
    response
        .items
        .into_iter()
        .next()
        .ok_or_else(|| SearchError::upstream(stage, format!("no item returned for id {id}")))
}

/// YouTube Data API v3 client.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    base_url: Url,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> anyhow::Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash
        let base_url = if base_url.ends_with('/') {
            Url::parse(base_url)?
        } else {
            Url::parse(&format!("{base_url}/"))?
        };
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            api_key: api_key.to_string(),
        })
    }

    fn build_request(
        &self,
        stage: UpstreamStage,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Request, SearchError> {
        let url = self
            .base_url
            .join(endpoint)
            .map_err(|e| SearchError::upstream(stage, e))?;
        debug!("YouTube {stage} request: {url} {params:?}");

        self.client
            .get(url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .build()
            .map_err(|e| SearchError::upstream(stage, e))
    }

    fn search_request(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Request, SearchError> {
        let published_after = published_after.to_rfc3339_opts(SecondsFormat::Millis, true);
        let max_results = max_results.to_string();
        self.build_request(
            UpstreamStage::Search,
            "search",
            &[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("maxResults", &max_results),
                ("publishedAfter", &published_after),
            ],
        )
    }

    fn video_request(&self, video_id: &str) -> Result<Request, SearchError> {
        self.build_request(
            UpstreamStage::VideoDetails,
            "videos",
            &[("part", "statistics,snippet"), ("id", video_id)],
        )
    }

    fn channel_request(&self, channel_id: &str) -> Result<Request, SearchError> {
        self.build_request(
            UpstreamStage::ChannelStats,
            "channels",
            &[("part", "statistics"), ("id", channel_id)],
        )
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        stage: UpstreamStage,
        request: Request,
    ) -> Result<T, SearchError> {
        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| SearchError::upstream(stage, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::upstream(
                stage,
                format!("status {status}: {body}"),
            ));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SearchError::upstream(stage, e))
    }
}

#[rocket::async_trait]
impl VideoPlatform for YouTubeClient {
    async fn search_videos(
        &self,
        query: &str,
        published_after: DateTime<Utc>,
        max_results: u32,
    ) -> Result<Vec<String>, SearchError> {
        let request = self.search_request(query, published_after, max_results)?;
        let response: ListResponse<SearchItem> =
            self.fetch_json(UpstreamStage::Search, request).await?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| item.id.video_id)
            .collect())
    }

    async fn video_details(&self, video_id: &str) -> Result<VideoCandidate, SearchError> {
        let stage = UpstreamStage::VideoDetails;
        let request = self.video_request(video_id)?;
        let response: ListResponse<VideoItem> = self.fetch_json(stage, request).await?;

        first_item(stage, video_id, response)?.into_candidate()
    }

    async fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats, SearchError> {
        let stage = UpstreamStage::ChannelStats;
        let request = self.channel_request(channel_id)?;
        let response: ListResponse<ChannelItem> = self.fetch_json(stage, request).await?;

        first_item(stage, channel_id, response)?.statistics.into_stats()
    }
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// In-memory platform keyed by id. Unknown ids fail like a missing upstream item.
    #[derive(Default)]
    pub struct FakePlatform {
        pub search_results: Vec<String>,
        pub videos: HashMap<String, VideoCandidate>,
        pub channels: HashMap<String, ChannelStats>,
        pub calls: AtomicUsize,
        pub last_published_after: std::sync::Mutex<Option<DateTime<Utc>>>,
        pub search_delay: Option<Duration>,
    }

    impl FakePlatform {
        pub fn with_video(mut self, video: VideoCandidate, stats: ChannelStats) -> Self {
            self.search_results.push(video.video_id.clone());
            self.channels.insert(video.channel_id.clone(), stats);
            self.videos.insert(video.video_id.clone(), video);
            self
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[rocket::async_trait]
    impl VideoPlatform for FakePlatform {
        async fn search_videos(
            &self,
            _query: &str,
            published_after: DateTime<Utc>,
            max_results: u32,
        ) -> Result<Vec<String>, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.search_delay {
                tokio::time::sleep(delay).await;
            }
            if let Ok(mut last) = self.last_published_after.lock() {
                *last = Some(published_after);
            }
            Ok(self
                .search_results
                .iter()
                .take(max_results as usize)
                .cloned()
                .collect())
        }

        async fn video_details(&self, video_id: &str) -> Result<VideoCandidate, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.videos.get(video_id).cloned().ok_or_else(|| {
                SearchError::upstream(UpstreamStage::VideoDetails, format!("unknown {video_id}"))
            })
        }

        async fn channel_stats(&self, channel_id: &str) -> Result<ChannelStats, SearchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.channels.get(channel_id).copied().ok_or_else(|| {
                SearchError::upstream(UpstreamStage::ChannelStats, format!("unknown {channel_id}"))
            })
        }
    }
}
