use crate::error::SearchError;
use crate::models::{
    ChannelStats, ChannelSummary, DisplayStats, ScoredVideo, VideoCandidate, ViralMetrics,
};
use crate::services::youtube_service::VideoPlatform;
use crate::utils::{compare_desc, format_compact_count, format_viral_factor};
use chrono::{DateTime, Datelike, Duration, Months, Utc};
use futures::future::try_join_all;
use log::{debug, info};

/// Candidates requested from the search endpoint per query.
pub const MAX_CANDIDATES: u32 = 10;
/// Searches only look back this many calendar months.
pub const LOOKBACK_MONTHS: u32 = 6;
pub const MIN_VIEWS_RATIO: f64 = 2.0;
pub const MAX_DAYS_AGO: i64 = 180;

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Lower publish-date bound for a search started at `now`.
///
/// The day of month is kept and rolls over into the following month when the
/// target month is shorter, so 31 August maps to 3 March (2 March in leap years).
pub fn published_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let day_offset = Duration::days(i64::from(now.day0()));
    now.with_day(1)
        .and_then(|first| first.checked_sub_months(Months::new(LOOKBACK_MONTHS)))
        .and_then(|first| first.checked_add_signed(day_offset))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Whole days elapsed, floored. Future dates give negative values.
pub fn days_between(published_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - published_at)
        .num_milliseconds()
        .div_euclid(MILLIS_PER_DAY)
}

/// A hidden subscriber count never compares as exceeded, so such videos are not viral.
pub fn is_viral(
    view_count: u64,
    subscriber_count: Option<u64>,
    views_ratio: f64,
    days_ago: i64,
) -> bool {
    subscriber_count.is_some_and(|subscribers| view_count > subscribers)
        && views_ratio > MIN_VIEWS_RATIO
        && days_ago <= MAX_DAYS_AGO
}

/// Combines a video with its channel's statistics.
///
/// Zero denominators never produce NaN or infinity: a channel without videos
/// has an average of 0 and a ratio of 0.0, a video without views has an
/// engagement rate of 0.0. A ratio of 0.0 is never viral.
pub fn score_video(video: VideoCandidate, stats: ChannelStats, now: DateTime<Utc>) -> ScoredVideo {
    let average_views = stats
        .total_view_count
        .checked_div(stats.video_count)
        .unwrap_or(0);

    let views_ratio = if average_views == 0 {
        0.0
    } else {
        video.view_count as f64 / average_views as f64
    };

    let engagement_rate = if video.view_count == 0 {
        0.0
    } else {
        let interactions = video.like_count.saturating_add(video.comment_count);
        interactions as f64 / video.view_count as f64 * 100.0
    };

    let days_ago = days_between(video.published_at, now);
    let viral = is_viral(video.view_count, stats.subscriber_count, views_ratio, days_ago);

    let display = DisplayStats {
        views: format_compact_count(video.view_count),
        viral_factor: format_viral_factor(views_ratio),
    };

    ScoredVideo {
        video,
        channel_stats: ChannelSummary {
            subscriber_count: stats.subscriber_count,
            video_count: stats.video_count,
            average_views,
        },
        metrics: ViralMetrics {
            views_ratio,
            engagement_rate,
            days_ago,
            is_viral: viral,
        },
        display,
    }
}

/// Keeps viral videos only, highest views ratio first.
pub fn rank_viral(videos: Vec<ScoredVideo>) -> Vec<ScoredVideo> {
    let mut viral: Vec<ScoredVideo> = videos.into_iter().filter(|v| v.metrics.is_viral).collect();
    viral.sort_by(|a, b| compare_desc(a.metrics.views_ratio, b.metrics.views_ratio));
    viral
}

async fn score_candidate<P: VideoPlatform + ?Sized>(
    platform: &P,
    video_id: &str,
    now: DateTime<Utc>,
) -> Result<ScoredVideo, SearchError> {
    let video = platform.video_details(video_id).await?;
    let stats = platform.channel_stats(&video.channel_id).await?;
    Ok(score_video(video, stats, now))
}

/// Searches `query` and returns the viral videos among the results.
///
/// Candidates are looked up concurrently. The first failed lookup fails the
/// whole search; no partial list is returned.
pub async fn find_viral_videos<P: VideoPlatform + ?Sized>(
    platform: &P,
    query: &str,
    now: DateTime<Utc>,
) -> Result<Vec<ScoredVideo>, SearchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(SearchError::InvalidInput(
            "Search query is required".to_string(),
        ));
    }

    let after = published_after(now);
    let video_ids = platform
        .search_videos(query, after, MAX_CANDIDATES)
        .await?;
    debug!(
        "Search '{query}' published after {after} returned {} candidates",
        video_ids.len()
    );

    let scored = try_join_all(
        video_ids
            .iter()
            .map(|video_id| score_candidate(platform, video_id, now)),
    )
    .await?;
    let candidate_count = scored.len();

    let ranked = rank_viral(scored);
    info!(
        "Search '{query}': {} of {candidate_count} candidates are viral",
        ranked.len()
    );
    Ok(ranked)
}
