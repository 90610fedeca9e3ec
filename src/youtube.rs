//! Read-only client for the three YouTube Data API v3 endpoints the analyzer
//! needs: `channels`, `playlistItems` and `videos`.
//!
//! The public methods never fail. Transport and provider errors are logged and
//! degrade to an empty or partial result, so callers only have to distinguish
//! "got rows" from "got nothing".

use crate::config::ApiConfig;
use crate::errors::FetchError;
use crate::models::{ChannelRecord, VideoRecord, VideoTable};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Provider limit for IDs per `channels` request and items per page.
pub const MAX_BATCH: usize = 50;

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelResource>,
}

#[derive(Debug, Deserialize)]
struct ChannelResource {
    id: String,
    snippet: ChannelSnippet,
    #[serde(default)]
    statistics: Option<ChannelStatistics>,
    #[serde(rename = "contentDetails")]
    content_details: Option<ChannelContentDetails>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelContentDetails {
    #[serde(rename = "relatedPlaylists")]
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemListResponse {
    #[serde(default)]
    items: Vec<PlaylistItemResource>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemResource {
    #[serde(rename = "contentDetails")]
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Deserialize)]
struct PlaylistItemContentDetails {
    #[serde(rename = "videoId")]
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoResource>,
}

#[derive(Debug, Deserialize)]
struct VideoResource {
    snippet: VideoSnippet,
    #[serde(default)]
    statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
struct VideoSnippet {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VideoStatistics {
    #[serde(rename = "viewCount")]
    view_count: Option<String>,
}

#[derive(Clone)]
pub struct YouTubeClient {
    http: Client,
    config: ApiConfig,
}

impl YouTubeClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    /// Statistics for `channel_ids`, in input order. Empty if any batch fails.
    pub async fn fetch_channel_stats(&self, channel_ids: &[String]) -> Vec<ChannelRecord> {
        match self.try_fetch_channel_stats(channel_ids).await {
            Ok(channels) => channels,
            Err(err) => {
                warn!("failed to fetch channel statistics: {err}");
                Vec::new()
            }
        }
    }

    async fn try_fetch_channel_stats(
        &self,
        channel_ids: &[String],
    ) -> Result<Vec<ChannelRecord>, FetchError> {
        let mut channels = Vec::with_capacity(channel_ids.len());

        for batch in channel_ids.chunks(MAX_BATCH) {
            let ids = batch.join(",");
            let response: ChannelListResponse = self
                .get_json(
                    "channels",
                    &[
                        ("part", "snippet,contentDetails,statistics"),
                        ("id", ids.as_str()),
                    ],
                )
                .await?;

            for item in response.items {
                channels.push(channel_record(item)?);
            }
        }

        // The provider does not promise to echo IDs back in request order.
        channels.sort_by_key(|channel| {
            channel_ids
                .iter()
                .position(|id| *id == channel.id)
                .unwrap_or(usize::MAX)
        });
        Ok(channels)
    }

    /// Every video ID in `playlist_id`. Stops at the first failed page and
    /// keeps what it has.
    pub async fn fetch_playlist_video_ids(&self, playlist_id: &str) -> Vec<String> {
        let mut video_ids = Vec::new();
        let mut page_token: Option<String> = None;
        let mut seen_tokens = HashSet::new();

        loop {
            let page = match self.fetch_playlist_page(playlist_id, page_token.as_deref()).await {
                Ok(page) => page,
                Err(err) => {
                    warn!(
                        "stopping pagination of {playlist_id} after {} ids: {err}",
                        video_ids.len()
                    );
                    break;
                }
            };

            video_ids.extend(
                page.items
                    .into_iter()
                    .map(|item| item.content_details.video_id),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => {
                    if !seen_tokens.insert(token.clone()) {
                        warn!("playlist {playlist_id} repeated page token {token}, stopping");
                        break;
                    }
                    page_token = Some(token);
                }
                _ => break,
            }
        }

        video_ids
    }

    async fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemListResponse, FetchError> {
        let max_results = MAX_BATCH.to_string();
        let mut query = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }
        self.get_json("playlistItems", &query).await
    }

    /// Title, publish time and views for one video. `Ok(None)` when the
    /// provider does not know the ID.
    pub async fn fetch_video(&self, video_id: &str) -> Result<Option<VideoRecord>, FetchError> {
        let response: VideoListResponse = self
            .get_json("videos", &[("part", "snippet,statistics"), ("id", video_id)])
            .await?;

        Ok(response.items.into_iter().next().map(|item| VideoRecord {
            title: item.snippet.title,
            published_at: item.snippet.published_at,
            views: parse_count(item.statistics.and_then(|s| s.view_count).as_deref()),
        }))
    }

    /// Collects the playlist's IDs, then fetches every video concurrently
    /// (at most `concurrency` requests in flight) and waits for all of them.
    pub async fn fetch_video_details(&self, playlist_id: &str) -> VideoTable {
        let video_ids = self.fetch_playlist_video_ids(playlist_id).await;
        let requested = video_ids.len();

        let results: Vec<Option<VideoRecord>> = stream::iter(video_ids)
            .map(|video_id| async move {
                match self.fetch_video(&video_id).await {
                    Ok(Some(video)) => Some(video),
                    Ok(None) => {
                        debug!("video {video_id} not returned by the API");
                        None
                    }
                    Err(err) => {
                        warn!("dropping video {video_id}: {err}");
                        None
                    }
                }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let videos: Vec<VideoRecord> = results.into_iter().flatten().collect();
        if videos.len() < requested {
            warn!(
                "playlist {playlist_id}: fetched {} of {requested} videos",
                videos.len()
            );
        }

        VideoTable { videos, requested }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}/{endpoint}", self.config.base_url);
        let resp = self
            .http
            .get(&url)
            .query(query)
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await
            .map_err(FetchError::from_reqwest)?;

        let status = resp.status();
        let text = resp.text().await.map_err(FetchError::from_reqwest)?;
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        serde_json::from_str(&text).map_err(|err| FetchError::Malformed {
            what: endpoint,
            reason: err.to_string(),
        })
    }
}

fn channel_record(item: ChannelResource) -> Result<ChannelRecord, FetchError> {
    let playlist_id = item
        .content_details
        .and_then(|details| details.related_playlists.uploads)
        .filter(|uploads| !uploads.is_empty())
        .ok_or_else(|| FetchError::Malformed {
            what: "channels",
            reason: format!("channel {} has no uploads playlist", item.id),
        })?;
    let stats = item.statistics.unwrap_or_default();

    Ok(ChannelRecord {
        id: item.id,
        name: item.snippet.title,
        subscribers: parse_count(stats.subscriber_count.as_deref()),
        views: parse_count(stats.view_count.as_deref()),
        total_videos: parse_count(stats.video_count.as_deref()),
        playlist_id,
    })
}

/// Counts come back as decimal strings; anything unusable counts as zero.
pub fn parse_count(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
