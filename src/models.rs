use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChannelRecord {
    pub id: String,
    pub name: String,
    pub subscribers: u64,
    pub views: u64,
    pub total_videos: u64,
    pub playlist_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct VideoRecord {
    pub title: String,
    pub published_at: DateTime<Utc>,
    pub views: u64,
}

impl VideoRecord {
    pub fn published_date(&self) -> NaiveDate {
        self.published_at.date_naive()
    }
}

/// Videos fetched for one playlist, with how many were asked for.
#[derive(Debug, Clone, Default)]
pub struct VideoTable {
    pub videos: Vec<VideoRecord>,
    pub requested: usize,
}

impl VideoTable {
    pub fn fetched(&self) -> usize {
        self.videos.len()
    }

    pub fn is_partial(&self) -> bool {
        self.fetched() < self.requested
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Spectrum {
    pub frequencies: Vec<f64>,
    pub magnitudes: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PeriodStats {
    pub total_videos: usize,
    pub total_views: u64,
    pub average_views: f64,
    pub max_views: u64,
    pub min_views: u64,
    pub most_viewed_video: String,
    pub least_viewed_video: String,
    pub spectrum: Spectrum,
}

#[derive(Debug, Clone)]
pub struct PeriodAnalysis {
    pub videos: Vec<VideoRecord>,
    pub stats: PeriodStats,
}

#[derive(Debug, Clone)]
pub struct FourierAnalysis {
    pub videos: Vec<VideoRecord>,
    pub spectrum: Spectrum,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub channel: String,
    pub start: String,
    pub end: String,
}

#[derive(Debug, Deserialize)]
pub struct FourierQuery {
    pub channel: String,
}

#[derive(Debug, Serialize)]
pub struct ChannelsResponse {
    pub channels: Vec<ChannelRecord>,
}

#[derive(Debug, Serialize)]
pub struct ViewPoint {
    pub published_at: String,
    pub title: String,
    pub views: u64,
}

#[derive(Debug, Serialize)]
pub struct PeriodBody {
    pub points: Vec<ViewPoint>,
    pub stats: PeriodStats,
}

#[derive(Debug, Serialize)]
pub struct PeriodResponse {
    pub channel: String,
    pub start_date: String,
    pub end_date: String,
    pub requested_videos: usize,
    pub fetched_videos: usize,
    pub analysis: Option<PeriodBody>,
}

#[derive(Debug, Serialize)]
pub struct FourierResponse {
    pub channel: String,
    pub requested_videos: usize,
    pub fetched_videos: usize,
    pub points: Vec<ViewPoint>,
    pub spectrum: Option<Spectrum>,
}
