use crate::errors::{AppError, PeriodError};
use crate::models::{
    ChannelRecord, ChannelsResponse, FourierQuery, FourierResponse, PeriodBody, PeriodQuery,
    PeriodResponse, VideoRecord, ViewPoint,
};
use crate::state::AppState;
use crate::stats::{analyze_fourier, analyze_period};
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use chrono::{Duration, Local, NaiveDate};
use tracing::info;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let today = Local::now().date_naive();
    let channels = state.loaded_channels().await;
    Html(render_index(&channels, today - Duration::days(365), today))
}

pub async fn get_channels(State(state): State<AppState>) -> Result<Json<ChannelsResponse>, AppError> {
    let channels = state.channels().await;
    if channels.is_empty() {
        return Err(AppError::unavailable("No channel data available"));
    }
    Ok(Json(ChannelsResponse { channels }))
}

pub async fn get_period(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> Result<Json<PeriodResponse>, AppError> {
    let start = parse_date("start", &query.start)?;
    let end = parse_date("end", &query.end)?;
    if start > end {
        return Err(PeriodError::InvertedWindow { start, end }.into());
    }

    let channel = require_channel(&state, &query.channel).await?;
    info!("analyzing {} from {start} to {end}", channel.name);

    let table = state.client.fetch_video_details(&channel.playlist_id).await;
    let analysis = analyze_period(&table.videos, start, end)?.map(|analysis| PeriodBody {
        points: to_points(&analysis.videos),
        stats: analysis.stats,
    });

    Ok(Json(PeriodResponse {
        channel: channel.name,
        start_date: start.to_string(),
        end_date: end.to_string(),
        requested_videos: table.requested,
        fetched_videos: table.fetched(),
        analysis,
    }))
}

pub async fn get_fourier(
    State(state): State<AppState>,
    Query(query): Query<FourierQuery>,
) -> Result<Json<FourierResponse>, AppError> {
    let channel = require_channel(&state, &query.channel).await?;
    info!("running fourier analysis for {}", channel.name);

    let table = state.client.fetch_video_details(&channel.playlist_id).await;
    let (points, spectrum) = match analyze_fourier(&table.videos) {
        Some(analysis) => (to_points(&analysis.videos), Some(analysis.spectrum)),
        None => (Vec::new(), None),
    };

    Ok(Json(FourierResponse {
        channel: channel.name,
        requested_videos: table.requested,
        fetched_videos: table.fetched(),
        points,
        spectrum,
    }))
}

async fn require_channel(state: &AppState, channel_id: &str) -> Result<ChannelRecord, AppError> {
    let channel_id = channel_id.trim();
    if channel_id.is_empty() {
        return Err(AppError::bad_request("channel must be provided"));
    }
    state
        .find_channel(channel_id)
        .await
        .ok_or_else(|| AppError::not_found(format!("unknown channel '{channel_id}'")))
}

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::bad_request(format!("{field} must be a date formatted as YYYY-MM-DD"))
    })
}

fn to_points(videos: &[VideoRecord]) -> Vec<ViewPoint> {
    videos
        .iter()
        .map(|video| ViewPoint {
            published_at: video.published_at.to_rfc3339(),
            title: video.title.clone(),
            views: video.views,
        })
        .collect()
}
