#![allow(dead_code)]

//! In-process stand-in for the YouTube Data API, served on its own thread so
//! every test runtime can share it.

use axum::{
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub const API_KEY: &str = "test-key";

pub static MOCK_API: Lazy<String> = Lazy::new(start_mock_api);

/// Videos in `UU_WIDE` answer slowly so overlapping requests can be counted.
pub const WIDE_VIDEOS: usize = 6;

static WIDE_IN_FLIGHT: AtomicUsize = AtomicUsize::new(0);
static WIDE_PEAK: AtomicUsize = AtomicUsize::new(0);

/// Most `UU_WIDE` video requests the mock has seen at the same time.
pub fn wide_peak_in_flight() -> usize {
    WIDE_PEAK.load(Ordering::SeqCst)
}

pub fn mock_api_url() -> String {
    MOCK_API.clone()
}

fn start_mock_api() -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("mock runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind mock api");
            tx.send(listener.local_addr().expect("mock addr"))
                .expect("report mock addr");
            axum::serve(listener, mock_router()).await.expect("mock api");
        });
    });
    let addr = rx.recv().expect("mock api started");
    format!("http://{addr}")
}

fn mock_router() -> Router {
    Router::new()
        .route("/channels", get(channels))
        .route("/playlistItems", get(playlist_items))
        .route("/videos", get(videos))
}

type Params = Query<HashMap<String, String>>;

fn api_error(status: StatusCode, message: &str) -> Response {
    let body = json!({ "error": { "code": status.as_u16(), "message": message } });
    (status, Json(body)).into_response()
}

fn check_key(params: &HashMap<String, String>) -> Result<(), Response> {
    match params.get("key") {
        Some(key) if key == API_KEY => Ok(()),
        _ => Err(api_error(StatusCode::FORBIDDEN, "API key not valid")),
    }
}

async fn channels(Query(params): Params) -> Response {
    if let Err(resp) = check_key(&params) {
        return resp;
    }
    let ids: Vec<&str> = params
        .get("id")
        .map(|ids| ids.split(',').collect())
        .unwrap_or_default();
    if ids.len() > 50 {
        return api_error(StatusCode::BAD_REQUEST, "too many ids");
    }
    if ids.contains(&"UC_BROKEN") {
        return api_error(StatusCode::INTERNAL_SERVER_ERROR, "backend error");
    }

    // Reverse order: the real API does not echo request order either.
    let items: Vec<Value> = ids.iter().rev().filter_map(|id| channel_item(id)).collect();
    Json(json!({ "kind": "youtube#channelListResponse", "items": items })).into_response()
}

fn channel_item(id: &str) -> Option<Value> {
    match id {
        "UC_ALPHA" => Some(json!({
            "id": "UC_ALPHA",
            "snippet": { "title": "Alpha Analytics", "description": "" },
            "statistics": { "subscriberCount": "1200", "viewCount": "50000", "videoCount": "3" },
            "contentDetails": { "relatedPlaylists": { "uploads": "UU_ALPHA" } }
        })),
        "UC_BETA" => Some(json!({
            "id": "UC_BETA",
            "snippet": { "title": "Beta Bytes", "description": "" },
            "statistics": { "hiddenSubscriberCount": true, "viewCount": "800", "videoCount": "3" },
            "contentDetails": { "relatedPlaylists": { "uploads": "UU_BETA" } }
        })),
        generated if generated.starts_with("UC_GEN_") => Some(json!({
            "id": generated,
            "snippet": { "title": generated },
            "statistics": { "subscriberCount": "1", "viewCount": "1", "videoCount": "1" },
            "contentDetails": { "relatedPlaylists": { "uploads": format!("UU{}", &generated[2..]) } }
        })),
        _ => None,
    }
}

async fn playlist_items(Query(params): Params) -> Response {
    if let Err(resp) = check_key(&params) {
        return resp;
    }
    let playlist = params.get("playlistId").map(String::as_str).unwrap_or_default();
    let token = params.get("pageToken").map(String::as_str);

    let (ids, next): (Vec<&str>, Option<&str>) = match (playlist, token) {
        ("UU_ALPHA", None) => (vec!["v_a1", "v_a2"], Some("alpha-2")),
        ("UU_ALPHA", Some("alpha-2")) => (vec!["v_a3"], None),
        ("UU_BETA", None) => (vec!["v_b1", "v_b2", "v_b3"], None),
        ("UU_CUT", None) => (vec!["v_a1"], Some("boom")),
        ("UU_CUT", Some(_)) => {
            return api_error(StatusCode::INTERNAL_SERVER_ERROR, "backend error");
        }
        // Never stops handing out the same token.
        ("UU_LOOP", None) => (vec!["v_a1"], Some("again")),
        ("UU_LOOP", Some(_)) => (vec!["v_a2"], Some("again")),
        ("UU_WIDE", None) => {
            let ids: Vec<Value> = (1..=WIDE_VIDEOS)
                .map(|i| json!({ "contentDetails": { "videoId": format!("v_w{i}") } }))
                .collect();
            return Json(json!({ "items": ids })).into_response();
        }
        _ => (Vec::new(), None),
    };

    let items: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "contentDetails": { "videoId": id } }))
        .collect();
    let mut body = json!({ "kind": "youtube#playlistItemListResponse", "items": items });
    if let Some(next) = next {
        body["nextPageToken"] = json!(next);
    }
    Json(body).into_response()
}

async fn videos(Query(params): Params) -> Response {
    if let Err(resp) = check_key(&params) {
        return resp;
    }
    let id = params.get("id").map(String::as_str).unwrap_or_default();

    if id.starts_with("v_w") {
        let now = WIDE_IN_FLIGHT.fetch_add(1, Ordering::SeqCst) + 1;
        WIDE_PEAK.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(50)).await;
        WIDE_IN_FLIGHT.fetch_sub(1, Ordering::SeqCst);
        let item = video(id, "2023-03-01T00:00:00Z", Some("10"));
        return Json(json!({ "items": [item] })).into_response();
    }

    let item = match id {
        "v_a1" => video("Year end special", "2022-12-31T18:00:00Z", Some("100")),
        "v_a2" => video("January deep dive", "2023-01-15T09:30:00Z", Some("450")),
        "v_a3" => video("January recap", "2023-01-31T23:00:00Z", Some("450")),
        "v_b1" => video("Beta launch", "2023-02-01T10:00:00Z", None),
        "v_b2" => return api_error(StatusCode::INTERNAL_SERVER_ERROR, "backend error"),
        "v_b3" => video("Beta follow-up", "2023-02-10T12:00:00Z", Some("300")),
        _ => return Json(json!({ "items": [] })).into_response(),
    };
    Json(json!({ "items": [item] })).into_response()
}

fn video(title: &str, published_at: &str, views: Option<&str>) -> Value {
    let statistics = match views {
        Some(views) => json!({ "viewCount": views, "likeCount": "3" }),
        None => json!({ "likeCount": "3" }),
    };
    json!({
        "snippet": { "title": title, "publishedAt": published_at },
        "statistics": statistics
    })
}
