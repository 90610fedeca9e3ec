pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod ui;
pub mod state;
pub mod youtube;

pub use app::router;
pub use config::{ApiConfig, AppConfig};
pub use state::AppState;
pub use youtube::YouTubeClient;
