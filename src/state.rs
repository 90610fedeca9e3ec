use crate::models::ChannelRecord;
use crate::youtube::YouTubeClient;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub client: YouTubeClient,
    pub channel_ids: Arc<Vec<String>>,
    pub channels: Arc<Mutex<Vec<ChannelRecord>>>,
}

impl AppState {
    pub fn new(client: YouTubeClient, channel_ids: Vec<String>) -> Self {
        Self {
            client,
            channel_ids: Arc::new(channel_ids),
            channels: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns the loaded channels, fetching them first if nothing has been
    /// loaded yet. The lock is not held while the fetch runs.
    pub async fn channels(&self) -> Vec<ChannelRecord> {
        let cached = self.loaded_channels().await;
        if !cached.is_empty() {
            return cached;
        }

        let fetched = self.client.fetch_channel_stats(&self.channel_ids).await;
        if fetched.is_empty() {
            warn!("no channel data was loaded");
            return fetched;
        }
        info!("loaded {} of {} channels", fetched.len(), self.channel_ids.len());

        let mut channels = self.channels.lock().await;
        if channels.is_empty() {
            *channels = fetched;
        }
        channels.clone()
    }

    /// The cached channel list, without touching the network.
    pub async fn loaded_channels(&self) -> Vec<ChannelRecord> {
        self.channels.lock().await.clone()
    }

    pub async fn find_channel(&self, channel_id: &str) -> Option<ChannelRecord> {
        self.channels
            .lock()
            .await
            .iter()
            .find(|channel| channel.id == channel_id)
            .cloned()
    }
}
