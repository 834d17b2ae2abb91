use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::platform;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub listeners: ListenersConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub links: LinksConfig,
}

/// Remote endpoints the client talks to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// "Next tracks" JSON listing, queried with `?limit=<track_limit>`.
    #[serde(default = "default_track_listing_url")]
    pub track_listing_url: String,
    #[serde(default = "default_track_limit")]
    pub track_limit: u32,
    /// Text playlist descriptor; the first `http` line is the stream.
    #[serde(default = "default_playlist_descriptor_url")]
    pub playlist_descriptor_url: String,
    /// Used when the descriptor cannot be resolved or its stream won't play.
    #[serde(default = "default_fallback_stream_url")]
    pub fallback_stream_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Per-request timeout.  Applies to the playlist descriptor as well.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Keep a ready track list on screen while a refresh is in flight
    /// instead of flipping back to "loading" every cycle.
    #[serde(default)]
    pub keep_last_good: bool,
    /// Drop responses that arrive after a newer request's response.
    #[serde(default)]
    pub discard_stale_responses: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenersConfig {
    #[serde(default = "default_listeners_min")]
    pub min: u32,
    #[serde(default = "default_listeners_max")]
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default = "default_volume")]
    pub volume: f32,
    /// How long mpv must stay alive after spawn before playback counts as started.
    #[serde(default = "default_startup_probe_ms")]
    pub startup_probe_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Optional `[[slot]]` TOML file overriding the built-in programme grid.
    #[serde(default = "default_schedule_toml")]
    pub schedule_toml: PathBuf,
}

/// Donation prompt and community links shown by the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinksConfig {
    #[serde(default = "default_donation_url")]
    pub donation_url: String,
    /// Delay before the one-shot donation prompt opens; 0 disables it.
    #[serde(default = "default_donation_prompt_secs")]
    pub donation_prompt_secs: u64,
    #[serde(default = "default_community_links")]
    pub community: Vec<CommunityLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunityLink {
    pub name: String,
    pub url: String,
}

impl CommunityLink {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl LinksConfig {
    pub fn donation_prompt_delay(&self) -> Option<Duration> {
        (self.donation_prompt_secs > 0).then(|| Duration::from_secs(self.donation_prompt_secs))
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            track_listing_url: default_track_listing_url(),
            track_limit: default_track_limit(),
            playlist_descriptor_url: default_playlist_descriptor_url(),
            fallback_stream_url: default_fallback_stream_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            keep_last_good: false,
            discard_stale_responses: false,
        }
    }
}

impl Default for ListenersConfig {
    fn default() -> Self {
        Self {
            min: default_listeners_min(),
            max: default_listeners_max(),
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: default_volume(),
            startup_probe_ms: default_startup_probe_ms(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            schedule_toml: default_schedule_toml(),
        }
    }
}

/// Floor for every periodic timer; `tokio::time::interval` panics on zero.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

impl Default for LinksConfig {
    fn default() -> Self {
        Self {
            donation_url: default_donation_url(),
            donation_prompt_secs: default_donation_prompt_secs(),
            community: default_community_links(),
        }
    }
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs).max(MIN_INTERVAL)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

fn default_track_listing_url() -> String {
    "https://api.radioking.io/widget/radio/heavenradio/track/ckoi".to_string()
}

fn default_track_limit() -> u32 {
    2
}

fn default_playlist_descriptor_url() -> String {
    "https://listen.radioking.com/radio/heavenradio/stream.m3u".to_string()
}

fn default_fallback_stream_url() -> String {
    "https://listen.radioking.com/radio/heavenradio/stream".to_string()
}

fn default_user_agent() -> String {
    concat!("heavenradio/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_interval_secs() -> u64 {
    30
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_listeners_min() -> u32 {
    30
}

fn default_listeners_max() -> u32 {
    40
}

fn default_volume() -> f32 {
    0.8
}

fn default_startup_probe_ms() -> u64 {
    1500
}

fn default_donation_url() -> String {
    "https://www.paypal.com/paypalme/revelationradio".to_string()
}

fn default_donation_prompt_secs() -> u64 {
    12
}

fn default_community_links() -> Vec<CommunityLink> {
    vec![
        CommunityLink::new("Discord", "https://discord.com/invite/NNTR3NzPXk"),
        CommunityLink::new("Twitch", "https://www.twitch.tv/heavenradiocatholique"),
        CommunityLink::new("YouTube", "https://www.youtube.com/@heavenradiocatholique"),
        CommunityLink::new("Facebook", "https://www.facebook.com/heavenradiocatholique"),
        CommunityLink::new("Instagram", "https://www.instagram.com/heavenradio.fr/"),
        CommunityLink::new("TikTok", "https://www.tiktok.com/@heavenradiocatholique"),
    ]
}

fn default_schedule_toml() -> PathBuf {
    platform::config_dir().join("schedule.toml")
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
