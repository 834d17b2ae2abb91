/// mpv-backed playback.
///
/// Each `play` spawns a fresh `mpv --no-video <url>` child and watches it
/// for a short probe window: if mpv exits during the window (unreachable
/// host, unsupported stream, bad URL) the start counts as failed.  A live
/// stream cannot really be paused, so `pause` kills the child and the next
/// `play` reconnects to the cached URL.
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use heaven_core::config::PlayerConfig;
use heaven_core::protocol::StreamHandle;
use heaven_core::stream::Player;
use heaven_core::{Error, Result};
use tracing::{info, warn};

pub struct MpvPlayer {
    process: Option<tokio::process::Child>,
    volume: f32,
    startup_probe: Duration,
}

impl MpvPlayer {
    pub fn new(config: &PlayerConfig) -> Self {
        Self {
            process: None,
            volume: config.volume,
            startup_probe: Duration::from_millis(config.startup_probe_ms),
        }
    }

    async fn kill(&mut self) {
        if let Some(mut child) = self.process.take() {
            let _ = child.kill().await;
        }
    }

    fn spawn(&self, url: &str) -> Result<tokio::process::Child> {
        let mpv_binary = heaven_core::platform::find_mpv_binary()
            .ok_or_else(|| Error::playback("mpv binary not found"))?;

        // mpv stderr goes to a log file next to tui.log for post-mortems.
        let stderr = std::fs::create_dir_all(heaven_core::platform::data_dir())
            .and_then(|_| {
                std::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(heaven_core::platform::data_dir().join("mpv-stderr.log"))
            })
            .map(Stdio::from)
            .unwrap_or_else(|_| Stdio::null());

        let vol_arg = format!(
            "--volume={}",
            (self.volume * 100.0).clamp(0.0, 100.0).round() as i64
        );

        tokio::process::Command::new(&mpv_binary)
            .arg("--no-video")
            .arg("--no-terminal")
            .arg("--idle=no")
            .arg(vol_arg)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(stderr)
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::playback(format!("failed to spawn mpv: {}", e)))
    }
}

#[async_trait]
impl Player for MpvPlayer {
    async fn play(&mut self, handle: &StreamHandle) -> Result<()> {
        self.kill().await;

        info!("mpv: playing {} stream {}", handle.source.label(), handle.url);
        let mut child = self.spawn(&handle.url)?;

        let probe = tokio::time::timeout(self.startup_probe, child.wait()).await;
        match probe {
            // still running after the probe window
            Err(_) => {
                self.process = Some(child);
                Ok(())
            }
            Ok(Ok(status)) => {
                warn!("mpv exited during start-up: {}", status);
                Err(Error::playback(format!("mpv exited during start-up ({})", status)))
            }
            Ok(Err(e)) => Err(Error::playback(format!("mpv wait failed: {}", e))),
        }
    }

    async fn pause(&mut self) {
        info!("mpv: stopping playback");
        self.kill().await;
    }
}
