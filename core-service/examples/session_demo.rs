//! Simulated playback session demonstration
//!
//! Boots the core without a native audio backend, plays a bundled track and
//! prints the session as it progresses.
//!
//! Run with:
//! ```bash
//! cargo run -p core-service --example session_demo
//!
//! # Pick a track and JSON logs
//! cargo run -p core-service --example session_demo -- 3 json
//! ```

use anyhow::Context;
use bridge_traits::LogLevel;
use core_catalog::TrackId;
use core_playback::{SeekOffset, SleepTimerMode};
use core_runtime::config::CoreConfig;
use core_runtime::events::CoreEvent;
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::CoreService;
use std::env;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let track_id = args.get(1).cloned().unwrap_or_else(|| "1".to_string());
    let format = match args.get(2).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        _ => LogFormat::Pretty,
    };

    init_logging(
        LoggingConfig::default()
            .with_format(format)
            .with_level(LogLevel::Debug),
    )
    .context("failed to initialize logging")?;

    let config = CoreConfig::builder()
        .poll_interval(Duration::from_millis(500))
        .build()
        .context("invalid core configuration")?;
    let core = CoreService::new(config).await?;

    let mut events = core.event_stream().filter(|event| {
        !matches!(
            event,
            CoreEvent::Playback(core_runtime::events::PlaybackEvent::PositionChanged { .. })
        )
    });
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            println!("event: {}", event.description());
        }
    });

    for track in core.list_tracks().await {
        println!("{:>3}  {:<24} {:>4}s  {}", track.id, track.title, track.duration_secs, track.category);
    }

    core.play_track_by_id(&TrackId::new(track_id)).await?;
    tokio::time::sleep(Duration::from_secs(2)).await;

    core.skip_by(SeekOffset::Forward(Duration::from_secs(30))).await;
    core.set_volume(0.6).await;
    core.set_sleep_timer(SleepTimerMode::EndOfTrack)?;

    for _ in 0..4 {
        tokio::time::sleep(Duration::from_secs(1)).await;
        let snapshot = core.snapshot();
        println!(
            "{:<8} {:>5.1}s / {:>5.1}s  volume {:.0}%",
            snapshot.status.as_str(),
            snapshot.progress.as_secs_f32(),
            snapshot.duration.as_secs_f32(),
            snapshot.volume * 100.0
        );
    }

    core.toggle_playback().await;
    core.shutdown().await;
    Ok(())
}
