//! Core service façade and bootstrap helpers.
//!
//! Wires the host-provided bridges from a [`CoreConfig`] into the catalog,
//! the event bus and the playback controller, and exposes the command set
//! the UI layer drives. Hosts either own a [`CoreService`] directly or go
//! through the process-wide accessor in [`instance`].
//!
//! ```no_run
//! use core_runtime::config::CoreConfig;
//! use core_service::CoreService;
//!
//! # async fn run() -> core_service::Result<()> {
//! let core = CoreService::new(CoreConfig::default()).await?;
//! core.play_track_by_id(&"1".into()).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod instance;

pub use error::{CoreError, Result};

use std::sync::Arc;
use std::time::Duration;

use bridge_traits::playback::AudioBackend;
use core_async::sync::{broadcast, watch};
use core_catalog::{
    CatalogSource, Category, ListingCatalog, StaticCatalog, Track, TrackCatalog, TrackId,
};
use core_playback::{
    PlaybackConfig, PlaybackController, SeekOffset, SessionSnapshot, SimulatedBackend,
    SleepTimerMode,
};
use core_runtime::config::CoreConfig;
use core_runtime::events::{CoreEvent, EventBus, EventStream};
use tracing::{info, warn};

/// Primary façade exposed to host applications.
#[derive(Clone)]
pub struct CoreService {
    catalog: Arc<dyn TrackCatalog>,
    catalog_source: CatalogSource,
    controller: PlaybackController,
    events: EventBus,
}

impl CoreService {
    /// Build the service from validated configuration.
    ///
    /// The audio backend is chosen once: the host's when configured,
    /// otherwise the simulated backend. A configured remote listing is loaded
    /// here, falling back to its offline tracks on failure; without one the
    /// bundled catalog is used.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);

        let backend: Arc<dyn AudioBackend> = match &config.audio_backend {
            Some(backend) => Arc::clone(backend),
            None => {
                warn!("No native audio backend provided; playback will be simulated");
                Arc::new(SimulatedBackend::new())
            }
        };

        let (catalog, catalog_source): (Arc<dyn TrackCatalog>, CatalogSource) =
            match &config.remote_listing {
                Some(listing) => {
                    let catalog =
                        ListingCatalog::new(Arc::clone(listing)).with_event_bus(events.clone());
                    let source = catalog.load().await;
                    (Arc::new(catalog), source)
                }
                None => (Arc::new(StaticCatalog::builtin()), CatalogSource::Bundled),
            };

        let controller = PlaybackController::new(
            backend,
            PlaybackConfig::from_core(&config),
            Some(events.clone()),
        )?;

        info!(
            backend = controller.backend_name(),
            catalog = catalog_source.as_str(),
            "Core service ready"
        );

        Ok(Self {
            catalog,
            catalog_source,
            controller,
            events,
        })
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    pub fn catalog(&self) -> Arc<dyn TrackCatalog> {
        Arc::clone(&self.catalog)
    }

    /// Where the catalog's tracks came from.
    pub fn catalog_source(&self) -> CatalogSource {
        self.catalog_source
    }

    pub async fn list_tracks(&self) -> Vec<Track> {
        self.catalog.list_tracks().await
    }

    pub async fn categories(&self) -> Vec<Category> {
        self.catalog.categories().await
    }

    pub async fn lookup_track(&self, id: &TrackId) -> Result<Track> {
        Ok(self.catalog.lookup_track(id).await?)
    }

    // ------------------------------------------------------------------
    // Playback commands
    // ------------------------------------------------------------------

    /// Look up `id` and play it.
    ///
    /// Unknown ids fail with [`CoreError::Catalog`] and leave the session
    /// untouched.
    pub async fn play_track_by_id(&self, id: &TrackId) -> Result<()> {
        let track = self.catalog.lookup_track(id).await.map_err(|err| {
            warn!(track_id = %id, error = %err, "Cannot play unknown track");
            err
        })?;
        self.controller.play_track(track).await;
        Ok(())
    }

    pub async fn play_track(&self, track: Track) {
        self.controller.play_track(track).await;
    }

    pub async fn pause_track(&self) {
        self.controller.pause_track().await;
    }

    pub async fn toggle_playback(&self) {
        self.controller.toggle_playback().await;
    }

    pub async fn stop_sound(&self) {
        self.controller.stop_sound().await;
    }

    pub async fn seek_to(&self, position: Duration) {
        self.controller.seek_to(position).await;
    }

    pub async fn skip_by(&self, offset: SeekOffset) {
        self.controller.skip_by(offset).await;
    }

    pub async fn set_volume(&self, level: f32) {
        self.controller.set_volume(level).await;
    }

    /// Arm the sleep timer. Must be called from within a Tokio runtime.
    pub fn set_sleep_timer(&self, mode: SleepTimerMode) -> Result<()> {
        Ok(self.controller.set_sleep_timer(mode)?)
    }

    pub fn cancel_sleep_timer(&self) {
        self.controller.cancel_sleep_timer();
    }

    pub fn sleep_timer_remaining(&self) -> Option<Duration> {
        self.controller.sleep_timer_remaining()
    }

    // ------------------------------------------------------------------
    // Observation
    // ------------------------------------------------------------------

    pub fn snapshot(&self) -> SessionSnapshot {
        self.controller.snapshot()
    }

    /// Session snapshots, starting with the current one.
    pub fn subscribe_session(&self) -> watch::Receiver<SessionSnapshot> {
        self.controller.subscribe()
    }

    /// Raw event receiver. Only events emitted after subscribing arrive.
    pub fn subscribe_events(&self) -> broadcast::Receiver<CoreEvent> {
        self.events.subscribe()
    }

    /// Event stream with optional filtering.
    pub fn event_stream(&self) -> EventStream {
        EventStream::new(self.events.subscribe())
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Stop playback and release the session. Later commands are ignored.
    pub async fn shutdown(&self) {
        self.controller.shutdown().await;
        info!("Core service shut down");
    }
}

impl std::fmt::Debug for CoreService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreService")
            .field("catalog_source", &self.catalog_source)
            .field("controller", &self.controller)
            .finish()
    }
}
