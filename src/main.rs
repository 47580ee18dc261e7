use aijolot::audio::AudioPlayback;
use aijolot::identity::UserIdStore;
use aijolot::integration::{
    ConfiguredGeolocation, NarrationCommand, NarrationPipeline, NarratorConfig, SessionController,
    SessionSettings,
};
use aijolot::session::ScrollPolicy;
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // .env is optional
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aijolot=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Aijolot travel narrator");

    let config = NarratorConfig::load_default()?;
    config.validate()?;

    let store = match &config.storage.user_id_path {
        Some(path) => UserIdStore::new(path),
        None => UserIdStore::default_location()?,
    };
    let user_id = store.load_or_create()?;
    info!("Session user {}", user_id);

    let pipeline = NarrationPipeline::from_config(&config)?;
    let command_tx = pipeline.command_sender();
    let event_rx = pipeline.event_receiver();
    let worker = pipeline.start_worker()?;

    let settings = SessionSettings {
        language: config.session.language.clone(),
        user_id: user_id.to_string(),
    };
    let controller = SessionController::new(settings, command_tx.clone(), event_rx)
        .with_playback(open_playback())
        .with_geolocation(Box::new(ConfiguredGeolocation::new(
            config.geolocation.coordinates(),
        )))
        .with_typing_interval(config.typing_interval())
        .with_scroll_policy(ScrollPolicy::new(config.session.scroll_threshold_px))
        .with_default_style(config.session.default_style);

    let result = aijolot::ui::run(controller);

    let _ = command_tx.send(NarrationCommand::Shutdown);
    if worker.join().is_err() {
        warn!("Narration pipeline worker panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {}", e))
}

#[cfg(feature = "audio-io")]
fn open_playback() -> AudioPlayback {
    use aijolot::audio::RodioSink;

    match RodioSink::new() {
        Ok(sink) => AudioPlayback::new(Box::new(sink)),
        Err(e) => {
            warn!("No audio output device, playback disabled: {}", e);
            AudioPlayback::silent()
        }
    }
}

#[cfg(not(feature = "audio-io"))]
fn open_playback() -> AudioPlayback {
    AudioPlayback::silent()
}
