use std::{io::ErrorKind, path::Path, time::Duration};

use anyhow::Context;
use rumqttc::{AsyncClient, Event, Incoming, MqttOptions, QoS};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use appliance_monitor_common::{
    CycleOutcome, DiscoveryConfig, Monitor, MonitorConfig, RasterImage, Reading,
};

const DEFAULT_MQTT_PORT: u16 = 1883;
const PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("snapshot request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("snapshot decode failed: {0}")]
    Decode(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("publish to {topic} failed: {source}")]
    Client {
        topic: String,
        #[source]
        source: rumqttc::ClientError,
    },

    #[error("publish to {topic} timed out")]
    Timeout { topic: String },
}

pub trait ImageSource {
    async fn fetch(&self) -> Result<RasterImage, FetchError>;
}

pub trait Publisher {
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        retained: bool,
    ) -> Result<(), PublishError>;
}

pub struct HttpImageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpImageSource {
    pub fn new(url: String, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build http client")?;
        Ok(Self { client, url })
    }
}

impl ImageSource for HttpImageSource {
    async fn fetch(&self) -> Result<RasterImage, FetchError> {
        let body = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;
        decode_snapshot(&body)
    }
}

/// Any colour type is widened to 16-bit RGB (8-bit samples scale by 257).
pub fn decode_snapshot(raw: &[u8]) -> Result<RasterImage, FetchError> {
    Ok(image::load_from_memory(raw)?.to_rgb16())
}

impl Publisher for AsyncClient {
    async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        retained: bool,
    ) -> Result<(), PublishError> {
        // Never waits for queue space: the queue only drains while connected.
        self.try_publish(topic, QoS::AtMostOnce, retained, payload)
            .map_err(|source| PublishError::Client {
                topic: topic.to_string(),
                source,
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HostConfig {
    image_url: String,
    mqtt_host: String,
    mqtt_port: u16,
    mqtt_user: Option<String>,
    mqtt_pass: String,
    client_id: String,
    poll_interval: Duration,
    fetch_timeout: Duration,
}

impl HostConfig {
    fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let first = |keys: &[&str]| keys.iter().find_map(|key| lookup(key));

        let image_url = lookup("IMAGE_URL")
            .filter(|url| !url.is_empty())
            .context("IMAGE_URL must be set")?;

        let default_port = lookup("MQTT_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_MQTT_PORT);
        let broker = lookup("MQTT_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let (mqtt_host, mqtt_port) = parse_broker(&broker, default_port)?;

        let seconds = |key: &str, default: u64| {
            lookup(key)
                .and_then(|value| value.parse::<u64>().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(default))
        };

        Ok(Self {
            image_url,
            mqtt_host,
            mqtt_port,
            mqtt_user: first(&["MQTT_USER", "MQTT_USERNAME"]).filter(|user| !user.is_empty()),
            mqtt_pass: first(&["MQTT_PASS", "MQTT_PASSWORD"]).unwrap_or_default(),
            client_id: lookup("MQTT_CLIENT_ID")
                .unwrap_or_else(|| "washingmachine-checker".to_string()),
            poll_interval: seconds("POLL_INTERVAL_SECS", 60),
            fetch_timeout: seconds("FETCH_TIMEOUT_SECS", 10),
        })
    }
}

/// Accepts `host`, `host:port`, `tcp://host[:port]` or `mqtt://host[:port]`.
fn parse_broker(broker: &str, default_port: u16) -> anyhow::Result<(String, u16)> {
    let address = match broker.split_once("://") {
        Some(("tcp" | "mqtt", rest)) => rest,
        Some((scheme, _)) => {
            anyhow::bail!("unsupported mqtt scheme {scheme}:// in {broker}, only plain tcp is built")
        }
        None => broker,
    }
    .trim_end_matches('/');

    if address.is_empty() {
        anyhow::bail!("empty mqtt broker address");
    }

    match address.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => {
            let port = port
                .parse::<u16>()
                .with_context(|| format!("invalid mqtt port in {broker}"))?;
            Ok((host.to_string(), port))
        }
        _ => Ok((address.to_string(), default_port)),
    }
}

async fn load_monitor_config(path: Option<&Path>) -> anyhow::Result<MonitorConfig> {
    let Some(path) = path else {
        return Ok(MonitorConfig::default());
    };
    match tokio::fs::read(path).await {
        Ok(raw) => serde_json::from_slice::<MonitorConfig>(&raw)
            .with_context(|| format!("invalid monitor config at {}", path.display())),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("monitor config {} not found, using defaults", path.display());
            Ok(MonitorConfig::default())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn run() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let host = HostConfig::from_env()?;
    let config_path = std::env::var("MONITOR_CONFIG").ok().map(std::path::PathBuf::from);
    let config = load_monitor_config(config_path.as_deref()).await?;
    let monitor = Monitor::new(config, &DiscoveryConfig::default())
        .context("invalid monitor configuration")?;

    let source = HttpImageSource::new(host.image_url.clone(), host.fetch_timeout)?;

    let mut mqtt_options = MqttOptions::new(host.client_id, host.mqtt_host, host.mqtt_port);
    mqtt_options.set_keep_alive(Duration::from_secs(30));
    if let Some(user) = host.mqtt_user {
        mqtt_options.set_credentials(user, host.mqtt_pass);
    }
    let (mqtt, eventloop) = AsyncClient::new(mqtt_options, 32);

    let shutdown = CancellationToken::new();
    spawn_mqtt_loop(eventloop, shutdown.clone());
    spawn_signal_handler(shutdown.clone());

    info!(
        "monitor started, polling {} every {:?}",
        host.image_url, host.poll_interval
    );
    let result = poll_loop(monitor, &source, &mqtt, host.poll_interval, shutdown.clone()).await;
    shutdown.cancel();

    if let Err(err) = mqtt.try_disconnect() {
        debug!("mqtt disconnect failed: {err}");
    }
    result
}

fn spawn_mqtt_loop(mut eventloop: rumqttc::EventLoop, shutdown: CancellationToken) {
    tokio::spawn(async move {
        loop {
            let event = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                event = eventloop.poll() => event,
            };
            match event {
                Ok(Event::Incoming(Incoming::ConnAck(_))) => info!("mqtt connected"),
                Ok(_) => {}
                Err(err) => {
                    warn!("mqtt poll error: {err}");
                    tokio::time::sleep(Duration::from_secs(2)).await;
                }
            }
        }
    });
}

fn spawn_signal_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("shutdown requested"),
            Err(err) => warn!("failed to listen for shutdown signal: {err}"),
        }
        shutdown.cancel();
    });
}

/// Runs one cycle per tick until cancelled. Only a misconfigured sample region ends it early.
pub async fn poll_loop<S, P>(
    mut monitor: Monitor,
    source: &S,
    publisher: &P,
    period: Duration,
    shutdown: CancellationToken,
) -> anyhow::Result<()>
where
    S: ImageSource,
    P: Publisher,
{
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {}
        }

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            result = run_cycle(&mut monitor, source, publisher) => result?,
        }
    }

    info!("poll loop stopped");
    Ok(())
}

async fn run_cycle<S, P>(monitor: &mut Monitor, source: &S, publisher: &P) -> anyhow::Result<()>
where
    S: ImageSource,
    P: Publisher,
{
    let image = match source.fetch().await {
        Ok(image) => Some(image),
        Err(err) => {
            warn!("snapshot unavailable: {err}");
            None
        }
    };

    let outcome = monitor
        .cycle(image.as_ref())
        .context("sample region does not fit the snapshot")?;
    log_outcome(&outcome, monitor.debounce().consecutive());

    for publication in outcome.publications {
        let topic = publication.topic;
        let sent = tokio::time::timeout(
            PUBLISH_TIMEOUT,
            publisher.publish(topic, publication.payload, publication.retained),
        )
        .await
        .unwrap_or_else(|_| {
            Err(PublishError::Timeout {
                topic: topic.to_string(),
            })
        });
        if let Err(err) = sent {
            warn!("{err}");
        }
    }
    Ok(())
}

fn log_outcome(outcome: &CycleOutcome, consecutive: u32) {
    let Reading {
        state,
        display_brightness,
        reference_differential,
        daytime,
    } = outcome.reading;

    match (display_brightness, reference_differential, daytime) {
        (Some(brightness), Some(differential), Some(daytime)) => info!(
            "reading: {} (brightness {brightness:.1}, differential {differential:.1}, daytime {daytime})",
            state.as_str()
        ),
        _ => info!("reading: {}", state.as_str()),
    }

    if let Some(confirmed) = outcome.confirmed {
        debug!(
            "confirmed state: {} after {consecutive} consecutive readings",
            confirmed.as_str()
        );
    }
}
