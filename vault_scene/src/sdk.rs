//! SDK entry points and builder for composing the coin vault app.

use std::path::PathBuf;
use std::time::Duration;

use bevy::prelude::*;

use crate::bridge::{
    init_fixture_channel, init_stdin_channel, HostChannel, LogSink, OutboundBridge, OutboundSink,
    StdoutSink, TransportError,
};
use crate::camera::orbit_camera_plugin;
use crate::config::{OutboundMode, VaultConfig};
use crate::orchestrator::{NoopSink, Orchestrator};
use crate::render::{CoinRenderer, RendererResource, StackedCoinsRenderer};
use crate::scene::vault_plugin;
use crate::ui::{hud_plugin, inspector_plugin};

/// Where inbound host signals come from.
pub enum HostSource {
    /// Line-framed signals on this process's stdin.
    Stdin,
    /// Replay a recorded session file.
    Fixture { path: PathBuf, delay: Duration },
    /// An embedding app feeds signals through the matching `HostSender`.
    Channel(HostChannel),
    /// No host; only the initial wallet (if any) is shown.
    Detached,
}

/// Builder for constructing a coin vault app with customizable plugins.
pub struct VaultBuilder {
    host: HostSource,
    outbound: Option<Box<dyn OutboundSink>>,
    renderer: Option<Box<dyn CoinRenderer>>,
    attach_renderer: bool,
    initial_wallet: Option<String>,
    window_title: String,
    window_resolution: (f32, f32),
    clear_color: Color,
    enable_orbit_camera: bool,
    enable_hud: bool,
    enable_inspector: bool,
}

impl Default for VaultBuilder {
    fn default() -> Self {
        Self {
            host: HostSource::Stdin,
            outbound: None,
            renderer: None,
            attach_renderer: true,
            initial_wallet: None,
            window_title: "Coin Vault".to_string(),
            window_resolution: (1280.0, 720.0),
            clear_color: Color::srgb(0.06, 0.05, 0.04),
            enable_orbit_camera: true,
            enable_hud: true,
            enable_inspector: true,
        }
    }
}

impl VaultBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder preset from environment-derived configuration.
    pub fn from_config(config: VaultConfig) -> Self {
        let host = match config.fixture {
            Some(path) => HostSource::Fixture {
                path,
                delay: config.fixture_delay,
            },
            None => HostSource::Stdin,
        };
        let builder = Self {
            host,
            initial_wallet: config.initial_wallet,
            ..Self::default()
        };
        match config.outbound {
            OutboundMode::Stdout => builder.outbound(StdoutSink),
            OutboundMode::Log => builder.outbound(LogSink),
        }
    }

    pub fn host(mut self, source: HostSource) -> Self {
        self.host = source;
        self
    }

    /// Receive host signals from a channel created with `host_channel()`.
    pub fn host_channel(self, channel: HostChannel) -> Self {
        self.host(HostSource::Channel(channel))
    }

    pub fn fixture(self, path: impl Into<PathBuf>, delay: Duration) -> Self {
        self.host(HostSource::Fixture {
            path: path.into(),
            delay,
        })
    }

    /// Where `coinSelected` events go. Defaults to stdout.
    pub fn outbound(mut self, sink: impl OutboundSink) -> Self {
        self.outbound = Some(Box::new(sink));
        self
    }

    /// Provide a custom coin renderer implementation.
    pub fn renderer(mut self, renderer: impl CoinRenderer) -> Self {
        self.renderer = Some(Box::new(renderer));
        self.attach_renderer = true;
        self
    }

    /// Start without a renderer. Updates are tracked but draw nothing until a
    /// `RendererResource` is inserted, at which point the last update replays.
    pub fn detached_renderer(mut self) -> Self {
        self.renderer = None;
        self.attach_renderer = false;
        self
    }

    /// Wallet JSON applied before the first host message.
    pub fn initial_wallet(mut self, json: impl Into<String>) -> Self {
        self.initial_wallet = Some(json.into());
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = title.into();
        self
    }

    pub fn window_resolution(mut self, width: f32, height: f32) -> Self {
        self.window_resolution = (width, height);
        self
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn disable_orbit_camera(mut self) -> Self {
        self.enable_orbit_camera = false;
        self
    }

    pub fn disable_hud(mut self) -> Self {
        self.enable_hud = false;
        self
    }

    pub fn disable_inspector(mut self) -> Self {
        self.enable_inspector = false;
        self
    }

    /// Build the Bevy app with the selected configuration and plugins.
    /// Fails only if a fixture file cannot be read.
    pub fn build(self) -> Result<App, TransportError> {
        let channel = open_host(self.host)?;

        let mut app = App::new();
        app.add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: self.window_title,
                resolution: self.window_resolution.into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(self.clear_color))
        .insert_resource(OutboundBridge(
            self.outbound.unwrap_or_else(|| Box::new(StdoutSink)),
        ));

        if let Some(channel) = channel {
            app.insert_resource(channel);
        }

        // Applied silently; the first frame's late-renderer replay draws it.
        let mut orchestrator = Orchestrator::new();
        if let Some(json) = self.initial_wallet.as_deref() {
            orchestrator.handle_wallet_text(json, &mut NoopSink);
        }
        app.insert_resource(orchestrator);

        if self.attach_renderer {
            let renderer = self
                .renderer
                .unwrap_or_else(|| Box::new(StackedCoinsRenderer::default()));
            renderer.setup(&mut app);
            app.insert_resource(RendererResource(renderer));
        }

        app.add_plugins(vault_plugin);
        if self.enable_orbit_camera {
            app.add_plugins(orbit_camera_plugin);
        }
        if self.enable_hud {
            app.add_plugins(hud_plugin);
        }
        if self.enable_inspector {
            app.add_plugins(inspector_plugin);
        }

        Ok(app)
    }
}

fn open_host(source: HostSource) -> Result<Option<HostChannel>, TransportError> {
    match source {
        HostSource::Stdin => Ok(Some(init_stdin_channel())),
        HostSource::Fixture { path, delay } => init_fixture_channel(&path, delay).map(Some),
        HostSource::Channel(channel) => Ok(Some(channel)),
        HostSource::Detached => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_selects_fixture_and_initial_wallet() {
        let builder = VaultBuilder::from_config(VaultConfig {
            fixture: Some(PathBuf::from("session.jsonl")),
            fixture_delay: Duration::from_millis(20),
            outbound: OutboundMode::Log,
            initial_wallet: Some("{}".to_string()),
        });

        match &builder.host {
            HostSource::Fixture { path, delay } => {
                assert_eq!(path, &PathBuf::from("session.jsonl"));
                assert_eq!(*delay, Duration::from_millis(20));
            }
            _ => panic!("expected fixture host"),
        }
        assert_eq!(builder.initial_wallet.as_deref(), Some("{}"));
        assert!(builder.outbound.is_some());
    }

    #[test]
    fn missing_fixture_is_a_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = open_host(HostSource::Fixture {
            path: dir.path().join("missing.jsonl"),
            delay: Duration::ZERO,
        });
        assert!(matches!(result, Err(TransportError::Fixture { .. })));
    }

    #[test]
    fn fixture_host_replays_through_the_channel() {
        use std::io::Write;

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "reset").unwrap();
        file.flush().unwrap();

        let channel = open_host(HostSource::Fixture {
            path: file.path().to_path_buf(),
            delay: Duration::ZERO,
        })
        .unwrap()
        .expect("fixture host yields a channel");

        assert_eq!(
            channel.0.recv_timeout(Duration::from_secs(5)).unwrap(),
            crate::bridge::InboundSignal::Reset
        );
        assert!(open_host(HostSource::Detached).unwrap().is_none());
    }

    #[test]
    fn detached_renderer_is_not_attached() {
        let builder = VaultBuilder::new().detached_renderer();
        assert!(!builder.attach_renderer);
        let builder = builder.renderer(StackedCoinsRenderer::default());
        assert!(builder.attach_renderer);
    }
}
