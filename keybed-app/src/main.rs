use clap::Parser;
use eframe::egui;
use std::path::PathBuf;

mod config;
mod input;
mod panes;
mod theme;
mod widgets;

use config::AppConfig;
use panes::keyboard::KeyboardPane;
use panes::{PaneRenderer, SharedPaneState};
use theme::{Theme, ThemeMode};

/// Keybed - a playable three-octave piano
#[derive(Parser, Debug)]
#[command(name = "Keybed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Use light theme
    #[arg(long, conflicts_with = "dark")]
    light: bool,

    /// Use dark theme
    #[arg(long, conflicts_with = "light")]
    dark: bool,

    /// Fetch samples from this URL or local directory
    #[arg(long)]
    base_url: Option<String>,

    /// Release time in seconds
    #[arg(long)]
    release: Option<f32>,

    /// Read configuration from this file instead of the standard location
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = AppConfig::load(args.config.as_deref());
    if args.light {
        config.theme = ThemeMode::Light;
    } else if args.dark {
        config.theme = ThemeMode::Dark;
    }
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if let Some(release) = args.release {
        config.release = release;
    }
    let config = config.sanitized();

    let mut theme = match Theme::load_default() {
        Ok(theme) => theme,
        Err(e) => {
            log::error!("Failed to load theme: {:#}", e);
            Theme::default()
        }
    };
    if theme.is_empty() {
        log::warn!("Theme has no styles, using egui defaults");
    } else {
        log::debug!("Loaded theme with {} selectors", theme.len());
    }
    theme.set_mode(config.theme);
    log::info!("Theme: {:?}, samples from {}", config.theme, config.base_url);

    let viewport_builder = egui::ViewportBuilder::default()
        .with_inner_size([1240.0, 340.0])
        .with_min_inner_size([480.0, 200.0])
        .with_title("Keybed")
        .with_app_id("keybed"); // Set app_id for Wayland

    let options = eframe::NativeOptions {
        viewport: viewport_builder,
        ..Default::default()
    };

    eframe::run_native(
        "Keybed",
        options,
        Box::new(move |cc| Ok(Box::new(KeybedApp::new(cc, &config, theme)))),
    )
}

struct KeybedApp {
    theme: Theme,
    keyboard: KeyboardPane,
}

impl KeybedApp {
    fn new(cc: &eframe::CreationContext, config: &AppConfig, theme: Theme) -> Self {
        cc.egui_ctx.set_theme(theme.mode().preference());

        let keyboard = KeyboardPane::new(config.manifest(), &theme);
        Self { theme, keyboard }
    }
}

impl eframe::App for KeybedApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut shared = SharedPaneState {
            theme: &mut self.theme,
        };

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            self.keyboard.render_header(ui, &mut shared);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let rect = ui.available_rect_before_wrap();
            self.keyboard.render_content(ui, rect, &mut shared);
        });
    }
}
