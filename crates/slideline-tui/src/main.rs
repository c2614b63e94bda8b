use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slideline_core::{CarouselConfig, Easing};

mod app;
mod event;
mod stage;

use app::App;
use event::KeyPoller;

#[derive(Parser)]
#[command(name = "slideline")]
#[command(author, version, about = "A terminal slide carousel")]
struct Cli {
    /// Number of slides on the stage
    #[arg(short = 'n', long, default_value_t = 4)]
    panels: usize,

    /// Transition duration in seconds
    #[arg(short = 'd', long)]
    duration: Option<f64>,

    /// Autoplay delay between slides in seconds
    #[arg(long)]
    delay: Option<f64>,

    /// Start with autoplay off
    #[arg(long)]
    paused: bool,

    /// Easing curve for the transition
    #[arg(long)]
    easing: Option<EasingArg>,

    /// Stage width in offset units
    #[arg(long, default_value_t = 100.0)]
    width: f64,
}

#[derive(Clone, Copy, ValueEnum)]
enum EasingArg {
    CubicInOut,
    Linear,
}

fn main() -> Result<()> {
    // Initialize logging (stderr; quiet unless RUST_LOG says otherwise)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    // Config file first, CLI flags override
    let mut config = CarouselConfig::load()?;
    if let Some(duration) = cli.duration {
        config.transition_duration = duration;
    }
    if let Some(delay) = cli.delay {
        config.transition_delay = delay;
    }
    if cli.paused {
        config.paused = true;
    }
    if let Some(easing) = cli.easing {
        config.easing = match easing {
            EasingArg::CubicInOut => Easing::CubicInOut,
            EasingArg::Linear => Easing::Linear,
        };
    }

    let frame_budget = config.frame_interval();
    let mut app = App::new(config, cli.panels, cli.width)?;

    let mut terminal = ratatui::init();
    let keys = KeyPoller::new(frame_budget);
    let result = run(&mut terminal, &mut app, &keys);
    ratatui::restore();
    result
}

fn run(terminal: &mut ratatui::DefaultTerminal, app: &mut App, keys: &KeyPoller) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| app.draw(frame))?;
        if let Some(key) = keys.next_key()? {
            app.handle_key(key)?;
        }
        app.on_tick()?;
    }
    Ok(())
}
