use color_eyre::{eyre::eyre, Result};
use joystick_support::{Direction, FrameOutcome, JoystickConfig, JoystickSupport, MotionControl};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    setup()?;

    let config_path = config_path()?;
    let config = JoystickConfig::load(&config_path)
        .map_err(|e| eyre!("Failed to load {}: {}", config_path.display(), e))?;
    info!("Using joystick config {}", config_path.display());

    let mut support = JoystickSupport::with_gilrs(config, TracingMotion::default());
    support.init();
    if !support.is_initialized() {
        return Err(eyre!("Joystick support is unavailable"));
    }

    let mut last_frame = Instant::now();
    let mut last_outcome = FrameOutcome::Inactive;
    loop {
        let now = Instant::now();
        let delta = now.duration_since(last_frame).as_secs_f64();
        last_frame = now;

        let outcome = support.update(delta);
        if std::mem::discriminant(&outcome) != std::mem::discriminant(&last_outcome) {
            info!("Input state: {:?}", outcome);
        }
        last_outcome = outcome;

        std::thread::sleep(FRAME_INTERVAL);
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_env_filter(log_filter(std::env::var("RUST_LOG").ok().as_deref()))
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();
}

/// Full `RUST_LOG` directive syntax; anything unparsable falls back to `info`.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

/// First argument, or the per-user default (created if missing).
fn config_path() -> Result<PathBuf> {
    if let Some(path) = std::env::args().nth(1) {
        return Ok(PathBuf::from(path));
    }
    let path = JoystickConfig::default_path()
        .ok_or_else(|| eyre!("No config directory on this platform"))?;
    JoystickConfig::ensure_default(&path)?;
    Ok(path)
}

/// Stand-in for the planetarium's movement manager: logs every change.
#[derive(Debug, Default)]
struct TracingMotion {
    turning: [bool; 4],
    zoom_in: bool,
    zoom_out: bool,
    slow: bool,
}

impl TracingMotion {
    fn set_turn(&mut self, direction: Direction, active: bool) {
        let slot = &mut self.turning[direction as usize];
        if *slot != active {
            *slot = active;
            info!("Turn {:?}: {}", direction, active);
        }
    }
}

fn set_level(slot: &mut bool, active: bool, label: &str) {
    if *slot != active {
        *slot = active;
        info!("{}: {}", label, active);
    }
}

impl MotionControl for TracingMotion {
    fn turn_up(&mut self, active: bool) {
        self.set_turn(Direction::Up, active);
    }

    fn turn_down(&mut self, active: bool) {
        self.set_turn(Direction::Down, active);
    }

    fn turn_left(&mut self, active: bool) {
        self.set_turn(Direction::Left, active);
    }

    fn turn_right(&mut self, active: bool) {
        self.set_turn(Direction::Right, active);
    }

    fn zoom_in(&mut self, active: bool) {
        set_level(&mut self.zoom_in, active, "Zoom in");
    }

    fn zoom_out(&mut self, active: bool) {
        set_level(&mut self.zoom_out, active, "Zoom out");
    }

    fn move_slow(&mut self, active: bool) {
        set_level(&mut self.slow, active, "Move slow");
    }

    fn toggle_mount_mode(&mut self) {
        info!("Toggle mount mode");
    }

    fn auto_zoom_out(&mut self) {
        info!("Auto zoom out");
    }

    fn set_time_now(&mut self) {
        info!("Set time to now");
    }

    fn increase_time_speed(&mut self) {
        info!("Time speed up");
    }

    fn decrease_time_speed(&mut self) {
        info!("Time speed down");
    }
}
