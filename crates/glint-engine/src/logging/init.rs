use std::sync::Once;

/// Crates that log heavily at `info`/`debug` and are lowered to `warn` by the
/// default filter.
const NOISY_DEPENDENCIES: &[&str] = &[
    "winit",
    "glutin",
    "glutin_winit",
    "egui",
    "egui_glow",
    "egui_winit",
    "calloop",
    "sctk",
];

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` filter syntax (e.g. "info", "warn",
/// "glint_engine=debug,glint_scenes=trace").
///
/// `write_style` controls ANSI coloring behavior.
///
/// `quiet_dependencies` lowers windowing and GUI crates to `warn` when the
/// filter comes from the default rather than from `env_filter` or `RUST_LOG`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
    pub quiet_dependencies: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
            quiet_dependencies: true,
        }
    }
}

static INIT: Once = Once::new();

/// Initializes the global logger once.
///
/// This function is idempotent; subsequent calls are ignored.
/// Intended usage is early in `main`.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();

        if let Some(filter) = config.env_filter {
            builder.parse_filters(&filter);
        } else if let Ok(filter) = std::env::var("RUST_LOG") {
            builder.parse_filters(&filter);
        } else {
            builder.filter_level(log::LevelFilter::Info);
            if config.quiet_dependencies {
                for module in NOISY_DEPENDENCIES {
                    builder.filter_module(module, log::LevelFilter::Warn);
                }
            }
        }

        builder.write_style(config.write_style);

        // A logger installed by a test harness or embedder wins.
        if builder.try_init().is_err() {
            return;
        }

        log::debug!("logging initialized");
    });
}
