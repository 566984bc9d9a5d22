// Pomodoro Backend - Rust
// REST API for tasks, subtasks, pomodoro sessions, distraction logs and statistics

use axum::http::HeaderValue;
use std::fmt::Write as FmtWrite;
use std::fs::OpenOptions;
use std::io::LineWriter;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Custom time formatter: [HH:mm:ss] [pomodoro]
#[derive(Clone)]
struct PomodoroTimer;

impl FormatTime for PomodoroTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        let now = chrono::Utc::now();
        write!(w, "[{}] [pomodoro]", now.format("%H:%M:%S"))
    }
}

mod config;
mod error;
mod models;
mod routes;
mod services;

use config::Config;
use services::{
    DataStore, DistractionService, PomodoroService, StatisticsService, SubtaskService,
    SupabaseService, TaskService,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DataStore>,
    pub tasks: TaskService,
    pub subtasks: SubtaskService,
    pub pomodoros: PomodoroService,
    pub distractions: DistractionService,
    pub statistics: StatisticsService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire every service onto one store handle
    pub fn new(store: Arc<dyn DataStore>, config: Config) -> Self {
        let tasks = TaskService::new(store.clone());
        let subtasks = SubtaskService::new(store.clone(), tasks.clone());
        let pomodoros = PomodoroService::new(store.clone(), tasks.clone(), subtasks.clone());
        let distractions = DistractionService::new(store.clone(), pomodoros.clone());
        let statistics =
            StatisticsService::new(tasks.clone(), pomodoros.clone(), distractions.clone());

        Self {
            store,
            tasks,
            subtasks,
            pomodoros,
            distractions,
            statistics,
            config: Arc::new(config),
        }
    }
}

/// Stdout always, plus LOG_FILE when set. The guard must outlive the server.
fn init_tracing(config: &Config) -> Option<WorkerGuard> {
    let default_filter = if config.debug {
        "pomodoro_backend=debug,tower_http=debug"
    } else {
        "pomodoro_backend=info,tower_http=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into());

    let stdout_layer = fmt::layer()
        .with_timer(PomodoroTimer)
        .with_target(false)
        .with_level(false)
        .with_ansi(true);

    // Wrap in LineWriter to flush after each line
    let (file_layer, guard) = match config.log_file.as_deref().map(|path| {
        OpenOptions::new().create(true).append(true).open(path)
    }) {
        Some(Ok(file)) => {
            let (non_blocking, guard) = tracing_appender::non_blocking(LineWriter::new(file));
            let layer = fmt::layer()
                .with_timer(PomodoroTimer)
                .with_target(false)
                .with_level(false)
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        Some(Err(e)) => {
            eprintln!("Failed to open log file: {} - logging to stdout only", e);
            (None, None)
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    guard
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    let _guard = init_tracing(&config);

    // Load and validate config
    if let Err(e) = config.validate() {
        tracing::error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // Both are guaranteed present by validate()
    let (Some(url), Some(key)) = (config.supabase_url.clone(), config.api_key()) else {
        std::process::exit(1);
    };
    let supabase = SupabaseService::new(&url, key);
    tracing::info!("Using Supabase at {} ({})", supabase.url(), config.environment);
    let store: Arc<dyn DataStore> = Arc::new(supabase);

    let cors = cors_layer(&config.cors_origins);
    let addr = format!("0.0.0.0:{}", config.port);

    // Create app state
    let state = AppState::new(store, config);

    let app = routes::api_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    tracing::info!("Starting Pomodoro Backend on {}", addr);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
    }
}
