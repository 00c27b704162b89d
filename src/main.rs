use bevy::log::LogPlugin;
use bevy::prelude::*;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_subscriber::prelude::*;

use std::path::PathBuf;

use questforge::config::{ConfigLoaded, ConfigPlugin};
use questforge::constants::{DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};
use questforge::editor::MapEditorPlugin;
use questforge::map::{MapPlugin, OpenQuestRequest};
use questforge::paths;

const LOG_FILE_NAME: &str = "questforge.log";

/// Open the session log file for debug builds
#[cfg(debug_assertions)]
fn open_log_file() -> Option<(NonBlocking, WorkerGuard)> {
    use std::fs::OpenOptions;
    use std::io::Write;

    // Create logs directory if it doesn't exist
    let logs_dir = paths::logs_dir();
    if std::fs::create_dir_all(&logs_dir).is_err() {
        eprintln!("Failed to create logs directory");
        return None;
    }

    let log_file_path = logs_dir.join(LOG_FILE_NAME);

    // Append session separator to existing log file
    if let Ok(mut file) = OpenOptions::new().append(true).open(&log_file_path) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        let separator = "=".repeat(80);
        let _ = writeln!(
            file,
            "\n\n{}\n=== New Session Started at {} ===\n{}\n",
            separator, timestamp, separator
        );
    }

    let file_appender = tracing_appender::rolling::never(&logs_dir, LOG_FILE_NAME);
    Some(tracing_appender::non_blocking(file_appender))
}

#[cfg(not(debug_assertions))]
fn open_log_file() -> Option<(NonBlocking, WorkerGuard)> {
    None
}

/// Install the global subscriber: stdout always, a log file in debug builds
fn setup_logging() -> Option<WorkerGuard> {
    let (writer, guard) = match open_log_file() {
        Some((writer, guard)) => (Some(writer), Some(guard)),
        None => (None, None),
    };

    // No ANSI colors for file output
    let file_layer = writer.map(|writer| {
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true)
            .with_level(true)
    });

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true)
        .with_target(true)
        .with_level(true);

    // Use env filter to control log levels (default to info for bevy, debug for questforge)
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,questforge=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    guard
}

/// Startup system opening the quest directory given on the command line
fn open_quest_from_args(mut requests: MessageWriter<OpenQuestRequest>) {
    if let Some(dir) = std::env::args_os().nth(1) {
        requests.write(OpenQuestRequest {
            path: PathBuf::from(dir),
        });
    }
}

fn main() {
    if let Err(e) = paths::ensure_directories() {
        eprintln!("Failed to create application directories: {}", e);
    }

    // Keep the guard alive for the duration of the program
    let _log_guard = setup_logging();
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Questforge Map Editor".into(),
                        resolution: (DEFAULT_WINDOW_WIDTH as u32, DEFAULT_WINDOW_HEIGHT as u32)
                            .into(),
                        ..default()
                    }),
                    ..default()
                })
                // The subscriber installed above already handles logging
                .disable::<LogPlugin>(),
        )
        .add_plugins(ConfigPlugin)
        .add_plugins(MapPlugin)
        .add_plugins(MapEditorPlugin)
        .add_systems(Startup, open_quest_from_args.after(ConfigLoaded))
        .run();
}
