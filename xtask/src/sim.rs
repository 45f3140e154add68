//! xtask sim - desktop tag simulator
//!
//! Runs the `tag_simulator` example once, or with `--watch` re-runs it every
//! time a source file under the controller crates changes. The simulator is a
//! finite script, so each run exits by itself and the watcher only needs to
//! start the next one.

use anyhow::{Context, Result};
use colored::Colorize;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use platform::config;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

const WATCH_PATHS: [&str; 5] = [
    "crates/firmware/src",
    "crates/firmware/examples",
    "crates/platform/src",
    "crates/tags/src",
    "crates/playback/src",
];

pub fn run(watch: bool) -> Result<()> {
    print_banner();

    if !watch {
        return run_simulator();
    }

    if let Err(e) = run_simulator() {
        eprintln!("{}", format!("Simulator failed: {e}").red().bold());
    }

    let (tx, rx) = channel();
    let mut watcher: RecommendedWatcher = Watcher::new(
        move |res: Result<Event, notify::Error>| {
            if let Ok(event) = res {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_))
                    && event
                        .paths
                        .iter()
                        .any(|p| p.extension().is_some_and(|ext| ext == "rs" || ext == "toml"))
                {
                    let _ = tx.send(());
                }
            }
        },
        notify::Config::default(),
    )?;

    for path in WATCH_PATHS.iter().map(Path::new) {
        if path.exists() {
            watcher
                .watch(path, RecursiveMode::Recursive)
                .with_context(|| format!("Failed to watch path: {}", path.display()))?;
        }
    }

    println!();
    println!("{}", "Watching for changes (Ctrl+C to stop)".green().bold());

    loop {
        // Editors emit bursts of events per save; wait for the burst to end.
        rx.recv().context("watcher channel closed")?;
        std::thread::sleep(Duration::from_millis(300));
        while rx.try_recv().is_ok() {}

        clear_screen();
        print_banner();
        println!("{}", "Changes detected - re-running...".yellow().bold());
        if let Err(e) = run_simulator() {
            eprintln!("{}", format!("Simulator failed: {e}").red().bold());
            println!("{}", "Fix errors and save to trigger another run".dimmed());
        }
    }
}

fn run_simulator() -> Result<()> {
    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.args([
        "run",
        "-p",
        "firmware",
        "--example",
        "tag_simulator",
        "--features",
        "emulator",
    ]);
    if std::env::var("RUST_LOG").is_err() {
        cmd.env("RUST_LOG", "firmware=info");
    }

    let status = cmd.status().context("Failed to run cargo")?;
    if !status.success() {
        anyhow::bail!("tag_simulator exited with {status}");
    }

    println!();
    println!(
        "{}",
        format!("Simulation finished in {:.1}s", start.elapsed().as_secs_f64()).green()
    );
    Ok(())
}

fn clear_screen() {
    // ANSI escape code to clear screen and move cursor to top-left
    print!("\x1B[2J\x1B[1;1H");
    io::stdout().flush().ok();
}

fn print_banner() {
    let banner_text = format!("     {} - Tag Simulator       ", config::APP_NAME);
    println!("{}", "═════════════════════════════════════════════".cyan());
    println!("{}", banner_text.cyan().bold());
    println!("{}", "═════════════════════════════════════════════".cyan());
    println!();
}
