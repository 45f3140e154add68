//! xtask flash - pre-flight, build and flash the jukebox firmware
//!
//! The controller configuration is validated on the host with the same
//! `ControllerConfig::validate` the board runs at boot, so a configuration
//! that would park the board never reaches the probe. `probe-rs run` then
//! stays attached and streams the defmt bring-up log; `--detach` only
//! downloads.

use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use firmware::boot::{BOOT_SEQUENCE_STEPS, WATCHDOG_TIMEOUT_MS};
use firmware::config::pins;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

const TARGET: &str = "thumbv7em-none-eabihf";
const CHIP: &str = "STM32H743ZITx";

pub fn run(release: bool, detach: bool) -> Result<()> {
    preflight()?;
    let elf = build(release)?;
    flash(&elf, detach)
}

/// Validate the shipped configuration and print the wiring it expects.
fn preflight() -> Result<()> {
    println!();
    println!("{}", "🔎 Pre-flight".cyan().bold());

    let config = firmware::default_config();
    config
        .validate()
        .map_err(|e| anyhow!("controller config rejected: {e}"))?;
    println!(
        "   {}",
        format!(
            "poll {} ms, grace {} ms, debounce {} ms, volume {}..={} (start {})",
            config.poll_interval_ms,
            config.grace_period_ms,
            config.debounce_ms,
            config.min_volume,
            config.max_volume,
            config.default_volume
        )
        .dimmed()
    );
    println!(
        "   {}",
        format!(
            "watchdog {WATCHDOG_TIMEOUT_MS} ms covers worst write/read stall {} ms",
            config.worst_case_stall_ms()
        )
        .dimmed()
    );

    println!();
    println!("{}", "🔌 Expected wiring".cyan().bold());
    let wiring = [
        format!(
            "PN532     I2C1 PB8 SCL / PB9 SDA, addr {:#04x} at {} kHz",
            pins::PN532_I2C_ADDR,
            pins::PN532_I2C_HZ / 1_000
        ),
        format!("DFPlayer  USART2 TX PD5, {} baud, SD card inserted", pins::DFPLAYER_BAUD),
        format!("Console   USART3 TX PD8 / RX PD9, {} baud", pins::CONSOLE_BAUD),
        "Buttons   PG0 volume up, PG1 volume down (to GND)".to_string(),
        "LED       PB0 playing indicator".to_string(),
    ];
    for line in &wiring {
        println!("   {}", line.dimmed());
    }
    println!();
    Ok(())
}

fn build(release: bool) -> Result<PathBuf> {
    let profile = if release { "release" } else { "debug" };
    println!(
        "{}",
        format!("🔨 Building firmware ({profile})...").cyan().bold()
    );

    let start = Instant::now();
    let mut cmd = Command::new("cargo");
    cmd.args(["build", "-p", "firmware", "--target", TARGET, "--features", "hardware"]);
    if release {
        cmd.arg("--release");
    }

    let output = cmd.output().context("Failed to run cargo build")?;
    if !output.status.success() {
        eprintln!("{}", "✗ Build failed".red().bold());
        eprintln!();
        eprintln!("{}", String::from_utf8_lossy(&output.stderr));
        anyhow::bail!("Build failed");
    }

    let elf: PathBuf = ["target", TARGET, profile, "firmware"].iter().collect();
    let size = std::fs::metadata(&elf)
        .map(|m| format!(", ELF {} KiB", m.len() / 1024))
        .unwrap_or_default();
    println!(
        "{}",
        format!("✓ Built in {:.2}s{size}", start.elapsed().as_secs_f64()).green()
    );
    println!();
    Ok(elf)
}

fn flash(elf: &Path, detach: bool) -> Result<()> {
    let mode = if detach { "download" } else { "run" };
    println!("{}", format!("📡 Flashing {CHIP}...").cyan().bold());
    if !detach {
        println!("   {}", "Bring-up steps to watch for in the RTT log:".dimmed());
        for step in BOOT_SEQUENCE_STEPS {
            println!("     {}", step.dimmed());
        }
        println!("   {}", "Ctrl+C detaches; the board keeps running.".dimmed());
    }
    println!();

    let status = Command::new("probe-rs")
        .arg(mode)
        .arg(elf)
        .args(["--chip", CHIP])
        .status()
        .context("Failed to run probe-rs. Is probe-rs installed? (cargo install probe-rs-tools)")?;

    if !status.success() {
        eprintln!("{}", "✗ probe-rs failed".red().bold());
        anyhow::bail!("probe-rs {mode} exited with {status}");
    }

    println!();
    println!("{}", "✓ Firmware flashed".green().bold());
    println!(
        "   {}",
        format!(
            "Program a tag from the console at {} baud: write <1-99>, read, playmode",
            pins::CONSOLE_BAUD
        )
        .dimmed()
    );
    println!();
    Ok(())
}
