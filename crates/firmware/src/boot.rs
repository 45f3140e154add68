//! Bring-up sequence for the jukebox.
//!
//! Initialization order:
//!   1. Clocks via [`build_embassy_config`] (hardware only)
//!   2. Independent watchdog, [`WATCHDOG_TIMEOUT_MS`]
//!   3. Audio module: reset, start-up volume, normal EQ, SD card output
//!   4. NFC transceiver: firmware version query, SAM configuration
//!   5. Control loop
//!
//! Steps 3 and 4 are [`bring_up`]. Either failing is fatal: the entry point
//! logs the [`BootError`] and parks without starting the control loop.

use platform::{AudioPlayer, ReaderInfo, TagReader, VolumeLevel};

use crate::log::{self, Dbg};

/// Ordered bring-up steps, logged by the entry point at start-up.
pub const BOOT_SEQUENCE_STEPS: &[&str] = &[
    "1. RCC: HSI 64 MHz -> PLL1 400 MHz system clock",
    "2. IWDG: arm watchdog, petted once per control tick",
    "3. DFPlayer: reset, volume, EQ normal, SD output",
    "4. PN532: firmware version, SAM configuration",
    "5. Controller: tick loop",
];

/// Independent watchdog period.
///
/// Must exceed the longest inline stall of the control loop, which is a
/// write/read interaction waiting for a tag (see
/// [`crate::config::ControllerConfig::worst_case_stall_ms`]).
pub const WATCHDOG_TIMEOUT_MS: u32 = 16_000;

/// Watchdog period in the microseconds `IndependentWatchdog::new` expects.
pub const fn watchdog_timeout_us() -> u32 {
    WATCHDOG_TIMEOUT_MS.saturating_mul(1_000)
}

/// A peripheral that did not come up
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootError {
    /// The audio module rejected its start-up commands.
    #[error("audio module not responding")]
    AudioModule,
    /// The NFC transceiver did not answer.
    #[error("NFC reader not responding")]
    Reader,
}

/// Bring up the audio module, then the transceiver.
///
/// The reader is never touched when the audio module fails.
pub async fn bring_up<P, R>(
    player: &mut P,
    reader: &mut R,
    volume: VolumeLevel,
) -> Result<ReaderInfo, BootError>
where
    P: AudioPlayer,
    R: TagReader,
{
    log::info!("initializing audio module");
    if let Err(e) = player.init(volume).await {
        log::error!("audio module init failed: {}", Dbg(&e));
        return Err(BootError::AudioModule);
    }
    log::info!("audio module online, volume {}", volume.get());

    log::info!("initializing NFC reader");
    match reader.init().await {
        Ok(info) => {
            log::info!(
                "NFC reader online: IC {} firmware {}.{}",
                info.ic,
                info.version,
                info.revision
            );
            Ok(info)
        }
        Err(e) => {
            log::error!("NFC reader init failed: {}", Dbg(&e));
            Err(BootError::Reader)
        }
    }
}

// ── RCC clock configuration ───────────────────────────────────────────────────

/// Build the `embassy_stm32::Config` for the jukebox board.
///
/// # Clock Tree (HSI → 400 MHz core)
///
/// HSI (64 MHz) → PLL1 (prediv=4, mul=50) → PLL1_P = 400 MHz (sys)
/// AHB prescaler: DIV2 → 200 MHz
/// APB1/2/3/4:    DIV2 → 100 MHz (I2C1, USART2, USART3 kernel clocks)
///
/// No HSI48 or PLL2: nothing on this board needs SDMMC, FMC or QUADSPI.
#[cfg(feature = "hardware")]
pub fn build_embassy_config() -> embassy_stm32::Config {
    use embassy_stm32::rcc::*;

    let mut config = embassy_stm32::Config::default();

    config.rcc.hsi = Some(HSIPrescaler::DIV1);
    config.rcc.csi = true;

    // HSI (64 MHz) / prediv(4) = 16 MHz → × mul(50) = 800 MHz VCO
    // PLL1_P = VCO / divp(2) = 400 MHz  → system clock
    config.rcc.pll1 = Some(Pll {
        source: PllSource::HSI,
        prediv: PllPreDiv::DIV4,
        mul: PllMul::MUL50,
        divp: Some(PllDiv::DIV2),
        divq: None,
        divr: None,
    });

    config.rcc.sys = Sysclk::PLL1_P; // 400 MHz
    config.rcc.ahb_pre = AHBPrescaler::DIV2; // 200 MHz
    config.rcc.apb1_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb2_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb3_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.apb4_pre = APBPrescaler::DIV2; // 100 MHz
    config.rcc.voltage_scale = VoltageScale::Scale1;

    config
}

// ─── Tests ────────────────────────────────────────────────────────────────────
