//! NFC jukebox firmware - Main Entry Point
//!
//! Hardware-only entry point for STM32H743ZI. Wiring is documented in
//! [`firmware::config::pins`].

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::peripherals::USART3;
use embassy_stm32::time::Hertz;
use embassy_stm32::usart::{self, UartRx, UartTx};
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Delay, Duration, Instant, Ticker, Timer};
use platform::{CommandLine, Millis};

use firmware::config::pins;
use firmware::console::{SerialConsole, LINE_QUEUE_DEPTH};
use firmware::{boot, Controller, DfPlayer, HalInput, HalOutput, LineAssembler, Parts, Pn532};

// Panic handler
use panic_probe as _;
// RTT transport for defmt
use defmt_rtt as _;

bind_interrupts!(struct Irqs {
    I2C1_EV => i2c::EventInterruptHandler<peripherals::I2C1>;
    I2C1_ER => i2c::ErrorInterruptHandler<peripherals::I2C1>;
    USART2 => usart::InterruptHandler<peripherals::USART2>;
    USART3 => usart::InterruptHandler<peripherals::USART3>;
});

/// Operator lines from the console UART to the control loop.
static CONSOLE_LINES: Channel<CriticalSectionRawMutex, CommandLine, LINE_QUEUE_DEPTH> =
    Channel::new();

/// Assemble console bytes into lines and queue them for the controller.
#[embassy_executor::task]
async fn console_rx_task(mut rx: UartRx<'static, USART3, peripherals::DMA1_CH3>) {
    let mut assembler = LineAssembler::new();
    let mut buf = [0u8; 32];
    loop {
        match rx.read_until_idle(&mut buf).await {
            Ok(n) => assembler.feed(buf.get(..n).unwrap_or(&[]), |line| {
                // A full queue drops the line; the operator can retype it.
                if CONSOLE_LINES.try_send(line).is_err() {
                    defmt::warn!("console queue full, line dropped");
                }
            }),
            Err(e) => defmt::warn!("console rx error: {}", e),
        }
    }
}

/// Park forever after a fatal bring-up error; the watchdog is not armed yet.
async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(1)).await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    defmt::info!(
        "{=str} firmware v{=str}",
        platform::config::APP_NAME,
        platform::config::APP_VERSION
    );
    for step in boot::BOOT_SEQUENCE_STEPS {
        defmt::debug!("boot: {=str}", step);
    }

    let p = embassy_stm32::init(boot::build_embassy_config());

    let config = firmware::default_config();
    if let Err(e) = config.validate() {
        defmt::error!("invalid controller config: {}", e);
        halt().await;
    }

    // PN532 on I2C1: PB8 SCL, PB9 SDA.
    let i2c = I2c::new(
        p.I2C1,
        p.PB8,
        p.PB9,
        Irqs,
        p.DMA1_CH4,
        p.DMA1_CH5,
        Hertz(pins::PN532_I2C_HZ),
        i2c::Config::default(),
    );
    let mut reader = Pn532::new(i2c, Delay);

    // DFPlayer on USART2 TX: PD5.
    let mut dfplayer_cfg = usart::Config::default();
    dfplayer_cfg.baudrate = pins::DFPLAYER_BAUD;
    let dfplayer_tx = match UartTx::new(p.USART2, p.PD5, p.DMA1_CH0, dfplayer_cfg) {
        Ok(tx) => tx,
        Err(e) => {
            defmt::error!("USART2 config rejected: {}", e);
            halt().await
        }
    };
    let mut player = DfPlayer::new(dfplayer_tx, Delay);

    // Operator console on USART3: PD8 TX, PD9 RX.
    let mut console_cfg = usart::Config::default();
    console_cfg.baudrate = pins::CONSOLE_BAUD;
    let console_uart = match usart::Uart::new(
        p.USART3,
        p.PD9,
        p.PD8,
        Irqs,
        p.DMA1_CH2,
        p.DMA1_CH3,
        console_cfg,
    ) {
        Ok(uart) => uart,
        Err(e) => {
            defmt::error!("USART3 config rejected: {}", e);
            halt().await
        }
    };
    let (console_tx, console_rx) = console_uart.split();

    if let Err(e) = boot::bring_up(&mut player, &mut reader, config.default_level()).await {
        defmt::error!("bring-up failed: {}", e);
        halt().await;
    }

    if spawner.spawn(console_rx_task(console_rx)).is_err() {
        defmt::error!("console task already running");
    }

    let mut controller = Controller::new(
        config,
        Parts {
            reader,
            player,
            volume_up: HalInput(Input::new(p.PG0, Pull::Up)),
            volume_down: HalInput(Input::new(p.PG1, Pull::Up)),
            indicator: HalOutput(Output::new(p.PB0, Level::Low, Speed::Low)),
            console: SerialConsole::new(console_tx, CONSOLE_LINES.receiver()),
            delay: Delay,
        },
    );
    controller.greet().await;

    // The watchdog period covers the longest inline stall (a write/read
    // interaction), validated above.
    let mut watchdog = IndependentWatchdog::new(p.IWDG1, boot::watchdog_timeout_us());
    watchdog.unleash();
    defmt::info!("IWDG armed: timeout={=u32}ms", boot::WATCHDOG_TIMEOUT_MS);

    defmt::info!("entering control loop, tick {=u32}ms", config.tick_ms);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(config.tick_ms)));
    loop {
        controller.tick(Millis::from_u64(Instant::now().as_millis())).await;
        watchdog.pet();
        ticker.next().await;
    }
}
