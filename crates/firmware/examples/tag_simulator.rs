//! Tag Simulator
//!
//! Desktop run of the jukebox controller against the platform mocks, driven
//! by a scripted timeline of tag placements, button presses and operator
//! commands on a simulated millisecond clock.
//! Run with: RUST_LOG=debug cargo run --example tag_simulator --features emulator

use std::collections::VecDeque;

use embedded_hal_async::delay::DelayNs;
use platform::mocks::{AudioCommand, MockAudioPlayer, MockPin, MockTagReader};
use platform::{CommandLine, Console, Millis};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use firmware::{default_config, Controller, Parts};

/// Console that takes scripted lines and prints output to stdout.
#[derive(Default)]
struct StdoutConsole {
    pending: VecDeque<String>,
}

impl Console for StdoutConsole {
    fn poll_line(&mut self) -> Option<CommandLine> {
        let line = self.pending.pop_front()?;
        let mut buf = CommandLine::new();
        buf.push_str(&line).ok()?;
        Some(buf)
    }

    async fn write_line(&mut self, line: &str) {
        println!("  console> {line}");
    }
}

/// Real-time delay on the tokio timer.
struct TokioDelay;

impl DelayNs for TokioDelay {
    async fn delay_ns(&mut self, ns: u32) {
        tokio::time::sleep(std::time::Duration::from_nanos(u64::from(ns))).await;
    }
}

enum Step {
    Place(&'static [u8]),
    Remove,
    PressUp,
    ReleaseUp,
    Type(&'static str),
}

const TAG_A: &[u8] = &[0x04, 0xA1, 0xB2, 0xC3];
const TAG_B: &[u8] = &[0x04, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66];
const BLANK: &[u8] = &[0x04, 0xFE, 0xED, 0x01];

/// `(time_ms, step)`, in time order.
const TIMELINE: &[(u32, Step)] = &[
    (500, Step::Place(TAG_A)),
    (2_000, Step::Remove),
    // Back within the grace period: playback continues.
    (3_000, Step::Place(TAG_A)),
    (4_000, Step::PressUp),
    (4_100, Step::ReleaseUp),
    // Swap tags without a gap: song 3 stops, song 12 starts.
    (5_000, Step::Place(TAG_B)),
    (6_000, Step::Remove),
    // Grace period runs out around t = 8 s.
    (9_000, Step::Place(BLANK)),
    (9_500, Step::Type("write 5")),
    (10_000, Step::Type("read")),
    (10_500, Step::Remove),
    (11_000, Step::Place(BLANK)),
    (11_500, Step::Type("bogus")),
];

const END_MS: u32 = 14_000;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "firmware=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        "=== {} {} Tag Simulator ===\n",
        platform::config::APP_NAME,
        platform::config::APP_VERSION
    );

    let config = default_config();
    config.validate()?;

    let mut reader = MockTagReader::new();
    reader.add_tag(TAG_A, *b"SON\x03")?;
    reader.add_tag(TAG_B, *b"SON\x0C")?;
    reader.add_tag(BLANK, [0; 4])?;

    let mut player = MockAudioPlayer::new();
    firmware::bring_up(&mut player, &mut reader, config.default_level()).await?;

    let mut controller = Controller::new(
        config,
        Parts {
            reader,
            player,
            volume_up: MockPin::new(true),
            volume_down: MockPin::new(true),
            indicator: MockPin::new(false),
            console: StdoutConsole::default(),
            delay: TokioDelay,
        },
    );
    controller.greet().await;

    let mut script = TIMELINE.iter().peekable();
    let mut seen = 0;
    let mut t = 0u32;
    while t <= END_MS {
        while let Some((_, step)) = script.next_if(|(at, _)| *at <= t) {
            match step {
                Step::Place(uid) => {
                    println!("[{t:>6} ms] place tag {uid:02X?}");
                    controller.reader_mut().place(uid);
                }
                Step::Remove => {
                    println!("[{t:>6} ms] remove tag");
                    controller.reader_mut().remove();
                }
                Step::PressUp => {
                    println!("[{t:>6} ms] press volume up");
                    controller.buttons_mut().up_pin_mut().set_level(false);
                }
                Step::ReleaseUp => controller.buttons_mut().up_pin_mut().set_level(true),
                Step::Type(line) => {
                    println!("[{t:>6} ms] operator: {line}");
                    controller.console_mut().pending.push_back((*line).to_owned());
                }
            }
        }

        controller.tick(Millis::from_ticks(t)).await;

        let commands = controller.player().commands();
        for cmd in commands.iter().skip(seen) {
            match cmd {
                AudioCommand::Play(track) => println!("[{t:>6} ms] audio: play track {track}"),
                AudioCommand::Stop => println!("[{t:>6} ms] audio: stop"),
                AudioCommand::Volume(v) => println!("[{t:>6} ms] audio: volume {v}"),
            }
        }
        seen = commands.len();

        t = t.saturating_add(config.tick_ms);
    }

    println!(
        "\nDone: volume {}, playing {:?}",
        controller.volume().level().get(),
        controller.arbiter().current_track().map(|s| s.get())
    );
    Ok(())
}
