//! The cooperative control loop.
//!
//! [`Controller`] owns every collaborator and every piece of mutable state.
//! The entry point calls [`Controller::tick`] once per scheduler period with
//! a fresh monotonic timestamp. One tick runs, in order:
//!
//! 1. at most one operator command from the console,
//! 2. the volume buttons,
//! 3. a tag poll, if the poll interval has elapsed,
//! 4. the grace-period check.
//!
//! Steps 2 to 4 run in play mode only. A `write` or `read` command awaits its
//! whole tag interaction inline (bounded by the retry policy) and then ends
//! the tick, since `now` is stale by the time it returns.

use core::fmt::{self, Write as _};

use embedded_hal_async::delay::DelayNs;
use platform::{AudioPlayer, Console, InputEvent, InputPin, Millis, OutputPin, TagReader};
use playback::{Arbiter, Decision, GraceMonitor, VolumeController};
use tags::{PresenceState, SongNumber, TagDataError, TagEvent};

use crate::command::{self, Command, USAGE};
use crate::config::ControllerConfig;
use crate::input::VolumeButtons;
use crate::log::{self, Dbg};
use crate::mode::{Mode, ModeMachine};

/// Capacity of one formatted console line.
const LINE_CAP: usize = 64;

/// Printed once after bring-up.
pub const BANNER: &str = "Type 'read' or 'write <number>' to access tag mode.";

/// Collaborators handed to [`Controller::new`].
pub struct Parts<R, P, U, D, L, C, Y> {
    /// NFC transceiver.
    pub reader: R,
    /// Audio module.
    pub player: P,
    /// Volume-up button, active low.
    pub volume_up: U,
    /// Volume-down button, active low.
    pub volume_down: D,
    /// Activity indicator, high while a track plays.
    pub indicator: L,
    /// Operator console.
    pub console: C,
    /// Delay source for the post-write settle pause.
    pub delay: Y,
}

/// Jukebox controller.
pub struct Controller<R, P, U, D, L, C, Y> {
    config: ControllerConfig,
    reader: R,
    player: P,
    buttons: VolumeButtons<U, D>,
    indicator: L,
    console: C,
    delay: Y,
    presence: PresenceState,
    arbiter: Arbiter,
    volume: VolumeController,
    grace: GraceMonitor,
    mode: ModeMachine,
    last_poll_at: Option<Millis>,
}

impl<R, P, U, D, L, C, Y> Controller<R, P, U, D, L, C, Y>
where
    R: TagReader,
    P: AudioPlayer,
    U: InputPin,
    D: InputPin,
    L: OutputPin,
    C: Console,
    Y: DelayNs,
{
    /// Controller in play mode, idle, at the configured start-up volume.
    ///
    /// `config` should have passed [`ControllerConfig::validate`]. The
    /// collaborators are expected to be brought up already.
    pub fn new(config: ControllerConfig, parts: Parts<R, P, U, D, L, C, Y>) -> Self {
        let Parts {
            reader,
            player,
            volume_up,
            volume_down,
            indicator,
            console,
            delay,
        } = parts;
        Self {
            buttons: VolumeButtons::new(volume_up, volume_down, config.debounce_ms),
            volume: VolumeController::with_range(
                config.default_level(),
                config.min_level(),
                config.max_level(),
            ),
            grace: GraceMonitor::new(config.grace_period_ms),
            config,
            reader,
            player,
            indicator,
            console,
            delay,
            presence: PresenceState::new(),
            arbiter: Arbiter::new(),
            mode: ModeMachine::new(),
            last_poll_at: None,
        }
    }

    /// Print the start-up hint on the console.
    pub async fn greet(&mut self) {
        self.console.write_line(BANNER).await;
    }

    /// Run one scheduler pass at time `now`.
    pub async fn tick(&mut self, now: Millis) {
        if let Some(line) = self.console.poll_line() {
            let cmd = command::parse(&line);
            let interactive = matches!(cmd, Command::Write(_) | Command::Read);
            self.handle_command(cmd).await;
            if interactive {
                return;
            }
        }

        if !self.mode.is_play() {
            return;
        }

        self.poll_buttons(now).await;

        if self.poll_due(now) {
            self.last_poll_at = Some(now);
            self.poll_tag(now).await;
        }

        let stopped = self
            .grace
            .tick(
                now,
                &self.presence,
                &mut self.arbiter,
                &mut self.player,
                &mut self.indicator,
            )
            .await;
        if stopped {
            log::info!("tag absent past grace period, stopped");
        }
    }

    fn poll_due(&self, now: Millis) -> bool {
        self.last_poll_at
            .map_or(true, |at| now.since(at) >= self.config.poll_interval_ms)
    }

    async fn poll_buttons(&mut self, now: Millis) {
        for event in self.buttons.poll(now).into_iter().flatten() {
            let InputEvent::ButtonPress(button) = event;
            let before = self.volume.level().get();
            let level = self.volume.adjust(button.volume_delta(), &mut self.player).await;
            if level != before {
                log::debug!("volume now {}", level);
            }
        }
    }

    async fn poll_tag(&mut self, now: Millis) {
        // A transceiver error during a routine poll is treated as an empty field.
        let read = match self.reader.poll_tag(self.config.poll_timeout_ms).await {
            Ok(read) => read,
            Err(e) => {
                log::debug!("tag poll failed: {}", Dbg(&e));
                platform::TagReadResult::NoTag
            }
        };

        let event = tags::classify(read, now, &mut self.presence);
        if let TagEvent::NewTag(uid) = event {
            log::info!("tag detected: {}", uid);
        }

        let decision = self
            .arbiter
            .on_tag_event(event, &mut self.reader, &mut self.player, &mut self.indicator)
            .await;
        match decision {
            Decision::Ignored => {}
            Decision::Unchanged(song) => log::debug!("song {} already playing", song),
            Decision::Started(song) => log::info!("playing song {}", song),
            Decision::Switched { from, to } => log::info!("switched song {} -> {}", from, to),
            Decision::Rejected { error, stopped } => {
                log::warn!("tag rejected ({}), stopped playback: {}", error, stopped);
            }
        }
    }

    async fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Empty => {}
            Command::Write(song) => self.write_tag(song).await,
            Command::Read => self.read_tag().await,
            Command::PlayMode => {
                self.mode.finish();
                log::info!("mode: play");
                self.console.write_line("Switched to PLAY MODE").await;
            }
            Command::InvalidSong(n) => {
                log::debug!("rejected song number {}", n);
                self.console.write_line("Error: number must be 1–99").await;
            }
            Command::Unknown => {
                for line in USAGE {
                    self.console.write_line(line).await;
                }
            }
        }
    }

    async fn write_tag(&mut self, song: SongNumber) {
        if let Err(e) = self.mode.begin(Mode::Write) {
            log::warn!("write refused: {}", e);
            return;
        }
        log::info!("mode: write song {}", song);
        self.print(format_args!("Place NFC tag to write song #{song}"))
            .await;

        match tags::wait_for_tag(&mut self.reader, self.config.retry).await {
            Err(e) => {
                log::info!("write: {}", e);
                self.console.write_line("Timeout - no tag detected").await;
            }
            Ok(uid) => {
                let written = tags::write_song_number(&mut self.reader, song).await;
                self.delay.delay_ms(self.config.write_settle_ms).await;
                match written {
                    Ok(()) => {
                        log::info!("tag {} programmed with song {}", uid, song);
                        self.print(format_args!("✓ Tag written: song #{song}")).await;
                    }
                    Err(e) => {
                        log::warn!("tag {} write failed: {}", uid, Dbg(&e));
                        self.console.write_line("✗ Write failed").await;
                    }
                }
            }
        }

        self.mode.finish();
        log::info!("mode: play");
    }

    async fn read_tag(&mut self) {
        if let Err(e) = self.mode.begin(Mode::Read) {
            log::warn!("read refused: {}", e);
            return;
        }
        log::info!("mode: read");
        self.console.write_line("Place NFC tag to read...").await;

        match tags::wait_for_tag(&mut self.reader, self.config.retry).await {
            Err(e) => {
                log::info!("read: {}", e);
                self.console.write_line("Timeout - no tag detected").await;
            }
            Ok(uid) => match tags::read_song_number(&mut self.reader).await {
                Ok(song) => {
                    log::info!("tag {} holds song {}", uid, song);
                    self.print(format_args!("✓ Song number: {song}")).await;
                }
                Err(TagDataError::ReadFailed) => {
                    self.console.write_line("Failed to read tag data").await;
                }
                Err(e) => {
                    log::info!("tag {}: {}", uid, e);
                    self.console.write_line("Tag not programmed correctly").await;
                }
            },
        }

        self.mode.finish();
        log::info!("mode: play");
    }

    /// Format one console line. Output past [`LINE_CAP`] bytes is cut off.
    async fn print(&mut self, args: fmt::Arguments<'_>) {
        let mut line = heapless::String::<LINE_CAP>::new();
        let _ = line.write_fmt(args);
        self.console.write_line(&line).await;
    }

    /// Current operating mode.
    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    /// Tag presence tracking state.
    pub fn presence(&self) -> &PresenceState {
        &self.presence
    }

    /// Playback state.
    pub fn arbiter(&self) -> &Arbiter {
        &self.arbiter
    }

    /// Volume state.
    pub fn volume(&self) -> &VolumeController {
        &self.volume
    }

    /// Configuration in use.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Audio module.
    pub fn player(&self) -> &P {
        &self.player
    }

    /// Activity indicator.
    pub fn indicator(&self) -> &L {
        &self.indicator
    }

    /// NFC transceiver, for scripting the field in tests and the simulator.
    pub fn reader_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Audio module, mutable.
    pub fn player_mut(&mut self) -> &mut P {
        &mut self.player
    }

    /// Operator console.
    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Volume buttons.
    pub fn buttons_mut(&mut self) -> &mut VolumeButtons<U, D> {
        &mut self.buttons
    }
}
