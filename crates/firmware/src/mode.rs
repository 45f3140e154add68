//! Operating mode state machine.
//!
//! ```text
//!          begin(Write)            begin(Read)
//!   Play ───────────────► Write    Play ──────────────► Read
//!    ▲                      │        ▲                    │
//!    └────── finish() ──────┘        └───── finish() ─────┘
//! ```
//!
//! Only `Play` may start an interaction; a second `begin` while one is
//! active is refused. Periodic tag and volume polling run in `Play` only.

/// Operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Normal tag-driven playback.
    #[default]
    Play,
    /// Waiting to program a tag.
    Write,
    /// Waiting to read a tag.
    Read,
}

/// Rejected mode transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeError {
    /// An interaction is already running.
    #[error("busy in {0:?} mode")]
    Busy(Mode),
    /// `Play` is not an interaction; use [`ModeMachine::finish`].
    #[error("play mode cannot be begun")]
    NotAnInteraction,
}

/// Holder of the single current mode.
#[derive(Debug, Default)]
pub struct ModeMachine {
    mode: Mode,
}

impl ModeMachine {
    /// Start in play mode.
    pub const fn new() -> Self {
        Self { mode: Mode::Play }
    }

    /// Current mode.
    pub fn current(&self) -> Mode {
        self.mode
    }

    /// `true` in play mode.
    pub fn is_play(&self) -> bool {
        self.mode == Mode::Play
    }

    /// Enter `Write` or `Read` from `Play`.
    pub fn begin(&mut self, target: Mode) -> Result<(), ModeError> {
        if target == Mode::Play {
            return Err(ModeError::NotAnInteraction);
        }
        if self.mode != Mode::Play {
            return Err(ModeError::Busy(self.mode));
        }
        self.mode = target;
        Ok(())
    }

    /// Return to `Play`, unconditionally.
    pub fn finish(&mut self) {
        self.mode = Mode::Play;
    }
}
