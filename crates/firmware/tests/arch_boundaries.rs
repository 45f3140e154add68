//! Architecture boundary tests. Run with `cargo test -p firmware --test arch_boundaries`
// Architecture test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing,
    clippy::arithmetic_side_effects
)]
//!
//! Layering rules:
//!   Rule 1: platform (traits, newtypes, mocks) depends on no workspace crate
//!   Rule 2: tags depends only on platform
//!   Rule 3: playback depends on platform and tags, never on firmware
//!   Rule 4: embassy and STM32 crates only enter through firmware's `hardware` feature
//!
//! # How enforcement works
//!
//! Cargo already refuses dependency cycles, so most of these rules hold by
//! construction. The tests below read each crate's manifest and fail when a
//! forbidden dependency name appears, which catches a new edge before it grows
//! into a cycle.

const PLATFORM_TOML: &str = include_str!("../../platform/Cargo.toml");
const TAGS_TOML: &str = include_str!("../../tags/Cargo.toml");
const PLAYBACK_TOML: &str = include_str!("../../playback/Cargo.toml");
const FIRMWARE_TOML: &str = include_str!("../Cargo.toml");

/// Dependency names declared under `[dependencies]` (not dev or optional tables).
fn runtime_deps(manifest: &str) -> Vec<&str> {
    let mut in_deps = false;
    let mut names = Vec::new();
    for line in manifest.lines().map(str::trim) {
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            names.push(name.trim().trim_end_matches(".workspace"));
        }
    }
    names
}

#[test]
fn platform_depends_on_no_workspace_crate() {
    let deps = runtime_deps(PLATFORM_TOML);
    for forbidden in ["tags", "playback", "firmware"] {
        assert!(!deps.contains(&forbidden), "platform must not depend on {forbidden}");
    }
}

#[test]
fn tags_depends_only_on_platform() {
    let deps = runtime_deps(TAGS_TOML);
    assert!(deps.contains(&"platform"));
    for forbidden in ["playback", "firmware", "embassy-stm32", "embassy-time"] {
        assert!(!deps.contains(&forbidden), "tags must not depend on {forbidden}");
    }
}

#[test]
fn playback_never_reaches_up_to_firmware() {
    let deps = runtime_deps(PLAYBACK_TOML);
    assert!(deps.contains(&"platform") && deps.contains(&"tags"));
    assert!(!deps.contains(&"firmware"));
    assert!(!deps.iter().any(|d| d.starts_with("embassy")));
}

#[test]
fn embassy_is_optional_in_firmware() {
    for line in FIRMWARE_TOML.lines().filter(|l| l.starts_with("embassy-")) {
        assert!(
            line.contains("optional = true"),
            "embassy dependency must sit behind the hardware feature: {line}"
        );
    }
}

/// The platform traits are nameable without any firmware type in scope.
///
/// If `platform` accidentally depended on `firmware`, this integration test
/// binary would fail to link (firmware -> platform -> firmware).
#[test]
fn platform_traits_are_independent() {
    fn _assert_reader<T: platform::TagReader>() {}
    fn _assert_player<T: platform::AudioPlayer>() {}
    fn _assert_console<T: platform::Console>() {}
    fn _assert_input<T: platform::InputPin>() {}
    fn _assert_output<T: platform::OutputPin>() {}

    _assert_reader::<platform::mocks::MockTagReader>();
    _assert_player::<platform::mocks::MockAudioPlayer>();
    _assert_console::<platform::mocks::MockConsole>();
    _assert_input::<platform::mocks::MockPin>();
    _assert_output::<platform::mocks::MockPin>();
}

/// The tag record layout is shared by the reader side (tags) and the
/// arbiter (playback); both must agree on page 4 and the `SON` marker.
#[test]
fn tag_record_layout_is_stable() {
    assert_eq!(tags::SONG_RECORD_PAGE, 4);
    assert_eq!(&tags::SONG_MAGIC, b"SON");
    let song = tags::SongNumber::new(42).unwrap();
    assert_eq!(tags::record::encode(song), *b"SON\x2A");
}

/// The watchdog must outlast the longest blocking interaction.
#[test]
fn watchdog_outlasts_interactive_wait() {
    let config = firmware::default_config();
    assert!(firmware::WATCHDOG_TIMEOUT_MS > config.worst_case_stall_ms());
}
