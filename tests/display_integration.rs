/*
 *  tests/display_integration.rs
 *
 *  Integration tests for the clock display, driven through the public API
 *
 *  timeclock - full-screen zener clock
 *  (c) 2020-26 Stuart Hunter
 */

use std::time::{Duration, Instant};

use chrono::{DateTime, Local, TimeZone};

use timeclock::config::{self, Cli};
use timeclock::display::components::{BurnInJitter, ZENER_SYMBOLS};
use timeclock::display::drivers::mock::SurfaceCall;
use timeclock::display::drivers::{ManualClock, RecordingSurface, TerminalSurface};
use timeclock::display::{
    DisplayScheduler, FieldId, RenderSurface, Rgb, SchedulerConfig, ThemeMode, TickReport, Visibility,
};

fn noon() -> DateTime<Local> {
    Local.with_ymd_and_hms(2024, 3, 14, 12, 0, 0).single().unwrap()
}

fn active_scheduler(start: DateTime<Local>) -> (DisplayScheduler<ManualClock, RecordingSurface>, ManualClock, Instant) {
    let clock = ManualClock::new(start);
    let mut sched = DisplayScheduler::with_jitter(
        SchedulerConfig::default(),
        clock.clone(),
        RecordingSurface::new(),
        BurnInJitter::seeded(42),
    );
    let t0 = Instant::now();
    sched.set_visibility(Visibility::Active, t0);
    (sched, clock, t0)
}

fn committed(sched: &DisplayScheduler<ManualClock, RecordingSurface>, field: FieldId) -> Option<String> {
    sched.surface().state().lock().unwrap().text.get(&field).cloned()
}

#[test]
fn test_symbol_follows_sub_second() {
    let (mut sched, _clock, t0) = active_scheduler(noon() + chrono::Duration::milliseconds(237));
    sched.poll(t0);

    assert_eq!(committed(&sched, FieldId::Symbol).as_deref(), Some(ZENER_SYMBOLS[1]));
    assert_eq!(committed(&sched, FieldId::Centis).as_deref(), Some("23"));
}

#[test]
fn test_clock_face_fields() {
    let start = Local.with_ymd_and_hms(2024, 3, 14, 9, 5, 7).single().unwrap();
    let (mut sched, _clock, t0) = active_scheduler(start);
    sched.poll(t0);

    assert_eq!(committed(&sched, FieldId::Date).as_deref(), Some("2024-03-14"));
    assert_eq!(committed(&sched, FieldId::Hour).as_deref(), Some("09"));
    assert_eq!(committed(&sched, FieldId::Minute).as_deref(), Some("05"));
    assert_eq!(committed(&sched, FieldId::Second).as_deref(), Some("07"));
    assert_eq!(committed(&sched, FieldId::ColonHm).as_deref(), Some(":"));
    assert_eq!(committed(&sched, FieldId::ToggleControl).as_deref(), Some("INVERT"));
}

#[test]
fn test_date_rewritten_only_across_midnight() {
    let before = Local.with_ymd_and_hms(2024, 3, 14, 23, 59, 59).single().unwrap();
    let (mut sched, clock, t0) = active_scheduler(before);
    sched.poll(t0);

    clock.advance(chrono::Duration::milliseconds(500));
    sched.surface().state().lock().unwrap().calls.clear();
    sched.poll(t0 + Duration::from_millis(10));
    {
        let state = sched.surface().state();
        let s = state.lock().unwrap();
        assert!(!s.calls.iter().any(|c| matches!(c, SurfaceCall::SetText(FieldId::Date, _))));
    }

    clock.advance(chrono::Duration::milliseconds(600));
    sched.poll(t0 + Duration::from_millis(20));
    assert_eq!(committed(&sched, FieldId::Date).as_deref(), Some("2024-03-15"));
    assert_eq!(committed(&sched, FieldId::Hour).as_deref(), Some("00"));
}

#[test]
fn test_date_survives_failed_first_push() {
    let (mut sched, clock, t0) = active_scheduler(noon());
    let state = sched.surface().state();

    state.lock().unwrap().fail_flush = true;
    sched.poll(t0);
    state.lock().unwrap().fail_flush = false;

    for n in 1..=100u32 {
        clock.advance(chrono::Duration::milliseconds(10));
        sched.poll(t0 + Duration::from_millis(10) * n);
    }
    assert_eq!(committed(&sched, FieldId::Date).as_deref(), Some("2024-03-14"));
    assert_eq!(committed(&sched, FieldId::Hour).as_deref(), Some("12"));
}

#[test]
fn test_toggle_swaps_palette_and_back() {
    let (mut sched, _clock, _t0) = active_scheduler(noon());
    let normal = sched.current_colors();

    let inverted = sched.toggle_theme().unwrap();
    assert_eq!(sched.current_colors(), ThemeMode::Inverted.colors());
    assert_eq!(inverted.background, Rgb::WHITE);
    assert_eq!(inverted.time, Rgb::new(0x00, 0x33, 0xCC));
    assert_eq!(inverted.sub_second, Rgb::new(0xFF, 0x2B, 0xFF));

    let back = sched.toggle_theme().unwrap();
    assert_eq!(sched.current_colors(), ThemeMode::Normal.colors());
    assert_eq!(back, normal);
    let state = sched.surface().state();
    assert_eq!(state.lock().unwrap().background, Some(Rgb::BLACK));
}

#[test]
fn test_pause_for_twelve_minutes_does_not_replay() {
    let (mut sched, _clock, t0) = active_scheduler(noon());
    sched.poll(t0);

    let paused = t0 + Duration::from_secs(2);
    sched.set_visibility(Visibility::Inactive, paused);
    assert_eq!(sched.poll(paused + Duration::from_secs(300)), TickReport::default());

    let resumed = paused + Duration::from_secs(12 * 60);
    sched.set_visibility(Visibility::Active, resumed);
    assert_eq!(sched.poll(resumed), TickReport { fast_ticks: 1, slow_ticks: 0 });

    // jitter waits a full interval after resuming
    assert_eq!(sched.poll(resumed + Duration::from_secs(299)).slow_ticks, 0);
    assert_eq!(sched.poll(resumed + Duration::from_secs(300)).slow_ticks, 1);
}

#[test]
fn test_jitter_stays_in_range_over_many_intervals() {
    let (mut sched, _clock, t0) = active_scheduler(noon());
    let interval = SchedulerConfig::default().jitter_interval;
    for n in 1..=50u32 {
        let report = sched.poll(t0 + interval * n);
        assert_eq!(report.slow_ticks, 1);
        let (dx, dy, duration) = sched.surface().state().lock().unwrap().transform.unwrap();
        assert!((-3..=3).contains(&dx));
        assert!((-3..=3).contains(&dy));
        assert_eq!(duration, Duration::from_millis(800));
    }
}

#[test]
fn test_backward_clock_jump_is_rendered() {
    let (mut sched, clock, t0) = active_scheduler(noon());
    sched.poll(t0);

    clock.advance(chrono::Duration::days(-1));
    let report = sched.poll(t0 + Duration::from_millis(10));
    assert_eq!(report.fast_ticks, 1);
    assert_eq!(committed(&sched, FieldId::Date).as_deref(), Some("2024-03-13"));
}

#[test]
fn test_terminal_surface_renders_face() {
    let (_, clock, t0) = active_scheduler(noon());
    let mut sched = DisplayScheduler::with_jitter(
        SchedulerConfig::default(),
        clock,
        TerminalSurface::with_writer(Vec::new(), (80, 24)),
        BurnInJitter::seeded(1),
    );
    sched.set_visibility(Visibility::Active, t0);
    sched.poll(t0);

    let out = String::from_utf8_lossy(sched.surface().writer()).to_string();
    assert!(out.contains("2024-03-14"));
    assert!(out.contains("INVERT"));
    assert!(out.contains('\u{2B24}'));

    let mut surface = sched.into_surface();
    surface.restore();
    assert!(surface.flush().is_err());
}

#[test]
fn test_config_overrides_reach_scheduler() {
    let dir = std::env::temp_dir().join(format!("timeclock-it-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("config.yaml");
    std::fs::write(&path, "schedule:\n  fast_tick_ms: 25\njitter:\n  max_offset: 5\n").unwrap();

    let cli = Cli {
        config: Some(path.clone()),
        jitter_interval_secs: Some(60),
        no_pulse: true,
        ..Cli::default()
    };
    let cfg = config::resolve(&cli).unwrap();
    let sched = cfg.scheduler_config();
    assert_eq!(sched.fast_tick, Duration::from_millis(25));
    assert_eq!(sched.jitter_interval, Duration::from_secs(60));
    assert!(sched.pulse.is_none());
    assert_eq!(cfg.build_jitter().max_offset(), 5);

    std::fs::remove_dir_all(&dir).ok();
}
