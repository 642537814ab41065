//! Integration tests for AppService: power gestures, level sampling,
//! alarms, and telemetry, driven through mock adapters.

use tankmon::alarm::AlarmKind;
use tankmon::app::commands::AppCommand;
use tankmon::app::events::AppEvent;
use tankmon::config::SystemConfig;
use tankmon::display::DisplayFrame;
use tankmon::drivers::buzzer::AlertPattern;
use tankmon::fsm::StateId;

use crate::mock_hw::{HwCall, Rig};

// ── Power gestures ────────────────────────────────────────────

#[test]
fn starts_off_and_idle_does_nothing() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.idle(2_000);

    assert_eq!(rig.app.state(), StateId::Off);
    assert_eq!(rig.hw.pings, 0, "no sampling while off");
    assert_eq!(rig.sink.events, vec![AppEvent::Started(StateId::Off)]);
}

#[test]
fn a_hold_shorter_than_long_press_stays_off() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.run(true, false, 4_900);
    rig.idle(400);
    assert_eq!(rig.app.state(), StateId::Off);
}

#[test]
fn five_second_a_hold_powers_on() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();

    assert!(rig.sink.events.contains(&AppEvent::StateChanged {
        from: StateId::Off,
        to: StateId::Monitoring,
    }));
    assert_eq!(rig.hw.last_backlight(), Some(true));
    assert!(rig.hw.pings > 0);
}

#[test]
fn three_second_hold_in_monitoring_opens_menu_on_release() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();

    rig.run(true, false, 3_000);
    assert_eq!(rig.app.state(), StateId::Monitoring, "menu opens on release");
    rig.idle(400);

    assert_eq!(rig.app.state(), StateId::Menu);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::StateChanged { to: StateId::Off, .. })),
        0,
        "power never toggled"
    );
}

#[test]
fn b_long_press_powers_off_and_stops_sampling() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();

    rig.run(false, true, 5_100);
    rig.idle(400);
    assert_eq!(rig.app.state(), StateId::Off);
    assert!(rig.hw.calls.contains(&HwCall::AllOff));
    assert!(matches!(rig.hw.last_frame(), Some(DisplayFrame::Off)));
    assert_eq!(rig.hw.last_backlight(), Some(false));

    let pings = rig.hw.pings;
    rig.idle(2_000);
    assert_eq!(rig.hw.pings, pings);
}

#[test]
fn b_tap_in_monitoring_toggles_mute() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();

    rig.tap_b();
    assert!(!rig.app.buzzer_active());
    assert!(matches!(
        rig.hw.last_frame(),
        Some(DisplayFrame::Status { muted: true, .. })
    ));

    rig.tap_b();
    assert!(rig.app.buzzer_active());
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::BuzzerActiveChanged(_))),
        2
    );
}

// ── Level pipeline ────────────────────────────────────────────

#[test]
fn ten_cm_in_small_tank_reads_89_percent_and_nine_leds() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(10.0);
    rig.power_on();

    let reading = *rig.app.reading();
    assert_eq!(reading.percent, 89);
    assert!((reading.distance_cm - 10.0).abs() < 0.05);
    assert!(!reading.locked);
    assert_eq!(rig.hw.last_bar(), Some(9));

    match rig.hw.last_frame() {
        Some(DisplayFrame::Status {
            percent, distance, ..
        }) => {
            assert_eq!(*percent, 89);
            assert!((distance - 10.0).abs() < 0.05);
        }
        other => panic!("expected status frame, got {other:?}"),
    }
}

#[test]
fn each_reading_takes_a_full_pulse_batch() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.power_on();
    let monitoring_ticks = rig
        .hw
        .count(|c| matches!(c, HwCall::BarLevel(_)));
    assert_eq!(rig.hw.pings, monitoring_ticks * 5);
}

#[test]
fn echo_timeouts_hold_the_last_reading() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(10.0);
    rig.power_on();
    let before = *rig.app.reading();

    rig.hw.echo_us = None;
    rig.idle(500);
    assert_eq!(*rig.app.reading(), before);
}

#[test]
fn fill_lock_pins_full_until_past_unlock_margin() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(3.0);
    rig.power_on();
    assert!(rig.app.reading().locked);
    assert_eq!(rig.app.reading().percent, 100);
    let pinned = rig.app.reading().distance_cm;

    // Inside min + 2 cm: stays pinned.
    rig.hw.set_distance_cm(6.5);
    rig.idle(200);
    assert!(rig.app.reading().locked);
    assert_eq!(rig.app.reading().distance_cm, pinned);

    rig.hw.set_distance_cm(8.0);
    rig.idle(100);
    assert!(!rig.app.reading().locked);
    assert!((rig.app.reading().distance_cm - 8.0).abs() < 0.05);
}

// ── Alarms ────────────────────────────────────────────────────

#[test]
fn full_tank_alarm_is_rate_limited_to_one_per_second() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(3.0);
    rig.power_on();
    rig.idle(3_000);

    let sounds = rig.hw.sounds();
    let times: Vec<u32> = sounds.iter().map(|(_, t)| *t).collect();
    assert_eq!(times, vec![5_000, 6_000, 7_000, 8_000]);
    assert!(sounds.iter().all(|(p, _)| *p == AlertPattern::FillChirp));
    assert_eq!(
        rig.sink
            .count(|e| *e == AppEvent::AlarmFired(AlarmKind::FillHigh)),
        4
    );
}

#[test]
fn muted_buzzer_suppresses_alarms() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(3.0);
    rig.power_on();
    assert_eq!(rig.hw.sounds().len(), 1);

    rig.tap_b();
    rig.idle(3_000);
    assert_eq!(rig.hw.sounds().len(), 1);

    // Unmuting re-arms immediately: the last alert is long past.
    rig.tap_b();
    assert_eq!(rig.hw.sounds().len(), 2);
}

#[test]
fn disconnected_probe_never_trips_temperature_alarm() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(27.5);
    rig.hw.temperature_c = -127.0;
    rig.power_on();
    rig.idle(3_000);

    assert_eq!(rig.app.reading().percent, 50);
    assert!(rig.hw.sounds().is_empty());
    assert_eq!(rig.app.build_telemetry().temperature_c, -127.0);
}

#[test]
fn over_temperature_uses_its_own_pattern() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(27.5);
    rig.power_on();
    assert!(rig.hw.sounds().is_empty());

    rig.hw.temperature_c = 45.0;
    rig.idle(100);
    assert_eq!(rig.hw.sounds().len(), 1);
    assert_eq!(rig.hw.sounds()[0].0, AlertPattern::TemperatureBeep);
    assert!(rig
        .sink
        .events
        .contains(&AppEvent::AlarmFired(AlarmKind::OverTemperature)));
}

#[test]
fn no_alarms_while_off() {
    let mut rig = Rig::new(Rig::small_tank());
    rig.hw.set_distance_cm(3.0);
    rig.hw.temperature_c = 60.0;
    rig.idle(3_000);
    assert!(rig.hw.sounds().is_empty());
}

// ── Telemetry and commands ────────────────────────────────────

#[test]
fn telemetry_only_while_on() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.idle(2_000);
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_))), 0);

    rig.power_on();
    rig.idle(1_000);
    let telem = rig.sink.count(|e| matches!(e, AppEvent::Telemetry(_)));
    assert!((2..=4).contains(&telem), "got {telem}");
}

#[test]
fn backlight_setting_survives_power_cycle() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();

    rig.app
        .handle_command(AppCommand::SetBacklight(false), &mut rig.hw, &mut rig.sink);
    assert_eq!(rig.hw.last_backlight(), Some(false));

    rig.run(false, true, 5_100);
    rig.idle(400);
    rig.power_on();
    assert_eq!(rig.hw.last_backlight(), Some(false));
}

#[test]
fn force_state_command_applies_entry_effects() {
    let mut rig = Rig::new(SystemConfig::default());
    rig.power_on();
    rig.app
        .handle_command(AppCommand::ForceState(StateId::Off), &mut rig.hw, &mut rig.sink);
    assert_eq!(rig.app.state(), StateId::Off);
    assert_eq!(rig.hw.calls.last(), Some(&HwCall::Backlight(false)));
}
