//! Integration tests for the on-device menu: navigation, editing with
//! auto-repeat, leaving edit mode, idle timeout, and settings commit.

use tankmon::app::events::AppEvent;
use tankmon::display::DisplayFrame;
use tankmon::fsm::StateId;
use tankmon::menu::MenuField;

use crate::mock_hw::Rig;

/// Power on, open the menu, and tap A until `field` is selected.
fn rig_in_menu(capacity: u32, field: MenuField) -> Rig {
    let mut config = Rig::small_tank();
    config.tank.capacity_liters = capacity;
    let mut rig = Rig::new(config);
    rig.power_on();
    rig.tap_a();
    assert_eq!(rig.app.state(), StateId::Menu);
    for _ in 0..field.index() {
        rig.tap_a();
    }
    assert_eq!(rig.app.menu().map(|m| m.selected), Some(field));
    rig
}

fn editing(rig: &Rig) -> bool {
    rig.app.menu().is_some_and(|m| m.editing)
}

#[test]
fn menu_opens_on_first_field_and_wraps() {
    let mut rig = rig_in_menu(100, MenuField::VolumeUnit);
    for _ in 0..4 {
        rig.tap_a();
    }
    assert_eq!(rig.app.menu().map(|m| m.selected), Some(MenuField::VolumeUnit));
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::MenuFieldSelected(_))),
        5
    );
}

#[test]
fn menu_frame_tracks_cursor() {
    let rig = rig_in_menu(16, MenuField::Capacity);
    match rig.hw.last_frame() {
        Some(DisplayFrame::Menu {
            field,
            editing,
            tank,
        }) => {
            assert_eq!(*field, MenuField::Capacity);
            assert!(!editing);
            assert_eq!(tank.capacity_liters, 16);
        }
        other => panic!("expected menu frame, got {other:?}"),
    }
}

#[test]
fn capacity_press_steps_once_then_repeats_every_200ms() {
    let mut rig = rig_in_menu(15, MenuField::Capacity);
    rig.tap_b();
    assert!(editing(&rig));

    rig.run(true, false, 50);
    assert_eq!(rig.app.tank().capacity_liters, 16);

    rig.run(true, false, 1_000);
    assert_eq!(rig.app.tank().capacity_liters, 21);

    // Release tap while editing changes nothing.
    rig.idle(400);
    assert_eq!(rig.app.tank().capacity_liters, 21);
    assert_eq!(rig.app.menu().map(|m| m.selected), Some(MenuField::Capacity));
}

#[test]
fn quick_press_steps_exactly_once() {
    let mut rig = rig_in_menu(15, MenuField::Capacity);
    rig.tap_b();

    // Released well before the repeat interval and the debounce lockout.
    rig.run(true, false, 50);
    rig.idle(600);
    assert_eq!(rig.app.tank().capacity_liters, 16);
    assert!(editing(&rig));
}

#[test]
fn b_hold_while_editing_stops_editing_without_power_off() {
    let mut rig = rig_in_menu(40, MenuField::Capacity);
    rig.tap_b();

    rig.run(false, true, 5_100);
    rig.idle(400);
    assert_eq!(rig.app.state(), StateId::Menu);
    assert!(!editing(&rig));

    let edited = rig.app.tank().capacity_liters;
    assert!(edited < 40);
    let committed = rig.sink.committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].capacity_liters, edited);
}

#[test]
fn chord_stops_editing_and_commits() {
    let mut rig = rig_in_menu(100, MenuField::VolumeUnit);
    rig.tap_b();
    assert!(editing(&rig));

    rig.run(true, false, 50);
    rig.idle(800);
    assert!(rig.app.tank().display_gallons);

    rig.run(true, false, 50);
    rig.run(true, true, 50);
    rig.idle(500);

    assert!(!editing(&rig));
    assert!(rig.app.tank().display_gallons, "chord takes back its first press");
    assert_eq!(rig.app.menu().map(|m| m.selected), Some(MenuField::VolumeUnit));
    let committed = rig.sink.committed();
    assert_eq!(committed.len(), 1);
    assert!(committed[0].display_gallons);
    assert!(rig.app.current_config().tank.display_gallons);
}

#[test]
fn chord_right_away_leaves_value_unchanged() {
    let mut rig = rig_in_menu(15, MenuField::Capacity);
    rig.tap_b();

    rig.run(true, false, 50);
    rig.run(true, true, 50);
    rig.idle(500);

    assert!(!editing(&rig));
    assert_eq!(rig.app.tank().capacity_liters, 15);
    let committed = rig.sink.committed();
    assert_eq!(committed.len(), 1);
    assert_eq!(committed[0].capacity_liters, 15);
}

#[test]
fn idle_timeout_returns_to_monitoring_and_commits() {
    let mut rig = rig_in_menu(15, MenuField::Capacity);
    rig.tap_b();
    rig.run(true, false, 50);
    rig.idle(400);

    rig.idle(9_000);
    assert_eq!(rig.app.state(), StateId::Menu);
    rig.idle(1_500);
    assert_eq!(rig.app.state(), StateId::Monitoring);

    assert_eq!(rig.sink.committed().len(), 1);
    assert_eq!(rig.sink.committed()[0].capacity_liters, 16);
    assert_eq!(rig.store.saved.borrow().len(), 1);
    assert_eq!(rig.app.current_config().tank.capacity_liters, 16);
    assert!(!rig.app.commit_pending());
}

#[test]
fn gallons_setting_reaches_status_display() {
    let mut rig = rig_in_menu(100, MenuField::VolumeUnit);
    rig.tap_b();
    rig.run(true, false, 50);
    rig.idle(11_000);

    assert_eq!(rig.app.state(), StateId::Monitoring);
    assert!(matches!(
        rig.hw.last_frame(),
        Some(DisplayFrame::Status { gallons: true, .. })
    ));
}

#[test]
fn b_long_press_in_menu_powers_off_and_commits() {
    let mut rig = rig_in_menu(100, MenuField::Capacity);
    rig.run(false, true, 5_100);
    rig.idle(400);

    assert_eq!(rig.app.state(), StateId::Off);
    assert_eq!(rig.sink.committed().len(), 1);
}

#[test]
fn failed_commit_keeps_live_settings() {
    let mut rig = rig_in_menu(15, MenuField::Capacity);
    rig.store.fail = true;
    rig.tap_b();
    rig.run(true, false, 50);
    rig.idle(11_000);

    assert_eq!(rig.app.state(), StateId::Monitoring);
    assert!(rig.sink.committed().is_empty());
    assert!(!rig.app.commit_pending());
    assert_eq!(rig.app.tank().capacity_liters, 16);
    assert_eq!(rig.app.current_config().tank.capacity_liters, 15);
}

#[test]
fn invalid_edit_is_rejected_by_the_store() {
    let mut rig = rig_in_menu(100, MenuField::MaxDistance);
    rig.tap_b();
    // 50 cm down to 0 in 5 cm steps, below the 5 cm full bound.
    rig.run(false, true, 3_000);
    rig.idle(11_000);

    assert_eq!(rig.app.tank().max_distance, 0.0);
    assert!(rig.sink.committed().is_empty());
    assert_eq!(rig.app.current_config().tank.max_distance, 50.0);
}
