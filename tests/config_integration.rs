// SPDX-License-Identifier: MPL-2.0
use std::time::Duration;
use tempfile::tempdir;
use toast_registry::config::{self, Config};
use toast_registry::notifications::{Category, NotificationOptions, Position, Toaster};

#[test]
fn settings_file_round_trips_through_override_dir() {
    let dir = tempdir().expect("Failed to create temporary directory");

    let mut settings = Config::default();
    settings.registry.max_notifications = Some(2);
    settings.defaults.position = Some(Position::BottomCenter);
    settings.timing.exit_transition_ms = Some(150);
    config::save_with_override(&settings, Some(dir.path().to_path_buf()))
        .expect("Failed to write config file");

    let (loaded, warning) = config::load_with_override(Some(dir.path().to_path_buf()));
    assert!(warning.is_none());
    assert_eq!(loaded, settings);

    let toaster_config = loaded.toaster_config();
    assert_eq!(toaster_config.registry.max_notifications.value(), 2);
    assert_eq!(
        toaster_config.registry.defaults.position,
        Position::BottomCenter
    );
    assert_eq!(
        toaster_config.exit_transition.as_duration(),
        Duration::from_millis(150)
    );

    dir.close().expect("Failed to close temporary directory");
}

#[tokio::test(start_paused = true)]
async fn hand_written_settings_drive_the_toaster() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("settings.toml");
    std::fs::write(
        &path,
        r#"
[registry]
max_notifications = 1

[defaults]
category = "warning"
duration_ms = 2000
position = "top-left"

[timing]
exit_transition_ms = 100
"#,
    )
    .expect("Failed to write config file");

    let loaded = config::load_from_path(&path).expect("valid settings");
    let toaster: Toaster = Toaster::new(loaded.toaster_config()).expect("inside a runtime");

    let first = toaster
        .add("first".to_string(), NotificationOptions::new())
        .expect("toaster open");
    let second = toaster
        .add("second".to_string(), NotificationOptions::new())
        .expect("toaster open");

    let snapshot = toaster.snapshot();
    assert!(snapshot.get(&first).expect("evicting").is_exiting());
    let current = snapshot.get(&second).expect("present");
    assert_eq!(current.category(), Category::Warning);
    assert_eq!(current.position(), Position::TopLeft);
    assert_eq!(current.auto_dismiss(), Some(Duration::from_secs(2)));

    tokio::time::sleep(Duration::from_millis(101)).await;
    assert_eq!(toaster.snapshot().len(), 1);

    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert!(toaster.snapshot().is_empty());
}

#[test]
fn out_of_range_values_are_clamped() {
    let settings: Config = toml::from_str(
        r#"
[registry]
max_notifications = 0

[timing]
tick_interval_ms = 5000
"#,
    )
    .expect("valid toml");

    let toaster_config = settings.toaster_config();
    assert_eq!(toaster_config.registry.max_notifications.value(), 1);
    assert_eq!(toaster_config.registry.tick_interval.as_millis(), 100);
}
