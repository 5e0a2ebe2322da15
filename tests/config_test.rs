// Configuration loading from disk with environment substitution

use serial_test::serial;
use smart_meter_dashboard::config::Config;
use smart_meter_dashboard::error::AppError;
use smart_meter_dashboard::session::PollSchedule;
use std::path::PathBuf;
use std::time::Duration;

fn write_temp_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "smart-meter-dashboard-{}-{}.yaml",
        name,
        std::process::id()
    ));
    std::fs::write(&path, content).unwrap();
    path
}

const TEMPLATE: &str = r#"
store:
  url: $(SUPABASE_URL)
  api_key: ${SUPABASE_KEY}
polling:
  reading_interval_secs: 5
  prediction_interval_secs: 120
server:
  port: 9090
display:
  utc_offset_minutes: 330
"#;

#[test]
#[serial]
fn test_load_expands_environment() {
    std::env::set_var("SUPABASE_URL", "https://meter.supabase.co");
    std::env::set_var("SUPABASE_KEY", "anon-from-env");
    let path = write_temp_config("expand", TEMPLATE);

    let config = Config::load(&path).unwrap();

    assert_eq!(config.store.url, "https://meter.supabase.co");
    assert_eq!(config.store.api_key, "anon-from-env");
    assert_eq!(config.server.port, 9090);
    assert_eq!(config.display.offset().local_minus_utc(), 330 * 60);

    let schedule = PollSchedule::from(&config.polling);
    assert_eq!(schedule.reading_every, Duration::from_secs(5));
    assert_eq!(schedule.prediction_every, Duration::from_secs(120));

    std::env::remove_var("SUPABASE_URL");
    std::env::remove_var("SUPABASE_KEY");
    std::fs::remove_file(path).ok();
}

#[test]
#[serial]
fn test_environment_overrides_literal_credentials() {
    std::env::set_var("SUPABASE_URL", "https://override.supabase.co");
    std::env::remove_var("SUPABASE_KEY");
    let path = write_temp_config(
        "override",
        "store:\n  url: \"https://file.supabase.co\"\n  api_key: \"file-key\"\n",
    );

    let config = Config::load(&path).unwrap();

    assert_eq!(config.store.url, "https://override.supabase.co");
    assert_eq!(config.store.api_key, "file-key");

    std::env::remove_var("SUPABASE_URL");
    std::fs::remove_file(path).ok();
}

#[test]
#[serial]
fn test_missing_variable_is_config_error() {
    std::env::remove_var("SUPABASE_URL");
    std::env::remove_var("SUPABASE_KEY");
    let path = write_temp_config("missing", TEMPLATE);

    let result = Config::load(&path);
    assert!(matches!(result, Err(AppError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
#[serial]
fn test_empty_api_key_is_rejected() {
    std::env::remove_var("SUPABASE_URL");
    std::env::remove_var("SUPABASE_KEY");
    let path = write_temp_config(
        "empty-key",
        "store:\n  url: \"https://file.supabase.co\"\n  api_key: \"\"\n",
    );

    let result = Config::load(&path);
    assert!(matches!(result, Err(AppError::Config(_))));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_io_error() {
    let result = Config::load("/nonexistent/smart-meter-dashboard.yaml");
    assert!(matches!(result, Err(AppError::Io(_))));
}

#[test]
#[serial]
fn test_shipped_config_parses() {
    std::env::set_var("SUPABASE_URL", "https://meter.supabase.co");
    std::env::set_var("SUPABASE_KEY", "anon");

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/config.yaml");
    let config = Config::load(path).unwrap();

    assert_eq!(config.polling.reading_interval_secs, 3);
    assert_eq!(config.polling.prediction_interval_secs, 60);
    assert_eq!(config.store.readings_table, "meter_data");

    std::env::remove_var("SUPABASE_URL");
    std::env::remove_var("SUPABASE_KEY");
}
