use std::path::PathBuf;

use pf_settings::{SettingsDoc, load_yaml, save_yaml};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("{}_{}", prefix, std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn sample_doc() -> SettingsDoc {
    serde_yaml::from_str(
        r#"
transport:
  method: tcp
  ip: 192.168.1.20
  tcp_port: 502
  timeout_s: 2.0
controller:
  control_mode: auto
  ctrl_type: PI
  set_point: 42.5
  kg: 1.5
  ki: 8.0
  interval: 0.5
  limits_active: true
  vlv_high_limit: 90.0
  vlv_low_limit: 10.0
  anti_wind_up: 0.25
"#,
    )
    .unwrap()
}

#[test]
fn yaml_round_trip_preserves_document() {
    let dir = unique_temp_dir("pf_settings_roundtrip");
    let path = dir.join("loop.yaml");

    let doc = sample_doc();
    save_yaml(&path, &doc).unwrap();
    let reloaded = load_yaml(&path).unwrap();

    assert_eq!(doc, reloaded);
}

#[test]
fn json_round_trip_preserves_document() {
    let dir = unique_temp_dir("pf_settings_roundtrip_json");
    let path = dir.join("loop.json");

    let doc = sample_doc();
    pf_settings::save_json(&path, &doc).unwrap();
    let reloaded = pf_settings::load_json(&path).unwrap();

    assert_eq!(doc, reloaded);
}

#[test]
fn load_rejects_invalid_document() {
    let dir = unique_temp_dir("pf_settings_invalid");
    let path = dir.join("loop.yaml");
    std::fs::write(
        &path,
        "transport:\n  method: udp\ncontroller:\n  control_mode: auto\n  ctrl_type: P\n  set_point: 1.0\n  kg: 1.0\n  interval: 1.0\n",
    )
    .unwrap();

    assert!(load_yaml(&path).is_err());
}
