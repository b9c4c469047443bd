use pf_settings::{SettingsDoc, ValidationError, validate_settings};

fn base_yaml() -> &'static str {
    r#"
transport:
  method: tcp
  ip: 127.0.0.1
  tcp_port: 5020
controller:
  control_mode: auto
  ctrl_type: PID
  set_point: 50.0
  kg: 2.0
  ki: 10.0
  kd: 1.0
  interval: 1.0
  limits_active: true
  vlv_high_limit: 95.0
  vlv_low_limit: 5.0
  anti_wind_up: 0.3
"#
}

fn parse(yaml: &str) -> SettingsDoc {
    serde_yaml::from_str(yaml).expect("document should parse")
}

#[test]
fn valid_document_passes() {
    let doc = parse(base_yaml());
    validate_settings(&doc).expect("base document should validate");
}

#[test]
fn unknown_control_mode_is_rejected() {
    let doc = parse(&base_yaml().replace("control_mode: auto", "control_mode: cascade"));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidControlMode { .. })
    ));
}

#[test]
fn unknown_control_type_is_rejected() {
    let doc = parse(&base_yaml().replace("ctrl_type: PID", "ctrl_type: PD"));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidControlType { .. })
    ));
}

#[test]
fn pi_without_integral_time_is_rejected() {
    let yaml = base_yaml()
        .replace("ctrl_type: PID", "ctrl_type: PI")
        .replace("  ki: 10.0\n", "");
    let doc = parse(&yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::MissingTuning { .. })
    ));
}

#[test]
fn pid_without_derivative_time_is_rejected() {
    let doc = parse(&base_yaml().replace("  kd: 1.0\n", ""));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::MissingTuning { .. })
    ));
}

#[test]
fn unknown_transport_method_is_rejected() {
    let doc = parse(&base_yaml().replace("method: tcp", "method: udp"));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::UnsupportedTransport { .. })
    ));
}

#[test]
fn inverted_limits_are_rejected() {
    let doc = parse(&base_yaml().replace("vlv_high_limit: 95.0", "vlv_high_limit: 1.0"));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::Controller(_))
    ));
}

#[test]
fn zero_interval_is_rejected() {
    let doc = parse(&base_yaml().replace("interval: 1.0", "interval: 0.0"));
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::Controller(_))
    ));
}

#[test]
fn unknown_fault_policy_is_rejected() {
    let yaml = format!("{}  on_transport_exhausted: ignore\n", base_yaml());
    let doc = parse(&yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn rtu_serial_parameters_are_checked() {
    let yaml = r#"
transport:
  method: rtu
  rtu_port: /dev/ttyUSB0
  baud_rate: 19200
  parity: mark
controller:
  control_mode: auto
  ctrl_type: P
  set_point: 50.0
  kg: 2.0
  interval: 1.0
"#;
    let doc = parse(yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn op_register_must_be_writable() {
    let yaml = format!(
        "{}io:\n  pv:\n    register: input\n    address: 0\n  op:\n    register: input\n    address: 2\n",
        base_yaml()
    );
    let doc = parse(&yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn pen_count_must_match_plotted_series() {
    let yaml = format!(
        "{}plot:\n  pens:\n    - {{ plot: 1, colour: red, name: PV }}\n    - {{ plot: 1, colour: blue, name: OP }}\n",
        base_yaml()
    );
    let doc = parse(&yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}

#[test]
fn header_count_must_match_log_columns() {
    let yaml = format!("{}logging:\n  headers: [PV, OP]\n", base_yaml());
    let doc = parse(&yaml);
    assert!(matches!(
        validate_settings(&doc),
        Err(ValidationError::InvalidValue { .. })
    ));
}
