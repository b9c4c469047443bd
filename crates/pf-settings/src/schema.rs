//! Settings document schema definitions.
//!
//! Mode, law, transport method, and parity stay plain strings in the
//! document; [`crate::compile`] turns them into enums with explicit errors
//! for unknown values.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SettingsDoc {
    pub transport: TransportDef,
    pub controller: ControllerDef,
    #[serde(default)]
    pub io: IoMapDef,
    #[serde(default)]
    pub logging: LogDef,
    #[serde(default)]
    pub plot: PlotDef,
}

/// Connection options for the field device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TransportDef {
    /// "tcp" or "rtu".
    pub method: String,
    #[serde(default = "default_ip")]
    pub ip: String,
    #[serde(default = "default_tcp_port")]
    pub tcp_port: u16,
    #[serde(default)]
    pub rtu_port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// "none", "even", or "odd".
    #[serde(default = "default_parity")]
    pub parity: String,
    #[serde(default = "default_stop_bits")]
    pub stop_bits: u8,
    #[serde(default = "default_byte_size")]
    pub byte_size: u8,
    #[serde(default = "default_timeout_s")]
    pub timeout_s: f64,
    #[serde(default = "default_slave")]
    pub slave: u8,
    /// Packed 32-bit float transfer; raw register words when false.
    #[serde(default = "default_true")]
    pub encoding: bool,
    /// "enable" or "disable": protocol-level wire diagnostics.
    #[serde(default = "default_disable")]
    pub logging: String,
}

/// Controller tuning and policy options.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ControllerDef {
    /// "auto" or "manual".
    pub control_mode: String,
    /// "P", "PI", or "PID".
    pub ctrl_type: String,
    /// Target PV in auto; the operator-set output in manual.
    pub set_point: f64,
    pub kg: f64,
    #[serde(default)]
    pub ki: Option<f64>,
    #[serde(default)]
    pub kd: Option<f64>,
    /// Loop period in seconds.
    pub interval: f64,
    #[serde(default)]
    pub limits_active: bool,
    #[serde(default = "default_high_limit")]
    pub vlv_high_limit: f64,
    #[serde(default)]
    pub vlv_low_limit: f64,
    #[serde(default = "default_anti_wind_up")]
    pub anti_wind_up: f64,
    /// "abort" (default) or "hold": what an exhausted transport means for
    /// the running loop.
    #[serde(default = "default_fault_policy")]
    pub on_transport_exhausted: String,
}

/// One value's location in the device register table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterRefDef {
    /// "holding", "input", "coil", or "discrete".
    pub register: String,
    pub address: u16,
}

/// Where the loop reads PV and reads/writes OP.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IoMapDef {
    pub pv: RegisterRefDef,
    pub op: RegisterRefDef,
}

impl Default for IoMapDef {
    fn default() -> Self {
        Self {
            pv: RegisterRefDef {
                register: "input".to_string(),
                address: 0,
            },
            op: RegisterRefDef {
                register: "holding".to_string(),
                address: 0,
            },
        }
    }
}

/// Sample log options. "Time" is prepended to the headers automatically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogDef {
    #[serde(default = "default_headers")]
    pub headers: Vec<String>,
    #[serde(default = "default_log_directory")]
    pub directory: String,
    /// Fixed file name; timestamp-derived when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Default for LogDef {
    fn default() -> Self {
        Self {
            headers: default_headers(),
            directory: default_log_directory(),
            file_name: None,
        }
    }
}

/// One strip-chart pen. Pens map one-to-one, in order, onto the plotted
/// sample values (PV, new OP, setpoint).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PenDef {
    /// 1-based subplot index.
    pub plot: usize,
    pub colour: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlotDef {
    #[serde(default = "default_pens")]
    pub pens: Vec<PenDef>,
    #[serde(default = "default_x_axis_label")]
    pub x_axis_label: String,
    #[serde(default = "default_y_axis_label")]
    pub y_axis_label: String,
    #[serde(default)]
    pub y_axis_min: f64,
    #[serde(default = "default_y_axis_max")]
    pub y_axis_max: f64,
    /// Sliding window length in samples.
    #[serde(default = "default_x_axis_length")]
    pub x_axis_length: usize,
}

impl Default for PlotDef {
    fn default() -> Self {
        Self {
            pens: default_pens(),
            x_axis_label: default_x_axis_label(),
            y_axis_label: default_y_axis_label(),
            y_axis_min: 0.0,
            y_axis_max: default_y_axis_max(),
            x_axis_length: default_x_axis_length(),
        }
    }
}

fn default_ip() -> String {
    "127.0.0.1".to_string()
}

fn default_tcp_port() -> u16 {
    502
}

fn default_baud_rate() -> u32 {
    9600
}

fn default_parity() -> String {
    "none".to_string()
}

fn default_stop_bits() -> u8 {
    1
}

fn default_byte_size() -> u8 {
    8
}

fn default_timeout_s() -> f64 {
    3.0
}

fn default_slave() -> u8 {
    1
}

fn default_true() -> bool {
    true
}

fn default_disable() -> String {
    "disable".to_string()
}

fn default_high_limit() -> f64 {
    100.0
}

fn default_anti_wind_up() -> f64 {
    0.3
}

fn default_fault_policy() -> String {
    "abort".to_string()
}

fn default_headers() -> Vec<String> {
    vec![
        "PV".to_string(),
        "Prior OP".to_string(),
        "New OP".to_string(),
        "SP".to_string(),
    ]
}

fn default_log_directory() -> String {
    "logs".to_string()
}

fn default_pens() -> Vec<PenDef> {
    vec![
        PenDef {
            plot: 1,
            colour: "red".to_string(),
            name: "PV".to_string(),
        },
        PenDef {
            plot: 2,
            colour: "blue".to_string(),
            name: "OP".to_string(),
        },
        PenDef {
            plot: 1,
            colour: "green".to_string(),
            name: "SP".to_string(),
        },
    ]
}

fn default_x_axis_label() -> String {
    "Time (s)".to_string()
}

fn default_y_axis_label() -> String {
    "Value".to_string()
}

fn default_y_axis_max() -> f64 {
    100.0
}

fn default_x_axis_length() -> usize {
    100
}
