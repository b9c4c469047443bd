//! Compilation of the string-typed settings document into runtime types.
//!
//! This is the point where unknown mode/type/method strings surface as
//! explicit configuration errors, before the loop ever runs.

use std::time::Duration;

use pf_controls::{ControlMode, ControlType, Controller};
use pf_modbus::{LinkMethod, LinkSettings, RegisterKind, SerialConfig};

use crate::schema::{ControllerDef, IoMapDef, RegisterRefDef, SettingsDoc, TransportDef};
use crate::validate::ValidationError;

/// What an exhausted transport operation means for the running loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultPolicy {
    /// Terminate the loop; stale process state must not be fed back
    /// silently.
    Abort,
    /// Keep the previous output, skip the iteration, and continue.
    Hold,
}

/// A value's register location, compiled.
#[derive(Debug, Clone, Copy)]
pub struct RegisterAddress {
    pub kind: RegisterKind,
    pub address: u16,
}

/// Compiled register map for the loop's reads and writes.
#[derive(Debug, Clone, Copy)]
pub struct IoMap {
    pub pv: RegisterAddress,
    pub op: RegisterAddress,
}

/// Everything the runtime needs, compiled from one document.
#[derive(Debug, Clone)]
pub struct CompiledSettings {
    pub controller: Controller,
    pub link: LinkSettings,
    pub io_map: IoMap,
    pub fault_policy: FaultPolicy,
}

pub fn compile_settings(doc: &SettingsDoc) -> Result<CompiledSettings, ValidationError> {
    Ok(CompiledSettings {
        controller: compile_controller(&doc.controller)?,
        link: compile_link(&doc.transport)?,
        io_map: compile_io_map(&doc.io)?,
        fault_policy: compile_fault_policy(&doc.controller)?,
    })
}

pub fn compile_controller(def: &ControllerDef) -> Result<Controller, ValidationError> {
    let mode = match def.control_mode.as_str() {
        "auto" => ControlMode::Auto,
        "manual" => ControlMode::Manual,
        other => {
            return Err(ValidationError::InvalidControlMode {
                mode: other.to_string(),
            });
        }
    };
    let ctrl_type = match def.ctrl_type.as_str() {
        "P" => ControlType::P,
        "PI" => ControlType::Pi,
        "PID" => ControlType::Pid,
        other => {
            return Err(ValidationError::InvalidControlType {
                ctrl_type: other.to_string(),
            });
        }
    };

    match ctrl_type {
        ControlType::P => {}
        ControlType::Pi => {
            if def.ki.is_none() {
                return Err(ValidationError::MissingTuning {
                    what: "ki is required for PI control",
                });
            }
        }
        ControlType::Pid => {
            if def.ki.is_none() {
                return Err(ValidationError::MissingTuning {
                    what: "ki is required for PID control",
                });
            }
            if def.kd.is_none() {
                return Err(ValidationError::MissingTuning {
                    what: "kd is required for PID control",
                });
            }
        }
    }

    if def.anti_wind_up < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "controller.anti_wind_up".to_string(),
            value: def.anti_wind_up.to_string(),
            reason: "must not be negative".to_string(),
        });
    }

    let controller = Controller {
        mode,
        ctrl_type,
        setpoint: def.set_point,
        gain: def.kg,
        integral_time: def.ki.unwrap_or(0.0),
        derivative_time: def.kd.unwrap_or(0.0),
        interval: def.interval,
        limits_active: def.limits_active,
        output_low_limit: def.vlv_low_limit,
        output_high_limit: def.vlv_high_limit,
        anti_windup: def.anti_wind_up,
    };
    controller.validate()?;
    Ok(controller)
}

pub fn compile_link(def: &TransportDef) -> Result<LinkSettings, ValidationError> {
    let method = match def.method.as_str() {
        "tcp" => LinkMethod::Tcp {
            ip: def.ip.clone(),
            port: def.tcp_port,
        },
        "rtu" => {
            let serial = SerialConfig::with_params(
                def.rtu_port.clone(),
                def.baud_rate,
                &def.parity,
                def.stop_bits,
                def.byte_size,
            )
            .map_err(|err| ValidationError::InvalidValue {
                field: "transport".to_string(),
                value: def.rtu_port.clone(),
                reason: err.to_string(),
            })?;
            LinkMethod::Rtu(serial)
        }
        other => {
            return Err(ValidationError::UnsupportedTransport {
                method: other.to_string(),
            });
        }
    };

    if !(def.timeout_s > 0.0) {
        return Err(ValidationError::InvalidValue {
            field: "transport.timeout_s".to_string(),
            value: def.timeout_s.to_string(),
            reason: "must be positive".to_string(),
        });
    }

    Ok(LinkSettings {
        method,
        slave: def.slave,
        timeout: Duration::from_secs_f64(def.timeout_s),
        encoding: def.encoding,
    })
}

pub fn compile_io_map(def: &IoMapDef) -> Result<IoMap, ValidationError> {
    let pv = compile_register_ref(&def.pv, "io.pv")?;
    let op = compile_register_ref(&def.op, "io.op")?;
    if !op.kind.writable() {
        return Err(ValidationError::InvalidValue {
            field: "io.op.register".to_string(),
            value: def.op.register.clone(),
            reason: "the operating point register must be writable".to_string(),
        });
    }
    Ok(IoMap { pv, op })
}

fn compile_register_ref(
    def: &RegisterRefDef,
    field: &str,
) -> Result<RegisterAddress, ValidationError> {
    let kind = match def.register.as_str() {
        "holding" => RegisterKind::Holding,
        "input" => RegisterKind::Input,
        "coil" => RegisterKind::Coil,
        "discrete" => RegisterKind::DiscreteInput,
        other => {
            return Err(ValidationError::InvalidValue {
                field: format!("{field}.register"),
                value: other.to_string(),
                reason: "expected holding, input, coil, or discrete".to_string(),
            });
        }
    };
    Ok(RegisterAddress {
        kind,
        address: def.address,
    })
}

pub fn compile_fault_policy(def: &ControllerDef) -> Result<FaultPolicy, ValidationError> {
    match def.on_transport_exhausted.as_str() {
        "abort" => Ok(FaultPolicy::Abort),
        "hold" => Ok(FaultPolicy::Hold),
        other => Err(ValidationError::InvalidValue {
            field: "controller.on_transport_exhausted".to_string(),
            value: other.to_string(),
            reason: "expected abort or hold".to_string(),
        }),
    }
}
