//! Error types for the field transport.

use crate::link::RegisterKind;
use thiserror::Error;

/// Result type for transport operations.
pub type LinkResult<T> = Result<T, LinkError>;

/// Errors raised by the MODBUS transport.
///
/// Variants split along the retry policy: connection and protocol failures
/// are transient (retried per operation), `Exhausted` marks the retry budget
/// spent, and the remaining variants are configuration-class faults that are
/// never retried.
#[derive(Debug, Error)]
pub enum LinkError {
    /// Operation attempted before `open()` or after `close()`.
    #[error("transport is not connected")]
    NotConnected,

    /// The configured transport method is not one of tcp/rtu.
    #[error("unsupported transport method: {method}")]
    UnsupportedTransport { method: String },

    /// Endpoint configuration could not be interpreted.
    #[error("invalid endpoint: {what}")]
    InvalidEndpoint { what: String },

    /// Attempted to write a read-only register kind.
    #[error("register kind {kind} is read-only")]
    ReadOnlyRegister { kind: RegisterKind },

    /// Register payload could not be encoded or decoded.
    #[error("register payload error: {what}")]
    Codec { what: &'static str },

    /// The device answered with a MODBUS exception code.
    #[error("modbus exception: {0:?}")]
    Exception(tokio_modbus::ExceptionCode),

    /// Protocol or connection failure reported by the client.
    #[error("modbus transport error: {0}")]
    Bus(#[from] tokio_modbus::Error),

    /// Socket or serial I/O failure.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The per-operation retry budget is spent; fatal for the iteration.
    #[error("{operation} failed after {attempts} attempts: {source}")]
    Exhausted {
        operation: &'static str,
        attempts: u32,
        #[source]
        source: Box<LinkError>,
    },
}

impl LinkError {
    /// True once the retry budget for an operation has been spent.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, LinkError::Exhausted { .. })
    }
}
