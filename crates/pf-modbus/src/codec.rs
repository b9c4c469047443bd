//! IEEE-754 float packing for 16-bit register tables.
//!
//! Each 32-bit float occupies two consecutive registers in little-endian
//! word order (low word first), matching the device's register map. Decoding
//! is the exact inverse, with every recovered value rounded to two decimal
//! places.

use crate::error::{LinkError, LinkResult};
use pf_core::round2;

/// Pack floats into register pairs, low word first.
pub fn encode_f32(values: &[f32]) -> Vec<u16> {
    let mut regs = Vec::with_capacity(values.len() * 2);
    for value in values {
        let bits = value.to_bits();
        regs.push(bits as u16);
        regs.push((bits >> 16) as u16);
    }
    regs
}

/// Unpack register pairs back into floats.
///
/// # Errors
///
/// Returns a codec error if the register count is odd.
pub fn decode_f32(regs: &[u16]) -> LinkResult<Vec<f32>> {
    if regs.len() % 2 != 0 {
        return Err(LinkError::Codec {
            what: "float decode requires an even register count",
        });
    }
    Ok(regs
        .chunks_exact(2)
        .map(|pair| {
            let bits = (pair[0] as u32) | ((pair[1] as u32) << 16);
            round2(f32::from_bits(bits) as f64) as f32
        })
        .collect())
}
