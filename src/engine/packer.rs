use crate::engine::code_table::Code;
use bitvec::prelude::*;

/// Packed byte length of `dim` codes of `width` bits each.
pub fn row_len(dim: usize, width: u32) -> usize {
    let codes_per_byte = (8 / width) as usize;
    dim.div_ceil(codes_per_byte)
}

/// Packs codes most-significant-bits first, `width` bits per code.
/// The final byte is zero-padded.
pub fn pack(codes: &[Code], width: u32) -> Vec<u8> {
    debug_assert!(8 % width == 0, "width {} does not divide a byte", width);
    let mut bits = BitVec::<u8, Msb0>::with_capacity(codes.len() * width as usize);
    for &code in codes {
        debug_assert!((code as u32) < (1 << width), "code {} exceeds {} bits", code, width);
        for shift in (0..width).rev() {
            bits.push((code >> shift) & 1 == 1);
        }
    }
    bits.into_vec()
}

/// Inverse of [`pack`]: reads `dim` codes and drops trailing padding.
pub fn unpack(row: &[u8], width: u32, dim: usize) -> Vec<Code> {
    let bits = row.view_bits::<Msb0>();
    bits.chunks(width as usize)
        .take(dim)
        .map(|chunk| chunk.iter().fold(0 as Code, |acc, bit| (acc << 1) | *bit as Code))
        .collect()
}
