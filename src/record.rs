//! Binary LUT record.
//!
//! A decomposition is exchanged with LUT mappers as a compact byte record:
//!
//! ```text
//! byte 0        total record length in bytes
//! byte 1        number of LUTs
//! per LUT:
//!   1 byte      fan-in `k`
//!   k bytes     support signal indices
//!   t bytes     truth table, least significant byte first
//! ```
//!
//! where `t = 1` for `k ≤ 3` and `t = 2^(k-3)` otherwise. Signal indices below the
//! number of inputs `N` are primary inputs; index `N + i` is the output of the `i`-th
//! LUT of the record. The last LUT is the output of the network.

use crate::assemble::{simulate, Lut};
use crate::error::AcdError;
use crate::params::MAX_LUT_SIZE;
use crate::truth_table::{TruthTable, MAX_NUM_VARS};

/// Number of truth-table bytes of a LUT with `fanin` inputs.
pub fn num_tt_bytes(fanin: usize) -> usize {
    if fanin <= 3 {
        1
    } else {
        1 << (fanin - 3)
    }
}

/// Number of bytes the record of `luts` occupies.
pub fn record_len(luts: &[Lut]) -> usize {
    2 + luts.iter().map(|lut| 1 + lut.fanin() + num_tt_bytes(lut.fanin())).sum::<usize>()
}

/// Serializes `luts` into the record format.
pub fn encode(luts: &[Lut]) -> Vec<u8> {
    let len = record_len(luts);
    debug_assert!(len <= u8::MAX as usize);
    debug_assert!(luts.len() <= u8::MAX as usize);

    let mut bytes = Vec::with_capacity(len);
    bytes.push(len as u8);
    bytes.push(luts.len() as u8);
    for lut in luts {
        let fanin = lut.fanin();
        debug_assert!(fanin <= MAX_LUT_SIZE as usize);
        bytes.push(fanin as u8);
        bytes.extend(lut.support.iter().map(|&s| s as u8));

        let word = lut.tt.word(0) & bit_mask(fanin);
        bytes.extend((0..num_tt_bytes(fanin)).map(|b| (word >> (8 * b)) as u8));
    }
    debug_assert_eq!(bytes.len(), len);
    bytes
}

/// Serializes `luts` into `buf`, returning the number of bytes written.
pub fn write(luts: &[Lut], buf: &mut [u8]) -> Result<usize, AcdError> {
    let needed = record_len(luts);
    if buf.len() < needed {
        return Err(AcdError::BufferTooSmall {
            needed,
            actual: buf.len(),
        });
    }
    buf[..needed].copy_from_slice(&encode(luts));
    Ok(needed)
}

fn bit_mask(fanin: usize) -> u64 {
    if fanin >= 6 {
        u64::MAX
    } else {
        (1u64 << (1 << fanin)) - 1
    }
}

/// A LUT network over `num_inputs` primary inputs; the last LUT drives the output.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LutNetwork {
    pub num_inputs: usize,
    pub luts: Vec<Lut>,
}

impl LutNetwork {
    /// Parses a record produced for a function of `num_inputs` inputs.
    ///
    /// Trailing bytes after the self-declared length are ignored, so a whole output
    /// buffer can be passed in.
    pub fn from_abc_bytes(bytes: &[u8], num_inputs: usize) -> Result<Self, AcdError> {
        if num_inputs > MAX_NUM_VARS {
            return Err(AcdError::TooManyVariables {
                num_vars: num_inputs,
                max: MAX_NUM_VARS,
            });
        }
        if bytes.len() < 2 {
            return Err(AcdError::MalformedRecord("Missing header".into()));
        }
        let len = bytes[0] as usize;
        if len < 2 || len > bytes.len() {
            return Err(AcdError::MalformedRecord(format!(
                "Invalid record length {} (buffer has {} bytes)",
                len,
                bytes.len()
            )));
        }
        let record = &bytes[..len];
        let num_luts = record[1] as usize;
        if num_luts == 0 {
            return Err(AcdError::MalformedRecord("Record has no LUTs".into()));
        }

        let mut pos = 2;
        let mut next = |what: &str| -> Result<u8, AcdError> {
            let b = record
                .get(pos)
                .copied()
                .ok_or_else(|| AcdError::MalformedRecord(format!("Unexpected end of record reading {}", what)))?;
            pos += 1;
            Ok(b)
        };

        let mut luts = Vec::with_capacity(num_luts);
        for i in 0..num_luts {
            let fanin = next("fan-in")? as usize;
            if fanin > MAX_LUT_SIZE as usize {
                return Err(AcdError::MalformedRecord(format!("LUT {} has fan-in {}", i, fanin)));
            }

            let mut support = Vec::with_capacity(fanin);
            for _ in 0..fanin {
                let s = next("support")? as usize;
                // Only inputs and earlier LUTs can be referenced.
                if s >= num_inputs + i {
                    return Err(AcdError::MalformedRecord(format!("LUT {} references unknown signal {}", i, s)));
                }
                support.push(s);
            }

            let mut word = 0u64;
            for b in 0..num_tt_bytes(fanin) {
                word |= (next("truth table")? as u64) << (8 * b);
            }
            let tt = TruthTable::from_words(fanin, &[word & bit_mask(fanin)]);
            luts.push(Lut { tt, support });
        }

        if pos != len {
            return Err(AcdError::MalformedRecord(format!(
                "Record length {} does not match contents ({} bytes)",
                len, pos
            )));
        }

        Ok(Self { num_inputs, luts })
    }

    /// Evaluates the network on all input rows.
    pub fn simulate(&self) -> TruthTable {
        simulate(&self.luts, self.num_inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn and_xor() -> Vec<Lut> {
        vec![
            Lut {
                tt: TruthTable::from_words(2, &[0x8]),
                support: vec![0, 1],
            },
            Lut {
                tt: TruthTable::from_words(2, &[0x6]),
                support: vec![2, 3],
            },
        ]
    }

    #[test]
    fn test_tt_bytes() {
        assert_eq!(num_tt_bytes(0), 1);
        assert_eq!(num_tt_bytes(3), 1);
        assert_eq!(num_tt_bytes(4), 2);
        assert_eq!(num_tt_bytes(6), 8);
    }

    #[test]
    fn test_encode_layout() {
        let bytes = encode(&and_xor());
        assert_eq!(bytes, vec![10, 2, 2, 0, 1, 0x08, 2, 2, 3, 0x06]);
    }

    #[test]
    fn test_encode_wide_lut() {
        // 5-input AND: four bytes, only the top bit set.
        let lut = Lut {
            tt: TruthTable::from_fn(5, |r| r == 31),
            support: vec![0, 1, 2, 3, 4],
        };
        let bytes = encode(&[lut]);
        assert_eq!(bytes.len(), 2 + 1 + 5 + 4);
        assert_eq!(bytes[0] as usize, bytes.len());
        assert_eq!(&bytes[8..], &[0, 0, 0, 0x80]);
    }

    #[test]
    fn test_decode_and_simulate() {
        let bytes = encode(&and_xor());
        let network = LutNetwork::from_abc_bytes(&bytes, 3).unwrap();
        assert_eq!(network.luts, and_xor());
        // (x0 & x1) ^ x2
        let expected = TruthTable::from_fn(3, |r| ((r & 3) == 3) ^ ((r >> 2) & 1 == 1));
        assert_eq!(network.simulate(), expected);
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let mut buf = [0xffu8; 64];
        let n = write(&and_xor(), &mut buf).unwrap();
        assert_eq!(n, 10);
        assert!(LutNetwork::from_abc_bytes(&buf, 3).is_ok());
    }

    #[test]
    fn test_write_buffer_too_small() {
        let mut buf = [0u8; 4];
        assert_eq!(
            write(&and_xor(), &mut buf),
            Err(AcdError::BufferTooSmall { needed: 10, actual: 4 })
        );
    }

    #[test]
    fn test_decode_rejects_forward_reference() {
        let mut bytes = encode(&and_xor());
        // The first LUT may not read its own output (signal 3).
        bytes[4] = 3;
        assert!(matches!(
            LutNetwork::from_abc_bytes(&bytes, 3),
            Err(AcdError::MalformedRecord(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_length() {
        let mut bytes = encode(&and_xor());
        bytes[0] = 9;
        assert!(LutNetwork::from_abc_bytes(&bytes, 3).is_err());
        bytes[0] = 11;
        assert!(LutNetwork::from_abc_bytes(&bytes, 3).is_err());
        assert!(LutNetwork::from_abc_bytes(&[1], 3).is_err());
    }
}
