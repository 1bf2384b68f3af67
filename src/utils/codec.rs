//! Explicit BCS reader/writer
//!
//! Used where the encoding depends on a leading tag byte (multisig public
//! keys and compressed signatures) or on a runtime type (pure arguments),
//! so derive-based `bcs` serialization does not fit.

use crate::error::{SuiError, SuiResult};

#[derive(Debug, Default)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.buf.push(value);
        self
    }

    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.buf.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn write_fixed(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    /// Sequence length / enum tag encoding
    pub fn write_uleb128(&mut self, mut value: u64) -> &mut Self {
        while value >= 0x80 {
            self.buf.push((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.push(value as u8);
        self
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> &mut Self {
        self.write_uleb128(bytes.len() as u64);
        self.write_fixed(bytes)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug)]
pub struct BcsReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn eof(&self, wanted: usize) -> SuiError {
        SuiError::InvalidMultiSig(format!(
            "unexpected end of input: wanted {} bytes at offset {}, {} available",
            wanted,
            self.pos,
            self.data.len() - self.pos
        ))
    }

    pub fn read_u8(&mut self) -> SuiResult<u8> {
        let byte = *self.data.get(self.pos).ok_or_else(|| self.eof(1))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn read_u16(&mut self) -> SuiResult<u16> {
        let bytes = self.read_fixed::<2>()?;
        Ok(u16::from_le_bytes(bytes))
    }

    pub fn read_fixed<const N: usize>(&mut self) -> SuiResult<[u8; N]> {
        if self.data.len() - self.pos < N {
            return Err(self.eof(N));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub fn read_uleb128(&mut self) -> SuiResult<u64> {
        let mut value: u64 = 0;
        for shift in (0..64).step_by(7) {
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                // Canonical form: no trailing zero continuation groups
                if byte == 0 && shift > 0 {
                    return Err(SuiError::InvalidMultiSig("non-canonical ULEB128".into()));
                }
                return Ok(value);
            }
        }
        Err(SuiError::InvalidMultiSig("ULEB128 overflow".into()))
    }

    /// Fail if bytes remain after a complete value
    pub fn finish(self) -> SuiResult<()> {
        if self.pos != self.data.len() {
            return Err(SuiError::InvalidMultiSig(format!(
                "{} trailing bytes",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uleb128_matches_bcs_crate() {
        for len in [0usize, 1, 127, 128, 300, 16_384] {
            let payload = vec![0u8; len];
            let mut writer = BcsWriter::new();
            writer.write_bytes(&payload);
            assert_eq!(writer.into_bytes(), bcs::to_bytes(&payload).unwrap());
        }
    }

    #[test]
    fn test_reader_roundtrip() {
        let mut writer = BcsWriter::new();
        writer.write_u8(3).write_u16(0x1234).write_uleb128(300).write_fixed(&[1, 2, 3]);
        let bytes = writer.into_bytes();

        let mut reader = BcsReader::new(&bytes);
        assert_eq!(reader.read_u8().unwrap(), 3);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_uleb128().unwrap(), 300);
        assert_eq!(reader.read_fixed::<3>().unwrap(), [1, 2, 3]);
        reader.finish().unwrap();
    }

    #[test]
    fn test_reader_reports_truncation_and_trailing() {
        let mut reader = BcsReader::new(&[1]);
        assert!(reader.read_fixed::<2>().is_err());

        let mut reader = BcsReader::new(&[1, 2]);
        reader.read_u8().unwrap();
        assert!(reader.finish().is_err());
    }
}
