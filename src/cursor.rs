use crate::error::DecodeError;

/// Sequential little-endian reader over a compiled binary buffer.
///
/// Every read checks the remaining length first, so malformed input
/// surfaces as [`DecodeError::Truncated`] instead of a panic or an
/// out-of-bounds slice.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16, DecodeError> {
        let bytes = self.read_bytes(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.read_bytes(8)?;
        let mut arr = [0u8; 8];
        arr.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(arr))
    }

    pub fn read_i64(&mut self) -> Result<i64, DecodeError> {
        Ok(self.read_u64()? as i64)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    /// Reads a u16-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String, DecodeError> {
        let len = self.read_u16()? as usize;
        let offset = self.pos;
        let bytes = self.read_bytes(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| DecodeError::InvalidUtf8 { offset })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let buf = [0x01, 0x02, 0x00, 0xff];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.read_u8().unwrap(), 1);
        assert_eq!(cursor.read_u16().unwrap(), 2);
        assert_eq!(cursor.position(), 3);
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn read_past_end_is_truncated_not_panic() {
        let buf = [0x01];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(
            cursor.read_u64(),
            Err(DecodeError::Truncated {
                offset: 0,
                needed: 8,
                remaining: 1,
            })
        );
        // Position is untouched by a failed read.
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn read_string_rejects_bad_utf8() {
        let buf = [0x02, 0x00, 0xff, 0xfe];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(
            cursor.read_string(),
            Err(DecodeError::InvalidUtf8 { offset: 2 })
        );
    }

    #[test]
    fn read_string_round_trips() {
        let mut buf = vec![];
        dialog_engine_types::value::encode_str_into("tavern", &mut buf);
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.read_string().unwrap(), "tavern");
        assert!(cursor.is_empty());
    }
}
