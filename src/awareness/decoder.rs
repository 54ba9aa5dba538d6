use thiserror::Error;

/// Errors raised while reading a varint-framed buffer.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unexpected end of buffer at offset {0}")]
    UnexpectedEof(usize),
    #[error("varint at offset {0} does not fit in 64 bits")]
    VarUintOverflow(usize),
    #[error("string field is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
    #[error("awareness state is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Forward-only cursor over a y-protocol encoded buffer.
///
/// Construction consumes the leading `var_uint` length prefix, so the first
/// field read afterwards is the first field of the embedded payload.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
    length: u64,
}

impl<'a> Decoder<'a> {
    pub fn new(buf: &'a [u8]) -> Result<Self, DecodeError> {
        let mut decoder = Self { buf, pos: 0, length: 0 };
        decoder.length = decoder.read_var_uint()?;
        Ok(decoder)
    }

    /// Value of the length prefix read at construction.
    pub fn length(&self) -> u64 {
        self.length
    }

    /// Number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Little-endian base-128 varint.
    pub fn read_var_uint(&mut self) -> Result<u64, DecodeError> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift: u32 = 0;
        loop {
            let byte = *self
                .buf
                .get(self.pos)
                .ok_or(DecodeError::UnexpectedEof(self.pos))?;
            self.pos += 1;

            let bits = u64::from(byte & 0x7f);
            if shift >= 64 || (shift > 0 && bits >> (64 - shift) != 0) {
                return Err(DecodeError::VarUintOverflow(start));
            }
            value |= bits << shift;
            shift += 7;

            if byte < 0x80 {
                return Ok(value);
            }
        }
    }

    /// A `var_uint` byte length followed by exactly that many UTF-8 bytes.
    pub fn read_var_string(&mut self) -> Result<&'a str, DecodeError> {
        let len = self.read_var_uint()?;
        if len == 0 {
            return Ok("");
        }
        let end = usize::try_from(len)
            .ok()
            .and_then(|len| self.pos.checked_add(len))
            .filter(|end| *end <= self.buf.len())
            .ok_or(DecodeError::UnexpectedEof(self.buf.len()))?;
        let text = std::str::from_utf8(&self.buf[self.pos..end])?;
        self.pos = end;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::awareness::encoder::Encoder;

    fn framed(body: Vec<u8>) -> Vec<u8> {
        let mut enc = Encoder::new();
        enc.write_var_uint(body.len() as u64);
        let mut buf = enc.into_bytes();
        buf.extend(body);
        buf
    }

    #[test]
    fn var_uint_boundaries_survive_a_round_trip() {
        for value in [0u64, 127, 128, 16383, 16384] {
            let mut enc = Encoder::new();
            enc.write_var_uint(value);
            let buf = framed(enc.into_bytes());
            let mut dec = Decoder::new(&buf).unwrap();
            assert_eq!(dec.read_var_uint().unwrap(), value);
            assert_eq!(dec.remaining(), 0);
        }
    }

    #[test]
    fn multi_byte_encoding_matches_wire_layout() {
        // 300 = 0b1_0010_1100 -> [0xac, 0x02]
        let mut dec = Decoder::new(&[0x00, 0xac, 0x02]).unwrap();
        assert_eq!(dec.length(), 0);
        assert_eq!(dec.read_var_uint().unwrap(), 300);
    }

    #[test]
    fn constructor_consumes_length_prefix() {
        let dec = Decoder::new(&[0x05, 0x01]).unwrap();
        assert_eq!(dec.length(), 5);
        assert_eq!(dec.remaining(), 1);
    }

    #[test]
    fn empty_buffer_is_rejected() {
        assert!(matches!(Decoder::new(&[]), Err(DecodeError::UnexpectedEof(0))));
    }

    #[test]
    fn truncated_varint_is_rejected() {
        let mut dec = Decoder::new(&[0x00, 0x80]).unwrap();
        assert!(matches!(dec.read_var_uint(), Err(DecodeError::UnexpectedEof(2))));
    }

    #[test]
    fn oversized_varint_is_rejected() {
        let mut buf = vec![0x00];
        buf.extend([0xff; 10]);
        buf.push(0x01);
        let mut dec = Decoder::new(&buf).unwrap();
        assert!(matches!(dec.read_var_uint(), Err(DecodeError::VarUintOverflow(1))));
    }

    #[test]
    fn u64_max_decodes() {
        let mut enc = Encoder::new();
        enc.write_var_uint(u64::MAX);
        let buf = framed(enc.into_bytes());
        let mut dec = Decoder::new(&buf).unwrap();
        assert_eq!(dec.read_var_uint().unwrap(), u64::MAX);
    }

    #[test]
    fn var_string_reads_exactly_its_length() {
        let mut enc = Encoder::new();
        enc.write_var_string("{\"a\":1}");
        enc.write_var_uint(42);
        let buf = framed(enc.into_bytes());

        let mut dec = Decoder::new(&buf).unwrap();
        assert_eq!(dec.read_var_string().unwrap(), "{\"a\":1}");
        assert_eq!(dec.read_var_uint().unwrap(), 42);
    }

    #[test]
    fn empty_var_string() {
        let mut dec = Decoder::new(&[0x01, 0x00]).unwrap();
        assert_eq!(dec.read_var_string().unwrap(), "");
    }

    #[test]
    fn var_string_longer_than_buffer_is_rejected() {
        let mut dec = Decoder::new(&[0x00, 0x05, b'a', b'b']).unwrap();
        assert!(matches!(dec.read_var_string(), Err(DecodeError::UnexpectedEof(4))));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut dec = Decoder::new(&[0x00, 0x02, 0xc3, 0x28]).unwrap();
        assert!(matches!(dec.read_var_string(), Err(DecodeError::InvalidUtf8(_))));
    }
}
