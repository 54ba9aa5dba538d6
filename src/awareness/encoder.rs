/// Writer for the varint framing read by [`Decoder`](super::decoder::Decoder).
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_var_uint(&mut self, mut value: u64) {
        while value > 0x7f {
            self.buf.push(0x80 | (value & 0x7f) as u8);
            value >>= 7;
        }
        self.buf.push(value as u8);
    }

    pub fn write_var_string(&mut self, text: &str) {
        self.write_var_uint(text.len() as u64);
        self.buf.extend_from_slice(text.as_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// One record of an awareness update.
#[derive(Debug, Clone)]
pub struct AwarenessRecord {
    pub client_id: u64,
    pub clock: u64,
    /// `None` announces that the client went away.
    pub state: Option<serde_json::Value>,
}

/// Encodes records the way a y-protocol client frames an awareness message
/// body: the byte length of the update, then the record count and records.
pub fn encode_awareness_update(records: &[AwarenessRecord]) -> Vec<u8> {
    let mut update = Encoder::new();
    update.write_var_uint(records.len() as u64);
    for record in records {
        update.write_var_uint(record.client_id);
        update.write_var_uint(record.clock);
        match &record.state {
            Some(state) => update.write_var_string(&state.to_string()),
            None => update.write_var_string("null"),
        }
    }
    let update = update.into_bytes();

    let mut framed = Encoder::new();
    framed.write_var_uint(update.len() as u64);
    let mut out = framed.into_bytes();
    out.extend(update);
    out
}
