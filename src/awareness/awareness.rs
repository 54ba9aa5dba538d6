use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::decoder::{DecodeError, Decoder};

/// Clock bookkeeping for one remote awareness client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientMeta {
    pub clock: u64,
    /// Unix milliseconds of the last accepted record.
    pub last_updated: i64,
}

/// Classification of one awareness update against the previously seen view.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AwarenessChanges {
    pub added: Vec<u64>,
    pub updated: Vec<u64>,
    /// Subset of `updated` whose state content actually changed.
    pub filtered_updated: Vec<u64>,
    pub removed: Vec<u64>,
}

impl AwarenessChanges {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }
}

/// Per-connection view of the presence states announced in awareness updates.
///
/// Client ids here come from inside the awareness payload and are unrelated to
/// connection ids.
#[derive(Debug)]
pub struct Awareness {
    doc_id: u64,
    client_id: u64,
    states: HashMap<u64, Value>,
    meta: HashMap<u64, ClientMeta>,
}

impl Awareness {
    /// Awareness bound to a freshly generated document id.
    pub fn new() -> Self {
        let doc_id = Uuid::new_v4().as_u128() as u64;
        Self::with_doc_id(doc_id)
    }

    pub fn with_doc_id(doc_id: u64) -> Self {
        Self {
            doc_id,
            client_id: doc_id,
            states: HashMap::new(),
            meta: HashMap::new(),
        }
    }

    pub fn doc_id(&self) -> u64 {
        self.doc_id
    }

    pub fn client_id(&self) -> u64 {
        self.client_id
    }

    pub fn local_state(&self) -> Option<&Value> {
        self.states.get(&self.client_id)
    }

    pub fn state(&self, client_id: u64) -> Option<&Value> {
        self.states.get(&client_id)
    }

    pub fn meta(&self, client_id: u64) -> Option<&ClientMeta> {
        self.meta.get(&client_id)
    }

    pub fn apply_update(&mut self, update: &[u8]) -> Result<AwarenessChanges, DecodeError> {
        self.apply_update_at(update, Utc::now().timestamp_millis())
    }

    /// Merges `update` into this view and classifies every accepted record.
    ///
    /// Records whose clock does not advance are skipped. A decode error stops
    /// the batch; records before it stay applied.
    pub fn apply_update_at(
        &mut self,
        update: &[u8],
        now_ms: i64,
    ) -> Result<AwarenessChanges, DecodeError> {
        let mut decoder = Decoder::new(update)?;
        let mut changes = AwarenessChanges::default();

        let count = decoder.read_var_uint()?;
        for _ in 0..count {
            let client_id = decoder.read_var_uint()?;
            let mut clock = decoder.read_var_uint()?;
            let state = match decoder.read_var_string()? {
                "" => None,
                // y-protocols encodes a removed state as the JSON literal `null`
                text => match serde_json::from_str::<Value>(text)? {
                    Value::Null => None,
                    value => Some(value),
                },
            };

            let prev_meta = self.meta.get(&client_id).copied();
            let prev_clock = prev_meta.map_or(0, |meta| meta.clock);
            let tracked = self.states.contains_key(&client_id);

            let accept = prev_clock < clock || (prev_clock == clock && state.is_none() && tracked);
            if !accept {
                continue;
            }

            let prev_state = match &state {
                None => {
                    if client_id == self.client_id && self.local_state().is_some() {
                        // never drop our own live state on a stale removal
                        clock = clock.saturating_add(1);
                        None
                    } else {
                        self.states.remove(&client_id)
                    }
                }
                Some(value) => self.states.insert(client_id, value.clone()),
            };

            self.meta.insert(client_id, ClientMeta { clock, last_updated: now_ms });

            match (prev_meta, &state) {
                (None, Some(_)) => changes.added.push(client_id),
                (Some(_), None) => changes.removed.push(client_id),
                (_, Some(value)) => {
                    if prev_state.as_ref() != Some(value) {
                        changes.filtered_updated.push(client_id);
                    }
                    changes.updated.push(client_id);
                }
                (None, None) => {}
            }
        }

        Ok(changes)
    }
}

impl Default for Awareness {
    fn default() -> Self {
        Self::new()
    }
}
