use std::collections::{BTreeMap, BTreeSet};

pub type Participant = String;
pub type Weight = u64;

/// Counters per participant. A `BTreeMap` keeps iteration deterministic,
/// so draws against the same state and seed reproduce.
pub type State = BTreeMap<Participant, Weight>;
/// Participants eligible for the current draw round.
pub type Selection = BTreeSet<Participant>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("state blob failed validation: {0}")]
    Validation(#[from] serde_json::Error),
}

/// Encode the state as a JSON object of name -> counter.
///
/// The empty-string key is not a valid participant and is dropped before
/// encoding, mirroring `deserialize`.
pub fn serialize(state: &State) -> Result<String, Error> {
    if state.contains_key("") {
        let clone: State = state
            .iter()
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, weight)| (name.clone(), *weight))
            .collect();
        return Ok(serde_json::to_string(&clone)?);
    }
    Ok(serde_json::to_string(state)?)
}

/// Decode a persisted blob, validating it is a mapping of string -> number.
/// Anything else (malformed JSON, a non-numeric field) is rejected.
pub fn deserialize(blob: &str) -> Result<State, Error> {
    let mut state: State = serde_json::from_str(blob)?;
    state.remove("");
    Ok(state)
}
