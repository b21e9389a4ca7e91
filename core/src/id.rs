use base64::{engine::general_purpose, Engine as _};
use std::{fmt, str::FromStr};
use thiserror::Error;
use ulid::Ulid;

/// Length of a ULID in its canonical Crockford base32 form
const ULID_TEXT_LEN: usize = 26;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    #[error("invalid base64: {0}")]
    InvalidBase64(base64::DecodeError),
    #[error("invalid length")]
    InvalidLength,
    #[error("invalid ulid: {0}")]
    InvalidUlid(ulid::DecodeError),
}

/// Identifier of an entity instance.
///
/// The canonical textual form is url-safe base64 (no padding) of the 16 ULID bytes.
/// The 26 character ULID text form is accepted when parsing as well.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Ord, PartialOrd)]
pub struct EntityId(Ulid);

impl EntityId {
    pub fn new() -> Self { EntityId(Ulid::new()) }

    pub fn to_ulid(&self) -> Ulid { self.0 }

    pub fn from_base64<T: AsRef<[u8]>>(input: T) -> Result<Self, DecodeError> {
        let decoded = general_purpose::URL_SAFE_NO_PAD.decode(input).map_err(DecodeError::InvalidBase64)?;
        let bytes: [u8; 16] = decoded[..].try_into().map_err(|_| DecodeError::InvalidLength)?;

        Ok(EntityId(Ulid::from_bytes(bytes)))
    }

    pub fn to_base64(&self) -> String { general_purpose::URL_SAFE_NO_PAD.encode(self.0.to_bytes()) }
}

impl FromStr for EntityId {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == ULID_TEXT_LEN {
            Ulid::from_string(s).map(EntityId).map_err(DecodeError::InvalidUlid)
        } else {
            Self::from_base64(s)
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.to_base64()) }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl Default for EntityId {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_and_ulid_forms_parse_to_same_id() {
        let id = EntityId::new();
        let from_base64: EntityId = id.to_base64().parse().unwrap();
        let from_ulid: EntityId = id.to_ulid().to_string().parse().unwrap();
        assert_eq!(from_base64, id);
        assert_eq!(from_ulid, id);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!("not-an-id!".parse::<EntityId>(), Err(DecodeError::InvalidBase64(_))));
        // valid base64, wrong byte count
        assert_eq!("AAAA".parse::<EntityId>(), Err(DecodeError::InvalidLength));
        assert!(matches!("!!!!!!!!!!!!!!!!!!!!!!!!!!".parse::<EntityId>(), Err(DecodeError::InvalidUlid(_))));
    }
}
