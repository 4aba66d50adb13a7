// Request payload types for the shifts API

use serde::Deserialize;

use crate::store::{Breakdown, Shift};

/// Client-supplied shift fields. The id is never taken from the client:
/// POST assigns a fresh one and PUT keeps the id from the path, so any id in
/// the body is silently ignored.
#[derive(Debug, Deserialize)]
pub struct ShiftPayload {
    pub entry: String,
    pub exit: String,
    pub breakdown: Breakdown,
    pub rate: f64,
}

impl ShiftPayload {
    /// Materialize a record under the store-assigned id
    pub fn into_shift(self, id: u64) -> Shift {
        Shift {
            id,
            entry: self.entry,
            exit: self.exit,
            breakdown: self.breakdown,
            rate: self.rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_supplied_id_is_ignored() {
        let payload: ShiftPayload = serde_json::from_str(
            r#"{"id":99,"entry":"08:00","exit":"16:00",
                "breakdown":{"RDO":8,"RNO":0,"RDDF":0,"RNDF":0,
                             "HEDO":0,"HENO":0,"HEDDF":0,"HENDF":0},
                "rate":15.5}"#,
        )
        .unwrap();

        assert_eq!(payload.into_shift(1).id, 1);
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let result: Result<ShiftPayload, _> =
            serde_json::from_str(r#"{"entry":"08:00","exit":"16:00"}"#);
        assert!(result.is_err());
    }
}
