//! `{data, error}` response objects returned by every data operation

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, MockbaseError};
use crate::filter::Record;
use crate::schema::from_record;

/// Result of a data operation. Callers branch on `error`, never on panics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Success with no data (e.g. `maybe_single` on zero rows)
    pub fn empty() -> Self {
        Self {
            data: None,
            error: None,
        }
    }

    pub fn err(error: ApiError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse into a standard `Result`
    pub fn into_result(self) -> std::result::Result<Option<T>, ApiError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.data),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            data: self.data.map(f),
            error: self.error,
        }
    }
}

impl Response<Record> {
    /// Decode the row into a typed struct from [`crate::schema`]
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Option<Result<T, MockbaseError>> {
        self.data.as_ref().map(from_record::<T>)
    }
}

/// Rows returned by `insert`: one record for a single payload, a sequence for a batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Inserted {
    One(Record),
    Many(Vec<Record>),
}

impl Inserted {
    pub fn len(&self) -> usize {
        match self {
            Self::One(_) => 1,
            Self::Many(rows) => rows.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The single inserted record, or the first of a batch
    pub fn first(&self) -> Option<&Record> {
        match self {
            Self::One(record) => Some(record),
            Self::Many(rows) => rows.first(),
        }
    }

    pub fn into_vec(self) -> Vec<Record> {
        match self {
            Self::One(record) => vec![record],
            Self::Many(rows) => rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use serde_json::json;

    #[test]
    fn test_response_serializes_null_slots() {
        let resp: Response<Record> = Response::empty();
        assert_eq!(serde_json::to_value(&resp).unwrap(), json!({"data": null, "error": null}));

        let resp: Response<Record> = Response::err(ApiError::new(ErrorCode::Query, "boom"));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"]["code"], "QUERY_ERROR");
        assert!(resp.into_result().is_err());
    }

    #[test]
    fn test_inserted_untagged_shape() {
        let one = Inserted::One(Record::new());
        assert!(serde_json::to_value(&one).unwrap().is_object());
        let many = Inserted::Many(vec![Record::new(), Record::new()]);
        assert!(serde_json::to_value(&many).unwrap().is_array());
        assert_eq!(many.len(), 2);
        assert_eq!(many.into_vec().len(), 2);
    }
}
