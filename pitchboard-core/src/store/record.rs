//! Conversion between typed entities and hash records.
//!
//! Each top-level field of an entity becomes one hash field holding the
//! JSON encoding of its value.

use super::Fields;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("entity does not serialize to an object")]
    NotAnObject,

    #[error("field `{field}` is not valid JSON: {source}")]
    Field {
        field: String,
        source: serde_json::Error,
    },

    #[error("{0}")]
    Shape(#[from] serde_json::Error),

    /// The JSON form no longer decodes into the entity, typically because a
    /// non-finite float was written as `null`.
    #[error("entity does not survive encoding: {0}")]
    Lossy(serde_json::Error),
}

pub fn encode<T: Serialize + DeserializeOwned>(value: &T) -> Result<Fields, CodecError> {
    let encoded = serde_json::to_value(value)?;
    serde_json::from_value::<T>(encoded.clone()).map_err(CodecError::Lossy)?;
    let Value::Object(map) = encoded else {
        return Err(CodecError::NotAnObject);
    };
    map.into_iter()
        .map(|(field, value)| Ok((field, serde_json::to_string(&value)?)))
        .collect()
}

pub fn decode<T: DeserializeOwned>(fields: Fields) -> Result<T, CodecError> {
    let mut map = serde_json::Map::with_capacity(fields.len());
    for (field, raw) in fields {
        let value = serde_json::from_str(&raw).map_err(|source| CodecError::Field {
            field: field.clone(),
            source,
        })?;
        map.insert(field, value);
    }
    Ok(serde_json::from_value(Value::Object(map))?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Sample {
        id: String,
        score: f64,
        tags: Vec<String>,
        note: Option<String>,
    }

    #[test]
    fn test_one_field_per_member() {
        let sample = Sample {
            id: "s1".to_string(),
            score: 87.5,
            tags: vec!["a".to_string()],
            note: None,
        };
        let fields = encode(&sample).unwrap();
        assert_eq!(fields.len(), 4);
        assert_eq!(fields["id"], "\"s1\"");
        assert_eq!(fields["score"], "87.5");
        assert_eq!(fields["note"], "null");
        assert_eq!(decode::<Sample>(fields).unwrap(), sample);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let mut fields = encode(&Sample {
            id: "s1".to_string(),
            score: 1.0,
            tags: vec![],
            note: None,
        })
        .unwrap();
        fields.insert("surprise".to_string(), "true".to_string());
        assert!(matches!(decode::<Sample>(fields), Err(CodecError::Shape(_))));
    }

    #[test]
    fn test_garbage_field_rejected() {
        let mut fields = Fields::new();
        fields.insert("id".to_string(), "not json".to_string());
        assert!(matches!(
            decode::<Sample>(fields),
            Err(CodecError::Field { field, .. }) if field == "id"
        ));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(encode(&42u32), Err(CodecError::NotAnObject)));
    }

    #[test]
    fn test_non_finite_float_rejected() {
        for score in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let sample = Sample {
                id: "s1".to_string(),
                score,
                tags: vec![],
                note: None,
            };
            assert!(matches!(encode(&sample), Err(CodecError::Lossy(_))));
        }
    }
}
