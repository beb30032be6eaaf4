//! Dynamic (JSON) arguments for batch operations.
//!
//! The typed store API takes slices and iterators, so shape errors cannot
//! occur there. These wrappers validate loosely typed input, such as the
//! CLI's JSON arguments, before it reaches the store.

use serde_json::Value as Json;

use super::error::KvError;

/// Entries for [`KvStore::insert_multiple`](super::KvStore::insert_multiple).
///
/// Values stay as JSON so that encoding happens while the batch is staged:
/// an unsupported value aborts the whole transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Batch {
    entries: Vec<(String, Json)>,
}

impl Batch {
    /// Accepts any of:
    ///
    /// - an object: `{"a": "x", "b": 1}`
    /// - an array of pairs: `[["a", "x"], ["b", 1]]`
    /// - an array of single-entry objects: `[{"a": "x"}, {"b": 1}]`
    ///
    /// Pairs and single-entry objects may be mixed in one array.
    pub fn from_json(input: Json) -> Result<Self, KvError> {
        let entries = match input {
            Json::Object(map) => map.into_iter().collect(),
            Json::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| batch_item(i, item))
                .collect::<Result<Vec<_>, _>>()?,
            other => {
                return Err(KvError::invalid_argument(format!(
                    "batch must be an object or an array, got {}",
                    json_type_name(&other)
                )));
            }
        };
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = (String, Json);
    type IntoIter = std::vec::IntoIter<(String, Json)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl std::str::FromStr for Batch {
    type Err = KvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let json: Json = serde_json::from_str(s)
            .map_err(|e| KvError::invalid_argument(format!("batch is not valid JSON: {}", e)))?;
        Self::from_json(json)
    }
}

fn batch_item(index: usize, item: Json) -> Result<(String, Json), KvError> {
    match item {
        Json::Array(pair) => {
            let mut pair = pair.into_iter();
            match (pair.next(), pair.next(), pair.next()) {
                (Some(Json::String(key)), Some(value), None) => Ok((key, value)),
                (Some(key), Some(_), None) => Err(KvError::invalid_argument(format!(
                    "batch item {}: key must be a string, got {}",
                    index,
                    json_type_name(&key)
                ))),
                _ => Err(KvError::invalid_argument(format!(
                    "batch item {}: expected a [key, value] pair",
                    index
                ))),
            }
        }
        Json::Object(map) if map.len() == 1 => map.into_iter().next().ok_or_else(|| {
            KvError::invalid_argument(format!("batch item {}: empty object", index))
        }),
        Json::Object(map) => Err(KvError::invalid_argument(format!(
            "batch item {}: expected a single-entry object, got {} entries",
            index,
            map.len()
        ))),
        other => Err(KvError::invalid_argument(format!(
            "batch item {}: expected a pair or a single-entry object, got {}",
            index,
            json_type_name(&other)
        ))),
    }
}

/// Keys for [`KvStore::get_multiple`](super::KvStore::get_multiple) and
/// [`KvStore::remove`](super::KvStore::remove).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyList(Vec<String>);

impl KeyList {
    /// Accepts only an array of strings. A bare string is rejected rather
    /// than being treated as a sequence of one-character keys.
    pub fn from_json(input: Json) -> Result<Self, KvError> {
        let Json::Array(items) = input else {
            return Err(KvError::invalid_argument(format!(
                "keys must be an array of strings, got {}",
                json_type_name(&input)
            )));
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Json::String(key) => Ok(key),
                other => Err(KvError::invalid_argument(format!(
                    "key {} must be a string, got {}",
                    i,
                    json_type_name(&other)
                ))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl From<Vec<String>> for KeyList {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

impl AsRef<[String]> for KeyList {
    fn as_ref(&self) -> &[String] {
        &self.0
    }
}

fn json_type_name(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_shapes() {
        let from_object = Batch::from_json(json!({"a": "x", "b": 1})).unwrap();
        assert_eq!(from_object.len(), 2);

        let mixed = Batch::from_json(json!([["a", "x"], {"b": 1}])).unwrap();
        let entries: Vec<_> = mixed.into_iter().collect();
        assert_eq!(
            entries,
            vec![("a".to_string(), json!("x")), ("b".to_string(), json!(1))]
        );

        assert!(Batch::from_json(json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_batch_rejections() {
        for bad in [
            json!("a"),
            json!(5),
            json!(null),
            json!([["a"]]),
            json!([["a", 1, 2]]),
            json!([[1, "x"]]),
            json!([{"a": 1, "b": 2}]),
            json!([{}]),
            json!(["a"]),
        ] {
            let err = Batch::from_json(bad.clone()).unwrap_err();
            assert!(matches!(err, KvError::InvalidArgument(_)), "{} gave {:?}", bad, err);
        }
    }

    #[test]
    fn test_batch_from_str() {
        let batch: Batch = r#"{"k": "v"}"#.parse().unwrap();
        assert_eq!(batch.len(), 1);
        assert!("{not json".parse::<Batch>().is_err());
    }

    #[test]
    fn test_key_list() {
        let keys = KeyList::from_json(json!(["a", "b"])).unwrap();
        assert_eq!(keys.as_slice(), ["a".to_string(), "b".to_string()]);

        assert!(matches!(
            KeyList::from_json(json!("ab")),
            Err(KvError::InvalidArgument(_))
        ));
        assert!(matches!(
            KeyList::from_json(json!({"a": 1})),
            Err(KvError::InvalidArgument(_))
        ));
        assert!(matches!(
            KeyList::from_json(json!(["a", 2])),
            Err(KvError::InvalidArgument(_))
        ));
    }
}
