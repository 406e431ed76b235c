use serde_json::Map;
use serde_json::Value;

/// Raw value of a single inbound field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Plain string value
    Text(String),

    /// Same key supplied more than once (`?id=1&id=2`)
    Repeated(Vec<String>),

    /// Non-string JSON value from a posted body
    Structured(Value),
}

impl FieldValue {
    /// Get the value as a string slice, if it is plain text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Check if the value carries nothing (empty text or JSON null).
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(text) => text.is_empty(),
            FieldValue::Repeated(values) => values.is_empty(),
            FieldValue::Structured(value) => value.is_null(),
        }
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::String(text) => FieldValue::Text(text),
            other => FieldValue::Structured(other),
        }
    }
}

/// Inbound login fields as delivered by the identity provider.
///
/// Keeps the order in which fields arrived. Keys given more than once are
/// collapsed into a single [`FieldValue::Repeated`] entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSource {
    fields: Vec<(String, FieldValue)>,
}

impl FieldSource {
    /// Create an empty field source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a field source from decoded `key=value` pairs.
    ///
    /// # Arguments
    /// * `pairs` - Pairs in the order they were decoded from the query or form body
    ///
    /// # Returns
    /// FieldSource where repeated keys hold every value they were given
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut source = Self::new();
        for (key, value) in pairs {
            source.append(key.into(), value.into());
        }
        source
    }

    /// Build a field source from a posted JSON object.
    ///
    /// String members become [`FieldValue::Text`], everything else is kept
    /// as [`FieldValue::Structured`].
    pub fn from_json(object: Map<String, Value>) -> Self {
        Self {
            fields: object
                .into_iter()
                .map(|(key, value)| (key, FieldValue::from(value)))
                .collect(),
        }
    }

    /// Set a field, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Append one decoded value, turning the field into a repeated one if it already exists.
    pub fn append(&mut self, name: String, value: String) {
        let Some((_, existing)) = self.fields.iter_mut().find(|(key, _)| *key == name) else {
            self.fields.push((name, FieldValue::Text(value)));
            return;
        };

        *existing = match std::mem::replace(existing, FieldValue::Repeated(Vec::new())) {
            FieldValue::Text(first) => FieldValue::Repeated(vec![first, value]),
            FieldValue::Repeated(mut values) => {
                values.push(value);
                FieldValue::Repeated(values)
            }
            FieldValue::Structured(first) => {
                FieldValue::Structured(Value::Array(vec![first, Value::String(value)]))
            }
        };
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Iterate fields in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSource
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_pairs_keeps_order() {
        let source = FieldSource::from_pairs([("id", "1"), ("first_name", "John")]);

        let keys: Vec<&str> = source.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["id", "first_name"]);
        assert_eq!(source.get("id").and_then(FieldValue::as_text), Some("1"));
    }

    #[test]
    fn test_repeated_key_becomes_repeated_value() {
        let source = FieldSource::from_pairs([("id", "1"), ("id", "2"), ("id", "3")]);

        assert_eq!(source.len(), 1);
        assert_eq!(
            source.get("id"),
            Some(&FieldValue::Repeated(vec![
                "1".to_string(),
                "2".to_string(),
                "3".to_string()
            ]))
        );
    }

    #[test]
    fn test_from_json_separates_strings_from_other_values() {
        let object = json!({
            "id": "42",
            "auth_date": 1642203018,
            "photo_url": null,
        });
        let Value::Object(object) = object else {
            panic!("expected object");
        };

        let source = FieldSource::from_json(object);

        assert_eq!(source.get("id"), Some(&FieldValue::Text("42".to_string())));
        assert_eq!(
            source.get("auth_date"),
            Some(&FieldValue::Structured(json!(1642203018)))
        );
        assert!(source.get("photo_url").unwrap().is_empty());
    }

    #[test]
    fn test_insert_replaces_value() {
        let mut source = FieldSource::new();
        source.insert("hash", "aa");
        source.insert("hash", "bb");

        assert_eq!(source.len(), 1);
        assert_eq!(source.get("hash").and_then(FieldValue::as_text), Some("bb"));
    }
}
