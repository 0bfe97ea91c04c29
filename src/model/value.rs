//! Attribute values: scalar or multi-language.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Attribute types whose values are keyed by language.
pub const MULTI_LANG_TYPES: [&str; 2] = ["label", "multiLangString"];

pub fn is_multi_lang_type(attribute_type: &str) -> bool {
    MULTI_LANG_TYPES.contains(&attribute_type)
}

/// A single value, optionally bound to a language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub value: Value,
}

impl ModelValue {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            language: None,
            value: value.into(),
        }
    }

    pub fn with_language(language: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            language: Some(language.into()),
            value: value.into(),
        }
    }

    /// Null, blank strings and empty collections count as empty.
    pub fn is_empty(&self) -> bool {
        is_empty_json(&self.value)
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_str()
    }
}

pub fn is_empty_json(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Value carried by a model attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Single(ModelValue),
    /// Language (lowercase) → value.
    MultiLang(BTreeMap<String, ModelValue>),
}

impl Default for AttributeValue {
    fn default() -> Self {
        Self::Single(ModelValue::new(Value::Null))
    }
}

impl AttributeValue {
    pub fn single(value: impl Into<Value>) -> Self {
        Self::Single(ModelValue::new(value))
    }

    pub fn multi_lang<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self::MultiLang(
            values
                .into_iter()
                .map(|(lang, value)| {
                    let lang = lang.into().to_lowercase();
                    (lang.clone(), ModelValue::with_language(lang, value))
                })
                .collect(),
        )
    }

    /// Build from raw JSON according to the attribute type. Multi-language
    /// types expect an object of `lang -> value`; anything else is kept as a
    /// single value.
    pub fn from_json(attribute_type: &str, value: &Value) -> Self {
        match value {
            Value::Object(map) if is_multi_lang_type(attribute_type) => Self::multi_lang(
                map.iter().map(|(lang, v)| (lang.as_str(), v.clone())),
            ),
            Value::Null if is_multi_lang_type(attribute_type) => Self::MultiLang(BTreeMap::new()),
            other => Self::single(other.clone()),
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Single(v) => v.value.clone(),
            Self::MultiLang(values) => Value::Object(
                values
                    .iter()
                    .map(|(lang, v)| (lang.clone(), v.value.clone()))
                    .collect(),
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Single(v) => v.is_empty(),
            Self::MultiLang(values) => values.values().all(ModelValue::is_empty),
        }
    }

    pub fn is_multi_lang(&self) -> bool {
        matches!(self, Self::MultiLang(_))
    }

    /// For a single value the language is ignored.
    pub fn value_by_language(&self, language: &str) -> Option<&ModelValue> {
        match self {
            Self::Single(v) => Some(v),
            Self::MultiLang(values) => values.get(&language.to_lowercase()),
        }
    }

    /// First non-empty value following the language chain, then any
    /// non-empty value.
    pub fn resolve(&self, languages: &[String]) -> Option<&ModelValue> {
        match self {
            Self::Single(v) => (!v.is_empty()).then_some(v),
            Self::MultiLang(values) => languages
                .iter()
                .filter_map(|lang| values.get(lang))
                .find(|v| !v.is_empty())
                .or_else(|| values.values().find(|v| !v.is_empty())),
        }
    }

    /// Scalar view used by rule comparisons: the single value, or the first
    /// non-empty language value.
    pub fn scalar(&self) -> Value {
        match self {
            Self::Single(v) => v.value.clone(),
            Self::MultiLang(values) => values
                .values()
                .find(|v| !v.is_empty())
                .map(|v| v.value.clone())
                .unwrap_or(Value::Null),
        }
    }

    pub fn set_language_value(&mut self, language: &str, value: impl Into<Value>) {
        let language = language.to_lowercase();
        match self {
            Self::Single(v) => v.value = value.into(),
            Self::MultiLang(values) => {
                values.insert(language.clone(), ModelValue::with_language(language, value));
            }
        }
    }
}
