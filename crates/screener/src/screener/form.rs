use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level keys every form must carry.
pub const REQUIRED_FORM_KEYS: [&str; 5] = ["id", "name", "disorder", "full_name", "content"];

/// Presentable questionnaire structure, served back exactly as configured.
///
/// The JSON object is stored untouched. Only the presence of the top-level
/// keys is checked; the accessors below read whatever shape is there and skip
/// entries they cannot interpret.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Form(Map<String, Value>);

impl Form {
    pub fn from_object(object: Map<String, Value>) -> Result<Self, FormError> {
        if let Some(key) = REQUIRED_FORM_KEYS
            .iter()
            .find(|key| !object.contains_key(**key))
        {
            return Err(FormError::MissingKey(*key));
        }
        Ok(Self(object))
    }

    pub fn as_object(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn full_name(&self) -> Option<&str> {
        self.get("full_name").and_then(Value::as_str)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get("content")
            .and_then(|content| content.get("display_name"))
            .and_then(Value::as_str)
    }

    pub fn sections(&self) -> impl Iterator<Item = &Value> {
        self.get("content")
            .and_then(|content| content.get("sections"))
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
    }

    pub fn questions(&self) -> impl Iterator<Item = FormQuestion<'_>> {
        self.sections()
            .filter_map(|section| section.get("questions").and_then(Value::as_array))
            .flatten()
            .filter_map(|question| {
                Some(FormQuestion {
                    question_id: question.get("question_id")?.as_str()?,
                    title: question.get("title")?.as_str()?,
                })
            })
    }

    pub fn answer_options(&self) -> impl Iterator<Item = AnswerOption<'_>> {
        self.sections()
            .filter_map(|section| section.get("answers").and_then(Value::as_array))
            .flatten()
            .filter_map(|answer| {
                Some(AnswerOption {
                    title: answer.get("title")?.as_str()?,
                    value: answer.get("value")?.as_i64()?,
                })
            })
    }
}

impl TryFrom<Value> for Form {
    type Error = FormError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(object) => Self::from_object(object),
            _ => Err(FormError::NotAnObject),
        }
    }
}

impl<'de> Deserialize<'de> for Form {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Self::from_object(object).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("form must be a JSON object")]
    NotAnObject,
    #[error("form is missing the `{0}` key")]
    MissingKey(&'static str),
}

/// Label and value of one selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerOption<'a> {
    pub title: &'a str,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormQuestion<'a> {
    pub question_id: &'a str,
    pub title: &'a str,
}
