//! Multi-message error lists returned inside the response envelope.

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// An ordered collection of error messages from the API.
///
/// The envelope's `errors` field carries zero or more human-readable
/// messages. The JSON form is always an array (`[]` when empty, never
/// `null`), and the string form joins messages with newlines.
///
/// Implements [`std::error::Error`] so an API failure propagates through
/// ordinary `?` channels; match on
/// [`ClientError::Api`](https://docs.rs/ecobank-rs) to recover the
/// individual messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResponseErrors(Vec<String>);

impl ResponseErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a message, preserving insertion order.
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All messages in insertion order.
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

impl Display for ResponseErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("\n"))
    }
}

impl std::error::Error for ResponseErrors {}

impl From<Vec<String>> for ResponseErrors {
    fn from(messages: Vec<String>) -> Self {
        Self(messages)
    }
}

impl IntoIterator for ResponseErrors {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResponseErrors {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_preserves_order() {
        let mut errors = ResponseErrors::new();
        errors.push("Error 1");
        errors.push("Error 2");
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.messages(), ["Error 1", "Error 2"]);
    }

    #[test]
    fn display_joins_with_newlines() {
        let empty = ResponseErrors::new();
        assert_eq!(empty.to_string(), "");

        let single = ResponseErrors::from(vec!["Single Error".to_string()]);
        assert_eq!(single.to_string(), "Single Error");

        let multiple = ResponseErrors::from(vec![
            "Error A".to_string(),
            "Error B".to_string(),
            "Error C".to_string(),
        ]);
        assert_eq!(multiple.to_string(), "Error A\nError B\nError C");
    }

    #[test]
    fn json_form_is_an_array() {
        let empty = ResponseErrors::new();
        assert_eq!(serde_json::to_string(&empty).unwrap(), "[]");

        let two = ResponseErrors::from(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(serde_json::to_string(&two).unwrap(), r#"["x","y"]"#);

        let back: ResponseErrors = serde_json::from_str(r#"["x","y"]"#).unwrap();
        assert_eq!(back, two);
    }

    #[test]
    fn usable_as_an_error() {
        let errors = ResponseErrors::from(vec!["boom".to_string()]);
        let dynamic: Box<dyn std::error::Error> = Box::new(errors);
        assert_eq!(dynamic.to_string(), "boom");
    }
}
