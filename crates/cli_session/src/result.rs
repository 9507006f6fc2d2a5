use onegraph_api::{GraphqlError, GraphqlResponse};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::event::CliEvent;

/// Typed outcome of one OneGraph operation.
///
/// `Empty` covers a response without errors whose expected nested field is
/// missing or null.
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult<T> {
    Success(T),
    Empty,
    Failure(Vec<GraphqlError>),
}

impl<T> OperationResult<T> {
    /// Unwrap the nested field at `path` of `response` into `T`.
    pub fn from_response(response: GraphqlResponse, path: &[&str]) -> Self
    where
        T: DeserializeOwned,
    {
        if !response.errors.is_empty() {
            return Self::Failure(response.errors);
        }
        let Some(value) = response.data_at(path) else {
            return Self::Empty;
        };
        match T::deserialize(value) {
            Ok(parsed) => Self::Success(parsed),
            Err(error) => Self::Failure(vec![GraphqlError::bad_response(format!(
                "unexpected shape at {}: {error}",
                path.join(".")
            ))]),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    #[must_use]
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failure(_))
    }

    #[must_use]
    pub fn success(self) -> Option<T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Empty | Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn as_success(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Empty | Self::Failure(_) => None,
        }
    }

    #[must_use]
    pub fn errors(&self) -> &[GraphqlError] {
        match self {
            Self::Failure(errors) => errors,
            Self::Success(_) | Self::Empty => &[],
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> OperationResult<U> {
        match self {
            Self::Success(value) => OperationResult::Success(f(value)),
            Self::Empty => OperationResult::Empty,
            Self::Failure(errors) => OperationResult::Failure(errors),
        }
    }

    /// `Ok(None)` for `Empty`; errors for `Failure`.
    pub fn into_result(self) -> Result<Option<T>, Vec<GraphqlError>> {
        match self {
            Self::Success(value) => Ok(Some(value)),
            Self::Empty => Ok(None),
            Self::Failure(errors) => Err(errors),
        }
    }
}

/// Result of one event fetch.
///
/// A failed request leaves `events` empty. A malformed element only costs
/// itself: the well-formed events are still delivered, next to one
/// `BAD_RESPONSE` error per element that could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventBatch {
    pub events: Vec<CliEvent>,
    pub errors: Vec<GraphqlError>,
}

impl EventBatch {
    /// True when the fetch reported no errors.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.events.iter().map(|event| event.id.clone()).collect()
    }
}

impl From<OperationResult<Vec<Value>>> for EventBatch {
    fn from(result: OperationResult<Vec<Value>>) -> Self {
        match result {
            OperationResult::Success(items) => {
                let mut batch = Self::default();
                for (index, item) in items.into_iter().enumerate() {
                    match serde_json::from_value::<CliEvent>(item) {
                        Ok(event) => batch.events.push(event),
                        Err(error) => batch.errors.push(GraphqlError::bad_response(format!(
                            "unexpected event shape at oneGraph.netlifyCliEvents[{index}]: {error}"
                        ))),
                    }
                }
                batch
            }
            OperationResult::Empty => Self::default(),
            OperationResult::Failure(errors) => Self {
                events: Vec::new(),
                errors,
            },
        }
    }
}
