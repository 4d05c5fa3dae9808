//! Response Envelope
//!
//! Every tool call answers with the same wrapper: a success flag, the payload
//! or an error (never both), and optional provenance metadata describing
//! where the data came from.


use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use thiserror::Error;

/// Uniform response wrapper returned by every AgentLink tool
///
/// Construct through [`AgentLinkResponse::ok`] or [`AgentLinkResponse::fail`];
/// a successful envelope never carries an error and a failed one never
/// carries data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentLinkResponse<T = Value> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ResponseError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<ResponseMetadata>,
}

/// Business-level failure reported inside an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_ko: Option<String>,
}

/// Provenance of the data in an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMetadata {
    pub source: String,
    #[serde(serialize_with = "serialize_timestamp")]
    pub retrieved_at: DateTime<Utc>,
    pub cached: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("successful response must not carry an error")]
    ErrorOnSuccess,
    #[error("failed response must not carry data")]
    DataOnFailure,
    #[error("failed response must carry an error")]
    MissingError,
}

impl<T> AgentLinkResponse<T> {
    /// Successful envelope carrying `data`
    #[inline]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            metadata: None,
        }
    }

    /// Failed envelope carrying `error`
    #[inline]
    pub fn fail(error: ResponseError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            metadata: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_metadata(mut self, metadata: ResponseMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.success
    }

    #[inline]
    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[inline]
    pub fn error(&self) -> Option<&ResponseError> {
        self.error.as_ref()
    }

    #[inline]
    pub fn metadata(&self) -> Option<&ResponseMetadata> {
        self.metadata.as_ref()
    }
}

impl ResponseError {
    #[inline]
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            message_ko: None,
        }
    }

    /// Attach the Korean rendering of the message
    #[inline]
    #[must_use]
    pub fn with_korean(mut self, message_ko: impl Into<String>) -> Self {
        self.message_ko = Some(message_ko.into());
        self
    }
}

impl ResponseMetadata {
    /// Metadata stamped with the current time
    #[inline]
    pub fn now(source: impl Into<String>, cached: bool) -> Self {
        Self {
            source: source.into(),
            retrieved_at: Utc::now(),
            cached,
        }
    }
}

// Wire shape before the success/data/error invariant is checked.
#[derive(Deserialize)]
struct EnvelopeRepr<T> {
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<ResponseError>,
    #[serde(default)]
    metadata: Option<ResponseMetadata>,
}

impl<T> TryFrom<EnvelopeRepr<T>> for AgentLinkResponse<T> {
    type Error = EnvelopeError;

    fn try_from(repr: EnvelopeRepr<T>) -> Result<Self, Self::Error> {
        match (repr.success, repr.data, repr.error) {
            (true, _, Some(_)) => Err(EnvelopeError::ErrorOnSuccess),
            (false, Some(_), _) => Err(EnvelopeError::DataOnFailure),
            (false, None, None) => Err(EnvelopeError::MissingError),
            (success, data, error) => Ok(Self {
                success,
                data,
                error,
                metadata: repr.metadata,
            }),
        }
    }
}

impl<'de, T> Deserialize<'de> for AgentLinkResponse<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = EnvelopeRepr::<T>::deserialize(deserializer)?;
        Self::try_from(repr).map_err(serde::de::Error::custom)
    }
}

// ISO-8601 in UTC with millisecond precision, e.g. 2025-01-02T03:04:05.678Z
fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}
