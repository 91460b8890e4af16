use stdpack::EncodableValue;

use crate::types::Error;
use crate::types::Result;

/// A named invocation with a single argument value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    pub name: String,
    pub arguments: EncodableValue,
}

impl MethodCall {
    pub fn new(name: impl Into<String>, arguments: impl Into<EncodableValue>) -> Self {
        Self {
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The outcome of a `MethodCall`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodResult {
    Success(EncodableValue),
    Error {
        code: String,
        message: Option<String>,
        details: Option<EncodableValue>,
    },
}

impl MethodResult {
    pub fn success(value: impl Into<EncodableValue>) -> Self {
        MethodResult::Success(value.into())
    }

    pub fn error(
        code: impl Into<String>,
        message: Option<String>,
        details: Option<EncodableValue>,
    ) -> Self {
        MethodResult::Error {
            code: code.into(),
            message,
            details,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MethodResult::Success(_))
    }

    fn variant_name(&self) -> &'static str {
        match self {
            MethodResult::Success(_) => "success",
            MethodResult::Error { .. } => "error",
        }
    }

    pub fn as_success(&self) -> Result<&EncodableValue> {
        match self {
            MethodResult::Success(value) => Ok(value),
            other => Err(Error::ResultKind {
                expected: "success",
                found: other.variant_name(),
            }),
        }
    }

    /// Returns `(code, message, details)` of an error result.
    pub fn as_error(&self) -> Result<(&str, Option<&str>, Option<&EncodableValue>)> {
        match self {
            MethodResult::Error {
                code,
                message,
                details,
            } => Ok((code, message.as_deref(), details.as_ref())),
            other => Err(Error::ResultKind {
                expected: "error",
                found: other.variant_name(),
            }),
        }
    }

    /// Turns an error result into `Error::Remote`.
    pub fn into_result(self) -> Result<EncodableValue> {
        match self {
            MethodResult::Success(value) => Ok(value),
            MethodResult::Error {
                code,
                message,
                details,
            } => Err(Error::Remote {
                code,
                message,
                details,
            }),
        }
    }
}
