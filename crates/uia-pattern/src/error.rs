// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for schema construction, registration and dispatch.
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | [`SchemaError`] | schema builder | the schema is never built |
//! | [`RegistrationError`] | registrar | the schema stays unregistered (except augmentation) |
//! | [`DispatchError`] | dispatcher | the provider is never invoked (except `Provider`) |
//! | [`ProviderError`] | provider capability | propagated unchanged through dispatch |
//! | [`InitError`] | schema cell | the cell stays empty, unless only augmentation failed |

use crate::config::{E_FAIL, E_INVALIDARG, UIA_E_ELEMENTNOTAVAILABLE, UIA_E_INVALIDOPERATION};
use crate::wire::{WireKind, WireType};
use std::fmt;
use thiserror::Error;

/// A native type with no wire mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type '{type_name}' has no wire mapping")]
pub struct UnsupportedTypeError {
    pub type_name: String,
}

/// Identity metadata a provider contract must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityField {
    PatternGuid,
    ProviderIid,
    ClientIid,
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PatternGuid => write!(f, "pattern guid"),
            Self::ProviderIid => write!(f, "provider interface id"),
            Self::ClientIid => write!(f, "client interface id"),
        }
    }
}

/// Schema definition errors. Fatal to the schema being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("pattern '{pattern}' is missing its {field}")]
    MissingIdentity {
        pattern: String,
        field: IdentityField,
    },

    #[error("member '{member}': {source}")]
    UnsupportedType {
        member: String,
        #[source]
        source: UnsupportedTypeError,
    },

    #[error("method '{method}': In parameter '{parameter}' follows an Out parameter")]
    InAfterOut { method: String, parameter: String },
}

/// Failure reported by the host automation framework.
///
/// `code` is the host status (HRESULT) and is passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("host call failed (0x{code:08X}): {message}")]
pub struct HostError {
    pub code: i32,
    pub message: String,
}

impl HostError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Registration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The registration service rejected the pattern.
    #[error(transparent)]
    Host(#[from] HostError),

    /// The host answered with id arrays that do not line up with the
    /// submission. Nothing is written back.
    #[error("host assigned {actual} {what} ids for {expected} submitted")]
    IncompleteAssignment {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Primary registration succeeded, the secondary step did not.
    #[error("secondary-consumer augmentation failed: {0}")]
    Augmentation(#[source] HostError),

    /// Primary registration succeeded, but augmentation was requested and
    /// nothing can perform it.
    #[error("augmentation requested but no augmentation service is configured")]
    NoAugmentationService,
}

/// Failure raised by a provider capability.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("provider call failed (0x{code:08X}): {message}")]
pub struct ProviderError {
    pub code: i32,
    pub message: String,
}

impl ProviderError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(E_FAIL, message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(E_INVALIDARG, message)
    }

    /// The element behind the provider is gone.
    pub fn element_not_available() -> Self {
        Self::new(UIA_E_ELEMENTNOTAVAILABLE, "element not available")
    }

    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::new(UIA_E_INVALIDOPERATION, message)
    }
}

/// Dispatch errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("pattern '{0}' is not registered")]
    NotRegistered(String),

    #[error("member index {index} is outside 0..{count}")]
    UnknownMember { index: u32, count: usize },

    #[error("member '{member}' takes {expected} parameter slots, got {actual}")]
    Arity {
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("parameter slot {position} is {actual}, expected {expected}")]
    SlotType {
        position: usize,
        expected: WireType,
        actual: WireType,
    },

    #[error("parameter slot {position} holds no value")]
    EmptySlot { position: usize },

    #[error("argument {position} is {actual}, expected {expected}")]
    ArgumentType {
        position: usize,
        expected: WireKind,
        actual: WireKind,
    },

    #[error("argument {position} is missing")]
    MissingArgument { position: usize },

    #[error("element reference {position} is null")]
    NullElement { position: usize },

    #[error("member '{member}' returned {actual} output values, expected {expected}")]
    ReturnShape {
        member: String,
        expected: usize,
        actual: usize,
    },

    #[error("member '{member}' returned {actual} for output {position}, expected {expected}")]
    ReturnType {
        member: String,
        position: usize,
        expected: WireKind,
        actual: WireKind,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Failure to initialize a process-wide schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Registration(#[from] RegistrationError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Direction;

    #[test]
    fn host_error_display_keeps_code() {
        let err = HostError::new(E_INVALIDARG, "bad pattern");
        assert_eq!(
            err.to_string(),
            "host call failed (0x80070057): bad pattern"
        );
    }

    #[test]
    fn registration_host_error_is_transparent() {
        let host = HostError::new(E_FAIL, "registrar offline");
        let err = RegistrationError::from(host.clone());
        assert_eq!(err.to_string(), host.to_string());
        assert_eq!(err, RegistrationError::Host(host));
    }

    #[test]
    fn provider_error_converts_into_dispatch_error() {
        let err: DispatchError = ProviderError::element_not_available().into();
        match err {
            DispatchError::Provider(p) => assert_eq!(p.code, UIA_E_ELEMENTNOTAVAILABLE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn slot_type_display_names_both_types() {
        let err = DispatchError::SlotType {
            position: 1,
            expected: WireType::new(WireKind::String, Direction::Out),
            actual: WireType::new(WireKind::Int, Direction::In),
        };
        let text = err.to_string();
        assert!(text.contains("Out String"));
        assert!(text.contains("In Int"));
    }

    #[test]
    fn in_after_out_names_the_parameter() {
        let err = SchemaError::InAfterOut {
            method: "Frobnicate".to_string(),
            parameter: "count".to_string(),
        };
        assert!(err.to_string().contains("'count'"));
    }
}
