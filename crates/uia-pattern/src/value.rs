// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter values and the per-slot value box.
//!
//! The host hands the dispatcher a buffer of [`ParameterSlot`]s. In slots
//! arrive filled, Out slots arrive empty. A [`ParamBox`] decodes one In slot
//! into a [`ParamValue`] or encodes one [`ParamValue`] into an Out slot.
//!
//! Encoding moves the payload into the slot: string and element payloads
//! then belong to the host, which collects them with
//! [`ParameterSlot::take`]. The box keeps nothing.

use crate::error::DispatchError;
use crate::wire::{Direction, NativeTyped, WireKind, WireType};
use std::fmt;
use std::sync::Arc;

/// A provider-side UI element the host can reference remotely.
///
/// The element tree itself lives outside this crate; only its identity
/// matters here (see [`crate::config::ELEMENT_PROVIDER_IID`]).
pub trait ElementProvider: fmt::Debug + Send + Sync {}

/// Shared reference to a provider-side element.
pub type ElementRef = Arc<dyn ElementProvider>;

/// A native value travelling through one call slot.
#[derive(Debug, Clone)]
pub enum ParamValue {
    Int(i32),
    Bool(bool),
    String(String),
    Double(f64),
    Element(Option<ElementRef>),
}

impl ParamValue {
    pub fn kind(&self) -> WireKind {
        match self {
            Self::Int(_) => WireKind::Int,
            Self::Bool(_) => WireKind::Bool,
            Self::String(_) => WireKind::String,
            Self::Double(_) => WireKind::Double,
            Self::Element(_) => WireKind::Element,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(v) => Some(*v),
            _ => None,
        }
    }

    /// Element payload; `Some(None)` is a null element reference.
    pub fn as_element(&self) -> Option<Option<&ElementRef>> {
        match self {
            Self::Element(v) => Some(v.as_ref()),
            _ => None,
        }
    }
}

// Elements compare by identity.
impl PartialEq for ParamValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Element(a), Self::Element(b)) => match (a, b) {
                (Some(a), Some(b)) => Arc::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            },
            _ => false,
        }
    }
}

impl From<i32> for ParamValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<ElementRef> for ParamValue {
    fn from(v: ElementRef) -> Self {
        Self::Element(Some(v))
    }
}

impl From<Option<ElementRef>> for ParamValue {
    fn from(v: Option<ElementRef>) -> Self {
        Self::Element(v)
    }
}

/// One host call slot: a declared wire type plus its payload, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSlot {
    wire_type: WireType,
    payload: Option<ParamValue>,
}

impl ParameterSlot {
    /// A filled In slot typed after its value.
    pub fn input(value: impl Into<ParamValue>) -> Self {
        let value = value.into();
        Self {
            wire_type: WireType::new(value.kind(), Direction::In),
            payload: Some(value),
        }
    }

    /// An empty Out slot.
    pub fn output(kind: WireKind) -> Self {
        Self {
            wire_type: WireType::new(kind, Direction::Out),
            payload: None,
        }
    }

    /// A slot exactly as the transport delivered it.
    pub fn raw(wire_type: WireType, payload: Option<ParamValue>) -> Self {
        Self {
            wire_type,
            payload,
        }
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn value(&self) -> Option<&ParamValue> {
        self.payload.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_none()
    }

    /// Take ownership of the payload, leaving the slot empty.
    pub fn take(&mut self) -> Option<ParamValue> {
        self.payload.take()
    }
}

/// Decoder/encoder over a single slot.
#[derive(Debug)]
pub struct ParamBox<'a> {
    slot: &'a mut ParameterSlot,
    position: usize,
}

impl<'a> ParamBox<'a> {
    /// Box the slot found at `position` in the call buffer.
    pub fn new(slot: &'a mut ParameterSlot, position: usize) -> Self {
        Self { slot, position }
    }

    pub fn wire_type(&self) -> WireType {
        self.slot.wire_type
    }

    /// Read an In slot. The host keeps its payload.
    pub fn decode(&self) -> Result<ParamValue, DispatchError> {
        let wire = self.slot.wire_type;
        if wire.is_out() {
            return Err(DispatchError::SlotType {
                position: self.position,
                expected: WireType::new(wire.kind(), Direction::In),
                actual: wire,
            });
        }
        let value = self
            .slot
            .payload
            .as_ref()
            .ok_or(DispatchError::EmptySlot {
                position: self.position,
            })?;
        if value.kind() != wire.kind() {
            return Err(DispatchError::ArgumentType {
                position: self.position,
                expected: wire.kind(),
                actual: value.kind(),
            });
        }
        Ok(value.clone())
    }

    /// Write an Out slot, handing the payload over to the host.
    pub fn encode(self, value: ParamValue) -> Result<(), DispatchError> {
        let wire = self.slot.wire_type;
        if wire.is_in() {
            return Err(DispatchError::SlotType {
                position: self.position,
                expected: wire.to_out(),
                actual: wire,
            });
        }
        if value.kind() != wire.kind() {
            return Err(DispatchError::ArgumentType {
                position: self.position,
                expected: wire.kind(),
                actual: value.kind(),
            });
        }
        self.slot.payload = Some(value);
        Ok(())
    }
}

/// Typed conversion between native values and [`ParamValue`].
pub trait WireValue: NativeTyped + Sized {
    fn into_param(self) -> ParamValue;

    /// Convert the argument found at `position`.
    fn from_param(value: ParamValue, position: usize) -> Result<Self, DispatchError>;
}

fn argument_type(position: usize, expected: WireKind, value: &ParamValue) -> DispatchError {
    DispatchError::ArgumentType {
        position,
        expected,
        actual: value.kind(),
    }
}

macro_rules! scalar_wire_value {
    ($ty:ty, $variant:ident, $kind:ident) => {
        impl WireValue for $ty {
            fn into_param(self) -> ParamValue {
                ParamValue::$variant(self)
            }

            fn from_param(value: ParamValue, position: usize) -> Result<Self, DispatchError> {
                match value {
                    ParamValue::$variant(v) => Ok(v),
                    other => Err(argument_type(position, WireKind::$kind, &other)),
                }
            }
        }
    };
}

scalar_wire_value!(i32, Int, Int);
scalar_wire_value!(bool, Bool, Bool);
scalar_wire_value!(String, String, String);
scalar_wire_value!(f64, Double, Double);

impl WireValue for ElementRef {
    fn into_param(self) -> ParamValue {
        ParamValue::Element(Some(self))
    }

    fn from_param(value: ParamValue, position: usize) -> Result<Self, DispatchError> {
        match value {
            ParamValue::Element(Some(element)) => Ok(element),
            ParamValue::Element(None) => Err(DispatchError::NullElement { position }),
            other => Err(argument_type(position, WireKind::Element, &other)),
        }
    }
}

impl WireValue for Option<ElementRef> {
    fn into_param(self) -> ParamValue {
        ParamValue::Element(self)
    }

    fn from_param(value: ParamValue, position: usize) -> Result<Self, DispatchError> {
        match value {
            ParamValue::Element(element) => Ok(element),
            other => Err(argument_type(position, WireKind::Element, &other)),
        }
    }
}

/// Pull the next decoded argument and convert it.
///
/// Used by bound method invokers, generated or hand-written.
pub fn next_arg<T, I>(args: &mut I, position: usize) -> Result<T, DispatchError>
where
    T: WireValue,
    I: Iterator<Item = ParamValue>,
{
    let value = args
        .next()
        .ok_or(DispatchError::MissingArgument { position })?;
    T::from_param(value, position)
}
