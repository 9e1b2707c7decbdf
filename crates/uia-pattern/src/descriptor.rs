// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Parameter, property, method and event descriptors.
//!
//! Descriptors are built once by the schema builder. Indices and host ids
//! stay unset until registration writes them, and never change afterwards.

use crate::error::{DispatchError, SchemaError};
use crate::value::ParamValue;
use crate::wire::{Direction, WireType};
use crate::Guid;
use std::fmt;

/// Bound property getter.
pub type Getter<P> = fn(&P) -> Result<ParamValue, DispatchError>;

/// Bound method call.
///
/// Receives the decoded In values in declaration order and returns the Out
/// values in declaration order.
pub type Invoker<P> = fn(&P, Vec<ParamValue>) -> Result<Vec<ParamValue>, DispatchError>;

/// One formal parameter of a pattern method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterDescriptor {
    name: String,
    wire_type: WireType,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, wire_type: WireType) -> Self {
        Self {
            name: name.into(),
            wire_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    pub fn direction(&self) -> Direction {
        self.wire_type.direction()
    }

    pub fn is_out(&self) -> bool {
        self.wire_type.is_out()
    }
}

/// A pattern property, read through its bound getter.
pub struct PropertyDescriptor<P: ?Sized> {
    name: String,
    guid: Guid,
    wire_type: WireType,
    index: Option<u32>,
    property_id: Option<i32>,
    getter: Getter<P>,
}

impl<P: ?Sized> PropertyDescriptor<P> {
    pub fn new(name: impl Into<String>, guid: Guid, wire_type: WireType, getter: Getter<P>) -> Self {
        Self {
            name: name.into(),
            guid,
            wire_type,
            index: None,
            property_id: None,
            getter,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Author-assigned unique id.
    pub fn guid(&self) -> Guid {
        self.guid
    }

    pub fn wire_type(&self) -> WireType {
        self.wire_type
    }

    /// Dispatch index, once registered.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Host-assigned property id, once registered.
    pub fn property_id(&self) -> Option<i32> {
        self.property_id
    }

    /// Read the property from a provider.
    pub fn get(&self, provider: &P) -> Result<ParamValue, DispatchError> {
        (self.getter)(provider)
    }

    pub(crate) fn assign(&mut self, index: u32, property_id: i32) {
        self.index = Some(index);
        self.property_id = Some(property_id);
    }
}

impl<P: ?Sized> fmt::Debug for PropertyDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("guid", &self.guid)
            .field("wire_type", &self.wire_type)
            .field("index", &self.index)
            .field("property_id", &self.property_id)
            .finish()
    }
}

/// A pattern method, called through its bound invoker.
pub struct MethodDescriptor<P: ?Sized> {
    name: String,
    do_set_focus: bool,
    parameters: Vec<ParameterDescriptor>,
    in_count: usize,
    index: Option<u32>,
    invoker: Invoker<P>,
}

impl<P: ?Sized> MethodDescriptor<P> {
    /// Create a method descriptor.
    ///
    /// Fails if an In parameter follows an Out parameter: the call buffer
    /// always carries every In value ahead of every Out slot.
    pub fn new(
        name: impl Into<String>,
        do_set_focus: bool,
        parameters: Vec<ParameterDescriptor>,
        invoker: Invoker<P>,
    ) -> Result<Self, SchemaError> {
        let name = name.into();
        let mut in_count = 0;
        let mut seen_out = false;
        for param in &parameters {
            if param.is_out() {
                seen_out = true;
            } else if seen_out {
                return Err(SchemaError::InAfterOut {
                    method: name,
                    parameter: param.name.clone(),
                });
            } else {
                in_count += 1;
            }
        }

        Ok(Self {
            name,
            do_set_focus,
            parameters,
            in_count,
            index: None,
            invoker,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the host focuses the element before calling.
    pub fn do_set_focus(&self) -> bool {
        self.do_set_focus
    }

    /// All parameters, In first, in declaration order.
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    pub fn in_parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters[..self.in_count]
    }

    pub fn out_parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters[self.in_count..]
    }

    pub fn in_count(&self) -> usize {
        self.in_count
    }

    pub fn out_count(&self) -> usize {
        self.parameters.len() - self.in_count
    }

    pub fn in_types(&self) -> Vec<WireType> {
        self.in_parameters().iter().map(|p| p.wire_type).collect()
    }

    pub fn out_types(&self) -> Vec<WireType> {
        self.out_parameters().iter().map(|p| p.wire_type).collect()
    }

    /// Dispatch index, once registered.
    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// Call the method on a provider.
    pub fn invoke(&self, provider: &P, args: Vec<ParamValue>) -> Result<Vec<ParamValue>, DispatchError> {
        (self.invoker)(provider, args)
    }

    pub(crate) fn assign(&mut self, index: u32) {
        self.index = Some(index);
    }
}

impl<P: ?Sized> fmt::Debug for MethodDescriptor<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("do_set_focus", &self.do_set_focus)
            .field("parameters", &self.parameters)
            .field("index", &self.index)
            .finish()
    }
}

/// A pattern event. Events are registered but never indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDescriptor {
    name: String,
    guid: Guid,
    event_id: Option<i32>,
}

impl EventDescriptor {
    pub fn new(name: impl Into<String>, guid: Guid) -> Self {
        Self {
            name: name.into(),
            guid,
            event_id: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn guid(&self) -> Guid {
        self.guid
    }

    /// Host-assigned event id, once registered.
    pub fn event_id(&self) -> Option<i32> {
        self.event_id
    }

    pub(crate) fn assign(&mut self, event_id: i32) {
        self.event_id = Some(event_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::WireKind;

    struct Probe;

    fn no_call(_: &Probe, _: Vec<ParamValue>) -> Result<Vec<ParamValue>, DispatchError> {
        Ok(Vec::new())
    }

    fn param(name: &str, wire: WireType) -> ParameterDescriptor {
        ParameterDescriptor::new(name, wire)
    }

    #[test]
    fn in_parameter_after_out_is_rejected() {
        let params = vec![
            param("outString", WireType::STRING.to_out()),
            param("inInt", WireType::INT),
        ];
        let err = MethodDescriptor::<Probe>::new("name", false, params, no_call).unwrap_err();
        assert_eq!(
            err,
            SchemaError::InAfterOut {
                method: "name".to_string(),
                parameter: "inInt".to_string(),
            }
        );
    }

    #[test]
    fn counts_split_at_first_out() {
        let params = vec![
            param("intIn", WireType::INT),
            param("stringOut", WireType::STRING.to_out()),
            param("retVal", WireType::BOOL.to_out()),
        ];
        let method = MethodDescriptor::<Probe>::new("BoolMethod", true, params, no_call)
            .expect("valid ordering");
        assert_eq!(method.in_count(), 1);
        assert_eq!(method.out_count(), 2);
        assert_eq!(method.in_types(), vec![WireType::INT]);
        assert_eq!(
            method.out_types(),
            vec![WireType::STRING.to_out(), WireType::BOOL.to_out()]
        );
        assert!(method.do_set_focus());
        assert_eq!(method.index(), None);
    }

    #[test]
    fn parameterless_method_is_valid() {
        let method =
            MethodDescriptor::<Probe>::new("Void", false, Vec::new(), no_call).expect("valid");
        assert_eq!(method.in_count(), 0);
        assert_eq!(method.out_count(), 0);
    }

    #[test]
    fn parameter_direction_follows_out_bit() {
        let p = param("x", WireType::new(WireKind::Double, Direction::Out));
        assert_eq!(p.direction(), Direction::Out);
        assert!(p.is_out());
    }

    #[test]
    fn property_assignment() {
        fn getter(_: &Probe) -> Result<ParamValue, DispatchError> {
            Ok(ParamValue::Int(5))
        }
        let guid = Guid::from_u128(1);
        let mut prop = PropertyDescriptor::new("IntValue", guid, WireType::INT, getter);
        assert_eq!(prop.index(), None);
        assert_eq!(prop.property_id(), None);
        prop.assign(0, 30_001);
        assert_eq!(prop.index(), Some(0));
        assert_eq!(prop.property_id(), Some(30_001));
        assert_eq!(prop.get(&Probe), Ok(ParamValue::Int(5)));
    }
}
