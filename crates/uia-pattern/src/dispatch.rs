// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Index-based dispatch of host calls onto a provider.
//!
//! The host addresses pattern members by index: properties first, then
//! methods, as assigned at registration. A call delivers a buffer of
//! parameter slots. For a property the buffer holds the single Out slot
//! receiving the value. For a method it holds every In slot followed by
//! every Out slot, in declaration order.
//!
//! Every transport-level check runs before the provider is called, and the
//! values a method returns are checked as a whole before any slot is
//! written. A provider error therefore leaves all Out slots untouched.

use crate::descriptor::{MethodDescriptor, PropertyDescriptor};
use crate::error::DispatchError;
use crate::schema::PatternSchema;
use crate::value::{ParamBox, ParamValue, ParameterSlot};
use crate::wire::WireType;

enum Member<'s, P: ?Sized> {
    Property(&'s PropertyDescriptor<P>),
    Method(&'s MethodDescriptor<P>),
}

impl<P: ?Sized> Clone for Member<'_, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P: ?Sized> Copy for Member<'_, P> {}

/// Dispatcher over a registered schema.
///
/// Holds no mutable state; one dispatcher may serve concurrent calls on
/// distinct providers.
pub struct Dispatcher<'s, P: ?Sized> {
    schema: &'s PatternSchema<P>,
    members: Vec<Member<'s, P>>,
}

impl<'s, P: ?Sized> Dispatcher<'s, P> {
    pub fn new(schema: &'s PatternSchema<P>) -> Result<Self, DispatchError> {
        if !schema.is_registered() {
            return Err(DispatchError::NotRegistered(schema.name().to_string()));
        }

        let members = schema
            .properties()
            .iter()
            .map(Member::Property)
            .chain(schema.methods().iter().map(Member::Method))
            .collect();
        Ok(Self { schema, members })
    }

    pub fn schema(&self) -> &'s PatternSchema<P> {
        self.schema
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Name of the member at `index`, if any.
    pub fn member_name(&self, index: u32) -> Option<&'s str> {
        match *self.members.get(index as usize)? {
            Member::Property(p) => Some(p.name()),
            Member::Method(m) => Some(m.name()),
        }
    }

    /// Route one host call to `provider`.
    ///
    /// `count` is the number of slots the host claims to pass; only
    /// `params[..count]` is touched.
    pub fn dispatch(
        &self,
        provider: &P,
        index: u32,
        params: &mut [ParameterSlot],
        count: usize,
    ) -> Result<(), DispatchError> {
        let member = *self
            .members
            .get(index as usize)
            .ok_or(DispatchError::UnknownMember {
                index,
                count: self.members.len(),
            })?;

        match member {
            Member::Property(property) => {
                log::trace!("[dispatch] get {} (index {})", property.name(), index);
                let slots = frame(property.name(), params, count, 1)?;
                get_property(provider, property, slots)
            }
            Member::Method(method) => {
                log::trace!("[dispatch] call {} (index {})", method.name(), index);
                let slots = frame(method.name(), params, count, method.parameters().len())?;
                call_method(provider, method, slots)
            }
        }
    }
}

/// Check the claimed slot count and cut the buffer down to it.
fn frame<'b>(
    member: &str,
    params: &'b mut [ParameterSlot],
    count: usize,
    expected: usize,
) -> Result<&'b mut [ParameterSlot], DispatchError> {
    if count != expected {
        return Err(DispatchError::Arity {
            member: member.to_string(),
            expected,
            actual: count,
        });
    }
    if params.len() < count {
        return Err(DispatchError::Arity {
            member: member.to_string(),
            expected: count,
            actual: params.len(),
        });
    }
    Ok(&mut params[..count])
}

fn check_slot(slot: &ParameterSlot, position: usize, expected: WireType) -> Result<(), DispatchError> {
    if slot.wire_type() == expected {
        Ok(())
    } else {
        Err(DispatchError::SlotType {
            position,
            expected,
            actual: slot.wire_type(),
        })
    }
}

fn check_return(
    member: &str,
    position: usize,
    expected: WireType,
    value: &ParamValue,
) -> Result<(), DispatchError> {
    if value.kind() == expected.kind() {
        Ok(())
    } else {
        Err(DispatchError::ReturnType {
            member: member.to_string(),
            position,
            expected: expected.kind(),
            actual: value.kind(),
        })
    }
}

fn get_property<P: ?Sized>(
    provider: &P,
    property: &PropertyDescriptor<P>,
    slots: &mut [ParameterSlot],
) -> Result<(), DispatchError> {
    let expected = property.wire_type().to_out();
    check_slot(&slots[0], 0, expected)?;

    let value = property.get(provider)?;
    check_return(property.name(), 0, expected, &value)?;
    ParamBox::new(&mut slots[0], 0).encode(value)
}

fn call_method<P: ?Sized>(
    provider: &P,
    method: &MethodDescriptor<P>,
    slots: &mut [ParameterSlot],
) -> Result<(), DispatchError> {
    for (position, (slot, param)) in slots.iter().zip(method.parameters()).enumerate() {
        check_slot(slot, position, param.wire_type())?;
    }

    let in_count = method.in_count();
    let (inputs, outputs) = slots.split_at_mut(in_count);

    let args = inputs
        .iter_mut()
        .enumerate()
        .map(|(position, slot)| ParamBox::new(slot, position).decode())
        .collect::<Result<Vec<_>, _>>()?;

    let values = method.invoke(provider, args)?;
    if values.len() != outputs.len() {
        return Err(DispatchError::ReturnShape {
            member: method.name().to_string(),
            expected: outputs.len(),
            actual: values.len(),
        });
    }
    for (offset, (value, param)) in values.iter().zip(method.out_parameters()).enumerate() {
        check_return(method.name(), in_count + offset, param.wire_type(), value)?;
    }

    for (offset, (slot, value)) in outputs.iter_mut().zip(values).enumerate() {
        ParamBox::new(slot, in_count + offset).encode(value)?;
    }
    Ok(())
}
