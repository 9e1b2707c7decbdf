// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declarative interface contracts.
//!
//! A [`ContractTable`] lists a provider interface's identity and its pattern
//! members in declaration order, each bound to a capability on the provider
//! type `P` (usually `dyn SomeProvider`). Tables are generated by
//! `#[pattern]` or written by hand with the fluent API:
//!
//! ```rust
//! use uia_pattern::contract::{ContractTable, MethodContract};
//! use uia_pattern::{next_arg, DispatchError, Guid, ParamValue, WireValue};
//!
//! trait Counter {
//!     fn count(&self) -> i32;
//!     fn add(&self, delta: i32) -> i32;
//! }
//!
//! fn get_count(p: &dyn Counter) -> Result<ParamValue, DispatchError> {
//!     Ok(p.count().into_param())
//! }
//!
//! fn call_add(p: &dyn Counter, args: Vec<ParamValue>) -> Result<Vec<ParamValue>, DispatchError> {
//!     let mut args = args.into_iter();
//!     let delta: i32 = next_arg(&mut args, 0)?;
//!     Ok(vec![p.add(delta).into_param()])
//! }
//!
//! let table = ContractTable::<dyn Counter>::new("CounterPattern")
//!     .pattern_guid(Guid::from_u128(0x1))
//!     .provider_iid(Guid::from_u128(0x2))
//!     .property_of::<i32>("Count", Guid::from_u128(0x3), get_count)
//!     .method(
//!         MethodContract::<dyn Counter>::new("Add", call_add)
//!             .input_of::<i32>("delta")
//!             .output_of::<i32>("retVal"),
//!     )
//!     .event("Overflow", Guid::from_u128(0x4));
//! assert_eq!(table.members.len(), 2);
//! ```

use crate::descriptor::{Getter, Invoker};
use crate::wire::{NativeType, NativeTyped};
use crate::Guid;

/// A provider interface that can describe itself as a pattern.
///
/// Implemented for `dyn ProviderTrait` by `#[pattern]`.
pub trait ProviderContract {
    fn contract() -> ContractTable<Self>;
}

/// The client-side interface of a pattern.
///
/// Implemented by `#[pattern_client]`.
pub trait ClientContract {
    const INTERFACE_ID: Option<Guid>;
}

/// One formal parameter as declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractParam {
    pub name: &'static str,
    /// Underlying value type (for Out parameters, the pointee).
    pub native_type: NativeType,
    pub is_out: bool,
}

impl ContractParam {
    pub const fn input(name: &'static str, native_type: NativeType) -> Self {
        Self {
            name,
            native_type,
            is_out: false,
        }
    }

    pub const fn output(name: &'static str, native_type: NativeType) -> Self {
        Self {
            name,
            native_type,
            is_out: true,
        }
    }
}

/// A member annotated as a pattern property.
pub struct PropertyContract<P: ?Sized> {
    pub name: &'static str,
    pub guid: Guid,
    pub value_type: NativeType,
    pub getter: Getter<P>,
}

/// A member annotated as a pattern method.
pub struct MethodContract<P: ?Sized> {
    pub name: &'static str,
    pub do_set_focus: bool,
    pub params: Vec<ContractParam>,
    pub invoker: Invoker<P>,
}

impl<P: ?Sized> MethodContract<P> {
    pub fn new(name: &'static str, invoker: Invoker<P>) -> Self {
        Self {
            name,
            do_set_focus: false,
            params: Vec::new(),
            invoker,
        }
    }

    /// Ask the host to focus the element before the call.
    #[must_use]
    pub fn focus(mut self, do_set_focus: bool) -> Self {
        self.do_set_focus = do_set_focus;
        self
    }

    #[must_use]
    pub fn input(mut self, name: &'static str, native_type: NativeType) -> Self {
        self.params.push(ContractParam::input(name, native_type));
        self
    }

    #[must_use]
    pub fn output(mut self, name: &'static str, native_type: NativeType) -> Self {
        self.params.push(ContractParam::output(name, native_type));
        self
    }

    #[must_use]
    pub fn input_of<T: NativeTyped>(self, name: &'static str) -> Self {
        self.input(name, T::NATIVE_TYPE)
    }

    #[must_use]
    pub fn output_of<T: NativeTyped>(self, name: &'static str) -> Self {
        self.output(name, T::NATIVE_TYPE)
    }
}

/// A pattern member in declaration order.
pub enum ContractMember<P: ?Sized> {
    Property(PropertyContract<P>),
    Method(MethodContract<P>),
}

impl<P: ?Sized> ContractMember<P> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Property(p) => p.name,
            Self::Method(m) => m.name,
        }
    }
}

/// A declared pattern event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractEvent {
    pub name: &'static str,
    pub guid: Guid,
}

/// Provider-interface contract: identity plus ordered members.
///
/// Identity fields are optional so that an incomplete contract can be
/// represented; the schema builder rejects it.
pub struct ContractTable<P: ?Sized> {
    /// Programmatic pattern name.
    pub name: &'static str,
    pub pattern_guid: Option<Guid>,
    pub provider_iid: Option<Guid>,
    pub members: Vec<ContractMember<P>>,
    pub events: Vec<ContractEvent>,
}

impl<P: ?Sized> ContractTable<P> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            pattern_guid: None,
            provider_iid: None,
            members: Vec::new(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn pattern_guid(mut self, guid: Guid) -> Self {
        self.pattern_guid = Some(guid);
        self
    }

    #[must_use]
    pub fn provider_iid(mut self, iid: Guid) -> Self {
        self.provider_iid = Some(iid);
        self
    }

    #[must_use]
    pub fn property(
        mut self,
        name: &'static str,
        guid: Guid,
        value_type: NativeType,
        getter: Getter<P>,
    ) -> Self {
        self.members.push(ContractMember::Property(PropertyContract {
            name,
            guid,
            value_type,
            getter,
        }));
        self
    }

    #[must_use]
    pub fn property_of<T: NativeTyped>(self, name: &'static str, guid: Guid, getter: Getter<P>) -> Self {
        self.property(name, guid, T::NATIVE_TYPE, getter)
    }

    #[must_use]
    pub fn method(mut self, method: MethodContract<P>) -> Self {
        self.members.push(ContractMember::Method(method));
        self
    }

    #[must_use]
    pub fn event(mut self, name: &'static str, guid: Guid) -> Self {
        self.events.push(ContractEvent { name, guid });
        self
    }
}
