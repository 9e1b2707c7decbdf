// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pattern schema: identity, ordered descriptors and assigned ids.
//!
//! A schema is built unregistered from a provider contract and a client
//! contract (see [`build_schema`]). Registration assigns indices and host ids
//! exactly once; afterwards the schema is read-only.
//!
//! # Member indices
//!
//! Properties take indices `0..N` and methods `N..N+M`, both in declaration
//! order. Events are not indexed.

mod build;

pub use build::build_schema;

use crate::config::availability_property_name;
use crate::descriptor::{EventDescriptor, MethodDescriptor, PropertyDescriptor};
use crate::Guid;
use std::fmt;

/// Ids assigned by the host for the pattern itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registration {
    pub pattern_id: i32,
    /// Id of the generated `Is<Name>Available` property.
    pub availability_property_id: i32,
}

/// A custom pattern as seen by registration and dispatch.
pub struct PatternSchema<P: ?Sized> {
    name: String,
    pattern_guid: Guid,
    provider_iid: Guid,
    client_iid: Guid,
    properties: Vec<PropertyDescriptor<P>>,
    methods: Vec<MethodDescriptor<P>>,
    events: Vec<EventDescriptor>,
    registration: Option<Registration>,
}

impl<P: ?Sized> PatternSchema<P> {
    pub(crate) fn new(
        name: String,
        pattern_guid: Guid,
        provider_iid: Guid,
        client_iid: Guid,
        properties: Vec<PropertyDescriptor<P>>,
        methods: Vec<MethodDescriptor<P>>,
        events: Vec<EventDescriptor>,
    ) -> Self {
        Self {
            name,
            pattern_guid,
            provider_iid,
            client_iid,
            properties,
            methods,
            events,
            registration: None,
        }
    }

    /// Programmatic pattern name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pattern_guid(&self) -> Guid {
        self.pattern_guid
    }

    pub fn provider_iid(&self) -> Guid {
        self.provider_iid
    }

    pub fn client_iid(&self) -> Guid {
        self.client_iid
    }

    pub fn properties(&self) -> &[PropertyDescriptor<P>] {
        &self.properties
    }

    pub fn methods(&self) -> &[MethodDescriptor<P>] {
        &self.methods
    }

    pub fn events(&self) -> &[EventDescriptor] {
        &self.events
    }

    /// Properties plus methods.
    pub fn member_count(&self) -> usize {
        self.properties.len() + self.methods.len()
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor<P>> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor<P>> {
        self.methods.iter().find(|m| m.name() == name)
    }

    pub fn event(&self, name: &str) -> Option<&EventDescriptor> {
        self.events.iter().find(|e| e.name() == name)
    }

    pub fn is_registered(&self) -> bool {
        self.registration.is_some()
    }

    pub fn registration(&self) -> Option<Registration> {
        self.registration
    }

    pub fn pattern_id(&self) -> Option<i32> {
        self.registration.map(|r| r.pattern_id)
    }

    pub fn availability_property_id(&self) -> Option<i32> {
        self.registration.map(|r| r.availability_property_id)
    }

    /// Name of the availability property the host creates for this pattern.
    pub fn availability_property_name(&self) -> String {
        availability_property_name(&self.name)
    }

    /// Write back a successful host registration.
    ///
    /// Callers validate the id arrays first: `property_ids` and `event_ids`
    /// line up with the descriptor lists.
    pub(crate) fn commit_registration(
        &mut self,
        registration: Registration,
        property_ids: &[i32],
        event_ids: &[i32],
    ) {
        debug_assert_eq!(property_ids.len(), self.properties.len());
        debug_assert_eq!(event_ids.len(), self.events.len());

        let mut index = 0u32;
        for (property, &id) in self.properties.iter_mut().zip(property_ids) {
            property.assign(index, id);
            index += 1;
        }
        for method in &mut self.methods {
            method.assign(index);
            index += 1;
        }
        for (event, &id) in self.events.iter_mut().zip(event_ids) {
            event.assign(id);
        }
        self.registration = Some(registration);
    }
}

impl<P: ?Sized> fmt::Debug for PatternSchema<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternSchema")
            .field("name", &self.name)
            .field("pattern_guid", &self.pattern_guid)
            .field("provider_iid", &self.provider_iid)
            .field("client_iid", &self.client_iid)
            .field("properties", &self.properties)
            .field("methods", &self.methods)
            .field("events", &self.events)
            .field("registration", &self.registration)
            .finish()
    }
}
