// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Registrar adapter.
//!
//! Turns a [`PatternSchema`] into a submission record, hands it to the host
//! registration service, and writes the assigned ids back. Registration is
//! all-or-nothing: the host response is checked against the submission
//! before anything is written, and a schema that fails to register stays
//! unregistered and may be registered again.
//!
//! `Registrar::register` takes the schema by `&mut`, so registration of one
//! schema instance is serialized by the borrow checker.

use crate::config::RegistrationOptions;
use crate::error::{HostError, RegistrationError};
use crate::schema::{PatternSchema, Registration};
use crate::wire::WireType;
use crate::Guid;

/// One property as submitted to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PropertySubmission {
    pub name: String,
    pub guid: Guid,
    pub wire_type: WireType,
}

/// One method parameter as submitted to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParameterSubmission {
    pub name: String,
    pub wire_type: WireType,
}

/// One method as submitted to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MethodSubmission {
    pub name: String,
    pub do_set_focus: bool,
    pub in_count: usize,
    pub out_count: usize,
    /// In parameters first, then Out parameters.
    pub parameters: Vec<ParameterSubmission>,
}

/// One event as submitted to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct EventSubmission {
    pub name: String,
    pub guid: Guid,
}

/// The record handed to [`RegistrationService::register_pattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PatternSubmission {
    pub name: String,
    pub pattern_guid: Guid,
    pub provider_iid: Guid,
    pub client_iid: Guid,
    pub properties: Vec<PropertySubmission>,
    pub methods: Vec<MethodSubmission>,
    pub events: Vec<EventSubmission>,
}

impl PatternSubmission {
    pub fn from_schema<P: ?Sized>(schema: &PatternSchema<P>) -> Self {
        let properties = schema
            .properties()
            .iter()
            .map(|p| PropertySubmission {
                name: p.name().to_string(),
                guid: p.guid(),
                wire_type: p.wire_type(),
            })
            .collect();

        let methods = schema
            .methods()
            .iter()
            .map(|m| MethodSubmission {
                name: m.name().to_string(),
                do_set_focus: m.do_set_focus(),
                in_count: m.in_count(),
                out_count: m.out_count(),
                parameters: m
                    .parameters()
                    .iter()
                    .map(|param| ParameterSubmission {
                        name: param.name().to_string(),
                        wire_type: param.wire_type(),
                    })
                    .collect(),
            })
            .collect();

        let events = schema
            .events()
            .iter()
            .map(|e| EventSubmission {
                name: e.name().to_string(),
                guid: e.guid(),
            })
            .collect();

        Self {
            name: schema.name().to_string(),
            pattern_guid: schema.pattern_guid(),
            provider_iid: schema.provider_iid(),
            client_iid: schema.client_iid(),
            properties,
            methods,
            events,
        }
    }
}

/// Ids returned by the host, positionally aligned with the submission.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignedIds {
    pub pattern_id: i32,
    pub availability_property_id: i32,
    pub property_ids: Vec<i32>,
    pub event_ids: Vec<i32>,
}

impl AssignedIds {
    /// Read the ids back from a registered schema.
    pub fn from_schema<P: ?Sized>(schema: &PatternSchema<P>) -> Option<Self> {
        let registration = schema.registration()?;
        Some(Self {
            pattern_id: registration.pattern_id,
            availability_property_id: registration.availability_property_id,
            property_ids: schema
                .properties()
                .iter()
                .map(|p| p.property_id())
                .collect::<Option<_>>()?,
            event_ids: schema
                .events()
                .iter()
                .map(|e| e.event_id())
                .collect::<Option<_>>()?,
        })
    }
}

/// A pattern the host has just accepted.
#[derive(Debug, Clone, Copy)]
pub struct RegisteredPattern<'a> {
    pub submission: &'a PatternSubmission,
    pub ids: &'a AssignedIds,
}

/// The host automation framework's pattern registration entry point.
pub trait RegistrationService {
    fn register_pattern(&self, submission: &PatternSubmission) -> Result<AssignedIds, HostError>;
}

/// Secondary registration: exposes an accepted pattern to the peer objects
/// of a higher-level UI framework.
pub trait AugmentationService {
    fn augment(&self, pattern: &RegisteredPattern<'_>) -> Result<(), HostError>;
}

/// Registers schemas with a host.
#[derive(Clone, Copy)]
pub struct Registrar<'a> {
    service: &'a dyn RegistrationService,
    augmentation: Option<&'a dyn AugmentationService>,
}

impl<'a> Registrar<'a> {
    pub fn new(service: &'a dyn RegistrationService) -> Self {
        Self {
            service,
            augmentation: None,
        }
    }

    #[must_use]
    pub fn with_augmentation(mut self, augmentation: &'a dyn AugmentationService) -> Self {
        self.augmentation = Some(augmentation);
        self
    }

    /// Register `schema`, optionally augmenting secondary consumers.
    ///
    /// A schema that is already registered is left untouched and its
    /// existing ids are returned; the host is not called again.
    ///
    /// If the primary registration succeeds but augmentation fails, the
    /// schema stays registered and the augmentation error is returned.
    pub fn register<P: ?Sized>(
        &self,
        schema: &mut PatternSchema<P>,
        augment: bool,
    ) -> Result<AssignedIds, RegistrationError> {
        if let Some(ids) = AssignedIds::from_schema(schema) {
            log::debug!("[registrar] '{}' already registered", schema.name());
            return Ok(ids);
        }

        let submission = PatternSubmission::from_schema(schema);
        let ids = self.service.register_pattern(&submission)?;
        check_alignment("property", submission.properties.len(), ids.property_ids.len())?;
        check_alignment("event", submission.events.len(), ids.event_ids.len())?;

        schema.commit_registration(
            Registration {
                pattern_id: ids.pattern_id,
                availability_property_id: ids.availability_property_id,
            },
            &ids.property_ids,
            &ids.event_ids,
        );
        log::debug!(
            "[registrar] registered '{}' as pattern {} ({} = {})",
            submission.name,
            ids.pattern_id,
            schema.availability_property_name(),
            ids.availability_property_id
        );

        if augment {
            let augmentation = self
                .augmentation
                .ok_or(RegistrationError::NoAugmentationService)?;
            let pattern = RegisteredPattern {
                submission: &submission,
                ids: &ids,
            };
            if let Err(e) = augmentation.augment(&pattern) {
                log::warn!(
                    "[registrar] augmentation of '{}' failed: {}",
                    submission.name,
                    e
                );
                return Err(RegistrationError::Augmentation(e));
            }
        }

        Ok(ids)
    }

    pub fn register_with_options<P: ?Sized>(
        &self,
        schema: &mut PatternSchema<P>,
        options: RegistrationOptions,
    ) -> Result<AssignedIds, RegistrationError> {
        self.register(schema, options.augment_secondary_consumers)
    }
}

fn check_alignment(what: &'static str, expected: usize, actual: usize) -> Result<(), RegistrationError> {
    if expected == actual {
        Ok(())
    } else {
        Err(RegistrationError::IncompleteAssignment {
            what,
            expected,
            actual,
        })
    }
}
