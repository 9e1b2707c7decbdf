// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Schema derivation from contract tables.

use super::PatternSchema;
use crate::contract::{
    ClientContract, ContractMember, ContractParam, ContractTable, MethodContract,
    PropertyContract, ProviderContract,
};
use crate::descriptor::{EventDescriptor, MethodDescriptor, ParameterDescriptor, PropertyDescriptor};
use crate::error::{IdentityField, SchemaError};
use crate::wire::{map_out_type, map_type};
use crate::Guid;

/// Build the unregistered schema for a provider/client contract pair.
///
/// Pure: no host interaction.
pub fn build_schema<P, C>() -> Result<PatternSchema<P>, SchemaError>
where
    P: ProviderContract + ?Sized,
    C: ClientContract + ?Sized,
{
    PatternSchema::from_tables(P::contract(), C::INTERFACE_ID)
}

impl<P: ?Sized> PatternSchema<P> {
    /// Build a schema from an explicit contract table and client iid.
    pub fn from_tables(
        table: ContractTable<P>,
        client_iid: Option<Guid>,
    ) -> Result<Self, SchemaError> {
        let ContractTable {
            name,
            pattern_guid,
            provider_iid,
            members,
            events,
        } = table;

        let pattern_guid = require(name, pattern_guid, IdentityField::PatternGuid)?;
        let provider_iid = require(name, provider_iid, IdentityField::ProviderIid)?;
        let client_iid = require(name, client_iid, IdentityField::ClientIid)?;

        let mut properties = Vec::new();
        let mut methods = Vec::new();
        for member in members {
            match member {
                ContractMember::Property(property) => properties.push(property_descriptor(property)?),
                ContractMember::Method(method) => methods.push(method_descriptor(method)?),
            }
        }

        let events: Vec<EventDescriptor> = events
            .into_iter()
            .map(|event| EventDescriptor::new(event.name, event.guid))
            .collect();

        log::debug!(
            "[schema] built '{}' ({}): {} properties, {} methods, {} events",
            name,
            pattern_guid,
            properties.len(),
            methods.len(),
            events.len()
        );

        Ok(Self::new(
            name.to_string(),
            pattern_guid,
            provider_iid,
            client_iid,
            properties,
            methods,
            events,
        ))
    }
}

fn require(pattern: &str, guid: Option<Guid>, field: IdentityField) -> Result<Guid, SchemaError> {
    guid.ok_or_else(|| SchemaError::MissingIdentity {
        pattern: pattern.to_string(),
        field,
    })
}

fn property_descriptor<P: ?Sized>(
    property: PropertyContract<P>,
) -> Result<PropertyDescriptor<P>, SchemaError> {
    let wire_type = map_type(&property.value_type).map_err(|source| SchemaError::UnsupportedType {
        member: property.name.to_string(),
        source,
    })?;
    Ok(PropertyDescriptor::new(
        property.name,
        property.guid,
        wire_type,
        property.getter,
    ))
}

fn method_descriptor<P: ?Sized>(method: MethodContract<P>) -> Result<MethodDescriptor<P>, SchemaError> {
    let parameters = method
        .params
        .iter()
        .map(|param| parameter_descriptor(method.name, param))
        .collect::<Result<Vec<_>, _>>()?;
    MethodDescriptor::new(method.name, method.do_set_focus, parameters, method.invoker)
}

fn parameter_descriptor(method: &str, param: &ContractParam) -> Result<ParameterDescriptor, SchemaError> {
    let mapped = if param.is_out {
        map_out_type(&param.native_type)
    } else {
        map_type(&param.native_type)
    };
    let wire_type = mapped.map_err(|source| SchemaError::UnsupportedType {
        member: format!("{}.{}", method, param.name),
        source,
    })?;
    Ok(ParameterDescriptor::new(param.name, wire_type))
}
