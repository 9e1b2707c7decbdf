// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # uia-pattern - custom UI Automation patterns
//!
//! Derives the schema of a custom UI Automation control pattern from a
//! provider-interface contract, registers it with the host automation
//! framework, and routes the host's index-based calls back onto provider
//! objects.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use uia_pattern::{pattern, pattern_client, build_schema, Dispatcher, ProviderError, Registrar};
//!
//! #[pattern(
//!     name = "GaugePattern",
//!     guid = "6a0a4f1e-2b7c-4c11-9d5e-0f3a7c1b2d90",
//!     provider_iid = "2f1d7a44-5c3e-4b8a-a9e1-7d6c5b4a3f21",
//!     event(name = "LevelChanged", guid = "8c2b6e1a-4d3f-4a5b-9c8d-7e6f5a4b3c2d"),
//! )]
//! pub trait GaugeProvider: Send + Sync {
//!     #[property(guid = "b3e5d7f9-1a2c-4e6b-8d0f-2a4c6e8b0d1f")]
//!     fn level(&self) -> Result<i32, ProviderError>;
//!
//!     #[method(focus)]
//!     fn set_level(&self, level: i32) -> Result<(), ProviderError>;
//! }
//!
//! #[pattern_client(iid = "c4f6e8a0-2b3d-4f5a-9e1c-3b5d7f9a1c2e")]
//! pub trait GaugeClient {}
//!
//! let mut schema = build_schema::<dyn GaugeProvider, dyn GaugeClient>()?;
//! Registrar::new(&host).register(&mut schema, false)?;
//!
//! let dispatcher = Dispatcher::new(&schema)?;
//! dispatcher.dispatch(provider, index, &mut slots, slots.len())?;
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`WireType`] | Data kind plus direction of one call slot |
//! | [`ParamBox`] | Decodes/encodes one [`ParameterSlot`] |
//! | [`ContractTable`] | Declared identity and members of a provider interface |
//! | [`PatternSchema`] | Ordered descriptors plus host-assigned ids |
//! | [`Registrar`] | Submits a schema to a [`RegistrationService`] |
//! | [`Dispatcher`] | Routes `(index, slots)` calls onto a provider |
//! | [`SchemaCell`] | Process-wide, registered-once schema |
//!
//! ## Modules Overview
//!
//! - [`wire`] - wire types and native type mapping
//! - [`value`] - parameter values, slots and the value box
//! - [`descriptor`] - property, method, parameter and event descriptors
//! - [`contract`] - contract tables, hand-written or generated
//! - [`schema`] - schema builder and the pattern schema
//! - [`registrar`] - host registration
//! - [`dispatch`] - host call dispatch
//! - [`config`] - host constants and registration options

pub mod cell;
pub mod config;
pub mod contract;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod registrar;
pub mod schema;
pub mod value;
pub mod wire;

pub use uuid::Uuid as Guid;

pub use cell::SchemaCell;
pub use config::RegistrationOptions;
pub use contract::{
    ClientContract, ContractEvent, ContractMember, ContractParam, ContractTable, MethodContract,
    PropertyContract, ProviderContract,
};
pub use descriptor::{
    EventDescriptor, Getter, Invoker, MethodDescriptor, ParameterDescriptor, PropertyDescriptor,
};
pub use dispatch::Dispatcher;
pub use error::{
    DispatchError, HostError, IdentityField, InitError, ProviderError, RegistrationError,
    SchemaError, UnsupportedTypeError,
};
pub use registrar::{
    AssignedIds, AugmentationService, EventSubmission, MethodSubmission, ParameterSubmission,
    PatternSubmission, PropertySubmission, RegisteredPattern, Registrar, RegistrationService,
};
pub use schema::{build_schema, PatternSchema, Registration};
pub use value::{next_arg, ElementProvider, ElementRef, ParamBox, ParamValue, ParameterSlot, WireValue};
pub use wire::{map_out_type, map_type, Direction, NativeType, NativeTyped, WireKind, WireType};

pub use uia_pattern_codegen::{pattern, pattern_client};
