// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Process-wide pattern schema.
//!
//! A pattern is registered with the host once per process. [`SchemaCell`]
//! holds that one registered schema: it is built and registered on the first
//! explicit [`SchemaCell::get_or_register`] call and read without locking
//! afterwards.
//!
//! ```rust,ignore
//! static GAUGE: SchemaCell<dyn GaugeProvider> = SchemaCell::new();
//!
//! let schema = GAUGE.get_or_register(
//!     build_schema::<dyn GaugeProvider, dyn GaugeClient>,
//!     &Registrar::new(&host),
//!     RegistrationOptions::new(),
//! )?;
//! ```

use crate::config::RegistrationOptions;
use crate::error::{InitError, SchemaError};
use crate::registrar::Registrar;
use crate::schema::PatternSchema;
use parking_lot::{const_mutex, Mutex};
use std::sync::OnceLock;

/// Lazily built, explicitly registered schema.
pub struct SchemaCell<P: ?Sized> {
    init: Mutex<()>,
    schema: OnceLock<PatternSchema<P>>,
}

impl<P: ?Sized> SchemaCell<P> {
    pub const fn new() -> Self {
        Self {
            init: const_mutex(()),
            schema: OnceLock::new(),
        }
    }

    /// The registered schema, if initialization has happened.
    pub fn get(&self) -> Option<&PatternSchema<P>> {
        self.schema.get()
    }

    /// Return the registered schema, building and registering it first if
    /// needed.
    ///
    /// Initialization is serialized: concurrent callers wait, and the host
    /// sees a single registration. If building or primary registration
    /// fails, the cell stays empty and a later call tries again. If only
    /// augmentation fails, the registered schema is kept and the error is
    /// still returned.
    pub fn get_or_register<F>(
        &self,
        build: F,
        registrar: &Registrar<'_>,
        options: RegistrationOptions,
    ) -> Result<&PatternSchema<P>, InitError>
    where
        F: FnOnce() -> Result<PatternSchema<P>, SchemaError>,
    {
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }

        let _guard = self.init.lock();
        if let Some(schema) = self.schema.get() {
            return Ok(schema);
        }

        let mut schema = build()?;
        match registrar.register_with_options(&mut schema, options) {
            Ok(_) => Ok(self.schema.get_or_init(|| schema)),
            Err(e) if schema.is_registered() => {
                self.schema.get_or_init(|| schema);
                Err(e.into())
            }
            Err(e) => Err(e.into()),
        }
    }
}

impl<P: ?Sized> Default for SchemaCell<P> {
    fn default() -> Self {
        Self::new()
    }
}
