// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pattern Configuration - Single Source of Truth
//!
//! Host type codes, fixed interface identifiers and naming rules live here.
//! **Never hardcode them elsewhere.**
//!
//! - **Level 1 (Static)**: constants dictated by the host automation framework
//! - **Level 2 (Runtime)**: [`RegistrationOptions`] for registration policy

use crate::Guid;

// =======================================================================
// Host wire type codes (UIAutomationType)
// =======================================================================

/// Host code for a 32-bit signed integer slot.
pub const TYPE_CODE_INT: i32 = 0x1;

/// Host code for a boolean slot.
pub const TYPE_CODE_BOOL: i32 = 0x2;

/// Host code for a string slot.
pub const TYPE_CODE_STRING: i32 = 0x3;

/// Host code for a double-precision float slot.
pub const TYPE_CODE_DOUBLE: i32 = 0x4;

/// Host code for a remote element reference slot.
pub const TYPE_CODE_ELEMENT: i32 = 0x7;

/// Direction bit marking an output slot.
///
/// `TYPE_CODE_OUT | TYPE_CODE_BOOL` is an output boolean.
pub const TYPE_CODE_OUT: i32 = 0x2_0000;

// =======================================================================
// Fixed interface identifiers
// =======================================================================

/// Capability identifier of a provider-side UI element
/// (`IRawElementProviderSimple`).
///
/// Any type whose native identity carries this iid maps to the element wire
/// type, whatever its concrete Rust type.
pub const ELEMENT_PROVIDER_IID: Guid = Guid::from_u128(0xD6DD68D1_86FD_4332_8666_9ABEDEA2D24C);

// =======================================================================
// Host status codes (HRESULT)
// =======================================================================

/// Generic failure.
pub const E_FAIL: i32 = 0x8000_4005_u32 as i32;

/// An argument was rejected.
pub const E_INVALIDARG: i32 = 0x8007_0057_u32 as i32;

/// The element behind a provider no longer exists.
pub const UIA_E_ELEMENTNOTAVAILABLE: i32 = 0x8004_0201_u32 as i32;

/// The element is not in a state that allows the operation.
pub const UIA_E_INVALIDOPERATION: i32 = 0x8013_1509_u32 as i32;

// =======================================================================
// Naming
// =======================================================================

/// Parameter name given to a method's lowered return value.
///
/// The return value always becomes the last Out parameter.
pub const RETURN_PARAM_NAME: &str = "retVal";

/// Prefix of the availability property the host creates per pattern.
pub const AVAILABILITY_PROPERTY_PREFIX: &str = "Is";

/// Suffix of the availability property the host creates per pattern.
pub const AVAILABILITY_PROPERTY_SUFFIX: &str = "Available";

/// Name of the availability property for a pattern (`IsTestPatternAvailable`).
pub fn availability_property_name(pattern_name: &str) -> String {
    format!("{AVAILABILITY_PROPERTY_PREFIX}{pattern_name}{AVAILABILITY_PROPERTY_SUFFIX}")
}

// =======================================================================
// Runtime options
// =======================================================================

/// Registration policy carried by callers that register several patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationOptions {
    /// Also expose the pattern to secondary consumers (peer objects of a
    /// higher-level UI framework) after the primary registration.
    pub augment_secondary_consumers: bool,
}

impl RegistrationOptions {
    /// Primary registration only.
    pub const fn new() -> Self {
        Self {
            augment_secondary_consumers: false,
        }
    }

    /// Enable or disable secondary-consumer augmentation.
    #[must_use]
    pub const fn augment(mut self, enabled: bool) -> Self {
        self.augment_secondary_consumers = enabled;
        self
    }
}
