// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire types and the native-type mapping.
//!
//! A wire type is a data kind crossed with a direction bit. The kind is
//! derived from a member's native value type with [`map_type`]; the Out bit
//! is set for output parameters with [`WireType::to_out`].

use crate::config::{
    ELEMENT_PROVIDER_IID, TYPE_CODE_BOOL, TYPE_CODE_DOUBLE, TYPE_CODE_ELEMENT, TYPE_CODE_INT,
    TYPE_CODE_OUT, TYPE_CODE_STRING,
};
use crate::error::UnsupportedTypeError;
use crate::value::ElementProvider;
use crate::Guid;
use std::fmt;
use std::sync::Arc;

/// Data kind of a call slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum WireKind {
    Int,
    Bool,
    String,
    Double,
    /// Reference to a remote UI element.
    Element,
}

impl WireKind {
    /// Host type code, without the direction bit.
    pub const fn code(self) -> i32 {
        match self {
            Self::Int => TYPE_CODE_INT,
            Self::Bool => TYPE_CODE_BOOL,
            Self::String => TYPE_CODE_STRING,
            Self::Double => TYPE_CODE_DOUBLE,
            Self::Element => TYPE_CODE_ELEMENT,
        }
    }

    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            TYPE_CODE_INT => Some(Self::Int),
            TYPE_CODE_BOOL => Some(Self::Bool),
            TYPE_CODE_STRING => Some(Self::String),
            TYPE_CODE_DOUBLE => Some(Self::Double),
            TYPE_CODE_ELEMENT => Some(Self::Element),
            _ => None,
        }
    }
}

impl fmt::Display for WireKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Direction of a call slot, seen from the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Direction {
    /// Host to provider.
    In,
    /// Provider to host.
    Out,
}

/// Kind x direction, as exchanged with the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct WireType {
    kind: WireKind,
    direction: Direction,
}

impl WireType {
    pub const INT: Self = Self::new(WireKind::Int, Direction::In);
    pub const BOOL: Self = Self::new(WireKind::Bool, Direction::In);
    pub const STRING: Self = Self::new(WireKind::String, Direction::In);
    pub const DOUBLE: Self = Self::new(WireKind::Double, Direction::In);
    pub const ELEMENT: Self = Self::new(WireKind::Element, Direction::In);

    pub const fn new(kind: WireKind, direction: Direction) -> Self {
        Self { kind, direction }
    }

    pub const fn kind(self) -> WireKind {
        self.kind
    }

    pub const fn direction(self) -> Direction {
        self.direction
    }

    /// Same kind with the Out bit set.
    #[must_use]
    pub const fn to_out(self) -> Self {
        Self::new(self.kind, Direction::Out)
    }

    pub const fn is_out(self) -> bool {
        matches!(self.direction, Direction::Out)
    }

    pub const fn is_in(self) -> bool {
        !self.is_out()
    }

    /// Host type code, direction bit included.
    pub const fn code(self) -> i32 {
        match self.direction {
            Direction::In => self.kind.code(),
            Direction::Out => self.kind.code() | TYPE_CODE_OUT,
        }
    }

    /// Parse a host type code. Unknown kinds and stray bits yield `None`.
    pub const fn from_code(code: i32) -> Option<Self> {
        let direction = if code & TYPE_CODE_OUT != 0 {
            Direction::Out
        } else {
            Direction::In
        };
        match WireKind::from_code(code & !TYPE_CODE_OUT) {
            Some(kind) => Some(Self::new(kind, direction)),
            None => None,
        }
    }
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} {}", self.direction, self.kind)
    }
}

/// Static description of a native value type, as the mapping sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeType {
    Int,
    Bool,
    String,
    Double,
    /// An interface type, identified by its interface id.
    Interface { name: &'static str, iid: Guid },
    /// Any other type. Never mappable.
    Other(&'static str),
}

impl NativeType {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Int => "i32",
            Self::Bool => "bool",
            Self::String => "String",
            Self::Double => "f64",
            Self::Interface { name, .. } | Self::Other(name) => name,
        }
    }
}

/// Map a native type to its (In) wire type.
///
/// Interfaces map to [`WireKind::Element`] when they carry
/// [`ELEMENT_PROVIDER_IID`], whatever their concrete type.
pub fn map_type(native: &NativeType) -> Result<WireType, UnsupportedTypeError> {
    let kind = match native {
        NativeType::Int => WireKind::Int,
        NativeType::Bool => WireKind::Bool,
        NativeType::String => WireKind::String,
        NativeType::Double => WireKind::Double,
        NativeType::Interface { iid, .. } if *iid == ELEMENT_PROVIDER_IID => WireKind::Element,
        NativeType::Interface { name, .. } | NativeType::Other(name) => {
            return Err(UnsupportedTypeError {
                type_name: (*name).to_string(),
            })
        }
    };
    Ok(WireType::new(kind, Direction::In))
}

/// Map the underlying type of an output parameter.
pub fn map_out_type(native: &NativeType) -> Result<WireType, UnsupportedTypeError> {
    map_type(native).map(WireType::to_out)
}

/// Types that describe themselves to the wire-type mapping.
pub trait NativeTyped {
    const NATIVE_TYPE: NativeType;
}

impl NativeTyped for i32 {
    const NATIVE_TYPE: NativeType = NativeType::Int;
}

impl NativeTyped for bool {
    const NATIVE_TYPE: NativeType = NativeType::Bool;
}

impl NativeTyped for String {
    const NATIVE_TYPE: NativeType = NativeType::String;
}

impl NativeTyped for f64 {
    const NATIVE_TYPE: NativeType = NativeType::Double;
}

const ELEMENT_NATIVE_TYPE: NativeType = NativeType::Interface {
    name: "ElementProvider",
    iid: ELEMENT_PROVIDER_IID,
};

impl<T: ElementProvider + ?Sized> NativeTyped for Arc<T> {
    const NATIVE_TYPE: NativeType = ELEMENT_NATIVE_TYPE;
}

impl<T: ElementProvider + ?Sized> NativeTyped for Option<Arc<T>> {
    const NATIVE_TYPE: NativeType = ELEMENT_NATIVE_TYPE;
}

// Known to the mapping, never accepted by it.
macro_rules! unsupported_native {
    ($($ty:ty),* $(,)?) => {
        $(
            impl NativeTyped for $ty {
                const NATIVE_TYPE: NativeType = NativeType::Other(stringify!($ty));
            }
        )*
    };
}

unsupported_native!(i8, i16, i64, i128, u8, u16, u32, u64, u128, isize, usize, f32, char, ());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ElementRef;

    #[derive(Debug)]
    struct Button;
    impl ElementProvider for Button {}

    #[test]
    fn scalar_types_map_to_in_kinds() {
        assert_eq!(map_type(&i32::NATIVE_TYPE), Ok(WireType::INT));
        assert_eq!(map_type(&bool::NATIVE_TYPE), Ok(WireType::BOOL));
        assert_eq!(map_type(&String::NATIVE_TYPE), Ok(WireType::STRING));
        assert_eq!(map_type(&f64::NATIVE_TYPE), Ok(WireType::DOUBLE));
    }

    #[test]
    fn any_element_abstraction_maps_to_element() {
        assert_eq!(map_type(&<ElementRef as NativeTyped>::NATIVE_TYPE), Ok(WireType::ELEMENT));
        assert_eq!(map_type(&<Arc<Button>>::NATIVE_TYPE), Ok(WireType::ELEMENT));
        assert_eq!(
            map_type(&<Option<Arc<Button>>>::NATIVE_TYPE),
            Ok(WireType::ELEMENT)
        );
    }

    #[test]
    fn foreign_interface_is_unsupported() {
        let native = NativeType::Interface {
            name: "IScrollProvider",
            iid: Guid::from_u128(0xB38B8077_1FC3_42A5_8CAE_D40C2215055A),
        };
        let err = map_type(&native).unwrap_err();
        assert_eq!(err.type_name, "IScrollProvider");
    }

    #[test]
    fn unmapped_primitives_are_unsupported() {
        assert!(map_type(&i64::NATIVE_TYPE).is_err());
        assert!(map_type(&f32::NATIVE_TYPE).is_err());
        assert_eq!(map_type(&u32::NATIVE_TYPE).unwrap_err().type_name, "u32");
    }

    #[test]
    fn out_variant_sets_direction_bit() {
        let out = WireType::STRING.to_out();
        assert!(out.is_out());
        assert!(!out.is_in());
        assert_eq!(out.kind(), WireKind::String);
        assert_eq!(out.code(), TYPE_CODE_STRING | TYPE_CODE_OUT);
        assert_eq!(out.to_out(), out);
        assert_eq!(map_out_type(&bool::NATIVE_TYPE), Ok(WireType::BOOL.to_out()));
    }

    #[test]
    fn host_codes_parse_back() {
        for kind in [
            WireKind::Int,
            WireKind::Bool,
            WireKind::String,
            WireKind::Double,
            WireKind::Element,
        ] {
            for wire in [
                WireType::new(kind, Direction::In),
                WireType::new(kind, Direction::Out),
            ] {
                assert_eq!(WireType::from_code(wire.code()), Some(wire));
            }
        }
        assert_eq!(WireType::from_code(0x5), None);
        assert_eq!(WireType::from_code(TYPE_CODE_OUT), None);
    }
}
