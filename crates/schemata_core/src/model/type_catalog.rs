//! Type catalog: class kinds and the built-in primitives.
//!
//! # Responsibility
//! - Classify a class as user-defined or primitive.
//! - Resolve a property's type class into something an editor can render.
//!
//! # Invariants
//! - `String` is currently the only primitive kind.
//! - Anything not recognized resolves to `Unsupported`, never to a default
//!   editor.

use crate::model::data_class::{ClassId, ClassKind, DataClass, STRING_PRIMITIVE_CLASS_NAME};

/// Built-in primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
}

impl PrimitiveKind {
    /// Name of the seeded class representing this primitive.
    pub fn class_name(self) -> &'static str {
        match self {
            Self::String => STRING_PRIMITIVE_CLASS_NAME,
        }
    }

    fn from_class_name(name: &str) -> Option<Self> {
        match name {
            STRING_PRIMITIVE_CLASS_NAME => Some(Self::String),
            _ => None,
        }
    }
}

/// Why a property type cannot be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedReason {
    /// `type_class_id` names no known class.
    UnresolvedTypeClass(ClassId),
    /// The type class carries a kind tag this build does not know.
    UnknownKind(ClassId),
    /// The type class is primitive but not a known primitive.
    UnknownPrimitive { class_id: ClassId, name: String },
}

/// Outcome of resolving a property's type class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeResolution {
    Primitive(PrimitiveKind),
    UserDefined(ClassId),
    Unsupported(UnsupportedReason),
}

pub fn is_user_defined(class: &DataClass) -> bool {
    class.kind == ClassKind::UserDefined
}

pub fn is_primitive(class: &DataClass) -> bool {
    class.kind == ClassKind::PrimitiveDefined
}

/// Returns the primitive kind of `class`, or `None` for user-defined and
/// unrecognized classes.
pub fn primitive_kind_of(class: &DataClass) -> Option<PrimitiveKind> {
    if !is_primitive(class) {
        return None;
    }
    PrimitiveKind::from_class_name(class.name.as_str())
}

/// Resolves `type_class_id` against the known classes.
pub fn resolve_type(type_class_id: ClassId, classes: &[DataClass]) -> TypeResolution {
    let Some(class) = classes.iter().find(|class| class.id == type_class_id) else {
        return TypeResolution::Unsupported(UnsupportedReason::UnresolvedTypeClass(type_class_id));
    };

    match class.kind {
        ClassKind::UserDefined => TypeResolution::UserDefined(class.id),
        ClassKind::PrimitiveDefined => match primitive_kind_of(class) {
            Some(kind) => TypeResolution::Primitive(kind),
            None => TypeResolution::Unsupported(UnsupportedReason::UnknownPrimitive {
                class_id: class.id,
                name: class.name.clone(),
            }),
        },
        ClassKind::Unknown => TypeResolution::Unsupported(UnsupportedReason::UnknownKind(class.id)),
    }
}
