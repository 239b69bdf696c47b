//! Typed spell parameters: values, containers, schemas, and wire formats.
//!
//! Parameters arrive either as JSON text or as a binary [`TagCompound`],
//! are decoded into a [`SpellParameters`] container, and are validated and
//! normalized against a spell's [`SpellParameterSchema`].
mod container;
mod error;
mod schema;
mod tag;
mod value;

pub use container::{STRING_PROMOTIONS, SpellParameters, StringPromotion};
pub use error::{DecodeError, SchemaError, ValidationError, ValidationErrors};
pub use schema::{
    ParameterDefinition, SchemaBuilder, SpellParameterSchema, ValidationResult, global_definitions,
};
pub use tag::{Tag, TagCompound, UUID_KEY};
pub use value::{
    CANONICAL_UUID_LEN, ParameterType, ParameterValue, TypedValue, Vec3, parse_canonical_uuid,
};
