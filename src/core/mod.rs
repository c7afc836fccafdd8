pub mod error;
pub mod field_factory;
pub mod form_field_registry;
pub mod ids;
pub mod path_registry;

pub use error::{FieldError, Result};
pub use field_factory::{FactoryOptions, FieldFactory, FormContext, KeySource, RandomKeys};
pub use form_field_registry::FormFieldRegistry;
pub use ids::IdentifierPool;
pub use path_registry::{ClaimKind, PathRegistry, ValuePathOptions};
