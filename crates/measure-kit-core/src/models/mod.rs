//! FHIR resource models for measure bundles
//!
//! Only the fields the conversion reads are modelled. Everything else in
//! the source documents is ignored during deserialization.

pub mod bundle;
pub mod library;
pub mod measure;
pub mod resource;
pub mod value_set;

// Re-exports
pub use bundle::*;
pub use library::*;
pub use measure::*;
pub use resource::*;
pub use value_set::*;
