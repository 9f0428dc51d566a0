//! Result type alias for measure bundle conversion

use crate::error::MeasureKitError;

/// Standard Result type for measure bundle conversion
pub type Result<T> = std::result::Result<T, MeasureKitError>;
