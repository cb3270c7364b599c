//! Result type aliases

use crate::error::StaffError;

/// Standard Result type for staffing operations
pub type StaffResult<T> = Result<T, StaffError>;
