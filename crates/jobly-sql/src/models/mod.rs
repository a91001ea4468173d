//! Jobly entity models.
//!
//! Each model pairs its static [`NameMap`](crate::NameMap) and
//! [`FilterSpec`](crate::FilterSpec) with pure statement builders (for
//! inspection and testing) and async data-access functions that run them on
//! any [`GenericClient`](crate::GenericClient).

use crate::attrs::AttributeBag;
use crate::error::{SqlError, SqlResult};
use crate::value::Value;

pub mod company;
pub mod job;
pub mod user;

pub use company::{Company, NewCompany};
pub use job::{Job, JobDetail, JobListing, NewJob};
pub use user::User;

/// Reject a non-integer or out-of-range value for an `INTEGER` column before
/// it reaches the server. Absent and `null` are fine.
pub(crate) fn check_int4(data: &AttributeBag, field: &str) -> SqlResult<()> {
    match data.get(field) {
        None | Some(Value::Null) => Ok(()),
        Some(Value::Int(n)) if i32::try_from(*n).is_ok() => Ok(()),
        Some(other) => Err(SqlError::validation(format!(
            "{field} must be an integer, got {other}"
        ))),
    }
}
