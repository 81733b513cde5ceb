//! Policy Advisories
//!
//! Decides whether a callable's result needs a calling-convention policy and
//! reports the ones that are missing. A missing policy never fails the export.

use crate::declarations::{Callable, Type, TypeSuffix};
use crate::export_info::Policy;
use crate::logging::Logger;

/// Internal name of the runtime's raw object type.
const RAW_OBJECT_TYPE: &str = "_object";

fn is_c_string(ty: &Type) -> bool {
    ty.name == "char" && ty.suffix == TypeSuffix::Pointer
}

fn is_raw_object(ty: &Type) -> bool {
    ty.name == RAW_OBJECT_TYPE && ty.suffix == TypeSuffix::Pointer
}

/// Pointer and reference results need a policy; C strings and raw runtime
/// objects are converted by value.
pub fn needs_policy(result: Option<&Type>) -> bool {
    match result {
        Some(ty) => ty.is_pointer_or_reference() && !is_c_string(ty) && !is_raw_object(ty),
        None => false,
    }
}

/// Returns the configured policy, warning through `logger` when the callable
/// needs one and none was configured.
pub fn handle_policy(
    callable: &Callable,
    configured: Option<Policy>,
    logger: &dyn Logger,
) -> Option<Policy> {
    if configured.is_none() && needs_policy(callable.result.as_ref()) {
        logger.warn(&format!(
            "Function \"{}\" returns a pointer or reference, but no policy was specified",
            callable.full_name()
        ));
    }
    configured
}

/// Declaration that lets an opaque pointer of `type_name` cross the boundary.
pub fn opaque_type_id(type_name: &str) -> String {
    format!("BOOST_PYTHON_OPAQUE_SPECIALIZED_TYPE_ID({})\n", type_name)
}
