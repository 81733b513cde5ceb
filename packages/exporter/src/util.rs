//! Utility Functions

use once_cell::sync::Lazy;
use regex::Regex;

static NON_IDENTIFIER_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").unwrap());

/// Turns a C++ name into a valid identifier: `ns::A<int>` becomes `ns_A_int_`.
pub fn make_id(name: &str) -> String {
    NON_IDENTIFIER_CHARS
        .replace_all(&name.replace("::", "_"), "_")
        .into_owned()
}

/// Last component of a qualified name.
pub fn unqualified(name: &str) -> &str {
    let base = match name.find('<') {
        Some(pos) => &name[..pos],
        None => name,
    };
    match base.rfind("::") {
        Some(pos) => &name[pos + 2..],
        None => name,
    }
}
