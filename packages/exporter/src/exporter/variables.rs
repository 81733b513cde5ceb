//! Variable Resolver

use super::ClassScope;
use crate::declarations::ClassVariable;
use crate::sections::{Section, SectionBuffer};

/// One `def_readonly`/`def_readwrite` per non-excluded variable, read-only
/// when the variable is const.
pub(super) fn export_variables(
    scope: &ClassScope<'_>,
    variables: &[&ClassVariable],
    out: &mut SectionBuffer,
) {
    for var in variables {
        let info = scope.info.member(&var.name);
        if info.exclude {
            continue;
        }
        let name = info.rename.as_deref().unwrap_or(&var.name);
        let def = if var.ty.is_const {
            "def_readonly"
        } else {
            "def_readwrite"
        };
        out.add(
            Section::Inside,
            format!(".{}(\"{}\", &{})", def, name, var.full_name()),
        );
    }
}
