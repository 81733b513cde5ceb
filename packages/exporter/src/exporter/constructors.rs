//! Constructor Resolver
//!
//! The constructor with the fewest parameters becomes the primary initializer
//! of the class statement; every other one is an extra `.def(init<...>())`.

use super::ClassScope;
use crate::declarations::Callable;
use crate::error::{ExportError, Result};
use crate::sections::{Section, SectionBuffer};

/// `init< required..., optional< rest... > >()`, split at `min_args`.
fn init_code(scope: &ClassScope<'_>, constructor: &Callable) -> String {
    let params: Vec<String> = constructor
        .parameters
        .iter()
        .map(|p| p.ty.full_name())
        .collect();
    let (required, optional) = params.split_at(constructor.min_args());

    let mut init = format!("{}< ", scope.py("init"));
    init.push_str(&required.join(", "));
    if !optional.is_empty() {
        if !required.is_empty() {
            init.push_str(", ");
        }
        init.push_str(&format!(
            "{}< {} >",
            scope.py("optional"),
            optional.join(", ")
        ));
    }
    init.push_str(" >()");
    init
}

pub(super) fn export_constructors(
    scope: &ClassScope<'_>,
    constructors: &[&Callable],
    out: &mut SectionBuffer,
) -> Result<()> {
    if constructors.is_empty() {
        return Ok(());
    }

    let primary = constructors
        .iter()
        .enumerate()
        .min_by_key(|(_, c)| c.parameters.len())
        .map(|(index, _)| index)
        .ok_or_else(|| ExportError::NoConstructorCandidate {
            class: scope.class.full_name.clone(),
        })?;

    out.add(Section::Constructor, init_code(scope, constructors[primary]));
    for (index, constructor) in constructors.iter().enumerate() {
        if index != primary {
            out.add(Section::Inside, format!(".def({})", init_code(scope, constructor)));
        }
    }
    Ok(())
}
