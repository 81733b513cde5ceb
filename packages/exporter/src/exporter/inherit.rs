//! Inheritance Flattener
//!
//! Pulls public members of base classes into the derived snapshot, so that
//! exporting one class exposes everything it inherits from bases that are not
//! exported on their own.

use indexmap::IndexSet;

use crate::declarations::{Callable, ClassSnapshot, DeclarationGraph, Member};
use crate::error::Result;

/// Key identifying one method overload: the typed pointer plus qualifiers.
fn signature(method: &Callable) -> String {
    let virtual_ = if method.is_virtual { " virtual" } else { "" };
    format!("{}{}", method.member_pointer(true), virtual_)
}

fn is_inheritable(member: &Member) -> bool {
    member.is_public()
        && matches!(
            member,
            Member::Method(_)
                | Member::Variable(_)
                | Member::NestedClass(_)
                | Member::Enumeration(_)
        )
}

/// Walks the ancestry generation by generation and appends each eligible
/// base member unless an equivalent member is already present. Equivalence is
/// judged on the member as re-owned by the derived class; the appended member
/// keeps its base owner so its address names the class that declares it. The
/// walk ends after the first generation holding a base in `exported`: that
/// base already exposes everything above it.
///
/// Returns the number of inherited members.
pub fn inherit_members(
    class: &mut ClassSnapshot,
    graph: &DeclarationGraph,
    exported: &IndexSet<String>,
) -> Result<usize> {
    let owner = class.full_name.clone();
    let mut full_names: IndexSet<String> = class.members().iter().map(Member::full_name).collect();
    let mut signatures: IndexSet<String> = class
        .members()
        .iter()
        .filter_map(|m| match m {
            Member::Method(method) => Some(signature(method)),
            _ => None,
        })
        .collect();

    let hierarchy = class.hierarchy.clone();
    let mut inherited = 0;
    for level in &hierarchy {
        let mut level_exported = false;
        for base_name in level {
            let base = graph.class(base_name)?;
            if exported.contains(&base.full_name) {
                level_exported = true;
                continue;
            }
            for member in base.members.iter().filter(|m| is_inheritable(m)) {
                let fresh = match member.reparent(&owner) {
                    Member::Method(method) => signatures.insert(signature(&method)),
                    copy => full_names.insert(copy.full_name()),
                };
                if fresh {
                    class.push(member.clone());
                    inherited += 1;
                }
            }
        }
        if level_exported {
            break;
        }
    }
    Ok(inherited)
}
