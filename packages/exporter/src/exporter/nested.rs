//! Nested Export Dispatcher
//!
//! Nested classes run through the class pipeline, nested enumerations through
//! the enumeration exporter. Children share the run's `ExportContext`, so a
//! class exported here is seen as exported by its siblings and parents.

use super::{ClassExporter, ExportContext};
use crate::declarations::{DeclarationGraph, NestedRef};
use crate::enumeration::EnumExporter;
use crate::error::Result;
use crate::export_info::ExportInfo;
use crate::sections::ExportResult;

/// Configuration of a nested declaration: its own record from the parent,
/// named after the nested declaration and sharing the parent's include.
fn child_info(parent: &ExportInfo, nested: &NestedRef) -> ExportInfo {
    let mut info = parent.member(&nested.name).clone();
    info.include = parent.include.clone();
    info.name = nested.target.clone();
    info
}

pub(super) fn export_nested_classes(
    parent: &ExportInfo,
    graph: &DeclarationGraph,
    nested: &[&NestedRef],
    ctx: &mut ExportContext<'_>,
    children: &mut Vec<ExportResult>,
) -> Result<()> {
    for class in nested {
        // A nested class deriving from its enclosing class inherits its own
        // declaration back; that pass is already running.
        if ctx.is_in_progress(&class.target) {
            ctx.logger().debug(&format!(
                "skipping {}: already being exported",
                class.target
            ));
            continue;
        }
        let exporter = ClassExporter::new(child_info(parent, class), graph)?;
        children.push(exporter.export(ctx)?);
    }
    Ok(())
}

pub(super) fn export_nested_enums(
    parent: &ExportInfo,
    graph: &DeclarationGraph,
    nested: &[&NestedRef],
    ctx: &mut ExportContext<'_>,
    children: &mut Vec<ExportResult>,
) -> Result<()> {
    for enumeration in nested {
        let exporter = EnumExporter::new(child_info(parent, enumeration), graph)?;
        children.push(exporter.export(ctx));
    }
    Ok(())
}
