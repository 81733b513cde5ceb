//! Enumeration Exporter
//!
//! Sibling of the class pipeline for enumerations. Only its public contract is
//! used by the class exporter: construct from a configuration, export into a
//! fresh `ExportResult`, record the exported name.

use crate::declarations::{DeclarationGraph, EnumDecl};
use crate::error::Result;
use crate::export_info::ExportInfo;
use crate::exporter::ExportContext;
use crate::sections::{ExportResult, Section};

pub struct EnumExporter {
    info: ExportInfo,
    enumeration: EnumDecl,
}

impl EnumExporter {
    pub fn new(info: ExportInfo, graph: &DeclarationGraph) -> Result<Self> {
        let enumeration = graph.enumeration(&info.name)?.clone();
        Ok(EnumExporter { info, enumeration })
    }

    pub fn export(self, ctx: &mut ExportContext<'_>) -> ExportResult {
        let mut result = ExportResult::new(self.info.name.clone());
        if self.info.exclude {
            return result;
        }

        let out = &mut result.sections;
        out.add(Section::Template, self.enumeration.full_name.clone());
        let name = self
            .info
            .rename
            .as_deref()
            .unwrap_or(&self.enumeration.name);
        out.add(Section::Constructor, format!("\"{}\"", name));

        for value in &self.enumeration.values {
            let info = self.info.member(value);
            if info.exclude {
                continue;
            }
            let exposed = info.rename.as_deref().unwrap_or(value);
            out.add(
                Section::Inside,
                format!(
                    ".value(\"{}\", {})",
                    exposed,
                    self.enumeration.value_full_name(value)
                ),
            );
        }

        ctx.mark_exported(self.info.name.clone());
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::Declaration;
    use crate::error::ExportError;

    fn graph() -> DeclarationGraph {
        DeclarationGraph::new().with(Declaration::Enumeration(EnumDecl::new(
            "gfx::Color",
            &["Red", "Green", "Blue"],
        )))
    }

    #[test]
    fn should_export_values_in_declaration_order() {
        let graph = graph();
        let mut info = ExportInfo::new("gfx::Color");
        *info.member_mut("Green") = ExportInfo::default().renamed("GREEN");
        *info.member_mut("Blue") = ExportInfo::default().excluded();

        let mut ctx = ExportContext::default();
        let result = EnumExporter::new(info, &graph).unwrap().export(&mut ctx);

        assert_eq!(result.section(Section::Template), ["gfx::Color"]);
        assert_eq!(result.section(Section::Constructor), ["\"Color\""]);
        assert_eq!(
            result.section(Section::Inside),
            [
                ".value(\"Red\", gfx::Red)",
                ".value(\"GREEN\", gfx::Green)"
            ]
        );
        assert!(ctx.is_exported("gfx::Color"));
    }

    #[test]
    fn should_reject_non_enumerations() {
        let graph = graph();
        assert_eq!(
            EnumExporter::new(ExportInfo::new("gfx"), &graph).err(),
            Some(ExportError::UnknownDeclaration {
                name: "gfx".to_string()
            })
        );
    }
}
