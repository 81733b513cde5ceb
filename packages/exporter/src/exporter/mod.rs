//! Class Exporter
//!
//! Runs the export pipeline for one class: inheritance flattening, member
//! classification, then one resolver per member kind appending to the class's
//! section buffers. Nested classes and enumerations are exported recursively
//! and attached as children of the result.

mod classify;
mod constructors;
mod inherit;
mod methods;
mod nested;
mod operators;
mod variables;

pub use classify::{classify, ClassifiedMembers};
pub use inherit::inherit_members;
pub use operators::ConverterTable;

use indexmap::IndexSet;

use crate::declarations::{ClassSnapshot, Declaration, DeclarationGraph};
use crate::error::{ExportError, Result};
use crate::export_info::{ExportInfo, ExportSettings};
use crate::logging::{Logger, NullLogger};
use crate::policies::opaque_type_id;
use crate::sections::{ExportResult, Section, SectionBuffer};

static NULL_LOGGER: NullLogger = NullLogger;

/// State shared by every export pass of one run.
pub struct ExportContext<'l> {
    /// Names of the declarations exported so far, in export order.
    pub exported_names: IndexSet<String>,
    /// Classes whose pass has started and not finished, outermost first.
    in_progress: IndexSet<String>,
    opaque_type_ids: IndexSet<String>,
    pub settings: ExportSettings,
    logger: &'l dyn Logger,
}

impl Default for ExportContext<'static> {
    fn default() -> Self {
        ExportContext::new(&NULL_LOGGER)
    }
}

impl<'l> ExportContext<'l> {
    pub fn new(logger: &'l dyn Logger) -> Self {
        ExportContext {
            exported_names: IndexSet::new(),
            in_progress: IndexSet::new(),
            opaque_type_ids: IndexSet::new(),
            settings: ExportSettings::default(),
            logger,
        }
    }

    pub fn with_settings(mut self, settings: ExportSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_exported<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exported_names.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn logger(&self) -> &'l dyn Logger {
        self.logger
    }

    pub fn is_exported(&self, name: &str) -> bool {
        self.exported_names.contains(name)
    }

    pub fn mark_exported(&mut self, name: impl Into<String>) {
        self.exported_names.insert(name.into());
    }

    /// Whether a pass for `name` is running further up the current stack.
    pub fn is_in_progress(&self, name: &str) -> bool {
        self.in_progress.contains(name)
    }

    /// Records an opaque pointer type; true the first time a type is seen.
    fn claim_opaque_type(&mut self, type_name: &str) -> bool {
        self.opaque_type_ids.insert(type_name.to_string())
    }
}

/// Read-only view handed to the member resolvers of one pass.
pub(crate) struct ClassScope<'a> {
    pub class: &'a ClassSnapshot,
    pub info: &'a ExportInfo,
    pub graph: &'a DeclarationGraph,
    pub settings: &'a ExportSettings,
    pub logger: &'a dyn Logger,
}

impl ClassScope<'_> {
    /// Binding framework identifier with its namespace prefix.
    pub fn py(&self, ident: &str) -> String {
        format!("{}{}", self.settings.python_ns, ident)
    }

    /// Generated helper identifier with its namespace prefix.
    pub fn helper(&self, ident: &str) -> String {
        format!("{}{}", self.settings.helper_ns, ident)
    }
}

pub struct ClassExporter<'g> {
    info: ExportInfo,
    graph: &'g DeclarationGraph,
    class: ClassSnapshot,
}

impl<'g> ClassExporter<'g> {
    /// Resolves `info.name` in the graph and takes the private snapshot of
    /// the class. A typedef resolves to its target class and lends its own
    /// name as the exposed name when no rename is configured.
    pub fn new(mut info: ExportInfo, graph: &'g DeclarationGraph) -> Result<Self> {
        let class = match graph.lookup(&info.name)? {
            Declaration::Class(class) => class,
            Declaration::Typedef(typedef) => {
                if info.rename.is_none() {
                    info.rename = Some(typedef.name.clone());
                }
                graph.class(&typedef.ty.name)?
            }
            _ => {
                return Err(ExportError::NotAClass {
                    name: info.name.clone(),
                })
            }
        };
        let class = ClassSnapshot::of(class);
        Ok(ClassExporter { info, graph, class })
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn snapshot(&self) -> &ClassSnapshot {
        &self.class
    }

    /// Runs the whole pass. The snapshot is consumed; on error nothing is
    /// recorded for this class, while names recorded by earlier passes stay.
    pub fn export(self, ctx: &mut ExportContext<'_>) -> Result<ExportResult> {
        let full_name = self.class.full_name.clone();
        let entered = ctx.in_progress.insert(full_name.clone());
        let result = self.run(ctx);
        if entered {
            ctx.in_progress.shift_remove(&full_name);
        }
        match &result {
            Ok(_) => ctx.logger().info(&format!("finished {}", full_name)),
            Err(err) => ctx
                .logger()
                .error(&format!("failed to export {}: {}", full_name, err)),
        }
        result
    }

    fn run(mut self, ctx: &mut ExportContext<'_>) -> Result<ExportResult> {
        let inherited = inherit_members(&mut self.class, self.graph, &ctx.exported_names)?;
        ctx.logger().debug(&format!(
            "exporting {} ({} inherited members)",
            self.class.full_name, inherited
        ));

        let mut result = ExportResult::new(self.info.name.clone());
        if self.info.exclude {
            ctx.logger().debug(&format!("{} is excluded", self.info.name));
            return Ok(result);
        }

        let members = classify(self.class.members());
        {
            let scope = ClassScope {
                class: &self.class,
                info: &self.info,
                graph: self.graph,
                settings: &ctx.settings,
                logger: ctx.logger,
            };
            let out = &mut result.sections;
            self.export_basics(&scope, out);
            constructors::export_constructors(&scope, &members.constructors, out)?;
            variables::export_variables(&scope, &members.variables, out);
            methods::export_methods(&scope, &members.methods, out)?;
            operators::export_operators(&scope, &members.operators, out);
            operators::export_converters(
                &scope,
                &members.converters,
                &ConverterTable::default(),
                out,
            );
        }

        nested::export_nested_classes(
            &self.info,
            self.graph,
            &members.nested_classes,
            ctx,
            &mut result.children,
        )?;
        nested::export_nested_enums(
            &self.info,
            self.graph,
            &members.enumerations,
            ctx,
            &mut result.children,
        )?;

        self.export_smart_pointer(&ctx.settings, &mut result.sections);
        self.export_opaque_pointer_policies(&members, ctx, &mut result.sections);

        ctx.mark_exported(self.info.name.clone());
        Ok(result)
    }

    fn export_basics(&self, scope: &ClassScope<'_>, out: &mut SectionBuffer) {
        out.add(Section::Template, self.class.full_name.clone());
        let name = scope.info.rename.as_deref().unwrap_or(&self.class.name);
        out.add(Section::Constructor, format!("\"{}\"", name));
        if let Some(include) = &scope.info.include {
            out.add(Section::Include, format!("#include <{}>", include));
        }
    }

    fn export_smart_pointer(&self, settings: &ExportSettings, out: &mut SectionBuffer) {
        if let Some(smart_ptr) = &self.info.smart_ptr {
            let pointer = smart_ptr.replace("%s", &self.class.full_name);
            out.add(
                Section::Scope,
                format!(
                    "{}register_ptr_to_python< {} >();",
                    settings.python_ns, pointer
                ),
            );
        }
    }

    fn export_opaque_pointer_policies(
        &self,
        members: &ClassifiedMembers<'_>,
        ctx: &mut ExportContext<'_>,
        out: &mut SectionBuffer,
    ) {
        for method in &members.methods {
            let opaque = self
                .info
                .member(&method.name)
                .policy
                .is_some_and(|policy| policy.is_opaque_pointer());
            if !opaque {
                continue;
            }
            if let Some(result) = &method.result {
                if ctx.claim_opaque_type(&result.name) {
                    out.add(Section::DeclarationOutside, opaque_type_id(&result.name));
                }
            }
        }
    }
}
