//! Method/Overload Resolver
//!
//! Emits one `.def` per exposed method, in the fixed order name, pointer,
//! policy, overload helper. Methods whose trailing parameters have defaults
//! get an overload helper, declared once per (name, min, max) key. Static
//! methods get a trailing `.staticmethod` after all definitions.

use indexmap::IndexSet;

use super::ClassScope;
use crate::declarations::Callable;
use crate::error::Result;
use crate::policies::handle_policy;
use crate::sections::{Section, SectionBuffer};
use crate::util::make_id;

/// A method of the class, or a free function configured to appear as one.
#[derive(Debug, Clone, Copy)]
enum ExposedMethod<'a> {
    Native(&'a Callable),
    Added {
        function: &'a Callable,
        rename: Option<&'a str>,
    },
}

impl<'a> ExposedMethod<'a> {
    fn callable(&self) -> &'a Callable {
        match *self {
            ExposedMethod::Native(method) => method,
            ExposedMethod::Added { function, .. } => function,
        }
    }

    /// Free and static functions take no implicit receiver.
    fn is_function_like(&self) -> bool {
        match self {
            ExposedMethod::Native(method) => method.is_static,
            ExposedMethod::Added { .. } => true,
        }
    }

    fn pointer(&self) -> String {
        match self {
            ExposedMethod::Native(method) => method.member_pointer(false),
            ExposedMethod::Added { function, .. } => function.function_pointer(false),
        }
    }
}

/// Name of the overload helper; a pure function of (qualified name, min, max).
pub(crate) fn overload_name(callable: &Callable) -> String {
    format!(
        "{}_overloads_{}_{}",
        make_id(&callable.full_name()),
        callable.min_args(),
        callable.max_args()
    )
}

fn declare_overloads(method: &ExposedMethod<'_>, out: &mut SectionBuffer) {
    let callable = method.callable();
    let (macro_, func) = if method.is_function_like() {
        ("BOOST_PYTHON_FUNCTION_OVERLOADS", callable.full_name())
    } else {
        ("BOOST_PYTHON_MEMBER_FUNCTION_OVERLOADS", callable.name.clone())
    };
    let code = format!(
        "{}({}, {}, {}, {})\n",
        macro_,
        overload_name(callable),
        func,
        callable.min_args(),
        callable.max_args()
    );
    out.add_once(Section::Declaration, code);
}

/// Non-virtual methods of the class followed by the configured free functions.
fn exposed_methods<'a>(
    scope: &ClassScope<'a>,
    methods: &[&'a Callable],
) -> Result<Vec<ExposedMethod<'a>>> {
    let mut exposed: Vec<ExposedMethod<'a>> = methods
        .iter()
        .filter(|m| !m.is_virtual)
        .map(|&m| ExposedMethod::Native(m))
        .collect();
    for added in &scope.info.added {
        let function = scope.graph.function(&added.name)?;
        exposed.push(ExposedMethod::Added {
            function,
            rename: added.rename.as_deref(),
        });
    }
    Ok(exposed)
}

pub(super) fn export_methods<'a>(
    scope: &ClassScope<'a>,
    methods: &[&'a Callable],
    out: &mut SectionBuffer,
) -> Result<()> {
    let mut static_methods: IndexSet<String> = IndexSet::new();

    for method in exposed_methods(scope, methods)? {
        let callable = method.callable();
        let info = scope.info.member(&callable.name);
        if info.exclude {
            continue;
        }

        let name = match method {
            ExposedMethod::Added {
                rename: Some(rename),
                ..
            } => rename.to_string(),
            _ => info
                .rename
                .clone()
                .unwrap_or_else(|| callable.name.clone()),
        };

        let policy = handle_policy(callable, info.policy, scope.logger)
            .map(|policy| format!(", {}()", scope.py(&policy.code())))
            .unwrap_or_default();

        let overload = if callable.min_args() != callable.max_args() {
            declare_overloads(&method, out);
            format!(", {}()", scope.helper(&overload_name(callable)))
        } else {
            String::new()
        };

        let pointer = match &info.wrapper {
            Some(wrapper) => format!("&{}", wrapper.full_name()),
            None => method.pointer(),
        };

        out.add(
            Section::Inside,
            format!(".def(\"{}\", {}{}{})", name, pointer, policy, overload),
        );

        if let ExposedMethod::Native(native) = method {
            if native.is_static {
                static_methods.insert(name);
            }
        }
        if let Some(code) = info.wrapper.as_ref().and_then(|w| w.code.as_ref()) {
            out.add_once(Section::Declaration, code.clone());
        }
    }

    for name in static_methods {
        out.add(Section::Inside, format!(".staticmethod(\"{}\")", name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declarations::{ClassDecl, ClassSnapshot, Declaration, DeclarationGraph};
    use crate::export_info::{AddedMethod, ExportInfo, ExportSettings, Wrapper};
    use crate::logging::NullLogger;

    fn run(methods: &[&Callable], info: &ExportInfo, graph: &DeclarationGraph) -> SectionBuffer {
        let class = ClassSnapshot::of(&ClassDecl::new("A"));
        let settings = ExportSettings::default();
        let scope = ClassScope {
            class: &class,
            info,
            graph,
            settings: &settings,
            logger: &NullLogger,
        };
        let mut out = SectionBuffer::new();
        export_methods(&scope, methods, &mut out).unwrap();
        out
    }

    #[test]
    fn overload_name_is_keyed_by_name_and_arity() {
        let f = Callable::new("ns::A", "f").param("int").default_param("int", "0");
        assert_eq!(overload_name(&f), "ns_A_f_overloads_1_2");
    }

    #[test]
    fn shared_arity_range_declares_one_helper() {
        let f1 = Callable::new("A", "f")
            .param("int")
            .default_param("int", "0")
            .overloaded();
        let f2 = Callable::new("A", "f")
            .param("double")
            .default_param("double", "0")
            .overloaded();
        let out = run(&[&f1, &f2], &ExportInfo::new("A"), &DeclarationGraph::new());

        assert_eq!(
            out.get(Section::Declaration),
            ["BOOST_PYTHON_MEMBER_FUNCTION_OVERLOADS(A_f_overloads_1_2, f, 1, 2)\n"]
        );
        let inside = out.get(Section::Inside);
        assert_eq!(inside.len(), 2);
        assert!(inside
            .iter()
            .all(|stmt| stmt.ends_with(", A_f_overloads_1_2())")));
    }

    #[test]
    fn static_methods_are_marked_after_all_definitions() {
        let create = Callable::new("A", "create").returning("A").static_();
        let size = Callable::new("A", "size").returning("int").const_();
        let out = run(&[&create, &size], &ExportInfo::new("A"), &DeclarationGraph::new());

        assert_eq!(
            out.get(Section::Inside),
            [
                ".def(\"create\", &A::create)",
                ".def(\"size\", &A::size)",
                ".staticmethod(\"create\")"
            ]
        );
    }

    #[test]
    fn should_honor_rename_exclude_policy_and_wrapper() {
        let get = Callable::new("A", "get").returning("B&");
        let skip = Callable::new("A", "skip");
        let wrapped = Callable::new("A", "wrapped");

        let mut info = ExportInfo::new("A");
        *info.member_mut("get") = ExportInfo::default()
            .renamed("fetch")
            .with_policy(crate::export_info::Policy::ReturnInternalReference { owner_arg: 1 });
        *info.member_mut("skip") = ExportInfo::default().excluded();
        *info.member_mut("wrapped") = ExportInfo::default()
            .with_wrapper(Wrapper::new("wrapped_impl").with_code("void wrapped_impl(A&) {}\n"));

        let out = run(&[&get, &skip, &wrapped], &info, &DeclarationGraph::new());
        assert_eq!(
            out.get(Section::Inside),
            [
                ".def(\"fetch\", &A::get, return_internal_reference< 1 >())",
                ".def(\"wrapped\", &wrapped_impl)"
            ]
        );
        assert_eq!(out.get(Section::Declaration), ["void wrapped_impl(A&) {}\n"]);
    }

    #[test]
    fn virtual_methods_are_left_out() {
        let draw = Callable::new("A", "draw").virtual_();
        let out = run(&[&draw], &ExportInfo::new("A"), &DeclarationGraph::new());
        assert!(out.is_empty());
    }

    #[test]
    fn added_functions_become_methods() {
        let graph = DeclarationGraph::new().with(Declaration::Function(
            Callable::new("ns", "distance")
                .returning("double")
                .param("const A&")
                .default_param("double", "1.0"),
        ));
        let mut info = ExportInfo::new("A");
        info.added.push(AddedMethod {
            name: "ns::distance".to_string(),
            rename: Some("dist".to_string()),
        });

        let out = run(&[], &info, &graph);
        assert_eq!(
            out.get(Section::Inside),
            [".def(\"dist\", &ns::distance, ns_distance_overloads_1_2())"]
        );
        assert_eq!(
            out.get(Section::Declaration),
            ["BOOST_PYTHON_FUNCTION_OVERLOADS(ns_distance_overloads_1_2, ns::distance, 1, 2)\n"]
        );
    }

    #[test]
    fn missing_added_function_is_an_error() {
        let class = ClassSnapshot::of(&ClassDecl::new("A"));
        let settings = ExportSettings::default();
        let graph = DeclarationGraph::new();
        let mut info = ExportInfo::new("A");
        info.added.push(AddedMethod {
            name: "nowhere".to_string(),
            rename: None,
        });
        let scope = ClassScope {
            class: &class,
            info: &info,
            graph: &graph,
            settings: &settings,
            logger: &NullLogger,
        };
        let mut out = SectionBuffer::new();
        assert!(export_methods(&scope, &[], &mut out).is_err());
    }
}
