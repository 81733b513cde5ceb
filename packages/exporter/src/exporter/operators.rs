//! Operator Resolver
//!
//! Member operators and free operators taking the class are resolved through
//! one path. In order: a wrapper, a rename or a rename-table entry turns the
//! operator into a named method; an output-stream shape becomes the
//! stringification form; a native spelling becomes `self op other<T>()`
//! syntax. Anything else is skipped.
//!
//! Converter operators are named methods whose name comes from an ordered
//! regex table over the converted-to type.

use once_cell::sync::Lazy;
use regex::Regex;

use super::ClassScope;
use crate::declarations::{Callable, Member, Parameter};
use crate::sections::{Section, SectionBuffer};
use crate::util::{make_id, unqualified};

/// Operators the binding framework exposes with its own operator syntax.
const NATIVE_OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "&", "!", "~", "|", "<", ">", "==", "!=", "<=", ">=", "<<",
    ">>", "&&", "||", "+=", "-=", "*=", "/=", "%=", "^=", "&=", "|=", "<<=", ">>=",
];

/// Operators without native syntax that map onto a conventional method name.
const RENAME_OPERATORS: &[(&str, &str)] = &[("()", "__call__")];

const STRINGIFY_METHOD: &str = "__str__";

static SPECIAL_CONVERTERS: Lazy<ConverterTable> = Lazy::new(|| {
    ConverterTable::new(&[
        (r"(const)?\s*double", "__float__"),
        (r"(const)?\s*float", "__float__"),
        (r"(const)?\s*int", "__int__"),
        (r"(const)?\s*long", "__long__"),
        (r"(const)?\s*char\s*\*?", STRINGIFY_METHOD),
        (r"(const)?.*::basic_string<.*>\s*(\*|\&)?", STRINGIFY_METHOD),
    ])
    .unwrap()
});

fn is_native(symbol: &str) -> bool {
    NATIVE_OPERATORS.contains(&symbol)
}

fn renamed_operator(symbol: &str) -> Option<&'static str> {
    RENAME_OPERATORS
        .iter()
        .find(|(op, _)| *op == symbol)
        .map(|(_, name)| *name)
}

/// Ordered (pattern, method name) pairs matched against the full name of a
/// converter's result type. Patterns match the whole name; the first match
/// wins.
#[derive(Debug, Clone)]
pub struct ConverterTable {
    entries: Vec<(Regex, String)>,
}

impl ConverterTable {
    pub fn new(entries: &[(&str, &str)]) -> Result<Self, regex::Error> {
        let entries = entries
            .iter()
            .map(|(pattern, name)| {
                Regex::new(&format!("^(?:{})$", pattern)).map(|re| (re, name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ConverterTable { entries })
    }

    pub fn lookup(&self, type_name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(re, _)| re.is_match(type_name))
            .map(|(_, name)| name.as_str())
    }
}

impl Default for ConverterTable {
    fn default() -> Self {
        SPECIAL_CONVERTERS.clone()
    }
}

fn stringify(scope: &ClassScope<'_>) -> String {
    format!(".def({}({}))", scope.py("self_ns::str"), scope.py("self"))
}

/// Result and first parameter are both streams of the given kind, as in
/// `ostream& operator<<(ostream&, const T&)`.
fn is_stream_shape(op: &Callable, stream: &str) -> bool {
    let result = op.result.as_ref().is_some_and(|r| r.name.contains(stream));
    let first = op
        .parameters
        .first()
        .is_some_and(|p| p.ty.name.contains(stream));
    result && first
}

/// `self` when the parameter is the exporting class, else `other< T >()`.
fn operand(scope: &ClassScope<'_>, param: &Parameter) -> String {
    if param.ty.name == scope.class.full_name {
        scope.py("self")
    } else {
        format!("{}< {} >()", scope.py("other"), param.ty.name)
    }
}

/// Free operators with at least one parameter of the exporting class.
fn free_operators(scope: &ClassScope<'_>) -> Vec<Member> {
    scope
        .graph
        .free_operators()
        .filter(|op| {
            op.parameters
                .iter()
                .any(|p| p.ty.name == scope.class.full_name)
        })
        .map(|op| Member::FreeOperator(op.clone()))
        .collect()
}

fn native_operator(scope: &ClassScope<'_>, member: &Member, op: &Callable) -> String {
    let symbol = op.operator_symbol();
    let unary = match member {
        Member::FreeOperator(_) => op.parameters.len() == 1,
        _ => op.parameters.is_empty(),
    };
    if unary {
        return format!(".def( {}{} )", symbol, scope.py("self"));
    }
    let (left, right) = match op.parameters.as_slice() {
        [first, second] => (operand(scope, first), operand(scope, second)),
        [only] => (scope.py("self"), operand(scope, only)),
        _ => (scope.py("self"), scope.py("self")),
    };
    format!(".def( {} {} {} )", left, symbol, right)
}

pub(super) fn export_operators(
    scope: &ClassScope<'_>,
    members: &[&Member],
    out: &mut SectionBuffer,
) {
    let mut candidates = free_operators(scope);
    candidates.extend(members.iter().map(|&m| m.clone()));

    for member in &candidates {
        let op = match member {
            Member::Operator(op) | Member::FreeOperator(op) => op,
            _ => continue,
        };
        let symbol = op.operator_symbol();
        let info = scope.info.operator(symbol);
        if info.exclude {
            continue;
        }

        let wrapper = info.wrapper.as_ref();
        let pointer = match wrapper {
            Some(wrapper) => {
                if let Some(code) = &wrapper.code {
                    out.add_once(Section::Declaration, code.clone());
                }
                format!("&{}", wrapper.full_name())
            }
            None => member.pointer_declaration().unwrap_or_default(),
        };

        let method_name = info
            .rename
            .as_deref()
            .or_else(|| wrapper.map(|w| w.name.as_str()))
            .or_else(|| renamed_operator(symbol));

        if let Some(name) = method_name {
            let policy = info
                .policy
                .map(|policy| format!(", {}()", scope.py(&policy.code())))
                .unwrap_or_default();
            out.add(
                Section::Inside,
                format!(".def(\"{}\", {}{})", name, pointer, policy),
            );
        } else if is_stream_shape(op, "ostream") {
            out.add(Section::Inside, stringify(scope));
        } else if is_stream_shape(op, "istream") {
            scope.logger.debug(&format!(
                "skipping stream extraction operator{} of {}",
                symbol, scope.class.full_name
            ));
        } else if is_native(symbol) {
            out.add(Section::Inside, native_operator(scope, member, op));
        } else {
            scope.logger.debug(&format!(
                "skipping operator{} of {}",
                symbol, scope.class.full_name
            ));
        }
    }
}

pub(super) fn export_converters(
    scope: &ClassScope<'_>,
    converters: &[&Callable],
    table: &ConverterTable,
    out: &mut SectionBuffer,
) {
    for converter in converters {
        let Some(result) = &converter.result else {
            continue;
        };
        let result_name = result.full_name();
        let info = scope.info.operator(&result_name);
        if info.exclude {
            continue;
        }

        let special = table.lookup(&result_name);
        if info.rename.is_none() && special == Some(STRINGIFY_METHOD) {
            out.add(Section::Inside, stringify(scope));
            continue;
        }

        let name = match (&info.rename, special) {
            (Some(rename), _) => rename.clone(),
            (None, Some(special)) => special.to_string(),
            (None, None) => format!("to_{}", make_id(unqualified(&result.name))),
        };
        let policy = info
            .policy
            .map(|policy| format!(", {}()", scope.py(&policy.code())))
            .unwrap_or_default();
        out.add(
            Section::Inside,
            format!(
                ".def(\"{}\", {}{})",
                name,
                converter.member_pointer(false),
                policy
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn special_table_matches_whole_type_names() {
        let table = ConverterTable::default();
        assert_eq!(table.lookup("double"), Some("__float__"));
        assert_eq!(table.lookup("const double"), Some("__float__"));
        assert_eq!(table.lookup("int"), Some("__int__"));
        assert_eq!(table.lookup("const char*"), Some("__str__"));
        assert_eq!(
            table.lookup("const std::basic_string<char>&"),
            Some("__str__")
        );
        assert_eq!(table.lookup("unsigned int"), None);
        assert_eq!(table.lookup("doubles"), None);
    }

    #[test]
    fn first_matching_pattern_wins() {
        let table = ConverterTable::new(&[(r".*Vec.*", "first"), (r"Vec3", "second")]).unwrap();
        assert_eq!(table.lookup("Vec3"), Some("first"));

        let table = ConverterTable::new(&[(r"Vec3", "second"), (r".*Vec.*", "first")]).unwrap();
        assert_eq!(table.lookup("Vec3"), Some("second"));
    }

    #[test]
    fn invalid_pattern_is_reported() {
        assert!(ConverterTable::new(&[("(", "broken")]).is_err());
    }

    #[test]
    fn native_table_covers_compound_assignment() {
        for op in ["-=", "*=", "<<=", "+"] {
            assert!(is_native(op), "{} should be native", op);
        }
        assert!(!is_native("()"));
        assert!(!is_native("[]"));
        assert_eq!(renamed_operator("()"), Some("__call__"));
    }
}
