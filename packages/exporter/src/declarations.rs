//! Declarations
//!
//! The resolved C++ declaration model handed over by the parsing collaborator,
//! plus `ClassSnapshot`, the private copy of one class that an export pass is
//! allowed to mutate.
//!
//! Every declaration lives in the `DeclarationGraph` arena and is indexed by its
//! qualified name; nested classes and base classes refer to one another by that
//! name rather than by pointer.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeSuffix {
    #[default]
    None,
    Pointer,
    Reference,
}

/// A type as spelled in a declaration. `name` is the bare type, without
/// cv-qualifier or pointer/reference suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub suffix: TypeSuffix,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Type {
            name: name.into(),
            is_const: false,
            suffix: TypeSuffix::None,
        }
    }

    /// Builds a type from its spelling, e.g. `const std::string&`.
    pub fn parse(spelling: &str) -> Self {
        let mut rest = spelling.trim();
        let mut suffix = TypeSuffix::None;
        if let Some(stripped) = rest.strip_suffix('*') {
            suffix = TypeSuffix::Pointer;
            rest = stripped.trim_end();
        } else if let Some(stripped) = rest.strip_suffix('&') {
            suffix = TypeSuffix::Reference;
            rest = stripped.trim_end();
        }

        let mut is_const = false;
        if let Some(stripped) = rest.strip_prefix("const ") {
            is_const = true;
            rest = stripped.trim_start();
        } else if let Some(stripped) = rest.strip_suffix(" const") {
            is_const = true;
            rest = stripped.trim_end();
        }

        Type {
            name: rest.to_string(),
            is_const,
            suffix,
        }
    }

    pub fn full_name(&self) -> String {
        let mut out = String::new();
        if self.is_const {
            out.push_str("const ");
        }
        out.push_str(&self.name);
        match self.suffix {
            TypeSuffix::None => {}
            TypeSuffix::Pointer => out.push('*'),
            TypeSuffix::Reference => out.push('&'),
        }
        out
    }

    pub fn is_pointer_or_reference(&self) -> bool {
        self.suffix != TypeSuffix::None
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub default: Option<String>,
}

impl Parameter {
    pub fn new(ty: Type) -> Self {
        Parameter { ty, default: None }
    }

    pub fn with_default(ty: Type, default: impl Into<String>) -> Self {
        Parameter {
            ty,
            default: Some(default.into()),
        }
    }
}

fn default_true() -> bool {
    true
}

/// Anything with a parameter list: constructors, methods, operators, free
/// functions. Operators keep their C++ identifier as `name` (`operator+`,
/// `operator double`); `operator_symbol` recovers the spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Callable {
    pub name: String,
    /// Qualified name of the enclosing class or namespace, empty for the
    /// global namespace.
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub result: Option<Type>,
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
    #[serde(default)]
    pub is_const: bool,
    #[serde(default)]
    pub is_virtual: bool,
    /// False when the name is overloaded in its scope, which forces a typed
    /// pointer cast.
    #[serde(default = "default_true")]
    pub is_unique: bool,
}

impl Callable {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Callable {
            name: name.into(),
            owner: owner.into(),
            result: None,
            parameters: Vec::new(),
            visibility: Visibility::Public,
            is_static: false,
            is_const: false,
            is_virtual: false,
            is_unique: true,
        }
    }

    pub fn returning(mut self, spelling: &str) -> Self {
        self.result = Some(Type::parse(spelling));
        self
    }

    pub fn param(mut self, spelling: &str) -> Self {
        self.parameters.push(Parameter::new(Type::parse(spelling)));
        self
    }

    pub fn default_param(mut self, spelling: &str, default: &str) -> Self {
        self.parameters
            .push(Parameter::with_default(Type::parse(spelling), default));
        self
    }

    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn static_(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn const_(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn virtual_(mut self) -> Self {
        self.is_virtual = true;
        self
    }

    pub fn overloaded(mut self) -> Self {
        self.is_unique = false;
        self
    }

    pub fn full_name(&self) -> String {
        qualify(&self.owner, &self.name)
    }

    /// The operator spelling (`+`, `()`, `double`), or the plain name for
    /// anything that is not an operator.
    pub fn operator_symbol(&self) -> &str {
        self.name
            .strip_prefix("operator")
            .map(str::trim)
            .unwrap_or(&self.name)
    }

    /// Parameters without a default value, counted from the front.
    pub fn min_args(&self) -> usize {
        self.parameters
            .iter()
            .take_while(|p| p.default.is_none())
            .count()
    }

    pub fn max_args(&self) -> usize {
        self.parameters.len()
    }

    fn result_spelling(&self) -> String {
        self.result
            .as_ref()
            .map(Type::full_name)
            .unwrap_or_else(|| "void".to_string())
    }

    fn parameter_spelling(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.ty.full_name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Address of a member function. Overloaded (or `force`d) names get the
    /// fully typed cast that picks one overload.
    pub fn member_pointer(&self, force: bool) -> String {
        if self.is_static {
            return self.function_pointer(force);
        }
        if self.is_unique && !force {
            return format!("&{}", self.full_name());
        }
        let const_ = if self.is_const { " const" } else { "" };
        format!(
            "({} ({}::*)({}){})&{}",
            self.result_spelling(),
            self.owner,
            self.parameter_spelling(),
            const_,
            self.full_name()
        )
    }

    /// Address of a free or static function.
    pub fn function_pointer(&self, force: bool) -> String {
        if self.is_unique && !force {
            return format!("&{}", self.full_name());
        }
        format!(
            "({} (*)({}))&{}",
            self.result_spelling(),
            self.parameter_spelling(),
            self.full_name()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassVariable {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub is_static: bool,
}

impl ClassVariable {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, spelling: &str) -> Self {
        ClassVariable {
            name: name.into(),
            owner: owner.into(),
            ty: Type::parse(spelling),
            visibility: Visibility::Public,
            is_static: false,
        }
    }

    pub fn full_name(&self) -> String {
        qualify(&self.owner, &self.name)
    }
}

/// A nested class or enumeration. `target` is the graph key of the nested
/// declaration; `owner` changes when the member is inherited, `target` never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedRef {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    pub target: String,
    #[serde(default)]
    pub visibility: Visibility,
}

impl NestedRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        let owner = owner.into();
        let name = name.into();
        NestedRef {
            target: qualify(&owner, &name),
            name,
            owner,
            visibility: Visibility::Public,
        }
    }

    pub fn full_name(&self) -> String {
        qualify(&self.owner, &self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Member {
    Constructor(Callable),
    Destructor(Callable),
    Method(Callable),
    Variable(ClassVariable),
    Operator(Callable),
    Converter(Callable),
    NestedClass(NestedRef),
    Enumeration(NestedRef),
    FreeOperator(Callable),
}

impl Member {
    pub fn name(&self) -> &str {
        match self {
            Member::Constructor(c)
            | Member::Destructor(c)
            | Member::Method(c)
            | Member::Operator(c)
            | Member::Converter(c)
            | Member::FreeOperator(c) => &c.name,
            Member::Variable(v) => &v.name,
            Member::NestedClass(n) | Member::Enumeration(n) => &n.name,
        }
    }

    pub fn full_name(&self) -> String {
        match self {
            Member::Constructor(c)
            | Member::Destructor(c)
            | Member::Method(c)
            | Member::Operator(c)
            | Member::Converter(c)
            | Member::FreeOperator(c) => c.full_name(),
            Member::Variable(v) => v.full_name(),
            Member::NestedClass(n) | Member::Enumeration(n) => n.full_name(),
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Member::Constructor(c)
            | Member::Destructor(c)
            | Member::Method(c)
            | Member::Operator(c)
            | Member::Converter(c)
            | Member::FreeOperator(c) => c.visibility,
            Member::Variable(v) => v.visibility,
            Member::NestedClass(n) | Member::Enumeration(n) => n.visibility,
        }
    }

    pub fn is_public(&self) -> bool {
        self.visibility() == Visibility::Public
    }

    /// Address expression used in a binding statement.
    pub fn pointer_declaration(&self) -> Option<String> {
        match self {
            Member::Method(c) | Member::Operator(c) | Member::Converter(c) => {
                Some(c.member_pointer(false))
            }
            Member::FreeOperator(c) => Some(c.function_pointer(false)),
            _ => None,
        }
    }

    /// Copy of this member as seen from `owner`, used when a derived class
    /// takes over members of a base it does not share with an exported class.
    pub fn reparent(&self, owner: &str) -> Member {
        let mut copy = self.clone();
        match &mut copy {
            Member::Constructor(c)
            | Member::Destructor(c)
            | Member::Method(c)
            | Member::Operator(c)
            | Member::Converter(c)
            | Member::FreeOperator(c) => c.owner = owner.to_string(),
            Member::Variable(v) => v.owner = owner.to_string(),
            Member::NestedClass(n) | Member::Enumeration(n) => n.owner = owner.to_string(),
        }
        copy
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub members: Vec<Member>,
    /// Ancestry by generation: `hierarchy[0]` holds the direct bases,
    /// `hierarchy[1]` their bases, and so on. Entries are qualified names.
    #[serde(default)]
    pub hierarchy: Vec<Vec<String>>,
}

impl ClassDecl {
    pub fn new(full_name: impl Into<String>) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();
        ClassDecl {
            name,
            full_name,
            members: Vec::new(),
            hierarchy: Vec::new(),
        }
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn bases(mut self, level: &[&str]) -> Self {
        self.hierarchy
            .push(level.iter().map(|s| s.to_string()).collect());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl EnumDecl {
    pub fn new(full_name: impl Into<String>, values: &[&str]) -> Self {
        let full_name = full_name.into();
        let name = full_name
            .rsplit("::")
            .next()
            .unwrap_or(full_name.as_str())
            .to_string();
        EnumDecl {
            name,
            full_name,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Qualified name of one enumerator: enumerators live in the scope
    /// enclosing the enumeration.
    pub fn value_full_name(&self, value: &str) -> String {
        match self.full_name.rsplit_once("::") {
            Some((scope, _)) => qualify(scope, value),
            None => value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Typedef {
    pub name: String,
    pub full_name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Declaration {
    Class(ClassDecl),
    Enumeration(EnumDecl),
    Function(Callable),
    Operator(Callable),
    Typedef(Typedef),
}

impl Declaration {
    pub fn full_name(&self) -> String {
        match self {
            Declaration::Class(c) => c.full_name.clone(),
            Declaration::Enumeration(e) => e.full_name.clone(),
            Declaration::Function(f) | Declaration::Operator(f) => f.full_name(),
            Declaration::Typedef(t) => t.full_name.clone(),
        }
    }
}

/// Arena of declarations, indexed by qualified name. Overloaded functions
/// share a name and therefore an index entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Declaration>", into = "Vec<Declaration>")]
pub struct DeclarationGraph {
    arena: Vec<Declaration>,
    index: IndexMap<String, Vec<usize>>,
}

impl DeclarationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        let declarations: Vec<Declaration> = serde_json::from_str(source)?;
        Ok(declarations.into())
    }

    pub fn add(&mut self, declaration: Declaration) -> usize {
        let slot = self.arena.len();
        self.index
            .entry(declaration.full_name())
            .or_default()
            .push(slot);
        self.arena.push(declaration);
        slot
    }

    pub fn with(mut self, declaration: Declaration) -> Self {
        self.add(declaration);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.arena.iter()
    }

    /// First declaration registered under `name`.
    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.index
            .get(name)
            .and_then(|slots| slots.first())
            .map(|&slot| &self.arena[slot])
    }

    pub fn lookup(&self, name: &str) -> Result<&Declaration> {
        self.get(name).ok_or_else(|| ExportError::UnknownDeclaration {
            name: name.to_string(),
        })
    }

    pub fn class(&self, name: &str) -> Result<&ClassDecl> {
        match self.lookup(name)? {
            Declaration::Class(class) => Ok(class),
            _ => Err(ExportError::NotAClass {
                name: name.to_string(),
            }),
        }
    }

    pub fn enumeration(&self, name: &str) -> Result<&EnumDecl> {
        match self.lookup(name)? {
            Declaration::Enumeration(enumeration) => Ok(enumeration),
            _ => Err(ExportError::NotAnEnumeration {
                name: name.to_string(),
            }),
        }
    }

    /// Free function registered under `name`, for functions exposed as methods.
    pub fn function(&self, name: &str) -> Result<&Callable> {
        match self.lookup(name)? {
            Declaration::Function(function) => Ok(function),
            _ => Err(ExportError::UnknownDeclaration {
                name: name.to_string(),
            }),
        }
    }

    pub fn free_operators(&self) -> impl Iterator<Item = &Callable> {
        self.arena.iter().filter_map(|decl| match decl {
            Declaration::Operator(op) => Some(op),
            _ => None,
        })
    }
}

impl From<Vec<Declaration>> for DeclarationGraph {
    fn from(declarations: Vec<Declaration>) -> Self {
        let mut graph = DeclarationGraph::new();
        for declaration in declarations {
            graph.add(declaration);
        }
        graph
    }
}

impl From<DeclarationGraph> for Vec<Declaration> {
    fn from(graph: DeclarationGraph) -> Self {
        graph.arena
    }
}

/// Private, mutable copy of one class taken at the start of an export pass.
/// Inheritance appends to it; the graph it was cloned from is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassSnapshot {
    pub name: String,
    pub full_name: String,
    pub hierarchy: Vec<Vec<String>>,
    members: Vec<Member>,
}

impl ClassSnapshot {
    pub fn of(class: &ClassDecl) -> Self {
        ClassSnapshot {
            name: class.name.clone(),
            full_name: class.full_name.clone(),
            hierarchy: class.hierarchy.clone(),
            members: class.members.clone(),
        }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn push(&mut self, member: Member) {
        self.members.push(member);
    }
}

pub(crate) fn qualify(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{}::{}", scope, name)
    }
}
