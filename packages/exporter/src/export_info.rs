//! Export Configuration
//!
//! Per-declaration settings supplied by the configuration collaborator. An
//! `ExportInfo` describes one class; `members` and `operators` index the
//! settings of its members by name or operator spelling.

use anyhow::Context;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::Deserialize;

static EMPTY_INFO: Lazy<ExportInfo> = Lazy::new(ExportInfo::default);

/// Return-value policy kinds understood by the binding framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnValueKind {
    ReferenceExistingObject,
    CopyConstReference,
    CopyNonConstReference,
    ManageNewObject,
    ReturnOpaquePointer,
    ReturnByValue,
}

impl ReturnValueKind {
    pub fn code(&self) -> &'static str {
        match self {
            ReturnValueKind::ReferenceExistingObject => "reference_existing_object",
            ReturnValueKind::CopyConstReference => "copy_const_reference",
            ReturnValueKind::CopyNonConstReference => "copy_non_const_reference",
            ReturnValueKind::ManageNewObject => "manage_new_object",
            ReturnValueKind::ReturnOpaquePointer => "return_opaque_pointer",
            ReturnValueKind::ReturnByValue => "return_by_value",
        }
    }
}

/// Calling-convention policy: how ownership and lifetime of a return value
/// or argument cross the language boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum Policy {
    ReturnInternalReference {
        #[serde(default = "default_owner_arg")]
        owner_arg: u32,
    },
    WithCustodianAndWard {
        custodian: u32,
        ward: u32,
    },
    ReturnValue {
        kind: ReturnValueKind,
    },
}

fn default_owner_arg() -> u32 {
    1
}

impl Policy {
    pub fn return_value(kind: ReturnValueKind) -> Self {
        Policy::ReturnValue { kind }
    }

    /// Spelling of the policy type, without namespace or trailing `()`.
    pub fn code(&self) -> String {
        match self {
            Policy::ReturnInternalReference { owner_arg } => {
                format!("return_internal_reference< {} >", owner_arg)
            }
            Policy::WithCustodianAndWard { custodian, ward } => {
                format!("with_custodian_and_ward< {}, {} >", custodian, ward)
            }
            Policy::ReturnValue { kind } => format!("return_value_policy< {} >", kind.code()),
        }
    }

    pub fn is_opaque_pointer(&self) -> bool {
        matches!(
            self,
            Policy::ReturnValue {
                kind: ReturnValueKind::ReturnOpaquePointer
            }
        )
    }
}

/// Alternate callable exposed instead of a member, with optional inline code
/// that defines it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct Wrapper {
    pub name: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

impl Wrapper {
    pub fn new(name: impl Into<String>) -> Self {
        Wrapper {
            name: name.into(),
            full_name: None,
            code: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn full_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.name)
    }
}

/// A free function exposed as a method of the class.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddedMethod {
    pub name: String,
    #[serde(default)]
    pub rename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ExportInfo {
    pub name: String,
    pub include: Option<String>,
    pub exclude: bool,
    pub rename: Option<String>,
    pub policy: Option<Policy>,
    pub wrapper: Option<Wrapper>,
    /// Smart pointer template, `%s` stands for the class name.
    pub smart_ptr: Option<String>,
    pub added: Vec<AddedMethod>,
    pub members: IndexMap<String, ExportInfo>,
    pub operators: IndexMap<String, ExportInfo>,
}

impl ExportInfo {
    pub fn new(name: impl Into<String>) -> Self {
        ExportInfo {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        serde_json::from_str(source).context("invalid export configuration")
    }

    /// Settings of a member, or an empty record when none were given.
    pub fn member(&self, name: &str) -> &ExportInfo {
        self.members.get(name).unwrap_or(&EMPTY_INFO)
    }

    /// Settings of an operator keyed by its spelling (converters by their
    /// result type).
    pub fn operator(&self, spelling: &str) -> &ExportInfo {
        self.operators.get(spelling).unwrap_or(&EMPTY_INFO)
    }

    pub fn member_mut(&mut self, name: &str) -> &mut ExportInfo {
        self.members.entry(name.to_string()).or_default()
    }

    pub fn operator_mut(&mut self, spelling: &str) -> &mut ExportInfo {
        self.operators.entry(spelling.to_string()).or_default()
    }

    pub fn excluded(mut self) -> Self {
        self.exclude = true;
        self
    }

    pub fn renamed(mut self, rename: impl Into<String>) -> Self {
        self.rename = Some(rename.into());
        self
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_wrapper(mut self, wrapper: Wrapper) -> Self {
        self.wrapper = Some(wrapper);
        self
    }
}

/// Namespace prefixes put in front of binding-framework identifiers. Both are
/// empty by default, matching generated code that opens the namespaces with
/// `using` directives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Prefix of the binding framework (`init`, `self`, `other`, policies).
    pub python_ns: String,
    /// Prefix of generated helpers such as overload structs.
    pub helper_ns: String,
}

impl ExportSettings {
    pub fn from_json(source: &str) -> anyhow::Result<Self> {
        serde_json::from_str(source).context("invalid export settings")
    }
}
