//! Member Classifier
//!
//! Partitions the effective public member list by kind. Each member lands in
//! exactly one bucket; destructors are never exposed.

use crate::declarations::{Callable, ClassVariable, Member, NestedRef};

#[derive(Debug, Default)]
pub struct ClassifiedMembers<'a> {
    pub constructors: Vec<&'a Callable>,
    pub variables: Vec<&'a ClassVariable>,
    pub methods: Vec<&'a Callable>,
    /// Member operators, kept as `Member` so that free operators can join
    /// them in one list.
    pub operators: Vec<&'a Member>,
    pub converters: Vec<&'a Callable>,
    pub nested_classes: Vec<&'a NestedRef>,
    pub enumerations: Vec<&'a NestedRef>,
}

pub fn classify(members: &[Member]) -> ClassifiedMembers<'_> {
    let mut classified = ClassifiedMembers::default();
    for member in members.iter().filter(|m| m.is_public()) {
        match member {
            Member::Constructor(c) => classified.constructors.push(c),
            Member::Method(m) => classified.methods.push(m),
            Member::Variable(v) => classified.variables.push(v),
            Member::Operator(_) => classified.operators.push(member),
            Member::Converter(c) => classified.converters.push(c),
            Member::NestedClass(n) => classified.nested_classes.push(n),
            Member::Enumeration(e) => classified.enumerations.push(e),
            Member::Destructor(_) | Member::FreeOperator(_) => {}
        }
    }
    classified
}
