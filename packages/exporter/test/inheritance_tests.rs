//! Inheritance Tests
//!
//! Members of unexported bases are pulled into the derived export; the walk
//! stops at the first generation holding an exported base.

use binding_exporter::exporter::inherit_members;
use binding_exporter::{
    Callable, ClassDecl, ClassExporter, ClassSnapshot, ClassVariable, Declaration,
    DeclarationGraph, ExportContext, ExportInfo, Member, Section,
};
use indexmap::IndexSet;

fn method(owner: &str, name: &str) -> Member {
    Member::Method(Callable::new(owner, name).returning("int"))
}

/// Derived -> B1 -> B2 -> B3, one method per class.
fn chain() -> DeclarationGraph {
    DeclarationGraph::new()
        .with(Declaration::Class(ClassDecl::new("B3").member(method("B3", "three"))))
        .with(Declaration::Class(
            ClassDecl::new("B2").member(method("B2", "two")).bases(&["B3"]),
        ))
        .with(Declaration::Class(
            ClassDecl::new("B1")
                .member(method("B1", "one"))
                .bases(&["B2"])
                .bases(&["B3"]),
        ))
        .with(Declaration::Class(
            ClassDecl::new("Derived")
                .member(method("Derived", "own"))
                .bases(&["B1"])
                .bases(&["B2"])
                .bases(&["B3"]),
        ))
}

#[test]
fn stops_at_first_exported_generation() {
    let graph = chain();
    let mut ctx = ExportContext::default().with_exported(["B2"]);
    let result = ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(
        result.section(Section::Inside),
        [
            ".def(\"own\", &Derived::own)",
            ".def(\"one\", &B1::one)"
        ]
    );
}

#[test]
fn unexported_ancestry_is_flattened_completely() {
    let graph = chain();
    let mut ctx = ExportContext::default();
    let result = ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(
        result.section(Section::Inside),
        [
            ".def(\"own\", &Derived::own)",
            ".def(\"one\", &B1::one)",
            ".def(\"two\", &B2::two)",
            ".def(\"three\", &B3::three)"
        ]
    );
}

#[test]
fn exported_direct_base_inherits_nothing() {
    let graph = chain();
    let mut ctx = ExportContext::default().with_exported(["B1"]);
    let result = ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(
        result.section(Section::Inside),
        [".def(\"own\", &Derived::own)"]
    );
}

#[test]
fn exporting_in_order_suppresses_duplicate_exposure() {
    let graph = chain();
    let mut ctx = ExportContext::default();
    for name in ["B2", "Derived"] {
        ClassExporter::new(ExportInfo::new(name), &graph)
            .unwrap()
            .export(&mut ctx)
            .unwrap();
    }
    assert_eq!(
        ctx.exported_names.iter().collect::<Vec<_>>(),
        vec!["B2", "Derived"]
    );

    let again = ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();
    assert_eq!(again.section(Section::Inside).len(), 2);
}

#[test]
fn flattening_never_duplicates_members() {
    let base = ClassDecl::new("Base")
        .member(method("Base", "f"))
        .member(Member::Variable(ClassVariable::new("Base", "v", "int")));
    let middle = ClassDecl::new("Middle")
        .member(method("Middle", "f"))
        .member(Member::Variable(ClassVariable::new("Middle", "v", "int")))
        .bases(&["Base"]);
    let derived = ClassDecl::new("Derived").bases(&["Middle"]).bases(&["Base"]);
    let graph = DeclarationGraph::new()
        .with(Declaration::Class(base))
        .with(Declaration::Class(middle))
        .with(Declaration::Class(derived.clone()));

    let mut snapshot = ClassSnapshot::of(&derived);
    inherit_members(&mut snapshot, &graph, &IndexSet::new()).unwrap();

    let names: Vec<_> = snapshot.members().iter().map(Member::full_name).collect();
    assert_eq!(names, vec!["Middle::f", "Middle::v"]);
}

#[test]
fn shared_graph_is_left_untouched() {
    let graph = chain();
    let before = graph.clone();
    ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ExportContext::default())
        .unwrap();
    assert_eq!(graph, before);
    assert_eq!(graph.class("Derived").unwrap().members.len(), 1);
}

#[test]
fn hidden_base_overloads_keep_the_base_address() {
    let base = ClassDecl::new("Base").member(Member::Method(
        Callable::new("Base", "f").param("double").overloaded(),
    ));
    let derived = ClassDecl::new("Derived")
        .member(Member::Method(
            Callable::new("Derived", "f").param("int").overloaded(),
        ))
        .bases(&["Base"]);
    let graph = DeclarationGraph::new()
        .with(Declaration::Class(base))
        .with(Declaration::Class(derived));

    let result = ClassExporter::new(ExportInfo::new("Derived"), &graph)
        .unwrap()
        .export(&mut ExportContext::default())
        .unwrap();

    assert_eq!(
        result.section(Section::Inside),
        [
            ".def(\"f\", (void (Derived::*)(int))&Derived::f)",
            ".def(\"f\", (void (Base::*)(double))&Base::f)"
        ]
    );
}
