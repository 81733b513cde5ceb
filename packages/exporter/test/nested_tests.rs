//! Nested Export Tests
//!
//! Nested classes and enumerations are exported as children sharing the
//! parent's context.

use binding_exporter::{
    Callable, ClassDecl, ClassExporter, Declaration, DeclarationGraph, EnumDecl, ExportContext,
    ExportError, ExportInfo, Member, NestedRef, Section,
};

const WINDOW: &str = "ui::Window";

fn window_graph() -> DeclarationGraph {
    let window = ClassDecl::new(WINDOW)
        .member(Member::Method(Callable::new(WINDOW, "show")))
        .member(Member::NestedClass(NestedRef::new(WINDOW, "Frame")))
        .member(Member::NestedClass(NestedRef::new(WINDOW, "Button")))
        .member(Member::Enumeration(NestedRef::new(WINDOW, "State")));
    let frame = ClassDecl::new("ui::Window::Frame")
        .member(Member::Method(Callable::new("ui::Window::Frame", "resize")));
    let button = ClassDecl::new("ui::Window::Button")
        .member(Member::Method(Callable::new("ui::Window::Button", "click")))
        .bases(&["ui::Window::Frame"]);

    DeclarationGraph::new()
        .with(Declaration::Class(window))
        .with(Declaration::Class(frame))
        .with(Declaration::Class(button))
        .with(Declaration::Enumeration(EnumDecl::new(
            "ui::Window::State",
            &["Open", "Closed"],
        )))
}

#[test]
fn children_follow_parent_in_every_section() {
    let graph = window_graph();
    let mut info = ExportInfo::new(WINDOW);
    info.include = Some("ui/window.h".to_string());
    *info.member_mut("Frame") = ExportInfo::default().renamed("PyFrame");

    let mut ctx = ExportContext::default();
    let result = ClassExporter::new(info, &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(result.section(Section::Inside), [".def(\"show\", &ui::Window::show)"]);
    assert_eq!(result.children.len(), 3);

    let merged = result.merged();
    assert_eq!(
        merged.get(Section::Template),
        [
            "ui::Window",
            "ui::Window::Frame",
            "ui::Window::Button",
            "ui::Window::State"
        ]
    );
    assert_eq!(
        merged.get(Section::Constructor),
        ["\"Window\"", "\"PyFrame\"", "\"Button\"", "\"State\""]
    );
    assert_eq!(
        merged.get(Section::Inside),
        [
            ".def(\"show\", &ui::Window::show)",
            ".def(\"resize\", &ui::Window::Frame::resize)",
            ".def(\"click\", &ui::Window::Button::click)",
            ".value(\"Open\", ui::Window::Open)",
            ".value(\"Closed\", ui::Window::Closed)"
        ]
    );
    assert_eq!(merged.get(Section::Include), ["#include <ui/window.h>"]);
}

#[test]
fn exported_names_are_recorded_depth_first() {
    let graph = window_graph();
    let mut ctx = ExportContext::default();
    ClassExporter::new(ExportInfo::new(WINDOW), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(
        ctx.exported_names.iter().collect::<Vec<_>>(),
        vec![
            "ui::Window::Frame",
            "ui::Window::Button",
            "ui::Window::State",
            "ui::Window"
        ]
    );
}

#[test]
fn sibling_export_suppresses_inherited_members() {
    let graph = window_graph();
    let mut info = ExportInfo::new(WINDOW);
    *info.member_mut("Frame") = ExportInfo::default().excluded();

    let result = ClassExporter::new(info, &graph)
        .unwrap()
        .export(&mut ExportContext::default())
        .unwrap();

    // Frame is excluded, so Button takes over its members.
    let merged = result.merged();
    assert_eq!(
        &merged.get(Section::Inside)[..3],
        [
            ".def(\"show\", &ui::Window::show)",
            ".def(\"click\", &ui::Window::Button::click)",
            ".def(\"resize\", &ui::Window::Frame::resize)"
        ]
    );
}

#[test]
fn nested_failure_aborts_the_enclosing_class() {
    let outer = ClassDecl::new("Outer")
        .member(Member::NestedClass(NestedRef::new("Outer", "Ghost")));
    let graph = window_graph().with(Declaration::Class(outer));
    let mut ctx = ExportContext::default();
    ClassExporter::new(ExportInfo::new(WINDOW), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    let err = ClassExporter::new(ExportInfo::new("Outer"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap_err();

    assert_eq!(
        err,
        ExportError::UnknownDeclaration {
            name: "Outer::Ghost".to_string()
        }
    );
    assert!(!ctx.is_exported("Outer"));
    assert!(ctx.is_exported(WINDOW));
}

#[test]
fn nested_class_deriving_from_its_outer_class_is_exported_once() {
    let outer = ClassDecl::new("A")
        .member(Member::Method(Callable::new("A", "f")))
        .member(Member::NestedClass(NestedRef::new("A", "B")));
    let inner = ClassDecl::new("A::B").bases(&["A"]);
    let graph = DeclarationGraph::new()
        .with(Declaration::Class(outer))
        .with(Declaration::Class(inner));

    let mut ctx = ExportContext::default();
    let result = ClassExporter::new(ExportInfo::new("A"), &graph)
        .unwrap()
        .export(&mut ctx)
        .unwrap();

    assert_eq!(result.children.len(), 1);
    assert!(result.children[0].children.is_empty());
    assert_eq!(
        result.children[0].section(Section::Inside),
        [".def(\"f\", &A::f)"]
    );
    assert_eq!(
        ctx.exported_names.iter().collect::<Vec<_>>(),
        vec!["A::B", "A"]
    );
    assert!(!ctx.is_in_progress("A"));
    assert!(!ctx.is_in_progress("A::B"));
}
