//! Section Buffers
//!
//! Named, append-only buffers of generated code. Resolvers add statements in
//! the order they run; nothing is reordered afterwards. The assembly
//! collaborator turns the buffers into the final binding source.

use std::fmt;

use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    /// Template arguments of the class statement.
    Template,
    /// Arguments of the class statement: exposed name, primary initializer.
    Constructor,
    /// Statements chained inside the class statement.
    Inside,
    /// Statements in the class scope, after the class statement.
    Scope,
    /// Declarations placed before the module registration.
    Declaration,
    /// Declarations placed outside every namespace.
    DeclarationOutside,
    Include,
}

impl Section {
    pub const ALL: [Section; 7] = [
        Section::Template,
        Section::Constructor,
        Section::Inside,
        Section::Scope,
        Section::Declaration,
        Section::DeclarationOutside,
        Section::Include,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Section::Template => "template",
            Section::Constructor => "constructor",
            Section::Inside => "inside",
            Section::Scope => "scope",
            Section::Declaration => "declaration",
            Section::DeclarationOutside => "declaration-outside",
            Section::Include => "include",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBuffer {
    sections: IndexMap<Section, Vec<String>>,
    emitted: IndexSet<(Section, String)>,
}

impl Default for SectionBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionBuffer {
    pub fn new() -> Self {
        SectionBuffer {
            sections: Section::ALL.iter().map(|&s| (s, Vec::new())).collect(),
            emitted: IndexSet::new(),
        }
    }

    pub fn add(&mut self, section: Section, item: impl Into<String>) {
        let item = item.into();
        self.emitted.insert((section, item.clone()));
        self.sections.entry(section).or_default().push(item);
    }

    /// Adds `item` unless this buffer already holds it in `section`. Returns
    /// whether it was added.
    pub fn add_once(&mut self, section: Section, item: impl Into<String>) -> bool {
        let item = item.into();
        if self.emitted.contains(&(section, item.clone())) {
            return false;
        }
        self.add(section, item);
        true
    }

    pub fn get(&self, section: Section) -> &[String] {
        self.sections
            .get(&section)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(Vec::is_empty)
    }

    /// Appends every section of `other` after this buffer's own content.
    /// Include lines already present are not repeated.
    pub fn extend_from(&mut self, other: &SectionBuffer) {
        for (&section, items) in &other.sections {
            for item in items {
                if section == Section::Include {
                    self.add_once(section, item.clone());
                } else {
                    self.add(section, item.clone());
                }
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &[String])> {
        self.sections.iter().map(|(&s, items)| (s, items.as_slice()))
    }
}

/// Output of one export pass: the class's own sections and one child result
/// per exported nested declaration, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportResult {
    pub name: String,
    pub sections: SectionBuffer,
    pub children: Vec<ExportResult>,
}

impl ExportResult {
    pub fn new(name: impl Into<String>) -> Self {
        ExportResult {
            name: name.into(),
            sections: SectionBuffer::new(),
            children: Vec::new(),
        }
    }

    /// All sections of this result with every descendant's content appended
    /// after its parent's, depth first.
    pub fn merged(&self) -> SectionBuffer {
        let mut merged = self.sections.clone();
        for child in &self.children {
            merged.extend_from(&child.merged());
        }
        merged
    }

    pub fn section(&self, section: Section) -> &[String] {
        self.sections.get(section)
    }
}
