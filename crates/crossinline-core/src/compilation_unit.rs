use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::ast::FuncDeclaration;
use crate::error::CoreError;

/// Handle to a [`CompilationUnit`] inside a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct UnitId(u32);

impl UnitId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a [`FuncDeclaration`] inside a [`Program`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeclId(u32);

impl DeclId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A top-level translation boundary (a D module)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    /// Module name, e.g. "std.algorithm" or "object"
    pub name: String,
    /// Whether this unit is one of the root units being emitted in the
    /// current compilation, as opposed to an imported one
    pub is_root: bool,
    declarations: Vec<DeclId>,
}

impl CompilationUnit {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root: false,
            declarations: Vec::new(),
        }
    }

    pub fn root(mut self) -> Self {
        self.is_root = true;
        self
    }

    /// Declarations owned by this unit, in insertion order
    pub fn declarations(&self) -> &[DeclId] {
        &self.declarations
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

/// Arena holding every unit and declaration the frontend produced.
///
/// Declarations are never removed or reparented once added.
#[derive(Debug, Clone, Default)]
pub struct Program {
    units: Vec<CompilationUnit>,
    declarations: Vec<FuncDeclaration>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_unit(&mut self, unit: CompilationUnit) -> UnitId {
        let id = UnitId(self.units.len() as u32);
        self.units.push(unit);
        id
    }

    /// Add a declaration to the unit it names.
    ///
    /// Panics if the unit or the nesting parent does not belong to this program.
    pub fn add_declaration(&mut self, decl: FuncDeclaration) -> DeclId {
        assert!(
            decl.unit.index() < self.units.len(),
            "declaration '{}' refers to a unit outside this program",
            decl.name
        );
        if let Some(parent) = decl.nesting_parent {
            assert!(
                parent.index() < self.declarations.len(),
                "declaration '{}' is nested in a function that was not added first",
                decl.name
            );
        }

        let id = DeclId(self.declarations.len() as u32);
        self.units[decl.unit.index()].declarations.push(id);
        self.declarations.push(decl);
        id
    }

    pub fn unit(&self, id: UnitId) -> &CompilationUnit {
        &self.units[id.index()]
    }

    /// Unit owning the given declaration
    pub fn unit_of(&self, decl: DeclId) -> &CompilationUnit {
        self.unit(self[decl].unit)
    }

    pub fn units(&self) -> impl Iterator<Item = (UnitId, &CompilationUnit)> {
        self.units
            .iter()
            .enumerate()
            .map(|(i, unit)| (UnitId(i as u32), unit))
    }

    pub fn declarations(&self) -> impl Iterator<Item = (DeclId, &FuncDeclaration)> {
        self.declarations
            .iter()
            .enumerate()
            .map(|(i, decl)| (DeclId(i as u32), decl))
    }

    pub fn declaration_count(&self) -> usize {
        self.declarations.len()
    }

    pub fn find_unit(&self, name: &str) -> Option<UnitId> {
        self.units().find(|(_, unit)| unit.is_named(name)).map(|(id, _)| id)
    }

    /// Look up a declaration by name within one unit
    pub fn find_in_unit(&self, unit: UnitId, name: &str) -> Option<DeclId> {
        self.unit(unit)
            .declarations
            .iter()
            .copied()
            .find(|&id| self[id].name == name)
    }

    /// Resolve a `unit::function` path
    pub fn lookup(&self, path: &str) -> Result<DeclId, CoreError> {
        let (unit_name, decl_name) = path
            .rsplit_once("::")
            .ok_or_else(|| CoreError::UnknownDeclaration(path.to_string()))?;
        let unit = self
            .find_unit(unit_name)
            .ok_or_else(|| CoreError::UnknownUnit(unit_name.to_string()))?;
        self.find_in_unit(unit, decl_name)
            .ok_or_else(|| CoreError::UnknownDeclaration(path.to_string()))
    }

    /// `unit::function` path of a declaration, for logs and reports
    pub fn qualified_name(&self, decl: DeclId) -> String {
        format!("{}::{}", self.unit_of(decl).name, self[decl].name)
    }
}

impl Index<DeclId> for Program {
    type Output = FuncDeclaration;

    fn index(&self, id: DeclId) -> &FuncDeclaration {
        &self.declarations[id.index()]
    }
}

impl IndexMut<DeclId> for Program {
    fn index_mut(&mut self, id: DeclId) -> &mut FuncDeclaration {
        &mut self.declarations[id.index()]
    }
}
