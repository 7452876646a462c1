//! Program manifests: a YAML or JSON description of compilation units, their
//! functions and how resolving each function behaves.
//!
//! ```yaml
//! units:
//!   - name: app
//!     root: true
//!     functions:
//!       - name: outer
//!         statements: 3
//!       - name: inner
//!         nested_in: outer
//!         inline: always
//!         body:
//!           - kind: return
//!             value: "42"
//!         resolution:
//!           diagnostics: ["forward reference to `T`"]
//!           deferred: ["std.math::abs"]
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ast::{DeclKind, FuncDeclaration, FunctionBody, InlineIntent, ResolutionStage, Statement};
use crate::compilation_unit::{CompilationUnit, DeclId, Program, UnitId};
use crate::error::CoreError;
use crate::frontend::{ResolutionOutcome, ResolutionScript, ScriptedResolver};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramManifest {
    #[serde(default)]
    pub units: Vec<UnitManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitManifest {
    pub name: String,
    /// Unit is being emitted by this compilation
    #[serde(default)]
    pub root: bool,
    #[serde(default)]
    pub functions: Vec<FunctionManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionManifest {
    pub name: String,
    #[serde(default)]
    pub inline: InlineIntent,
    #[serde(default)]
    pub kind: DeclKind,
    #[serde(default)]
    pub instantiated: bool,
    #[serde(default)]
    pub weak: bool,
    #[serde(default)]
    pub stage: ResolutionStage,
    /// Enclosing function in the same unit; must be listed earlier
    #[serde(default)]
    pub nested_in: Option<String>,
    /// Shorthand for a flat body of this many statements
    #[serde(default)]
    pub statements: Option<usize>,
    #[serde(default)]
    pub body: Option<Vec<Statement>>,
    #[serde(default)]
    pub resolution: ResolutionSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolutionSpec {
    #[serde(default)]
    pub fails: bool,
    #[serde(default)]
    pub diagnostics: Vec<String>,
    /// `unit::function` paths, or bare names within the same unit
    #[serde(default)]
    pub deferred: Vec<String>,
}

/// A program built from a manifest, with the resolver scripted to match
#[derive(Debug, Clone)]
pub struct LoadedProgram {
    pub program: Program,
    pub resolver: ScriptedResolver,
}

impl ProgramManifest {
    pub fn from_yaml_str(content: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self, CoreError> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load a manifest, picking the format from the file extension
    /// (`.json` is JSON, anything else is YAML).
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    pub fn build(&self) -> Result<LoadedProgram, CoreError> {
        let mut program = Program::new();
        let mut unit_ids = Vec::with_capacity(self.units.len());
        let mut seen_units = HashSet::new();

        for unit in &self.units {
            if !seen_units.insert(unit.name.as_str()) {
                return Err(CoreError::InvalidManifest(format!(
                    "unit '{}' is declared twice",
                    unit.name
                )));
            }
            let mut cu = CompilationUnit::new(unit.name.clone());
            cu.is_root = unit.root;
            unit_ids.push(program.add_unit(cu));
        }

        let mut decl_ids: Vec<Vec<DeclId>> = Vec::with_capacity(self.units.len());
        for (unit, &unit_id) in self.units.iter().zip(&unit_ids) {
            let mut ids = Vec::with_capacity(unit.functions.len());
            for function in &unit.functions {
                if program.find_in_unit(unit_id, &function.name).is_some() {
                    return Err(CoreError::InvalidManifest(format!(
                        "function '{}::{}' is declared twice",
                        unit.name, function.name
                    )));
                }
                let decl = function.to_declaration(&program, unit_id, &unit.name)?;
                ids.push(program.add_declaration(decl));
            }
            decl_ids.push(ids);
        }

        let mut resolver = ScriptedResolver::new();
        for ((unit, &unit_id), ids) in self.units.iter().zip(&unit_ids).zip(&decl_ids) {
            for (function, &id) in unit.functions.iter().zip(ids) {
                let script = function.resolution.to_script(&program, unit_id)?;
                if script != ResolutionScript::default() {
                    resolver.script(id, script);
                }
            }
        }

        Ok(LoadedProgram { program, resolver })
    }
}

impl FunctionManifest {
    fn to_declaration(
        &self,
        program: &Program,
        unit: UnitId,
        unit_name: &str,
    ) -> Result<FuncDeclaration, CoreError> {
        let mut decl = FuncDeclaration::new(self.name.clone(), unit)
            .with_inlining(self.inline)
            .with_kind(self.kind)
            .with_stage(self.stage);
        decl.instantiated = self.instantiated;
        decl.weak = self.weak;

        decl.body = match (self.statements, &self.body) {
            (Some(_), Some(_)) => {
                return Err(CoreError::InvalidManifest(format!(
                    "function '{}::{}' has both `statements` and `body`",
                    unit_name, self.name
                )))
            }
            (Some(count), None) => Some(FunctionBody::with_statement_count(count)),
            (None, Some(statements)) => Some(FunctionBody::new(statements.clone())),
            (None, None) => None,
        };
        if decl.body.is_none() && self.stage >= ResolutionStage::BodyResolved {
            return Err(CoreError::InvalidManifest(format!(
                "function '{}::{}' is at stage {:?} but has no body",
                unit_name, self.name, self.stage
            )));
        }

        if let Some(parent) = &self.nested_in {
            let parent_id = program.find_in_unit(unit, parent).ok_or_else(|| {
                CoreError::InvalidManifest(format!(
                    "function '{}::{}' is nested in '{}', which must be listed before it",
                    unit_name, self.name, parent
                ))
            })?;
            decl.nesting_parent = Some(parent_id);
        }

        Ok(decl)
    }
}

impl ResolutionSpec {
    fn to_script(&self, program: &Program, unit: UnitId) -> Result<ResolutionScript, CoreError> {
        let outcome = match (self.fails, self.diagnostics.is_empty()) {
            (true, false) => {
                return Err(CoreError::InvalidManifest(
                    "a resolution cannot both fail and report diagnostics".to_string(),
                ))
            }
            (true, true) => ResolutionOutcome::Fails,
            (false, false) => ResolutionOutcome::Diagnoses(self.diagnostics.clone()),
            (false, true) => ResolutionOutcome::Succeeds,
        };

        let deferred = self
            .deferred
            .iter()
            .map(|path| {
                if path.contains("::") {
                    program.lookup(path)
                } else {
                    program
                        .find_in_unit(unit, path)
                        .ok_or_else(|| CoreError::UnknownDeclaration(path.clone()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ResolutionScript { outcome, deferred })
    }
}
