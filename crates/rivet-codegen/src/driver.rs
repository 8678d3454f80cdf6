//! The re-entrant scheduler.
//!
//! One pass runs every registered generator against the current forest
//! snapshot. Anything generated is materialized to the output directory,
//! lowered back into the forest, and made visible to the next pass through a
//! fresh oracle snapshot. The loop stops at the first pass producing nothing.

use crate::generators::{
    AssistedInjectGenerator, ComponentDetectorCheck, ContributesAndroidInjectorGenerator,
    GeneratedFile, Generator, InjectConstructorFactoryGenerator, MembersInjectorGenerator,
    PassInput, ProvidesMethodFactoryGenerator,
};
use rivet_core::CodegenError;
use rivet_resolve::{LayeredOracle, SymbolOracle};
use rivet_syntax::Forest;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info};

/// Configuration of the generation subsystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodegenConfig {
    /// When false the subsystem performs zero scanning and emission.
    #[serde(default)]
    pub enabled: bool,

    /// Root directory for materialized generated source files.
    pub output_dir: PathBuf,

    /// The compilation module name, used to mangle factory names for
    /// internal members.
    #[serde(default = "CodegenConfig::default_module_name")]
    pub module_name: String,
}

impl CodegenConfig {
    fn default_module_name() -> String {
        "main".to_string()
    }

    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            enabled: true,
            output_dir: output_dir.into(),
            module_name: Self::default_module_name(),
        }
    }
}

#[derive(Error, Debug)]
pub enum DriverError {
    #[error(transparent)]
    Codegen(#[from] CodegenError),
    #[error("failed to write generated file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Runs all registered generators to fixpoint over a growing forest.
pub struct CodegenDriver {
    config: CodegenConfig,
    generators: Vec<Box<dyn Generator>>,
}

impl CodegenDriver {
    #[must_use]
    pub fn new(config: CodegenConfig) -> Self {
        Self {
            config,
            generators: vec![
                Box::new(ProvidesMethodFactoryGenerator),
                Box::new(InjectConstructorFactoryGenerator),
                Box::new(MembersInjectorGenerator),
                Box::new(ComponentDetectorCheck),
                Box::new(ContributesAndroidInjectorGenerator),
            ],
        }
    }

    /// Runs generation passes until no generator produces new output.
    ///
    /// Generated declarations are appended to `forest`, so re-running over
    /// the result produces nothing further. Returns every file generated
    /// across all passes, in generation order.
    pub fn run(
        &self,
        forest: &mut Forest,
        oracle: &dyn SymbolOracle,
    ) -> Result<Vec<GeneratedFile>, DriverError> {
        if !self.config.enabled {
            debug!("code generation disabled, skipping");
            return Ok(Vec::new());
        }

        let mut all_files: Vec<GeneratedFile> = Vec::new();
        let mut seen: HashMap<(String, String), &'static str> = HashMap::new();
        let mut pass_number = 0u32;

        loop {
            pass_number += 1;

            // Fresh snapshot per pass: the external oracle plus everything
            // currently visible in the forest, generated declarations
            // included.
            let snapshot = LayeredOracle::for_forest(forest, oracle);
            let input = PassInput {
                forest: &*forest,
                oracle: &snapshot,
                module_name: &self.config.module_name,
            };

            let mut pass_files: Vec<GeneratedFile> = Vec::new();
            for generator in &self.generators {
                let files = generator.generate(&input)?;
                if !files.is_empty() {
                    debug!(
                        generator = generator.id(),
                        count = files.len(),
                        pass = pass_number,
                        "generator produced output"
                    );
                }
                pass_files.extend(files);
            }

            if pass_files.is_empty() {
                info!(passes = pass_number, files = all_files.len(), "fixpoint reached");
                return Ok(all_files);
            }

            // The (package, name) pair must be unique across the whole run;
            // collisions mean two distinct triggers hash to the same name.
            for file in &pass_files {
                let key = (file.package.to_dotted(), file.name.clone());
                if let Some(previous) = seen.insert(key, file.generator) {
                    return Err(CodegenError::DuplicateDeclaration {
                        message: format!(
                            "two generated declarations collide on {}.{} (emitted by {} and {})",
                            file.package, file.name, previous, file.generator
                        ),
                        location: file.trigger.clone(),
                    }
                    .into());
                }
            }

            for file in &pass_files {
                self.materialize(file)?;
            }

            for file in pass_files {
                forest.push(file.lowered.clone());
                all_files.push(file);
            }
        }
    }

    fn materialize(&self, file: &GeneratedFile) -> Result<(), DriverError> {
        let path = self.config.output_dir.join(file.relative_path());
        if let Some(parent) = path.parent() {
            // Create-if-absent; the directory may exist from a previous pass.
            std::fs::create_dir_all(parent).map_err(|source| DriverError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        std::fs::write(&path, &file.content).map_err(|source| DriverError::Write {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), generator = file.generator, "materialized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_deserializes_with_field_defaults() {
        let config: CodegenConfig =
            serde_json::from_str(r#"{"output_dir": "build/generated/source"}"#)
                .expect("minimal config parses");
        assert!(!config.enabled);
        assert_eq!(config.module_name, "main");
        assert_eq!(config.output_dir, PathBuf::from("build/generated/source"));
    }

    #[test]
    fn config_roundtrips_through_json() {
        let config = CodegenConfig {
            enabled: true,
            output_dir: PathBuf::from("out"),
            module_name: "app_debug".to_string(),
        };
        let json = serde_json::to_string(&config).expect("serializes");
        let back: CodegenConfig = serde_json::from_str(&json).expect("parses");
        assert_eq!(config, back);
    }
}
