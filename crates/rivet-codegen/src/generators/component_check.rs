//! Rejects forests that declare Dagger components: component generation
//! requires the real annotation processor, and running both side by side
//! is a configuration error.

use super::{GeneratedFile, Generator, PassInput};
use rivet_core::CodegenError;
use rivet_resolve::{has_annotation, markers};

pub struct ComponentDetectorCheck;

impl Generator for ComponentDetectorCheck {
    fn id(&self) -> &'static str {
        "component-detector-check"
    }

    fn generate(&self, input: &PassInput<'_>) -> Result<Vec<GeneratedFile>, CodegenError> {
        let component = input
            .forest
            .classes_and_inner_classes()
            .find(|path| {
                has_annotation(&path.class.annotations, path.file, markers::DAGGER_COMPONENT)
            });

        if let Some(component) = component {
            return Err(CodegenError::IncompatibleTrigger {
                message: "rivet cannot generate the code for Dagger components or subcomponents. \
                          In these cases the Dagger annotation processor is required. Enabling \
                          the Dagger annotation processor and turning on rivet to generate \
                          Dagger factories is redundant."
                    .to_string(),
                location: component.class.location.clone(),
            });
        }

        Ok(Vec::new())
    }
}
