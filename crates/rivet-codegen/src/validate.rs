//! Cross-cutting validation rules. Every failure here is fatal for the pass
//! that detects it.

use crate::params::Parameter;
use rivet_core::{CodegenError, Location};
use rivet_syntax::{ClassPath, FunctionDecl, MemberRef, PropertyDecl};
use std::collections::BTreeMap;

/// A provider-marked function must not be abstract. The one exemption is a
/// companion object nested in an interface: companion bodies are always
/// concrete.
pub fn check_provider_not_abstract(
    path: &ClassPath<'_>,
    member: &MemberRef<'_, FunctionDecl>,
) -> Result<(), CodegenError> {
    let fail = || {
        Err(CodegenError::AbstractProvider {
            location: member.decl.location.clone(),
        })
    };

    if member.decl.is_abstract {
        return fail();
    }
    if !path.class.is_interface() {
        return Ok(());
    }
    if member.in_companion {
        return Ok(());
    }
    fail()
}

/// Within one container, provider-marked members must have distinct simple
/// names. Reports every colliding member, not just the first pair.
pub fn check_duplicate_provider_names(
    path: &ClassPath<'_>,
    members: &[MemberRef<'_, FunctionDecl>],
) -> Result<(), CodegenError> {
    let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();
    for member in members {
        *by_name.entry(member.decl.name.as_str()).or_insert(0) += 1;
    }

    let container = path.qualified_name();
    let duplicates: Vec<String> = by_name
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| format!("{container}.{name}"))
        .collect();

    if duplicates.is_empty() {
        return Ok(());
    }

    Err(CodegenError::DuplicateDeclaration {
        message: format!(
            "Cannot have more than one binding method with the same name in a single module: {}",
            duplicates.join(", ")
        ),
        location: path.class.location.clone(),
    })
}

/// Assisted parameters must be distinct by resolved type plus identifier
/// label. Reports the first duplicate group found.
pub fn check_distinct_assisted_parameters(
    class_location: &Location,
    parameters: &[&Parameter],
) -> Result<(), CodegenError> {
    let mut groups: BTreeMap<(String, String), Vec<&Parameter>> = BTreeMap::new();
    for parameter in parameters {
        groups
            .entry(parameter.assisted_key())
            .or_default()
            .push(parameter);
    }

    let duplicate = groups.into_values().find(|group| group.len() > 1);
    let Some(group) = duplicate else {
        return Ok(());
    };

    // All parameters in the group are identical, so the first one is enough
    // to describe the error.
    let parameter = group[0];
    let mut description = String::from("@Assisted");
    if !parameter.assisted_identifier.is_empty() {
        description.push_str(&format!("(\"{}\")", parameter.assisted_identifier));
    }
    description.push(' ');
    description.push_str(&parameter.type_name.to_string());

    Err(CodegenError::DuplicateAssistedParameter {
        parameter: description,
        location: class_location.clone(),
    })
}

/// Member-injected properties must have distinct names within one class.
pub fn check_duplicate_inject_properties(
    path: &ClassPath<'_>,
    properties: &[&PropertyDecl],
) -> Result<(), CodegenError> {
    let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();
    for property in properties {
        *by_name.entry(property.name.as_str()).or_insert(0) += 1;
    }

    let container = path.qualified_name();
    let duplicates: Vec<String> = by_name
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| format!("{container}.{name}"))
        .collect();

    if duplicates.is_empty() {
        return Ok(());
    }

    Err(CodegenError::DuplicateDeclaration {
        message: format!(
            "Cannot inject more than one member with the same name in a single class: {}",
            duplicates.join(", ")
        ),
        location: path.class.location.clone(),
    })
}
