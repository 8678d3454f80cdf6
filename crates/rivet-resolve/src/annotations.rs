//! Annotation lookup against raw syntactic usages.
//!
//! A usage's token can be fully qualified, explicitly imported, or covered by
//! a wildcard import; resolution tries those styles in order and never fails.
//! Results are recomputed on every call because the oracle's answers change
//! between passes as generated declarations become visible.

use crate::markers;
use crate::ImportMap;
use rivet_core::CodegenError;
use rivet_syntax::{AnnotationUsage, AnnotationValue, SourceFile, TypeRef};

/// Whether `annotations` contains a usage of the annotation named `fq_name`.
#[must_use]
pub fn has_annotation(annotations: &[AnnotationUsage], file: &SourceFile, fq_name: &str) -> bool {
    find_annotation(annotations, file, fq_name).is_some()
}

/// Finds the usage of `fq_name` among `annotations`, or `None`.
///
/// Ambiguity is answered with `None`; asking for an annotation is never an
/// error.
#[must_use]
pub fn find_annotation<'a>(
    annotations: &'a [AnnotationUsage],
    file: &SourceFile,
    fq_name: &str,
) -> Option<&'a AnnotationUsage> {
    if annotations.is_empty() {
        return None;
    }

    let simple_name = fq_name.rsplit('.').next().unwrap_or(fq_name);

    // Intrinsic markers are usually written unqualified and unimported, so
    // ordinary import-based resolution does not apply. Match the raw token by
    // prefix against both spellings.
    if markers::INTRINSIC.contains(&fq_name) {
        return annotations
            .iter()
            .find(|usage| usage.token == simple_name || usage.token == fq_name);
    }

    // The fully qualified spelling, e.g. `@dagger.Module`.
    if let Some(usage) = annotations.iter().find(|usage| usage.token == fq_name) {
        return Some(usage);
    }

    // The simple spelling, e.g. `@Module`, requires a matching import.
    let usage = annotations
        .iter()
        .find(|usage| usage.token == simple_name)?;

    let imports = ImportMap::from_file(file);

    if imports.has_single(fq_name) {
        return Some(usage);
    }

    // Wildcard imports: accept when some star prefix plus the simple name
    // spells the target.
    let star_matches = imports.stars().iter().any(|star| {
        let candidate = if star.is_root() {
            simple_name.to_string()
        } else {
            format!("{}.{}", star.to_dotted(), simple_name)
        };
        candidate == fq_name
    });
    if star_matches {
        return Some(usage);
    }

    None
}

/// The string value of an argument, positional or named as `key`.
#[must_use]
pub fn string_argument<'a>(usage: &'a AnnotationUsage, key: &str) -> Option<&'a str> {
    let value = usage.argument(key).or_else(|| usage.single_positional())?;
    match value {
        AnnotationValue::Str(text) => Some(text),
        _ => None,
    }
}

/// The boolean value of an argument, positional or named as `key`.
#[must_use]
pub fn bool_argument(usage: &AnnotationUsage, key: &str) -> Option<bool> {
    let value = usage.argument(key).or_else(|| usage.single_positional())?;
    match value {
        AnnotationValue::Bool(value) => Some(*value),
        _ => None,
    }
}

/// The class references of an `key = [A::class, B::class]` argument (a single
/// class literal is accepted as a one-element list). `None` when the argument
/// is absent.
pub fn class_array_argument<'a>(
    usage: &'a AnnotationUsage,
    key: &str,
) -> Result<Option<Vec<&'a TypeRef>>, CodegenError> {
    let value = match usage.argument(key).or_else(|| usage.single_positional()) {
        Some(value) => value,
        None => return Ok(None),
    };
    class_refs(usage, key, value).map(Some)
}

/// Like [`class_array_argument`], but the argument is required by the
/// caller's contract.
pub fn require_class_array_argument<'a>(
    usage: &'a AnnotationUsage,
    key: &str,
) -> Result<Vec<&'a TypeRef>, CodegenError> {
    class_array_argument(usage, key)?.ok_or_else(|| CodegenError::MalformedAnnotationUsage {
        message: format!("couldn't find `{key}` for @{}", usage.short_name()),
        location: usage.location.clone(),
    })
}

fn class_refs<'a>(
    usage: &'a AnnotationUsage,
    key: &str,
    value: &'a AnnotationValue,
) -> Result<Vec<&'a TypeRef>, CodegenError> {
    match value {
        AnnotationValue::ClassLiteral(ty) => Ok(vec![ty]),
        AnnotationValue::Array(values) => values
            .iter()
            .map(|entry| match entry {
                AnnotationValue::ClassLiteral(ty) => Ok(ty),
                _ => Err(malformed_class_argument(usage, key)),
            })
            .collect(),
        _ => Err(malformed_class_argument(usage, key)),
    }
}

fn malformed_class_argument(usage: &AnnotationUsage, key: &str) -> CodegenError {
    CodegenError::MalformedAnnotationUsage {
        message: format!(
            "`{key}` of @{} must be a class reference or an array of class references",
            usage.short_name()
        ),
        location: usage.location.clone(),
    }
}
