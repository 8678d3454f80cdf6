use std::fmt;

/// A single identifier segment (`File`, `inject`, `kotlin`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(String);

impl Name {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase the first character, as generated member names do
    /// (`provideService` -> `ProvideService`).
    #[must_use]
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name(value.to_string())
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A dotted package name (`java.io`). The root package is the empty segment
/// list and prints as an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackageName(Vec<Name>);

impl PackageName {
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        PackageName(split_dotted(dotted))
    }

    #[must_use]
    pub fn segments(&self) -> &[Name] {
        &self.0
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn to_dotted(&self) -> String {
        join_dotted(&self.0)
    }

    /// The qualified name of `name` declared directly in this package.
    #[must_use]
    pub fn member(&self, name: &Name) -> QualifiedName {
        let mut segments = self.0.clone();
        segments.push(name.clone());
        QualifiedName(segments)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

/// A fully qualified dotted name (`java.io.File`, `a.b.Outer.Inner`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QualifiedName(Vec<Name>);

impl QualifiedName {
    #[must_use]
    pub fn from_dotted(dotted: &str) -> Self {
        QualifiedName(split_dotted(dotted))
    }

    #[must_use]
    pub fn from_segments(segments: Vec<Name>) -> Self {
        QualifiedName(segments)
    }

    #[must_use]
    pub fn segments(&self) -> &[Name] {
        &self.0
    }

    /// The last segment, i.e. the simple name.
    #[must_use]
    pub fn short_name(&self) -> Name {
        self.0.last().cloned().unwrap_or_else(|| Name::from(""))
    }

    /// Everything before the last segment, read as a package prefix.
    #[must_use]
    pub fn parent(&self) -> PackageName {
        match self.0.split_last() {
            Some((_, init)) => PackageName(init.to_vec()),
            None => PackageName::default(),
        }
    }

    /// The qualified name of a member nested inside this one.
    #[must_use]
    pub fn child(&self, name: &Name) -> QualifiedName {
        let mut segments = self.0.clone();
        segments.push(name.clone());
        QualifiedName(segments)
    }

    #[must_use]
    pub fn to_dotted(&self) -> String {
        join_dotted(&self.0)
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dotted())
    }
}

fn split_dotted(dotted: &str) -> Vec<Name> {
    dotted
        .split('.')
        .filter(|segment| !segment.is_empty())
        .map(Name::from)
        .collect()
}

fn join_dotted(segments: &[Name]) -> String {
    segments
        .iter()
        .map(Name::as_str)
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_name_roundtrips_dotted_spelling() {
        let name = QualifiedName::from_dotted("a.b.Outer.Inner");
        assert_eq!(name.to_dotted(), "a.b.Outer.Inner");
        assert_eq!(name.short_name().as_str(), "Inner");
        assert_eq!(name.parent().to_dotted(), "a.b.Outer");
    }

    #[test]
    fn root_package_member_has_no_leading_dot() {
        let root = PackageName::default();
        assert!(root.is_root());
        assert_eq!(root.member(&Name::from("Main")).to_dotted(), "Main");
    }

    #[test]
    fn capitalized_handles_empty_and_ascii() {
        assert_eq!(Name::from("provideService").capitalized(), "ProvideService");
        assert_eq!(Name::from("").capitalized(), "");
    }
}
