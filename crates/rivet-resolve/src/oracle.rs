//! The partial-compilation symbol oracle.
//!
//! The surrounding compiler owns the real symbol tables; the engine only
//! needs a handful of existence queries. [`MemoryOracle`] is the in-memory
//! implementation used by tests and as the per-pass overlay for declarations
//! the engine generated itself.

use rivet_core::{Name, PackageName, QualifiedName};
use rivet_syntax::Forest;
use std::collections::{HashMap, HashSet, VecDeque};

/// Read-only queries against the partial compilation plus its dependencies.
pub trait SymbolOracle {
    /// Whether a class with this dotted spelling exists, under any split of
    /// the spelling into package and nested-class segments.
    fn class_exists(&self, name: &QualifiedName) -> bool;

    /// Whether a class exists for exactly this package/nested-segments split.
    /// Used to disambiguate inner-class punning (`a.b.Outer.Inner` vs an
    /// `a.b.Outer` package containing `Inner`).
    fn has_class_id(&self, package: &PackageName, relative: &[Name]) -> bool;

    /// The expansion of a type alias declared in `package`, if any.
    fn type_alias_target(&self, package: &PackageName, name: &Name) -> Option<QualifiedName>;

    /// Direct supertypes of a class, fully qualified.
    fn super_types(&self, class: &QualifiedName) -> Vec<QualifiedName>;

    /// The implicit default-import namespaces of the base language, in the
    /// fixed fallback order the resolver tries them.
    fn default_import_packages(&self) -> Vec<PackageName>;
}

/// Simple in-memory oracle for unit tests and pass-local overlays.
#[derive(Debug, Clone)]
pub struct MemoryOracle {
    dotted: HashSet<String>,
    ids: HashSet<(String, String)>,
    aliases: HashMap<(String, String), QualifiedName>,
    supers: HashMap<String, Vec<QualifiedName>>,
    default_imports: Vec<PackageName>,
}

impl Default for MemoryOracle {
    fn default() -> Self {
        Self {
            dotted: HashSet::new(),
            ids: HashSet::new(),
            aliases: HashMap::new(),
            supers: HashMap::new(),
            default_imports: vec![
                PackageName::from_dotted("kotlin"),
                PackageName::from_dotted("kotlin.collections"),
            ],
        }
    }
}

impl MemoryOracle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a class. `relative` is the dotted nested-class path inside
    /// `package`, e.g. (`"a.b"`, `"Outer.Inner"`).
    pub fn add_class(&mut self, package: &str, relative: &str) {
        let dotted = if package.is_empty() {
            relative.to_string()
        } else {
            format!("{package}.{relative}")
        };
        self.dotted.insert(dotted);
        self.ids.insert((package.to_string(), relative.to_string()));
    }

    pub fn add_type_alias(&mut self, package: &str, name: &str, target: &str) {
        self.aliases.insert(
            (package.to_string(), name.to_string()),
            QualifiedName::from_dotted(target),
        );
    }

    pub fn add_super_types(&mut self, class: &str, supers: &[&str]) {
        self.supers.insert(
            class.to_string(),
            supers
                .iter()
                .map(|name| QualifiedName::from_dotted(name))
                .collect(),
        );
    }

    pub fn set_default_import_packages(&mut self, packages: Vec<PackageName>) {
        self.default_imports = packages;
    }
}

impl SymbolOracle for MemoryOracle {
    fn class_exists(&self, name: &QualifiedName) -> bool {
        self.dotted.contains(&name.to_dotted())
    }

    fn has_class_id(&self, package: &PackageName, relative: &[Name]) -> bool {
        let relative = relative
            .iter()
            .map(Name::as_str)
            .collect::<Vec<_>>()
            .join(".");
        self.ids.contains(&(package.to_dotted(), relative))
    }

    fn type_alias_target(&self, package: &PackageName, name: &Name) -> Option<QualifiedName> {
        self.aliases
            .get(&(package.to_dotted(), name.as_str().to_string()))
            .cloned()
    }

    fn super_types(&self, class: &QualifiedName) -> Vec<QualifiedName> {
        self.supers.get(&class.to_dotted()).cloned().unwrap_or_default()
    }

    fn default_import_packages(&self) -> Vec<PackageName> {
        self.default_imports.clone()
    }
}

/// A read-only snapshot combining the external oracle with the declarations
/// visible in the current forest.
///
/// The driver constructs a fresh snapshot after every materialization round
/// instead of mutating shared state, so each pass sees a consistent view.
pub struct LayeredOracle<'a> {
    overlay: MemoryOracle,
    base: &'a dyn SymbolOracle,
}

impl<'a> LayeredOracle<'a> {
    /// Indexes every class declared in `forest` (with best-effort direct
    /// supertype resolution) on top of `base`.
    #[must_use]
    pub fn for_forest(forest: &Forest, base: &'a dyn SymbolOracle) -> Self {
        let mut overlay = MemoryOracle::new();

        for path in forest.classes_and_inner_classes() {
            let relative = path
                .names()
                .iter()
                .map(|name| name.as_str().to_string())
                .collect::<Vec<_>>()
                .join(".");
            overlay.add_class(&path.file.package.to_dotted(), &relative);
        }

        // Second phase: resolve declared supertype references against the
        // class set registered above. Failures are ignored; the supertype walk
        // is itself best-effort.
        let probe = LayeredOracle {
            overlay: overlay.clone(),
            base,
        };
        let mut resolved_supers: Vec<(String, Vec<QualifiedName>)> = Vec::new();
        for path in forest.classes_and_inner_classes() {
            if path.class.super_types.is_empty() {
                continue;
            }
            let ctx = crate::ResolveContext {
                file: path.file,
                class_path: &path,
                oracle: &probe,
            };
            let supers: Vec<QualifiedName> = path
                .class
                .super_types
                .iter()
                .filter_map(|super_ref| {
                    let name = super_ref.user_name()?;
                    match crate::resolve_user_name(name, &path.class.location, &ctx) {
                        Ok(crate::ResolvedName::Qualified(qualified)) => Some(qualified),
                        _ => None,
                    }
                })
                .collect();
            if !supers.is_empty() {
                resolved_supers.push((path.qualified_name().to_dotted(), supers));
            }
        }
        for (class, supers) in resolved_supers {
            overlay.supers.insert(class, supers);
        }

        Self { overlay, base }
    }
}

impl SymbolOracle for LayeredOracle<'_> {
    fn class_exists(&self, name: &QualifiedName) -> bool {
        self.overlay.class_exists(name) || self.base.class_exists(name)
    }

    fn has_class_id(&self, package: &PackageName, relative: &[Name]) -> bool {
        self.overlay.has_class_id(package, relative) || self.base.has_class_id(package, relative)
    }

    fn type_alias_target(&self, package: &PackageName, name: &Name) -> Option<QualifiedName> {
        self.overlay
            .type_alias_target(package, name)
            .or_else(|| self.base.type_alias_target(package, name))
    }

    fn super_types(&self, class: &QualifiedName) -> Vec<QualifiedName> {
        let mut supers = self.overlay.super_types(class);
        if supers.is_empty() {
            supers = self.base.super_types(class);
        }
        supers
    }

    fn default_import_packages(&self) -> Vec<PackageName> {
        self.base.default_import_packages()
    }
}

/// Walks the transitive supertype set of `class` in breadth-first discovery
/// order, deduplicated.
#[must_use]
pub fn transitive_super_types(
    oracle: &dyn SymbolOracle,
    class: &QualifiedName,
) -> Vec<QualifiedName> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut queue: VecDeque<QualifiedName> = oracle.super_types(class).into();
    let mut out = Vec::new();

    while let Some(next) = queue.pop_front() {
        if !seen.insert(next.to_dotted()) {
            continue;
        }
        queue.extend(oracle.super_types(&next));
        out.push(next);
    }

    out
}
