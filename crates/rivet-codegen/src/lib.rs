//! Dagger factory generation engine.
//!
//! Given a parsed Kotlin declaration forest and a partial-compilation symbol
//! oracle, this crate scans for dependency-injection trigger patterns
//! (`@Inject` constructors, `@Provides` members, `@AssistedInject`
//! constructors, `@ContributesAndroidInjector` functions, member-injected
//! properties) and emits the factory/injector sources the DI framework's
//! annotation processor would otherwise generate at a later build stage. The
//! [`driver::CodegenDriver`] re-runs the generators until fixpoint so
//! generated declarations can reference each other.

pub mod driver;
pub mod generators;
pub mod params;
pub mod poet;
pub mod validate;

pub use driver::{CodegenConfig, CodegenDriver, DriverError};
pub use generators::{GeneratedFile, Generator, PassInput};
pub use params::{Parameter, WrapperKind};
