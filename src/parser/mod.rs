//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (Requirement, ManifestFormat, RegistryType)
//! - pip_freeze.rs: pip freeze / requirements.txt parser
//! - poetry_lock.rs: poetry.lock parser
//! - package_lock.rs: package-lock.json parser
//! - go_sum.rs: go.sum parser
//! - mix_lock.rs: mix.lock parser
//! - excluded.rs: name-based exclusion decorator

pub mod excluded;
pub mod go_sum;
pub mod mix_lock;
pub mod package_lock;
pub mod pip_freeze;
pub mod poetry_lock;
pub mod traits;
pub mod types;

pub use excluded::ExcludedReqs;
pub use go_sum::GoSumParser;
pub use mix_lock::MixLockParser;
pub use package_lock::PackageLockParser;
pub use pip_freeze::PipFreezeParser;
pub use poetry_lock::PoetryLockParser;
pub use traits::{ParseError, Parser};
pub use types::{ManifestFormat, RegistryType, Requirement};

/// Parser for a manifest format
pub fn parser_for(format: ManifestFormat) -> Box<dyn Parser> {
    match format {
        ManifestFormat::PipFreeze => Box::new(PipFreezeParser::new()),
        ManifestFormat::PoetryLock => Box::new(PoetryLockParser),
        ManifestFormat::NpmLock => Box::new(PackageLockParser),
        ManifestFormat::Golang => Box::new(GoSumParser),
        ManifestFormat::MixLock => Box::new(MixLockParser::new()),
    }
}
