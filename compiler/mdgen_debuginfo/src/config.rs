//! Compile-unit configuration.

use crate::dwarf::DwarfLang;

/// Producer name recorded when none is configured.
pub const DEFAULT_PRODUCER: &str = concat!("mdgen ", env!("CARGO_PKG_VERSION"));

/// Settings copied into every compile unit a [`DebugInfo`](crate::DebugInfo)
/// session emits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DebugInfoConfig {
    /// Producer string (compiler name and version).
    pub producer: String,
    /// Source language of the unit.
    pub language: DwarfLang,
    /// Whether the code was optimized.
    pub optimized: bool,
    /// Command-line flags, recorded verbatim.
    pub flags: String,
    /// Objective-C runtime version. Zero for every other language.
    pub runtime_version: i32,
}

impl Default for DebugInfoConfig {
    fn default() -> Self {
        Self {
            producer: DEFAULT_PRODUCER.to_owned(),
            language: DwarfLang::default(),
            optimized: false,
            flags: String::new(),
            runtime_version: 0,
        }
    }
}

impl DebugInfoConfig {
    /// Unoptimized build.
    pub fn development() -> Self {
        Self::default()
    }

    /// Optimized build that still carries debug info.
    pub fn release() -> Self {
        Self {
            optimized: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_producer(mut self, producer: impl Into<String>) -> Self {
        self.producer = producer.into();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: DwarfLang) -> Self {
        self.language = language;
        self
    }

    #[must_use]
    pub fn with_optimized(mut self, optimized: bool) -> Self {
        self.optimized = optimized;
        self
    }

    #[must_use]
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = flags.into();
        self
    }

    #[must_use]
    pub fn with_runtime_version(mut self, runtime_version: i32) -> Self {
        self.runtime_version = runtime_version;
        self
    }
}
