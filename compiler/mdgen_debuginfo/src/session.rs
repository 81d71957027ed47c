//! Per-unit debug info collector.
//!
//! [`DebugInfo`] owns the descriptor set for one compile unit and remembers
//! which descriptors belong in the unit's top-level lists (subprograms,
//! globals, retained and enum types). [`DebugInfo::finish`] assembles the
//! compile unit from the session's [`DebugInfoConfig`] and lowers it, which
//! transitively lowers everything reachable from those lists.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::config::DebugInfoConfig;
use crate::descriptor::{
    BasicTypeDescriptor, CompileUnitDescriptor, DescId, Descriptor, DescriptorSet,
    FileDescriptor, GlobalVariableDescriptor, SubprogramDescriptor,
};
use crate::dwarf::DwarfTypeEncoding;
use crate::lower::Lowering;
use crate::node::NodeBuilder;

/// Debug info for one compile unit.
pub struct DebugInfo<V> {
    path: String,
    config: DebugInfoConfig,
    descriptors: DescriptorSet<V>,
    files: FxHashMap<String, DescId>,
    enum_types: Vec<Option<DescId>>,
    retained_types: Vec<Option<DescId>>,
    subprograms: Vec<Option<DescId>>,
    globals: Vec<Option<DescId>>,
}

impl<V> DebugInfo<V> {
    /// A session for the unit whose main source file is `path`.
    pub fn new(path: impl Into<String>, config: DebugInfoConfig) -> Self {
        Self {
            path: path.into(),
            config,
            descriptors: DescriptorSet::new(),
            files: FxHashMap::default(),
            enum_types: Vec::new(),
            retained_types: Vec::new(),
            subprograms: Vec::new(),
            globals: Vec::new(),
        }
    }

    pub fn config(&self) -> &DebugInfoConfig {
        &self.config
    }

    pub fn descriptors(&self) -> &DescriptorSet<V> {
        &self.descriptors
    }

    /// Store a descriptor without listing it in the compile unit.
    pub fn add(&mut self, descriptor: impl Into<Descriptor<V>>) -> DescId {
        self.descriptors.add(descriptor)
    }

    /// The file descriptor for `path`. One descriptor per distinct path.
    pub fn file(&mut self, path: &str) -> DescId {
        if let Some(&id) = self.files.get(path) {
            return id;
        }
        let id = self.descriptors.add(FileDescriptor::new(path));
        self.files.insert(path.to_owned(), id);
        id
    }

    /// A base type of `size` bits.
    pub fn basic_type(&mut self, name: &str, size: u64, encoding: DwarfTypeEncoding) -> DescId {
        self.descriptors
            .add(BasicTypeDescriptor::new(name, size, encoding))
    }

    /// Store a subprogram and list it in the compile unit.
    pub fn add_subprogram(&mut self, subprogram: SubprogramDescriptor<V>) -> DescId {
        let id = self.descriptors.add(subprogram);
        self.subprograms.push(Some(id));
        id
    }

    /// Store a global and list it in the compile unit.
    pub fn add_global(&mut self, global: GlobalVariableDescriptor<V>) -> DescId {
        let id = self.descriptors.add(global);
        self.globals.push(Some(id));
        id
    }

    /// Keep `ty` in the output even if nothing references it.
    pub fn retain_type(&mut self, ty: DescId) {
        self.retained_types.push(Some(ty));
    }

    pub fn add_enum_type(&mut self, ty: DescId) {
        self.enum_types.push(Some(ty));
    }

    /// The compile unit as it stands: configuration plus everything listed so
    /// far.
    pub fn compile_unit(&self) -> CompileUnitDescriptor {
        CompileUnitDescriptor {
            enum_types: self.enum_types.clone(),
            retained_types: self.retained_types.clone(),
            subprograms: self.subprograms.clone(),
            global_variables: self.globals.clone(),
            ..CompileUnitDescriptor::from_config(self.path.clone(), &self.config)
        }
    }
}

impl<V: Clone> DebugInfo<V> {
    /// Add the compile unit and lower it.
    ///
    /// Returns the unit's node and the pass's [`Lowering`], which callers keep
    /// using for local variables and locations. Each call adds a fresh compile
    /// unit reflecting the registrations made so far.
    pub fn finish<'a, B>(&'a mut self, builder: &'a B) -> (V, Lowering<'a, B>)
    where
        B: NodeBuilder<Node = V>,
    {
        let unit = self.compile_unit();
        let id = self.descriptors.add(unit);
        let mut lowering = Lowering::new(builder, &self.descriptors);
        let node = lowering.lower(id);
        let stats = lowering.stats();
        debug!(
            path = %self.path,
            subprograms = self.subprograms.len(),
            globals = self.globals.len(),
            descriptors = self.descriptors.len(),
            lowered = stats.misses,
            cache_hits = stats.hits,
            "lowered compile unit",
        );
        (node, lowering)
    }
}
