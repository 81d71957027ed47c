//! Debug descriptors and the arena that owns them.
//!
//! # Identity
//!
//! Descriptors are stored in a [`DescriptorSet`] and referred to by [`DescId`].
//! The id *is* the identity: two descriptors with identical contents added
//! separately get two ids and lower to two nodes. An absent reference is
//! `None`, never a sentinel id.
//!
//! # Acyclicity
//!
//! A set only hands out ids of descriptors it already stores, and a stored
//! descriptor cannot be mutated. A descriptor can therefore only reference
//! descriptors added before it, so the graph the lowering pass walks is
//! always finite and acyclic.

mod program;
mod scope;
mod types;

use std::ops::Index;

pub use program::{
    CompileUnitDescriptor, GlobalVariableDescriptor, LocalVariableDescriptor,
    SubprogramDescriptor,
};
pub use scope::{BlockDescriptor, ContextDescriptor, FileDescriptor, LineDescriptor};
pub use types::{BasicTypeDescriptor, CompositeTypeDescriptor, DerivedTypeDescriptor, TypeHeader};

use crate::dwarf::DwarfTag;
use crate::lower::Lowering;
use crate::node::NodeBuilder;

/// Identity of a descriptor within its [`DescriptorSet`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Debug)]
#[repr(transparent)]
pub struct DescId(u32);

impl DescId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A debug descriptor.
///
/// `V` is the node type of the backend the set will be lowered with; it is
/// only used for the generated IR values that subprograms and globals carry.
#[derive(Clone, Debug, PartialEq)]
pub enum Descriptor<V> {
    BasicType(BasicTypeDescriptor),
    CompositeType(CompositeTypeDescriptor),
    DerivedType(DerivedTypeDescriptor),
    CompileUnit(CompileUnitDescriptor),
    Subprogram(SubprogramDescriptor<V>),
    GlobalVariable(GlobalVariableDescriptor<V>),
    LocalVariable(LocalVariableDescriptor),
    File(FileDescriptor),
    /// Transient source location. Has no tag of its own.
    Line(LineDescriptor),
    Block(BlockDescriptor),
    Context(ContextDescriptor),
}

impl<V> Descriptor<V> {
    /// The DWARF tag of this descriptor.
    ///
    /// # Panics
    ///
    /// Panics for [`Descriptor::Line`]: a line is a location, not a DWARF
    /// entity, and no emission path asks for its tag.
    pub fn tag(&self) -> DwarfTag {
        match self {
            Self::BasicType(d) => d.tag(),
            Self::CompositeType(d) => d.tag(),
            Self::DerivedType(d) => d.tag(),
            Self::CompileUnit(d) => d.tag(),
            Self::Subprogram(d) => d.tag(),
            Self::GlobalVariable(d) => d.tag(),
            Self::LocalVariable(d) => d.tag(),
            Self::File(d) => d.tag(),
            Self::Line(_) => panic!("Descriptor::tag called on a line descriptor"),
            Self::Block(d) => d.tag(),
            Self::Context(d) => d.tag(),
        }
    }

    /// Short variant name, for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BasicType(_) => "basic_type",
            Self::CompositeType(_) => "composite_type",
            Self::DerivedType(_) => "derived_type",
            Self::CompileUnit(_) => "compile_unit",
            Self::Subprogram(_) => "subprogram",
            Self::GlobalVariable(_) => "global_variable",
            Self::LocalVariable(_) => "local_variable",
            Self::File(_) => "file",
            Self::Line(_) => "line",
            Self::Block(_) => "block",
            Self::Context(_) => "context",
        }
    }

    /// Every descriptor this one references, in field order.
    pub fn references(&self) -> Vec<DescId> {
        match self {
            Self::BasicType(d) => d.header.references().collect(),
            Self::CompositeType(d) => d.references().collect(),
            Self::DerivedType(d) => d.references().collect(),
            Self::CompileUnit(d) => d.references().collect(),
            Self::Subprogram(d) => d.context.into_iter().chain(d.ty).collect(),
            Self::GlobalVariable(d) => d.context.into_iter().chain(d.file).chain(d.ty).collect(),
            Self::LocalVariable(d) => d.context.into_iter().chain(d.file).chain(d.ty).collect(),
            Self::File(_) | Self::Context(_) => Vec::new(),
            Self::Line(d) => d.context.into_iter().collect(),
            Self::Block(d) => d.file.into_iter().chain(d.context).collect(),
        }
    }
}

impl<V: Clone> Descriptor<V> {
    /// Build this descriptor's node. References go through `cx`.
    pub(crate) fn lower<B>(&self, cx: &mut Lowering<'_, B>) -> V
    where
        B: NodeBuilder<Node = V>,
    {
        match self {
            Self::BasicType(d) => d.lower(cx),
            Self::CompositeType(d) => d.lower(cx),
            Self::DerivedType(d) => d.lower(cx),
            Self::CompileUnit(d) => d.lower(cx),
            Self::Subprogram(d) => d.lower(cx),
            Self::GlobalVariable(d) => d.lower(cx),
            Self::LocalVariable(d) => d.lower(cx),
            Self::File(d) => d.lower(cx.builder()),
            Self::Line(d) => d.lower(cx),
            Self::Block(d) => d.lower(cx),
            Self::Context(d) => d.lower(cx.builder()),
        }
    }
}

macro_rules! descriptor_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl<V> From<$ty> for Descriptor<V> {
                fn from(d: $ty) -> Self {
                    Self::$variant(d)
                }
            }
        )*
    };
}

descriptor_from!(
    BasicType(BasicTypeDescriptor),
    CompositeType(CompositeTypeDescriptor),
    DerivedType(DerivedTypeDescriptor),
    CompileUnit(CompileUnitDescriptor),
    Subprogram(SubprogramDescriptor<V>),
    GlobalVariable(GlobalVariableDescriptor<V>),
    LocalVariable(LocalVariableDescriptor),
    File(FileDescriptor),
    Line(LineDescriptor),
    Block(BlockDescriptor),
    Context(ContextDescriptor),
);

/// Arena of descriptors. Append-only.
#[derive(Clone, Debug)]
pub struct DescriptorSet<V> {
    descriptors: Vec<Descriptor<V>>,
}

impl<V> Default for DescriptorSet<V> {
    fn default() -> Self {
        Self {
            descriptors: Vec::new(),
        }
    }
}

impl<V> DescriptorSet<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `descriptor` and return its identity.
    ///
    /// # Panics
    ///
    /// Panics if the descriptor references an id at or past the end of this
    /// set. Ids carry no set identity, so an id from another set whose index
    /// happens to be in range is accepted and resolves to this set's entry.
    pub fn add(&mut self, descriptor: impl Into<Descriptor<V>>) -> DescId {
        let descriptor = descriptor.into();
        let next = self.descriptors.len();
        for reference in descriptor.references() {
            assert!(
                reference.index() < next,
                "{} descriptor references {reference:?} past the end of the set ({next})",
                descriptor.kind(),
            );
        }
        let id = DescId(next as u32);
        self.descriptors.push(descriptor);
        id
    }

    /// Look up a descriptor.
    ///
    /// # Panics
    ///
    /// Panics if `id` is out of range for this set.
    pub fn get(&self, id: DescId) -> &Descriptor<V> {
        self.try_get(id)
            .unwrap_or_else(|| panic!("{id:?} is out of range for this descriptor set"))
    }

    pub fn try_get(&self, id: DescId) -> Option<&Descriptor<V>> {
        self.descriptors.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Descriptors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (DescId, &Descriptor<V>)> {
        self.descriptors
            .iter()
            .enumerate()
            .map(|(index, d)| (DescId(index as u32), d))
    }
}

impl<V> Index<DescId> for DescriptorSet<V> {
    type Output = Descriptor<V>;

    fn index(&self, id: DescId) -> &Descriptor<V> {
        self.get(id)
    }
}

#[cfg(test)]
mod tests;
