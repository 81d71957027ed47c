//! Type descriptors.

use super::DescId;
use crate::dwarf::{DIFlags, DwarfTag, DwarfTypeEncoding};
use crate::lower::Lowering;
use crate::node::NodeBuilder;

/// Fields shared by every type descriptor.
///
/// Lowered right after the tag, in declaration order except that the file
/// comes before the context.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeHeader {
    /// Enclosing scope.
    pub context: Option<DescId>,
    pub name: String,
    pub file: Option<DescId>,
    pub line: u32,
    /// Size in bits.
    pub size: u64,
    /// Alignment in bits.
    pub alignment: u64,
    /// Offset in bits.
    pub offset: u64,
    pub flags: DIFlags,
}

impl TypeHeader {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub(super) fn references(&self) -> impl Iterator<Item = DescId> {
        self.file.into_iter().chain(self.context)
    }

    /// Tag plus the eight header fields.
    fn lower_fields<B: NodeBuilder>(
        &self,
        tag: DwarfTag,
        cx: &mut Lowering<'_, B>,
    ) -> Vec<B::Node> {
        let b = cx.builder();
        let mut fields = Vec::with_capacity(13);
        fields.push(b.tag(tag));
        fields.push(cx.lower_opt(self.file));
        fields.push(cx.lower_opt(self.context));
        fields.push(b.md_string(&self.name));
        fields.push(b.const_u32(self.line));
        fields.push(b.const_u64(self.size));
        fields.push(b.const_u64(self.alignment));
        fields.push(b.const_u64(self.offset));
        fields.push(b.const_u32(self.flags.bits()));
        fields
    }
}

macro_rules! type_header_setters {
    ($($ty:ty),*) => {
        $(
            impl $ty {
                #[must_use]
                pub fn with_name(mut self, name: impl Into<String>) -> Self {
                    self.header.name = name.into();
                    self
                }

                /// Set the enclosing scope.
                #[must_use]
                pub fn with_context(mut self, context: Option<DescId>) -> Self {
                    self.header.context = context;
                    self
                }

                /// Set the declaring file and line.
                #[must_use]
                pub fn with_file(mut self, file: Option<DescId>, line: u32) -> Self {
                    self.header.file = file;
                    self.header.line = line;
                    self
                }

                /// Set size, alignment and offset, all in bits.
                #[must_use]
                pub fn with_layout(mut self, size: u64, alignment: u64, offset: u64) -> Self {
                    self.header.size = size;
                    self.header.alignment = alignment;
                    self.header.offset = offset;
                    self
                }

                #[must_use]
                pub fn with_flags(mut self, flags: DIFlags) -> Self {
                    self.header.flags = flags;
                    self
                }
            }
        )*
    };
}

type_header_setters!(BasicTypeDescriptor, CompositeTypeDescriptor, DerivedTypeDescriptor);

/// A primitive type (`DW_TAG_base_type`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicTypeDescriptor {
    pub header: TypeHeader,
    pub encoding: DwarfTypeEncoding,
}

impl BasicTypeDescriptor {
    /// A base type of `size` bits, aligned to its size.
    pub fn new(name: impl Into<String>, size: u64, encoding: DwarfTypeEncoding) -> Self {
        Self {
            header: TypeHeader {
                size,
                alignment: size,
                ..TypeHeader::named(name)
            },
            encoding,
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::BaseType
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let mut fields = self.header.lower_fields(self.tag(), cx);
        let b = cx.builder();
        fields.push(b.const_u32(self.encoding.raw()));
        b.md_node(&fields)
    }
}

/// A type built from member types: a structure or a subroutine signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeTypeDescriptor {
    tag: DwarfTag,
    pub header: TypeHeader,
    /// Member types in order. `None` entries lower to absent members.
    pub members: Vec<Option<DescId>>,
}

impl CompositeTypeDescriptor {
    pub fn structure(name: impl Into<String>, members: Vec<Option<DescId>>) -> Self {
        Self {
            tag: DwarfTag::StructureType,
            header: TypeHeader::named(name),
            members,
        }
    }

    /// A subroutine type: the result type first, then the parameter types.
    /// A `None` result stands for a function with no result.
    pub fn subroutine(result: Option<DescId>, params: &[Option<DescId>]) -> Self {
        let mut members = Vec::with_capacity(params.len() + 1);
        members.push(result);
        members.extend_from_slice(params);
        Self {
            tag: DwarfTag::SubroutineType,
            header: TypeHeader::default(),
            members,
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        self.tag
    }

    pub(super) fn references(&self) -> impl Iterator<Item = DescId> + '_ {
        self.header
            .references()
            .chain(self.members.iter().copied().flatten())
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let mut fields = self.header.lower_fields(self.tag, cx);
        let b = cx.builder();
        // Derived-from.
        fields.push(b.null());
        fields.push(cx.lower_list(&self.members));
        // Runtime language and containing type.
        fields.push(b.const_u32(0));
        fields.push(b.const_u32(0));
        b.md_node(&fields)
    }
}

/// A type derived from a single base type: pointer, member or typedef.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedTypeDescriptor {
    tag: DwarfTag,
    pub header: TypeHeader,
    pub base: Option<DescId>,
}

impl DerivedTypeDescriptor {
    /// A pointer to `base`, `size` bits wide and aligned to its size.
    pub fn pointer(base: Option<DescId>, size: u64) -> Self {
        Self {
            tag: DwarfTag::PointerType,
            header: TypeHeader {
                size,
                alignment: size,
                ..TypeHeader::default()
            },
            base,
        }
    }

    /// A structure member of type `base`. Place it with
    /// [`with_layout`](Self::with_layout).
    pub fn member(name: impl Into<String>, base: Option<DescId>) -> Self {
        Self {
            tag: DwarfTag::Member,
            header: TypeHeader::named(name),
            base,
        }
    }

    pub fn typedef(name: impl Into<String>, base: Option<DescId>) -> Self {
        Self {
            tag: DwarfTag::Typedef,
            header: TypeHeader::named(name),
            base,
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        self.tag
    }

    pub(super) fn references(&self) -> impl Iterator<Item = DescId> {
        self.header.references().chain(self.base)
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let mut fields = self.header.lower_fields(self.tag, cx);
        fields.push(cx.lower_opt(self.base));
        cx.builder().md_node(&fields)
    }
}
