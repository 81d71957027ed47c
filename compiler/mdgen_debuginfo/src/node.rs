//! Node Builder interface.
//!
//! The lowering pass never talks to the code-generation library directly; it
//! only needs a handful of constructors for constants, strings and metadata
//! tuples. Each backend supplies them through [`NodeBuilder`]:
//!
//! - `mdgen_llvm::LlvmNodeBuilder`: real LLVM metadata
//! - [`MetadataArena`](crate::MetadataArena): in-memory nodes for tests and dumps

use std::fmt;

use crate::dwarf::{tag_value, DwarfTag};

/// Width of an integer constant field.
///
/// The emitter distinguishes node kinds by width, so a boolean is always an
/// `I1` constant and never some other node kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntWidth {
    I1,
    I32,
    I64,
}

impl IntWidth {
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            Self::I1 => 1,
            Self::I32 => 32,
            Self::I64 => 64,
        }
    }

    /// Mask selecting the bits that fit in this width.
    #[inline]
    pub const fn mask(self) -> u64 {
        match self {
            Self::I1 => 1,
            Self::I32 => u32::MAX as u64,
            Self::I64 => u64::MAX,
        }
    }
}

impl fmt::Display for IntWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.bits())
    }
}

/// Primitive metadata constructors provided by a code-generation backend.
///
/// `Node` is whatever the backend hands back: an LLVM value reference, an arena
/// index, etc. It also stands in for generated IR values (functions, global
/// storage) that descriptors carry opaquely.
pub trait NodeBuilder {
    type Node: Clone;

    /// Integer constant of `width`, truncated to fit.
    fn const_int(&self, width: IntWidth, value: u64, sign_extend: bool) -> Self::Node;

    /// All-zero integer constant.
    fn const_null(&self, width: IntWidth) -> Self::Node;

    /// All-ones integer constant.
    fn const_all_ones(&self, width: IntWidth) -> Self::Node;

    /// Metadata string.
    fn md_string(&self, text: &str) -> Self::Node;

    /// Metadata tuple with `fields` in order. An empty slice yields `!{}`.
    fn md_node(&self, fields: &[Self::Node]) -> Self::Node;

    /// The distinguished empty value used for absent references.
    fn null(&self) -> Self::Node;

    // -- Field helpers --

    /// Unsigned 32-bit field.
    fn const_u32(&self, value: u32) -> Self::Node {
        self.const_int(IntWidth::I32, u64::from(value), false)
    }

    /// Unsigned 64-bit field.
    fn const_u64(&self, value: u64) -> Self::Node {
        self.const_int(IntWidth::I64, value, false)
    }

    /// One-bit boolean field: all ones for `true`, all zeros for `false`.
    fn const_bool(&self, value: bool) -> Self::Node {
        if value {
            self.const_all_ones(IntWidth::I1)
        } else {
            self.const_null(IntWidth::I1)
        }
    }

    /// Tag field (`LLVM_DEBUG_VERSION + tag`), always the first field of a
    /// tagged node.
    fn tag(&self, tag: DwarfTag) -> Self::Node {
        self.const_int(IntWidth::I32, tag_value(tag), false)
    }
}
