//! DWARF constants as the LLVM 3.x debug metadata schema encodes them.
//!
//! Tags are emitted as `LLVM_DEBUG_VERSION + tag`, so every tag value the
//! emitter sees carries the producer version in its upper half.

use std::fmt;

use bitflags::bitflags;

/// Debug metadata producer version (`12 << 16`), added to every tag.
pub const LLVM_DEBUG_VERSION: u32 = 12 << 16;

/// The first field of a tagged node: the tag offset by the producer version.
#[inline]
pub const fn tag_value(tag: DwarfTag) -> u64 {
    LLVM_DEBUG_VERSION as u64 + tag as u64
}

/// DWARF tag identifying a node kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DwarfTag {
    LexicalBlock = 0x0b,
    Member = 0x0d,
    PointerType = 0x0f,
    CompileUnit = 0x11,
    StructureType = 0x13,
    SubroutineType = 0x15,
    Typedef = 0x16,
    BaseType = 0x24,
    FileType = 0x29,
    Subprogram = 0x2e,
    Variable = 0x34,
    /// LLVM-specific: a local variable declared in a block.
    AutoVariable = 0x100,
    /// LLVM-specific: a function argument.
    ArgVariable = 0x101,
}

impl DwarfTag {
    /// Raw DWARF value, without the producer version.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// The `DW_TAG_*` spelling, for dumps and log output.
    pub const fn name(self) -> &'static str {
        match self {
            Self::LexicalBlock => "DW_TAG_lexical_block",
            Self::Member => "DW_TAG_member",
            Self::PointerType => "DW_TAG_pointer_type",
            Self::CompileUnit => "DW_TAG_compile_unit",
            Self::StructureType => "DW_TAG_structure_type",
            Self::SubroutineType => "DW_TAG_subroutine_type",
            Self::Typedef => "DW_TAG_typedef",
            Self::BaseType => "DW_TAG_base_type",
            Self::FileType => "DW_TAG_file_type",
            Self::Subprogram => "DW_TAG_subprogram",
            Self::Variable => "DW_TAG_variable",
            Self::AutoVariable => "DW_TAG_auto_variable",
            Self::ArgVariable => "DW_TAG_arg_variable",
        }
    }
}

impl fmt::Display for DwarfTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source language of a compile unit.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum DwarfLang {
    C89 = 0x0001,
    #[default]
    C = 0x0002,
    C99 = 0x000c,
    Go = 0x0016,
    Rust = 0x001c,
}

impl DwarfLang {
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

/// `DW_ATE_*` base type encodings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DwarfTypeEncoding {
    Address = 0x01,
    Boolean = 0x02,
    ComplexFloat = 0x03,
    Float = 0x04,
    Signed = 0x05,
    SignedChar = 0x06,
    Unsigned = 0x07,
    UnsignedChar = 0x08,
    ImaginaryFloat = 0x09,
    PackedDecimal = 0x0a,
    NumericString = 0x0b,
    Edited = 0x0c,
    SignedFixed = 0x0d,
    UnsignedFixed = 0x0e,
    DecimalFloat = 0x0f,
    Utf = 0x10,
    LoUser = 0x80,
    HiUser = 0xff,
}

impl DwarfTypeEncoding {
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }
}

bitflags! {
    /// Per-entity debug flags. Each flag is a single bit.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct DIFlags: u32 {
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;
        const FWD_DECL = 1 << 2;
        const APPLE_BLOCK = 1 << 3;
        const BLOCK_BYREF_STRUCT = 1 << 4;
        const VIRTUAL = 1 << 5;
        const ARTIFICIAL = 1 << 6;
        const EXPLICIT = 1 << 7;
        const PROTOTYPED = 1 << 8;
        const OBJC_CLASS_COMPLETE = 1 << 9;
        const OBJECT_POINTER = 1 << 10;
        const VECTOR = 1 << 11;
        const STATIC_MEMBER = 1 << 12;
        const INDIRECT_VARIABLE = 1 << 13;
    }
}
