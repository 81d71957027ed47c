//! Debug descriptor graph for the mdgen backend.
//!
//! A frontend describes the program's debug information as a graph of
//! descriptors (compile unit, types, subprograms, variables, lexical blocks,
//! files, lines). At emission time the graph is lowered into metadata nodes
//! whose field order is the contract with the DWARF emitter downstream.
//!
//! # Pieces
//!
//! - [`dwarf`]: tags, languages, type encodings, flags and the producer
//!   version that is added to every tag.
//! - [`node`]: the [`NodeBuilder`] interface over the code-generation
//!   library's metadata primitives.
//! - [`descriptor`]: the [`Descriptor`] sum type and the [`DescriptorSet`]
//!   arena. A [`DescId`] is a descriptor's identity.
//! - [`lower`]: the [`Lowering`] cache, which lowers each descriptor at most
//!   once per compile-unit pass.
//! - [`arena`]: [`MetadataArena`], an in-memory [`NodeBuilder`] that can render
//!   the node graph as textual metadata.
//! - [`session`]: [`DebugInfo`], the frontend-facing collector that assembles
//!   the compile unit from a [`DebugInfoConfig`].
//!
//! # Crate Dependencies
//!
//! No LLVM dependency. The LLVM implementation of [`NodeBuilder`] lives in
//! `mdgen_llvm`, which is built separately because it needs LLVM installed.
//!
//! # Example
//!
//! ```
//! use mdgen_debuginfo::{
//!     BasicTypeDescriptor, DescriptorSet, DwarfTypeEncoding, FileDescriptor, Lowering,
//!     MetadataArena,
//! };
//!
//! let arena = MetadataArena::new();
//! let mut set = DescriptorSet::new();
//! let file = set.add(FileDescriptor::new("/src/main.x"));
//! let int = set.add(
//!     BasicTypeDescriptor::new("int", 32, DwarfTypeEncoding::Signed).with_file(Some(file), 5),
//! );
//!
//! let mut lowering = Lowering::new(&arena, &set);
//! let node = lowering.lower(int);
//! assert_eq!(arena.fields(node).map(|f| f.len()), Some(10));
//! ```

// Metadata fields have fixed widths; arena indices are u32.
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_possible_wrap)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod arena;
pub mod config;
pub mod descriptor;
pub mod dwarf;
pub mod lower;
pub mod node;
pub mod session;

pub use arena::{MdRef, MetadataArena};
pub use config::DebugInfoConfig;
pub use descriptor::{
    BasicTypeDescriptor, BlockDescriptor, CompileUnitDescriptor, CompositeTypeDescriptor,
    ContextDescriptor, DerivedTypeDescriptor, DescId, Descriptor, DescriptorSet,
    FileDescriptor, GlobalVariableDescriptor, LineDescriptor, LocalVariableDescriptor,
    SubprogramDescriptor, TypeHeader,
};
pub use dwarf::{
    tag_value, DIFlags, DwarfLang, DwarfTag, DwarfTypeEncoding, LLVM_DEBUG_VERSION,
};
pub use lower::{Lowering, LoweringStats};
pub use node::{IntWidth, NodeBuilder};
pub use session::DebugInfo;
