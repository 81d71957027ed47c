//! Files, source locations and scopes.

use super::DescId;
use crate::dwarf::DwarfTag;
use crate::lower::Lowering;
use crate::node::NodeBuilder;

/// A source file.
///
/// Never tagged: its node is just `{filename, directory}`. Compile units and
/// subprograms embed that node directly rather than through the cache.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct FileDescriptor {
    pub path: String,
}

impl FileDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::FileType
    }

    /// `(directory, filename)`, split on the last `/`.
    ///
    /// A path without `/` has an empty directory; a trailing `/` yields an
    /// empty filename.
    pub fn split(&self) -> (&str, &str) {
        self.path.rsplit_once('/').unwrap_or(("", self.path.as_str()))
    }

    /// Build the `{filename, directory}` node.
    pub fn lower<B: NodeBuilder>(&self, b: &B) -> B::Node {
        let (dir, file) = self.split();
        b.md_node(&[b.md_string(file), b.md_string(dir)])
    }
}

/// A source location. Not a DWARF entity, so it has no tag.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct LineDescriptor {
    pub line: u32,
    pub column: u32,
    pub context: Option<DescId>,
}

impl LineDescriptor {
    pub fn new(line: u32, column: u32, context: Option<DescId>) -> Self {
        Self {
            line,
            column,
            context,
        }
    }

    pub(crate) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let b = cx.builder();
        b.md_node(&[
            b.const_u32(self.line),
            b.const_u32(self.column),
            cx.lower_opt(self.context),
            // Inlined-at.
            b.null(),
        ])
    }
}

/// A lexical block.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockDescriptor {
    pub file: Option<DescId>,
    pub context: Option<DescId>,
    pub line: u32,
    pub column: u32,
    /// Distinguishes blocks that start at the same location.
    pub id: u32,
}

impl BlockDescriptor {
    pub fn new(
        file: Option<DescId>,
        context: Option<DescId>,
        line: u32,
        column: u32,
        id: u32,
    ) -> Self {
        Self {
            file,
            context,
            line,
            column,
            id,
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::LexicalBlock
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let b = cx.builder();
        b.md_node(&[
            b.tag(self.tag()),
            cx.lower_opt(self.file),
            cx.lower_opt(self.context),
            b.const_u32(self.line),
            b.const_u32(self.column),
            b.const_u32(self.id),
        ])
    }
}

/// A file used as a scope: the file's tag followed by its node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContextDescriptor {
    pub file: FileDescriptor,
}

impl ContextDescriptor {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            file: FileDescriptor::new(path),
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        self.file.tag()
    }

    pub(super) fn lower<B: NodeBuilder>(&self, b: &B) -> B::Node {
        b.md_node(&[b.tag(self.tag()), self.file.lower(b)])
    }
}
