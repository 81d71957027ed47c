//! Program entities: compile units, functions and variables.

use super::{DescId, FileDescriptor};
use crate::config::DebugInfoConfig;
use crate::dwarf::{DIFlags, DwarfLang, DwarfTag};
use crate::lower::Lowering;
use crate::node::{IntWidth, NodeBuilder};

/// Root of a unit's debug info.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileUnitDescriptor {
    pub path: FileDescriptor,
    pub language: DwarfLang,
    pub producer: String,
    pub optimized: bool,
    pub compiler_flags: String,
    pub runtime: i32,
    pub enum_types: Vec<Option<DescId>>,
    pub retained_types: Vec<Option<DescId>>,
    pub subprograms: Vec<Option<DescId>>,
    pub global_variables: Vec<Option<DescId>>,
}

impl CompileUnitDescriptor {
    pub fn new(path: impl Into<String>, language: DwarfLang, producer: impl Into<String>) -> Self {
        Self {
            path: FileDescriptor::new(path),
            language,
            producer: producer.into(),
            optimized: false,
            compiler_flags: String::new(),
            runtime: 0,
            enum_types: Vec::new(),
            retained_types: Vec::new(),
            subprograms: Vec::new(),
            global_variables: Vec::new(),
        }
    }

    /// A unit for `path` with language, producer, optimization flag, compiler
    /// flags and runtime version taken from `config`.
    pub fn from_config(path: impl Into<String>, config: &DebugInfoConfig) -> Self {
        Self {
            optimized: config.optimized,
            compiler_flags: config.flags.clone(),
            runtime: config.runtime_version,
            ..Self::new(path, config.language, config.producer.clone())
        }
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::CompileUnit
    }

    pub(super) fn references(&self) -> impl Iterator<Item = DescId> + '_ {
        self.enum_types
            .iter()
            .chain(&self.retained_types)
            .chain(&self.subprograms)
            .chain(&self.global_variables)
            .copied()
            .flatten()
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let b = cx.builder();
        b.md_node(&[
            b.tag(self.tag()),
            self.path.lower(b),
            b.const_u32(self.language.raw()),
            b.md_string(&self.producer),
            b.const_bool(self.optimized),
            b.md_string(&self.compiler_flags),
            b.const_int(IntWidth::I32, i64::from(self.runtime) as u64, true),
            cx.lower_list(&self.enum_types),
            cx.lower_list(&self.retained_types),
            cx.lower_list(&self.subprograms),
            cx.lower_list(&self.global_variables),
            // Imported entities.
            b.md_node(&[]),
            // Split debug filename.
            b.md_string(""),
        ])
    }
}

/// A function definition.
#[derive(Clone, Debug, PartialEq)]
pub struct SubprogramDescriptor<V> {
    pub context: Option<DescId>,
    pub name: String,
    pub display_name: String,
    /// Subroutine type.
    pub ty: Option<DescId>,
    pub line: u32,
    /// The generated function, if any.
    pub function: Option<V>,
    pub path: FileDescriptor,
    /// First line of the body.
    pub scope_line: u32,
}

impl<V> SubprogramDescriptor<V> {
    /// A subprogram displayed under its own name.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            context: None,
            display_name: name.clone(),
            name,
            ty: None,
            line: 0,
            function: None,
            path: FileDescriptor::new(path),
            scope_line: 0,
        }
    }

    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    #[must_use]
    pub fn with_context(mut self, context: Option<DescId>) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: Option<DescId>) -> Self {
        self.ty = ty;
        self
    }

    /// Set the declaration line and the line the body starts on.
    #[must_use]
    pub fn with_lines(mut self, line: u32, scope_line: u32) -> Self {
        self.line = line;
        self.scope_line = scope_line;
        self
    }

    #[must_use]
    pub fn with_function(mut self, function: V) -> Self {
        self.function = Some(function);
        self
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::Subprogram
    }
}

impl<V: Clone> SubprogramDescriptor<V> {
    pub(super) fn lower<B>(&self, cx: &mut Lowering<'_, B>) -> V
    where
        B: NodeBuilder<Node = V>,
    {
        let b = cx.builder();
        b.md_node(&[
            b.tag(self.tag()),
            self.path.lower(b),
            cx.lower_opt(self.context),
            b.md_string(&self.name),
            b.md_string(&self.display_name),
            // Linkage name.
            b.md_string(""),
            b.const_u32(self.line),
            cx.lower_opt(self.ty),
            // Local to unit.
            b.const_null(IntWidth::I1),
            // Definition.
            b.const_all_ones(IntWidth::I1),
            // Virtuality and vtable index.
            b.const_null(IntWidth::I32),
            b.const_null(IntWidth::I32),
            // Containing type.
            b.null(),
            b.const_u32(DIFlags::PROTOTYPED.bits()),
            // Optimized.
            b.const_null(IntWidth::I1),
            self.function.clone().unwrap_or_else(|| b.null()),
            // Template parameters and declaration.
            b.null(),
            b.null(),
            // Variables.
            b.md_node(&[]),
            b.const_u32(self.scope_line),
        ])
    }
}

/// A global variable.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobalVariableDescriptor<V> {
    pub context: Option<DescId>,
    pub name: String,
    pub display_name: String,
    pub file: Option<DescId>,
    pub line: u32,
    pub ty: Option<DescId>,
    /// Visible only inside its unit.
    pub local: bool,
    pub external: bool,
    /// The generated storage, if any.
    pub value: Option<V>,
}

impl<V> GlobalVariableDescriptor<V> {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            context: None,
            display_name: name.clone(),
            name,
            file: None,
            line: 0,
            ty: None,
            local: false,
            external: false,
            value: None,
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Option<DescId>) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: Option<DescId>, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: Option<DescId>) -> Self {
        self.ty = ty;
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: V) -> Self {
        self.value = Some(value);
        self
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        DwarfTag::Variable
    }
}

impl<V: Clone> GlobalVariableDescriptor<V> {
    pub(super) fn lower<B>(&self, cx: &mut Lowering<'_, B>) -> V
    where
        B: NodeBuilder<Node = V>,
    {
        let b = cx.builder();
        b.md_node(&[
            b.tag(self.tag()),
            b.const_null(IntWidth::I32),
            cx.lower_opt(self.context),
            b.md_string(&self.name),
            b.md_string(&self.display_name),
            b.md_node(&[]),
            cx.lower_opt(self.file),
            b.const_u32(self.line),
            cx.lower_opt(self.ty),
            b.const_bool(self.local),
            // Stored as "is definition".
            b.const_bool(!self.external),
            self.value.clone().unwrap_or_else(|| b.null()),
        ])
    }
}

/// A local variable or function argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalVariableDescriptor {
    tag: DwarfTag,
    pub context: Option<DescId>,
    pub name: String,
    pub file: Option<DescId>,
    pub line: u32,
    /// 1-based argument number, 0 for a plain local.
    pub argument: u32,
    pub ty: Option<DescId>,
}

impl LocalVariableDescriptor {
    /// An unnamed variable with `tag` (normally `AutoVariable` or
    /// `ArgVariable`).
    pub fn new(tag: DwarfTag) -> Self {
        Self {
            tag,
            context: None,
            name: String::new(),
            file: None,
            line: 0,
            argument: 0,
            ty: None,
        }
    }

    pub fn auto(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new(DwarfTag::AutoVariable)
        }
    }

    /// Argument number `argument` (1-based) of the enclosing function.
    pub fn argument(name: impl Into<String>, argument: u32) -> Self {
        Self {
            name: name.into(),
            argument,
            ..Self::new(DwarfTag::ArgVariable)
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: Option<DescId>) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_file(mut self, file: Option<DescId>, line: u32) -> Self {
        self.file = file;
        self.line = line;
        self
    }

    #[must_use]
    pub fn with_type(mut self, ty: Option<DescId>) -> Self {
        self.ty = ty;
        self
    }

    #[inline]
    pub fn tag(&self) -> DwarfTag {
        self.tag
    }

    /// The line field as emitted: the argument number in bits 24 and up.
    /// The emitter truncates it to 32 bits.
    pub fn encoded_line(&self) -> u64 {
        u64::from(self.line) | (u64::from(self.argument) << 24)
    }

    pub(super) fn lower<B: NodeBuilder>(&self, cx: &mut Lowering<'_, B>) -> B::Node {
        let b = cx.builder();
        b.md_node(&[
            b.tag(self.tag),
            cx.lower_opt(self.context),
            b.md_string(&self.name),
            cx.lower_opt(self.file),
            b.const_int(IntWidth::I32, self.encoded_line(), false),
            cx.lower_opt(self.ty),
            // Flags and inlined-at.
            b.const_null(IntWidth::I32),
            b.const_null(IntWidth::I32),
        ])
    }
}
