//! In-memory metadata nodes.
//!
//! [`MetadataArena`] implements [`NodeBuilder`] without any code-generation
//! library behind it. Every constructor call appends to the arena, so two
//! calls with identical operands yield two distinct nodes and node identity
//! stays observable. The arena renders its contents in the textual form of
//! LLVM 3.x metadata:
//!
//! ```text
//! !0 = metadata !{metadata !"main.x", metadata !"/src"}
//! !1 = metadata !{i32 786468, metadata !0, null, metadata !"int", ...}
//! ```

use std::cell::RefCell;
use std::fmt::Write as _;

use crate::node::{IntWidth, NodeBuilder};

/// Index of a metadata tuple in a [`MetadataArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Index of a metadata string in a [`MetadataArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct StringId(u32);

/// Index of a named IR value handle in a [`MetadataArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct ValueId(u32);

/// A metadata operand produced by [`MetadataArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MdRef {
    /// Absent reference.
    Null,
    /// Integer constant, already truncated to `width`.
    Int { width: IntWidth, value: u64 },
    String(StringId),
    Node(NodeId),
    /// Generated IR value (function or global storage).
    Value(ValueId),
}

impl MdRef {
    #[inline]
    pub fn is_null(self) -> bool {
        matches!(self, Self::Null)
    }

    /// The constant's value, if this is an integer.
    pub fn as_int(self) -> Option<u64> {
        match self {
            Self::Int { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The constant's width, if this is an integer.
    pub fn int_width(self) -> Option<IntWidth> {
        match self {
            Self::Int { width, .. } => Some(width),
            _ => None,
        }
    }

    pub fn as_node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(id),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ArenaData {
    strings: Vec<String>,
    nodes: Vec<Vec<MdRef>>,
    values: Vec<String>,
}

/// Arena-backed [`NodeBuilder`].
#[derive(Default)]
pub struct MetadataArena {
    data: RefCell<ArenaData>,
}

impl MetadataArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for a generated IR value named `name` (rendered as `@name`).
    pub fn value(&self, name: &str) -> MdRef {
        let mut data = self.data.borrow_mut();
        let id = ValueId(data.values.len() as u32);
        data.values.push(name.to_owned());
        MdRef::Value(id)
    }

    /// Operands of `node`, or `None` if it is not a tuple.
    pub fn fields(&self, node: MdRef) -> Option<Vec<MdRef>> {
        let id = node.as_node()?;
        self.data.borrow().nodes.get(id.0 as usize).cloned()
    }

    /// Operand `index` of `node`.
    pub fn field(&self, node: MdRef, index: usize) -> Option<MdRef> {
        let id = node.as_node()?;
        self.data.borrow().nodes.get(id.0 as usize)?.get(index).copied()
    }

    /// Text of a metadata string operand.
    pub fn string(&self, md: MdRef) -> Option<String> {
        match md {
            MdRef::String(id) => self.data.borrow().strings.get(id.0 as usize).cloned(),
            _ => None,
        }
    }

    /// Name of a value handle.
    pub fn value_name(&self, md: MdRef) -> Option<String> {
        match md {
            MdRef::Value(id) => self.data.borrow().values.get(id.0 as usize).cloned(),
            _ => None,
        }
    }

    /// Number of tuples built so far.
    pub fn node_count(&self) -> usize {
        self.data.borrow().nodes.len()
    }

    /// Render one operand as it appears inside a tuple.
    pub fn render_operand(&self, md: MdRef) -> String {
        let data = self.data.borrow();
        render_operand(&data, md)
    }

    /// Render every tuple, one per line, in creation order.
    pub fn render(&self) -> String {
        let data = self.data.borrow();
        let mut out = String::new();
        for (index, fields) in data.nodes.iter().enumerate() {
            let operands: Vec<String> = fields.iter().map(|&f| render_operand(&data, f)).collect();
            // Writing into a String cannot fail.
            let _ = writeln!(out, "!{index} = metadata !{{{}}}", operands.join(", "));
        }
        out
    }
}

fn render_operand(data: &ArenaData, md: MdRef) -> String {
    match md {
        MdRef::Null => "null".to_owned(),
        MdRef::Int {
            width: IntWidth::I1,
            value,
        } => format!("i1 {}", if value == 0 { "false" } else { "true" }),
        MdRef::Int {
            width: IntWidth::I32,
            value,
        } => format!("i32 {}", value as u32 as i32),
        MdRef::Int {
            width: IntWidth::I64,
            value,
        } => format!("i64 {}", value as i64),
        MdRef::String(id) => {
            let text = data.strings.get(id.0 as usize).map_or("", String::as_str);
            format!("metadata !{text:?}")
        }
        MdRef::Node(id) => format!("metadata !{}", id.0),
        MdRef::Value(id) => {
            let name = data.values.get(id.0 as usize).map_or("", String::as_str);
            format!("@{name}")
        }
    }
}

impl NodeBuilder for MetadataArena {
    type Node = MdRef;

    fn const_int(&self, width: IntWidth, value: u64, _sign_extend: bool) -> MdRef {
        MdRef::Int {
            width,
            value: value & width.mask(),
        }
    }

    fn const_null(&self, width: IntWidth) -> MdRef {
        MdRef::Int { width, value: 0 }
    }

    fn const_all_ones(&self, width: IntWidth) -> MdRef {
        MdRef::Int {
            width,
            value: width.mask(),
        }
    }

    fn md_string(&self, text: &str) -> MdRef {
        let mut data = self.data.borrow_mut();
        let id = StringId(data.strings.len() as u32);
        data.strings.push(text.to_owned());
        MdRef::String(id)
    }

    fn md_node(&self, fields: &[MdRef]) -> MdRef {
        let mut data = self.data.borrow_mut();
        let id = NodeId(data.nodes.len() as u32);
        data.nodes.push(fields.to_vec());
        MdRef::Node(id)
    }

    fn null(&self) -> MdRef {
        MdRef::Null
    }
}
