//! [`NodeBuilder`] over an inkwell [`Context`].
//!
//! Descriptor nodes are built as legacy metadata-as-value tuples through the
//! LLVM C API. inkwell's own `metadata_node` only accepts metadata values, so
//! it can neither hold a null operand (how absent references are encoded) nor
//! embed a function or global directly.

use std::ffi::c_char;
use std::marker::PhantomData;
use std::ptr;

use inkwell::context::Context;
use inkwell::types::IntType;
use inkwell::values::{AsValueRef, FunctionValue, GlobalValue, MetadataValue};
use llvm_sys::core::{
    LLVMConstIntGetZExtValue, LLVMGetMDNodeNumOperands, LLVMGetMDNodeOperands, LLVMGetMDString,
    LLVMIsAConstantInt, LLVMIsAMDNode, LLVMIsAMDString, LLVMMDNodeInContext,
    LLVMMDStringInContext, LLVMMetadataAsValue, LLVMValueAsMetadata,
};
use llvm_sys::prelude::{LLVMMetadataRef, LLVMValueRef};
use mdgen_debuginfo::{IntWidth, NodeBuilder};

/// A metadata operand: constant, string, tuple, IR value, or null.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct LlvmNode<'ctx> {
    raw: LLVMValueRef,
    _context: PhantomData<&'ctx Context>,
}

impl<'ctx> LlvmNode<'ctx> {
    fn wrap(raw: LLVMValueRef) -> Self {
        Self {
            raw,
            _context: PhantomData,
        }
    }

    /// The absent operand.
    pub fn null() -> Self {
        Self::wrap(ptr::null_mut())
    }

    /// Embed a generated function (a subprogram's `function` slot).
    pub fn from_function(function: FunctionValue<'ctx>) -> Self {
        Self::wrap(function.as_value_ref())
    }

    /// Embed generated global storage (a global variable's `value` slot).
    pub fn from_global(global: GlobalValue<'ctx>) -> Self {
        Self::wrap(global.as_value_ref())
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.raw.is_null()
    }

    #[inline]
    pub fn as_value_ref(self) -> LLVMValueRef {
        self.raw
    }

    /// The operand as an inkwell metadata value, if it is a tuple or string.
    pub fn as_metadata(self) -> Option<MetadataValue<'ctx>> {
        if self.is_null() {
            return None;
        }
        // SAFETY: `raw` is a live value owned by the context `'ctx` borrows.
        unsafe {
            if LLVMIsAMDNode(self.raw).is_null() && LLVMIsAMDString(self.raw).is_null() {
                return None;
            }
            Some(MetadataValue::new(self.raw))
        }
    }

    /// Operands of a tuple, nulls included. `None` for anything else.
    pub fn operands(self) -> Option<Vec<LlvmNode<'ctx>>> {
        if self.is_null() {
            return None;
        }
        // SAFETY: `raw` is live; LLVMGetMDNodeOperands fills exactly
        // LLVMGetMDNodeNumOperands slots.
        unsafe {
            if LLVMIsAMDNode(self.raw).is_null() {
                return None;
            }
            let count = LLVMGetMDNodeNumOperands(self.raw) as usize;
            let mut raw = vec![ptr::null_mut(); count];
            LLVMGetMDNodeOperands(self.raw, raw.as_mut_ptr());
            Some(raw.into_iter().map(Self::wrap).collect())
        }
    }

    /// Zero-extended value of an integer constant.
    pub fn as_int(self) -> Option<u64> {
        if self.is_null() {
            return None;
        }
        // SAFETY: `raw` is live and checked to be a ConstantInt.
        unsafe {
            if LLVMIsAConstantInt(self.raw).is_null() {
                return None;
            }
            Some(LLVMConstIntGetZExtValue(self.raw))
        }
    }

    /// Text of a metadata string.
    pub fn as_string(self) -> Option<String> {
        if self.is_null() {
            return None;
        }
        // SAFETY: `raw` is live and checked to wrap an MDString; LLVM returns
        // a pointer to `len` bytes owned by the context.
        unsafe {
            if LLVMIsAMDString(self.raw).is_null() {
                return None;
            }
            let mut len = 0;
            let text = LLVMGetMDString(self.raw, &mut len);
            if text.is_null() {
                return Some(String::new());
            }
            let bytes = std::slice::from_raw_parts(text.cast::<u8>(), len as usize);
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// Builds descriptor nodes in one LLVM context.
pub struct LlvmNodeBuilder<'ctx> {
    context: &'ctx Context,
}

impl<'ctx> LlvmNodeBuilder<'ctx> {
    pub fn new(context: &'ctx Context) -> Self {
        Self { context }
    }

    #[inline]
    pub fn context(&self) -> &'ctx Context {
        self.context
    }

    fn int_type(&self, width: IntWidth) -> IntType<'ctx> {
        match width {
            IntWidth::I1 => self.context.bool_type(),
            IntWidth::I32 => self.context.i32_type(),
            IntWidth::I64 => self.context.i64_type(),
        }
    }

    /// Wrap an IR value as a metadata operand (`metadata ptr %x`), the form
    /// intrinsic calls take for their value arguments.
    pub fn value_as_metadata(&self, value: &impl AsValueRef) -> LlvmNode<'ctx> {
        // SAFETY: the value and the context are live for `'ctx`.
        let raw = unsafe {
            let md = LLVMValueAsMetadata(value.as_value_ref());
            LLVMMetadataAsValue(self.context.raw(), md)
        };
        LlvmNode::wrap(raw)
    }

    /// Wrap raw metadata (for example a `DIExpression`) as an operand.
    pub(crate) fn metadata_operand(&self, md: LLVMMetadataRef) -> LlvmNode<'ctx> {
        // SAFETY: `md` belongs to this context.
        LlvmNode::wrap(unsafe { LLVMMetadataAsValue(self.context.raw(), md) })
    }
}

impl<'ctx> NodeBuilder for LlvmNodeBuilder<'ctx> {
    type Node = LlvmNode<'ctx>;

    fn const_int(&self, width: IntWidth, value: u64, sign_extend: bool) -> LlvmNode<'ctx> {
        LlvmNode::wrap(self.int_type(width).const_int(value, sign_extend).as_value_ref())
    }

    fn const_null(&self, width: IntWidth) -> LlvmNode<'ctx> {
        LlvmNode::wrap(self.int_type(width).const_zero().as_value_ref())
    }

    fn const_all_ones(&self, width: IntWidth) -> LlvmNode<'ctx> {
        LlvmNode::wrap(self.int_type(width).const_all_ones().as_value_ref())
    }

    fn md_string(&self, text: &str) -> LlvmNode<'ctx> {
        // SAFETY: LLVM copies `text.len()` bytes; no terminator is needed.
        let raw = unsafe {
            LLVMMDStringInContext(
                self.context.raw(),
                text.as_ptr().cast::<c_char>(),
                text.len() as u32,
            )
        };
        LlvmNode::wrap(raw)
    }

    fn md_node(&self, fields: &[LlvmNode<'ctx>]) -> LlvmNode<'ctx> {
        let mut raw: Vec<LLVMValueRef> = fields.iter().map(|f| f.raw).collect();
        // SAFETY: every operand is null or a live value of this context.
        // Null operands become null metadata operands.
        let node = unsafe {
            LLVMMDNodeInContext(self.context.raw(), raw.as_mut_ptr(), raw.len() as u32)
        };
        LlvmNode::wrap(node)
    }

    fn null(&self) -> LlvmNode<'ctx> {
        LlvmNode::null()
    }
}
