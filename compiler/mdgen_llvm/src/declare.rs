//! `llvm.dbg.declare` emission.
//!
//! The intrinsic comes from LLVM's intrinsic catalog rather than being
//! declared by hand, so its signature always matches the LLVM in use. The
//! handle is validated before any call is built.

use std::ptr;

use inkwell::builder::{Builder, BuilderError};
use inkwell::intrinsics::Intrinsic;
use inkwell::module::Module;
use inkwell::types::AsTypeRef;
use inkwell::values::{AsValueRef, FunctionValue, InstructionValue, PointerValue};
use llvm_sys::core::LLVMBuildCall2;
use llvm_sys::debuginfo::{
    LLVMCreateDIBuilderDisallowUnresolved, LLVMDIBuilderCreateExpression, LLVMDisposeDIBuilder,
};
use llvm_sys::prelude::LLVMValueRef;
use tracing::debug;

use crate::builder::{LlvmNode, LlvmNodeBuilder};
use crate::error::DebugEmitError;

/// Name of the declare intrinsic.
pub const DBG_DECLARE: &str = "llvm.dbg.declare";

/// Get or declare `llvm.dbg.declare` in `module`.
pub fn declare_intrinsic<'ctx>(
    module: &Module<'ctx>,
) -> Result<FunctionValue<'ctx>, DebugEmitError> {
    let function = Intrinsic::find(DBG_DECLARE).and_then(|i| i.get_declaration(module, &[]));
    check_declare(function)
}

/// Validate a handle obtained for the declare intrinsic.
pub fn check_declare(
    function: Option<FunctionValue<'_>>,
) -> Result<FunctionValue<'_>, DebugEmitError> {
    let function = function.ok_or(DebugEmitError::NotAFunction)?;
    let name = function.get_name().to_string_lossy();
    if name != DBG_DECLARE {
        return Err(DebugEmitError::NameMismatch {
            found: name.into_owned(),
        });
    }
    Ok(function)
}

/// Emit `call void @llvm.dbg.declare(metadata ptr %storage, metadata !var, ...)`
/// at the builder's position.
///
/// `variable` is the lowered local-variable node. When the intrinsic takes an
/// expression operand an empty `DIExpression` is passed.
pub fn insert_declare<'ctx>(
    nodes: &LlvmNodeBuilder<'ctx>,
    builder: &Builder<'ctx>,
    module: &Module<'ctx>,
    storage: PointerValue<'ctx>,
    variable: LlvmNode<'ctx>,
) -> Result<InstructionValue<'ctx>, DebugEmitError> {
    let declare = declare_intrinsic(module)?;
    if variable.is_null() {
        return Err(DebugEmitError::NotMetadata);
    }
    if builder.get_insert_block().is_none() {
        return Err(BuilderError::UnsetPosition.into());
    }

    let mut args: Vec<LLVMValueRef> = vec![
        nodes.value_as_metadata(&storage).as_value_ref(),
        variable.as_value_ref(),
    ];
    if declare.count_params() > 2 {
        args.push(empty_expression(nodes, module).as_value_ref());
    }

    // SAFETY: the builder is positioned, `declare` is a function of this
    // module, and the argument count matches its type.
    let call = unsafe {
        LLVMBuildCall2(
            builder.as_mut_ptr(),
            declare.get_type().as_type_ref(),
            declare.as_value_ref(),
            args.as_mut_ptr(),
            args.len() as u32,
            c"".as_ptr(),
        )
    };
    debug!(
        storage = %storage.get_name().to_string_lossy(),
        operands = args.len(),
        "inserted llvm.dbg.declare",
    );
    // SAFETY: LLVMBuildCall2 returns the new call instruction.
    Ok(unsafe { InstructionValue::new(call) })
}

/// An empty `DIExpression` in the module's context.
fn empty_expression<'ctx>(nodes: &LlvmNodeBuilder<'ctx>, module: &Module<'ctx>) -> LlvmNode<'ctx> {
    // SAFETY: the DIBuilder is disposed before returning; the expression is
    // uniqued in the context and outlives it.
    let expression = unsafe {
        let di = LLVMCreateDIBuilderDisallowUnresolved(module.as_mut_ptr());
        let expression = LLVMDIBuilderCreateExpression(di, ptr::null_mut(), 0);
        LLVMDisposeDIBuilder(di);
        expression
    };
    nodes.metadata_operand(expression)
}
