//! Module-level registration of lowered compile units.

use inkwell::module::Module;
use tracing::debug;

use crate::builder::LlvmNode;
use crate::error::DebugEmitError;

/// Named metadata listing a module's compile units.
pub const COMPILE_UNITS: &str = "llvm.dbg.cu";

/// Append a lowered compile-unit node to `!llvm.dbg.cu`.
pub fn register_compile_unit<'ctx>(
    module: &Module<'ctx>,
    unit: LlvmNode<'ctx>,
) -> Result<(), DebugEmitError> {
    let unit = unit.as_metadata().ok_or(DebugEmitError::NotMetadata)?;
    module
        .add_global_metadata(COMPILE_UNITS, &unit)
        .map_err(|message| DebugEmitError::NamedMetadata {
            name: COMPILE_UNITS,
            message,
        })?;
    debug!(
        units = module.get_global_metadata_size(COMPILE_UNITS),
        "registered compile unit",
    );
    Ok(())
}
