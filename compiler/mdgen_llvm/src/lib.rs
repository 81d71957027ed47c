//! LLVM backend for mdgen debug descriptors.
//!
//! Implements [`NodeBuilder`](mdgen_debuginfo::NodeBuilder) over an inkwell
//! [`Context`](inkwell::context::Context) so a descriptor set can be lowered
//! into real LLVM metadata, and emits the `llvm.dbg.declare` calls that tie
//! stack slots to their variable descriptors.
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=mdgen_llvm=debug`: Log declare insertion and compile-unit
//!   registration.
//! - `RUST_LOG=mdgen_debuginfo=trace`: Log every descriptor cache hit and miss.
//!
//! # Example
//!
//! ```ignore
//! use inkwell::context::Context;
//! use mdgen_debuginfo::{DebugInfo, DebugInfoConfig, LocalVariableDescriptor};
//! use mdgen_llvm::{insert_declare, register_compile_unit, LlvmNodeBuilder};
//!
//! let context = Context::create();
//! let module = context.create_module("main");
//! let nodes = LlvmNodeBuilder::new(&context);
//!
//! let mut di = DebugInfo::new("/src/main.x", DebugInfoConfig::development());
//! let x = di.add(LocalVariableDescriptor::auto("x"));
//! let (unit, mut lowering) = di.finish(&nodes);
//! register_compile_unit(&module, unit)?;
//!
//! // ... position `builder` after the alloca for `x` ...
//! insert_declare(&nodes, &builder, &module, slot, lowering.lower(x))?;
//! ```

#![allow(clippy::cast_possible_truncation)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod builder;
pub mod declare;
pub mod emit;
pub mod error;

use std::sync::Once;

pub use builder::{LlvmNode, LlvmNodeBuilder};
pub use declare::{check_declare, declare_intrinsic, insert_declare, DBG_DECLARE};
pub use emit::{register_compile_unit, COMPILE_UNITS};
pub use error::DebugEmitError;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing subscriber for debug output.
///
/// Call this early to enable `RUST_LOG` environment variable support.
/// Safe to call multiple times; only the first call has effect.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
