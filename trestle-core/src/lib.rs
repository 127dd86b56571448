//! Trestle Core - Bridge core (pure logic, no IO)
//!
//! Contains the dynamic value model, the per-type host registry, the
//! coercion engine, and the dispatch machinery. Only operates on in-memory
//! data structures, no file IO or terminal output.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod bridge;
pub mod core;
pub mod registry;

// Re-export common types
pub use crate::core::error::{CoercionFailure, DispatchError, HostCallError};
pub use crate::core::value::{Callable, DynamicValue, HandleId, MapKey};
pub use bridge::BridgeCtx;
pub use registry::{
    host_ref, HostRef, HostValue, TypeDesc, TypeEntry, TypeEntryBuilder, TypeRegistry,
};

// Re-export config types from trestle-config
pub use trestle_config::{BridgeOptions, LimitConfig, Phase};
