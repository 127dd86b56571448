//! Trestle Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Trestle crates.

/// Bridge construction options
#[derive(Debug, Clone)]
pub struct BridgeOptions {
    /// Class names exposed into the pre-populated namespace at bridge
    /// initialization. An empty list means "whatever the host library
    /// considers well-known".
    pub preload: Vec<String>,
    /// Execution limits
    pub limits: LimitConfig,
}

/// Configuration for resource limits
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Maximum number of bytes `open` will read from a host file
    pub max_open_bytes: usize,
}

/// Bridge phase enum for phase-specific log targets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Registry,
    Coerce,
    Marshal,
    Dispatch,
    Facade,
    Cli,
}

impl Phase {
    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Registry => "registry",
            Phase::Coerce => "coerce",
            Phase::Marshal => "marshal",
            Phase::Dispatch => "dispatch",
            Phase::Facade => "facade",
            Phase::Cli => "cli",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("trestle::{}", self.as_str())
    }
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            preload: Vec::new(),
            limits: LimitConfig::default(),
        }
    }
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            // SWF 文件极少超过 64 MiB；超出视为异常输入
            max_open_bytes: 64 * 1024 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bridge_options() {
        let cfg = BridgeOptions::default();
        assert!(cfg.preload.is_empty());
        assert_eq!(cfg.limits.max_open_bytes, 64 * 1024 * 1024);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Coerce.as_str(), "coerce");
        assert_eq!(Phase::Dispatch.target(), "trestle::dispatch");
    }
}
