//! CLI 配置
//!
//! 包含 CLI 特有的日志配置：全局级别 + 按组件（Phase）覆盖

use tracing::Level;
use trestle_config::Phase;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: Level,
    pub registry: Option<Level>,
    pub coerce: Option<Level>,
    pub marshal: Option<Level>,
    pub dispatch: Option<Level>,
    pub facade: Option<Level>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            global: Level::WARN,
            registry: None,
            coerce: None,
            marshal: None,
            dispatch: None,
            facade: None,
        }
    }
}

impl LogConfig {
    /// Get log level for a bridge phase
    pub fn level_for(&self, phase: Phase) -> Level {
        match phase {
            Phase::Registry => self.registry.unwrap_or(self.global),
            Phase::Coerce => self.coerce.unwrap_or(self.global),
            Phase::Marshal => self.marshal.unwrap_or(self.global),
            Phase::Dispatch => self.dispatch.unwrap_or(self.global),
            Phase::Facade => self.facade.unwrap_or(self.global),
            Phase::Cli => self.global,
        }
    }
}
