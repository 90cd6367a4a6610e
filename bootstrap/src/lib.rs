//! mailgate-bootstrap - 统一启动骨架
//!
//! 配置加载、运行时初始化、基础设施组装与后台清理任务

mod infrastructure;
mod runtime;
mod starter;
mod sweeper;

pub use infrastructure::*;
pub use runtime::*;
pub use starter::*;
pub use sweeper::*;
