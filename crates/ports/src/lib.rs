//! ports - 抽象 trait 层
//!
//! 验证流程依赖的所有外部协作者接口

mod directory;
mod mailer;
mod notifier;
mod store;

pub use directory::*;
pub use mailer::*;
pub use notifier::*;
pub use store::*;
