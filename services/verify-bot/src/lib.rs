//! verify-bot - Discord 事件适配层
//!
//! 把成员加入、按钮点击、表单提交转换为验证引擎调用，并把结果渲染成消息。

pub mod app;
pub mod components;
pub mod directory;
pub mod dispatch;
pub mod handler;
pub mod notifier;
pub mod render;

pub use app::serve;
