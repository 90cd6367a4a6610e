//! AdminNotifier trait 定义

/// 管理日志通道
pub trait AdminNotifier: Send + Sync {
    /// 投递一条管理日志，立即返回，失败静默忽略
    fn log(&self, text: String);
}

/// 丢弃所有日志的实现
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl AdminNotifier for NoopNotifier {
    fn log(&self, _text: String) {}
}
