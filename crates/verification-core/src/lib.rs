//! mailgate-verification-core - 邮箱验证状态机
//!
//! 未验证 → 等待验证码 → 已验证，包含冷却、域名白名单与验证码比对。

mod code;
mod engine;
mod locks;
mod metrics;
mod outcome;
mod store;

pub use code::{CODE_LENGTH, generate_code};
pub use engine::{EngineSettings, VerificationEngine, email_domain};
pub use outcome::VerificationOutcome;
pub use store::InMemoryVerificationStore;
