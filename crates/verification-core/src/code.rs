//! 验证码生成

use rand::Rng;

/// 验证码长度
pub const CODE_LENGTH: usize = 6;

/// 生成6位数字验证码
///
/// 每一位独立均匀地取自 `0`-`9`，允许前导零与重复数字。
pub fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
