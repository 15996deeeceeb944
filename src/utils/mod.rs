pub mod password;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// 生成 URL 安全的随机令牌（用于未配置时的 JWT 密钥）
///
/// `bytes` 是随机字节数，输出长度约为 `bytes * 4 / 3`
pub fn generate_secure_token(bytes: usize) -> String {
    let raw: Vec<u8> = std::iter::repeat_with(rand::random::<u8>)
        .take(bytes)
        .collect();
    URL_SAFE_NO_PAD.encode(raw)
}

/// Returns `s` trimmed, or `None` when nothing is left.
pub fn non_blank(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
