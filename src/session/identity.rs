use serde::{Deserialize, Serialize};

/// 当前登录用户
///
/// 身份由运行环境提供（见 `AppConfig`）；没有身份时提交会被拒绝。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub user_id: String,
    pub full_name: Option<String>,
    pub department: Option<String>,
}

impl UserIdentity {
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.user_id)
    }
}
