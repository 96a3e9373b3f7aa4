//! 持久化记录
//!
//! JSON 字段使用 camelCase，与浏览器端存储的数据格式保持一致。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 用户记录
///
/// 存储中最多只有一条。密码以明文保存，仅用于演示。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password: String,
    pub is_logged_in: bool,
}

impl UserRecord {
    /// 创建未登录的用户记录
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            is_logged_in: false,
        }
    }

    /// 是否为空对象（`{}`）
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 已上传文件的元数据记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileRecord {
    /// `文件名-毫秒时间戳`，不保证唯一
    pub id: String,
    pub name: String,
    /// MIME 类型，可能为空
    #[serde(rename = "type", default)]
    pub mime_type: String,
    pub size: u64,
    /// 记录创建时间（并非文件的真实修改时间）
    pub modified_at: DateTime<Utc>,
    #[serde(default)]
    pub is_folder: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_record_serialization() {
        let mut user = UserRecord::new("Alice", "alice@example.com", "secret");
        user.is_logged_in = true;

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("\"isLoggedIn\":true"));
        assert!(!json.contains("is_logged_in"));

        let parsed: UserRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, user);
    }

    #[test]
    fn test_user_record_empty_object() {
        let user: UserRecord = serde_json::from_str("{}").unwrap();
        assert!(user.is_empty());

        // 缺少 isLoggedIn 字段的旧数据
        let user: UserRecord =
            serde_json::from_str(r#"{"name":"Bob","email":"b@x.io","password":"pw"}"#).unwrap();
        assert!(!user.is_empty());
        assert!(!user.is_logged_in);
    }

    #[test]
    fn test_uploaded_file_record_browser_format() {
        // 浏览器端 `new Date()` 序列化出的时间带毫秒和 Z 后缀
        let json = r#"{
            "id": "a.txt-1700000000000",
            "name": "a.txt",
            "type": "text/plain",
            "size": 10,
            "modifiedAt": "2023-11-14T22:13:20.000Z",
            "isFolder": false
        }"#;

        let record: UploadedFileRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "a.txt");
        assert_eq!(record.mime_type, "text/plain");
        assert_eq!(record.size, 10);
        assert_eq!(record.modified_at.timestamp_millis(), 1_700_000_000_000);
        assert!(!record.is_folder);

        let serialized = serde_json::to_string(&record).unwrap();
        assert!(serialized.contains("\"type\":\"text/plain\""));
        assert!(serialized.contains("\"modifiedAt\":"));
        assert!(serialized.contains("\"isFolder\":false"));
        assert!(!serialized.contains("mime_type"));
    }
}
