use log::{debug, info};

use super::{AuthError, AuthResult};
use crate::storage::{SessionStore, UserRecord};

/// 登录闸门
///
/// 每次登录尝试最多读取一次存储、写入一次存储。
#[derive(Debug, Clone)]
pub struct CredentialGate {
    session: SessionStore,
}

impl CredentialGate {
    pub fn new(session: SessionStore) -> Self {
        Self { session }
    }

    /// 校验邮箱和密码，成功后将存储中的记录标记为已登录
    pub fn login(&self, email: &str, password: &str) -> AuthResult<UserRecord> {
        if email.is_empty() || password.is_empty() {
            return Err(AuthError::Validation);
        }

        let stored = self
            .session
            .read_user()
            .filter(|user| user.email == email && user.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let user = UserRecord {
            name: stored.name,
            email: stored.email,
            password: stored.password,
            is_logged_in: true,
        };
        self.session.write_user(&user)?;

        info!("User {} logged in", user.email);
        Ok(user)
    }

    /// 注册（覆盖存储中唯一的用户记录）
    ///
    /// 不做任何字段校验，账号创建规则由调用方决定。
    pub fn register(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> AuthResult<UserRecord> {
        let user = UserRecord::new(name, email, password);
        self.session.write_user(&user)?;
        debug!("Registered user {}", user.email);
        Ok(user)
    }

    /// 退出登录，返回之前是否处于登录状态
    pub fn logout(&self) -> AuthResult<bool> {
        let Some(mut user) = self.session.read_user() else {
            return Ok(false);
        };
        if !user.is_logged_in {
            return Ok(false);
        }

        user.is_logged_in = false;
        self.session.write_user(&user)?;
        info!("User {} logged out", user.email);
        Ok(true)
    }

    /// 当前已登录的用户
    pub fn current_user(&self) -> Option<UserRecord> {
        self.session.read_user().filter(|user| user.is_logged_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore, StoreResult, USER_DATA_KEY};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 统计读写次数的后端
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> StoreResult<Option<String>> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> StoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> StoreResult<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.remove(key)
        }
    }

    fn setup(user: Option<UserRecord>) -> (CredentialGate, Arc<CountingStore>) {
        let backend = Arc::new(CountingStore::default());
        if let Some(user) = user {
            backend
                .inner
                .set(USER_DATA_KEY, &serde_json::to_string(&user).unwrap())
                .unwrap();
        }
        let gate = CredentialGate::new(SessionStore::from_arc(backend.clone()));
        (gate, backend)
    }

    fn alice() -> UserRecord {
        UserRecord::new("Alice", "alice@example.com", "hunter2")
    }

    #[test]
    fn test_login_success_marks_logged_in() {
        let (gate, backend) = setup(Some(alice()));

        let user = gate.login("alice@example.com", "hunter2").unwrap();
        assert!(user.is_logged_in);
        assert_eq!(user.name, "Alice");

        assert_eq!(backend.reads.load(Ordering::SeqCst), 1);
        assert_eq!(backend.writes.load(Ordering::SeqCst), 1);

        let stored = gate.current_user().unwrap();
        assert!(stored.is_logged_in);
        assert_eq!(stored.email, "alice@example.com");
    }

    #[test]
    fn test_login_twice_still_works() {
        let (gate, _) = setup(Some(alice()));
        gate.login("alice@example.com", "hunter2").unwrap();
        gate.login("alice@example.com", "hunter2").unwrap();
    }

    #[test]
    fn test_empty_fields_rejected_without_touching_store() {
        let (gate, backend) = setup(Some(alice()));

        for (email, password) in [("", "hunter2"), ("alice@example.com", ""), ("", "")] {
            let err = gate.login(email, password).unwrap_err();
            assert!(matches!(err, AuthError::Validation));
        }

        assert_eq!(backend.reads.load(Ordering::SeqCst), 0);
        assert_eq!(backend.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mismatch_and_missing_account_are_indistinguishable() {
        let (gate, backend) = setup(Some(alice()));
        let wrong_email = gate.login("bob@example.com", "hunter2").unwrap_err();
        let wrong_password = gate.login("alice@example.com", "nope").unwrap_err();
        assert_eq!(backend.writes.load(Ordering::SeqCst), 0);

        let (empty_gate, empty_backend) = setup(None);
        let no_account = empty_gate.login("alice@example.com", "hunter2").unwrap_err();
        assert_eq!(empty_backend.writes.load(Ordering::SeqCst), 0);

        let messages: Vec<String> = [wrong_email, wrong_password, no_account]
            .iter()
            .map(|e| {
                assert!(matches!(e, AuthError::InvalidCredentials));
                e.to_string()
            })
            .collect();
        assert!(messages.iter().all(|m| m == &messages[0]));
        assert_ne!(messages[0], AuthError::Validation.to_string());
    }

    #[test]
    fn test_failed_login_leaves_flag_unset() {
        let (gate, _) = setup(Some(alice()));
        let _ = gate.login("alice@example.com", "wrong");
        assert!(gate.current_user().is_none());
    }

    #[test]
    fn test_register_then_login_then_logout() {
        let (gate, _) = setup(None);
        let user = gate.register("Carol", "carol@example.com", "pw").unwrap();
        assert!(!user.is_logged_in);
        assert!(gate.current_user().is_none());

        gate.login("carol@example.com", "pw").unwrap();
        assert_eq!(gate.current_user().unwrap().name, "Carol");

        assert!(gate.logout().unwrap());
        assert!(gate.current_user().is_none());
        assert!(!gate.logout().unwrap());
    }
}
