//! Admin credential check backing the session gate.

use subtle::ConstantTimeEq;
use tracing::info;

/// The single admin identity. Credentials come from configuration; there is
/// no per-user table and no role beyond this one.
#[derive(Clone)]
pub struct AdminAuth {
    username: String,
    password: String,
}

impl AdminAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Constant-time comparison of both fields. Failures are logged but never
    /// rate limited or locked out.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_ok: bool = self
            .username
            .as_bytes()
            .ct_eq(username.as_bytes())
            .into();
        let password_ok: bool = self
            .password
            .as_bytes()
            .ct_eq(password.as_bytes())
            .into();

        let ok = username_ok & password_ok;
        if !ok {
            info!(target = "foglio::auth", username = %username, "login rejected");
        }
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_matching_pair() {
        let auth = AdminAuth::new("admin", "admin123");
        assert!(auth.verify("admin", "admin123"));
    }

    #[test]
    fn rejects_wrong_password_and_wrong_user() {
        let auth = AdminAuth::new("admin", "admin123");
        assert!(!auth.verify("admin", "admin124"));
        assert!(!auth.verify("root", "admin123"));
        assert!(!auth.verify("", ""));
    }

    #[test]
    fn rejects_prefixes_and_extensions() {
        let auth = AdminAuth::new("admin", "admin123");
        assert!(!auth.verify("admin", "admin12"));
        assert!(!auth.verify("admin", "admin1234"));
    }
}
