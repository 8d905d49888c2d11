/// Source of the signed-in user for the document service.
#[async_trait::async_trait]
pub trait CredentialSource: Send + Sync {
    /// `None` means nobody is logged in.
    async fn current_user_id(&self) -> Option<String>;
}

/// Credential supplied up front (flag, environment or config file).
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    user_id: Option<String>,
}

impl StaticCredentials {
    pub fn new(user_id: Option<String>) -> Self {
        Self {
            user_id: user_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }
}

#[async_trait::async_trait]
impl CredentialSource for StaticCredentials {
    async fn current_user_id(&self) -> Option<String> {
        self.user_id.clone()
    }
}
