use async_trait::async_trait;
use messaging_backend::domain::UserSummary;
use messaging_backend::error::AppResult;
use messaging_backend::infrastructure::repositories::UserDirectory;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
pub struct MockUserDirectory {
    pub users: Mutex<Vec<UserSummary>>,
}

impl MockUserDirectory {
    pub fn add_user(&self, summary: UserSummary) {
        self.users
            .lock()
            .expect("users mutex poisoned")
            .push(summary);
    }
}

#[async_trait]
impl UserDirectory for MockUserDirectory {
    async fn find_summary(&self, id: Uuid) -> AppResult<Option<UserSummary>> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn find_summaries(&self, ids: &[Uuid]) -> AppResult<Vec<UserSummary>> {
        Ok(self
            .users
            .lock()
            .expect("users mutex poisoned")
            .iter()
            .filter(|user| ids.contains(&user.id))
            .cloned()
            .collect())
    }
}
