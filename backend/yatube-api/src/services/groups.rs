/// Group service - read-only access to groups
use crate::db::Repository;
use crate::error::{AppError, Result};
use crate::models::Group;
use std::sync::Arc;

pub struct GroupService {
    repo: Arc<dyn Repository>,
}

impl GroupService {
    pub fn new(repo: Arc<dyn Repository>) -> Self {
        Self { repo }
    }

    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        self.repo.list_groups().await
    }

    pub async fn get_group(&self, group_id: i64) -> Result<Group> {
        self.repo
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Group {} not found", group_id)))
    }
}
