//! Members collection

use std::sync::Arc;

use super::{Collection, RecordStore, MEMBERS_KEY};
use crate::{error::AppResult, models::member::Member};

#[derive(Clone)]
pub struct MembersRepository {
    members: Collection<Member>,
}

impl MembersRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self {
            members: Collection::new(store, MEMBERS_KEY),
        }
    }

    pub async fn get_all(&self) -> AppResult<Vec<Member>> {
        self.members.load().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Option<Member>> {
        self.members.get_by_id(id).await
    }

    pub async fn next_id(&self) -> AppResult<i32> {
        self.members.next_id().await
    }

    pub async fn add(&self, member: Member) -> AppResult<()> {
        self.members.append(member).await
    }

    pub async fn update(&self, id: i32, member: Member) -> AppResult<bool> {
        self.members.update(id, member).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<usize> {
        self.members.delete(id).await
    }
}
