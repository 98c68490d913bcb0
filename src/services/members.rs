//! Member registration service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::member::{CreateMember, Member, UpdateMember},
    repository::Repository,
};

#[derive(Clone)]
pub struct MembersService {
    repository: Repository,
}

/// Trim and check the editable member fields
fn clean_fields(name: &str, email: &str) -> AppResult<(String, String)> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Member name cannot be empty".to_string()));
    }
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::Validation("Member email cannot be empty".to_string()));
    }
    Ok((name.to_string(), email.to_string()))
}

impl MembersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Member>> {
        self.repository.members.get_all().await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Member> {
        self.repository
            .members
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member {} not found", id)))
    }

    /// Register a new member
    pub async fn create(&self, data: &CreateMember) -> AppResult<Member> {
        let (name, email) = clean_fields(&data.name, &data.email)?;
        CreateMember { name: name.clone(), email: email.clone() }.validate()?;

        let member = Member {
            id: self.repository.members.next_id().await?,
            name,
            email,
        };
        self.repository.members.add(member.clone()).await?;

        tracing::info!(member_id = member.id, "Member '{}' registered", member.name);
        Ok(member)
    }

    /// Replace a member's name and email
    pub async fn update(&self, id: i32, data: &UpdateMember) -> AppResult<Member> {
        let (name, email) = clean_fields(&data.name, &data.email)?;
        UpdateMember { name: name.clone(), email: email.clone() }.validate()?;

        // update() is a silent no-op on unknown ids
        self.get_by_id(id).await?;

        let member = Member { id, name, email };
        self.repository.members.update(id, member.clone()).await?;

        tracing::info!(member_id = id, "Member updated");
        Ok(member)
    }

    /// Delete a member. History entries referencing it are kept.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let removed = self.repository.members.delete(id).await?;
        tracing::info!(member_id = id, removed, "Member deleted");
        Ok(())
    }
}
