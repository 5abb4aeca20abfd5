//! Database-backed stores for the framework identity layer.

use crate::models::user;
use async_trait::async_trait;
use plume::database::DbConnection;
use plume::identity::{IdentityUser, RoleStore, UserStore};
use plume::FrameworkError;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

fn to_identity(row: user::Model) -> IdentityUser {
    IdentityUser {
        id: row.id,
        username: row.username,
        email: row.email,
        password_hash: row.password_hash,
    }
}

pub struct DbUserStore {
    db: DbConnection,
}

impl DbUserStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for DbUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<IdentityUser>, FrameworkError> {
        let scope = self.db.scope();
        let row = user::Entity::find_by_id(id).one(scope.conn()).await?;
        Ok(row.map(to_identity))
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<IdentityUser>, FrameworkError> {
        let scope = self.db.scope();
        let row = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(scope.conn())
            .await?;
        Ok(row.map(to_identity))
    }
}

pub struct DbRoleStore {
    db: DbConnection,
}

impl DbRoleStore {
    pub fn new(db: DbConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RoleStore for DbRoleStore {
    async fn roles_for(&self, user_id: i64) -> Result<Vec<String>, FrameworkError> {
        let scope = self.db.scope();
        let row = user::Entity::find_by_id(user_id).one(scope.conn()).await?;
        Ok(row
            .map(|u| {
                u.role
                    .split(',')
                    .map(str::trim)
                    .filter(|r| !r.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default())
    }
}
