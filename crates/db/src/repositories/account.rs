//! Account repository for chart of accounts database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use balanza_core::coa::{CloneError, TemplateAccount, plan_clone};

use crate::entities::{chart_of_accounts, sea_orm_active_enums::AccountKind};

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account code already exists in tenant.
    #[error("Account code '{0}' already exists")]
    DuplicateCode(String),

    /// Parent account not found.
    #[error("Parent account not found: {0}")]
    ParentNotFound(Uuid),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// Template clone failed.
    #[error(transparent)]
    Clone(#[from] CloneError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating an account.
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    /// Tenant scope.
    pub tenant_id: Uuid,
    /// Account code (unique within the tenant).
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    pub kind: AccountKind,
    /// Parent account for hierarchical structure.
    pub parent_id: Option<Uuid>,
}

/// Account repository for chart-of-accounts operations.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a single account.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is taken, the parent is missing, or a
    /// database operation fails.
    pub async fn create(
        &self,
        input: CreateAccountInput,
    ) -> Result<chart_of_accounts::Model, AccountError> {
        let existing = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::TenantId.eq(input.tenant_id))
            .filter(chart_of_accounts::Column::Code.eq(input.code.clone()))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::DuplicateCode(input.code));
        }

        if let Some(parent_id) = input.parent_id {
            let parent = chart_of_accounts::Entity::find_by_id(parent_id)
                .filter(chart_of_accounts::Column::TenantId.eq(input.tenant_id))
                .one(&self.db)
                .await?;
            if parent.is_none() {
                return Err(AccountError::ParentNotFound(parent_id));
            }
        }

        let now = Utc::now().into();
        let account = chart_of_accounts::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(input.tenant_id),
            code: Set(input.code),
            name: Set(input.name),
            kind: Set(input.kind),
            parent_id: Set(input.parent_id),
            created_at: Set(now),
            updated_at: Set(now),
        };
        Ok(account.insert(&self.db).await?)
    }

    /// Clones a chart-of-accounts template for a tenant.
    ///
    /// Executes the two-pass plan in one transaction: create every account
    /// with a null parent, then resolve parent links by template code.
    /// This is what keeps the clone correct when the template lists
    /// children before their parents.
    ///
    /// # Errors
    ///
    /// Returns an error if the template is malformed or a database
    /// operation fails; on error nothing is created.
    pub async fn clone_template(
        &self,
        tenant_id: Uuid,
        template: &[TemplateAccount],
    ) -> Result<Vec<chart_of_accounts::Model>, AccountError> {
        let plan = plan_clone(template)?;
        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let mut created = Vec::with_capacity(plan.creates.len());
        for planned in &plan.creates {
            let account = chart_of_accounts::ActiveModel {
                id: Set(planned.id.into_inner()),
                tenant_id: Set(tenant_id),
                code: Set(planned.code.clone()),
                name: Set(planned.name.clone()),
                kind: Set(planned.kind.into()),
                parent_id: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            };
            created.push(account.insert(&txn).await?);
        }

        for (child, parent) in &plan.links {
            let account = chart_of_accounts::Entity::find_by_id(child.into_inner())
                .one(&txn)
                .await?
                .ok_or(AccountError::AccountNotFound(child.into_inner()))?;
            let mut active: chart_of_accounts::ActiveModel = account.into();
            active.parent_id = Set(Some(parent.into_inner()));
            active.update(&txn).await?;
        }

        txn.commit().await?;

        // Return the fully-linked rows.
        let accounts = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::TenantId.eq(tenant_id))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(accounts
            .into_iter()
            .filter(|a| created.iter().any(|c| c.id == a.id))
            .collect())
    }

    /// Finds an account by code within a tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_code<C: ConnectionTrait>(
        conn: &C,
        tenant_id: Uuid,
        code: &str,
    ) -> Result<Option<chart_of_accounts::Model>, AccountError> {
        let account = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::TenantId.eq(tenant_id))
            .filter(chart_of_accounts::Column::Code.eq(code))
            .one(conn)
            .await?;
        Ok(account)
    }

    /// Lists a tenant's accounts ordered by code.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<chart_of_accounts::Model>, AccountError> {
        let accounts = chart_of_accounts::Entity::find()
            .filter(chart_of_accounts::Column::TenantId.eq(tenant_id))
            .order_by_asc(chart_of_accounts::Column::Code)
            .all(&self.db)
            .await?;
        Ok(accounts)
    }
}
