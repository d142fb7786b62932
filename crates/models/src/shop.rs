use sea_orm::{entity::prelude::*, sea_query::Expr, Set, DatabaseConnection, ActiveModelTrait};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::{FieldViolation, ModelError};
use crate::user;

/// Category stored when the client does not pick one.
pub const DEFAULT_CATEGORY: &str = "successful";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "shop")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Owner }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Owner => Entity::belongs_to(user::Entity)
                .from(Column::Owner)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields a client may send when creating a shop. The owner is not part of it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewShop {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

impl NewShop {
    /// Check every required field and report all violations at once.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut violations = Vec::new();
        if non_blank(self.name.as_deref()).is_none() {
            violations.push(FieldViolation::new("name", "Name is required"));
        }
        if non_blank(self.email.as_deref()).is_none() {
            violations.push(FieldViolation::new("email", "Email is required"));
        }
        if violations.is_empty() { Ok(()) } else { Err(ModelError::Invalid(violations)) }
    }

    /// The record to store for `owner`: fresh id and timestamp, default category.
    /// Supplied values are kept exactly as sent.
    pub fn into_model(self, owner: Uuid) -> Result<Model, ModelError> {
        self.validate()?;
        Ok(Model {
            id: Uuid::new_v4(),
            owner,
            name: non_blank(self.name.as_deref()).unwrap_or_default(),
            email: non_blank(self.email.as_deref()).unwrap_or_default(),
            phone: non_blank(self.phone.as_deref()),
            category: non_blank(self.category.as_deref()).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            created_at: Utc::now().into(),
        })
    }

    pub fn into_active_model(self, owner: Uuid) -> Result<ActiveModel, ModelError> {
        let m = self.into_model(owner)?;
        Ok(ActiveModel {
            id: Set(m.id),
            owner: Set(m.owner),
            name: Set(m.name),
            email: Set(m.email),
            phone: Set(m.phone),
            category: Set(m.category),
            created_at: Set(m.created_at),
        })
    }
}

/// Sparse update set: only fields that were supplied with a non-blank value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShopPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
}

impl ShopPatch {
    pub fn new(name: Option<&str>, email: Option<&str>, phone: Option<&str>, category: Option<&str>) -> Self {
        Self {
            name: non_blank(name),
            email: non_blank(email),
            phone: non_blank(phone),
            category: non_blank(category),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.phone.is_none() && self.category.is_none()
    }

    /// Names of the columns this patch touches, for logging.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.name.is_some() { out.push("name"); }
        if self.email.is_some() { out.push("email"); }
        if self.phone.is_some() { out.push("phone"); }
        if self.category.is_some() { out.push("category"); }
        out
    }

    /// Add one `SET` clause per supplied field.
    pub fn apply_to_update(&self, mut update: sea_orm::UpdateMany<Entity>) -> sea_orm::UpdateMany<Entity> {
        if let Some(v) = &self.name { update = update.col_expr(Column::Name, Expr::value(v.clone())); }
        if let Some(v) = &self.email { update = update.col_expr(Column::Email, Expr::value(v.clone())); }
        if let Some(v) = &self.phone { update = update.col_expr(Column::Phone, Expr::value(v.clone())); }
        if let Some(v) = &self.category { update = update.col_expr(Column::Category, Expr::value(v.clone())); }
        update
    }

    /// Same field replacement, applied to an in-memory record.
    pub fn apply_to_model(&self, model: &mut Model) {
        if let Some(v) = &self.name { model.name = v.clone(); }
        if let Some(v) = &self.email { model.email = v.clone(); }
        if let Some(v) = &self.phone { model.phone = Some(v.clone()); }
        if let Some(v) = &self.category { model.category = v.clone(); }
    }
}

/// Whitespace-only counts as absent; anything else is kept untouched.
fn non_blank(v: Option<&str>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty()).map(str::to_string)
}

pub async fn create(db: &DatabaseConnection, owner: Uuid, input: NewShop) -> Result<Model, ModelError> {
    let am = input.into_active_model(owner)?;
    Ok(am.insert(db).await?)
}
