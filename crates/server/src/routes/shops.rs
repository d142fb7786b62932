use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use models::shop::{self, NewShop, ShopPatch};
use service::errors::ServiceError;

use crate::errors::JsonApiError;
use crate::routes::auth::{CurrentUser, ServerState};

/// Create body. Any `owner`/`user` field a client sends is ignored.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateShopInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "type")]
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateShopInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(alias = "type")]
    pub category: Option<String>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct MessageOutput {
    pub message: String,
}

impl From<CreateShopInput> for NewShop {
    fn from(i: CreateShopInput) -> Self {
        NewShop { name: i.name, email: i.email, phone: i.phone, category: i.category }
    }
}

impl From<&UpdateShopInput> for ShopPatch {
    fn from(i: &UpdateShopInput) -> Self {
        ShopPatch::new(i.name.as_deref(), i.email.as_deref(), i.phone.as_deref(), i.category.as_deref())
    }
}

fn shop_error(e: ServiceError, action: &'static str) -> JsonApiError {
    match e {
        ServiceError::Invalid(fields) => JsonApiError::validation(fields),
        ServiceError::Validation(msg) => JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg)),
        ServiceError::NotFound(_) => JsonApiError::new(StatusCode::NOT_FOUND, "Shop not found", None),
        ServiceError::Unauthorized(_) => JsonApiError::unauthorized("Not authorized"),
        ServiceError::Db(msg) => {
            error!(action, err = %msg, "shop storage failure");
            JsonApiError::server_error()
        }
    }
}

/// Ids that are not UUIDs cannot name an existing shop.
fn parse_id(raw: &str) -> Result<Uuid, JsonApiError> {
    Uuid::parse_str(raw).map_err(|_| JsonApiError::new(StatusCode::NOT_FOUND, "Shop not found", None))
}

#[utoipa::path(get, path = "/api/shops", tag = "shops", responses((status = 200, description = "Shops of the caller, newest first", body = [crate::openapi::ShopDoc]), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)))]
pub async fn list(State(state): State<ServerState>, user: CurrentUser) -> Result<Json<Vec<shop::Model>>, JsonApiError> {
    let shops = state.shops.list(user.id).await.map_err(|e| shop_error(e, "list"))?;
    Ok(Json(shops))
}

#[utoipa::path(post, path = "/api/shops", tag = "shops", request_body = CreateShopInput, responses((status = 200, description = "Created", body = crate::openapi::ShopDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc)))]
pub async fn create(
    State(state): State<ServerState>,
    user: CurrentUser,
    WithRejection(Json(input), _): WithRejection<Json<CreateShopInput>, JsonApiError>,
) -> Result<Json<shop::Model>, JsonApiError> {
    let created = state.shops.create(user.id, input.into()).await.map_err(|e| shop_error(e, "create"))?;
    Ok(Json(created))
}

#[utoipa::path(put, path = "/api/shops/{id}", tag = "shops", params(("id" = String, Path, description = "Shop id")), request_body = UpdateShopInput, responses((status = 200, description = "Updated", body = crate::openapi::ShopDoc), (status = 400, description = "Bad Request", body = crate::openapi::ErrorDoc), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc), (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)))]
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
    WithRejection(Json(input), _): WithRejection<Json<UpdateShopInput>, JsonApiError>,
) -> Result<Json<shop::Model>, JsonApiError> {
    let id = parse_id(&id)?;
    let updated = state
        .shops
        .update(user.id, id, ShopPatch::from(&input))
        .await
        .map_err(|e| shop_error(e, "update"))?;
    Ok(Json(updated))
}

#[utoipa::path(delete, path = "/api/shops/{id}", tag = "shops", params(("id" = String, Path, description = "Shop id")), responses((status = 200, description = "Removed", body = MessageOutput), (status = 401, description = "Unauthorized", body = crate::openapi::ErrorDoc), (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)))]
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<MessageOutput>, JsonApiError> {
    let id = parse_id(&id)?;
    state.shops.delete(user.id, id).await.map_err(|e| shop_error(e, "delete"))?;
    Ok(Json(MessageOutput { message: "Shop removed".into() }))
}
