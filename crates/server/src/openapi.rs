use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// Wire shape of a stored shop.
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
pub struct ShopDoc {
    pub id: Uuid,
    pub owner: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: String,
    pub created_at: String,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
    pub errors: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::me,
        crate::routes::shops::list,
        crate::routes::shops::create,
        crate::routes::shops::update,
        crate::routes::shops::delete,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            ShopDoc,
            FieldErrorDoc,
            ErrorDoc,
            crate::routes::auth::RegisterOutput,
            crate::routes::auth::LoginOutput,
            crate::routes::auth::MeOutput,
            crate::routes::shops::CreateShopInput,
            crate::routes::shops::UpdateShopInput,
            crate::routes::shops::MessageOutput,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "shops")
    )
)]
pub struct ApiDoc;
