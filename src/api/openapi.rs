//! OpenAPI document for the served routes.

use utoipa::OpenApi;

use crate::api::handlers::{auth, units};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::health::health,
        auth::register::register,
        auth::login::login,
        units::list_units,
        units::get_unit,
        units::create_unit,
        units::update_unit,
        units::delete_unit,
    ),
    components(schemas(
        auth::types::RegisterRequest,
        auth::types::LoginRequest,
        auth::types::UserResponse,
        auth::types::RegisterResponse,
        auth::types::LoginResponse,
        auth::types::AuthErrorBody,
        units::types::UnitRef,
        units::types::UnitResponse,
        units::types::UnitDetailResponse,
        units::types::CreateUnitRequest,
        units::types::UpdateUnitRequest,
        units::types::UnitMessage,
    )),
    tags(
        (name = "kampuso", description = "Campus administration API"),
        (name = "auth", description = "Administrator registration and login"),
        (name = "units", description = "Institution unit hierarchy"),
    )
)]
pub struct ApiDoc;
