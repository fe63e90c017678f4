// OpenAPI document generation
//
// Served by the API at /openapi and printed by the export-openapi binary.

use crate::api;
use sourcecoop_core::{
    Account, AccountFlag, AccountProfile, AccountType, Action, ApiKey, DataMode, Membership,
    MembershipRole, MembershipState, Product, ProductVisibility, UserSession,
};
use utoipa::OpenApi;

/// OpenAPI documentation for the Source Cooperative session API
#[derive(OpenApi)]
#[openapi(
    servers(
        (url = "/api", description = "Default API prefix"),
    ),
    paths(
        api::whoami::whoami,
        api::whoami::check_session,
        api::products::list_featured,
        api::products::list_products,
        api::products::list_account_products,
        api::products::get_product,
        api::products::get_permissions,
        api::products::list_product_api_keys,
        api::products::list_product_members,
        api::accounts::get_account,
        api::accounts::get_account_flags,
        api::accounts::list_members,
        api::accounts::list_api_keys,
        api::accounts::get_api_key,
        api::accounts::get_membership,
        api::accounts::check_id,
    ),
    components(
        schemas(
            Account, AccountType, AccountFlag, AccountProfile,
            Product, ProductVisibility, DataMode,
            Membership, MembershipRole, MembershipState,
            ApiKey, Action, UserSession,
            api::ErrorResponse,
            api::whoami::CheckSessionResponse, api::whoami::CheckSessionError,
            api::products::ProductList, api::products::DataPermission,
            api::accounts::CheckIdRequest, api::accounts::CheckIdResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Session introspection endpoints"),
        (name = "products", description = "Product listing and permission endpoints"),
        (name = "accounts", description = "Account, membership and API key endpoints"),
    ),
    info(
        title = "Source Cooperative API",
        version = "0.3.0",
        description = "Session resolution and authorization for Source Cooperative",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
pub struct ApiDoc;

impl ApiDoc {
    /// Render the OpenAPI document as pretty JSON
    pub fn to_json() -> String {
        ApiDoc::openapi()
            .to_pretty_json()
            .expect("Failed to serialize OpenAPI document")
    }
}
