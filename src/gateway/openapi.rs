//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::actions::PaymentRequest;
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{
    BankView, ExchangeRequest, LinkTokenData, LinkedBankData, SignInRequest, SignUpRequest,
    UserView,
};
use crate::models::{
    Account, AccountDetail, AccountTransaction, AccountsSummary, Direction, SignUpParams,
    Transaction,
};
use crate::session::SESSION_COOKIE;

/// Session cookie security scheme
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "session_cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    SESSION_COOKIE,
                    "Session secret set by sign-up or sign-in (HttpOnly, SameSite=Strict)",
                ))),
            );
        }
    }
}

/// Main API Documentation struct
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Banklink API",
        version = "1.0.0",
        description = "Link bank accounts through Plaid and move money between them with Dwolla ACH transfers.",
        license(
            name = "MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::auth::sign_up,
        crate::gateway::handlers::auth::sign_in,
        crate::gateway::handlers::auth::logout,
        crate::gateway::handlers::auth::me,
        crate::gateway::handlers::bank::create_link_token,
        crate::gateway::handlers::bank::exchange_public_token,
        crate::gateway::handlers::bank::list_banks,
        crate::gateway::handlers::bank::get_bank,
        crate::gateway::handlers::bank::get_accounts,
        crate::gateway::handlers::bank::get_account,
        crate::gateway::handlers::transfer::send_payment,
        crate::gateway::handlers::transfer::get_transactions_by_bank_id,
    ),
    components(
        schemas(
            HealthResponse,
            SignUpParams,
            SignUpRequest,
            SignInRequest,
            ExchangeRequest,
            LinkTokenData,
            LinkedBankData,
            BankView,
            UserView,
            Account,
            AccountTransaction,
            AccountsSummary,
            AccountDetail,
            Direction,
            Transaction,
            PaymentRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Sign-up, sign-in and sessions"),
        (name = "Banks", description = "Bank linking and linked banks (session required)"),
        (name = "Accounts", description = "Balances and account history (session required)"),
        (name = "Transfers", description = "ACH transfers between linked accounts (session required)"),
        (name = "System", description = "Health checks and system info")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::OpenApi;

    #[test]
    fn test_openapi_document_generates() {
        let doc = ApiDoc::openapi();
        assert_eq!(doc.info.title, "Banklink API");
        assert_eq!(doc.info.version, "1.0.0");
        assert!(doc.to_json().is_ok());
    }

    #[test]
    fn test_endpoints_registered() {
        let doc = ApiDoc::openapi();
        let paths = doc.paths;
        assert!(paths.paths.contains_key("/api/v1/health"));
        assert!(paths.paths.contains_key("/api/v1/auth/sign-up"));
        assert!(paths.paths.contains_key("/api/v1/banks/exchange"));
        assert!(paths.paths.contains_key("/api/v1/transfers"));
        assert!(paths.paths.contains_key("/api/v1/transactions/{bankId}"));
    }

    #[test]
    fn test_security_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("should have components");
        assert!(components.security_schemes.contains_key("session_cookie"));
    }
}
