pub mod auth;
pub mod bank;
pub mod health;
pub mod helpers;
pub mod transfer;

pub use auth::{logout, me, sign_in, sign_up};
pub use bank::{
    create_link_token, exchange_public_token, get_account, get_accounts, get_bank, list_banks,
};
pub use health::{HealthResponse, health_check};
pub use transfer::{get_transactions_by_bank_id, send_payment};
