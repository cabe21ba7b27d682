//! Server-side actions
//!
//! Thin services that forward to the external platforms and reshape their
//! responses. Each service owns `Arc` handles to the client traits, so the
//! whole set is cheap to clone into request handlers.
//!
//! ```text
//! PaymentActions ◀── UserActions ◀── TransactionActions ◀── BankActions
//!   (Dwolla)      (Appwrite, Plaid)     (transfer records)    (read models)
//! ```

pub mod bank;
pub mod error;
pub mod payment;
pub mod transaction;
pub mod user;


pub use bank::BankActions;
pub use error::ActionError;
pub use payment::PaymentActions;
pub use transaction::{PaymentRequest, TransactionActions};
pub use user::UserActions;

use std::sync::Arc;

use crate::appwrite::{Collection, DocumentStore, IdentityService};
use crate::config::AppwriteConfig;
use crate::dwolla::PaymentProcessor;
use crate::plaid::Aggregator;

/// External client handles, constructed once per process
#[derive(Clone)]
pub struct Clients {
    pub identity: Arc<dyn IdentityService>,
    pub documents: Arc<dyn DocumentStore>,
    pub aggregator: Arc<dyn Aggregator>,
    pub processor: Arc<dyn PaymentProcessor>,
}

#[derive(Debug, Clone)]
pub struct CollectionIds {
    pub user: String,
    pub bank: String,
    pub transaction: String,
}

impl From<&AppwriteConfig> for CollectionIds {
    fn from(config: &AppwriteConfig) -> Self {
        Self {
            user: config.user_collection_id.clone(),
            bank: config.bank_collection_id.clone(),
            transaction: config.transaction_collection_id.clone(),
        }
    }
}

#[derive(Clone)]
pub struct Actions {
    pub users: UserActions,
    pub transactions: TransactionActions,
    pub payments: PaymentActions,
    pub banks: BankActions,
}

impl Actions {
    pub fn new(clients: Clients, collections: &CollectionIds) -> Self {
        let payments = PaymentActions::new(clients.processor.clone());
        let users = UserActions::new(
            clients.identity.clone(),
            clients.aggregator.clone(),
            payments.clone(),
            Collection::new(clients.documents.clone(), collections.user.clone()),
            Collection::new(clients.documents.clone(), collections.bank.clone()),
        );
        let transactions = TransactionActions::new(
            Collection::new(clients.documents.clone(), collections.transaction.clone()),
            users.clone(),
            payments.clone(),
        );
        let banks = BankActions::new(clients.aggregator, users.clone(), transactions.clone());

        Self {
            users,
            transactions,
            payments,
            banks,
        }
    }
}
