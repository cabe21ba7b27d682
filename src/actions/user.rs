//! User actions: sign-up/sign-in, profile and bank persistence, and the
//! account-linking workflow.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::{ActionError, PaymentActions};
use crate::appwrite::{AppwriteError, Collection, IdentityService, Query};
use crate::dwolla::NewCustomer;
use crate::ids::{encrypt_id, extract_customer_id_from_url};
use crate::models::{Bank, NewBank, NewUser, SignUpParams, User};
use crate::plaid::{Aggregator, CountryCode, LinkTokenRequest, LinkTokenUser, Processor, Product};
use crate::session::SessionStore;

#[derive(Clone)]
pub struct UserActions {
    identity: Arc<dyn IdentityService>,
    aggregator: Arc<dyn Aggregator>,
    payments: PaymentActions,
    users: Collection<User>,
    banks: Collection<Bank>,
}

impl UserActions {
    pub fn new(
        identity: Arc<dyn IdentityService>,
        aggregator: Arc<dyn Aggregator>,
        payments: PaymentActions,
        users: Collection<User>,
        banks: Collection<Bank>,
    ) -> Self {
        Self {
            identity,
            aggregator,
            payments,
            users,
            banks,
        }
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Identity account -> processor customer -> user document -> session.
    ///
    /// Nothing is rolled back: a failure after the identity account exists
    /// leaves that account (and possibly the customer) orphaned.
    pub async fn sign_up(
        &self,
        password: &str,
        params: SignUpParams,
        session: &dyn SessionStore,
    ) -> Result<User, ActionError> {
        let name = format!("{} {}", params.first_name, params.last_name);
        let account = self
            .identity
            .create_account(&params.email, password, &name)
            .await
            .inspect_err(|e| error!(email = %params.email, "Creating identity account failed: {}", e))?;

        let customer = NewCustomer {
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            email: params.email.clone(),
            customer_type: "personal".to_string(),
            address1: params.address1.clone(),
            city: params.city.clone(),
            state: params.state.clone(),
            postal_code: params.postal_code.clone(),
            date_of_birth: params.date_of_birth.clone(),
            ssn: params.ssn.clone(),
        };
        let customer_url = self
            .payments
            .create_dwolla_customer(&customer)
            .await
            .inspect_err(|_| warn!(orphaned_account = %account.id, "Sign-up aborted after identity account creation"))?;

        let customer_id = extract_customer_id_from_url(&customer_url)
            .ok_or_else(|| {
                warn!(orphaned_account = %account.id, url = %customer_url, "Customer URL has no id");
                ActionError::external("dwolla", "customer id missing from location")
            })?
            .to_string();

        let new_user = NewUser {
            user_id: account.id.clone(),
            profile: params,
            dwolla_customer_id: customer_id,
            dwolla_customer_url: customer_url.clone(),
        };
        let user = self.users.create(&new_user).await.inspect_err(|e| {
            warn!(
                orphaned_account = %account.id,
                orphaned_customer = %customer_url,
                "Persisting user failed: {}", e
            )
        })?;

        let created = self
            .identity
            .create_email_session(&user.email, password)
            .await
            .inspect_err(|e| error!(user = %user.id, "Creating session after sign-up failed: {}", e))?;
        session.set(&created.secret);

        info!(user = %user.id, customer = %user.dwolla_customer_id, "User signed up");
        Ok(user)
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        session: &dyn SessionStore,
    ) -> Result<User, ActionError> {
        let created = self
            .identity
            .create_email_session(email, password)
            .await
            .map_err(|e| {
                warn!(email, "Sign-in failed: {}", e);
                match e {
                    AppwriteError::Unauthorized => ActionError::Unauthenticated,
                    other => other.into(),
                }
            })?;
        session.set(&created.secret);

        self.get_user_info(&created.user_id)
            .await?
            .ok_or_else(|| {
                error!(account = %created.user_id, "Signed in without a user document");
                ActionError::not_found("User")
            })
    }

    /// `None` when there is no session or it has expired
    pub async fn get_logged_in_user(
        &self,
        session: &dyn SessionStore,
    ) -> Result<Option<User>, ActionError> {
        let Some(secret) = session.get() else {
            return Ok(None);
        };

        let account = match self.identity.get_account(&secret).await {
            Ok(account) => account,
            Err(AppwriteError::Unauthorized) => {
                debug!("Session cookie present but not valid");
                return Ok(None);
            }
            Err(e) => {
                error!("Resolving session account failed: {}", e);
                return Err(e.into());
            }
        };

        self.get_user_info(&account.id).await
    }

    /// Clears the cookie first; revocation failures are logged only.
    pub async fn logout_account(&self, session: &dyn SessionStore) {
        let secret = session.get();
        session.clear();

        if let Some(secret) = secret
            && let Err(e) = self.identity.delete_session(&secret).await
        {
            warn!("Session revocation failed: {}", e);
        }
    }

    // ========================================================================
    // Users and banks
    // ========================================================================

    /// First user document whose `userId` is the identity account id
    pub async fn get_user_info(&self, user_id: &str) -> Result<Option<User>, ActionError> {
        let list = self
            .users
            .list(&[Query::equal("userId", user_id)])
            .await
            .inspect_err(|e| error!(user_id, "Loading user failed: {}", e))?;
        Ok(list.documents.into_iter().next())
    }

    /// Persist a bank verbatim. Duplicates are not checked.
    pub async fn create_bank_account(&self, bank: &NewBank) -> Result<Bank, ActionError> {
        let created = self
            .banks
            .create(bank)
            .await
            .inspect_err(|e| error!(account_id = %bank.account_id, "Persisting bank failed: {}", e))?;
        Ok(created)
    }

    pub async fn get_banks(&self, user_id: &str) -> Result<Vec<Bank>, ActionError> {
        let list = self
            .banks
            .list(&[Query::equal("userId", user_id)])
            .await
            .inspect_err(|e| error!(user_id, "Loading banks failed: {}", e))?;
        Ok(list.documents)
    }

    pub async fn get_bank(&self, document_id: &str) -> Result<Option<Bank>, ActionError> {
        let bank = self
            .banks
            .find(document_id)
            .await
            .inspect_err(|e| error!(document_id, "Loading bank failed: {}", e))?;
        Ok(bank)
    }

    /// `None` unless exactly one bank holds `account_id`
    pub async fn get_bank_by_account_id(
        &self,
        account_id: &str,
    ) -> Result<Option<Bank>, ActionError> {
        let list = self
            .banks
            .list(&[Query::equal("accountId", account_id)])
            .await
            .inspect_err(|e| error!(account_id, "Loading bank by account failed: {}", e))?;

        if list.total != 1 || list.documents.len() != 1 {
            if list.total > 1 {
                warn!(account_id, matches = list.total, "Account linked more than once");
            }
            return Ok(None);
        }
        Ok(list.documents.into_iter().next())
    }

    // ========================================================================
    // Linking
    // ========================================================================

    pub async fn create_link_token(&self, user: &User) -> Result<String, ActionError> {
        let request = LinkTokenRequest {
            user: LinkTokenUser {
                client_user_id: user.id.clone(),
            },
            client_name: user.full_name(),
            products: vec![Product::Auth],
            language: "en".to_string(),
            country_codes: vec![CountryCode::Us],
        };

        let response = self
            .aggregator
            .create_link_token(&request)
            .await
            .inspect_err(|e| error!(user = %user.id, "Creating link token failed: {}", e))?;
        Ok(response.link_token)
    }

    /// Public token -> access token -> first account -> processor token ->
    /// funding source -> bank document. Strictly sequential; nothing is
    /// rolled back when a later step fails.
    pub async fn exchange_public_token(
        &self,
        public_token: &str,
        user: &User,
    ) -> Result<Bank, ActionError> {
        let exchange = self
            .aggregator
            .exchange_public_token(public_token)
            .await
            .inspect_err(|e| error!(user = %user.id, "Public token exchange failed: {}", e))?;

        let accounts = self
            .aggregator
            .get_accounts(&exchange.access_token)
            .await
            .inspect_err(|e| error!(item = %exchange.item_id, "Fetching accounts failed: {}", e))?;

        if accounts.accounts.len() > 1 {
            info!(
                item = %exchange.item_id,
                accounts = accounts.accounts.len(),
                "Item has several accounts, linking the first"
            );
        }
        let account = accounts.accounts.into_iter().next().ok_or_else(|| {
            warn!(item = %exchange.item_id, "Linked item has no accounts");
            ActionError::NoAccounts
        })?;

        let processor_token = self
            .aggregator
            .create_processor_token(&exchange.access_token, &account.account_id, Processor::Dwolla)
            .await
            .inspect_err(|e| error!(account = %account.account_id, "Processor token failed: {}", e))?;

        let funding_source_url = self
            .payments
            .add_funding_source(&user.dwolla_customer_id, &processor_token, &account.name)
            .await?;

        let bank = self
            .create_bank_account(&NewBank {
                user_id: user.id.clone(),
                bank_id: exchange.item_id.clone(),
                account_id: account.account_id.clone(),
                access_token: exchange.access_token,
                funding_source_url: funding_source_url.clone(),
                shareable_id: encrypt_id(&account.account_id),
            })
            .await
            .inspect_err(|_| warn!(orphaned_funding_source = %funding_source_url, "Bank not persisted"))?;

        info!(user = %user.id, bank = %bank.id, revalidate = "/", "Bank linked");
        Ok(bank)
    }
}
