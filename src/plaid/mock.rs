//! Scripted Plaid for tests and the `--mock` gateway mode

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::{Balances, Item};
use super::{
    AccountsResponse, Aggregator, CountryCode, Institution, LinkTokenRequest, LinkTokenResponse,
    PlaidAccount, PlaidError, PlaidTransaction, Processor, PublicTokenExchange,
    TransactionsSyncPage,
};

pub struct MockAggregator {
    /// Accounts returned for every item
    accounts: Mutex<Vec<PlaidAccount>>,
    institution_id: Mutex<Option<String>>,
    transactions: Mutex<Vec<PlaidTransaction>>,
    /// Page size for `sync_transactions`
    page_size: usize,
    link_requests: Mutex<Vec<LinkTokenRequest>>,
    /// (access_token, account_id) pairs
    processor_token_requests: Mutex<Vec<(String, String)>>,
    exchanged: Mutex<HashMap<String, String>>,
    exchange_count: AtomicUsize,
    sync_calls: AtomicUsize,
    institution_calls: AtomicUsize,
    fail_exchange: AtomicBool,
}

impl Default for MockAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAggregator {
    /// One checking account at `ins_mock`
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(vec![Self::checking_account("acc_checking", "Plaid Checking")]),
            institution_id: Mutex::new(Some("ins_mock".to_string())),
            transactions: Mutex::new(Vec::new()),
            page_size: 2,
            link_requests: Mutex::new(Vec::new()),
            processor_token_requests: Mutex::new(Vec::new()),
            exchanged: Mutex::new(HashMap::new()),
            exchange_count: AtomicUsize::new(0),
            sync_calls: AtomicUsize::new(0),
            institution_calls: AtomicUsize::new(0),
            fail_exchange: AtomicBool::new(false),
        }
    }

    pub fn checking_account(account_id: &str, name: &str) -> PlaidAccount {
        PlaidAccount {
            account_id: account_id.to_string(),
            balances: Balances {
                available: Some(Decimal::new(10000, 2)),
                current: Some(Decimal::new(11000, 2)),
                iso_currency_code: Some("USD".to_string()),
            },
            mask: Some("0000".to_string()),
            name: name.to_string(),
            official_name: None,
            account_type: "depository".to_string(),
            subtype: Some("checking".to_string()),
        }
    }

    pub fn transaction(id: &str, amount: Decimal, date: NaiveDate) -> PlaidTransaction {
        PlaidTransaction {
            transaction_id: id.to_string(),
            account_id: "acc_checking".to_string(),
            name: format!("Purchase {}", id),
            amount,
            payment_channel: "in store".to_string(),
            pending: false,
            category: Some(vec!["Shops".to_string()]),
            personal_finance_category: None,
            date,
            logo_url: None,
        }
    }

    pub fn set_accounts(&self, accounts: Vec<PlaidAccount>) {
        *self.accounts.lock().unwrap() = accounts;
    }

    pub fn set_transactions(&self, transactions: Vec<PlaidTransaction>) {
        *self.transactions.lock().unwrap() = transactions;
    }

    pub fn set_fail_exchange(&self, fail: bool) {
        self.fail_exchange.store(fail, Ordering::SeqCst);
    }

    pub fn link_requests(&self) -> Vec<LinkTokenRequest> {
        self.link_requests.lock().unwrap().clone()
    }

    pub fn processor_token_requests(&self) -> Vec<(String, String)> {
        self.processor_token_requests.lock().unwrap().clone()
    }

    pub fn exchange_count(&self) -> usize {
        self.exchange_count.load(Ordering::SeqCst)
    }

    pub fn sync_calls(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }

    pub fn institution_calls(&self) -> usize {
        self.institution_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Aggregator for MockAggregator {
    async fn create_link_token(
        &self,
        request: &LinkTokenRequest,
    ) -> Result<LinkTokenResponse, PlaidError> {
        self.link_requests.lock().unwrap().push(request.clone());
        Ok(LinkTokenResponse {
            link_token: format!("link-sandbox-{}", request.user.client_user_id),
            expiration: None,
        })
    }

    async fn exchange_public_token(
        &self,
        public_token: &str,
    ) -> Result<PublicTokenExchange, PlaidError> {
        self.exchange_count.fetch_add(1, Ordering::SeqCst);

        if self.fail_exchange.load(Ordering::SeqCst) {
            return Err(PlaidError::Api {
                status: 400,
                error_type: "INVALID_INPUT".to_string(),
                error_code: "INVALID_PUBLIC_TOKEN".to_string(),
                error_message: "provided public token is expired".to_string(),
            });
        }

        let exchange = PublicTokenExchange {
            access_token: format!("access-sandbox-{}", public_token),
            item_id: format!("item-{}", public_token),
        };
        self.exchanged
            .lock()
            .unwrap()
            .insert(exchange.access_token.clone(), exchange.item_id.clone());
        Ok(exchange)
    }

    async fn get_accounts(&self, access_token: &str) -> Result<AccountsResponse, PlaidError> {
        let item_id = self
            .exchanged
            .lock()
            .unwrap()
            .get(access_token)
            .cloned()
            .unwrap_or_else(|| format!("item-for-{}", access_token));

        Ok(AccountsResponse {
            accounts: self.accounts.lock().unwrap().clone(),
            item: Item {
                item_id,
                institution_id: self.institution_id.lock().unwrap().clone(),
            },
        })
    }

    async fn create_processor_token(
        &self,
        access_token: &str,
        account_id: &str,
        _processor: Processor,
    ) -> Result<String, PlaidError> {
        self.processor_token_requests
            .lock()
            .unwrap()
            .push((access_token.to_string(), account_id.to_string()));
        Ok(format!("processor-sandbox-{}", account_id))
    }

    async fn get_institution(
        &self,
        institution_id: &str,
        _country_codes: &[CountryCode],
    ) -> Result<Institution, PlaidError> {
        self.institution_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Institution {
            institution_id: institution_id.to_string(),
            name: "Mock Bank".to_string(),
            logo: None,
            url: None,
        })
    }

    async fn sync_transactions(
        &self,
        _access_token: &str,
        cursor: Option<&str>,
    ) -> Result<TransactionsSyncPage, PlaidError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);

        let start: usize = cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let all = self.transactions.lock().unwrap();
        let end = (start + self.page_size).min(all.len());
        let added = all.get(start..end).map(|s| s.to_vec()).unwrap_or_default();

        Ok(TransactionsSyncPage {
            added,
            next_cursor: end.to_string(),
            has_more: end < all.len(),
        })
    }
}
