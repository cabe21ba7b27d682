//! Dashboard read models built from the aggregator and stored transfers

use std::sync::Arc;

use cached::proc_macro::cached;
use chrono::{DateTime, NaiveTime, Utc};
use futures::future::try_join_all;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use super::{ActionError, TransactionActions, UserActions};
use crate::models::{
    Account, AccountDetail, AccountTransaction, AccountsSummary, Bank, Direction, Transaction,
};
use crate::plaid::{Aggregator, CountryCode, Institution, PlaidAccount, PlaidTransaction};

/// Institution metadata rarely changes; successful lookups are cached per
/// id for 5 minutes.
#[cached(
    time = 300,
    key = "String",
    convert = r#"{ institution_id.to_string() }"#,
    result = true
)]
async fn institution_cached(
    aggregator: Arc<dyn Aggregator>,
    institution_id: &str,
) -> Result<Institution, ActionError> {
    debug!(institution_id, "[cache] Loading institution");
    aggregator
        .get_institution(institution_id, &[CountryCode::Us])
        .await
        .map_err(|e| {
            error!(institution_id, "Institution lookup failed: {}", e);
            ActionError::from(e)
        })
}

#[derive(Clone)]
pub struct BankActions {
    aggregator: Arc<dyn Aggregator>,
    users: UserActions,
    transactions: TransactionActions,
}

impl BankActions {
    pub fn new(
        aggregator: Arc<dyn Aggregator>,
        users: UserActions,
        transactions: TransactionActions,
    ) -> Self {
        Self {
            aggregator,
            users,
            transactions,
        }
    }

    /// Every linked bank of `user_id` (a user document id) with totals.
    /// Banks whose item reports no accounts are skipped.
    pub async fn get_accounts(&self, user_id: &str) -> Result<AccountsSummary, ActionError> {
        let banks = self.users.get_banks(user_id).await?;

        let accounts = try_join_all(banks.iter().map(|bank| self.first_account(bank))).await?;
        let data: Vec<Account> = accounts.into_iter().flatten().collect();

        let total_current_balance = data.iter().map(|a| a.current_balance).sum::<Decimal>();
        Ok(AccountsSummary {
            total_banks: data.len(),
            total_current_balance,
            data,
        })
    }

    /// One account with transfers and aggregator transactions, newest first
    pub async fn get_account(&self, appwrite_item_id: &str) -> Result<AccountDetail, ActionError> {
        let bank = self
            .users
            .get_bank(appwrite_item_id)
            .await?
            .ok_or_else(|| ActionError::not_found("Bank"))?;

        let account = self.first_account(&bank).await?.ok_or_else(|| {
            warn!(bank = %bank.id, "Linked item no longer reports accounts");
            ActionError::NoAccounts
        })?;

        let transfers = self.transactions.get_transactions_by_bank_id(&bank.id).await?;
        let mut history: Vec<AccountTransaction> = transfers
            .documents
            .iter()
            .map(|t| transfer_row(t, &bank))
            .collect();

        let synced = self.get_transactions(&bank.access_token).await?;
        history.extend(
            synced
                .iter()
                .filter(|t| t.account_id == bank.account_id)
                .map(aggregator_row),
        );
        history.sort_by(|a, b| b.date.cmp(&a.date));

        Ok(AccountDetail {
            data: account,
            transactions: history,
        })
    }

    pub async fn get_institution(&self, institution_id: &str) -> Result<Institution, ActionError> {
        institution_cached(self.aggregator.clone(), institution_id).await
    }

    /// Page through `/transactions/sync` from the start, collecting `added`
    pub async fn get_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<PlaidTransaction>, ActionError> {
        let mut added = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let page = self
                .aggregator
                .sync_transactions(access_token, cursor.as_deref())
                .await
                .inspect_err(|e| error!("Transaction sync failed: {}", e))?;

            added.extend(page.added);
            if !page.has_more {
                break;
            }
            cursor = Some(page.next_cursor);
        }

        info!(count = added.len(), "Transactions synced");
        Ok(added)
    }

    /// First aggregator account of a bank's item as a dashboard `Account`
    async fn first_account(&self, bank: &Bank) -> Result<Option<Account>, ActionError> {
        let response = self
            .aggregator
            .get_accounts(&bank.access_token)
            .await
            .inspect_err(|e| error!(bank = %bank.id, "Fetching accounts failed: {}", e))?;

        let Some(account) = response.accounts.into_iter().next() else {
            warn!(bank = %bank.id, "Item has no accounts");
            return Ok(None);
        };

        let institution_id = match response.item.institution_id {
            Some(id) => Some(self.get_institution(&id).await?.institution_id),
            None => None,
        };

        Ok(Some(to_account(account, institution_id, bank)))
    }
}

fn to_account(account: PlaidAccount, institution_id: Option<String>, bank: &Bank) -> Account {
    Account {
        id: account.account_id,
        available_balance: account.balances.available,
        current_balance: account.balances.current.unwrap_or_default(),
        institution_id,
        name: account.name,
        official_name: account.official_name,
        mask: account.mask,
        account_type: account.account_type,
        subtype: account.subtype,
        appwrite_item_id: bank.id.clone(),
        shareable_id: bank.shareable_id.clone(),
    }
}

/// Outgoing when the viewed bank is the sender
fn transfer_row(transfer: &Transaction, bank: &Bank) -> AccountTransaction {
    let direction = if transfer.sender_bank_id == bank.id {
        Direction::Debit
    } else {
        Direction::Credit
    };
    AccountTransaction {
        id: transfer.id.clone(),
        name: transfer.name.clone(),
        payment_channel: transfer.channel.clone(),
        direction,
        account_id: bank.account_id.clone(),
        amount: transfer.amount,
        pending: false,
        category: transfer.category.clone(),
        date: transfer.created_at,
        image: None,
    }
}

/// Positive aggregator amounts leave the account
fn aggregator_row(transaction: &PlaidTransaction) -> AccountTransaction {
    let direction = if transaction.amount.is_sign_positive() {
        Direction::Debit
    } else {
        Direction::Credit
    };
    AccountTransaction {
        id: transaction.transaction_id.clone(),
        name: transaction.name.clone(),
        payment_channel: transaction.payment_channel.clone(),
        direction,
        account_id: transaction.account_id.clone(),
        amount: transaction.amount,
        pending: transaction.pending,
        category: transaction.primary_category(),
        date: DateTime::<Utc>::from_naive_utc_and_offset(
            transaction.date.and_time(NaiveTime::MIN),
            Utc,
        ),
        image: transaction.logo_url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plaid::mock::MockAggregator;
    use chrono::NaiveDate;

    #[test]
    fn test_aggregator_row_direction_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let out = MockAggregator::transaction("t1", Decimal::new(1250, 2), date);
        let refund = MockAggregator::transaction("t2", Decimal::new(-500, 2), date);

        let row = aggregator_row(&out);
        assert_eq!(row.direction, Direction::Debit);
        assert_eq!(row.category, "Shops");
        assert_eq!(row.date.date_naive(), date);
        assert_eq!(aggregator_row(&refund).direction, Direction::Credit);
    }

    #[tokio::test]
    async fn test_institution_lookup_cached() {
        // Cache is process-wide; the id must not collide with other tests
        let mock = Arc::new(MockAggregator::new());
        let aggregator: Arc<dyn Aggregator> = mock.clone();

        let first = institution_cached(aggregator.clone(), "ins_cache_test")
            .await
            .unwrap();
        let second = institution_cached(aggregator, "ins_cache_test")
            .await
            .unwrap();

        assert_eq!(first.institution_id, "ins_cache_test");
        assert_eq!(second.name, first.name);
        assert_eq!(mock.institution_calls(), 1);
    }
}
