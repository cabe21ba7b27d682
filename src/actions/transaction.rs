//! Transfer records and the send-payment workflow

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use super::{ActionError, PaymentActions, UserActions};
use crate::appwrite::{Collection, DocumentList, Query};
use crate::ids::decrypt_id;
use crate::models::{NewTransaction, Transaction, User};
use crate::money;

pub const TRANSFER_CHANNEL: &str = "Online";
pub const TRANSFER_CATEGORY: &str = "Transfer";

/// Stored shape: caller fields plus the fixed channel/category
#[derive(Serialize)]
struct TransactionDocument<'a> {
    #[serde(flatten)]
    fields: &'a NewTransaction,
    channel: &'static str,
    category: &'static str,
}

/// Payment transfer form
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    /// Note shown on both sides
    #[schema(example = "Rent")]
    pub name: String,
    /// Recipient email
    #[schema(example = "landlord@example.com")]
    pub email: String,
    /// USD with at most two decimals, e.g. `"25.50"`
    #[schema(example = "25.00")]
    pub amount: String,
    /// Sender's bank document id
    pub sender_bank_id: String,
    /// Recipient's shareable account id
    pub shareable_id: String,
}

#[derive(Clone)]
pub struct TransactionActions {
    transactions: Collection<Transaction>,
    users: UserActions,
    payments: PaymentActions,
}

impl TransactionActions {
    pub fn new(
        transactions: Collection<Transaction>,
        users: UserActions,
        payments: PaymentActions,
    ) -> Self {
        Self {
            transactions,
            users,
            payments,
        }
    }

    pub async fn create_transaction(
        &self,
        fields: &NewTransaction,
    ) -> Result<Transaction, ActionError> {
        let document = TransactionDocument {
            fields,
            channel: TRANSFER_CHANNEL,
            category: TRANSFER_CATEGORY,
        };
        let created = self
            .transactions
            .create(&document)
            .await
            .inspect_err(|e| error!(sender_bank = %fields.sender_bank_id, "Persisting transaction failed: {}", e))?;
        Ok(created)
    }

    /// Records where the bank is sender, then where it is receiver.
    /// A self-transfer matches both queries and is listed twice.
    pub async fn get_transactions_by_bank_id(
        &self,
        bank_id: &str,
    ) -> Result<DocumentList<Transaction>, ActionError> {
        let sent = self
            .transactions
            .list(&[Query::equal("senderBankId", bank_id)])
            .await
            .inspect_err(|e| error!(bank_id, "Loading sent transactions failed: {}", e))?;
        let received = self
            .transactions
            .list(&[Query::equal("receiverBankId", bank_id)])
            .await
            .inspect_err(|e| error!(bank_id, "Loading received transactions failed: {}", e))?;
        Ok(sent.chain(received))
    }

    /// Resolve both banks, move the money, record the transfer.
    ///
    /// The sender bank must belong to `sender`. No transfer is attempted
    /// unless both banks resolve.
    pub async fn send_payment(
        &self,
        sender: &User,
        request: &PaymentRequest,
    ) -> Result<Transaction, ActionError> {
        let amount = money::parse_amount(&request.amount)?;

        let receiver_account_id = decrypt_id(&request.shareable_id).ok_or_else(|| {
            warn!(shareable_id = %request.shareable_id, "Shareable id does not decode");
            ActionError::not_found("Receiver bank")
        })?;
        let receiver_bank = self
            .users
            .get_bank_by_account_id(&receiver_account_id)
            .await?
            .ok_or_else(|| {
                warn!(account_id = %receiver_account_id, "No unique bank for receiver account");
                ActionError::not_found("Receiver bank")
            })?;

        let sender_bank = self
            .users
            .get_bank(&request.sender_bank_id)
            .await?
            .filter(|bank| bank.user_id == sender.id)
            .ok_or_else(|| {
                warn!(user = %sender.id, bank = %request.sender_bank_id, "Sender bank not found for user");
                ActionError::not_found("Sender bank")
            })?;

        let transfer_url = self
            .payments
            .create_transfer(
                &sender_bank.funding_source_url,
                &receiver_bank.funding_source_url,
                amount,
            )
            .await?;

        let transaction = self
            .create_transaction(&NewTransaction {
                name: request.name.clone(),
                amount,
                sender_id: sender_bank.user_id.clone(),
                sender_bank_id: sender_bank.id.clone(),
                receiver_id: receiver_bank.user_id.clone(),
                receiver_bank_id: receiver_bank.id.clone(),
                email: request.email.clone(),
            })
            .await
            .inspect_err(|_| warn!(unrecorded_transfer = %transfer_url, "Transfer sent but not recorded"))?;

        info!(
            transaction = %transaction.id,
            transfer = %transfer_url,
            amount = %money::format_amount(amount),
            "Payment sent"
        );
        Ok(transaction)
    }
}
