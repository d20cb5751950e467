//! Inbound Ports (Driving Ports / API)

use async_trait::async_trait;

use crate::application::gate::Submission;
use crate::domain::{AccountRef, Receipt, SenderError, UnsignedTransaction};

/// Primary Transaction Sender API
#[async_trait]
pub trait TransactionSenderApi: Send + Sync {
    /// Sign and broadcast `tx` from `account`.
    ///
    /// Nonce fetch, signing and broadcast initiation happen under the
    /// account's submission lock, which is released as soon as the node has
    /// accepted the broadcast. Errors that prevent a broadcast attempt
    /// (unknown identity, unreachable node, signing failure) are returned
    /// here; everything after resolves the returned `Submission`.
    async fn submit(
        &self,
        account: &AccountRef,
        tx: UnsignedTransaction,
    ) -> Result<Submission, SenderError>;

    /// `submit` and wait for the resolution.
    async fn sign_and_send(
        &self,
        account: &AccountRef,
        tx: UnsignedTransaction,
    ) -> Result<Receipt, SenderError> {
        self.submit(account, tx).await?.await
    }

    /// Log failure details for resolved transactions.
    fn enable_diagnostics(&self);

    /// Stop logging failure details.
    fn disable_diagnostics(&self);

    fn diagnostics_enabled(&self) -> bool;
}
