//! Same-chain token transfer orchestration

use super::gas::GasEstimator;
use super::receipt;
use crate::chain::{Coin, WalletProvider};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::intent::{TransferRequest, TransferResult};
use crate::registry::{units, ChainRegistry};

use std::sync::Arc;
use tracing::{info, instrument};

/// Executes bank transfers on a single chain
pub struct TransferOrchestrator {
    /// Merged chain registry
    registry: Arc<ChainRegistry>,
    /// Wallet for addresses and signing
    wallet: Arc<dyn WalletProvider>,
    /// Gas estimator
    gas_estimator: GasEstimator,
}

impl TransferOrchestrator {
    pub fn new(registry: Arc<ChainRegistry>, wallet: Arc<dyn WalletProvider>) -> Self {
        Self {
            registry,
            wallet,
            gas_estimator: GasEstimator::new(),
        }
    }

    pub fn with_gas_estimator(mut self, gas_estimator: GasEstimator) -> Self {
        self.gas_estimator = gas_estimator;
        self
    }

    /// Validate, resolve, estimate, submit and reconcile a transfer.
    ///
    /// Simulation and submission errors are returned exactly as the signing
    /// client produced them.
    #[instrument(skip_all, fields(chain = ?request.chain_name))]
    pub async fn execute(&self, request: &TransferRequest) -> OrchestratorResult<TransferResult> {
        let request = request.validate()?;
        let chain_name = request.chain_name.as_str();

        let sender = self
            .wallet
            .address_for(chain_name)
            .await?
            .ok_or_else(|| OrchestratorError::WalletAddressUnavailable {
                chain_name: chain_name.to_string(),
            })?;

        let asset = self.registry.resolver().resolve(&request.symbol, chain_name)?;
        let amount = units::to_base_units(&request.amount, asset.exponent)?;
        let coins = vec![Coin::new(amount, asset.base.clone())];

        let fee_denom = self
            .registry
            .locator()
            .find_by_name(chain_name)
            .and_then(|chain| chain.fee_denom.clone())
            .unwrap_or_else(|| asset.base.clone());

        let client = self.wallet.signing_client(chain_name)?;
        let gas_limit = self
            .gas_estimator
            .estimate_transfer_gas(client.as_ref(), &sender, &request.to_address, &coins)
            .await?;
        let fee = self.gas_estimator.fee_for(gas_limit, &fee_denom)?;

        let receipt = match client
            .send_tokens(&sender, &request.to_address, &coins, &fee)
            .await
        {
            Ok(receipt) => receipt,
            Err(e) => {
                crate::metrics::record_transfer_failed(chain_name);
                return Err(e);
            }
        };

        let paid = receipt::paid_fee_from_receipt(&receipt);
        let paid_denom = receipt::fee_denom(&receipt.events).unwrap_or(fee_denom);

        crate::metrics::record_transfer_submitted(chain_name);
        crate::metrics::record_fee_paid(&paid_denom, paid);
        info!(
            "Transferred {}{} on {}: {} (fee {}{})",
            amount, asset.base, chain_name, receipt.transaction_hash, paid, paid_denom
        );

        Ok(TransferResult {
            from: sender,
            to: request.to_address,
            tx_hash: Some(receipt.transaction_hash).filter(|hash| !hash.is_empty()),
            fee_paid: Some(format!("{}{}", paid, paid_denom)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{MockSigningClient, MockWalletProvider, SigningClient, TxEvent, TxReceipt};
    use crate::error::Field;
    use crate::test_utils::custom_chain;

    fn request() -> TransferRequest {
        TransferRequest {
            chain_name: Some("localnet".into()),
            symbol: Some("STAKE".into()),
            amount: Some("1234".into()),
            to_address: Some("local1receiver".into()),
        }
    }

    fn orchestrator(wallet: MockWalletProvider) -> TransferOrchestrator {
        TransferOrchestrator::new(
            Arc::new(ChainRegistry::merged(&[custom_chain()])),
            Arc::new(wallet),
        )
    }

    fn wallet_with(client: MockSigningClient) -> MockWalletProvider {
        let client: Arc<dyn SigningClient> = Arc::new(client);
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_address_for()
            .returning(|_| Ok(Some("local1sender".to_string())));
        wallet
            .expect_signing_client()
            .returning(move |_| Ok(client.clone()));
        wallet
    }

    #[tokio::test]
    async fn test_transfer_success() {
        let mut client = MockSigningClient::new();
        client.expect_simulate_send().returning(|_, _, _| Ok(1000));
        client
            .expect_send_tokens()
            .withf(|sender, recipient, coins, fee| {
                sender == "local1sender"
                    && recipient == "local1receiver"
                    && coins.to_vec() == vec![Coin::new(1_234_000_000, "ustake")]
                    && fee.gas == 1200
            })
            .returning(|_, _, _, _| {
                Ok(TxReceipt {
                    transaction_hash: "mockTxHash".to_string(),
                    events: vec![TxEvent::new("tx", &[("fee", "1200ustake")])],
                    ..Default::default()
                })
            });

        let result = orchestrator(wallet_with(client))
            .execute(&request())
            .await
            .unwrap();

        assert_eq!(
            result,
            TransferResult {
                from: "local1sender".into(),
                to: "local1receiver".into(),
                tx_hash: Some("mockTxHash".into()),
                fee_paid: Some("1200ustake".into()),
            }
        );
    }

    #[tokio::test]
    async fn test_missing_receiver_stops_before_wallet() {
        let request = TransferRequest {
            to_address: None,
            ..request()
        };
        let err = orchestrator(MockWalletProvider::new())
            .execute(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::MissingField(Field::ToAddress)));
    }

    #[tokio::test]
    async fn test_missing_symbol() {
        let request = TransferRequest {
            symbol: None,
            ..request()
        };
        let err = orchestrator(MockWalletProvider::new())
            .execute(&request)
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::MissingField(Field::Symbol)));
    }

    #[tokio::test]
    async fn test_submission_error_is_propagated_unchanged() {
        let mut client = MockSigningClient::new();
        client.expect_simulate_send().returning(|_, _, _| Ok(1000));
        client
            .expect_send_tokens()
            .returning(|_, _, _, _| Err(OrchestratorError::TransactionRejected("Transaction Failed".into())));

        let err = orchestrator(wallet_with(client))
            .execute(&request())
            .await
            .unwrap_err();

        assert!(matches!(err, OrchestratorError::TransactionRejected(ref msg) if msg == "Transaction Failed"));
        assert_eq!(err.to_string(), "Transaction Failed");
    }

    #[tokio::test]
    async fn test_simulation_error_is_propagated_unchanged() {
        let mut client = MockSigningClient::new();
        client
            .expect_simulate_send()
            .returning(|_, _, _| Err(OrchestratorError::ChainNotFound("localnet".into())));
        client.expect_send_tokens().never();

        let err = orchestrator(wallet_with(client))
            .execute(&request())
            .await
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::ChainNotFound(ref c) if c == "localnet"));
    }

    #[tokio::test]
    async fn test_no_wallet_address_names_chain() {
        let mut wallet = MockWalletProvider::new();
        wallet.expect_address_for().returning(|_| Ok(None));
        wallet.expect_signing_client().never();

        let err = orchestrator(wallet).execute(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), "Cannot get wallet address for chain localnet");
    }

    #[tokio::test]
    async fn test_ambiguous_symbol_is_reported() {
        let request = TransferRequest {
            chain_name: Some("osmosis".into()),
            symbol: Some("USDC".into()),
            amount: Some("1".into()),
            to_address: Some("osmo1receiver".into()),
        };
        let mut wallet = MockWalletProvider::new();
        wallet
            .expect_address_for()
            .returning(|_| Ok(Some("osmo1sender".to_string())));

        let err = orchestrator(wallet).execute(&request).await.unwrap_err();
        assert!(matches!(err, OrchestratorError::AmbiguousAsset { ref value, .. } if value == "USDC"));
    }
}
