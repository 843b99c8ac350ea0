//! Gas estimation for bank transfers

use crate::chain::{Coin, SigningClient, StdFee};
use crate::error::{OrchestratorError, OrchestratorResult};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Gas estimator for transfers
pub struct GasEstimator {
    /// Buffer percentage on top of simulated gas (e.g., 20 = 20% buffer)
    gas_limit_buffer_percent: u64,
    /// Fee charged per unit of gas, in the fee denom
    gas_price: Decimal,
}

impl GasEstimator {
    /// Create a new gas estimator
    pub fn new() -> Self {
        Self {
            gas_limit_buffer_percent: 20,
            gas_price: Decimal::ONE,
        }
    }

    pub fn with_gas_price(mut self, gas_price: Decimal) -> Self {
        self.gas_price = gas_price;
        self
    }

    pub fn with_buffer_percent(mut self, percent: u64) -> Self {
        self.gas_limit_buffer_percent = percent;
        self
    }

    /// Simulate a bank send and add the safety buffer, rounding up
    pub async fn estimate_transfer_gas(
        &self,
        client: &dyn SigningClient,
        sender: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> OrchestratorResult<u64> {
        let simulated = client.simulate_send(sender, recipient, coins).await?;
        let buffered = self.apply_buffer(simulated)?;
        debug!("Simulated gas {} -> limit {}", simulated, buffered);
        Ok(buffered)
    }

    /// Build the fee for a gas limit
    pub fn fee_for(&self, gas_limit: u64, denom: &str) -> OrchestratorResult<StdFee> {
        Ok(StdFee {
            amount: vec![Coin::new(self.calculate_cost(gas_limit)?, denom)],
            gas: gas_limit,
        })
    }

    /// Total fee for a gas limit, rounded up to a whole base unit
    pub fn calculate_cost(&self, gas_limit: u64) -> OrchestratorResult<u128> {
        (Decimal::from(gas_limit) * self.gas_price)
            .ceil()
            .to_u128()
            .ok_or_else(|| OrchestratorError::Internal(format!("fee overflow for gas {}", gas_limit)))
    }

    fn apply_buffer(&self, gas: u64) -> OrchestratorResult<u64> {
        let scaled = u128::from(gas) * u128::from(100 + self.gas_limit_buffer_percent);
        u64::try_from(scaled.div_ceil(100))
            .map_err(|_| OrchestratorError::Internal(format!("gas overflow for {}", gas)))
    }
}

impl Default for GasEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::MockSigningClient;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_buffer_rounds_up() {
        let mut client = MockSigningClient::new();
        client.expect_simulate_send().returning(|_, _, _| Ok(89_775));

        let gas = GasEstimator::new()
            .estimate_transfer_gas(&client, "osmo1sender", "osmo1receiver", &[Coin::new(10, "uosmo")])
            .await
            .unwrap();
        // 89775 * 1.2 = 107730
        assert_eq!(gas, 107_730);

        let mut client = MockSigningClient::new();
        client.expect_simulate_send().returning(|_, _, _| Ok(101));
        let gas = GasEstimator::new()
            .estimate_transfer_gas(&client, "a", "b", &[])
            .await
            .unwrap();
        assert_eq!(gas, 122);
    }

    #[test]
    fn test_fee_uses_gas_price() {
        let estimator = GasEstimator::new().with_gas_price(Decimal::from_str("0.025").unwrap());
        let fee = estimator.fee_for(200_000, "uatom").unwrap();
        assert_eq!(fee.gas, 200_000);
        assert_eq!(fee.amount, vec![Coin::new(5_000, "uatom")]);

        let fee = estimator.fee_for(1, "uatom").unwrap();
        assert_eq!(fee.amount, vec![Coin::new(1, "uatom")]);
    }
}
