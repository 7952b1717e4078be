//! DeFi Yields
//!
//! Static APY/TVL table for the Solana protocols the advisor recommends.
//! There is no free live source for these figures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// One protocol's headline yield
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefiYield {
    pub protocol: String,

    /// Annual percentage yield, in percent
    pub apy: Decimal,

    /// Total value locked, display label (e.g. "1.8B")
    pub tvl: String,

    /// Last seven APY readings, oldest first
    pub history: Vec<Decimal>,
}

impl DefiYield {
    fn new(protocol: &str, apy: Decimal, tvl: &str, history: [Decimal; 7]) -> Self {
        Self {
            protocol: protocol.into(),
            apy,
            tvl: tvl.into(),
            history: history.to_vec(),
        }
    }
}

/// Current yields for Jito, Raydium and Kamino
pub fn defi_yields() -> Vec<DefiYield> {
    vec![
        DefiYield::new(
            "Jito Staking",
            dec!(7.8),
            "1.8B",
            [dec!(7.5), dec!(7.6), dec!(7.7), dec!(7.8), dec!(7.8), dec!(7.9), dec!(7.8)],
        ),
        DefiYield::new(
            "Raydium Pools",
            dec!(18.2),
            "650M",
            [dec!(16.2), dec!(17.1), dec!(18.0), dec!(18.2), dec!(18.4), dec!(18.1), dec!(18.2)],
        ),
        DefiYield::new(
            "Kamino Vaults",
            dec!(24.5),
            "410M",
            [dec!(22.5), dec!(23.2), dec!(24.0), dec!(24.5), dec!(25.1), dec!(24.8), dec!(24.5)],
        ),
    ]
}
