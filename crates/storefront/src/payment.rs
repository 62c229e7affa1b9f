//! Payment Methods
//!
//! Payment is manual: the shop only tells the buyer where to send money and
//! which reference to quote. Nothing here verifies a payment.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use shop_core::Selection;

/// Supported payment methods
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Bank,
    Wallet,
    Crypto,
}

impl PaymentMethod {
    /// All methods in menu order
    pub const ALL: [Self; 3] = [Self::Bank, Self::Wallet, Self::Crypto];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Wallet => "wallet",
            Self::Crypto => "crypto",
        }
    }

    /// Button label
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bank => "🏦 Bank transfer",
            Self::Wallet => "📱 Mobile wallet",
            Self::Crypto => "🪙 Crypto",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(Self::Bank),
            "wallet" => Ok(Self::Wallet),
            "crypto" => Ok(Self::Crypto),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// Static payment account details
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentDetails {
    /// Bank account number / IBAN
    pub bank_account: String,

    /// Reference the buyer must put on the transfer
    pub bank_reference: String,

    /// Mobile wallet merchant code
    pub wallet_code: String,

    /// Reference code for wallet payments
    pub wallet_reference: String,

    /// Crypto deposit address
    pub crypto_address: String,

    /// Memo/tag required with the crypto transfer
    pub crypto_memo: String,
}

impl Default for PaymentDetails {
    fn default() -> Self {
        Self {
            bank_account: "0000-0000-0000".into(),
            bank_reference: "KEYSHOP".into(),
            wallet_code: "000000".into(),
            wallet_reference: "KEYSHOP".into(),
            crypto_address: "not-configured".into(),
            crypto_memo: "KEYSHOP".into(),
        }
    }
}

impl PaymentDetails {
    /// Instructions for a method, mentioning the order when one is known
    pub fn instructions(&self, method: PaymentMethod, order: Option<(&Selection, Decimal)>) -> String {
        let mut text = String::new();

        if let Some((selection, price)) = order {
            text.push_str(&format!(
                "🧾 Order: {} ({})\n💰 Amount: {}\n\n",
                selection.product,
                selection.category,
                price.normalize()
            ));
        }

        match method {
            PaymentMethod::Bank => text.push_str(&format!(
                "🏦 Bank transfer\nAccount: {}\nReference: {} (required)",
                self.bank_account, self.bank_reference
            )),
            PaymentMethod::Wallet => text.push_str(&format!(
                "📱 Mobile wallet\nWallet code: {}\nReference code: {} (required)",
                self.wallet_code, self.wallet_reference
            )),
            PaymentMethod::Crypto => text.push_str(&format!(
                "🪙 Crypto\nAddress: {}\nMemo: {} (required, or the payment cannot be matched)",
                self.crypto_address, self.crypto_memo
            )),
        }

        text.push_str("\n\nAfter paying, send a photo or document of your receipt here.");
        text
    }
}
