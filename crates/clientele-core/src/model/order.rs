// ── Order domain types ──
//
// Orders are synthetic and display-only: generated per customer by an
// `OrderSource`, never persisted, never mutated by the coordinator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, VariantArray,
)]
pub enum OrderStatus {
    Delivered,
    Shipped,
    Processing,
    Cancelled,
    Returned,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, VariantArray,
)]
pub enum PaymentMethod {
    #[serde(rename = "Credit Card")]
    #[strum(serialize = "Credit Card")]
    CreditCard,
    #[serde(rename = "Debit Card")]
    #[strum(serialize = "Debit Card")]
    DebitCard,
    #[serde(rename = "UPI")]
    #[strum(serialize = "UPI")]
    Upi,
    #[serde(rename = "Net Banking")]
    #[strum(serialize = "Net Banking")]
    NetBanking,
    #[serde(rename = "Cash on Delivery")]
    #[strum(serialize = "Cash on Delivery")]
    CashOnDelivery,
    Wallet,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, VariantArray,
)]
pub enum OfferType {
    #[serde(rename = "New Year Sale")]
    #[strum(serialize = "New Year Sale")]
    NewYearSale,
    #[serde(rename = "Weekend Special")]
    #[strum(serialize = "Weekend Special")]
    WeekendSpecial,
    #[serde(rename = "Member Discount")]
    #[strum(serialize = "Member Discount")]
    MemberDiscount,
    #[serde(rename = "Flash Sale")]
    #[strum(serialize = "Flash Sale")]
    FlashSale,
    #[serde(rename = "Festival Offer")]
    #[strum(serialize = "Festival Offer")]
    FestivalOffer,
    #[serde(rename = "No Discount")]
    #[strum(serialize = "No Discount")]
    NoDiscount,
}

impl OfferType {
    pub fn is_discount(self) -> bool {
        !matches!(self, Self::NoDiscount)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub order_date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub final_amount: Decimal,
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    pub offer_type: OfferType,
    pub discount_applied: Decimal,
    pub items_count: u32,
}
