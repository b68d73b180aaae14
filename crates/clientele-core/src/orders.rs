// ── Synthetic order history ──
//
// Orders are display-only. Each customer gets a small, plausible
// history generated on demand; nothing here is ever persisted.

use chrono::{DateTime, Duration, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use strum::VariantArray;

use crate::model::{CustomerId, OfferType, Order, OrderStatus, PaymentMethod};

/// Supplies read-only order sequences keyed by customer id.
pub trait OrderSource: Send + Sync {
    fn orders_for(&self, customer: CustomerId) -> Vec<Order>;
}

/// An order source that never has anything to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOrders;

impl OrderSource for NoOrders {
    fn orders_for(&self, _customer: CustomerId) -> Vec<Order> {
        Vec::new()
    }
}

const ORDERS_PER_CUSTOMER: i64 = 6;
const HISTORY_DAYS: i64 = 90;
const OFFER_PROBABILITY: f64 = 0.7;

/// Pseudo-random order history, seeded by customer id so that the same
/// customer gets the same history for a given reference instant.
#[derive(Debug, Clone, Copy)]
pub struct SyntheticOrders {
    as_of: DateTime<Utc>,
}

impl SyntheticOrders {
    /// Histories end at the current instant.
    pub fn new() -> Self {
        Self::as_of(Utc::now())
    }

    /// Histories end at `as_of`.
    pub fn as_of(as_of: DateTime<Utc>) -> Self {
        Self { as_of }
    }

    fn order(&self, rng: &mut StdRng, customer: CustomerId, seq: i64) -> Order {
        let status = OrderStatus::VARIANTS
            .choose(rng)
            .copied()
            .unwrap_or(OrderStatus::Delivered);
        let payment_method = PaymentMethod::VARIANTS
            .choose(rng)
            .copied()
            .unwrap_or(PaymentMethod::CreditCard);
        let offer_type = if rng.gen_bool(OFFER_PROBABILITY) {
            OfferType::VARIANTS
                .choose(rng)
                .copied()
                .unwrap_or(OfferType::NoDiscount)
        } else {
            OfferType::NoDiscount
        };

        let total_amount = Decimal::new(rng.gen_range(5_000..=45_000), 2);
        let discount_applied = if offer_type.is_discount() {
            Decimal::new(rng.gen_range(500..=5_500), 2)
        } else {
            Decimal::ZERO
        };

        Order {
            id: customer.get().saturating_mul(1000).saturating_add(seq),
            order_date: self.as_of - Duration::days(rng.gen_range(0..HISTORY_DAYS)),
            total_amount,
            final_amount: total_amount - discount_applied,
            status,
            payment_method,
            offer_type,
            discount_applied,
            items_count: rng.gen_range(1..=5),
        }
    }
}

impl Default for SyntheticOrders {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderSource for SyntheticOrders {
    fn orders_for(&self, customer: CustomerId) -> Vec<Order> {
        let mut rng = StdRng::seed_from_u64(u64::from_le_bytes(customer.get().to_le_bytes()));
        let mut orders: Vec<Order> = (1..=ORDERS_PER_CUSTOMER)
            .map(|seq| self.order(&mut rng, customer, seq))
            .collect();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }
}
