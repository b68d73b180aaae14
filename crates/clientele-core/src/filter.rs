// ── Customer list filter engine ──
//
// Pure, synchronous filtering over a store snapshot. Criteria compose
// by logical AND; an empty criterion never excludes a record, and
// surviving records keep their original relative order.

use std::borrow::Borrow;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use crate::model::{Address, Customer};

/// Address-count bucket selected in the list view.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantArray,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AddressCountFilter {
    #[default]
    All,
    /// Exactly one address.
    Single,
    /// More than one address.
    Multiple,
}

impl AddressCountFilter {
    pub fn matches(self, count: usize) -> bool {
        match self {
            Self::All => true,
            Self::Single => count == 1,
            Self::Multiple => count > 1,
        }
    }
}

/// The current set of user-specified search constraints.
///
/// Every field defaults to "absent". Text criteria are trimmed before
/// use, so whitespace-only input is treated as absent too.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    /// Free-text term matched against id, names, phone and every address field.
    pub search: String,
    /// Exact or partial customer id.
    pub id: String,
    pub city: String,
    pub state: String,
    pub pin_code: String,
    pub address_count: AddressCountFilter,
}

impl FilterCriteria {
    /// `true` when no criterion would exclude anything.
    pub fn is_empty(&self) -> bool {
        [&self.search, &self.id, &self.city, &self.state, &self.pin_code]
            .iter()
            .all(|s| s.trim().is_empty())
            && self.address_count == AddressCountFilter::All
    }

    /// Reset every criterion to its default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Non-empty criteria as `(label, value)` pairs, in display order.
    pub fn active_filters(&self) -> Vec<(&'static str, String)> {
        let mut active = Vec::new();
        let text = [
            ("Search", &self.search),
            ("ID", &self.id),
            ("City", &self.city),
            ("State", &self.state),
            ("Pincode", &self.pin_code),
        ];
        for (label, value) in text {
            let value = value.trim();
            if !value.is_empty() {
                active.push((label, value.to_owned()));
            }
        }
        if self.address_count != AddressCountFilter::All {
            active.push(("Addresses", self.address_count.to_string()));
        }
        active
    }

    /// Whether a single customer survives every non-empty criterion.
    pub fn matches(&self, customer: &Customer) -> bool {
        self.matches_search(customer)
            && self.matches_id(customer)
            && any_address(customer, &self.city, |a| &a.city)
            && any_address(customer, &self.state, |a| &a.state)
            && any_address(customer, &self.pin_code, |a| &a.pin_code)
            && self.address_count.matches(customer.address_count())
    }

    fn matches_search(&self, customer: &Customer) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }
        let lower = term.to_lowercase();

        let customer_hit = id_matches_term(customer, &lower)
            || customer.first_name.to_lowercase().contains(&lower)
            || customer.last_name.to_lowercase().contains(&lower)
            || customer.phone_number.contains(term);
        if customer_hit {
            return true;
        }

        customer.addresses.iter().any(|a| {
            a.address_details.to_lowercase().contains(&lower)
                || a.city.to_lowercase().contains(&lower)
                || a.state.to_lowercase().contains(&lower)
                || a.pin_code.contains(term)
        })
    }

    fn matches_id(&self, customer: &Customer) -> bool {
        let wanted = self.id.trim();
        if wanted.is_empty() {
            return true;
        }
        let id = customer.id.to_string();
        id == wanted || id.contains(wanted)
    }
}

/// Free-text id match. A leading `#` is the display form of an id and
/// is stripped; nothing left after stripping means no id match.
fn id_matches_term(customer: &Customer, term: &str) -> bool {
    let digits = match term.strip_prefix('#') {
        Some(rest) => rest.trim(),
        None => term,
    };
    if digits.is_empty() {
        return false;
    }
    let id = customer.id.to_string();
    id == digits || id.contains(digits)
}

/// Case-insensitive substring match against at least one address.
/// A customer without addresses never matches a non-empty criterion.
fn any_address(customer: &Customer, criterion: &str, field: impl Fn(&Address) -> &String) -> bool {
    let wanted = criterion.trim();
    if wanted.is_empty() {
        return true;
    }
    let wanted = wanted.to_lowercase();
    customer
        .addresses
        .iter()
        .any(|a| field(a).to_lowercase().contains(&wanted))
}

/// Filter a collection, preserving the relative order of survivors.
///
/// Works over owned customers, references or `Arc`s alike.
pub fn filter<C>(customers: &[C], criteria: &FilterCriteria) -> Vec<C>
where
    C: Borrow<Customer> + Clone,
{
    customers
        .iter()
        .filter(|c| criteria.matches(Borrow::<Customer>::borrow(*c)))
        .cloned()
        .collect()
}
