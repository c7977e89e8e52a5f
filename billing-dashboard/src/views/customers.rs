//! Customer directory and per-customer usage.

use super::usage::{daily_cost, product_summary, ProductSummaryRow};
use super::{usage_currency, SeriesPoint, ViewState};
use crate::aggregation::filter_by_search;
use crate::format::format_category_label;
use crate::models::{Customer, UsageRecord};
use crate::styles::{country_flag, customer_status_tone, plan_tone, Tone};
use serde::Serialize;

pub const NO_CUSTOMERS: &str = "No customers found";
pub const NO_SEARCH_MATCHES: &str = "No customers match your search";
pub const NO_CUSTOMER_USAGE: &str = "No usage data available";
pub const NO_PRODUCT_USAGE: &str = "No product usage data available";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerCard {
    pub customer_id: String,
    pub name: String,
    pub status: String,
    pub status_tone: Tone,
    pub country: String,
    pub flag: &'static str,
    pub plan_id: String,
    pub plan_label: String,
    pub plan_tone: Tone,
}

impl CustomerCard {
    pub fn from_customer(customer: &Customer) -> Self {
        Self {
            customer_id: customer.customer_id.clone(),
            name: customer.customer_name.clone(),
            status: customer.status.clone(),
            status_tone: customer_status_tone(&customer.status),
            country: customer.country.clone(),
            flag: country_flag(&customer.country),
            plan_id: customer.plan_id.clone(),
            plan_label: format_category_label(&customer.plan_id),
            plan_tone: plan_tone(&customer.plan_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerListView {
    pub search: String,
    pub customers: ViewState<Vec<CustomerCard>>,
}

fn by_name(customer: &Customer) -> &str {
    &customer.customer_name
}

/// Empty-state wording depends on whether the user is searching.
pub fn empty_message(search: &str) -> &'static str {
    if search.trim().is_empty() {
        NO_CUSTOMERS
    } else {
        NO_SEARCH_MATCHES
    }
}

pub fn customer_cards(customers: &[Customer], search: &str) -> Vec<CustomerCard> {
    filter_by_search(customers, by_name, search)
        .into_iter()
        .map(CustomerCard::from_customer)
        .collect()
}

pub fn find_customer<'a>(customers: &'a [Customer], customer_id: &str) -> Option<&'a Customer> {
    customers.iter().find(|c| c.customer_id == customer_id)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerDetailView {
    pub customer: CustomerCard,
    pub daily_cost: ViewState<Vec<SeriesPoint>>,
    pub products: ViewState<Vec<ProductSummaryRow>>,
}

/// Daily cost chart for one customer, oldest day first.
pub fn customer_daily_cost(usage: &[UsageRecord]) -> Vec<SeriesPoint> {
    let rows: Vec<&UsageRecord> = usage.iter().collect();
    daily_cost(&rows, usage_currency(usage))
}

/// Per-product breakdown for one customer.
pub fn customer_products(usage: &[UsageRecord]) -> Vec<ProductSummaryRow> {
    let rows: Vec<&UsageRecord> = usage.iter().collect();
    product_summary(&rows, usage_currency(usage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn customer(id: &str, name: &str, status: &str, plan: &str) -> Customer {
        Customer {
            customer_sk: 1,
            customer_id: id.to_string(),
            customer_name: name.to_string(),
            status: status.to_string(),
            country: "US".to_string(),
            plan_id: plan.to_string(),
            is_current: true,
        }
    }

    fn customers() -> Vec<Customer> {
        vec![
            customer("cust_1", "Acme Corp", "active", "plan_enterprise"),
            customer("cust_2", "Other Co", "trial", "plan_starter"),
        ]
    }

    #[test]
    fn search_is_case_insensitive() {
        let cards = customer_cards(&customers(), "acme");
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].name, "Acme Corp");
    }

    #[test]
    fn blank_search_keeps_everyone() {
        assert_eq!(customer_cards(&customers(), "  ").len(), 2);
    }

    #[test]
    fn cards_carry_badges() {
        let cards = customer_cards(&customers(), "");
        assert_eq!(cards[0].plan_label, "Enterprise");
        assert_eq!(cards[0].plan_tone, Tone::Warning);
        assert_eq!(cards[0].status_tone, Tone::Success);
        assert_eq!(cards[1].status_tone, Tone::Warning);
        assert_eq!(cards[0].flag, "\u{1F1FA}\u{1F1F8}");
    }

    #[test]
    fn empty_wording_follows_search() {
        assert_eq!(empty_message(""), NO_CUSTOMERS);
        assert_eq!(empty_message("zzz"), NO_SEARCH_MATCHES);
    }

    #[test]
    fn customers_are_found_by_id() {
        let all = customers();
        assert_eq!(find_customer(&all, "cust_2").unwrap().customer_name, "Other Co");
        assert!(find_customer(&all, "cust_9").is_none());
    }

    #[test]
    fn usage_panels_aggregate_per_day_and_product() {
        let usage = vec![
            UsageRecord {
                date_id: "2024-01-02".to_string(),
                product_id: "prod_compute_hours".to_string(),
                unit: "hour".to_string(),
                total_quantity: dec!(4),
                cost_amount: dec!(2),
                currency: "USD".to_string(),
            },
            UsageRecord {
                date_id: "2024-01-01".to_string(),
                product_id: "prod_compute_hours".to_string(),
                unit: "hour".to_string(),
                total_quantity: dec!(6),
                cost_amount: dec!(3),
                currency: "USD".to_string(),
            },
        ];

        let daily = customer_daily_cost(&usage);
        let products = customer_products(&usage);

        assert_eq!(daily[0].label, "Jan 1");
        assert_eq!(daily[1].display, "$2.00");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].quantity, dec!(10));
        assert_eq!(products[0].label, "Compute Hours");
    }

    #[test]
    fn empty_usage_yields_empty_panels() {
        assert!(customer_daily_cost(&[]).is_empty());
        assert!(customer_products(&[]).is_empty());
    }
}
