//! Dashboard aggregates: totals, monthly evolution and expenses by category

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::category::{CategoryIndex, UNKNOWN_CATEGORY_LABEL};
use crate::models::{CategoryRef, Transaction, TransactionType};
use crate::time;

/// Income, expenses and their difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Totals {
    pub income: Decimal,
    pub expenses: Decimal,
    pub balance: Decimal,
}

pub fn totals(transactions: &[Transaction]) -> Totals {
    let (income, expenses) = transactions.iter().fold(
        (Decimal::ZERO, Decimal::ZERO),
        |(income, expenses), tx| match tx.transaction_type {
            TransactionType::Income => (income + tx.amount, expenses),
            TransactionType::Expense => (income, expenses + tx.amount),
        },
    );
    Totals {
        income,
        expenses,
        balance: income - expenses,
    }
}

/// Sums for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBucket {
    pub year: i32,
    pub month: u32,
    /// `M/YYYY`
    pub label: String,
    pub income: Decimal,
    pub expenses: Decimal,
}

/// Income and expenses of the last `months` months ending with `today`'s month,
/// oldest first. Transactions outside that window are ignored.
pub fn monthly_evolution(transactions: &[Transaction], today: NaiveDate, months: u32) -> Vec<MonthBucket> {
    let mut buckets: Vec<MonthBucket> = time::trailing_months(today, months)
        .into_iter()
        .map(|(year, month)| MonthBucket {
            year,
            month,
            label: format!("{}/{}", month, year),
            income: Decimal::ZERO,
            expenses: Decimal::ZERO,
        })
        .collect();

    for tx in transactions {
        let slot = buckets
            .iter_mut()
            .find(|b| b.year == tx.date.year() && b.month == tx.date.month());
        if let Some(bucket) = slot {
            match tx.transaction_type {
                TransactionType::Income => bucket.income += tx.amount,
                TransactionType::Expense => bucket.expenses += tx.amount,
            }
        }
    }
    buckets
}

/// One slice of the expenses-by-category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub total: Decimal,
    pub color: String,
}

/// Chart colour for slice `index`, spread around the hue circle
pub fn slice_color(index: usize) -> String {
    format!("hsl({}, 70%, 60%)", (index * 137) % 360)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum SliceKey {
    Id(i64),
    Named(String),
    Unknown,
}

/// Expense totals per category, largest first.
///
/// Expenses whose category cannot be resolved are grouped under "Unknown".
/// Categories with a zero total are left out.
pub fn expenses_by_category(transactions: &[Transaction], categories: &CategoryIndex) -> Vec<CategorySlice> {
    let mut order: Vec<SliceKey> = Vec::new();
    let mut sums: HashMap<SliceKey, (String, Decimal)> = HashMap::new();

    for tx in transactions
        .iter()
        .filter(|tx| tx.transaction_type == TransactionType::Expense)
    {
        let embedded = match &tx.category {
            CategoryRef::Embedded(category) if !category.name.trim().is_empty() => {
                Some(category.name.clone())
            }
            _ => None,
        };
        let id = tx.category.id();
        let (key, name) = match (id, embedded) {
            (Some(id), Some(name)) => (SliceKey::Id(id), name),
            (None, Some(name)) => (SliceKey::Named(name.clone()), name),
            (Some(id), None) => match categories.name_of(id) {
                Some(name) => (SliceKey::Id(id), name.to_string()),
                None => (SliceKey::Unknown, UNKNOWN_CATEGORY_LABEL.to_string()),
            },
            (None, None) => (SliceKey::Unknown, UNKNOWN_CATEGORY_LABEL.to_string()),
        };

        let entry = sums.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            (name, Decimal::ZERO)
        });
        entry.1 += tx.amount;
    }

    let mut rows: Vec<(String, Decimal)> = order
        .into_iter()
        .filter_map(|key| sums.remove(&key))
        .filter(|(_, total)| *total > Decimal::ZERO)
        .collect();
    // stable sort keeps first-seen order among equal totals
    rows.sort_by(|a, b| b.1.cmp(&a.1));

    rows.into_iter()
        .enumerate()
        .map(|(index, (label, total))| CategorySlice {
            label,
            total,
            color: slice_color(index),
        })
        .collect()
}

/// Everything the dashboard cards and charts need
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub totals: Totals,
    pub months: Vec<MonthBucket>,
    pub categories: Vec<CategorySlice>,
}

impl DashboardSummary {
    pub fn build(transactions: &[Transaction], categories: &CategoryIndex, today: NaiveDate, months: u32) -> Self {
        Self {
            totals: totals(transactions),
            months: monthly_evolution(transactions, today, months),
            categories: expenses_by_category(transactions, categories),
        }
    }
}
