//! Transaction filter state
//!
//! The backend exposes one endpoint per filter family, so a submitted filter
//! keeps a single family. While the user is still editing the form, several
//! families may coexist; [`apply_filter`] is the submit-time reduction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::CategoryIndex;
use crate::models::{EntityId, TransactionType, TypeFilter};
use crate::time;

/// Inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Filter form state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub transaction_type: TypeFilter,
    pub category_id: Option<EntityId>,
}

/// The single filter family that drives a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveFilter {
    DateRange(DateRange),
    Type(TransactionType),
    Category(EntityId),
    None,
}

impl From<ActiveFilter> for FilterState {
    fn from(active: ActiveFilter) -> Self {
        match active {
            ActiveFilter::DateRange(range) => FilterState {
                start_date: Some(range.start),
                end_date: Some(range.end),
                ..FilterState::default()
            },
            ActiveFilter::Type(transaction_type) => FilterState {
                transaction_type: transaction_type.into(),
                ..FilterState::default()
            },
            ActiveFilter::Category(id) => FilterState {
                category_id: Some(id),
                ..FilterState::default()
            },
            ActiveFilter::None => FilterState::default(),
        }
    }
}

/// Partial update of a [`FilterState`].
///
/// The outer `Option` says whether a field is touched, the inner one carries
/// the new value, with `Some(None)` clearing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterEdit {
    pub start_date: Option<Option<NaiveDate>>,
    pub end_date: Option<Option<NaiveDate>>,
    pub transaction_type: Option<TypeFilter>,
    pub category_id: Option<Option<EntityId>>,
}

impl FilterEdit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_date(mut self, value: Option<NaiveDate>) -> Self {
        self.start_date = Some(value);
        self
    }

    pub fn end_date(mut self, value: Option<NaiveDate>) -> Self {
        self.end_date = Some(value);
        self
    }

    pub fn date_range(self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date(Some(start)).end_date(Some(end))
    }

    pub fn transaction_type(mut self, value: TypeFilter) -> Self {
        self.transaction_type = Some(value);
        self
    }

    pub fn category_id(mut self, value: Option<EntityId>) -> Self {
        self.category_id = Some(value);
        self
    }

    /// Edit that replaces every field with the values of `state`
    pub fn replace_with(state: &FilterState) -> Self {
        Self::new()
            .start_date(state.start_date)
            .end_date(state.end_date)
            .transaction_type(state.transaction_type)
            .category_id(state.category_id)
    }
}

/// Label shown for an active filter in the collapsed filter header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChip {
    pub key: &'static str,
    pub label: String,
}

impl FilterState {
    /// Apply an edit without reducing. Used while the form is being edited.
    pub fn merge(&self, edit: FilterEdit) -> FilterState {
        FilterState {
            start_date: edit.start_date.unwrap_or(self.start_date),
            end_date: edit.end_date.unwrap_or(self.end_date),
            transaction_type: edit.transaction_type.unwrap_or(self.transaction_type),
            category_id: edit
                .category_id
                .unwrap_or(self.category_id)
                .filter(|id| *id > 0),
        }
    }

    /// The family that wins, in priority order date range, type, category.
    ///
    /// A range needs both dates; a lone start or end date is ignored.
    pub fn active(&self) -> ActiveFilter {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            return ActiveFilter::DateRange(DateRange { start, end });
        }
        if let Some(transaction_type) = self.transaction_type.as_transaction_type() {
            return ActiveFilter::Type(transaction_type);
        }
        match self.category_id {
            Some(id) if id > 0 => ActiveFilter::Category(id),
            _ => ActiveFilter::None,
        }
    }

    /// Keep only the winning family
    pub fn reduced(&self) -> FilterState {
        self.active().into()
    }

    pub fn is_reduced(&self) -> bool {
        *self == self.reduced()
    }

    /// Whether any control holds a value, reduced or not
    pub fn has_active_filters(&self) -> bool {
        self.start_date.is_some()
            || self.end_date.is_some()
            || self.transaction_type != TypeFilter::All
            || self.category_id.is_some()
    }

    /// Chips for every populated family, category names resolved through `categories`
    pub fn chips(&self, categories: &CategoryIndex) -> Vec<FilterChip> {
        let mut chips = Vec::new();
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            chips.push(FilterChip {
                key: "dateRange",
                label: format!(
                    "{} to {}",
                    time::format_url_date(start),
                    time::format_url_date(end)
                ),
            });
        }
        if let Some(transaction_type) = self.transaction_type.as_transaction_type() {
            chips.push(FilterChip {
                key: "type",
                label: transaction_type.label().to_string(),
            });
        }
        if let Some(id) = self.category_id {
            chips.push(FilterChip {
                key: "category",
                label: categories.label_for(id),
            });
        }
        chips
    }
}

/// Merge `edit` into `current` and reduce to a single active family
pub fn apply_filter(current: &FilterState, edit: FilterEdit) -> FilterState {
    current.merge(edit).reduced()
}

/// The cleared filter, `{type: ALL}`
pub fn reset_filter() -> FilterState {
    FilterState::default()
}
