//! Domain models exchanged with the finance backend
//!
//! Wire names follow the backend's camelCase JSON. Amounts are decimals that
//! decode from JSON numbers or numeric strings and encode as JSON numbers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::time;

/// Backend entity identifier
pub type EntityId = i64;

/// Decode an id that may arrive as a number or a numeric string.
///
/// Non-numeric strings and null decode to `None` instead of failing the
/// whole record.
pub fn lenient_id<'de, D>(deserializer: D) -> Result<Option<EntityId>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Int(i64),
        Float(f64),
        Text(String),
    }

    let raw = Option::<RawId>::deserialize(deserializer)?;
    Ok(match raw {
        Some(RawId::Int(id)) => Some(id),
        Some(RawId::Float(id)) if id.fract() == 0.0 => Some(id as i64),
        Some(RawId::Float(_)) => None,
        Some(RawId::Text(text)) => text.trim().parse().ok(),
        None => None,
    })
}

/// Transaction direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "INCOME",
            TransactionType::Expense => "EXPENSE",
        }
    }

    /// Label used in the UI
    pub fn label(&self) -> &'static str {
        match self {
            TransactionType::Income => "Income",
            TransactionType::Expense => "Expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            _ => Err(CoreError::invalid_format("transaction type", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Type selector of the filter form. `All` means the type filter is unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TypeFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl TypeFilter {
    pub fn as_transaction_type(&self) -> Option<TransactionType> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Income => Some(TransactionType::Income),
            TypeFilter::Expense => Some(TransactionType::Expense),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "ALL",
            TypeFilter::Income => "INCOME",
            TypeFilter::Expense => "EXPENSE",
        }
    }
}

impl From<TransactionType> for TypeFilter {
    fn from(value: TransactionType) -> Self {
        match value {
            TransactionType::Income => TypeFilter::Income,
            TransactionType::Expense => TypeFilter::Expense,
        }
    }
}

impl std::str::FromStr for TypeFilter {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ALL" => Ok(TypeFilter::All),
            other => other.parse::<TransactionType>().map(TypeFilter::from),
        }
    }
}

impl std::fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// How a transaction points at its category.
///
/// The backend sends either a bare `categoryId` or an embedded `category`
/// object, depending on the endpoint.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryRef {
    Id(EntityId),
    Embedded(Category),
    Missing,
}

impl CategoryRef {
    /// The referenced id, from either form
    pub fn id(&self) -> Option<EntityId> {
        match self {
            CategoryRef::Id(id) => Some(*id),
            CategoryRef::Embedded(category) => category.id,
            CategoryRef::Missing => None,
        }
    }
}

/// Raw transaction record as it appears on the wire
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<EntityId>,
    #[serde(default)]
    description: String,
    amount: Decimal,
    #[serde(with = "time::wire_date")]
    date: NaiveDate,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(default, deserialize_with = "lenient_id")]
    category_id: Option<EntityId>,
    #[serde(default)]
    category: Option<Category>,
}

impl From<TransactionRecord> for Transaction {
    fn from(record: TransactionRecord) -> Self {
        let category = match (record.category, record.category_id) {
            (Some(category), _) => CategoryRef::Embedded(category),
            (None, Some(id)) => CategoryRef::Id(id),
            (None, None) => CategoryRef::Missing,
        };
        Transaction {
            id: record.id,
            description: record.description,
            amount: record.amount,
            date: record.date,
            transaction_type: record.transaction_type,
            category,
        }
    }
}

/// A recorded income or expense
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "TransactionRecord")]
pub struct Transaction {
    pub id: Option<EntityId>,
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub transaction_type: TransactionType,
    pub category: CategoryRef,
}

impl Transaction {
    /// Amount with the sign of its direction
    pub fn signed_amount(&self) -> Decimal {
        match self.transaction_type {
            TransactionType::Income => self.amount,
            TransactionType::Expense => -self.amount,
        }
    }
}

/// Savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub target_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub current_amount: Decimal,
    #[serde(with = "time::plain_date")]
    pub target_date: NaiveDate,
}

fn require_text(field: &str, value: &str, message: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, message));
    }
    Ok(())
}

/// Transaction body for create and update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionDraft {
    pub description: String,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub amount: Decimal,
    #[serde(with = "time::wire_date")]
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category_id: Option<EntityId>,
}

impl TransactionDraft {
    /// Check the draft before it is sent
    pub fn validate(&self) -> CoreResult<()> {
        require_text("description", &self.description, "Description is required")?;
        if self.amount <= Decimal::ZERO {
            return Err(CoreError::validation(
                "amount",
                "Amount must be greater than zero",
            ));
        }
        match self.category_id {
            Some(id) if id > 0 => Ok(()),
            _ => Err(CoreError::validation("categoryId", "Category is required")),
        }
    }

    /// Draft prefilled from an existing transaction, for the edit form
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            description: transaction.description.clone(),
            amount: transaction.amount,
            date: transaction.date,
            transaction_type: transaction.transaction_type,
            category_id: transaction.category.id(),
        }
    }
}

/// Category body for create and update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name, "Name is required")?;
        if self.name.trim().chars().count() > 50 {
            return Err(CoreError::validation(
                "name",
                "Name must be at most 50 characters",
            ));
        }
        Ok(())
    }
}

/// Goal body for create and update requests
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDraft {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub target_amount: Decimal,
    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub current_amount: Decimal,
    #[serde(serialize_with = "serialize_optional_plain_date")]
    pub target_date: Option<NaiveDate>,
}

fn serialize_optional_plain_date<S: serde::Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => time::plain_date::serialize(date, serializer),
        None => serializer.serialize_none(),
    }
}

impl GoalDraft {
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name, "Name is required")?;
        if self.target_amount <= Decimal::ZERO {
            return Err(CoreError::validation(
                "targetAmount",
                "Target amount must be greater than zero",
            ));
        }
        if self.current_amount < Decimal::ZERO {
            return Err(CoreError::validation(
                "currentAmount",
                "Current amount cannot be negative",
            ));
        }
        if self.target_date.is_none() {
            return Err(CoreError::validation("targetDate", "Target date is required"));
        }
        Ok(())
    }

    pub fn from_goal(goal: &Goal) -> Self {
        Self {
            name: goal.name.clone(),
            description: goal.description.clone(),
            target_amount: goal.target_amount,
            current_amount: goal.current_amount,
            target_date: Some(goal.target_date),
        }
    }
}

/// Credentials for `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Payload for `POST /auth/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> CoreResult<()> {
        require_text("name", &self.name, "Name is required")?;
        require_text("email", &self.email, "Email is required")?;
        if !self.email.contains('@') {
            return Err(CoreError::validation("email", "Email address is invalid"));
        }
        if self.password.chars().count() < 6 {
            return Err(CoreError::validation(
                "password",
                "Password must be at least 6 characters",
            ));
        }
        Ok(())
    }
}

/// Successful login response
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(alias = "accessToken")]
    pub token: String,
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<EntityId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_transaction_with_category_id() {
        let json = r#"{"id": 1, "description": "Lunch", "amount": 25.5,
            "date": "2024-03-05T00:00:00", "type": "EXPENSE", "categoryId": 5}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, Some(1));
        assert_eq!(tx.amount, dec("25.5"));
        assert_eq!(tx.date, date(2024, 3, 5));
        assert_eq!(tx.transaction_type, TransactionType::Expense);
        assert_eq!(tx.category, CategoryRef::Id(5));
    }

    #[test]
    fn test_transaction_with_embedded_category() {
        let json = r#"{"id": "2", "description": "Salary", "amount": "3000.00",
            "date": "2024-03-01", "type": "INCOME",
            "category": {"id": "3", "name": "Job"}}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, Some(2));
        assert_eq!(tx.signed_amount(), dec("3000.00"));
        match &tx.category {
            CategoryRef::Embedded(category) => {
                assert_eq!(category.id, Some(3));
                assert_eq!(category.name, "Job");
            }
            other => panic!("unexpected category ref: {:?}", other),
        }
        assert_eq!(tx.category.id(), Some(3));
    }

    #[test]
    fn test_transaction_without_category() {
        let json = r#"{"description": "Gift", "amount": 10, "date": "2024-03-01",
            "type": "INCOME", "categoryId": "abc"}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.id, None);
        assert_eq!(tx.category, CategoryRef::Missing);
    }

    #[test]
    fn test_transaction_type_parsing() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert!("TRANSFER".parse::<TransactionType>().is_err());
        assert_eq!("all".parse::<TypeFilter>().unwrap(), TypeFilter::All);
        assert_eq!("EXPENSE".parse::<TypeFilter>().unwrap(), TypeFilter::Expense);
        assert!("bogus".parse::<TypeFilter>().is_err());
        assert_eq!(TypeFilter::All.as_transaction_type(), None);
    }

    #[test]
    fn test_transaction_draft_wire_format() {
        let draft = TransactionDraft {
            description: "Rent".to_string(),
            amount: dec("1200.50"),
            date: date(2024, 4, 1),
            transaction_type: TransactionType::Expense,
            category_id: Some(4),
        };
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["date"], "2024-04-01T00:00:00");
        assert_eq!(value["type"], "EXPENSE");
        assert_eq!(value["categoryId"], 4);
        assert!(value["amount"].is_number());
        assert_eq!(value["amount"].as_f64(), Some(1200.5));
    }

    #[test]
    fn test_transaction_draft_validation() {
        let mut draft = TransactionDraft {
            description: "  ".to_string(),
            amount: dec("10"),
            date: date(2024, 4, 1),
            transaction_type: TransactionType::Income,
            category_id: Some(1),
        };
        assert_eq!(draft.validate().unwrap_err().field(), Some("description"));

        draft.description = "Bonus".to_string();
        draft.amount = Decimal::ZERO;
        assert_eq!(draft.validate().unwrap_err().field(), Some("amount"));

        draft.amount = dec("10");
        draft.category_id = None;
        assert_eq!(draft.validate().unwrap_err().field(), Some("categoryId"));

        draft.category_id = Some(1);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_goal_round_trip_fields() {
        let json = r#"{"id": 9, "name": "Trip", "targetAmount": 200, "currentAmount": 250.0,
            "targetDate": "2025-01-31"}"#;
        let goal: Goal = serde_json::from_str(json).unwrap();
        assert_eq!(goal.target_amount, dec("200"));
        assert_eq!(goal.target_date, date(2025, 1, 31));

        let value = serde_json::to_value(&goal).unwrap();
        assert_eq!(value["targetDate"], "2025-01-31");
        assert!(value.get("description").is_none());
    }

    #[test]
    fn test_goal_draft_validation() {
        let mut draft = GoalDraft {
            name: "Car".to_string(),
            description: None,
            target_amount: dec("0"),
            current_amount: dec("0"),
            target_date: Some(date(2030, 1, 1)),
        };
        assert_eq!(draft.validate().unwrap_err().field(), Some("targetAmount"));

        draft.target_amount = dec("5000");
        draft.current_amount = dec("-1");
        assert_eq!(draft.validate().unwrap_err().field(), Some("currentAmount"));

        draft.current_amount = Decimal::ZERO;
        draft.target_date = None;
        assert_eq!(draft.validate().unwrap_err().field(), Some("targetDate"));

        draft.target_date = Some(date(2030, 1, 1));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_category_and_register_validation() {
        let draft = CategoryDraft { name: String::new(), description: None };
        assert_eq!(draft.validate().unwrap_err().field(), Some("name"));

        let request = RegisterRequest {
            name: "Ana".to_string(),
            email: "ana.example.com".to_string(),
            password: "secret1".to_string(),
        };
        assert_eq!(request.validate().unwrap_err().field(), Some("email"));
    }

    #[test]
    fn test_login_response_accepts_token_alias() {
        let response: LoginResponse =
            serde_json::from_str(r#"{"accessToken": "abc", "id": 1, "name": "Ana"}"#).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.name.as_deref(), Some("Ana"));
    }
}
