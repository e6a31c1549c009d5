//! # Domain Types
//!
//! The four stored records of Stockbook and their validated drafts.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Records                                  │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │    Category     │◄──│      Item       │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  id             │   │  id             │                             │
//! │  │  name           │   │  name           │                             │
//! │  └─────────────────┘   │  category_id    │                             │
//! │           ▲            │  unit?          │                             │
//! │           │            └─────────────────┘                             │
//! │           │                 ▲        ▲                                  │
//! │  ┌────────┴────────┐        │        │       ┌─────────────────┐       │
//! │  │    Purchase     │────────┘        └───────│      Sale       │       │
//! │  │  ─────────────  │                         │  ─────────────  │       │
//! │  │  item_id        │                         │  item_id        │       │
//! │  │  purchase_qty   │   closing stock =       │  quantity       │       │
//! │  │  purchase_date  │   Σ purchase_qty        │  date           │       │
//! │  └─────────────────┘   − Σ quantity          └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Drafts and Updates
//! Records come back from the store fully formed. New records and partial
//! updates can only be built through validating constructors
//! ([`NewItem::new`], [`PurchaseUpdate::with_quantity`], ...), so nothing
//! malformed ever reaches the store. References are NOT checked here: the
//! store does not enforce them either, and lookups fall back to
//! "Unknown Item" / "Unknown Category".

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::validation::{validate_id, validate_name, validate_quantity, validate_unit, ValidationResult};
use crate::error::ValidationError;

// =============================================================================
// Collections
// =============================================================================

/// The four collections held by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    Items,
    Categories,
    Purchases,
    Sales,
}

impl Collection {
    /// Every collection, in load order.
    pub const ALL: [Collection; 4] = [
        Collection::Items,
        Collection::Categories,
        Collection::Purchases,
        Collection::Sales,
    ];

    /// Collection (and table) name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Collection::Items => "items",
            Collection::Categories => "categories",
            Collection::Purchases => "purchases",
            Collection::Sales => "sales",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Collection {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "collection".to_string(),
                reason: "must be one of items, categories, purchases, sales".to_string(),
            })
    }
}

// =============================================================================
// Records
// =============================================================================

/// A stocked product type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub category_id: String,
    /// Display unit appended to quantities ("kg", "pcs").
    pub unit: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A grouping label for items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// An inbound stock event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Purchase {
    pub id: String,
    pub category_id: String,
    pub item_id: String,
    pub purchase_qty: i64,
    #[ts(as = "String")]
    pub purchase_date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// An outbound stock event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    pub item_id: String,
    pub quantity: i64,
    #[ts(as = "String")]
    pub date: DateTime<Utc>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Converts a form date to the stored timestamp (midnight UTC).
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

// =============================================================================
// Drafts
// =============================================================================

/// A validated category waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    name: String,
}

impl NewCategory {
    pub fn new(name: &str) -> ValidationResult<Self> {
        Ok(NewCategory {
            name: validate_name("name", name)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A validated item waiting to be stored.
///
/// ## Example
/// ```rust
/// use stockbook_core::NewItem;
///
/// let cat = "550e8400-e29b-41d4-a716-446655440000";
/// let item = NewItem::new("Rice", cat, Some("kg")).unwrap();
/// assert_eq!(item.unit(), Some("kg"));
///
/// // An item must belong to a category
/// assert!(NewItem::new("Rice", "", None).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    name: String,
    category_id: String,
    unit: Option<String>,
}

impl NewItem {
    pub fn new(name: &str, category_id: &str, unit: Option<&str>) -> ValidationResult<Self> {
        Ok(NewItem {
            name: validate_name("name", name)?,
            category_id: validate_id("categoryId", category_id)?,
            unit: validate_unit(unit)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }
}

/// A validated purchase waiting to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPurchase {
    category_id: String,
    item_id: String,
    purchase_qty: i64,
    purchase_date: DateTime<Utc>,
}

impl NewPurchase {
    pub fn new(
        category_id: &str,
        item_id: &str,
        purchase_qty: i64,
        purchase_date: DateTime<Utc>,
    ) -> ValidationResult<Self> {
        validate_quantity("purchaseQty", purchase_qty)?;

        Ok(NewPurchase {
            category_id: validate_id("categoryId", category_id)?,
            item_id: validate_id("itemId", item_id)?,
            purchase_qty,
            purchase_date,
        })
    }

    pub fn category_id(&self) -> &str {
        &self.category_id
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn purchase_qty(&self) -> i64 {
        self.purchase_qty
    }

    pub fn purchase_date(&self) -> DateTime<Utc> {
        self.purchase_date
    }
}

/// A validated sale waiting to be stored.
///
/// ## Example
/// ```rust
/// use chrono::Utc;
/// use stockbook_core::NewSale;
///
/// let item = "550e8400-e29b-41d4-a716-446655440000";
/// assert!(NewSale::new(item, 3, Utc::now()).is_ok());
/// assert!(NewSale::new(item, 0, Utc::now()).is_err());
/// assert!(NewSale::new("", 3, Utc::now()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    item_id: String,
    quantity: i64,
    date: DateTime<Utc>,
}

impl NewSale {
    pub fn new(item_id: &str, quantity: i64, date: DateTime<Utc>) -> ValidationResult<Self> {
        validate_quantity("quantity", quantity)?;

        Ok(NewSale {
            item_id: validate_id("itemId", item_id)?,
            quantity,
            date,
        })
    }

    pub fn item_id(&self) -> &str {
        &self.item_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

// =============================================================================
// Partial Updates
// =============================================================================
// Unset fields keep their stored value. Each setter validates its input.

/// Partial update of a category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryUpdate {
    name: Option<String>,
}

impl CategoryUpdate {
    pub fn with_name(mut self, name: &str) -> ValidationResult<Self> {
        self.name = Some(validate_name("name", name)?);
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
    }
}

/// Partial update of an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    name: Option<String>,
    category_id: Option<String>,
    /// `Some(None)` clears the unit.
    unit: Option<Option<String>>,
}

impl ItemUpdate {
    pub fn with_name(mut self, name: &str) -> ValidationResult<Self> {
        self.name = Some(validate_name("name", name)?);
        Ok(self)
    }

    pub fn with_category(mut self, category_id: &str) -> ValidationResult<Self> {
        self.category_id = Some(validate_id("categoryId", category_id)?);
        Ok(self)
    }

    /// Sets the unit. A blank unit clears the stored one.
    pub fn with_unit(mut self, unit: &str) -> ValidationResult<Self> {
        self.unit = Some(validate_unit(Some(unit))?);
        Ok(self)
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    /// `None` keeps the stored unit; `Some(None)` clears it.
    pub fn unit(&self) -> Option<Option<&str>> {
        self.unit.as_ref().map(|u| u.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.category_id.is_none() && self.unit.is_none()
    }
}

/// Partial update of a purchase (the edit-purchase modal).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PurchaseUpdate {
    category_id: Option<String>,
    item_id: Option<String>,
    purchase_qty: Option<i64>,
    purchase_date: Option<DateTime<Utc>>,
}

impl PurchaseUpdate {
    pub fn with_category(mut self, category_id: &str) -> ValidationResult<Self> {
        self.category_id = Some(validate_id("categoryId", category_id)?);
        Ok(self)
    }

    pub fn with_item(mut self, item_id: &str) -> ValidationResult<Self> {
        self.item_id = Some(validate_id("itemId", item_id)?);
        Ok(self)
    }

    pub fn with_quantity(mut self, purchase_qty: i64) -> ValidationResult<Self> {
        validate_quantity("purchaseQty", purchase_qty)?;
        self.purchase_qty = Some(purchase_qty);
        Ok(self)
    }

    pub fn with_date(mut self, purchase_date: DateTime<Utc>) -> Self {
        self.purchase_date = Some(purchase_date);
        self
    }

    pub fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn purchase_qty(&self) -> Option<i64> {
        self.purchase_qty
    }

    pub fn purchase_date(&self) -> Option<DateTime<Utc>> {
        self.purchase_date
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.item_id.is_none()
            && self.purchase_qty.is_none()
            && self.purchase_date.is_none()
    }
}

/// Partial update of a sale (the edit-sale modal).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SaleUpdate {
    item_id: Option<String>,
    quantity: Option<i64>,
    date: Option<DateTime<Utc>>,
}

impl SaleUpdate {
    pub fn with_item(mut self, item_id: &str) -> ValidationResult<Self> {
        self.item_id = Some(validate_id("itemId", item_id)?);
        Ok(self)
    }

    pub fn with_quantity(mut self, quantity: i64) -> ValidationResult<Self> {
        validate_quantity("quantity", quantity)?;
        self.quantity = Some(quantity);
        Ok(self)
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn item_id(&self) -> Option<&str> {
        self.item_id.as_deref()
    }

    pub fn quantity(&self) -> Option<i64> {
        self.quantity
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.date
    }

    pub fn is_empty(&self) -> bool {
        self.item_id.is_none() && self.quantity.is_none() && self.date.is_none()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CAT: &str = "550e8400-e29b-41d4-a716-446655440000";
    const ITEM: &str = "6fa459ea-ee8a-4ca4-894e-db77e160355e";

    #[test]
    fn test_collection_round_trip_names() {
        for c in Collection::ALL {
            assert_eq!(c.as_str().parse::<Collection>().unwrap(), c);
        }
        assert_eq!("SALES".parse::<Collection>().unwrap(), Collection::Sales);
        assert!("orders".parse::<Collection>().is_err());
    }

    #[test]
    fn test_start_of_day() {
        let date = NaiveDate::from_ymd_opt(2024, 2, 10).unwrap();
        let ts = start_of_day(date);
        assert_eq!(ts.to_rfc3339(), "2024-02-10T00:00:00+00:00");
        assert_eq!(ts.date_naive(), date);
    }

    #[test]
    fn test_new_purchase_rejects_bad_input() {
        let now = Utc::now();
        assert!(NewPurchase::new(CAT, ITEM, 10, now).is_ok());

        assert!(matches!(
            NewPurchase::new(CAT, ITEM, 0, now),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            NewPurchase::new(CAT, "", 10, now),
            Err(ValidationError::Required { .. })
        ));
        assert!(NewPurchase::new("nope", ITEM, 10, now).is_err());
    }

    #[test]
    fn test_new_item_trims_fields() {
        let item = NewItem::new("  Rice ", CAT, Some(" kg ")).unwrap();
        assert_eq!(item.name(), "Rice");
        assert_eq!(item.unit(), Some("kg"));

        let item = NewItem::new("Soap", CAT, Some("")).unwrap();
        assert_eq!(item.unit(), None);
    }

    #[test]
    fn test_updates_validate_each_field() {
        let update = SaleUpdate::default().with_quantity(4).unwrap();
        assert_eq!(update.quantity(), Some(4));
        assert!(!update.is_empty());

        assert!(SaleUpdate::default().with_quantity(-1).is_err());
        assert!(PurchaseUpdate::default().with_item("bad").is_err());
        assert!(ItemUpdate::default().with_name("").is_err());
        assert!(SaleUpdate::default().is_empty());
        assert!(CategoryUpdate::default().is_empty());
    }

    #[test]
    fn test_item_unit_update_can_clear() {
        assert_eq!(ItemUpdate::default().unit(), None);
        assert_eq!(ItemUpdate::default().with_unit("kg").unwrap().unit(), Some(Some("kg")));

        let cleared = ItemUpdate::default().with_unit(" ").unwrap();
        assert_eq!(cleared.unit(), Some(None));
        assert!(!cleared.is_empty());
    }

    #[test]
    fn test_records_serialize_as_documents() {
        let sale = Sale {
            id: "s1".to_string(),
            item_id: "a".to_string(),
            quantity: 2,
            date: start_of_day(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            created_at: start_of_day(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
        };
        let json = serde_json::to_value(&sale).unwrap();
        assert_eq!(json["itemId"], "a");
        assert_eq!(json["quantity"], 2);
    }
}
