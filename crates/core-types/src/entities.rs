use crate::error::CoreError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The highest unit price a product may carry.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// The highest quantity a single sale line may order.
pub const MAX_QUANTITY: u32 = 1_000_000;

/// A catalogue entry served by the products service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The body of `POST /produtos` and `PUT /produtos/:id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProductInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Option<Decimal>,
}

impl ProductInput {
    /// Trims the text fields and checks that every field is present and the
    /// price lies in `(0, MAX_PRICE]`. Returns `(name, description, price)`.
    pub fn validate(&self) -> Result<(String, String, Decimal), CoreError> {
        let name = required("name", &self.name)?;
        let description = required("description", &self.description)?;
        let price = self
            .price
            .ok_or_else(|| CoreError::InvalidInput("price".into(), "is required".into()))?;
        if price <= Decimal::ZERO {
            return Err(CoreError::InvalidInput(
                "price".into(),
                "must be greater than zero".into(),
            ));
        }
        if price > MAX_PRICE {
            return Err(CoreError::InvalidInput(
                "price".into(),
                format!("must not exceed {}", MAX_PRICE),
            ));
        }
        Ok((name, description, price))
    }
}

impl Product {
    pub fn create(input: &ProductInput) -> Result<Self, CoreError> {
        let (name, description, price) = input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description,
            price,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn apply(&mut self, input: &ProductInput) -> Result<(), CoreError> {
        let (name, description, price) = input.validate()?;
        self.name = name;
        self.description = description;
        self.price = price;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

/// A customer record served by the customers service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// The body of `POST /clientes` and `PUT /clientes/:id`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<(String, String), CoreError> {
        Ok((required("name", &self.name)?, required("phone", &self.phone)?))
    }
}

impl Customer {
    pub fn create(input: &CustomerInput) -> Result<Self, CoreError> {
        let (name, phone) = input.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            phone,
            created_at: Utc::now(),
            updated_at: None,
        })
    }

    pub fn apply(&mut self, input: &CustomerInput) -> Result<(), CoreError> {
        let (name, phone) = input.validate()?;
        self.name = name;
        self.phone = phone;
        self.updated_at = Some(Utc::now());
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Completed,
}

/// One priced line of a sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleItem {
    pub product_id: Uuid,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

impl SaleItem {
    pub fn priced(
        product_id: Uuid,
        quantity: u32,
        unit_price: Decimal,
    ) -> Result<Self, CoreError> {
        let subtotal = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or_else(|| {
                CoreError::AmountOutOfRange(format!("subtotal of product {}", product_id))
            })?;
        Ok(Self {
            product_id,
            quantity,
            unit_price,
            subtotal,
        })
    }
}

/// A completed sale recorded by the sales service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sale {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub customer_name: String,
    pub items: Vec<SaleItem>,
    pub total: Decimal,
    pub sold_at: DateTime<Utc>,
    pub status: SaleStatus,
}

impl Sale {
    /// Builds a sale from already priced lines; the total is the sum of subtotals.
    pub fn assemble(
        customer: &Customer,
        items: Vec<SaleItem>,
        sold_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        let total = items
            .iter()
            .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.subtotal))
            .ok_or_else(|| CoreError::AmountOutOfRange("sale total".to_string()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            customer_id: customer.id,
            customer_name: customer.name.clone(),
            items,
            total,
            sold_at,
            status: SaleStatus::Completed,
        })
    }
}

/// The body of `POST /vendas`. Prices are never taken from the client.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NewSale {
    pub customer_id: Uuid,
    pub items: Vec<NewSaleItem>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct NewSaleItem {
    pub product_id: Uuid,
    pub quantity: u32,
}

impl NewSale {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.items.is_empty() {
            return Err(CoreError::InvalidInput(
                "items".into(),
                "a sale needs at least one item".into(),
            ));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity == 0) {
            return Err(CoreError::InvalidInput(
                "quantity".into(),
                format!("must be positive for product {}", item.product_id),
            ));
        }
        if let Some(item) = self.items.iter().find(|i| i.quantity > MAX_QUANTITY) {
            return Err(CoreError::InvalidInput(
                "quantity".into(),
                format!("must not exceed {} for product {}", MAX_QUANTITY, item.product_id),
            ));
        }
        Ok(())
    }
}

fn required(field: &str, value: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(
            field.to_string(),
            "is required".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
