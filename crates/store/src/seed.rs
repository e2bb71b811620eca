//! The records each service starts with, so a fresh deployment has
//! something to show on the dashboard.

use chrono::Utc;
use core_types::{Customer, Product};
use rust_decimal_macros::dec;
use uuid::Uuid;

pub fn products() -> Vec<Product> {
    let now = Utc::now();
    vec![
        Product {
            id: Uuid::new_v4(),
            name: "Notebook Dell".to_string(),
            description: "Notebook Dell Inspiron 15 3000".to_string(),
            price: dec!(2500.00),
            created_at: now,
            updated_at: None,
        },
        Product {
            id: Uuid::new_v4(),
            name: "Mouse Logitech".to_string(),
            description: "Mouse sem fio Logitech M705".to_string(),
            price: dec!(89.90),
            created_at: now,
            updated_at: None,
        },
    ]
}

pub fn customers() -> Vec<Customer> {
    let now = Utc::now();
    vec![
        Customer {
            id: Uuid::new_v4(),
            name: "João Silva".to_string(),
            phone: "(11) 99999-9999".to_string(),
            created_at: now,
            updated_at: None,
        },
        Customer {
            id: Uuid::new_v4(),
            name: "Maria Santos".to_string(),
            phone: "(11) 88888-8888".to_string(),
            created_at: now,
            updated_at: None,
        },
    ]
}
