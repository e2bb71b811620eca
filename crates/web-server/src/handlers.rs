use crate::{error::AppError, extract::RecordId, CustomersState, ProductsState, SalesState};
use analytics::{
    compute_statistics, digest_customers, AnalyticsError, CustomerDigest, NumericSeries,
    StatisticsResult,
};
use api_client::{CustomerList, ProductList, SaleList};
use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use core_types::{
    Customer, CustomerInput, HealthStatus, ListResponse, NewSale, Product, ProductInput, Sale,
    SaleItem, Source,
};
use executor::OffloadExecutor;
use futures::future::try_join_all;
use rust_decimal::Decimal;
use std::sync::Arc;
use store::Entity;

/// Copies values out of `records` and computes their statistics on the pool.
///
/// `records` is an owned snapshot; the store lock was released before this
/// call, so the computation never races a concurrent write.
async fn offload_list<T: Entity>(
    executor: &OffloadExecutor,
    records: Vec<T>,
    value: fn(&T) -> Decimal,
) -> Result<ListResponse<T, StatisticsResult>, AppError> {
    let list = executor
        .run(
            move |items: Vec<T>| -> Result<_, AnalyticsError> {
                let series = NumericSeries::collect(items.iter().map(value))?;
                Ok(ListResponse::new(items, compute_statistics(&series)?))
            },
            records,
        )
        .await??;
    Ok(list)
}

/// # GET /saude
pub async fn health(source: Source) -> Json<HealthStatus> {
    Json(HealthStatus::ok(source.service_name()))
}

// --- Products ---

/// # GET /produtos
pub async fn list_products(
    State(state): State<Arc<ProductsState>>,
) -> Result<Json<ProductList>, AppError> {
    let snapshot = state.products.snapshot().await;
    let list = offload_list(&state.executor, snapshot, |p: &Product| p.price).await?;
    Ok(Json(list))
}

/// # GET /estatisticas (products service)
pub async fn product_statistics(
    State(state): State<Arc<ProductsState>>,
) -> Result<Json<StatisticsResult>, AppError> {
    let snapshot = state.products.snapshot().await;
    let list = offload_list(&state.executor, snapshot, |p: &Product| p.price).await?;
    Ok(Json(list.statistics))
}

/// # GET /produtos/:id
pub async fn get_product(
    RecordId(id): RecordId,
    State(state): State<Arc<ProductsState>>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.products.find(id).await?))
}

/// # POST /produtos
pub async fn create_product(
    State(state): State<Arc<ProductsState>>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    let product = state.products.insert(Product::create(&input)?).await?;
    tracing::info!(id = %product.id, name = %product.name, "Product created.");
    Ok((StatusCode::CREATED, Json(product)))
}

/// # PUT /produtos/:id
pub async fn update_product(
    RecordId(id): RecordId,
    State(state): State<Arc<ProductsState>>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>, AppError> {
    let product = state
        .products
        .update(id, |product| product.apply(&input).map_err(AppError::from))
        .await?;
    Ok(Json(product))
}

/// # DELETE /produtos/:id
pub async fn delete_product(
    RecordId(id): RecordId,
    State(state): State<Arc<ProductsState>>,
) -> Result<StatusCode, AppError> {
    state.products.remove(id).await?;
    tracing::info!(%id, "Product deleted.");
    Ok(StatusCode::NO_CONTENT)
}

// --- Customers ---

/// # GET /clientes
pub async fn list_customers(
    State(state): State<Arc<CustomersState>>,
) -> Result<Json<CustomerList>, AppError> {
    let snapshot = state.customers.snapshot().await;
    let list = state
        .executor
        .run(
            |items: Vec<Customer>| {
                let digest = digest_customers(&items);
                ListResponse::new(items, digest)
            },
            snapshot,
        )
        .await?;
    Ok(Json(list))
}

/// # GET /estatisticas (customers service)
pub async fn customer_statistics(
    State(state): State<Arc<CustomersState>>,
) -> Result<Json<CustomerDigest>, AppError> {
    let snapshot = state.customers.snapshot().await;
    let digest = state
        .executor
        .run(|items: Vec<Customer>| digest_customers(&items), snapshot)
        .await?;
    Ok(Json(digest))
}

/// # GET /clientes/:id
pub async fn get_customer(
    RecordId(id): RecordId,
    State(state): State<Arc<CustomersState>>,
) -> Result<Json<Customer>, AppError> {
    Ok(Json(state.customers.find(id).await?))
}

/// # POST /clientes
pub async fn create_customer(
    State(state): State<Arc<CustomersState>>,
    Json(input): Json<CustomerInput>,
) -> Result<(StatusCode, Json<Customer>), AppError> {
    let customer = state.customers.insert(Customer::create(&input)?).await?;
    tracing::info!(id = %customer.id, "Customer created.");
    Ok((StatusCode::CREATED, Json(customer)))
}

/// # PUT /clientes/:id
pub async fn update_customer(
    RecordId(id): RecordId,
    State(state): State<Arc<CustomersState>>,
    Json(input): Json<CustomerInput>,
) -> Result<Json<Customer>, AppError> {
    let customer = state
        .customers
        .update(id, |customer| customer.apply(&input).map_err(AppError::from))
        .await?;
    Ok(Json(customer))
}

/// # DELETE /clientes/:id
/// Answers with the removed record.
pub async fn delete_customer(
    RecordId(id): RecordId,
    State(state): State<Arc<CustomersState>>,
) -> Result<Json<Customer>, AppError> {
    let removed = state.customers.remove(id).await?;
    tracing::info!(%id, "Customer deleted.");
    Ok(Json(removed))
}

// --- Sales ---

/// # GET /vendas
pub async fn list_sales(
    State(state): State<Arc<SalesState>>,
) -> Result<Json<SaleList>, AppError> {
    let snapshot = state.sales.snapshot().await;
    let list = offload_list(&state.executor, snapshot, |s: &Sale| s.total).await?;
    Ok(Json(list))
}

/// # GET /estatisticas (sales service)
pub async fn sale_statistics(
    State(state): State<Arc<SalesState>>,
) -> Result<Json<StatisticsResult>, AppError> {
    let snapshot = state.sales.snapshot().await;
    let list = offload_list(&state.executor, snapshot, |s: &Sale| s.total).await?;
    Ok(Json(list.statistics))
}

/// # GET /vendas/:id
pub async fn get_sale(
    RecordId(id): RecordId,
    State(state): State<Arc<SalesState>>,
) -> Result<Json<Sale>, AppError> {
    Ok(Json(state.sales.find(id).await?))
}

/// # POST /vendas
///
/// The customer and every product are looked up concurrently. The first
/// failed lookup aborts the rest, and all of them share one deadline.
/// Unit prices always come from the products service.
pub async fn create_sale(
    State(state): State<Arc<SalesState>>,
    Json(order): Json<NewSale>,
) -> Result<(StatusCode, Json<Sale>), AppError> {
    order.validate()?;

    let catalog = state.catalog.as_ref();
    let customer = async {
        catalog
            .customer(order.customer_id)
            .await
            .map_err(|e| AppError::from_lookup(e, AppError::UnknownCustomer))
    };
    let products = try_join_all(order.items.iter().map(|item| async move {
        catalog
            .product(item.product_id)
            .await
            .map_err(|e| AppError::from_lookup(e, AppError::UnknownProduct))
    }));

    let (customer, products) =
        tokio::time::timeout(state.lookup_timeout, async { tokio::try_join!(customer, products) })
            .await
            .map_err(|_| AppError::LookupTimeout)??;

    let items = order
        .items
        .iter()
        .zip(&products)
        .map(|(item, product)| SaleItem::priced(product.id, item.quantity, product.price))
        .collect::<Result<Vec<_>, _>>()?;

    let sale = state
        .sales
        .insert(Sale::assemble(&customer, items, Utc::now())?)
        .await?;
    tracing::info!(id = %sale.id, customer = %sale.customer_name, total = %sale.total, "Sale recorded.");
    Ok((StatusCode::CREATED, Json(sale)))
}
