// Lojas do cliente contra um servidor HTTP simulado (wiremock).

use reqwest::StatusCode;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use uuid::Uuid;
use wiremock::{
    matchers::{body_partial_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

use pos_backoffice::{
    client::{ApiClient, ClientError, SaleDraft, Store},
    models::catalog::{Category, Product},
};

fn product_json(id: Uuid, name: &str, price: f64, stock: i32) -> Value {
    json!({
        "id": id,
        "categoryId": null,
        "name": name,
        "description": null,
        "price": price,
        "stock": stock,
        "sku": format!("SKU-{stock}"),
        "barcode": null,
        "active": true,
        "createdAt": "2024-03-18T10:00:00Z",
        "updatedAt": "2024-03-18T10:00:00Z"
    })
}

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let api = ApiClient::new(server.uri()).unwrap();
    (server, api)
}

#[tokio::test]
async fn fetch_all_replaces_items_and_records_time() {
    let (server, api) = setup().await;
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    Mock::given(method("GET"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [product_json(a, "Café", 18.9, 10), product_json(b, "Pão", 0.75, 100)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut store: Store<Product> = Store::new(api);
    assert!(store.last_fetched().is_none());

    let items = store.fetch_all().await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(store.find(a).unwrap().price, dec!(18.9));
    assert!(!store.loading());
    assert!(store.error().is_none());
    assert!(store.last_fetched().is_some());
}

#[tokio::test]
async fn create_update_delete_reconcile_the_local_list() {
    let (server, api) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/v1/products"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": product_json(id, "Café", 18.9, 10) })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/api/v1/products/{id}")))
        .and(body_partial_json(json!({ "price": 21.5 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": product_json(id, "Café", 21.5, 10) })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/products/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let mut store: Store<Product> = Store::new(api);

    let created = store
        .create(&json!({ "name": "Café", "sku": "SKU-10", "price": 18.9, "stock": 10 }))
        .await
        .unwrap();
    assert_eq!(created.id, id);
    assert_eq!(store.items().len(), 1);

    store.update(id, &json!({ "price": 21.5 })).await.unwrap();
    assert_eq!(store.items().len(), 1);
    assert_eq!(store.find(id).unwrap().price, dec!(21.5));

    store.delete(id).await.unwrap();
    assert!(store.items().is_empty());
}

#[tokio::test]
async fn api_errors_are_recorded_and_returned() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/categories"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "error": "Um ou mais campos são inválidos.",
            "details": { "name": ["Já existe uma categoria com este nome."] }
        })))
        .mount(&server)
        .await;

    let mut store: Store<Category> = Store::new(api);
    let err = store.create(&json!({ "name": "Bebidas" })).await.unwrap_err();

    match &err {
        ClientError::Api { status, message, details } => {
            assert_eq!(*status, StatusCode::UNPROCESSABLE_ENTITY);
            assert_eq!(message, "Um ou mais campos são inválidos.");
            assert_eq!(details["name"], vec!["Já existe uma categoria com este nome."]);
        }
        other => panic!("erro inesperado: {other:?}"),
    }
    assert!(store.items().is_empty());
    assert!(store.error().unwrap().contains("HTTP 422"));
    assert!(!store.loading());
}

#[tokio::test]
async fn completing_a_sale_posts_the_draft_and_resets_it() {
    let (server, api) = setup().await;
    let product_id = Uuid::new_v4();
    let customer_id = Uuid::new_v4();
    let sale_id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/api/v1/sales"))
        .and(body_partial_json(json!({
            "customerId": customer_id,
            "paymentMethod": "cash",
            "items": [{ "productId": product_id, "quantity": 3 }]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "id": sale_id,
                "customerId": customer_id,
                "totalAmount": 56.7,
                "discountAmount": 0.0,
                "finalAmount": 56.7,
                "paymentStatus": "completed",
                "paymentMethod": "cash",
                "notes": null,
                "createdAt": "2024-03-18T10:00:00Z",
                "updatedAt": "2024-03-18T10:00:00Z",
                "customer": {
                    "id": customer_id,
                    "name": "Ana",
                    "email": "ana@example.com",
                    "phone": null,
                    "address": null,
                    "active": true,
                    "createdAt": "2024-03-18T10:00:00Z",
                    "updatedAt": "2024-03-18T10:00:00Z"
                },
                "items": [{
                    "id": Uuid::new_v4(),
                    "saleId": sale_id,
                    "productId": product_id,
                    "productName": "Café",
                    "quantity": 3,
                    "unitPrice": 18.9,
                    "discountAmount": 0.0,
                    "finalAmount": 56.7,
                    "createdAt": "2024-03-18T10:00:00Z"
                }]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let product: Product = serde_json::from_value(product_json(product_id, "Café", 18.9, 10)).unwrap();
    let mut draft = SaleDraft::new();
    draft.set_customer(customer_id);
    draft.add_item(&product, 1);
    draft.add_item(&product, 2);

    let sale = draft.complete(&api).await.unwrap();
    assert_eq!(sale.sale.id, sale_id);
    assert_eq!(sale.items.len(), 1);
    assert_eq!(draft, SaleDraft::new());
}

#[tokio::test]
async fn rejected_sale_keeps_the_draft() {
    let (server, api) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/sales"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "error": "Estoque insuficiente para o produto 'Café' (disponível: 1, solicitado: 2)"
        })))
        .mount(&server)
        .await;

    let product: Product = serde_json::from_value(product_json(Uuid::new_v4(), "Café", 18.9, 1)).unwrap();
    let mut draft = SaleDraft::new();
    draft.set_customer(Uuid::new_v4());
    draft.add_item(&product, 2);
    let before = draft.clone();

    let err = draft.complete(&api).await.unwrap_err();
    assert!(matches!(err, ClientError::Api { status: StatusCode::CONFLICT, .. }));
    assert_eq!(draft, before);
}
