use api_types::{PRODUCT_TAG_TYPE, to_global_id};
use async_graphql::{Request, Variables};
use catalog::{
    auth::{Permission, RequestContext},
    db,
    graphql::{CatalogSchema, build_schema},
};
use serde_json::{Value, json};
use uuid::Uuid;

const CREATE: &str = r#"
    mutation Create($input: ProductTagInput!) {
        productTagCreate(input: $input) {
            productErrors { field message code }
            errors { field code }
            productTag { id name slug isActive hasVariants }
        }
    }
"#;

const UPDATE: &str = r#"
    mutation Update($id: ID!, $input: ProductTagInput!) {
        productTagUpdate(id: $id, input: $input) {
            productErrors { field message code }
            productTag { id name slug isActive hasVariants }
        }
    }
"#;

const DELETE: &str = r#"
    mutation Delete($id: ID!) {
        productTagDelete(id: $id) {
            productErrors { field message code }
            productTag { id slug }
        }
    }
"#;

const GET: &str = r#"
    query Get($id: ID, $slug: String) {
        productTag(id: $id, slug: $slug) { id name slug isActive }
    }
"#;

const LIST: &str = r#"
    query List($first: Int) {
        productTags(first: $first) { name slug isActive }
    }
"#;

async fn setup() -> CatalogSchema {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    build_schema(pool)
}

fn staff() -> RequestContext {
    RequestContext::staff(Uuid::new_v4(), [Permission::ManageProducts])
}

async fn execute(schema: &CatalogSchema, ctx: RequestContext, query: &str, variables: Value) -> Value {
    let request = Request::new(query)
        .variables(Variables::from_json(variables))
        .data(ctx);
    serde_json::to_value(schema.execute(request).await).unwrap()
}

async fn create(schema: &CatalogSchema, input: Value) -> Value {
    let response = execute(schema, staff(), CREATE, json!({ "input": input })).await;
    assert!(response.get("errors").is_none(), "unexpected errors: {response}");
    response["data"]["productTagCreate"].clone()
}

async fn create_ok(schema: &CatalogSchema, input: Value) -> Value {
    let payload = create(schema, input).await;
    assert_eq!(payload["productErrors"], json!([]), "payload: {payload}");
    payload["productTag"].clone()
}

fn single_error(payload: &Value) -> (&str, &str) {
    let errors = payload["productErrors"].as_array().unwrap();
    assert_eq!(errors.len(), 1, "payload: {payload}");
    (
        errors[0]["field"].as_str().unwrap(),
        errors[0]["code"].as_str().unwrap(),
    )
}

#[tokio::test]
async fn create_without_slug_generates_one_from_name() {
    let schema = setup().await;

    let tag = create_ok(&schema, json!({ "name": "Summer Sale" })).await;

    assert_eq!(tag["name"], "Summer Sale");
    assert_eq!(tag["slug"], "summer-sale");
    assert_eq!(tag["isActive"], true);
    assert_eq!(tag["hasVariants"], true);
}

#[tokio::test]
async fn create_keeps_explicit_slug_and_flags() {
    let schema = setup().await;

    let tag = create_ok(
        &schema,
        json!({
            "name": "Clearance",
            "slug": "last_chance-2024",
            "isActive": false,
            "hasVariants": false
        }),
    )
    .await;

    assert_eq!(tag["slug"], "last_chance-2024");
    assert_eq!(tag["isActive"], false);
    assert_eq!(tag["hasVariants"], false);
}

#[tokio::test]
async fn generated_slugs_get_numeric_suffixes_on_collision() {
    let schema = setup().await;

    let first = create_ok(&schema, json!({ "name": "Sale" })).await;
    let second = create_ok(&schema, json!({ "name": "sale" })).await;
    let third = create_ok(&schema, json!({ "name": "SALE!" })).await;

    assert_eq!(first["slug"], "sale");
    assert_eq!(second["slug"], "sale-2");
    assert_eq!(third["slug"], "sale-3");
}

#[tokio::test]
async fn create_with_empty_name_and_slug_requires_slug() {
    let schema = setup().await;

    for input in [
        json!({ "name": "", "slug": "" }),
        json!({ "name": "   " }),
        json!({ "name": "!!!" }),
        json!({ "slug": null }),
        json!({}),
    ] {
        let payload = create(&schema, input.clone()).await;
        assert_eq!(single_error(&payload), ("slug", "REQUIRED"), "input: {input}");
        assert_eq!(payload["productTag"], Value::Null);
        assert_eq!(payload["errors"], json!([{ "field": "slug", "code": "REQUIRED" }]));
    }

    let list = execute(&schema, staff(), LIST, json!({})).await;
    assert_eq!(list["data"]["productTags"], json!([]));
}

#[tokio::test]
async fn create_with_slug_but_no_name_requires_name() {
    let schema = setup().await;

    let payload = create(&schema, json!({ "slug": "orphan" })).await;

    assert_eq!(single_error(&payload), ("name", "REQUIRED"));
}

#[tokio::test]
async fn create_with_overlong_name_is_invalid() {
    let schema = setup().await;

    let payload = create(&schema, json!({ "name": "x".repeat(251), "slug": "long" })).await;
    assert_eq!(single_error(&payload), ("name", "INVALID"));

    let tag = create_ok(&schema, json!({ "name": "x".repeat(250), "slug": "long" })).await;
    assert_eq!(tag["slug"], "long");
}

#[tokio::test]
async fn create_rejects_malformed_and_duplicate_slugs() {
    let schema = setup().await;

    let payload = create(&schema, json!({ "name": "Bad", "slug": "not a slug" })).await;
    assert_eq!(single_error(&payload), ("slug", "INVALID"));

    create_ok(&schema, json!({ "name": "Outdoor", "slug": "outdoor" })).await;
    let payload = create(&schema, json!({ "name": "Outdoor again", "slug": "outdoor" })).await;
    assert_eq!(single_error(&payload), ("slug", "UNIQUE"));
}

#[tokio::test]
async fn update_nonexistent_tag_is_not_found() {
    let schema = setup().await;
    let missing = to_global_id(PRODUCT_TAG_TYPE, Uuid::new_v4());

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": missing.as_str(), "input": { "name": "Ghost" } }),
    )
    .await;

    let payload = &response["data"]["productTagUpdate"];
    assert_eq!(single_error(payload), ("id", "NOT_FOUND"));
    assert_eq!(payload["productTag"], Value::Null);
}

#[tokio::test]
async fn update_with_malformed_or_foreign_id_is_rejected() {
    let schema = setup().await;

    for id in [
        "garbage".to_string(),
        to_global_id("Channel", Uuid::new_v4()).0,
    ] {
        let response = execute(
            &schema,
            staff(),
            UPDATE,
            json!({ "id": id, "input": { "name": "Nope" } }),
        )
        .await;
        let payload = &response["data"]["productTagUpdate"];
        assert_eq!(single_error(payload), ("id", "GRAPHQL_ERROR"), "id: {id}");
    }
}

#[tokio::test]
async fn update_changes_only_provided_fields() {
    let schema = setup().await;
    let tag = create_ok(&schema, json!({ "name": "Winter", "hasVariants": false })).await;

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": tag["id"], "input": { "isActive": false } }),
    )
    .await;
    let updated = &response["data"]["productTagUpdate"]["productTag"];

    assert_eq!(updated["id"], tag["id"]);
    assert_eq!(updated["name"], "Winter");
    assert_eq!(updated["slug"], "winter");
    assert_eq!(updated["isActive"], false);
    assert_eq!(updated["hasVariants"], false);

    // renaming alone keeps the stored slug
    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": tag["id"], "input": { "name": "Deep Winter" } }),
    )
    .await;
    let updated = &response["data"]["productTagUpdate"]["productTag"];
    assert_eq!(updated["name"], "Deep Winter");
    assert_eq!(updated["slug"], "winter");
}

#[tokio::test]
async fn update_with_null_slug_regenerates_from_name() {
    let schema = setup().await;
    let tag = create_ok(&schema, json!({ "name": "Autumn" })).await;

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": tag["id"], "input": { "name": "Late Autumn", "slug": null } }),
    )
    .await;
    assert_eq!(
        response["data"]["productTagUpdate"]["productTag"]["slug"],
        "late-autumn"
    );

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": tag["id"], "input": { "slug": "" } }),
    )
    .await;
    assert_eq!(
        single_error(&response["data"]["productTagUpdate"]),
        ("slug", "REQUIRED")
    );
}

#[tokio::test]
async fn update_slug_uniqueness_ignores_the_tag_itself() {
    let schema = setup().await;
    let spring = create_ok(&schema, json!({ "name": "Spring" })).await;
    create_ok(&schema, json!({ "name": "Summer" })).await;

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": spring["id"], "input": { "slug": "spring" } }),
    )
    .await;
    assert_eq!(
        response["data"]["productTagUpdate"]["productErrors"],
        json!([])
    );

    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": spring["id"], "input": { "slug": "summer" } }),
    )
    .await;
    assert_eq!(
        single_error(&response["data"]["productTagUpdate"]),
        ("slug", "UNIQUE")
    );

    // regenerating from a colliding name picks a suffix instead
    let response = execute(
        &schema,
        staff(),
        UPDATE,
        json!({ "id": spring["id"], "input": { "name": "Summer", "slug": null } }),
    )
    .await;
    assert_eq!(
        response["data"]["productTagUpdate"]["productTag"]["slug"],
        "summer-2"
    );
}

#[tokio::test]
async fn delete_removes_tag_and_second_delete_is_not_found() {
    let schema = setup().await;
    let tag = create_ok(&schema, json!({ "name": "Fleeting" })).await;

    let response = execute(&schema, staff(), DELETE, json!({ "id": tag["id"] })).await;
    let payload = &response["data"]["productTagDelete"];
    assert_eq!(payload["productErrors"], json!([]));
    assert_eq!(payload["productTag"]["id"], tag["id"]);
    assert_eq!(payload["productTag"]["slug"], "fleeting");

    let lookup = execute(&schema, staff(), GET, json!({ "id": tag["id"] })).await;
    assert_eq!(lookup["data"]["productTag"], Value::Null);

    let response = execute(&schema, staff(), DELETE, json!({ "id": tag["id"] })).await;
    assert_eq!(
        single_error(&response["data"]["productTagDelete"]),
        ("id", "NOT_FOUND")
    );
}

#[tokio::test]
async fn mutations_require_manage_products() {
    let schema = setup().await;
    let tag = create_ok(&schema, json!({ "name": "Protected" })).await;

    let requesters = [
        RequestContext::anonymous(),
        RequestContext::staff(Uuid::new_v4(), []),
    ];

    for ctx in requesters {
        let attempts = [
            ("productTagCreate", CREATE, json!({ "input": { "name": "Sneaky" } })),
            (
                "productTagUpdate",
                UPDATE,
                json!({ "id": tag["id"], "input": { "name": "Hijacked" } }),
            ),
            ("productTagDelete", DELETE, json!({ "id": tag["id"] })),
        ];

        for (field, query, variables) in attempts {
            let response = execute(&schema, ctx.clone(), query, variables).await;
            assert_eq!(response["data"][field], Value::Null, "{field}: {response}");
            assert_eq!(
                response["errors"][0]["extensions"]["code"],
                "PERMISSION_DENIED",
                "{field}: {response}"
            );
            assert_eq!(
                response["errors"][0]["message"],
                "You need one of the following permissions: MANAGE_PRODUCTS"
            );
        }
    }

    let lookup = execute(&schema, staff(), GET, json!({ "id": tag["id"] })).await;
    assert_eq!(lookup["data"]["productTag"]["name"], "Protected");
    let list = execute(&schema, staff(), LIST, json!({})).await;
    assert_eq!(list["data"]["productTags"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn inactive_tags_are_visible_to_staff_only() {
    let schema = setup().await;
    create_ok(&schema, json!({ "name": "Beta", "isActive": false })).await;
    create_ok(&schema, json!({ "name": "Alpha" })).await;

    let public = execute(&schema, RequestContext::anonymous(), LIST, json!({})).await;
    assert_eq!(
        public["data"]["productTags"],
        json!([{ "name": "Alpha", "slug": "alpha", "isActive": true }])
    );

    let staff_list = execute(&schema, staff(), LIST, json!({})).await;
    let names: Vec<_> = staff_list["data"]["productTags"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tag| tag["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["Alpha", "Beta"]);

    let limited = execute(&schema, staff(), LIST, json!({ "first": 1 })).await;
    assert_eq!(limited["data"]["productTags"].as_array().unwrap().len(), 1);

    let hidden = execute(
        &schema,
        RequestContext::anonymous(),
        GET,
        json!({ "slug": "beta" }),
    )
    .await;
    assert_eq!(hidden["data"]["productTag"], Value::Null);

    let visible = execute(&schema, staff(), GET, json!({ "slug": "beta" })).await;
    assert_eq!(visible["data"]["productTag"]["isActive"], false);
}

#[tokio::test]
async fn product_tag_lookup_needs_exactly_one_argument() {
    let schema = setup().await;

    let response = execute(&schema, staff(), GET, json!({})).await;
    assert_eq!(
        response["errors"][0]["message"],
        "Argument 'id' or 'slug' is required."
    );

    let id = to_global_id(PRODUCT_TAG_TYPE, Uuid::new_v4());
    let response = execute(
        &schema,
        staff(),
        GET,
        json!({ "id": id.as_str(), "slug": "x" }),
    )
    .await;
    assert_eq!(response["errors"][0]["extensions"]["code"], "GRAPHQL_ERROR");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_on_a_file_database_all_succeed() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("catalog.db").display());
    let pool = db::create_pool(&url, 5).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    let schema = build_schema(pool);

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let schema = schema.clone();
            tokio::spawn(async move {
                execute(&schema, staff(), CREATE, json!({ "input": { "name": format!("Tag {i}") } })).await
            })
        })
        .collect();

    for handle in handles {
        let response = handle.await.unwrap();
        assert!(response.get("errors").is_none(), "unexpected errors: {response}");
        assert_eq!(response["data"]["productTagCreate"]["productErrors"], json!([]));
    }

    let list = execute(&schema, staff(), LIST, json!({ "first": 100 })).await;
    assert_eq!(list["data"]["productTags"].as_array().unwrap().len(), 20);
}
