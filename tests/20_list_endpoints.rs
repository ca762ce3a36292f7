mod common;

use anyhow::Result;
use axum::http::StatusCode;

#[tokio::test]
async fn envelope_reports_paging_metadata() -> Result<()> {
    let app = common::app()?;

    let (status, payload) = common::get(&app, "/api/invoices?page=1&size=3").await?;
    assert_eq!(status, StatusCode::OK, "{}", payload);
    assert_eq!(payload["success"], true);
    let data = &payload["data"];
    assert_eq!(common::ids(&payload), vec![4, 3, 2]);
    assert_eq!(data["page"], 1);
    assert_eq!(data["size"], 3);
    assert_eq!(data["totalItems"], 7);
    assert_eq!(data["totalPages"], 3);
    assert_eq!(data["first"], false);
    assert_eq!(data["last"], false);

    let (_, payload) = common::get(&app, "/api/invoices?page=2&size=3").await?;
    assert_eq!(common::ids(&payload), vec![1]);
    assert_eq!(payload["data"]["last"], true);
    Ok(())
}

#[tokio::test]
async fn defaults_to_newest_first_twenty_per_page() -> Result<()> {
    let app = common::app()?;
    let (_, payload) = common::get(&app, "/api/invoices").await?;

    assert_eq!(common::ids(&payload), vec![7, 6, 5, 4, 3, 2, 1]);
    assert_eq!(payload["data"]["size"], 20);
    assert_eq!(payload["data"]["first"], true);
    assert_eq!(payload["data"]["last"], true);
    Ok(())
}

#[tokio::test]
async fn empty_result_is_a_single_first_and_last_page() -> Result<()> {
    let app = common::app()?;
    let (status, payload) = common::get(&app, "/api/invoices?filter_amount_gt=100000").await?;

    assert_eq!(status, StatusCode::OK);
    let data = &payload["data"];
    assert_eq!(data["items"], serde_json::json!([]));
    assert_eq!(data["totalItems"], 0);
    assert_eq!(data["totalPages"], 0);
    assert_eq!(data["first"], true);
    assert_eq!(data["last"], true);
    Ok(())
}

#[tokio::test]
async fn page_past_the_end_is_empty() -> Result<()> {
    let app = common::app()?;
    let (_, payload) = common::get(&app, "/api/invoices?page=5&size=3").await?;

    assert!(common::ids(&payload).is_empty());
    assert_eq!(payload["data"]["totalItems"], 7);
    assert_eq!(payload["data"]["totalPages"], 3);
    assert_eq!(payload["data"]["last"], false);
    Ok(())
}

#[tokio::test]
async fn size_is_clamped() -> Result<()> {
    let app = common::app()?;

    let (_, payload) = common::get(&app, "/api/invoices?size=500").await?;
    assert_eq!(payload["data"]["size"], 100);

    let (_, payload) = common::get(&app, "/api/invoices?size=0").await?;
    assert_eq!(payload["data"]["size"], 1);
    assert_eq!(payload["data"]["totalPages"], 7);

    let (_, payload) = common::get(&app, "/api/invoices?size=lots&page=-2").await?;
    assert_eq!(payload["data"]["size"], 20);
    assert_eq!(payload["data"]["page"], 0);
    Ok(())
}

#[tokio::test]
async fn sorts_by_any_scalar_attribute() -> Result<()> {
    let app = common::app()?;

    let (_, payload) = common::get(&app, "/api/invoices?sortBy=amount&direction=ASC").await?;
    assert_eq!(common::ids(&payload), vec![6, 3, 7, 5, 2, 4, 1]);

    let (_, payload) = common::get(&app, "/api/invoices?sortBy=client.name&direction=ASC").await?;
    assert_eq!(common::ids(&payload), vec![1, 2, 6, 3, 4, 5, 7]);
    Ok(())
}

#[tokio::test]
async fn invalid_sort_field_is_rejected() -> Result<()> {
    let app = common::app()?;
    for sort in ["bogus", "client", "client.nope", "client.", "a..b"] {
        let (status, payload) = common::get(&app, &format!("/api/invoices?sortBy={}", sort)).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", sort);
        assert!(payload["field_errors"][sort].is_string(), "{}", payload);
    }
    Ok(())
}

#[tokio::test]
async fn items_are_mapped_to_response_shape() -> Result<()> {
    let app = common::app()?;
    let (_, payload) = common::get(&app, "/api/invoices?filter_id=3").await?;

    let item = &payload["data"]["items"][0];
    assert_eq!(item["number"], "INV-2025-003");
    assert_eq!(item["clientId"], 2);
    assert_eq!(item["issueDate"], "2025-01-31");
    assert!(item.get("createdAt").is_none());
    Ok(())
}

#[tokio::test]
async fn client_scoped_lists_add_their_base_filter() -> Result<()> {
    let app = common::app()?;

    let (_, payload) = common::get(&app, "/api/clients/1/invoices").await?;
    assert_eq!(common::ids(&payload), vec![6, 2, 1]);

    let (_, payload) = common::get(&app, "/api/clients/1/invoices?filter_status=PAID").await?;
    assert_eq!(common::ids(&payload), vec![6, 1]);

    let (_, payload) = common::get(&app, "/api/clients/1/projects").await?;
    assert_eq!(common::ids(&payload), vec![2, 1]);

    let (status, payload) = common::get(&app, "/api/clients/99/projects").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["totalItems"], 0);
    Ok(())
}

#[tokio::test]
async fn outstanding_invoices_are_sent_or_overdue() -> Result<()> {
    let app = common::app()?;

    let (_, payload) = common::get(&app, "/api/invoices/outstanding").await?;
    assert_eq!(common::ids(&payload), vec![4, 2]);

    let (_, payload) = common::get(&app, "/api/invoices/outstanding?filter_clientId=2").await?;
    assert_eq!(common::ids(&payload), vec![4]);
    Ok(())
}

#[tokio::test]
async fn clients_filter_on_flags_and_nullable_fields() -> Result<()> {
    let app = common::app()?;

    let (_, payload) = common::get(&app, "/api/clients?filter_active=false").await?;
    assert_eq!(common::ids(&payload), vec![3]);

    let (_, payload) = common::get(&app, "/api/clients?filter_company_isnull=true").await?;
    assert_eq!(common::ids(&payload), vec![2]);

    let (_, payload) = common::get(&app, "/api/clients?filter_name_like=CORP&sortBy=name&direction=asc").await?;
    assert_eq!(common::ids(&payload), vec![1]);
    Ok(())
}

#[tokio::test]
async fn health_reports_the_store() -> Result<()> {
    let app = common::app()?;
    let (status, payload) = common::get(&app, "/health").await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["status"], "ok");
    assert_eq!(payload["data"]["database"], "memory");

    let (status, payload) = common::get(&app, "/").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload["data"]["filtering"]["prefix"], "filter_");
    Ok(())
}
