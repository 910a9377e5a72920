//! Full article lifecycle test against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every core client
//! operation over real HTTP using ureq. Validates that the core's request
//! building and response parsing work end-to-end with the actual server,
//! including revision history, pagination defaults and reverts.

use article_core::{ApiError, ArticleClient, ArticleData, HttpMethod, HttpResponse};

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// client handle status interpretation.
fn execute(req: article_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => {
            let mut builder = agent.delete(&req.path);
            for (name, value) in &req.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder.call()
        }
        (HttpMethod::Post, Some(body)) => {
            agent.post(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => {
            agent.put(&req.path).content_type("application/json").send(body.as_bytes())
        }
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

#[test]
fn article_lifecycle() {
    // Step 1: start mock server on a random port.
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    let client = ArticleClient::new(&format!("http://{addr}"));

    // Step 2: fetch an unknown article — should be NotFound.
    let req = client.build_fetch_article("missing");
    let err = client.parse_fetch_article(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 3: create an article.
    let original = ArticleData {
        page_id: "p1".to_string(),
        title: Some("Integration test".to_string()),
        source: Some("Hello\n\nWorld".to_string()),
        tags: Some(vec!["wiki".to_string(), "test".to_string()]),
        parent: None,
        locked: Some(false),
    };
    let req = client.build_create_article(&original).unwrap();
    client.parse_create_article(execute(req)).unwrap();

    // Step 4: duplicate create — surfaces the raw 409.
    let req = client.build_create_article(&original).unwrap();
    let err = client.parse_create_article(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 409, .. }));

    // Step 5: fetch round-trips every field we sent.
    let req = client.build_fetch_article("p1");
    let fetched = client.parse_fetch_article(execute(req)).unwrap();
    assert_eq!(fetched, original);

    // Step 6: the log starts with the creation entry.
    let req = client.build_fetch_article_log("p1", None, None);
    let log = client.parse_fetch_article_log(execute(req)).unwrap();
    assert_eq!(log.count, 1);
    assert_eq!(log.entries.len(), 1);
    assert_eq!(log.entries[0].rev_number, 0);
    assert_eq!(log.entries[0].kind, "new");
    assert!(!log.entries[0].created_at.is_empty());
    assert!(log.entries[0].user.0.is_object());

    // Step 7: update the source — logged as a `source` change.
    let mut edited = original.clone();
    edited.source = Some("Goodbye\n\nWorld".to_string());
    let req = client.build_update_article("p1", &edited).unwrap();
    client.parse_update_article(execute(req)).unwrap();

    let req = client.build_fetch_article("p1");
    let fetched = client.parse_fetch_article(execute(req)).unwrap();
    assert_eq!(fetched.source.as_deref(), Some("Goodbye\n\nWorld"));

    let req = client.build_fetch_article_log("p1", None, None);
    let log = client.parse_fetch_article_log(execute(req)).unwrap();
    assert_eq!(log.count, 2);
    assert_eq!(log.entries[1].kind, "source");

    // Step 8: update the title only — logged as a `title` change with meta.
    let mut retitled = edited.clone();
    retitled.title = Some("Renamed".to_string());
    let req = client.build_update_article("p1", &retitled).unwrap();
    client.parse_update_article(execute(req)).unwrap();

    let req = client.build_fetch_article_log("p1", None, None);
    let log = client.parse_fetch_article_log(execute(req)).unwrap();
    assert_eq!(log.count, 3);
    assert_eq!(log.entries[2].kind, "title");
    assert_eq!(log.entries[2].meta["title"], serde_json::json!("Renamed"));

    // Step 9: revision 0 still serves the original source and its render.
    let req = client.build_fetch_article_version("p1", 0, None).unwrap();
    let version = client.parse_fetch_article_version(execute(req)).unwrap();
    assert_eq!(version.source, "Hello\n\nWorld");
    assert_eq!(version.rendered, "<p>Hello</p>\n<p>World</p>");

    // Step 10: an unknown revision is NotFound.
    let req = client.build_fetch_article_version("p1", 99, None).unwrap();
    let err = client.parse_fetch_article_version(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 11: revert to revision 0 — current source rolls back.
    let req = client.build_revert_article_revision("p1", 0).unwrap();
    let reverted = client.parse_revert_article_revision(execute(req)).unwrap();
    assert_eq!(reverted.source.as_deref(), Some("Hello\n\nWorld"));

    let req = client.build_fetch_article_log("p1", None, None);
    let log = client.parse_fetch_article_log(execute(req)).unwrap();
    assert_eq!(log.count, 4);
    assert_eq!(log.entries[3].kind, "reverted");
    assert_eq!(log.entries[3].meta["revNumber"], serde_json::json!(0));

    // Step 12: pagination — `from=1` skips the creation entry, `count`
    // still reports the full history.
    let req = client.build_fetch_article_log("p1", Some(1), None);
    let log = client.parse_fetch_article_log(execute(req)).unwrap();
    assert_eq!(log.count, 4);
    assert_eq!(log.entries.len(), 3);
    assert_eq!(log.entries[0].rev_number, 1);

    // Step 13: delete, then everything is NotFound.
    let req = client.build_delete_article("p1");
    client.parse_delete_article(execute(req)).unwrap();

    let req = client.build_fetch_article("p1");
    let err = client.parse_fetch_article(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    let req = client.build_delete_article("p1");
    let err = client.parse_delete_article(execute(req)).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}
