use onegraph_api::url::{DEFAULT_DASHBOARD_APP_ID, DEFAULT_ONEGRAPH_HOST};
use onegraph_api::{graphql_endpoint, normalize_base_url, schema_endpoint};

#[test]
fn url_normalization_adds_https_to_bare_host() {
    assert_eq!(
        normalize_base_url("serve.onegraph.com/"),
        "https://serve.onegraph.com"
    );
}

#[test]
fn url_normalization_keeps_explicit_scheme() {
    assert_eq!(
        normalize_base_url("http://127.0.0.1:8080/"),
        "http://127.0.0.1:8080"
    );
}

#[test]
fn url_normalization_falls_back_to_default_host() {
    assert_eq!(
        normalize_base_url("   "),
        format!("https://{DEFAULT_ONEGRAPH_HOST}")
    );
}

#[test]
fn graphql_endpoint_carries_app_id_and_disables_metrics() {
    let url = graphql_endpoint("serve.onegraph.com", DEFAULT_DASHBOARD_APP_ID).expect("url");
    assert_eq!(url.path(), "/graphql");
    let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();
    assert_eq!(
        pairs,
        vec![
            ("app_id".to_owned(), DEFAULT_DASHBOARD_APP_ID.to_owned()),
            ("show_metrics".to_owned(), "false".to_owned()),
        ]
    );
}

#[test]
fn schema_endpoint_joins_services_as_csv() {
    let services = vec!["stripe".to_owned(), "github".to_owned()];
    let url = schema_endpoint("serve.onegraph.com", "app-1", &services).expect("url");
    assert_eq!(url.path(), "/schema");
    let services_param = url
        .query_pairs()
        .find(|(key, _)| key == "services")
        .map(|(_, value)| value.into_owned());
    assert_eq!(services_param.as_deref(), Some("stripe,github"));
}

#[test]
fn invalid_host_is_rejected() {
    assert!(graphql_endpoint("http://exa mple.com", "app").is_err());
}
