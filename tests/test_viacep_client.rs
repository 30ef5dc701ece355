//! Integration tests for the ViaCEP client using mockito for HTTP mocking.

use cadastro::domain::{validate_postal_code, ErrorKind, PostalCode, PostalCodeError};
use cadastro::error::RegistryError;
use cadastro::models::NewAddress;
use cadastro::registry::{CachedRegistry, PostalCodeRegistry, ViaCepClient};
use mockito::Server;
use std::net::TcpListener;
use std::thread;
use std::time::{Duration, Instant};

const SE_BODY: &str = r#"{
    "cep": "01001-000",
    "logradouro": "Praça da Sé",
    "complemento": "lado ímpar",
    "bairro": "Sé",
    "localidade": "São Paulo",
    "uf": "SP",
    "ibge": "3550308",
    "gia": "1004",
    "ddd": "11",
    "siafi": "7107"
}"#;

fn client(server: &Server) -> ViaCepClient {
    ViaCepClient::with_base_url(server.url(), Duration::from_secs(5))
}

fn cep(text: &str) -> PostalCode {
    PostalCode::parse(text).unwrap()
}

#[test]
fn test_lookup_found() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/01001000/json/")
        .match_header("accept", "application/json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SE_BODY)
        .create();

    let client = client(&server);
    let address = client.lookup(&cep("01001-000")).unwrap().unwrap();

    mock.assert();
    assert_eq!(address.cep, "01001-000");
    assert_eq!(address.street, "Praça da Sé");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(address.state, "SP");
    assert_eq!(client.metrics().lookups_total(), 1);
}

#[test]
fn test_erro_body_means_not_found() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/99999999/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"erro": "true"}"#)
        .expect(2)
        .create();

    let client = client(&server);
    assert_eq!(client.lookup(&cep("99999-999")).unwrap(), None);
    assert!(!client.exists(&cep("99999-999")).unwrap());

    mock.assert();
    assert_eq!(client.metrics().lookups_not_found_total(), 2);
}

#[test]
fn test_bad_request_means_not_found() {
    let mut server = Server::new();

    let _mock = server
        .mock("GET", "/00000000/json/")
        .with_status(400)
        .with_body("Bad Request")
        .create();

    let client = client(&server);
    let err = validate_postal_code("00000-000", &client).unwrap_err();
    assert_eq!(err, PostalCodeError::NotFound("00000-000".to_string()));
    assert_eq!(err.kind(), ErrorKind::Lookup);
}

#[test]
fn test_server_error_is_unavailable() {
    let mut server = Server::new();

    let _mock = server
        .mock("GET", "/01001000/json/")
        .with_status(503)
        .with_body("Service Unavailable")
        .create();

    let client = client(&server);
    match client.exists(&cep("01001-000")) {
        Err(RegistryError::Status { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected status error, got {:?}", other),
    }

    let err = validate_postal_code("01001-000", &client).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LookupUnavailable);
    assert!(err.is_retryable());
    assert_eq!(client.metrics().lookups_unavailable_total(), 2);
}

#[test]
fn test_malformed_body_is_unavailable() {
    let mut server = Server::new();

    let _mock = server
        .mock("GET", "/01001000/json/")
        .with_status(200)
        .with_body("<html>maintenance</html>")
        .create();

    let client = client(&server);
    assert!(matches!(
        client.exists(&cep("01001-000")),
        Err(RegistryError::Json(_))
    ));
}

#[test]
fn test_unreachable_registry_is_unavailable() {
    let client = ViaCepClient::with_base_url("http://127.0.0.1:1", Duration::from_secs(1));

    let err = validate_postal_code("01001-000", &client).unwrap_err();
    assert!(matches!(err, PostalCodeError::LookupUnavailable { .. }));
}

#[test]
fn test_silent_registry_times_out() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Accept connections and never write a response
    thread::spawn(move || {
        let mut held = Vec::new();
        for stream in listener.incoming().take(2) {
            held.push(stream);
        }
        thread::sleep(Duration::from_secs(5));
    });

    let client = ViaCepClient::with_base_url(format!("http://{}", addr), Duration::from_secs(1));

    let start = Instant::now();
    let err = validate_postal_code("01001-000", &client).unwrap_err();
    assert!(start.elapsed() < Duration::from_secs(3));
    assert!(matches!(err, PostalCodeError::LookupUnavailable { .. }));
    assert!(err.is_retryable());

    let start = Instant::now();
    assert!(matches!(
        client.exists(&cep("01001-000")),
        Err(RegistryError::Timeout)
    ));
    assert!(start.elapsed() < Duration::from_secs(3));
}

#[test]
fn test_dropped_connection_is_not_a_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    // Close each connection as soon as it is accepted
    thread::spawn(move || {
        for stream in listener.incoming().take(4) {
            drop(stream);
        }
    });

    let client = ViaCepClient::with_base_url(format!("http://{}", addr), Duration::from_secs(5));

    match client.exists(&cep("01001-000")) {
        Err(RegistryError::Timeout) => panic!("closed connection reported as timeout"),
        Err(_) => {}
        Ok(answer) => panic!("expected an error, got {}", answer),
    }
}

#[test]
fn test_malformed_code_never_reaches_registry() {
    let mut server = Server::new();

    let mock = server.mock("GET", mockito::Matcher::Any).expect(0).create();

    let client = client(&server);
    let err = validate_postal_code("0100-100", &client).unwrap_err();

    mock.assert();
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_cache_answers_repeat_lookups() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/01001000/json/")
        .with_status(200)
        .with_body(SE_BODY)
        .expect(1)
        .create();

    let client = client(&server);
    let registry = CachedRegistry::new(client.clone(), 60).with_metrics(client.metrics().clone());

    assert!(validate_postal_code("01001-000", &registry).is_ok());
    assert!(validate_postal_code("01001000", &registry).is_ok());

    mock.assert();
    assert_eq!(client.metrics().lookups_total(), 1);
    assert_eq!(client.metrics().cache_hits_total(), 1);
}

#[test]
fn test_cache_does_not_keep_outages() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/01001000/json/")
        .with_status(500)
        .expect(2)
        .create();

    let registry = CachedRegistry::new(client(&server), 60);

    assert!(registry.exists(&cep("01001-000")).is_err());
    assert!(registry.exists(&cep("01001-000")).is_err());

    mock.assert();
    assert!(registry.is_empty());
}

#[test]
fn test_prefill_then_validate_fetches_once() {
    let mut server = Server::new();

    let mock = server
        .mock("GET", "/01001000/json/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SE_BODY)
        .expect(1)
        .create();

    let client = client(&server);
    let registry = CachedRegistry::new(client.clone(), 60).with_metrics(client.metrics().clone());

    let mut form = NewAddress {
        user_id: 7,
        number: 100,
        complement: "apto 12".to_string(),
        postal_code: "01001-000".to_string(),
        ..Default::default()
    };
    assert!(form.needs_prefill());

    form.prefill_from(&registry).unwrap();
    let address = form.validate(&registry).unwrap();

    mock.assert();
    assert_eq!(address.street, "Praça da Sé");
    assert_eq!(address.city, "São Paulo");
    assert_eq!(client.metrics().lookups_total(), 1);
    assert_eq!(client.metrics().cache_hits_total(), 1);
}
