//! End-to-end registration flows: user form, address form, registry outages.

mod mocks;

use cadastro::domain::{
    validate_cpf, validate_name, validate_phone, validate_postal_code, CpfError, ErrorKind,
    NameError, PostalCode, PostalCodeError,
};
use cadastro::models::{Client, NewAddress, NewUser};
use cadastro::registry::{validate_postal_code_async, AsyncRegistry, CachedRegistry};
use cadastro::RegistrationError;
use mocks::MockPostalCodeRegistry;

fn user_form() -> NewUser {
    NewUser {
        name: "Maria da Silva".to_string(),
        email: "maria@example.com".to_string(),
        cpf: "123.456.789-09".to_string(),
        phone: Some("(21) 98765-4321".to_string()),
        password: "segredo123".to_string(),
        password_confirmation: "segredo123".to_string(),
        ..Default::default()
    }
}

fn address_form(user_id: u64) -> NewAddress {
    NewAddress {
        user_id,
        neighbourhood: "Centro".to_string(),
        city: "Rio de Janeiro".to_string(),
        state: "RJ".to_string(),
        street: "Avenida Rio Branco".to_string(),
        number: 1,
        complement: "sala 101".to_string(),
        postal_code: "20040-020".to_string(),
    }
}

#[test]
fn test_field_validators_on_documented_inputs() {
    assert!(validate_cpf("529.982.247-25").is_ok());
    assert!(matches!(
        validate_cpf("111.111.111-11"),
        Err(CpfError::Checksum(_))
    ));
    assert!(matches!(validate_cpf("123"), Err(CpfError::Format(_))));

    assert!(validate_name("João Silva").is_ok());
    assert!(matches!(validate_name("J Silva"), Err(NameError::Format { .. })));
    assert!(matches!(
        validate_name("João 3 Silva"),
        Err(NameError::Charset(_))
    ));

    assert!(validate_phone("(11) 91234-5678").is_ok());
    assert!(validate_phone("11 91234-5678").is_err());

    let registry = MockPostalCodeRegistry::with_codes(&["01001000"]);
    assert!(validate_postal_code("01001-000", &registry).is_ok());
    assert_eq!(
        validate_postal_code("0100-100", &registry),
        Err(PostalCodeError::Format("0100-100".to_string()))
    );
    assert_eq!(registry.call_count(), 1);
}

#[test]
fn test_register_user_with_address() {
    let registry = MockPostalCodeRegistry::with_codes(&["20040020"]);

    let user = user_form().validate().unwrap().with_id(42);
    let address = address_form(42).validate(&registry).unwrap();
    let client = Client::new(42, 1001).unwrap();

    assert_eq!(user.short_name(), "Maria da");
    assert_eq!(address.user_id, 42);
    assert_eq!(address.to_string(), "20040-020");
    assert_eq!(client.to_string(), "client #1001");
    assert_eq!(registry.call_count(), 1);
}

#[test]
fn test_address_rejected_for_unknown_code() {
    let registry = MockPostalCodeRegistry::new();

    let err = address_form(1).validate(&registry).unwrap_err();

    assert_eq!(
        err,
        RegistrationError::PostalCode(PostalCodeError::NotFound("20040-020".to_string()))
    );
    assert!(!err.is_retryable());
}

#[test]
fn test_outage_is_reported_as_retryable() {
    let registry = MockPostalCodeRegistry::with_codes(&["20040020"]);
    registry.set_down(true);

    let err = address_form(1).validate(&registry).unwrap_err();
    assert_eq!(err.field(), "cep");
    assert_eq!(err.kind(), ErrorKind::LookupUnavailable);
    assert!(err.is_retryable());

    registry.set_down(false);
    assert!(address_form(1).validate(&registry).is_ok());
}

#[test]
fn test_cache_retries_after_outage() {
    let mock = MockPostalCodeRegistry::with_codes(&["20040020"]);
    let registry = CachedRegistry::new(mock.clone(), 300);

    mock.set_down(true);
    assert!(address_form(1).validate(&registry).is_err());
    assert!(registry.is_empty());

    mock.set_down(false);
    assert!(address_form(1).validate(&registry).is_ok());
    assert!(address_form(2).validate(&registry).is_ok());

    // one failed call, one real lookup, then a cache hit
    assert_eq!(mock.call_count(), 2);
    assert_eq!(registry.metrics().cache_hits_total(), 1);
}

#[test]
fn test_invalid_local_fields_skip_lookup() {
    let registry = MockPostalCodeRegistry::with_codes(&["20040020"]);
    let mut form = address_form(1);
    form.street.clear();

    let err = form.validate(&registry).unwrap_err();

    assert_eq!(err.field(), "logradouro");
    assert_eq!(registry.call_count(), 0);
}

#[test]
fn test_user_form_reports_first_failure_only() {
    let mut form = user_form();
    form.email = "not-an-email".to_string();
    form.cpf = "000".to_string();
    form.phone = Some("bad".to_string());

    let err = form.validate().unwrap_err();
    assert_eq!(err.field(), "email");
    assert_eq!(err.kind(), ErrorKind::Format);
}

#[test]
fn test_form_from_json() {
    let json = r#"{
        "nome": "Maria da Silva",
        "email": "maria@example.com",
        "cpf": "12345678909",
        "password1": "abc",
        "password2": "abc"
    }"#;
    let form: NewUser = serde_json::from_str(json).unwrap();
    let user = form.validate_superuser().unwrap();

    assert!(user.is_superuser);
    assert_eq!(user.phone, None);

    let out = serde_json::to_value(&user).unwrap();
    assert_eq!(out["cpf"], "123.456.789-09");
    assert!(out.get("password").is_none());
}

#[tokio::test]
async fn test_async_lookups_share_registry() {
    let mock = MockPostalCodeRegistry::with_codes(&["01001000", "20040020"]);
    let registry = AsyncRegistry::new(mock.clone());

    assert!(validate_postal_code_async("01001-000", &registry).await.is_ok());

    let codes = ["01001-000", "20040-020", "99999-999"]
        .iter()
        .map(|c| PostalCode::parse(c).unwrap())
        .collect();
    let results = registry.exists_many(codes, 2).await;

    let found: Vec<bool> = results.into_iter().map(|(_, r)| r.unwrap()).collect();
    assert_eq!(found, vec![true, true, false]);
    assert_eq!(mock.call_count(), 4);
}
