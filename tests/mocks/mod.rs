mod mock_postal_code_registry;

pub use mock_postal_code_registry::MockPostalCodeRegistry;
