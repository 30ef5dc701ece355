use cadastro::domain::PostalCode;
use cadastro::error::{RegistryError, RegistryResult};
use cadastro::registry::PostalCodeRegistry;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Mock postal-code registry for testing.
///
/// Knows a configurable set of codes, can be switched into an outage, and
/// counts how often it was asked.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockPostalCodeRegistry {
    known: Arc<Mutex<HashSet<String>>>,
    down: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

#[allow(dead_code)]
impl MockPostalCodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry that knows the given codes (digits only).
    pub fn with_codes(codes: &[&str]) -> Self {
        let registry = Self::new();
        for code in codes {
            registry.add_code(code);
        }
        registry
    }

    pub fn add_code(&self, digits: &str) {
        self.known.lock().unwrap().insert(digits.to_string());
    }

    /// Make every following call fail with a timeout.
    pub fn set_down(&self, down: bool) {
        self.down.store(down, Ordering::SeqCst);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn reset_call_count(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

impl PostalCodeRegistry for MockPostalCodeRegistry {
    fn exists(&self, code: &PostalCode) -> RegistryResult<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.down.load(Ordering::SeqCst) {
            return Err(RegistryError::Timeout);
        }
        Ok(self.known.lock().unwrap().contains(&code.digits()))
    }
}
