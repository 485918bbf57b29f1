//! Collaborators that answer with a preconfigured response.
//!
//! Used by the `session` CLI command and by tests.

use crate::services::{
    LocaleResolver, RateQuery, RateService, ServiceError, VerificationService, VerificationStatus,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Answers every price lookup with the same result and records the queries.
#[derive(Debug)]
pub struct FixedRateService {
    response: Result<String, ServiceError>,
    queries: Mutex<Vec<RateQuery>>,
}

impl FixedRateService {
    pub fn quoting(price: impl Into<String>) -> Self {
        Self::new(Ok(price.into()))
    }

    pub fn failing(error: ServiceError) -> Self {
        Self::new(Err(error))
    }

    pub fn new(response: Result<String, ServiceError>) -> Self {
        Self {
            response,
            queries: Mutex::new(Vec::new()),
        }
    }

    /// Queries received so far, oldest first.
    pub fn queries(&self) -> Vec<RateQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RateService for FixedRateService {
    async fn fetch_rate(&self, query: &RateQuery) -> Result<String, ServiceError> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(query.clone());
        }
        self.response.clone()
    }
}

/// Reports the same status for every address.
#[derive(Debug, Clone)]
pub struct FixedVerificationService {
    response: Result<VerificationStatus, ServiceError>,
}

impl FixedVerificationService {
    pub fn new(response: Result<VerificationStatus, ServiceError>) -> Self {
        Self { response }
    }
}

#[async_trait]
impl VerificationService for FixedVerificationService {
    async fn fetch_status(&self, _address: &str) -> Result<VerificationStatus, ServiceError> {
        self.response.clone()
    }
}

/// Always resolves to the same country, or always fails.
#[derive(Debug, Clone)]
pub struct FixedLocaleResolver {
    response: Result<String, ServiceError>,
}

impl FixedLocaleResolver {
    pub fn country(code: impl Into<String>) -> Self {
        Self {
            response: Ok(code.into()),
        }
    }

    pub fn failing(error: ServiceError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[async_trait]
impl LocaleResolver for FixedLocaleResolver {
    async fn country_code(&self) -> Result<String, ServiceError> {
        self.response.clone()
    }
}
