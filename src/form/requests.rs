//! In-flight asynchronous requests issued by the form.
//!
//! Each request is created by a `begin_*` call on
//! [`TransactionForm`](crate::form::transaction::TransactionForm), fetched
//! without touching the form, and handed back to the matching `apply_*`
//! call, which drops it if a newer request of the same family exists.

use crate::constraints::bounds::AssetConstraint;
use crate::constraints::resolver::{ConstraintError, ConstraintResolver};
use crate::core::currency::{AssetCode, Network};
use crate::form::generation::Ticket;
use crate::services::{
    LocaleResolver, RateService, ServiceError, VerificationService, VerificationStatus,
};

/// Bounds lookup for the pegged asset.
#[derive(Debug, Clone)]
pub struct ConstraintRequest {
    pub(crate) ticket: Ticket,
    pub(crate) asset: AssetCode,
    pub(crate) network: Network,
    pub(crate) resolver: ConstraintResolver,
}

impl ConstraintRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn asset(&self) -> &AssetCode {
        &self.asset
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub async fn fetch(self, rates: &dyn RateService) -> ConstraintResponse {
        let result = self.resolver.resolve(&self.asset, &self.network, rates).await;
        ConstraintResponse {
            ticket: self.ticket,
            asset: self.asset,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstraintResponse {
    pub(crate) ticket: Ticket,
    pub asset: AssetCode,
    pub result: Result<AssetConstraint, ConstraintError>,
}

/// One-off lookup of the user's country.
#[derive(Debug, Clone)]
pub struct LocaleRequest {
    pub(crate) ticket: Ticket,
}

impl LocaleRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub async fn fetch(self, resolver: &dyn LocaleResolver) -> LocaleResponse {
        LocaleResponse {
            ticket: self.ticket,
            result: resolver.country_code().await,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocaleResponse {
    pub(crate) ticket: Ticket,
    pub result: Result<String, ServiceError>,
}

/// KYC status check for the active wallet address.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub(crate) ticket: Ticket,
    pub(crate) address: String,
}

impl VerificationRequest {
    pub fn ticket(&self) -> Ticket {
        self.ticket
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub async fn fetch(self, service: &dyn VerificationService) -> VerificationResponse {
        let result = service.fetch_status(&self.address).await;
        VerificationResponse {
            ticket: self.ticket,
            address: self.address,
            result,
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerificationResponse {
    pub(crate) ticket: Ticket,
    pub address: String,
    pub result: Result<VerificationStatus, ServiceError>,
}
