//! Typed endpoint services. Each service borrows the [`Client`] and funnels
//! its calls through [`Client::execute`].
//!
//! [`Client`]: crate::client::Client
//! [`Client::execute`]: crate::client::Client::execute

pub mod account;
pub mod payment;
pub mod remittance;
pub mod status;

use crate::client::Client;

impl Client {
    /// Account balance, enquiry, and statement endpoints.
    pub fn account(&self) -> account::AccountService<'_> {
        account::AccountService { client: self }
    }

    /// Biller directory and payment endpoints.
    pub fn payment(&self) -> payment::PaymentService<'_> {
        payment::PaymentService { client: self }
    }

    /// Cross-border remittance endpoints.
    pub fn remittance(&self) -> remittance::RemittanceService<'_> {
        remittance::RemittanceService { client: self }
    }

    /// Transaction and e-token status endpoints.
    pub fn status(&self) -> status::StatusService<'_> {
        status::StatusService { client: self }
    }
}
