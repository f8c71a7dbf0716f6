//! Cross-border remittance services backed by the Ecobank Africa rails.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ApiResponse, Client, ClientError};
use crate::secure_hash::{HashField, SignedRequest};
use crate::services::payment::PayRequest;

/// An affiliate allowed to participate in cross-border transactions.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Institution {
    pub institution_id: String,
    pub institution_type: String,
    pub institution_name: String,
    pub country_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListInstitutionsRequest {
    pub request_id: String,
    pub client_id: String,
    pub affiliate_code: String,
    pub destination_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for ListInstitutionsRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.client_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.destination_country.append_to(buf);
    }

    fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    fn set_secure_hash(&mut self, hash: String) {
        self.secure_hash = Some(hash);
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemitteeAccount {
    pub account_status: String,
    pub account_name: String,
    pub account_type: String,
    pub branch_code: String,
    pub account_no: String,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub affiliate_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemitteeAccountRequest {
    pub request_id: String,
    pub client_id: String,
    pub affiliate_code: String,
    pub delivery_method: String,
    pub destination_entity_code: String,
    pub account_no: String,
    pub destination_country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for RemitteeAccountRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.client_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.delivery_method.append_to(buf);
        self.destination_entity_code.append_to(buf);
        self.account_no.append_to(buf);
        self.destination_country.append_to(buf);
    }

    fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    fn set_secure_hash(&mut self, hash: String) {
        self.secure_hash = Some(hash);
    }
}

/// Remittance endpoints, borrowed from a [`Client`] via [`Client::remittance`].
pub struct RemittanceService<'a> {
    pub(crate) client: &'a Client,
}

impl RemittanceService<'_> {
    /// Affiliates that can receive cross-border transfers in the given
    /// destination country.
    pub async fn institutions(
        &self,
        opts: ListInstitutionsRequest,
    ) -> Result<(Vec<Institution>, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/ecobankafrica/institutions", opts)
            .await
    }

    /// Resolves the remittee's account details before sending funds.
    pub async fn remittee_account(
        &self,
        opts: RemitteeAccountRequest,
    ) -> Result<(RemitteeAccount, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/ecobankafrica/account/enquiry", opts)
            .await
    }

    /// Sends the remittance through the payment endpoint.
    pub async fn pay(&self, opts: PayRequest) -> Result<(String, ApiResponse), ClientError> {
        self.client.payment().pay(opts).await
    }
}
