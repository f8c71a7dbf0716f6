//! Transaction and e-token status lookups.

use http::Method;
use serde::{Deserialize, Serialize};

use crate::client::{ApiResponse, Client, ClientError};
use crate::secure_hash::{HashField, SignedRequest};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransactionStatus {
    pub request_type: String,
    pub affiliate_code: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub status_code: String,
    pub status_reason: String,
    pub transaction_ref_no: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionStatusRequest {
    pub client_id: String,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for TransactionStatusRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.client_id.append_to(buf);
        self.request_id.append_to(buf);
    }

    fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    fn set_secure_hash(&mut self, hash: String) {
        self.secure_hash = Some(hash);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ETokenStatusRequest {
    pub request_id: String,
    pub affiliate_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for ETokenStatusRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
    }

    fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    fn set_secure_hash(&mut self, hash: String) {
        self.secure_hash = Some(hash);
    }
}

/// Status endpoints, borrowed from a [`Client`] via [`Client::status`].
pub struct StatusService<'a> {
    pub(crate) client: &'a Client,
}

impl StatusService<'_> {
    /// Status of a previously submitted transaction.
    pub async fn transaction_status(
        &self,
        opts: TransactionStatusRequest,
    ) -> Result<(TransactionStatus, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/txns/status", opts)
            .await
    }

    /// Status of an issued e-token. The payload is a bare string.
    pub async fn etoken_status(
        &self,
        opts: ETokenStatusRequest,
    ) -> Result<(String, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/etoken/status", opts)
            .await
    }
}
