//! Account services: balance, enquiries, statements, and express account
//! opening.

use http::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ecobank_types::timestamp::{Date, Timestamp};

use crate::client::{ApiResponse, Client, ClientError};
use crate::secure_hash::{HashField, SignedRequest};

/// Routing metadata the host echoes back on most account payloads.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostHeaderInfo {
    pub source_code: String,
    pub request_id: String,
    pub affiliate_code: String,
    pub response_code: String,
    pub response_message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalanceRequest {
    pub request_id: String,
    pub affiliate_code: String,
    pub account_no: String,
    pub client_id: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for AccountBalanceRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.account_no.append_to(buf);
        self.client_id.append_to(buf);
        self.company_name.append_to(buf);
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
pub struct AccountBalance {
    pub host_header_info: HostHeaderInfo,
    pub account_no: String,
    pub response_code: String,
    pub response_message: String,
    pub account_name: String,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub branch_code: String,
    #[serde(rename = "customerID")]
    pub customer_id: String,
    pub available_balance: Decimal,
    pub current_balance: Decimal,
    #[serde(rename = "odlimit")]
    pub overdraft_limit: Decimal,
    pub account_type: String,
    pub account_class: String,
    pub account_status: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountEnquiryRequest {
    pub request_id: String,
    pub affiliate_code: String,
    pub account_no: String,
    pub client_id: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for AccountEnquiryRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.account_no.append_to(buf);
        self.client_id.append_to(buf);
        self.company_name.append_to(buf);
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
pub struct AccountEnquiry {
    pub account_no: String,
    pub account_name: String,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub account_status: String,
    pub response_code: String,
    pub response_message: String,
    pub affiliate_code: String,
    pub request_id: String,
    pub source_code: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThirdPartyEnquiryRequest {
    pub request_id: String,
    pub affiliate_code: String,
    pub account_no: String,
    pub destination_bank_code: String,
    pub client_id: String,
    pub company_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for ThirdPartyEnquiryRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.account_no.append_to(buf);
        self.destination_bank_code.append_to(buf);
        self.client_id.append_to(buf);
        self.company_name.append_to(buf);
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
pub struct ThirdPartyEnquiry {
    pub account_name: String,
    pub account_type: String,
    pub account_status: String,
    pub host_header_info: HostHeaderInfo,
}

/// One statement line.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementTransaction {
    #[serde(rename = "acccy")]
    pub account_currency: String,
    #[serde(rename = "drcrind")]
    pub debit_credit: String,
    #[serde(rename = "trnrefno")]
    pub ref_number: String,
    #[serde(rename = "paidin", default)]
    pub paid_in: Option<String>,
    #[serde(rename = "paidout", default)]
    pub paid_out: Option<String>,
    #[serde(rename = "valuedate")]
    pub value_date: Timestamp,
    #[serde(rename = "lcyamount1")]
    pub amount: String,
    pub narrative: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementRequest {
    pub corporate_id: String,
    pub request_id: String,
    pub client_id: String,
    pub affiliate_code: String,
    pub account_number: String,
    pub start_date: Date,
    pub end_date: Date,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for StatementRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.corporate_id.append_to(buf);
        self.request_id.append_to(buf);
        self.client_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.account_number.append_to(buf);
        self.start_date.append_to(buf);
        self.end_date.append_to(buf);
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
pub struct CreateExpressAccountRequest {
    pub client_id: String,
    pub request_id: String,
    pub affiliate_code: String,
    pub first_name: String,
    #[serde(rename = "middlename")]
    pub middle_name: String,
    #[serde(rename = "lastname")]
    pub last_name: String,
    pub mobile_no: String,
    pub gender: String,
    pub identity_no: String,
    pub identity_type: String,
    #[serde(rename = "iDIssueDate")]
    pub id_issue_date: String,
    #[serde(rename = "iDExpiryDate")]
    pub id_expiry_date: String,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub country: String,
    pub branch_code: String,
    pub date_of_birth: String,
    pub country_of_residence: String,
    pub email: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub image: String,
    pub signature: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for CreateExpressAccountRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.client_id.append_to(buf);
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.first_name.append_to(buf);
        self.middle_name.append_to(buf);
        self.last_name.append_to(buf);
        self.mobile_no.append_to(buf);
        self.gender.append_to(buf);
        self.identity_no.append_to(buf);
        self.identity_type.append_to(buf);
        self.id_issue_date.append_to(buf);
        self.id_expiry_date.append_to(buf);
        self.currency.append_to(buf);
        self.country.append_to(buf);
        self.branch_code.append_to(buf);
        self.date_of_birth.append_to(buf);
        self.country_of_residence.append_to(buf);
        self.email.append_to(buf);
        self.street.append_to(buf);
        self.city.append_to(buf);
        self.state.append_to(buf);
        self.image.append_to(buf);
        self.signature.append_to(buf);
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
pub struct CreateExpressAccountResponse {
    #[serde(rename = "shortname")]
    pub short_name: String,
    pub account_no: String,
    pub mobile_no: String,
    pub track_ref: String,
    pub client_id: String,
    pub host_header_info: HostHeaderInfo,
}

/// Account endpoints, borrowed from a [`Client`] via [`Client::account`].
pub struct AccountService<'a> {
    pub(crate) client: &'a Client,
}

impl AccountService<'_> {
    /// Current and available balance of an account.
    pub async fn balance(
        &self,
        opts: AccountBalanceRequest,
    ) -> Result<(AccountBalance, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/accountbalance", opts)
            .await
    }

    /// Name, currency, and status of an account held with the bank.
    pub async fn enquiry(
        &self,
        opts: AccountEnquiryRequest,
    ) -> Result<(AccountEnquiry, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/accountinquiry", opts)
            .await
    }

    /// Account inquiry for third-party payments.
    pub async fn enquiry_third_party(
        &self,
        opts: ThirdPartyEnquiryRequest,
    ) -> Result<(ThirdPartyEnquiry, ApiResponse), ClientError> {
        // the upstream path really is spelled this way
        self.client
            .execute(Method::POST, "merchant/accountinquirythridpay", opts)
            .await
    }

    /// Account statement over an inclusive date range.
    pub async fn statement(
        &self,
        opts: StatementRequest,
    ) -> Result<(Vec<StatementTransaction>, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/statement", opts)
            .await
    }

    /// Opens an Xpress account.
    pub async fn create_express_account(
        &self,
        opts: CreateExpressAccountRequest,
    ) -> Result<(CreateExpressAccountResponse, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/createexpressaccount", opts)
            .await
    }
}
