//! Payment services: biller directory, biller validation, and the batch
//! payment endpoint.

use http::Method;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::{json::JsonString, serde_as};

use ecobank_types::timestamp::Timestamp;

use crate::client::{ApiResponse, Client, ClientError};
use crate::secure_hash::{HashField, SignedRequest};
use crate::services::account::HostHeaderInfo;

/// Payment category understood by the batch payment endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentType {
    #[serde(rename = "BILLPAYMENT")]
    BillPayment,
    #[serde(rename = "TOKEN")]
    Token,
    #[serde(rename = "DOMESTIC")]
    Domestic,
    #[serde(rename = "INTERBANK")]
    Interbank,
    // upstream spelling
    #[serde(rename = "INTEBBANKIA")]
    InterbankIa,
    #[serde(rename = "AIRTIMETOPUP")]
    AirtimeTopup,
    #[serde(rename = "MOMO")]
    Momo,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillerListRequest {
    pub request_id: String,
    pub affiliate_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for BillerListRequest {
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

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillerInfo {
    pub biller_code: String,
    #[serde(rename = "billerID")]
    pub biller_id: i64,
    pub biller_name: String,
    pub biller_description: String,
    pub biller_category: Option<String>,
    pub biller_logo: Option<String>,
    pub bill_amount_type: String,
    pub bill_amount: Decimal,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub collection_account_no: String,
    pub aggregator_name: String,
    pub amount_denominations: Option<String>,
    pub product_code_list: Option<String>,
}

/// Routing metadata variant whose `responseCode` is numeric on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillerHostHeaderInfo {
    pub source_code: String,
    pub request_id: String,
    pub affiliate_code: String,
    pub response_code: i32,
    pub response_message: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillerList {
    pub biller_info: Vec<BillerInfo>,
    pub host_header_info: BillerHostHeaderInfo,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillerDetailsRequest {
    pub request_id: String,
    pub affiliate_code: String,
    pub biller_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for BillerDetailsRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.biller_code.append_to(buf);
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
pub struct BillerDetail {
    pub biller_code: String,
    #[serde(rename = "billerID")]
    pub biller_id: i64,
    pub biller_name: String,
    pub biller_description: String,
    pub biller_category: Option<String>,
    pub biller_email: Option<String>,
    pub biller_phone: Option<String>,
    pub biller_site: Option<String>,
    pub biller_logo: Option<String>,
    pub bill_amount_type: String,
    pub bill_amount: Decimal,
    pub collection_account_no: String,
    pub collection_account_name: String,
    pub collection_account_bank_code: String,
    pub aggregator_name: String,
    pub validation_required: String,
    pub product_list: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillFormData {
    pub serial_no: i32,
    pub field_name: String,
    pub field_title: String,
    pub data_type: String,
    pub validate_field: String,
    pub default_value: String,
    pub max_field_length: i32,
    #[serde(rename = "listofValues")]
    pub list_of_values: Option<String>,
    pub lookup_value: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillerProductInfo {
    pub product_code: String,
    pub product_name: String,
    pub product_description: String,
    pub product_category: String,
    pub amount_type: String,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
    #[serde(rename = "ccy")]
    pub currency: String,
    #[serde(rename = "exchRate")]
    pub exchange_rate: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BillerDetails {
    #[serde(rename = "billerDetail")]
    pub biller_detail: BillerDetail,
    pub bill_form_data: Vec<BillFormData>,
    pub biller_product_info: Vec<BillerProductInfo>,
    pub host_header_info: HostHeaderInfo,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDataValue {
    pub field_name: String,
    pub field_value: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateBillerRequest {
    pub request_id: String,
    pub affiliate_code: String,
    pub biller_code: String,
    pub product_code: String,
    // upstream wire name
    #[serde(rename = "mobileNnumber")]
    pub mobile_number: String,
    pub customer_name: String,
    pub form_data_value: Vec<FormDataValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for ValidateBillerRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        self.request_id.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.biller_code.append_to(buf);
        self.product_code.append_to(buf);
        self.mobile_number.append_to(buf);
        self.customer_name.append_to(buf);
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
pub struct ValidatedFormField {
    pub field_name: String,
    pub field_description: String,
    pub field_masked: String,
    pub field_value: String,
    pub field_required: String,
    pub data_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ValidateBillerResponse {
    pub host_header_info: BillerHostHeaderInfo,
    pub biller_code: String,
    pub bill_ref_no: String,
    pub customer_name: String,
    pub amount: Decimal,
    pub payment_description: String,
    pub product_code: String,
    pub response_values: Option<String>,
    pub form_data_value: Vec<ValidatedFormField>,
}

/// Batch-level payload hashed on behalf of the whole payment request.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentHeader {
    pub batchsequence: String,
    pub batchamount: Decimal,
    pub transactionamount: Decimal,
    pub batchid: String,
    pub transactioncount: i32,
    pub batchcount: i32,
    pub transactionid: String,
    pub debittype: String,
    #[serde(rename = "affiliateCode")]
    pub affiliate_code: String,
    pub totalbatches: String,
    pub execution_date: Timestamp,
    pub clientid: String,
}

impl PaymentHeader {
    fn append_hash_fields(&self, buf: &mut String) {
        self.batchsequence.append_to(buf);
        self.batchamount.append_to(buf);
        self.transactionamount.append_to(buf);
        self.batchid.append_to(buf);
        self.transactioncount.append_to(buf);
        self.batchcount.append_to(buf);
        self.transactionid.append_to(buf);
        self.debittype.append_to(buf);
        self.affiliate_code.append_to(buf);
        self.totalbatches.append_to(buf);
        self.execution_date.append_to(buf);
        self.clientid.append_to(buf);
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillPaymentParams {
    pub biller_code: String,
    pub bill_ref_no: String,
    pub cba_ref_no: String,
    pub customer_name: String,
    pub customer_ref_no: String,
    pub product_code: String,
    pub form_data_value: Vec<FormDataValue>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenParams {
    pub transaction_description: String,
    pub secret_code: String,
    pub source_account: String,
    pub source_account_currency: String,
    pub source_account_type: String,
    pub sender_name: String,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub sender_mobile_no: String,
    pub amount: Decimal,
    pub sender_id: String,
    pub beneficiary_name: String,
    pub beneficiary_mobile_no: String,
    pub withdrawal_channel: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomesticParams {
    pub credit_account_no: String,
    pub debit_account_branch: String,
    pub debit_account_type: String,
    pub credit_account_branch: String,
    pub credit_account_type: String,
    pub amount: Decimal,
    #[serde(rename = "ccy")]
    pub currency: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterbankParams {
    pub destination_bank_code: String,
    pub sender_name: String,
    pub sender_address: String,
    pub sender_phone: String,
    pub beneficiary_account_no: String,
    pub beneficiary_name: String,
    pub beneficiary_phone: String,
    pub transfer_reference_no: String,
    pub amount: Decimal,
    #[serde(rename = "ccy")]
    pub currency: String,
    pub transfer_type: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirtimeTopupParams {
    pub biller_code: String,
    pub bill_ref_no: String,
    pub cba_ref_no: String,
    pub customer_name: String,
    pub customer_ref_no: String,
    pub product_code: String,
    pub form_data_value: Vec<FormDataValue>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MomoParams {
    pub biller_code: String,
    pub bill_ref_no: String,
    pub cba_ref_no: String,
    pub customer_name: String,
    pub customer_ref_no: String,
    pub product_code: String,
    pub form_data_value: Vec<FormDataValue>,
}

/// Per-category payment parameters. The batch endpoint expects these as a
/// JSON document embedded in a string field, see [`PaymentExtension`].
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum PaymentParams {
    BillPayment(BillPaymentParams),
    Token(TokenParams),
    Domestic(DomesticParams),
    Interbank(InterbankParams),
    AirtimeTopup(AirtimeTopupParams),
    Momo(MomoParams),
}

impl From<BillPaymentParams> for PaymentParams {
    fn from(params: BillPaymentParams) -> Self {
        PaymentParams::BillPayment(params)
    }
}

impl From<TokenParams> for PaymentParams {
    fn from(params: TokenParams) -> Self {
        PaymentParams::Token(params)
    }
}

impl From<DomesticParams> for PaymentParams {
    fn from(params: DomesticParams) -> Self {
        PaymentParams::Domestic(params)
    }
}

impl From<InterbankParams> for PaymentParams {
    fn from(params: InterbankParams) -> Self {
        PaymentParams::Interbank(params)
    }
}

impl From<AirtimeTopupParams> for PaymentParams {
    fn from(params: AirtimeTopupParams) -> Self {
        PaymentParams::AirtimeTopup(params)
    }
}

impl From<MomoParams> for PaymentParams {
    fn from(params: MomoParams) -> Self {
        PaymentParams::Momo(params)
    }
}

/// One transaction within a payment batch.
#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct PaymentExtension {
    pub request_id: String,
    pub request_type: PaymentType,
    #[serde_as(as = "JsonString")]
    pub param_list: PaymentParams,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,
    pub rate_type: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayRequest {
    pub payment_header: PaymentHeader,
    pub extension: Vec<PaymentExtension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secure_hash: Option<String>,
}

impl SignedRequest for PayRequest {
    fn append_hash_fields(&self, buf: &mut String) {
        // the header signs for the whole request
        self.payment_header.append_hash_fields(buf);
    }

    fn secure_hash(&self) -> Option<&str> {
        self.secure_hash.as_deref()
    }

    fn set_secure_hash(&mut self, hash: String) {
        self.secure_hash = Some(hash);
    }
}

/// Payment endpoints, borrowed from a [`Client`] via [`Client::payment`].
pub struct PaymentService<'a> {
    pub(crate) client: &'a Client,
}

impl PaymentService<'_> {
    /// Directory of billers available to the affiliate.
    pub async fn biller_list(
        &self,
        opts: BillerListRequest,
    ) -> Result<(BillerList, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "payment/getbillerlist", opts)
            .await
    }

    /// Products and form fields of a single biller.
    pub async fn biller_details(
        &self,
        opts: BillerDetailsRequest,
    ) -> Result<(BillerDetails, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/getbillerdetails", opts)
            .await
    }

    /// Validates a bill reference against a biller before payment.
    pub async fn validate_biller(
        &self,
        opts: ValidateBillerRequest,
    ) -> Result<(ValidateBillerResponse, ApiResponse), ClientError> {
        self.client
            .execute(Method::POST, "merchant/validatebiller", opts)
            .await
    }

    /// Submits a payment batch. The payload returned by the host is a bare
    /// acknowledgement string.
    pub async fn pay(&self, opts: PayRequest) -> Result<(String, ApiResponse), ClientError> {
        self.client.execute(Method::POST, "merchant/payment", opts).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn momo_params() -> MomoParams {
        MomoParams {
            biller_code: "AIRTELTIGOEGH".into(),
            bill_ref_no: "2988759".into(),
            cba_ref_no: "05609".into(),
            customer_name: "Owen Kay".into(),
            customer_ref_no: "824225".into(),
            product_code: "AIRTELTIGO_MOBILEMONEY".into(),
            form_data_value: vec![FormDataValue {
                field_name: "BEN_PHONE_NO".into(),
                field_value: "0560000159".into(),
            }],
        }
    }

    #[test]
    fn topup_and_momo_share_the_bill_payment_wire_shape() {
        let topup = serde_json::to_value(AirtimeTopupParams {
            biller_code: "A02E".into(),
            bill_ref_no: "81729".into(),
            cba_ref_no: String::new(),
            customer_name: "Owen Kay".into(),
            customer_ref_no: "824225".into(),
            product_code: "A02E".into(),
            form_data_value: vec![],
        })
        .unwrap();
        let momo = serde_json::to_value(momo_params()).unwrap();

        let expected = [
            "billerCode",
            "billRefNo",
            "cbaRefNo",
            "customerName",
            "customerRefNo",
            "productCode",
            "formDataValue",
        ];
        for value in [&topup, &momo] {
            let keys = value.as_object().unwrap();
            assert_eq!(keys.len(), expected.len());
            for key in expected {
                assert!(keys.contains_key(key), "missing {key}");
            }
        }
    }

    #[test]
    fn param_list_embeds_json_as_a_string() {
        let extension = PaymentExtension {
            request_id: "1234BBY8SXZX".into(),
            request_type: PaymentType::Momo,
            param_list: momo_params().into(),
            amount: Decimal::new(150, 0),
            currency: "GHS".into(),
            status: String::new(),
            rate_type: "spot".into(),
        };
        let value = serde_json::to_value(&extension).unwrap();
        assert_eq!(value["request_type"], "MOMO");
        let embedded = value["param_list"].as_str().unwrap();
        let inner: serde_json::Value = serde_json::from_str(embedded).unwrap();
        assert_eq!(inner["billerCode"], "AIRTELTIGOEGH");
        assert_eq!(inner["customerRefNo"], "824225");
    }
}
