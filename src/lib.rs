//! Client for the Ecobank Corporate API.
//!
//! The crate wraps the bank's REST endpoints behind a [`Client`] that owns a
//! bearer-token session, signs every outbound payload with the affiliate's
//! lab key, and unwraps the host's response envelope into typed results.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use ecobank_rs::{Client, services::account::AccountBalanceRequest};
//!
//! let client = Client::new("username", "password", "lab-key")?;
//!
//! let (balance, meta) = client
//!     .account()
//!     .balance(AccountBalanceRequest {
//!         request_id: "14232436312".into(),
//!         affiliate_code: "EGH".into(),
//!         account_no: "1441000574000".into(),
//!         client_id: "ECO00184371123".into(),
//!         company_name: "ECOBANK TEST CO".into(),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! println!("{} {}", balance.available_balance, balance.currency);
//! println!("host said: {} ({})", meta.message, meta.code);
//! ```
//!
//! The client logs in lazily: the first call on an empty or expired session
//! posts the configured credentials to the token endpoint and swaps in a
//! fresh session. A pre-obtained token can be injected through
//! [`ClientBuilder::token`] instead.
//!
//! Request payloads implement [`SignedRequest`], which names the fields that
//! take part in the secure hash. The hash is filled in automatically before
//! dispatch unless the caller has already set one.

pub mod client;
pub mod retry;
pub mod secure_hash;
pub mod services;
pub mod session;

pub use client::{ApiResponse, BearerToken, Client, ClientBuilder, ClientError, do_request};
pub use retry::RetryPolicy;
pub use secure_hash::{HashField, SignedRequest, compute_secure_hash, ensure_secure_hash};
pub use session::Session;

pub use ecobank_types::envelope::{Envelope, EnvelopeError, ResponseMeta};
pub use ecobank_types::errors::ResponseErrors;
pub use ecobank_types::timestamp::{Date, Timestamp, register_timestamp_layout};
