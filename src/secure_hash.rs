//! Request integrity signing.
//!
//! Most request bodies carry a `secureHash` field: a SHA-512 digest over the
//! canonical string forms of selected request fields, concatenated in
//! declaration order with no separators, followed by the lab key. The server
//! recomputes the digest to verify the body was not tampered with.
//!
//! Field selection is expressed per request type through [`SignedRequest`]:
//! each request appends exactly the fields the server hashes, in order.
//! Fields excluded from hashing (and fields that never serialize, including
//! the `secureHash` field itself) are simply never appended. A request whose
//! hash is defined by a nested payment header delegates its whole
//! accumulation to that substructure, so sibling fields of the outer record
//! contribute nothing.

use ecobank_types::timestamp::{Date, Timestamp};
use rust_decimal::Decimal;
use sha2::{Digest, Sha512};

/// A value with a canonical string form usable as hash input.
///
/// The set of implementations is closed over the scalar types the wire
/// actually carries; a request field of any other type fails to compile
/// rather than silently contributing an empty string to the digest.
pub trait HashField {
    /// Appends the canonical form to the accumulator.
    fn append_to(&self, out: &mut String);
}

impl HashField for str {
    fn append_to(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl HashField for String {
    fn append_to(&self, out: &mut String) {
        out.push_str(self);
    }
}

impl HashField for bool {
    fn append_to(&self, out: &mut String) {
        out.push_str(if *self { "true" } else { "false" });
    }
}

// Integers render base-10 with no leading zeros, sign preserved.
macro_rules! int_hash_field {
    ($($ty:ty),*) => {
        $(impl HashField for $ty {
            fn append_to(&self, out: &mut String) {
                out.push_str(&self.to_string());
            }
        })*
    };
}

int_hash_field!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl HashField for Decimal {
    /// Minimal fixed-point form: trailing zeros stripped, never exponent
    /// notation.
    fn append_to(&self, out: &mut String) {
        out.push_str(&self.normalize().to_string());
    }
}

impl HashField for [u8] {
    /// Byte blobs contribute their raw text.
    fn append_to(&self, out: &mut String) {
        out.push_str(&String::from_utf8_lossy(self));
    }
}

impl HashField for Timestamp {
    fn append_to(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl HashField for Date {
    fn append_to(&self, out: &mut String) {
        out.push_str(&self.to_string());
    }
}

impl<T: HashField + ?Sized> HashField for &T {
    fn append_to(&self, out: &mut String) {
        (*self).append_to(out);
    }
}

/// An absent optional field contributes nothing.
impl<T: HashField> HashField for Option<T> {
    fn append_to(&self, out: &mut String) {
        if let Some(value) = self {
            value.append_to(out);
        }
    }
}

/// A request body that participates in secure-hash signing.
pub trait SignedRequest {
    /// Appends the canonical forms of the hashed fields, in wire declaration
    /// order, with no separators.
    fn append_hash_fields(&self, buf: &mut String);

    /// The currently installed hash, if any.
    fn secure_hash(&self) -> Option<&str>;

    /// Installs a computed hash.
    fn set_secure_hash(&mut self, hash: String);
}

/// Computes the hex digest for a request: selected fields, then the lab key,
/// SHA-512 over the UTF-8 bytes, lowercase hex.
///
/// A request with zero eligible fields hashes the lab key alone.
pub fn compute_secure_hash<R>(request: &R, lab_key: &str) -> String
where
    R: SignedRequest + ?Sized,
{
    let mut buf = String::new();
    request.append_hash_fields(&mut buf);
    digest(&buf, lab_key)
}

/// Installs the computed hash only when none is set. A pre-supplied hash
/// always takes precedence and is never recomputed.
pub fn ensure_secure_hash<R>(request: &mut R, lab_key: &str)
where
    R: SignedRequest + ?Sized,
{
    if request.secure_hash().is_none_or(str::is_empty) {
        let hash = compute_secure_hash(request, lab_key);
        request.set_secure_hash(hash);
    }
}

fn digest(data: &str, lab_key: &str) -> String {
    let mut hasher = Sha512::new();
    hasher.update(data.as_bytes());
    hasher.update(lab_key.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    struct Header {
        amount: String,
        currency: String,
        beneficiary: String,
        reference: String,
        // internal note, hash-excluded and never serialized
        #[allow(dead_code)]
        note: String,
        secure_hash: Option<String>,
    }

    impl SignedRequest for Header {
        fn append_hash_fields(&self, buf: &mut String) {
            self.amount.append_to(buf);
            self.currency.append_to(buf);
            self.beneficiary.append_to(buf);
            self.reference.append_to(buf);
        }

        fn secure_hash(&self) -> Option<&str> {
            self.secure_hash.as_deref()
        }

        fn set_secure_hash(&mut self, hash: String) {
            self.secure_hash = Some(hash);
        }
    }

    struct Outer {
        #[allow(dead_code)]
        request_id: String,
        header: Header,
    }

    impl SignedRequest for Outer {
        fn append_hash_fields(&self, buf: &mut String) {
            // hash is defined by the payment header alone
            self.header.append_hash_fields(buf);
        }

        fn secure_hash(&self) -> Option<&str> {
            self.header.secure_hash()
        }

        fn set_secure_hash(&mut self, hash: String) {
            self.header.set_secure_hash(hash);
        }
    }

    #[derive(Default)]
    struct Flat {
        request_id: String,
        affiliate_code: String,
        other: String,
        secure_hash: Option<String>,
    }

    impl SignedRequest for Flat {
        fn append_hash_fields(&self, buf: &mut String) {
            self.request_id.append_to(buf);
            self.affiliate_code.append_to(buf);
            self.other.append_to(buf);
        }

        fn secure_hash(&self) -> Option<&str> {
            self.secure_hash.as_deref()
        }

        fn set_secure_hash(&mut self, hash: String) {
            self.secure_hash = Some(hash);
        }
    }

    fn sample_header() -> Header {
        Header {
            amount: "100.00".into(),
            currency: "USD".into(),
            beneficiary: "Test Beneficiary".into(),
            reference: "REF456".into(),
            note: "ignore-me".into(),
            secure_hash: None,
        }
    }

    #[test]
    fn digest_is_sha512_of_data_plus_key() {
        use sha2::{Digest, Sha512};
        let expected = hex::encode(Sha512::digest(b"testDatatestKey"));
        assert_eq!(digest("testData", "testKey"), expected);
        assert_eq!(expected.len(), 128);
    }

    #[test]
    fn flat_request_concatenates_fields_in_order() {
        let flat = Flat {
            request_id: "REQ123".into(),
            affiliate_code: "AFF".into(),
            other: "other-value".into(),
            secure_hash: None,
        };
        assert_eq!(
            compute_secure_hash(&flat, "testKey"),
            digest("REQ123AFFother-value", "testKey")
        );
    }

    #[test]
    fn header_delegation_ignores_outer_fields() {
        let outer = Outer {
            request_id: "REQ123".into(),
            header: sample_header(),
        };
        assert_eq!(
            compute_secure_hash(&outer, "testKey"),
            digest("100.00USDTest BeneficiaryREF456", "testKey")
        );
        // identical to hashing the header alone
        assert_eq!(
            compute_secure_hash(&outer, "testKey"),
            compute_secure_hash(&outer.header, "testKey")
        );
    }

    #[test]
    fn zero_eligible_fields_hashes_key_alone() {
        let empty = Flat::default();
        assert_eq!(compute_secure_hash(&empty, "testKey"), digest("", "testKey"));
    }

    #[test]
    fn hash_is_deterministic() {
        let flat = Flat {
            request_id: "a".into(),
            affiliate_code: "b".into(),
            other: "c".into(),
            secure_hash: None,
        };
        assert_eq!(
            compute_secure_hash(&flat, "k"),
            compute_secure_hash(&flat, "k")
        );
    }

    #[test]
    fn ensure_does_not_overwrite_a_supplied_hash() {
        let mut flat = Flat {
            secure_hash: Some("fixture-hash".into()),
            ..Flat::default()
        };
        ensure_secure_hash(&mut flat, "k");
        assert_eq!(flat.secure_hash(), Some("fixture-hash"));
    }

    #[test]
    fn ensure_fills_an_empty_hash() {
        let mut flat = Flat {
            secure_hash: Some(String::new()),
            ..Flat::default()
        };
        ensure_secure_hash(&mut flat, "k");
        assert_eq!(flat.secure_hash(), Some(digest("", "k").as_str()));
    }

    #[test]
    fn scalar_canonical_forms() {
        let mut out = String::new();
        true.append_to(&mut out);
        false.append_to(&mut out);
        (-42i64).append_to(&mut out);
        7u8.append_to(&mut out);
        Decimal::from_str("1.2300").unwrap().append_to(&mut out);
        Decimal::from_str("100.00").unwrap().append_to(&mut out);
        b"raw".as_slice().append_to(&mut out);
        None::<String>.append_to(&mut out);
        Some("tail".to_string()).append_to(&mut out);
        assert_eq!(out, "truefalse-4271.23100rawtail");
    }
}
