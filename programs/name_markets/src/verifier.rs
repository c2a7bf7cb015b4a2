//! # Name Verifiers
//!
//! Each market validates token names with one of a fixed set of string
//! predicates. The predicate is stored on the market and can be swapped by
//! an administrative action.

use anchor_lang::prelude::*;

use crate::consts::MAX_NAME_LEN;

/// Capability shared by all verifiers
pub trait VerifyName {
    fn verify(&self, name: &str) -> bool;
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, InitSpace, Debug, Default)]
pub enum NameVerifier {
    /// Any printable name up to the maximum length
    #[default]
    Any,
    /// Lowercase DNS name such as `example.com`
    Domain,
    /// Social handle such as `@someone`
    Handle,
    /// Base58 CIDv0 content identifier (`Qm...`)
    ContentId,
}

impl VerifyName for NameVerifier {
    fn verify(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > MAX_NAME_LEN {
            return false;
        }
        match self {
            NameVerifier::Any => !name.chars().any(|c| c.is_control()),
            NameVerifier::Domain => is_domain(name),
            NameVerifier::Handle => is_handle(name),
            NameVerifier::ContentId => is_cid_v0(name),
        }
    }
}

fn is_domain(name: &str) -> bool {
    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let label_ok = |label: &str| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
    };

    let tld = labels[labels.len() - 1];
    labels.iter().all(|label| label_ok(label))
        && tld.len() >= 2
        && tld.bytes().all(|b| b.is_ascii_lowercase())
}

fn is_handle(name: &str) -> bool {
    match name.strip_prefix('@') {
        Some(handle) => {
            (1..=15).contains(&handle.len())
                && handle
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        }
        None => false,
    }
}

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

fn is_cid_v0(name: &str) -> bool {
    name.len() == 46
        && name.starts_with("Qm")
        && name.bytes().all(|b| BASE58_ALPHABET.contains(&b))
}
