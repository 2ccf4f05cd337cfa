//! Entity signatures (SHA256, lowercase hex)
//!
//! Pure and deterministic. Applied once per entity after aggregation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::{Asset, Ip, Port};

/// How the asset's identifying fields are combined before hashing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureScheme {
    /// `sha256(host ++ comment ++ owner)`
    ///
    /// Field boundaries are not encoded: `("ab", "c", _)` and `("a", "bc", _)`
    /// sign identically. Matches signatures already stored by clients.
    #[default]
    Concatenated,
    /// `sha256(sha256(host) ++ sha256(comment) ++ sha256(owner))`
    FieldDigests,
}

/// Compute SHA256 of a string, hex-encoded
pub fn hash_string(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn asset_signature(scheme: SignatureScheme, host: &str, comment: &str, owner: &str) -> String {
    match scheme {
        SignatureScheme::Concatenated => {
            let mut hasher = Sha256::new();
            hasher.update(host.as_bytes());
            hasher.update(comment.as_bytes());
            hasher.update(owner.as_bytes());
            format!("{:x}", hasher.finalize())
        }
        SignatureScheme::FieldDigests => {
            let mut hasher = Sha256::new();
            for field in [host, comment, owner] {
                hasher.update(hash_string(field).as_bytes());
            }
            format!("{:x}", hasher.finalize())
        }
    }
}

pub fn ip_signature(address: &str) -> String {
    hash_string(address)
}

pub fn port_signature(port: i64) -> String {
    hash_string(&port.to_string())
}

/// Stamp the asset and every child with its signature
pub fn sign_asset(asset: &mut Asset, scheme: SignatureScheme) {
    asset.signature = asset_signature(scheme, &asset.host, &asset.comment, &asset.owner);

    for Ip { address, signature } in asset.ips.iter_mut() {
        *signature = ip_signature(address);
    }

    for Port { port, signature } in asset.ports.iter_mut() {
        *signature = port_signature(*port);
    }
}
