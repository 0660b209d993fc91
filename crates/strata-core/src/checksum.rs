//! SHA-256 checksum utility for migration drift detection.

use sha2::{Digest, Sha256};

/// Compute SHA256 checksum of a string
pub fn compute_checksum(s: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(s.as_bytes());
    let result = hasher.finalize();
    format!("{:x}", result)
}

/// Checksum of a migration: the up script followed by the down script.
///
/// A missing side hashes as the empty string.
pub fn migration_checksum(up: Option<&str>, down: Option<&str>) -> String {
    let mut combined = String::with_capacity(
        up.map_or(0, str::len) + down.map_or(0, str::len),
    );
    combined.push_str(up.unwrap_or(""));
    combined.push_str(down.unwrap_or(""));
    compute_checksum(&combined)
}
