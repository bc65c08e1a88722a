//! Secret strength validation
//!
//! Classifies the HMAC signing secret so startup can refuse weak or
//! well-known secrets outside development.

use crate::config::PLACEHOLDER_SECRET;

const MIN_SECRET_LENGTH: usize = 32; // 256 bits minimum for HS256
const RECOMMENDED_SECRET_LENGTH: usize = 64;

/// Secret strength classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretStrength {
    /// Weak or publicly known secret - REJECT outside development
    Weak,
    /// Acceptable secret - WARN
    Acceptable,
    /// Strong secret - OK
    Strong,
}

/// Classify an HS256 signing secret
///
/// **Criteria**:
/// - Never the shipped placeholder
/// - Minimum 32 bytes (256 bits), 64 recommended
/// - Shannon entropy > 4.0 bits/byte
/// - No obvious patterns (repeating characters, sequential runs)
pub fn validate_secret_strength(secret: &str) -> SecretStrength {
    if secret == PLACEHOLDER_SECRET {
        return SecretStrength::Weak;
    }

    let bytes = secret.as_bytes();
    if bytes.len() < MIN_SECRET_LENGTH {
        return SecretStrength::Weak;
    }

    let entropy = calculate_shannon_entropy(bytes);
    if entropy < 4.0 || has_obvious_patterns(bytes) {
        return SecretStrength::Weak;
    }

    if bytes.len() >= RECOMMENDED_SECRET_LENGTH && entropy >= 5.0 {
        SecretStrength::Strong
    } else {
        SecretStrength::Acceptable
    }
}

/// Shannon entropy in bits per byte (0-8 scale)
fn calculate_shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let mut freq = [0u32; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }

    let len = data.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Runs of 4+ identical bytes ("aaaa") or ascending bytes ("1234")
fn has_obvious_patterns(data: &[u8]) -> bool {
    let mut same_run = 1;
    let mut seq_run = 1;

    for window in data.windows(2) {
        same_run = if window[0] == window[1] { same_run + 1 } else { 1 };
        seq_run = if window[1] as i16 - window[0] as i16 == 1 {
            seq_run + 1
        } else {
            1
        };

        if same_run >= 4 || seq_run >= 4 {
            return true;
        }
    }

    false
}
