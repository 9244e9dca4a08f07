//! Decoding of Subresource Integrity strings found in yarn v1 lockfiles.
//!
//! An integrity value is one or more whitespace-separated entries of the
//! form `<algorithm>-<base64 digest>`, e.g.
//! `sha1-Yq/BD+hDQMr/aTjC/jMIgGpOlm4= sha512-Aolwjd7H...==`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;

use crate::parser::types::AllowedHashes;

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Decodes an integrity value into lowercase hex digests keyed by algorithm.
///
/// Trailing `=` padding is ignored, so over- and under-padded digests still
/// decode. Entries without an algorithm prefix or with an invalid base64
/// digest are skipped.
///
/// ```
/// use lockscope::parser::yarn::decode_integrity;
///
/// let hashes = decode_integrity("sha1-AAAA");
/// assert_eq!(hashes["sha1"], vec!["000000".to_string()]);
/// ```
pub fn decode_integrity(value: &str) -> AllowedHashes {
    let mut hashes = AllowedHashes::new();

    for entry in value.split_whitespace() {
        let Some((algorithm, digest)) = entry.split_once('-') else {
            tracing::debug!("Skipping integrity entry without algorithm: {}", entry);
            continue;
        };

        match LENIENT.decode(digest.trim_end_matches('=')) {
            Ok(bytes) => hashes
                .entry(algorithm.to_string())
                .or_default()
                .push(hex::encode(bytes)),
            Err(e) => {
                tracing::debug!("Skipping undecodable {} digest: {}", algorithm, e);
            }
        }
    }

    hashes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_single_sha512() {
        let hashes = decode_integrity("sha512-/w==");
        assert_eq!(hashes.len(), 1);
        assert_eq!(hashes["sha512"], vec!["ff".to_string()]);
    }

    #[test]
    fn test_decode_excess_padding() {
        let hashes = decode_integrity("sha512-AAAA==");
        assert_eq!(hashes["sha512"], vec!["000000".to_string()]);
    }

    #[test]
    fn test_decode_missing_padding() {
        let hashes = decode_integrity("sha1-AAA sha512-/w");
        assert_eq!(hashes["sha1"], vec!["0000".to_string()]);
        assert_eq!(hashes["sha512"], vec!["ff".to_string()]);
    }

    #[test]
    fn test_decode_known_sha1() {
        // sha1 of the empty string.
        let hashes = decode_integrity("sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk=");
        assert_eq!(
            hashes["sha1"],
            vec!["da39a3ee5e6b4b0d3255bfef95601890afd80709".to_string()]
        );
    }

    #[test]
    fn test_decode_mixed_algorithms() {
        let hashes = decode_integrity("sha1-2jmj7l5rSw0yVb/vlWAYkK/YBwk= sha512-/w==");
        assert_eq!(hashes.len(), 2);
        assert_eq!(hashes["sha1"].len(), 1);
        assert_eq!(hashes["sha512"], vec!["ff".to_string()]);
    }

    #[test]
    fn test_decode_repeated_algorithm_keeps_order() {
        let hashes = decode_integrity("sha512-AQ== sha512-Ag==");
        assert_eq!(hashes["sha512"], vec!["01".to_string(), "02".to_string()]);
    }

    #[test]
    fn test_decode_skips_malformed_entries() {
        assert!(decode_integrity("").is_empty());
        assert!(decode_integrity("nodash").is_empty());
        assert!(decode_integrity("sha512-!!!not-base64!!!").is_empty());

        let hashes = decode_integrity("garbage sha512-/w==");
        assert_eq!(hashes.len(), 1);
    }
}
