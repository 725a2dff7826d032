use data_encoding::BASE32_NOPAD;
use sha2::{Digest, Sha256};

/// Derive the registration id from the marshalled endorsement key.
///
/// The id is the base32 (RFC 4648) encoding of `SHA256(endorsement_key)`,
/// lowercased and without padding.
pub fn registration_id_from_endorsement_key(endorsement_key: &[u8]) -> String {
    let digest = Sha256::digest(endorsement_key);
    BASE32_NOPAD.encode(&digest).to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registration_id_known_values() {
        assert_eq!(
            registration_id_from_endorsement_key(&[]),
            "4oymiquy7qobjgx36tejs35zeqt24qpemsnzgtfeswmrw6csxbkq"
        );
        assert_eq!(
            registration_id_from_endorsement_key(&[0, 1, 2, 3]),
            "avhn5qoqeepwet7nbs6ktvhziafq4si4in2cv4wfwcv6x4gjsdma"
        );
    }

    #[test]
    fn test_registration_id_charset() {
        let id = registration_id_from_endorsement_key(b"endorsement key");
        // 32 bytes of digest, 5 bits per character
        assert_eq!(id.len(), 52);
        assert!(id
            .chars()
            .all(|c| c.is_ascii_lowercase() || ('2'..='7').contains(&c)));
    }
}
