//! Property-based tests for name generation and address selection.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use droplet_deploy::domain::naming::{SUFFIX_ALPHABET, SUFFIX_LEN, droplet_name, random_suffix};
use droplet_deploy::domain::{DeployConfig, Droplet};

fn droplet_with(v4: &[(String, bool)]) -> Droplet {
    let v4: Vec<_> = v4
        .iter()
        .map(|(ip, public)| {
            serde_json::json!({
                "ip_address": ip,
                "type": if *public { "public" } else { "private" },
            })
        })
        .collect();
    serde_json::from_value(serde_json::json!({
        "id": 1,
        "locked": false,
        "networks": { "v4": v4 },
    }))
    .expect("droplet json")
}

fn ipv4() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>(), any::<u8>())
        .prop_map(|(a, b, c, d)| format!("{a}.{b}.{c}.{d}"))
}

proptest! {
    /// Every suffix has the requested length and only alphabet characters.
    #[test]
    fn prop_suffix_uses_alphabet(seed in any::<u64>(), len in 0usize..64) {
        let suffix = random_suffix(&mut StdRng::seed_from_u64(seed), len);
        prop_assert_eq!(suffix.len(), len);
        prop_assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)), "bad suffix: {}", suffix);
    }

    /// Names keep the prefix verbatim and append exactly `SUFFIX_LEN` characters.
    #[test]
    fn prop_name_is_prefix_plus_suffix(seed in any::<u64>(), prefix in "[a-z0-9-]{0,40}") {
        let name = droplet_name(&prefix, &mut StdRng::seed_from_u64(seed));
        let suffix = name.strip_prefix(prefix.as_str()).expect("prefix kept");
        prop_assert_eq!(suffix.len(), SUFFIX_LEN);
        prop_assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    /// The first public address wins; without one, the first address of any type.
    #[test]
    fn prop_first_ipv4_prefers_public(
        entries in proptest::collection::vec((ipv4(), any::<bool>()), 1..6),
    ) {
        let droplet = droplet_with(&entries);
        let expected = entries
            .iter()
            .find(|(_, public)| *public)
            .unwrap_or(&entries[0])
            .0
            .clone();
        prop_assert_eq!(droplet.first_ipv4().expect("address"), expected.as_str());
    }

    /// Zero attempt limits never validate.
    #[test]
    fn prop_zero_limits_rejected(poll_zero in any::<bool>(), interval in 1u64..600) {
        let mut config = DeployConfig::default();
        config.poll.interval_secs = interval;
        if poll_zero {
            config.poll.max_attempts = 0;
        } else {
            config.ssh.attempt_limit = 0;
        }
        prop_assert!(config.validate().is_err());
    }
}

#[test]
fn unlocked_droplet_without_addresses_has_no_ipv4() {
    assert!(droplet_with(&[]).first_ipv4().is_err());
}
