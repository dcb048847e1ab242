//! Property tests for webhook body signing

use proptest::prelude::*;

use dynamik_webhook::dispatch::{sign, verify};

proptest! {
    #[test]
    fn signature_round_trips(
        body in proptest::collection::vec(any::<u8>(), 0..512),
        secret in "[A-Za-z0-9_-]{1,64}",
    ) {
        let sig = sign(&body, &secret);
        prop_assert!(verify(&body, &sig, &secret));
    }

    #[test]
    fn any_body_mutation_invalidates(
        body in proptest::collection::vec(any::<u8>(), 1..512),
        index in any::<prop::sample::Index>(),
        flip in 1u8..=255,
    ) {
        let sig = sign(&body, "secret");

        let mut mutated = body.clone();
        let i = index.index(mutated.len());
        mutated[i] ^= flip;

        prop_assert!(!verify(&mutated, &sig, "secret"));
    }

    #[test]
    fn different_secret_invalidates(
        body in proptest::collection::vec(any::<u8>(), 0..512),
        secret in "[A-Za-z0-9]{1,32}",
        other in "[A-Za-z0-9]{1,32}",
    ) {
        prop_assume!(secret != other);
        let sig = sign(&body, &secret);
        prop_assert!(!verify(&body, &sig, &other));
    }
}
