//! End-to-end coverage of the public API.
//!
//! Every test that calls `init`/`set_rng` takes [`crate::config::lock_for_test`]
//! first: the library keeps one process-wide configuration, and `cargo test`
//! runs tests concurrently by default.

use crate::config::lock_for_test;
use crate::{
    combine, extract_share_components, get_config, init, new_share, random, set_rng, share, Error,
    RngSource,
};

fn det(seed: u8) -> RngSource {
    RngSource::deterministic([seed; 32])
}

#[test]
fn split_then_combine_round_trips_and_is_deterministic_under_a_fixed_seed() {
    let _guard = lock_for_test();

    init(Some(8), Some(det(1))).unwrap();
    let shares_first = share("abc123", 5, 3, None).unwrap();
    let recovered = combine(&shares_first[..3].to_vec()).unwrap();
    assert_eq!(recovered, "abc123");

    init(Some(8), Some(det(1))).unwrap();
    let shares_second = share("abc123", 5, 3, None).unwrap();
    assert_eq!(shares_first, shares_second, "same seed must reproduce the same shares");
}

// Leading zero nibbles of the secret survive the round trip, and shares for
// a zero-padded secret differ from shares for its unpadded form (the
// leading-one marker carries the distinction).
#[test]
fn leading_zero_nibbles_round_trip_and_distinguish_shares() {
    let _guard = lock_for_test();
    init(Some(8), Some(det(2))).unwrap();

    let padded_shares = share("00000001", 5, 3, None).unwrap();
    let unpadded_shares = share("1", 5, 3, None).unwrap();
    assert_ne!(padded_shares, unpadded_shares);

    assert_eq!(combine(&padded_shares[..3].to_vec()).unwrap(), "00000001");
    assert_eq!(combine(&unpadded_shares[..3].to_vec()).unwrap(), "1");
}

#[test]
fn combine_rejects_shares_from_different_field_sizes() {
    let _guard = lock_for_test();

    init(Some(8), Some(det(3))).unwrap();
    let shares8 = share("ab", 3, 2, None).unwrap();

    init(Some(10), Some(det(3))).unwrap();
    let shares10 = share("ab", 3, 2, None).unwrap();

    let mixed = vec![shares8[0].clone(), shares10[0].clone()];
    assert!(matches!(combine(&mixed), Err(Error::MixedFieldSizes)));
}

#[test]
fn extract_share_components_rejects_garbage_input() {
    let _guard = lock_for_test();
    init(Some(8), Some(det(4))).unwrap();
    assert!(extract_share_components("not a share").is_err());
}

#[test]
fn random_is_deterministic_under_the_deterministic_source_and_changes_with_a_fresh_secure_draw() {
    let _guard = lock_for_test();

    init(Some(8), Some(det(5))).unwrap();
    let a = random(64).unwrap();
    init(Some(8), Some(det(5))).unwrap();
    let b = random(64).unwrap();
    assert_eq!(a, b);

    init(Some(8), None).unwrap();
    let c = random(64).unwrap();
    // Astronomically unlikely to collide with a freshly seeded secure draw.
    assert_ne!(a, c);
}

#[test]
fn any_k_of_n_shares_reconstruct_the_secret_across_field_sizes_and_thresholds() {
    let _guard = lock_for_test();

    let cases: &[(u8, &str, u32, u32)] = &[
        (3, "1", 3, 2),
        (8, "deadbeef", 5, 3),
        (8, "00ff00ff00ff", 7, 4),
        (12, "abcdef0123456789", 6, 5),
        (16, "f0f0f0f0", 10, 6),
        (20, "aa", 4, 2),
    ];

    for &(bits, secret, n, k) in cases {
        init(Some(bits), Some(det(bits))).unwrap();
        let all_shares = share(secret, n, k, None).unwrap();

        // The first k shares.
        assert_eq!(combine(&all_shares[..k as usize].to_vec()).unwrap(), secret);
        // The last k shares.
        let tail: Vec<String> = all_shares[(n - k) as usize..].to_vec();
        assert_eq!(combine(&tail).unwrap(), secret);
        // Every share together.
        assert_eq!(combine(&all_shares).unwrap(), secret);
    }
}

// Fewer than k shares should not reconstruct the secret except with
// probability ~2^-bits. With bits=8 that is ~1/256; across 100 trials the
// expected number of accidental matches is well under 1, so a generous
// bound well above the 1% (one-match) guideline still catches a broken
// implementation that reconstructs every time.
#[test]
fn below_threshold_shares_rarely_reconstruct_the_secret() {
    let _guard = lock_for_test();
    init(Some(8), Some(det(42))).unwrap();

    let mut matches = 0;
    for i in 0u32..100 {
        let secret = format!("{:08x}", i);
        let all_shares = share(&secret, 5, 3, None).unwrap();
        let short = vec![all_shares[0].clone(), all_shares[1].clone()];
        if let Ok(recovered) = combine(&short) {
            if recovered == secret {
                matches += 1;
            }
        }
    }
    assert!(
        matches <= 10,
        "expected at most a handful of accidental matches out of 100, got {matches}"
    );
}

#[test]
fn new_share_rejects_ids_outside_the_field_and_accepts_every_id_inside_it() {
    let _guard = lock_for_test();
    init(Some(4), Some(det(6))).unwrap();
    let all_shares = share("a", 10, 3, None).unwrap();

    assert!(matches!(
        new_share(0, &all_shares[..3].to_vec()),
        Err(Error::InvalidShareId(0))
    ));
    let max = get_config().unwrap().max;
    assert!(matches!(
        new_share(max + 1, &all_shares[..3].to_vec()),
        Err(Error::InvalidShareId(_))
    ));

    for id in 1..=max {
        if all_shares.iter().any(|s| {
            extract_share_components(s).unwrap().id == id
        }) {
            continue;
        }
        assert!(new_share(id, &all_shares[..3].to_vec()).is_ok());
    }
}

#[test]
fn a_minted_share_is_interchangeable_with_an_original_one() {
    let _guard = lock_for_test();
    init(Some(8), Some(det(7))).unwrap();

    let all_shares = share("feedface", 5, 3, None).unwrap();
    let minted = new_share(9, &all_shares[..3].to_vec()).unwrap();

    let mut replacement: Vec<String> = all_shares[..2].to_vec();
    replacement.push(minted);
    assert_eq!(combine(&replacement).unwrap(), "feedface");
}

// For bits not a multiple of 4, the per-chunk bit stream doesn't land on a
// hex-nibble boundary, so a naive re-encode of a minted share can silently
// disagree with freshly split shares on how many chunks the data hex decodes
// into, which `combine` then rejects as mixed field sizes. bits=3 (and
// chained minting, to catch growth across repeated mints) is the sharpest
// case since 3 is the only supported field size below the 4-bit hex nibble
// width.
#[test]
fn new_share_is_stable_when_bits_is_not_a_multiple_of_four() {
    let _guard = lock_for_test();

    for bits in [3u8, 5, 6, 7, 9, 10, 11] {
        init(Some(bits), Some(det(bits))).unwrap();
        let max = get_config().unwrap().max;
        let n = max.min(6);
        let k = 3.min(n);
        let all_shares = share("a5", n, k, None).unwrap();

        let new_id = (1..=max)
            .find(|id| all_shares.iter().all(|s| extract_share_components(s).unwrap().id != *id))
            .expect("field has room for at least one more id");
        let minted = new_share(new_id, &all_shares[..k as usize].to_vec()).unwrap();

        let mut replacement: Vec<String> = all_shares[..(k as usize - 1)].to_vec();
        replacement.push(minted.clone());
        assert_eq!(
            combine(&replacement).unwrap(),
            "a5",
            "bits={bits}: combine with one minted share must recover the secret"
        );

        // Mint again from a set that already includes a minted share, to
        // make sure the chunk layout doesn't grow on repeated minting.
        let new_id2 = (1..=max)
            .find(|id| *id != new_id && all_shares.iter().all(|s| extract_share_components(s).unwrap().id != *id))
            .expect("field has room for a second new id");
        let mut source_for_second_mint = all_shares[..(k as usize - 1)].to_vec();
        source_for_second_mint.push(minted);
        let minted2 = new_share(new_id2, &source_for_second_mint).unwrap();

        let mut replacement2: Vec<String> = all_shares[..(k as usize - 1)].to_vec();
        replacement2.push(minted2);
        assert_eq!(
            combine(&replacement2).unwrap(),
            "a5",
            "bits={bits}: combine after a second mint must still recover the secret"
        );
    }
}

#[test]
fn field_arithmetic_identities_hold_for_every_nonzero_element() {
    use crate::field::{field_div, field_mul, generate_tables};

    for bits in crate::field::MIN_BITS..=12 {
        let tables = generate_tables(bits);
        let size = 1u32 << bits;
        for a in 1..size {
            let squared = field_mul(a, a, &tables);
            assert_eq!(field_div(squared, a, &tables, size).unwrap(), a);

            let log_a = tables.logs[a as usize].unwrap();
            let inverse = tables.exps[(size - 1 - log_a) as usize];
            assert_eq!(field_mul(a, inverse, &tables), 1);
        }
    }
}

#[test]
fn hex2bin_and_bin2hex_round_trip_on_well_formed_hex_strings() {
    use crate::codec::{bin2hex, hex2bin};

    for h in ["0", "ff", "deadBEEF", "00000001", "123456789abcdef0"] {
        let bin = hex2bin(h).unwrap();
        assert_eq!(bin2hex(&bin).unwrap(), h.to_lowercase());
    }
}

#[test]
fn init_required_before_any_other_call() {
    let _guard = lock_for_test();
    crate::config::clear_for_test();
    assert!(matches!(share("ab", 3, 2, None), Err(Error::NotInitialized)));
    assert!(matches!(random(8), Err(Error::NotInitialized)));
}
