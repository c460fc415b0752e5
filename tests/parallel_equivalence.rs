#![cfg(feature = "parallel")]


use _fixtures::{
    BILATERAL, CORRUPTED_SEGMENT, COUNTER, DRIFTER, HALTING_COUNTER, TRANSLATED, TWIN_COUNTER,
    UNILATERAL, ZERO_COUNT,
};
use bouncer_verifier::certificate::{BouncerType, Certificate};
use bouncer_verifier::config::VerifierConfig;
use bouncer_verifier::machine::Machine;
use bouncer_verifier::utils::{set_parallelism, verify_batch};

fn jobs(copies: usize) -> Vec<(Machine, Certificate)> {
    let mut bell = UNILATERAL.clone();
    bell.header.bouncer_type = BouncerType::Bell;
    let base = [
        (COUNTER.clone(), UNILATERAL.clone()),
        (TWIN_COUNTER.clone(), BILATERAL.clone()),
        (DRIFTER.clone(), TRANSLATED.clone()),
        (COUNTER.clone(), CORRUPTED_SEGMENT.clone()),
        (HALTING_COUNTER.clone(), UNILATERAL.clone()),
        (COUNTER.clone(), ZERO_COUNT.clone()),
        (COUNTER.clone(), bell),
    ];
    (0..copies)
        .flat_map(|copy| {
            base.iter().cloned().map(move |(machine, mut certificate)| {
                certificate.header.machine_id += 1000 * copy as u32;
                (machine, certificate)
            })
        })
        .collect()
}

#[test]
fn batch_parallel_matches_sequential() {
    let jobs = jobs(9);
    let config = VerifierConfig::default();
    let baseline = {
        let _guard = set_parallelism(false);
        verify_batch(&jobs, &config)
    };
    let parallel = verify_batch(&jobs, &config);
    assert_eq!(baseline, parallel);

    let stats = &parallel.stats;
    assert_eq!(stats.verified, 27);
    assert_eq!(stats.rejected, 27);
    assert_eq!(stats.skipped, 9);
    assert_eq!(stats.double, 9);
    assert_eq!(stats.min_steps.map(|e| (e.value, e.machine_id)), Some((7, 101)));
    assert_eq!(stats.max_steps.map(|e| (e.value, e.machine_id)), Some((25, 303)));
}

#[test]
fn empty_batch_is_empty_either_way() {
    let config = VerifierConfig::default();
    let baseline = {
        let _guard = set_parallelism(false);
        verify_batch::<Machine>(&[], &config)
    };
    let parallel = verify_batch::<Machine>(&[], &config);
    assert_eq!(baseline, parallel);
    assert!(parallel.outcomes.is_empty());
}
