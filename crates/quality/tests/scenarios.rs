//! End-to-end scenarios and properties of the quality gate.

use contentgate_core::{CtaCategory, ItemRecord, KeywordStrategy, QaReport};
use contentgate_quality::{
    similarity, uniqueness_score, BasicQualityEngine, BruteForce, DuplicateStrategy, Hook,
    QaConfig, QualityEngine,
};
use proptest::prelude::*;

const VOCAB: [&str; 26] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa", "quebec", "romeo", "sierra", "tango",
    "uniform", "victor", "whiskey", "xray", "yankee", "zulu",
];

/// Six pseudo-random words; distinct seeds rarely share a near-duplicate.
fn generated_hook(seed: u32) -> String {
    let mut state = seed.wrapping_mul(2654435761).wrapping_add(12345);
    (0..6)
        .map(|_| {
            state = state.wrapping_mul(1103515245).wrapping_add(12345);
            VOCAB[(state >> 16) as usize % VOCAB.len()]
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn words(n: usize) -> String {
    vec!["word"; n].join(" ")
}

fn run(records: Vec<ItemRecord>, keywords: Option<&KeywordStrategy>) -> QaReport {
    BasicQualityEngine::default()
        .run_records(records, keywords)
        .unwrap()
}

#[test]
fn scenario_a_identical_hooks() {
    let records = vec![
        ItemRecord::new(0, "Stop chasing followers\nFirst body.\nShare this with a friend.")
            .with_platform("linkedin"),
        ItemRecord::new(1, "Stop chasing followers\nSecond body.\nFollow me for more.")
            .with_platform("linkedin"),
    ];
    let report = run(records, None);

    assert_eq!(report.duplicates.uniqueness_score, 0.0);
    assert_eq!(report.duplicates.pairs.len(), 1);
    let pair = &report.duplicates.pairs[0];
    assert_eq!((pair.index_a, pair.index_b), (0, 1));
    assert_eq!(pair.similarity, 1.0);
    assert!(!report.overall_pass);
}

#[test]
fn scenario_b_overused_question_cta() {
    let mut records: Vec<ItemRecord> = (0..29)
        .map(|i| {
            ItemRecord::new(i, format!("{}\nWhat's your take?", generated_hook(i as u32)))
                .with_platform("twitter")
        })
        .collect();
    records.push(
        ItemRecord::new(29, format!("{}\nShare this with a friend.", generated_hook(29)))
            .with_platform("twitter"),
    );
    let report = run(records, None);

    assert_eq!(report.cta.variety_threshold, 0.5);
    assert!(!report.cta.result.passed);
    assert_eq!(report.cta.overused, vec![CtaCategory::QuestionTake]);
    assert_eq!(report.cta.distribution[&CtaCategory::QuestionTake], 29);
    assert!(report
        .cta
        .result
        .issues
        .iter()
        .any(|issue| issue.message.contains("question_take")));
}

#[test]
fn scenario_c_long_form_item_in_optimal_range() {
    let records = vec![ItemRecord::new(0, words(2200)).with_platform("blog")];
    let report = run(records, None);

    assert!(report.length.result.passed);
    assert_eq!(report.length.optimal_ratio, 1.0);
}

#[test]
fn scenario_d_no_primary_keyword_hits() {
    let config = QaConfig {
        keywords: contentgate_quality::KeywordConfig {
            min_primary_usage: 0.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let strategy = KeywordStrategy {
        primary: vec!["revenue operations".into()],
        secondary: vec!["pipeline".into()],
        long_tail: vec![],
    };
    let records = vec![
        ItemRecord::new(0, "Build a better pipeline\nbody"),
        ItemRecord::new(1, "Hiring is hard\nbody"),
        ItemRecord::new(2, "Notes from the week\nbody"),
    ];
    let report = BasicQualityEngine::new(config)
        .unwrap()
        .run_records(records, Some(&strategy))
        .unwrap();

    let keywords = report.keywords.as_ref().unwrap();
    assert_eq!(keywords.primary_usage_ratio, 0.0);
    assert_eq!(keywords.missing_primary, vec![0, 1, 2]);
    assert!(!keywords.result.passed);
    assert!(!report.overall_pass);
}

#[test]
fn report_is_idempotent() {
    let platforms = ["linkedin", "twitter", "x", "unknown"];
    let records: Vec<ItemRecord> = (0..64u32)
        .map(|i| {
            let hook = if i == 63 { generated_hook(5) } else { generated_hook(i) };
            ItemRecord::new(i as usize, format!("{}\n{}\nSave this for later.", hook, words(40)))
                .with_platform(platforms[i as usize % platforms.len()])
        })
        .collect();
    let strategy = KeywordStrategy::new(vec!["alpha".into()]);

    let first = run(records.clone(), Some(&strategy));
    let second = run(records, Some(&strategy));

    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert!(first
        .duplicates
        .pairs
        .iter()
        .any(|p| (p.index_a, p.index_b) == (5, 63)));
}

#[test]
fn empty_hooks_never_pair() {
    let records = vec![
        ItemRecord::new(0, "   "),
        ItemRecord::new(1, "Real hook\nFollow me for more."),
        ItemRecord::new(2, "\n\n"),
    ];
    let report = run(records, None);
    assert!(report.duplicates.pairs.is_empty());
    assert_eq!(report.duplicates.compared_hooks, 1);
    assert_eq!(report.duplicates.uniqueness_score, 1.0);
}

proptest! {
    #[test]
    fn similarity_is_symmetric_and_reflexive(a in "[a-zA-Z ]{0,40}", b in "[a-zA-Z ]{0,40}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
        prop_assert_eq!(similarity(&a, &a), 1.0);
        let s = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&s));
    }

    #[test]
    fn uniqueness_score_is_bounded(n in 0usize..400, pairs in 0usize..100_000) {
        let score = uniqueness_score(n, pairs);
        prop_assert!((0.0..=1.0).contains(&score));
        if n <= 1 {
            prop_assert_eq!(score, 1.0);
        }
    }
}

/// A near-duplicate of `hook`: a plural, a typo or two swapped words.
#[cfg(feature = "minhash")]
fn edited_hook(hook: &str, kind: u8, at: usize) -> String {
    let mut words: Vec<String> = hook.split(' ').map(str::to_string).collect();
    let w = at % words.len();
    match kind % 3 {
        0 => words[w].push('s'),
        1 => {
            let mut chars: Vec<char> = words[w].chars().collect();
            let c = at % chars.len();
            chars[c] = if chars[c] == 'z' { 'q' } else { 'z' };
            words[w] = chars.into_iter().collect();
        }
        _ => {
            let next = (w + 1) % words.len();
            words.swap(w, next);
        }
    }
    words.join(" ")
}

#[cfg(feature = "minhash")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn approximate_path_matches_brute_force(
        offset in 0u32..10_000,
        copies in proptest::collection::vec((0usize..40, any::<bool>()), 0..4),
        edits in proptest::collection::vec((0usize..40, 0u8..3, 0usize..64), 1..8),
    ) {
        use contentgate_quality::MinHashLsh;

        const THRESHOLD: f64 = 0.8;
        const EPSILON: f64 = 0.05;

        let mut texts: Vec<String> = (0..40).map(|i| generated_hook(offset + i)).collect();

        for (source, shout) in &copies {
            let copy = if *shout {
                texts[*source].to_uppercase()
            } else {
                texts[*source].clone()
            };
            texts.push(copy);
        }

        for (source, kind, at) in &edits {
            let edited = edited_hook(&texts[*source], *kind, *at);
            if similarity(&texts[*source], &edited) >= THRESHOLD + EPSILON {
                texts.push(edited);
            }
        }

        // Keep only batches clear of the tolerance band.
        for i in 0..texts.len() {
            for j in (i + 1)..texts.len() {
                let s = similarity(&texts[i], &texts[j]);
                prop_assume!(s < THRESHOLD - EPSILON || s >= THRESHOLD + EPSILON);
            }
        }

        let hooks: Vec<Hook> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Hook::new(i, t.clone()))
            .collect();

        let exact = BruteForce::new(false).find_pairs(&hooks, THRESHOLD);
        let approximate = MinHashLsh::new(128, THRESHOLD, EPSILON, true)
            .unwrap()
            .find_pairs(&hooks, THRESHOLD);

        prop_assert_eq!(approximate, exact);
    }
}
