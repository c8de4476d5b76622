//! End-to-end tests for the merge engine on the in-process store
//!
//! These drive the public API the way a collaborator would: entries are
//! added, translations proposed, validated and voted on, and the learning
//! side (calibration, insights) is checked against the resulting case memory.

use glossa::engine::{ProposalAction, ValidationAction};
use glossa::models::{
    CaseContext, CaseRecord, Decision, DictionaryEntry, KeywordSet, Meaning, PairIdentity,
    ThresholdConfig, ThresholdSource, ValidationType,
};
use glossa::prediction::{CaseBasedPredictor, PredictionSource};
use glossa::prelude::*;
use glossa::storage::MemoryStore;
use glossa::storage::traits::{CaseStore, TranslationStore};
use std::sync::Arc;

async fn test_engine() -> MergeEngine {
    let config = ConfigBuilder::testing()
        .build()
        .expect("Failed to build test configuration");
    glossa::init(config)
        .await
        .expect("Failed to initialize engine")
}

fn keyword_entry(
    id: &str,
    word: &str,
    language: &str,
    category: &str,
    keywords: &[&str],
) -> DictionaryEntry {
    DictionaryEntry::new(word, language)
        .with_id(id)
        .with_category(category)
        .with_keywords(keywords.iter().copied())
}

#[tokio::test]
async fn test_scenario_solaire_vs_solar_is_separate() {
    let engine = test_engine().await;
    let solaire = keyword_entry(
        "fr-solaire",
        "solaire",
        "fr",
        "physics",
        &["solaire", "soleil", "énergie"],
    );
    let solar = keyword_entry("es-solar", "solar", "es", "physics", &["solar", "sol", "energía"]);

    let result = engine.scorer().score(&solaire, &solar);
    assert_eq!(result.semantic_score, 0.0);
    assert_eq!(result.category_score, 1.0);
    assert_eq!(result.score, 0.5);
    assert_eq!(result.recommendation, Decision::Separate);

    engine.create_entry(solaire).await.unwrap();
    engine.create_entry(solar).await.unwrap();
    let outcome = engine
        .propose_translation("alice", "fr-solaire", "es", "solar", None)
        .await
        .unwrap();

    assert_eq!(outcome.action, ProposalAction::Separated);
    assert_eq!(outcome.candidate_id.as_deref(), Some("es-solar"));
    assert_eq!(outcome.score, Some(0.5));
    assert!(engine.list_cases(None, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_scenario_high_overlap_merges() {
    let engine = test_engine().await;
    let a = keyword_entry(
        "fr-photon",
        "photon",
        "fr",
        "physics",
        &["particule", "lumière", "quantum", "énergie", "masse"],
    );
    let b = keyword_entry(
        "es-foton",
        "fotón",
        "es",
        "physics",
        &["particule", "lumière", "quantum", "énergie"],
    );

    let result = engine.scorer().score(&a, &b);
    assert!(result.score > 0.9);
    assert_eq!(result.recommendation, Decision::Merge);

    engine.create_entry(a).await.unwrap();
    engine.create_entry(b).await.unwrap();
    let outcome = engine
        .propose_translation("alice", "fr-photon", "es", "fotón", None)
        .await
        .unwrap();

    assert_eq!(outcome.action, ProposalAction::Merged);
    assert!(outcome.group_id.is_some());
    assert!(!outcome.reasoning.is_empty());
}

#[tokio::test]
async fn test_scenario_empty_memory_prediction_falls_back() {
    let store = MemoryStore::new();
    let config = ConfigBuilder::testing().build().unwrap();
    let predictor = CaseBasedPredictor::new(config.prediction.clone());
    let engine = glossa::init_with_store(config, Arc::new(MemoryStore::new())).unwrap();

    let a = keyword_entry("a", "lune", "fr", "astronomy", &["satellite", "nocturne"]);
    let b = keyword_entry("b", "luna", "es", "astronomy", &["satellite", "marea"]);
    let similarity = engine.scorer().score(&a, &b);

    let prediction = predictor.predict(&store, &a, &b, &similarity).await.unwrap();
    assert_eq!(prediction.source, PredictionSource::Fallback);
    assert_eq!(prediction.case_count, 0);
    assert_eq!(prediction.action, similarity.recommendation);
    assert!(
        prediction
            .reasoning
            .iter()
            .any(|r| r.contains("No prior cases"))
    );
}

#[tokio::test]
async fn test_scenario_calibration_from_ten_cases() {
    let store = Arc::new(MemoryStore::new());
    let merges = [0.92, 0.93, 0.94, 0.95, 0.96, 0.97, 0.98, 0.99];
    for (i, score) in merges.iter().enumerate() {
        store
            .upsert_case(case(&format!("m{}", i), *score, Decision::Merge))
            .await
            .unwrap();
    }
    store.upsert_case(case("s0", 0.3, Decision::Separate)).await.unwrap();
    store.upsert_case(case("s1", 0.2, Decision::Separate)).await.unwrap();

    let engine = glossa::init_with_store(ConfigBuilder::testing().build().unwrap(), store).unwrap();
    let result = engine.recalibrate_thresholds().await.unwrap();

    // Descending merges: index floor(0.1 * 8) = 0 -> 0.99, clamped to 0.95
    assert_eq!(result.thresholds.auto_merge_threshold, 0.95);
    assert_eq!(result.thresholds.auto_separate_threshold, 0.3);
    assert!((result.thresholds.ask_user_threshold - 0.625).abs() < 1e-12);
    assert_eq!(result.source, ThresholdSource::Calibrated { case_count: 10 });
    assert_eq!(engine.current_thresholds().version, 0);
}

#[tokio::test]
async fn test_uncertain_proposal_persists_nothing() {
    let engine = test_engine().await;
    engine
        .create_entry(keyword_entry(
            "fr-marée",
            "marée",
            "fr",
            "ocean",
            &["océan", "lune", "niveau", "cycle"],
        ))
        .await
        .unwrap();
    engine
        .create_entry(keyword_entry(
            "es-marea",
            "marea",
            "es",
            "ocean",
            &["océan", "lune", "viento", "costa"],
        ))
        .await
        .unwrap();

    // Jaccard 2/6 with no long keywords: 0.5 + 0.5 * 0.333 = 0.667
    let outcome = engine
        .propose_translation("alice", "fr-marée", "es", "marea", None)
        .await
        .unwrap();

    assert_eq!(outcome.action, ProposalAction::NeedsReview);
    assert!(outcome.translation_id.is_none());
    assert_eq!(outcome.candidate_id.as_deref(), Some("es-marea"));
    assert!(
        engine
            .list_translations(Default::default(), None)
            .await
            .unwrap()
            .is_empty()
    );
    assert_eq!(engine.count_cases(None).await.unwrap(), 0);
}

#[tokio::test]
async fn test_calibrated_thresholds_change_decisions() {
    let config = ConfigBuilder::testing()
        .with_calibrated_thresholds(true)
        .build()
        .unwrap();
    let engine = glossa::init(config).await.unwrap();
    engine
        .create_entry(keyword_entry(
            "fr-marée",
            "marée",
            "fr",
            "ocean",
            &["océan", "lune", "niveau", "cycle"],
        ))
        .await
        .unwrap();
    engine
        .create_entry(keyword_entry(
            "es-marea",
            "marea",
            "es",
            "ocean",
            &["océan", "lune", "viento", "costa"],
        ))
        .await
        .unwrap();

    engine
        .apply_thresholds(ThresholdConfig {
            auto_merge_threshold: 0.8,
            ask_user_threshold: 0.7,
            auto_separate_threshold: 0.4,
        })
        .unwrap();

    let outcome = engine
        .propose_translation("alice", "fr-marée", "es", "marea", None)
        .await
        .unwrap();
    assert_eq!(outcome.action, ProposalAction::Separated);
}

#[tokio::test]
async fn test_full_review_workflow() {
    let engine = test_engine().await;
    engine
        .create_entry(
            DictionaryEntry::new("ordinateur", "fr")
                .with_id("fr-ordinateur")
                .with_category("computing")
                .with_meaning(
                    Meaning::new("Machine électronique de traitement de données")
                        .with_synonym("calculateur"),
                ),
        )
        .await
        .unwrap();
    engine
        .create_entry(
            DictionaryEntry::new("computadora", "es")
                .with_id("es-computadora")
                .with_category("computing")
                .with_meaning(Meaning::new("Máquina electrónica que procesa información")),
        )
        .await
        .unwrap();

    let outcome = engine
        .propose_translation("alice", "fr-ordinateur", "es", "ordenador", None)
        .await
        .unwrap();
    // Same category, disjoint keywords: 0.5 is in the separate band
    assert_eq!(outcome.action, ProposalAction::Separated);
    let translation_id = outcome.translation_id.unwrap();

    // Keyword sets were cached on the entries during scoring
    let cached = engine.get_entry("fr-ordinateur").await.unwrap();
    assert!(cached.keywords.unwrap().contains("électronique"));

    // A reviewer decides it is the same concept after all. "ordenador" has no
    // entry, so the merge cannot resolve a target.
    let err = engine
        .validate_translation("bob", &translation_id, ValidationAction::AcceptMerge, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, GlossaError::NotFound { .. }));

    engine
        .create_entry(
            DictionaryEntry::new("ordenador", "es")
                .with_id("es-ordenador")
                .with_category("computing"),
        )
        .await
        .unwrap();
    let validated = engine
        .validate_translation(
            "bob",
            &translation_id,
            ValidationAction::AcceptMerge,
            Some("regional synonym"),
            None,
        )
        .await
        .unwrap();
    assert!(validated.success);

    let case = engine
        .store()
        .find_case_by_pair("fr-ordinateur", "es-ordenador", PairIdentity::Ordered)
        .await
        .unwrap()
        .expect("case recorded");
    assert_eq!(case.human_decision, Decision::Merge);
    assert_eq!(case.validated_by, "bob");
    assert!(case.context.category_match);

    // Votes
    assert_eq!(engine.vote("carol", &translation_id, 1).await.unwrap().new_vote_count, 1);
    assert!(matches!(
        engine.vote("carol", &translation_id, 1).await,
        Err(GlossaError::InvalidVote(_))
    ));

    let insights = engine.get_learning_insights(Some(50)).await.unwrap();
    assert_eq!(insights.sample_size, 1);
    // Static bands call 0.5 "separate"; the reviewer merged
    assert_eq!(insights.overall_accuracy, 0.0);
}

#[tokio::test]
async fn test_merge_propagates_group_to_sibling_translations() {
    let engine = test_engine().await;
    for (id, word, language) in [
        ("fr-chat", "chat", "fr"),
        ("it-gatto", "gatto", "it"),
        ("es-gato", "gato", "es"),
    ] {
        engine
            .create_entry(
                DictionaryEntry::new(word, language)
                    .with_id(id)
                    .with_category("animals"),
            )
            .await
            .unwrap();
    }

    let first = engine
        .propose_translation("alice", "fr-chat", "es", "gato", None)
        .await
        .unwrap()
        .translation_id
        .unwrap();
    let second = engine
        .propose_translation("alice", "it-gatto", "es", "gato", None)
        .await
        .unwrap()
        .translation_id
        .unwrap();

    // Link the second translation by hand, without a group
    let mut sibling = engine.get_translation(&second).await.unwrap();
    sibling.target_entry_id = Some("es-gato".to_string());
    engine.store().update_translation(sibling).await.unwrap();

    let outcome = engine
        .validate_translation("bob", &first, ValidationAction::AcceptMerge, None, Some(0.9))
        .await
        .unwrap();
    assert_eq!(outcome.affected_count, 2);

    let first = engine.get_translation(&first).await.unwrap();
    let second = engine.get_translation(&second).await.unwrap();
    assert!(first.translation_group_id.is_some());
    assert_eq!(first.translation_group_id, second.translation_group_id);
}

#[tokio::test]
async fn test_canonical_pair_identity_merges_directions() {
    let config = ConfigBuilder::testing()
        .with_pair_identity(PairIdentity::Canonical)
        .build()
        .unwrap();
    let store = Arc::new(MemoryStore::new());
    let engine = glossa::init_with_store(config, store.clone()).unwrap();

    for (id, word, lang) in [("fr-eau", "eau", "fr"), ("es-agua", "agua", "es")] {
        engine
            .create_entry(DictionaryEntry::new(word, lang).with_id(id))
            .await
            .unwrap();
    }

    let forward = engine
        .propose_translation("alice", "fr-eau", "es", "agua", None)
        .await
        .unwrap()
        .translation_id
        .unwrap();
    let backward = engine
        .propose_translation("alice", "es-agua", "fr", "eau", None)
        .await
        .unwrap()
        .translation_id
        .unwrap();

    engine
        .validate_translation("bob", &forward, ValidationAction::AcceptSeparate, None, None)
        .await
        .unwrap();
    engine
        .validate_translation("bob", &backward, ValidationAction::AcceptMerge, None, None)
        .await
        .unwrap();

    let cases = store.query_cases(Default::default(), None).await.unwrap();
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].human_decision, Decision::Merge);
}

#[test]
fn test_category_ceiling_holds_for_any_overlap() {
    let config = ConfigBuilder::testing().build().unwrap();
    let extractor = glossa::lexicon::KeywordExtractor::new(&config.lexicon).unwrap();
    let scorer = SimilarityScorer::new(config.scoring, extractor);

    let pool: Vec<String> = (0..6).map(|i| format!("terminology{}", i)).collect();
    for mask_a in 0u32..64 {
        for mask_b in 0u32..64 {
            let pick = |mask: u32| -> KeywordSet {
                pool.iter()
                    .enumerate()
                    .filter(|(i, _)| mask & (1 << i) != 0)
                    .map(|(_, k)| k.clone())
                    .collect()
            };
            let (a, b) = (pick(mask_a), pick(mask_b));
            let unmatched = scorer.score_keywords(&a, &b, false);
            assert!(unmatched.score <= 0.5);
            assert_ne!(unmatched.recommendation, Decision::Merge);

            let matched = scorer.score_keywords(&a, &b, true);
            assert!((0.0..=1.0).contains(&matched.score));
        }
    }
}

fn case(source: &str, score: f64, decision: Decision) -> CaseRecord {
    CaseRecord::new(
        source,
        format!("{}-target", source),
        score,
        decision,
        "reviewer",
        CaseContext::default(),
        ValidationType::Manual,
        PairIdentity::Ordered,
    )
}
