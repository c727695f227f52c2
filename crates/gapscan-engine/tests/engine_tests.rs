use gapscan_core::config::{EngineConfig, InputParams};
use gapscan_core::types::{KeywordPoint, PageInput, ParagraphEmbedding};
use gapscan_engine::{ContentGapEngine, PageReport};

fn kw(id: &str, embedding: Option<Vec<f32>>, impressions: u64, position: f64) -> KeywordPoint {
    KeywordPoint { id: id.into(), text: id.replace('-', " "), embedding, impressions, position }
}

fn para(para_index: usize, embedding: Option<Vec<f32>>) -> ParagraphEmbedding {
    ParagraphEmbedding {
        page_id: "bread-guide".into(),
        para_index,
        text: format!("paragraph {para_index}"),
        embedding,
    }
}

/// Two tight topics along different axes plus some leftovers. Only the
/// first topic is discussed in the page body.
fn page() -> PageInput {
    let keywords = vec![
        kw("starter-feeding", Some(vec![1.0, 0.0, 0.0]), 900, 4.0),
        kw("starter-ratio", Some(vec![0.97, 0.03, 0.0]), 300, 6.0),
        kw("starter-schedule", Some(vec![0.95, 0.0, 0.05]), 120, 5.0),
        kw("starter-jar", Some(vec![0.98, 0.02, 0.02]), 40, 9.0),
        kw("oven-temp", Some(vec![0.0, 1.0, 0.0]), 2000, 14.0),
        kw("oven-steam", Some(vec![0.0, 0.96, 0.04]), 800, 12.0),
        kw("oven-stone", Some(vec![0.03, 0.97, 0.0]), 150, 18.0),
        kw("oven-dutch", Some(vec![0.0, 0.98, 0.03]), 75, 11.0),
        kw("gluten-free-flour", Some(vec![0.0, 0.0, 1.0]), 5000, 2.0),
        kw("no-vector-yet", None, 10, 3.0),
    ];
    let paragraphs = vec![
        para(0, Some(vec![0.2, 0.1, 0.9])),
        para(1, Some(vec![0.9, 0.1, 0.05])),
        para(2, None),
    ];
    PageInput { page_id: "bread-guide".into(), keywords, paragraphs }
}

fn engine() -> ContentGapEngine {
    ContentGapEngine::new(EngineConfig::default()).expect("default config is valid")
}

#[test]
fn full_page_run_finds_the_uncovered_topic() {
    let report = engine().run(&page()).expect("run");

    assert_eq!(report.page_id, "bread-guide");
    assert_eq!(report.clusters.len(), 2);
    assert_eq!(report.clusters[0].representative, "starter feeding");
    assert_eq!(report.clusters[1].representative, "oven temp");
    assert_eq!(report.noise, vec!["gluten-free-flour"]);
    assert_eq!(report.skipped_keywords, vec!["no-vector-yet"]);
    assert_eq!(report.skipped_paragraphs, vec![2]);
    assert_eq!(report.dropped_keywords, 0);

    assert_eq!(report.candidates.len(), 2);
    let starter = &report.candidates[0];
    assert!(!starter.has_gap);
    assert_eq!(starter.best_match.as_ref().map(|m| m.para_index), Some(1));

    let oven = &report.candidates[1];
    assert!(oven.has_gap);
    assert_eq!(oven.total_impressions, 3025);

    assert_eq!(report.ranked_gaps.len(), 1);
    assert_eq!(report.ranked_gaps[0].cluster_id, oven.cluster_id);
}

#[test]
fn runs_are_deterministic() {
    let engine = engine();
    let page = page();
    let first = engine.run(&page).unwrap();
    for _ in 0..3 {
        assert_eq!(engine.run(&page).unwrap(), first);
    }
}

#[test]
fn empty_page_produces_empty_report() {
    let report = engine()
        .run(&PageInput { page_id: "empty".into(), ..PageInput::default() })
        .unwrap();
    assert_eq!(report, PageReport { page_id: "empty".into(), ..PageReport::default() });
}

#[test]
fn ranked_gaps_respect_top_n() {
    let mut config = EngineConfig::default();
    config.ranking.top_n = 1;
    let mut page = page();
    page.paragraphs.clear();

    let report = ContentGapEngine::new(config).unwrap().run(&page).unwrap();
    assert_eq!(report.candidates.iter().filter(|c| c.has_gap).count(), 2);
    assert_eq!(report.ranked_gaps.len(), 1);
    let best = report
        .candidates
        .iter()
        .map(|c| c.opportunity_score)
        .fold(f64::MIN, f64::max);
    assert!((report.ranked_gaps[0].opportunity_score - best).abs() < 1e-12);
}

#[test]
fn keyword_cap_keeps_highest_impressions_in_input_order() {
    let mut config = EngineConfig::default();
    config.input = InputParams { max_keywords: 3, min_impressions: 50 };
    let engine = ContentGapEngine::new(config).unwrap();

    let keywords = vec![
        kw("a", None, 10, 1.0),
        kw("b", None, 500, 1.0),
        kw("c", None, 60, 1.0),
        kw("d", None, 700, 1.0),
        kw("e", None, 60, 1.0),
        kw("f", None, 90, 1.0),
    ];
    let kept: Vec<String> = engine.prepare_keywords(&keywords).into_iter().map(|k| k.id).collect();
    assert_eq!(kept, vec!["b", "d", "f"]);
}

#[test]
fn invalid_config_is_rejected_up_front() {
    let mut config = EngineConfig::default();
    config.input.max_keywords = 0;
    assert!(ContentGapEngine::new(config).is_err());
}

#[test]
fn engine_is_shareable_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ContentGapEngine>();

    let shared = engine();
    let engine = &shared;
    let pages: Vec<PageInput> = (0..4)
        .map(|i| PageInput { page_id: format!("page-{i}"), ..page() })
        .collect();
    let reports: Vec<PageReport> = std::thread::scope(|s| {
        let handles: Vec<_> = pages.iter().map(|p| s.spawn(move || engine.run(p))).collect();
        handles.into_iter().map(|h| h.join().unwrap().unwrap()).collect()
    });
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report.page_id, format!("page-{i}"));
        assert_eq!(report.ranked_gaps.len(), 1);
    }
}

#[test]
fn report_serializes_to_json() {
    let report = engine().run(&page()).unwrap();
    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ranked_gaps"][0]["has_gap"], serde_json::Value::Bool(true));
    assert!(json["candidates"][0]["best_match"]["similarity"].is_number());
    let back: PageReport = serde_json::from_value(json).unwrap();
    assert_eq!(back, report);
}
