//! Analysis report layout across page breaks.

use pdf_scribe::writer::{render_analysis_report, AnalysisRecord, KeyConcept, TopicQuestions};
use pdf_scribe::Error;

fn record_with_concepts(count: u32) -> AnalysisRecord {
    AnalysisRecord {
        common_themes: "Graph theory dominates the exam.".to_string(),
        keywords: "tree, cycle, flow".to_string(),
        question_types: "Design and prove.".to_string(),
        hard_question_trends: "Multi-step reductions.".to_string(),
        advice_for_passing: "Know the definitions cold.".to_string(),
        advice_for_top_score: "Drill the reductions.".to_string(),
        key_concepts: (0..count)
            .map(|i| KeyConcept {
                name: format!("Concept {:03}", i),
                kind: "Topic".to_string(),
                occurrences: i + 1,
            })
            .collect(),
        question_topic_map: vec![TopicQuestions {
            topic: "Network flow".to_string(),
            questions: vec![
                "2021 Q4: maximum flow in a layered graph".to_string(),
                "2022 Q2: min-cut duality".to_string(),
            ],
        }],
    }
}

fn page_count(content: &str) -> usize {
    content.matches("/Type /Page").count() - content.matches("/Type /Pages").count()
}

#[test]
fn test_report_sections_render_in_order() {
    let bytes = render_analysis_report(&record_with_concepts(3), "Exam Analysis").unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    let title = content.find("(Exam Analysis) Tj").unwrap();
    let prose = content.find("(Common Themes) Tj").unwrap();
    let concepts = content.find("(Key Concepts) Tj").unwrap();
    let map = content.find("(Question Topic Map) Tj").unwrap();
    assert!(title < prose && prose < concepts && concepts < map);
}

#[test]
fn test_row_atomicity_across_page_breaks() {
    let bytes = render_analysis_report(&record_with_concepts(100), "Big Report").unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    assert!(page_count(&content) >= 2);
    // Each row appears exactly once: nothing dropped, nothing split into a
    // duplicate draw on the next page.
    for i in 0..100 {
        let needle = format!("(Concept {:03}) Tj", i);
        assert_eq!(content.matches(needle.as_str()).count(), 1, "{}", needle);
    }
    // Header rows are drawn once per table, not repeated after breaks.
    assert_eq!(content.matches("(Concept) Tj").count(), 1);
    assert_eq!(content.matches("(Topic) Tj").count(), 1);
}

#[test]
fn test_long_questions_are_hard_wrapped_into_row() {
    let mut record = record_with_concepts(1);
    record.question_topic_map = vec![TopicQuestions {
        topic: "Everything".to_string(),
        questions: vec!["q".repeat(150)],
    }];
    let bytes = render_analysis_report(&record, "Wrapped").unwrap();
    let content = String::from_utf8_lossy(&bytes).to_string();

    // The 150 character question cannot fit one cell line, so it shows up
    // as several Tj lines of q runs.
    let q_lines = content
        .lines()
        .filter(|l| l.starts_with("(qqq") && l.ends_with(") Tj"))
        .count();
    assert!(q_lines >= 2);
}

#[test]
fn test_unrenderable_row_is_rejected() {
    let mut record = record_with_concepts(1);
    record.key_concepts[0].name = "n".repeat(6000);
    let err = render_analysis_report(&record, "Too Tall").unwrap_err();
    assert!(matches!(err, Error::RowTooTall { .. }));
}

#[test]
fn test_record_json_round_trip() {
    let record = record_with_concepts(2);
    let json = serde_json::to_string(&record).unwrap();
    // Wire format is camelCase with the reserved word spelled literally.
    assert!(json.contains("\"commonThemes\""));
    assert!(json.contains("\"keyConcepts\""));
    assert!(json.contains("\"type\":\"Topic\""));

    let back: AnalysisRecord = serde_json::from_str(&json).unwrap();
    assert_eq!(back.key_concepts.len(), 2);
    assert_eq!(back.question_topic_map[0].topic, "Network flow");
}
