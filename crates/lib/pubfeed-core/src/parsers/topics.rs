use pubfeed_store::schema::GENERAL_TOPIC;

/// Keyword table in output order; a label applies when any keyword is a
/// substring of the lowercased text.
const TOPIC_KEYWORDS: &[(&str, &[&str])] = &[
    ("AI Strategy", &["strategy", "strategic", "planning", "roadmap"]),
    ("Machine Learning", &["machine learning", "ml", "model", "algorithm"]),
    ("Data Science", &["data science", "analytics", "insights", "data"]),
    ("AI Governance", &["governance", "ethics", "responsible", "compliance"]),
    ("Technology", &["technology", "tech", "platform", "infrastructure"]),
    ("Business Value", &["roi", "value", "business", "impact", "benefit"]),
    ("Innovation", &["innovation", "innovative", "breakthrough", "cutting-edge"]),
    ("Leadership", &["leadership", "management", "executive", "ceo"]),
];

/// Maps free text to topic labels. Never returns an empty list.
#[must_use]
pub fn classify_topics(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let topics: Vec<String> = TOPIC_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|(label, _)| (*label).to_string())
        .collect();

    if topics.is_empty() {
        vec![GENERAL_TOPIC.to_string()]
    } else {
        topics
    }
}
