//! Rule-based query classifier: domain, intent, prediction needs, strategy.
//!
//! Matching runs on the lower-cased query. Keyword tables are plain
//! substrings, so "scale" also matches "large-scale"; the scoring favours
//! multi-word phrases to offset that.

use std::sync::LazyLock;

use chrono::Utc;
use regex::Regex;

use mb_protocol::{
    Domain, Intent, PredictionNeed, QueryClassification, QueryParameters, ResponseMethod,
    ResponseStrategy, Season,
};

// ── Domain keywords ─────────────────────────────────────────────

/// Declaration order breaks ties.
const DOMAIN_KEYWORDS: &[(Domain, &[&str])] = &[
    (
        Domain::Planting,
        &[
            "plant", "planting", "seed", "seedling", "transplant", "spacing",
            "site selection", "soil preparation", "variety", "cultivar",
            "establishment", "when to plant", "how to plant", "planting time",
        ],
    ),
    (
        Domain::PestManagement,
        &[
            "pest", "insect", "bug", "borer", "scale", "stink bug", "aphid",
            "damage", "infestation", "spray", "treatment", "control",
            "organic pesticide", "beneficial insects", "ipm", "monitoring",
        ],
    ),
    (
        Domain::Fertilization,
        &[
            "fertilizer", "fertilize", "nutrition", "nutrient", "compost",
            "organic matter", "nitrogen", "phosphorus", "potassium",
            "soil test", "soil ph", "amendment", "feeding", "foliar",
        ],
    ),
    (
        Domain::Harvesting,
        &[
            "harvest", "harvesting", "picking", "collection", "maturity",
            "ripe", "ready", "timing", "when to harvest", "nut drop",
            "processing", "drying", "storage", "quality",
        ],
    ),
    (
        Domain::Certification,
        &[
            "organic", "certification", "certified", "standards", "inspection",
            "transition", "approved inputs", "record keeping", "compliance",
            "certifier", "omri", "usda organic",
        ],
    ),
    (
        Domain::General,
        &[
            "macadamia", "tree", "orchard", "farm", "farming", "growing",
            "care", "maintenance", "pruning", "irrigation", "water",
        ],
    ),
];

// ── Intent patterns ─────────────────────────────────────────────

fn alternation(words: &[&str]) -> Regex {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    Regex::new(&escaped.join("|")).unwrap()
}

/// Checked in order; the first intent with a match wins.
static INTENT_PATTERNS: LazyLock<Vec<(Intent, Regex)>> = LazyLock::new(|| {
    vec![
        (
            Intent::PredictionRequest,
            alternation(&[
                "predict", "forecast", "estimate", "expect", "likely", "what will",
                "how much", "when will", "should i", "is it time", "ready for", "risk of",
            ]),
        ),
        (
            Intent::AdviceRequest,
            alternation(&[
                "how to", "how do i", "what should", "recommend", "best way", "advice",
                "suggest", "help me", "guide", "tips",
            ]),
        ),
        (
            Intent::InformationRequest,
            alternation(&[
                "what is", "what are", "tell me about", "explain", "describe",
                "information", "learn about", "understand",
            ]),
        ),
        (
            Intent::ProblemSolving,
            alternation(&[
                "problem", "issue", "trouble", "wrong", "help", "fix", "solve", "disease",
                "dying", "yellowing",
            ]),
        ),
        (
            Intent::ComparisonRequest,
            alternation(&[
                "compare", "difference", "better", "versus", "vs", "which", "choose",
                "select", "prefer",
            ]),
        ),
    ]
});

const QUESTION_WORDS: &[&str] = &["help", "how", "what", "when", "where", "why"];

// ── Prediction triggers ─────────────────────────────────────────

const PREDICTION_TRIGGERS: &[(PredictionNeed, &[&str])] = &[
    (
        PredictionNeed::PestRisk,
        &[
            "pest risk", "insect damage", "spray schedule", "pest forecast",
            "bug problem", "infestation risk", "pest pressure",
        ],
    ),
    (
        PredictionNeed::FertilizerNeed,
        &[
            "fertilizer need", "nutrient requirement", "feeding schedule",
            "fertilize now", "nutrition status", "soil fertility",
        ],
    ),
    (
        PredictionNeed::HarvestTiming,
        &[
            "harvest time", "ready to harvest", "harvest schedule", "maturity",
            "when to pick", "harvest forecast",
        ],
    ),
    (
        PredictionNeed::YieldPrediction,
        &[
            "yield estimate", "production forecast", "expected harvest", "crop yield",
            "how much yield", "production estimate",
        ],
    ),
];

const TIMING_QUESTIONS: &[&str] = &["should i", "is it time", "when to"];

// ── Parameter extraction ────────────────────────────────────────

static RE_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+\.?\d*").unwrap());
static RE_TREE_AGE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)\s*year").unwrap());
static RE_AGE_CATEGORY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(young|mature|old)\b").unwrap());

/// "fall" is accepted and reported as autumn.
const SEASON_WORDS: &[(&str, Season)] = &[
    ("spring", Season::Spring),
    ("summer", Season::Summer),
    ("autumn", Season::Autumn),
    ("fall", Season::Autumn),
    ("winter", Season::Winter),
];

const VARIETIES: &[&str] = &["beaumont", "a4", "a16", "a38", "own venture", "daddow"];

const URGENCY_WORDS: &[&str] = &["urgent", "emergency", "immediate", "asap", "quickly"];

/// Stateless classifier; all tables are static.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, query: &str) -> QueryClassification {
        let lower = query.to_lowercase();

        let domain = classify_domain(&lower);
        let intent = classify_intent(&lower);
        let prediction_needs = prediction_needs(&lower);
        let response_strategy = response_strategy(intent, &prediction_needs);
        let parameters = extract_parameters(&lower);
        let confidence = confidence(domain, intent, &prediction_needs);

        tracing::debug!(
            domain = domain.as_str(),
            intent = ?intent,
            needs = prediction_needs.len(),
            confidence,
            "query classified"
        );

        QueryClassification {
            domain,
            intent,
            prediction_needs,
            response_strategy,
            parameters,
            confidence,
            timestamp: Utc::now(),
        }
    }

    /// Three suggested follow-up questions for the domain.
    pub fn followup_questions(&self, domain: Domain) -> Vec<String> {
        let questions: &[&str] = match domain {
            Domain::Planting => &[
                "What's your soil type and pH level?",
                "Which macadamia variety are you considering?",
                "What's your local climate like?",
            ],
            Domain::PestManagement => &[
                "What specific pest symptoms are you seeing?",
                "How old are your trees?",
                "What's the current weather been like?",
            ],
            Domain::Fertilization => &[
                "When did you last test your soil?",
                "What's the age of your trees?",
                "What fertilizers have you used recently?",
            ],
            Domain::Harvesting => &[
                "What variety of macadamias do you have?",
                "Are nuts starting to fall naturally?",
                "What's your typical harvest season?",
            ],
            Domain::Certification => &[
                "Are you currently farming conventionally?",
                "Which certification are you interested in?",
                "How long have you been avoiding synthetic inputs?",
            ],
            Domain::General => &[
                "Can you tell me more about your farm?",
                "What specific challenges are you facing?",
                "What's your experience level with macadamia farming?",
            ],
        };
        questions.iter().map(|q| q.to_string()).collect()
    }
}

/// Exact match +3, multi-word phrase +2, single word +1.
fn keyword_score(query: &str, keywords: &[&str]) -> u32 {
    let trimmed = query.trim();
    keywords
        .iter()
        .copied()
        .filter(|k| query.contains(k))
        .map(|k| {
            if k == trimmed {
                3
            } else if k.contains(' ') {
                2
            } else {
                1
            }
        })
        .sum()
}

fn contains_any(query: &str, words: &[&str]) -> bool {
    words.iter().any(|w| query.contains(w))
}

fn classify_domain(query: &str) -> Domain {
    let mut best: Option<(Domain, u32)> = None;
    for (domain, keywords) in DOMAIN_KEYWORDS {
        let score = keyword_score(query, keywords);
        if score > 0 && best.is_none_or(|(_, b)| score > b) {
            best = Some((*domain, score));
        }
    }
    best.map_or(Domain::General, |(d, _)| d)
}

fn classify_intent(query: &str) -> Intent {
    if let Some((intent, _)) = INTENT_PATTERNS.iter().find(|(_, re)| re.is_match(query)) {
        return *intent;
    }
    if query.contains('?') {
        Intent::InformationRequest
    } else if contains_any(query, QUESTION_WORDS) {
        Intent::AdviceRequest
    } else {
        Intent::GeneralInquiry
    }
}

/// Explicit triggers plus implicit "should I spray / feed / pick" questions.
/// Sorted and de-duplicated.
fn prediction_needs(query: &str) -> Vec<PredictionNeed> {
    let mut needs: Vec<PredictionNeed> = PREDICTION_TRIGGERS
        .iter()
        .filter(|(_, triggers)| triggers.iter().any(|t| query.contains(t)))
        .map(|(need, _)| *need)
        .collect();

    if contains_any(query, TIMING_QUESTIONS) {
        if contains_any(query, &["spray", "treat"]) {
            needs.push(PredictionNeed::PestRisk);
        } else if contains_any(query, &["fertilize", "feed"]) {
            needs.push(PredictionNeed::FertilizerNeed);
        } else if contains_any(query, &["harvest", "pick"]) {
            needs.push(PredictionNeed::HarvestTiming);
        }
    }

    needs.sort();
    needs.dedup();
    needs
}

fn response_strategy(intent: Intent, needs: &[PredictionNeed]) -> ResponseStrategy {
    let mut strategy = ResponseStrategy {
        use_ml_predictions: !needs.is_empty(),
        prediction_types: needs.to_vec(),
        ..ResponseStrategy::default()
    };
    if !needs.is_empty() {
        strategy.primary_method = ResponseMethod::MlPrediction;
        strategy.requires_farm_data = true;
    }
    match intent {
        Intent::ProblemSolving => {
            strategy.primary_method = ResponseMethod::Hybrid;
            strategy.use_ml_predictions = true;
        }
        Intent::ComparisonRequest => strategy.primary_method = ResponseMethod::KnowledgeBase,
        _ => {}
    }
    strategy
}

fn extract_parameters(query: &str) -> QueryParameters {
    let numbers = RE_NUMBER
        .find_iter(query)
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .collect();

    let season = SEASON_WORDS
        .iter()
        .find(|(word, _)| query.contains(word))
        .map(|(_, season)| *season);

    let (tree_age, tree_age_category) = match RE_TREE_AGE.captures(query) {
        Some(caps) => (caps[1].parse().ok(), None),
        None => (
            None,
            RE_AGE_CATEGORY
                .captures(query)
                .map(|caps| caps[1].to_string()),
        ),
    };

    let variety = VARIETIES
        .iter()
        .find(|v| query.contains(*v))
        .map(|v| v.to_string());

    QueryParameters {
        numbers,
        season,
        tree_age,
        tree_age_category,
        variety,
        urgent: contains_any(query, URGENCY_WORDS),
    }
}

/// 0.5 base, +0.2 specific domain, +0.2 clear intent, +0.1 prediction needs.
fn confidence(domain: Domain, intent: Intent, needs: &[PredictionNeed]) -> f64 {
    let mut confidence: f64 = 0.5;
    if domain != Domain::General {
        confidence += 0.2;
    }
    if intent.is_clear() {
        confidence += 0.2;
    }
    if !needs.is_empty() {
        confidence += 0.1;
    }
    confidence.min(1.0)
}
