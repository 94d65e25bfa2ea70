//! Integrated pest management advice for pest-domain queries.

use mb_pest_engine::KnowledgeBase;
use mb_protocol::{MonitoringSchedule, PestAdvice, PestId, Season, SpecificPestAdvice};

/// Query keywords that name each pest, checked in [`PestId::ALL`] order.
fn pest_keywords(pest: PestId) -> &'static [&'static str] {
    match pest {
        PestId::MacadamiaNutBorer => &["borer", "nut borer", "cryptophlebia"],
        PestId::StinkBugs => &["stink bug", "shield bug", "nezara"],
        PestId::ScaleInsects => &["scale", "scale insect", "honeydew"],
    }
}

const IPM_PRINCIPLES: &[&str] = &[
    "Prevention is better than treatment",
    "Regular monitoring and early detection",
    "Use of beneficial insects and natural enemies",
    "Targeted treatments only when necessary",
    "Rotation of treatment methods to prevent resistance",
];

const ORGANIC_TREATMENTS: &[(&str, &[&str])] = &[
    (
        "biological_control",
        &[
            "Beneficial insects (ladybugs, lacewings)",
            "Parasitic wasps",
            "Bacillus thuringiensis (Bt)",
            "Beneficial nematodes",
        ],
    ),
    (
        "botanical_pesticides",
        &["Neem oil", "Pyrethrin sprays", "Insecticidal soap", "Horticultural oils"],
    ),
    (
        "physical_methods",
        &["Pheromone traps", "Sticky traps", "Tree bands", "Hand picking (small infestations)"],
    ),
    (
        "cultural_practices",
        &[
            "Orchard sanitation",
            "Pruning for air circulation",
            "Weed management",
            "Habitat for beneficial insects",
        ],
    ),
];

fn seasonal_advice(season: Option<&str>) -> &'static str {
    let Some(season) = season else {
        return "Monitor pest activity according to seasonal patterns";
    };
    match season.parse::<Season>() {
        Ok(Season::Spring) => "Increase monitoring as pest activity increases with warming weather",
        Ok(Season::Summer) => "Peak pest season - intensive monitoring and treatment may be needed",
        Ok(Season::Autumn) => "Monitor harvest areas and maintain sanitation",
        Ok(Season::Winter) => "Reduced pest activity - focus on orchard cleanup and planning",
        Err(_) => "Monitor according to local seasonal patterns",
    }
}

fn monitoring_schedule() -> MonitoringSchedule {
    MonitoringSchedule {
        frequency: "Weekly during growing season, bi-weekly during dormant season".into(),
        what_to_check: [
            "Leaves for damage or discoloration",
            "Nuts for holes or premature drop",
            "Branches for scale insects or honeydew",
            "Beneficial insect populations",
            "Pheromone trap catches",
        ]
        .map(String::from)
        .to_vec(),
        record_keeping: [
            "Date and location of inspection",
            "Pest species and population levels",
            "Damage assessment",
            "Weather conditions",
            "Treatment decisions and results",
        ]
        .map(String::from)
        .to_vec(),
    }
}

#[derive(Debug, Clone)]
pub struct PestAdvisor {
    knowledge: KnowledgeBase,
}

impl PestAdvisor {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        Self { knowledge }
    }

    /// First pest whose keywords appear in the query.
    pub fn identify_pest(&self, query: &str) -> Option<PestId> {
        let lower = query.to_lowercase();
        PestId::ALL
            .into_iter()
            .find(|pest| pest_keywords(*pest).iter().any(|k| lower.contains(k)))
    }

    /// Knowledge-base detail for one pest, if the knowledge base has it.
    pub fn pest_details(&self, pest: PestId) -> Option<SpecificPestAdvice> {
        self.knowledge.entry(pest).map(|e| SpecificPestAdvice {
            pest,
            description: e.description.clone(),
            symptoms: e.symptoms.clone(),
            organic_treatments: e.organic_treatments.clone(),
            prevention: e.prevention.clone(),
            timing: e.timing.clone(),
        })
    }

    /// `season` is the farm's season, when known.
    pub fn advise(&self, query: &str, season: Option<&str>) -> PestAdvice {
        let specific_pest = self.identify_pest(query);
        let pest_details = specific_pest.and_then(|p| self.pest_details(p));
        let seasonal = seasonal_advice(season);
        let schedule = monitoring_schedule();

        let mut parts = vec!["**Integrated Pest Management Approach:**".to_string()];
        parts.extend(IPM_PRINCIPLES.iter().take(3).map(|p| format!("• {p}")));

        if let Some(details) = pest_details.as_ref().filter(|d| !d.organic_treatments.is_empty()) {
            parts.push("\n**Specific Pest Management:**".into());
            parts.push("Recommended treatments:".into());
            parts.extend(details.organic_treatments.iter().take(3).map(|t| format!("• {t}")));
        }

        parts.push("\n**Seasonal Considerations:**".into());
        parts.push(format!("• {seasonal}"));
        parts.push("\n**Monitoring Schedule:**".into());
        parts.push(format!("• {}", schedule.frequency));
        parts.push("• Focus on leaves, nuts, and beneficial insects".into());

        PestAdvice {
            advice: parts.join("\n"),
            specific_pest,
            ipm_principles: IPM_PRINCIPLES.iter().map(|p| p.to_string()).collect(),
            pest_details,
            seasonal_advice: seasonal.to_string(),
            monitoring_schedule: schedule,
            organic_treatments: ORGANIC_TREATMENTS
                .iter()
                .map(|(group, items)| {
                    (group.to_string(), items.iter().map(|i| i.to_string()).collect())
                })
                .collect(),
        }
    }
}
