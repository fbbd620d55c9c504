use crate::models::Category;

/// kg CO2 per km of car travel avoided.
const CAR_AVOIDED: f64 = 0.21;
/// kg CO2 per km still emitted by public transport.
const PUBLIC_TRANSPORT: f64 = 0.05;

pub const FALLBACK_FACTOR: f64 = 0.5;

/// A keyword rule: any keyword found in the lower-cased description selects `factor`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub keywords: &'static [&'static str],
    pub factor: f64,
}

const fn rule(keywords: &'static [&'static str], factor: f64) -> Rule {
    Rule { keywords, factor }
}

const TRANSPORT_RULES: &[Rule] = &[
    // "drove" is matched alongside "drive" so past-tense descriptions count as car trips.
    rule(&["car", "drive", "drove"], CAR_AVOIDED),
    rule(&["bike", "cycle"], CAR_AVOIDED),
    rule(&["public", "bus", "train"], CAR_AVOIDED - PUBLIC_TRANSPORT),
    rule(&["walk"], CAR_AVOIDED),
];

const ENERGY_RULES: &[Rule] = &[
    rule(&["bulb", "led"], 0.5),
    rule(&["unplug", "device"], 0.3),
    rule(&["shower"], 0.7),
    rule(&["renewable", "solar"], 2.0),
];

const WASTE_RULES: &[Rule] = &[
    rule(&["recycle"], 0.1),
    rule(&["compost"], 0.3),
    rule(&["reuse"], 1.0),
    rule(&["plastic", "avoid"], 0.5),
];

/// Ordered rule table for a category. Earlier rules take priority.
pub fn rules_for(category: Category) -> &'static [Rule] {
    match category {
        Category::Transport => TRANSPORT_RULES,
        Category::Energy => ENERGY_RULES,
        Category::Waste => WASTE_RULES,
    }
}

/// First matching factor for `description`, or `None` when no keyword hits.
pub fn match_factor(rules: &[Rule], description: &str) -> Option<f64> {
    let lowered = description.to_lowercase();
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|keyword| lowered.contains(keyword)))
        .map(|rule| rule.factor)
}

/// Estimated kilograms of CO2 saved. Never validates `value`; callers reject
/// negative input before storing.
pub fn estimate_co2(category: Category, description: &str, value: f64) -> f64 {
    let factor = match_factor(rules_for(category), description).unwrap_or(FALLBACK_FACTOR);
    value * factor
}
