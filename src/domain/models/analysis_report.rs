use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Number of ranked markets the model is asked for.
pub const MARKET_COUNT: usize = 3;

/// Regions the model is asked to score, in priority order.
pub const PRIORITY_REGIONS: [&str; 3] = ["North America", "Europe", "Asia-Pacific"];

pub const REGION_COUNT: usize = PRIORITY_REGIONS.len();

/// Example scores shown next to each priority region in the prompt.
const REGION_SCORE_HINTS: [f64; REGION_COUNT] = [0.9, 0.8, 0.7];

/// Number of entries requested for each of the short lists (roles, pain
/// points, marketing angles, competitors).
pub const LIST_ITEM_COUNT: usize = 3;

/// The parsed result of one successful analysis.
///
/// Holds the JSON value returned by the model exactly as it was parsed and
/// serializes back to it unchanged. Under the lenient policy this may be any
/// JSON value, not only an object. Use [`AnalysisReport::structured`] for a
/// typed view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AnalysisReport {
    value: Value,
}

impl AnalysisReport {
    pub(crate) fn from_value(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The top-level object, when the model returned one.
    pub fn as_object(&self) -> Option<&Map<String, Value>> {
        self.value.as_object()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.value.get(field)
    }

    pub fn into_value(self) -> Value {
        self.value
    }

    /// Deserialize the value into the documented [`MarketAnalysis`] shape.
    pub fn structured(&self) -> Result<MarketAnalysis, serde_json::Error> {
        MarketAnalysis::deserialize(&self.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAnalysis {
    pub target_audience: TargetAudience,
    pub recommended_markets: Vec<RecommendedMarket>,
    pub target_regions: Vec<TargetRegion>,
    pub marketing_angles: Vec<String>,
    pub competitive_landscape: CompetitiveLandscape,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAudience {
    pub primary: String,
    pub industry: String,
    pub company_size: String,
    pub roles: Vec<String>,
    pub pain_points: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMarket {
    pub rank: u32,
    pub market: String,
    pub description: String,
    pub potential: Potential,
}

/// Qualitative potential of a recommended market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Potential {
    High,
    Medium,
    Low,
}

impl Potential {
    pub const ALL: [Potential; 3] = [Potential::High, Potential::Medium, Potential::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Potential::High => "High",
            Potential::Medium => "Medium",
            Potential::Low => "Low",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetRegion {
    pub region: String,
    /// Attractiveness in `[0, 1]`.
    pub score: f64,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveLandscape {
    pub main_competitors: Vec<String>,
    pub differentiation: String,
}

impl MarketAnalysis {
    /// The JSON shape embedded in the prompt.
    ///
    /// Field names here must stay identical to the serde names of the structs
    /// above; `template_matches_typed_shape` in the tests enforces it.
    pub fn schema_template() -> Value {
        let potentials = Potential::ALL
            .iter()
            .map(Potential::as_str)
            .collect::<Vec<_>>()
            .join("/");

        let markets: Vec<Value> = (1..=MARKET_COUNT)
            .map(|rank| {
                json!({
                    "rank": rank,
                    "market": "Market name",
                    "description": "Why this market is ideal",
                    "potential": potentials,
                })
            })
            .collect();

        let regions: Vec<Value> = PRIORITY_REGIONS
            .iter()
            .zip(REGION_SCORE_HINTS)
            .map(|(region, score)| {
                json!({
                    "region": region,
                    "score": score,
                    "reasoning": "Why this region is good",
                })
            })
            .collect();

        json!({
            "target_audience": {
                "primary": "Primary target audience description",
                "industry": "Main industry vertical",
                "company_size": "Ideal company size (e.g., 50-500 employees)",
                "roles": numbered("Role", LIST_ITEM_COUNT),
                "pain_points": numbered("Pain point", LIST_ITEM_COUNT),
            },
            "recommended_markets": markets,
            "target_regions": regions,
            "marketing_angles": numbered("Key marketing message", LIST_ITEM_COUNT),
            "competitive_landscape": {
                "main_competitors": numbered("Competitor", LIST_ITEM_COUNT),
                "differentiation": "What makes this product unique",
            },
        })
    }

    /// Checks the counts and ranges the prompt asks for.
    pub fn validate(&self) -> Result<(), String> {
        if self.recommended_markets.len() != MARKET_COUNT {
            return Err(format!(
                "expected {} recommended markets, got {}",
                MARKET_COUNT,
                self.recommended_markets.len()
            ));
        }

        for (i, market) in self.recommended_markets.iter().enumerate() {
            let expected = (i + 1) as u32;
            if market.rank != expected {
                return Err(format!(
                    "recommended market '{}' has rank {}, expected {}",
                    market.market, market.rank, expected
                ));
            }
        }

        if self.target_regions.len() != REGION_COUNT {
            return Err(format!(
                "expected {} target regions, got {}",
                REGION_COUNT,
                self.target_regions.len()
            ));
        }

        for region in &self.target_regions {
            if !(0.0..=1.0).contains(&region.score) {
                return Err(format!(
                    "region '{}' has score {} outside [0, 1]",
                    region.region, region.score
                ));
            }
        }

        Ok(())
    }

    /// A complete, valid analysis. Backs the mock gateway's canned reply.
    pub fn example() -> Self {
        Self {
            target_audience: TargetAudience {
                primary: "Marketing teams at growing B2B companies".to_string(),
                industry: "Software & Technology".to_string(),
                company_size: "50-500 employees".to_string(),
                roles: vec![
                    "Marketing Manager".to_string(),
                    "Social Media Manager".to_string(),
                    "Head of Growth".to_string(),
                ],
                pain_points: vec![
                    "Inconsistent posting schedule".to_string(),
                    "Manual cross-channel publishing".to_string(),
                    "No visibility into campaign performance".to_string(),
                ],
            },
            recommended_markets: vec![
                RecommendedMarket {
                    rank: 1,
                    market: "Digital Marketing Agencies".to_string(),
                    description: "Manage many client accounts and need batch scheduling"
                        .to_string(),
                    potential: Potential::High,
                },
                RecommendedMarket {
                    rank: 2,
                    market: "E-commerce Brands".to_string(),
                    description: "Run frequent promotions across several channels".to_string(),
                    potential: Potential::High,
                },
                RecommendedMarket {
                    rank: 3,
                    market: "B2B SaaS Companies".to_string(),
                    description: "Rely on thought leadership content for pipeline".to_string(),
                    potential: Potential::Medium,
                },
            ],
            target_regions: vec![
                TargetRegion {
                    region: "North America".to_string(),
                    score: 0.9,
                    reasoning: "Largest spend on marketing automation".to_string(),
                },
                TargetRegion {
                    region: "Europe".to_string(),
                    score: 0.8,
                    reasoning: "Mature agency market with strong social adoption".to_string(),
                },
                TargetRegion {
                    region: "Asia-Pacific".to_string(),
                    score: 0.7,
                    reasoning: "Fast growing SMB segment".to_string(),
                },
            ],
            marketing_angles: vec![
                "Save ten hours a week on posting".to_string(),
                "One calendar for every channel".to_string(),
                "Publish at the moment your audience is online".to_string(),
            ],
            competitive_landscape: CompetitiveLandscape {
                main_competitors: vec![
                    "Hootsuite".to_string(),
                    "Buffer".to_string(),
                    "Sprout Social".to_string(),
                ],
                differentiation: "Agency-first workflows with client approvals".to_string(),
            },
        }
    }
}

fn numbered(label: &str, count: usize) -> Value {
    Value::Array(
        (1..=count)
            .map(|i| Value::String(format!("{} {}", label, i)))
            .collect(),
    )
}
