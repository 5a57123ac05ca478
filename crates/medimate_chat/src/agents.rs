//! Agent routing.
//!
//! Free text is routed to an agent by case-insensitive keyword matching
//! against an ordered rule table. The first rule with a matching keyword
//! wins; when nothing matches the current agent is kept.
//!
//! A keyword occurrence lying entirely inside an occurrence of a longer
//! keyword does not count, so "reminder" routes on "reminder" and not on
//! the "mind" it contains.

use tracing::debug;

use crate::types::AgentKind;

/// One routing rule: any of `keywords` selects `agent`
#[derive(Debug, Clone, Copy)]
pub struct RoutingRule {
    pub keywords: &'static [&'static str],
    pub agent: AgentKind,
}

/// A keyword occurrence in the lowercased message
#[derive(Debug, Clone, Copy)]
struct Hit {
    rank: usize,
    start: usize,
    end: usize,
}

impl Hit {
    fn len(&self) -> usize {
        self.end - self.start
    }

    /// `other` lies within `self` and is strictly shorter
    fn shadows(&self, other: &Hit) -> bool {
        self.start <= other.start && other.end <= self.end && self.len() > other.len()
    }
}

/// Default rules in priority order
pub const ROUTING_RULES: &[RoutingRule] = &[
    RoutingRule {
        keywords: &["emergency", "urgent", "help immediately", "alert"],
        agent: AgentKind::Emergency,
    },
    RoutingRule {
        keywords: &[
            "emotional",
            "depression",
            "anxiety",
            "stress",
            "mental",
            "mood",
            "mind",
            "feeling",
            "sad",
        ],
        agent: AgentKind::MentalHealth,
    },
    RoutingRule {
        keywords: &["covid", "coronavirus", "pandemic"],
        agent: AgentKind::Covid19,
    },
    RoutingRule {
        keywords: &[
            "medicine",
            "medication",
            "pill",
            "drug",
            "prescription",
            "dose",
            "reminder",
        ],
        agent: AgentKind::MedicineReminder,
    },
    RoutingRule {
        keywords: &["diet", "food", "nutrition", "eating", "weight", "meal"],
        agent: AgentKind::Diet,
    },
    RoutingRule {
        keywords: &[
            "headache", "pain", "symptom", "fever", "cough", "sick", "hurt", "ache",
        ],
        agent: AgentKind::HealthCheck,
    },
    RoutingRule {
        keywords: &["register", "registration", "sign up", "new patient"],
        agent: AgentKind::Registration,
    },
];

/// Router for incoming messages
#[derive(Debug, Clone, Copy)]
pub struct AgentRouter {
    rules: &'static [RoutingRule],
}

impl AgentRouter {
    /// Create a router over the default rule table
    pub fn new() -> Self {
        Self {
            rules: ROUTING_RULES,
        }
    }

    /// Create a router over a custom rule table
    pub fn with_rules(rules: &'static [RoutingRule]) -> Self {
        Self { rules }
    }

    /// Pick the agent for `message`, falling back to `current` (or Welcome)
    pub fn select_agent(&self, message: &str, current: Option<AgentKind>) -> AgentKind {
        let lowered = message.to_lowercase();

        // Keywords are lowercase in the table
        let mut hits = Vec::new();
        for (rank, rule) in self.rules.iter().enumerate() {
            for keyword in rule.keywords {
                for (start, _) in lowered.match_indices(keyword) {
                    hits.push(Hit {
                        rank,
                        start,
                        end: start + keyword.len(),
                    });
                }
            }
        }

        let winner = hits
            .iter()
            .filter(|hit| !hits.iter().any(|other| other.shadows(hit)))
            .map(|hit| hit.rank)
            .min();

        match winner {
            Some(rank) => {
                let agent = self.rules[rank].agent;
                debug!(agent = %agent, "Routed message by keyword");
                agent
            }
            None => current.unwrap_or_default(),
        }
    }
}

impl Default for AgentRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Route with the default rule table
pub fn select_agent(message: &str, current: Option<AgentKind>) -> AgentKind {
    AgentRouter::new().select_agent(message, current)
}
