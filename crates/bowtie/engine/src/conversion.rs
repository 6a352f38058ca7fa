//! Conversion engine: collected items to pathway rows
//!
//! Expands activities × pressures into base scenarios, bounds the count,
//! assigns controls, consequences and escalation factors round-robin, and
//! scores each scenario. A fixed seed makes the output reproducible.

use crate::config::{default_escalation_factors, ConversionConfig};
use bowtie_types::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Intermediate scores behind a row's likelihood and severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ScenarioScores {
    pub base_likelihood: u8,
    pub base_severity: u8,
    /// At most `base_likelihood`
    pub preventive_effectiveness: u8,
    pub escalation_pressure: u8,
    /// At most `base_severity`
    pub protective_effectiveness: u8,
}

impl ScenarioScores {
    fn sample(rng: &mut StdRng) -> Self {
        let base_likelihood = rng.gen_range(2..=4u8);
        let base_severity = rng.gen_range(2..=4u8);
        Self {
            base_likelihood,
            base_severity,
            preventive_effectiveness: rng.gen_range(1..=base_likelihood),
            escalation_pressure: rng.gen_range(0..=1u8),
            protective_effectiveness: rng.gen_range(1..=base_severity),
        }
    }

    pub fn likelihood(&self) -> u8 {
        adjust(
            self.base_likelihood,
            self.preventive_effectiveness,
            self.escalation_pressure,
        )
    }

    pub fn severity(&self) -> u8 {
        adjust(
            self.base_severity,
            self.protective_effectiveness,
            self.escalation_pressure,
        )
    }

    pub fn all_in_range(&self) -> bool {
        [
            self.base_likelihood,
            self.base_severity,
            self.preventive_effectiveness,
            self.protective_effectiveness,
            self.likelihood(),
            self.severity(),
        ]
        .iter()
        .all(|s| (MIN_SCORE..=MAX_SCORE).contains(s))
    }
}

/// An effective control knocks one point off; escalation adds one back
fn adjust(base: u8, effectiveness: u8, escalation: u8) -> u8 {
    let reduction = u8::from(effectiveness >= 3);
    (base + escalation)
        .saturating_sub(reduction)
        .clamp(MIN_SCORE, MAX_SCORE)
}

/// A pathway row with the scores it was derived from
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ScoredPathway {
    pub row: PathwayRow,
    pub scores: ScenarioScores,
}

/// Full result of a conversion run
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConversionOutcome {
    pub pathways: Vec<ScoredPathway>,
    /// Categories that were empty and received a placeholder
    pub backfilled: Vec<Category>,
    /// Activity/pressure pairs before capping
    pub base_scenarios: usize,
}

impl ConversionOutcome {
    pub fn rows(&self) -> Vec<PathwayRow> {
        self.pathways.iter().map(|p| p.row.clone()).collect()
    }

    pub fn was_capped(&self) -> bool {
        self.pathways.len() < self.base_scenarios
    }
}

/// Turns collected items into the pathway dataset
#[derive(Clone, Debug, Default)]
pub struct ConversionEngine {
    config: ConversionConfig,
}

impl ConversionEngine {
    pub fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn with_cap(mut self, cap: usize) -> Self {
        self.config.scenario_cap = cap;
        self
    }

    pub fn config(&self) -> &ConversionConfig {
        &self.config
    }

    /// Activities and pressures must both be non-empty
    pub fn check_preconditions(&self, items: &SelectedItems) -> WorkflowResult<()> {
        let missing: Vec<Category> = [Category::Activities, Category::Pressures]
            .into_iter()
            .filter(|c| items.get(*c).is_empty())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(WorkflowError::IncompleteData { missing })
        }
    }

    pub fn convert(&self, central_problem: &str, items: &SelectedItems) -> WorkflowResult<Vec<PathwayRow>> {
        Ok(self.convert_detailed(central_problem, items)?.rows())
    }

    pub fn convert_detailed(
        &self,
        central_problem: &str,
        items: &SelectedItems,
    ) -> WorkflowResult<ConversionOutcome> {
        self.check_preconditions(items)?;

        let placeholders = &self.config.placeholders;
        let mut backfilled = Vec::new();
        let preventive = self.names_or_placeholder(
            &items.preventive_controls,
            &placeholders.preventive_control,
            &mut backfilled,
        );
        let consequences = self.names_or_placeholder(
            &items.consequences,
            &placeholders.consequence,
            &mut backfilled,
        );
        let protective = self.names_or_placeholder(
            &items.protective_controls,
            &placeholders.protective_control,
            &mut backfilled,
        );

        let central_problem = match central_problem.trim() {
            "" => {
                tracing::warn!(
                    placeholder = %placeholders.central_problem,
                    "Central problem empty, using placeholder"
                );
                placeholders.central_problem.as_str()
            }
            problem => problem,
        };

        let fallback_factors;
        let escalation_factors: &[String] = if self.config.escalation_factors.is_empty() {
            fallback_factors = default_escalation_factors();
            &fallback_factors
        } else {
            &self.config.escalation_factors
        };

        // Activity-major base scenarios
        let pairs: Vec<(&str, &str)> = items
            .activities
            .iter()
            .flat_map(|a| {
                items
                    .pressures
                    .iter()
                    .map(move |p| (a.name.as_str(), p.name.as_str()))
            })
            .collect();
        let base_scenarios = pairs.len();

        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let retained = select_scenarios(pairs, self.config.scenario_cap.max(1), &mut rng);

        let pathways: Vec<ScoredPathway> = retained
            .into_iter()
            .enumerate()
            .map(|(i, (activity, pressure))| {
                let scores = ScenarioScores::sample(&mut rng);
                let likelihood = scores.likelihood();
                let severity = scores.severity();
                let row = PathwayRow {
                    activity: activity.to_string(),
                    pressure: pressure.to_string(),
                    preventive_control: preventive[i % preventive.len()].clone(),
                    escalation_factor: escalation_factors[i % escalation_factors.len()].clone(),
                    central_problem: central_problem.to_string(),
                    protective_mitigation: protective[i % protective.len()].clone(),
                    consequence: consequences[i % consequences.len()].clone(),
                    likelihood,
                    severity,
                    risk_level: RiskLevel::from_scores(likelihood, severity),
                };
                ScoredPathway { row, scores }
            })
            .collect();

        tracing::info!(
            rows = pathways.len(),
            base_scenarios,
            seed = self.config.seed,
            backfilled = backfilled.len(),
            "Conversion produced pathway rows"
        );

        Ok(ConversionOutcome {
            pathways,
            backfilled,
            base_scenarios,
        })
    }

    fn names_or_placeholder(
        &self,
        collection: &ItemCollection,
        placeholder: &str,
        backfilled: &mut Vec<Category>,
    ) -> Vec<String> {
        if collection.is_empty() {
            tracing::warn!(
                category = %collection.category(),
                placeholder,
                "No items collected, substituting placeholder"
            );
            backfilled.push(collection.category());
            vec![placeholder.to_string()]
        } else {
            collection.iter().map(|item| item.name.clone()).collect()
        }
    }
}

/// Keep at most `cap` pairs, chosen by random priority, in original order
fn select_scenarios<'a>(
    pairs: Vec<(&'a str, &'a str)>,
    cap: usize,
    rng: &mut StdRng,
) -> Vec<(&'a str, &'a str)> {
    if pairs.len() <= cap {
        return pairs;
    }

    let mut ranked: Vec<(usize, f64)> = (0..pairs.len()).map(|i| (i, rng.gen::<f64>())).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranked.truncate(cap);
    ranked.sort_by_key(|(i, _)| *i);

    ranked.into_iter().map(|(i, _)| pairs[i]).collect()
}
