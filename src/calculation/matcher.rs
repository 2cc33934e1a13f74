//! First-match scenario selection.
//!
//! Candidates for a reason code and process level are tried in ascending id
//! order. A candidate matches when every required condition holds and no
//! excluded condition does. The lowest matching id wins, and every
//! candidate's condition results are kept for audit whether or not anything
//! matched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ScenarioConfig;
use crate::models::{LeaveVariables, RawRecord, Scenario, ScenarioEvaluation};

use super::ConditionRegistry;

/// The result of matching one record.
#[derive(Debug, Clone)]
pub struct MatchOutcome<'a> {
    /// The matched scenario, if any.
    pub scenario: Option<&'a Scenario>,
    /// Ids of every candidate considered, in evaluation order.
    pub candidates: Vec<u32>,
    /// Condition results per candidate id.
    pub evaluations: BTreeMap<u32, ScenarioEvaluation>,
    /// Predicate failures recorded while matching.
    pub diagnostics: Vec<String>,
}

impl MatchOutcome<'_> {
    /// Returns true when a scenario matched.
    pub fn is_match(&self) -> bool {
        self.scenario.is_some()
    }
}

/// Selects scenarios from a configuration snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ScenarioMatcher<'a> {
    config: &'a ScenarioConfig,
    registry: &'a ConditionRegistry,
}

impl<'a> ScenarioMatcher<'a> {
    /// Creates a matcher over a configuration and registry.
    pub fn new(config: &'a ScenarioConfig, registry: &'a ConditionRegistry) -> Self {
        Self { config, registry }
    }

    /// Finds the first matching scenario for a record.
    ///
    /// Candidates after the match are not evaluated and do not appear in the
    /// trace.
    pub fn find_match(
        &self,
        reason_code: &str,
        process_level: u32,
        vars: &LeaveVariables,
        record: &RawRecord,
    ) -> MatchOutcome<'a> {
        let candidates = self.config.candidates(reason_code, process_level);
        debug!(
            reason_code = %reason_code,
            process_level,
            candidates = candidates.len(),
            "Matching scenarios"
        );

        let mut outcome = MatchOutcome {
            scenario: None,
            candidates: candidates.iter().map(|scenario| scenario.id).collect(),
            evaluations: BTreeMap::new(),
            diagnostics: Vec::new(),
        };

        for scenario in candidates {
            let evaluation = self.evaluate(scenario, vars, record, &mut outcome.diagnostics);
            let matched = evaluation.matched;
            debug!(scenario_id = scenario.id, matched, "Evaluated scenario");
            outcome.evaluations.insert(scenario.id, evaluation);
            if matched {
                outcome.scenario = Some(scenario);
                break;
            }
        }

        outcome
    }

    /// Evaluates one scenario's conditions.
    ///
    /// Every required condition is evaluated and recorded. Excluded
    /// conditions are evaluated only once all required conditions hold, and
    /// then all of them are recorded.
    pub fn evaluate(
        &self,
        scenario: &Scenario,
        vars: &LeaveVariables,
        record: &RawRecord,
        diagnostics: &mut Vec<String>,
    ) -> ScenarioEvaluation {
        let mut evaluation = ScenarioEvaluation::default();

        let mut required_hold = true;
        for id in &scenario.conditions.required {
            let result = self.registry.evaluate(id, vars, record, diagnostics);
            required_hold &= result;
            evaluation.required.insert(id.clone(), result);
        }
        if !required_hold {
            return evaluation;
        }

        let mut excluded_hit = false;
        for id in &scenario.conditions.excluded {
            let result = self.registry.evaluate(id, vars, record, diagnostics);
            excluded_hit |= result;
            evaluation.excluded.insert(id.clone(), result);
        }

        evaluation.matched = !excluded_hit;
        evaluation
    }
}
