//! Output documents of the command line.

use std::fmt::Write as _;

use serde::Serialize;
use sim_physics::prelude::{AppliedForce, MotionKind, SimulationResult};

/// Everything a `run` produced.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    /// The request text.
    pub query: String,
    /// Classified motion.
    pub motion: &'static str,
    /// Forces applied before stepping.
    pub forces: Vec<AppliedForce>,
    /// Simulation outcome.
    pub result: SimulationResult,
}

impl RunReport {
    /// Assemble a report.
    pub fn new(
        query: &str,
        kind: MotionKind,
        forces: Vec<AppliedForce>,
        result: SimulationResult,
    ) -> Self {
        Self {
            query: query.to_string(),
            motion: kind.label(),
            forces,
            result,
        }
    }

    /// Plain-text summary: run totals plus one line per body.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} motion, {} force(s), {} steps over {:.3} s",
            self.motion,
            self.forces.len(),
            self.result.steps,
            self.result.duration
        );

        for model in &self.result.final_state.models {
            for body in &model.bodies {
                let moved = self
                    .result
                    .displacement(&body.id)
                    .map_or(0.0, |d| d.norm());
                let _ = writeln!(
                    out,
                    "{:<28} y = {:>8.3} m  moved {:>8.3} m",
                    body.id, body.position.y, moved
                );
            }
        }
        out
    }
}

/// Answer of `classify`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// The request text.
    pub query: String,
    /// Whether the request asks for a simulation.
    pub needs_simulation: bool,
    /// Motion the request maps to.
    pub motion: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use sim_physics::prelude::{create_human_ragdoll, Stepper};

    #[test]
    fn test_report_json_and_summary() {
        let model = create_human_ragdoll("cli", 1.8, 70.0).unwrap();
        let result = Stepper::default().simulate(&model, 0.1, &[]).unwrap();
        let report = RunReport::new("let it fall", MotionKind::Fall, vec![], result);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["motion"], "fall");
        assert_eq!(json["result"]["steps"], 7);
        assert!(json["result"]["finalState"]["models"][0]["bodies"].is_array());

        let summary = report.summary();
        assert!(summary.starts_with("fall motion, 0 force(s), 7 steps"));
        assert_eq!(summary.lines().count(), 11);
        assert!(summary.contains("cli_torso"));
    }
}
