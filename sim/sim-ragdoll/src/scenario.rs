//! Keyword-driven force planning.
//!
//! A free-text request such as "show me a ragdoll getting punched" is mapped
//! to a [`MotionKind`] by substring matching, and a [`ForcePlanner`] turns the
//! kind into the one-shot forces fed to the simulation. The mapping is a
//! lookup table with some randomness; the random source is injected so runs
//! can be reproduced with [`KeywordPlanner::seeded`].

use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sim_types::{AppliedForce, RagdollModel};
use tracing::{debug, info};

use crate::humanoid::{HumanoidBuilder, Segment};

/// Words that mark a request as being about physical motion.
const PHYSICS_KEYWORDS: &[&str] = &[
    "physics",
    "simulation",
    "ragdoll",
    "rag doll",
    "movement",
    "motion",
    "animate",
    "animation",
    "fall",
    "impact",
    "collision",
    "force",
    "gravity",
    "push",
    "pull",
    "jump",
    "spin",
    "rotate",
    "punch",
    "hit",
    "kick",
    "throw",
];

/// Words that ask for something to be shown or run.
const SIMULATION_KEYWORDS: &[&str] = &[
    "show me",
    "simulate",
    "demonstrate",
    "visualize",
    "create",
    "make",
    "run",
];

/// Segments a random nudge may land on.
const RANDOM_TARGETS: [Segment; 4] = [
    Segment::Head,
    Segment::Torso,
    Segment::LeftUpperArm,
    Segment::RightUpperArm,
];

/// Upward push on each thigh for a jump (N).
const JUMP_FORCE: f64 = 1000.0;
/// Sideways push on the torso for a spin (N).
const SPIN_FORCE: f64 = 1000.0;
/// Offset of the spin push from the torso origin along +X (m).
const SPIN_LEVER: f64 = 0.5;
/// Upward part of a punch (N).
const PUNCH_LIFT: f64 = 200.0;

/// Check whether a request asks for a physics simulation.
///
/// The request must mention physical motion, and either ask for something to
/// be shown or be phrased as a question.
///
/// ```
/// use sim_ragdoll::needs_simulation;
///
/// assert!(needs_simulation("Show me a ragdoll falling down the stairs"));
/// assert!(needs_simulation("what happens when you push someone?"));
/// assert!(!needs_simulation("explain gravity"));
/// assert!(!needs_simulation("show me a cat picture"));
/// ```
#[must_use]
pub fn needs_simulation(query: &str) -> bool {
    let query = query.to_lowercase();
    let physical = PHYSICS_KEYWORDS.iter().any(|k| query.contains(k));
    let requested = SIMULATION_KEYWORDS.iter().any(|k| query.contains(k)) || query.contains('?');
    physical && requested
}

/// Kind of motion a request describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionKind {
    /// Let gravity act alone.
    Fall,
    /// Lateral shove on the torso.
    Push,
    /// Both thighs pushed upwards.
    Jump,
    /// Off-centre push that sets the torso spinning.
    Spin,
    /// Blow to the head.
    Punch,
    /// Random nudge on the head, torso or an upper arm.
    Random,
}

impl MotionKind {
    /// Classify a request by its keywords.
    ///
    /// Earlier kinds win when several match: a request mentioning both
    /// "fall" and "push" is a [`MotionKind::Fall`].
    #[must_use]
    pub fn classify(query: &str) -> Self {
        let query = query.to_lowercase();
        let has = |words: &[&str]| words.iter().any(|w| query.contains(w));

        if has(&["fall", "gravity"]) {
            Self::Fall
        } else if has(&["push", "force"]) {
            Self::Push
        } else if has(&["jump"]) {
            Self::Jump
        } else if has(&["spin", "rotate"]) {
            Self::Spin
        } else if has(&["punch", "hit"]) {
            Self::Punch
        } else {
            Self::Random
        }
    }

    /// Lowercase label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Fall => "fall",
            Self::Push => "push",
            Self::Jump => "jump",
            Self::Spin => "spin",
            Self::Punch => "punch",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for MotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Turns a request into forces on a humanoid model.
pub trait ForcePlanner {
    /// Plan the forces for `query` on `model`.
    ///
    /// Body ids in the returned forces refer to bodies of `model`.
    fn plan(&mut self, model: &RagdollModel, query: &str) -> Vec<AppliedForce>;

    /// Motion this planner reads into `query`.
    ///
    /// Defaults to [`MotionKind::classify`]. Planners that do not follow the
    /// keyword table override it so the label matches what [`Self::plan`]
    /// produces.
    fn classify(&self, query: &str) -> MotionKind {
        MotionKind::classify(query)
    }
}

/// Default [`ForcePlanner`]: keyword lookup with randomized magnitudes.
#[derive(Debug, Clone)]
pub struct KeywordPlanner<R = StdRng> {
    rng: R,
}

impl KeywordPlanner<StdRng> {
    /// Planner with a fixed seed; the same seed plans the same forces.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Planner seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> KeywordPlanner<R> {
    /// Planner drawing from `rng`.
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Forces for a motion kind on the humanoid `model`.
    pub fn forces_for(&mut self, kind: MotionKind, model: &RagdollModel) -> Vec<AppliedForce> {
        let id = |segment: Segment| segment.body_id(&model.id);

        match kind {
            MotionKind::Fall => Vec::new(),
            MotionKind::Push => {
                let x = self.rng.gen_range(-250.0..250.0);
                let z = self.rng.gen_range(-250.0..250.0);
                vec![AppliedForce::at_com(
                    id(Segment::Torso),
                    Vector3::new(x, 0.0, z),
                )]
            }
            MotionKind::Jump => [Segment::LeftUpperLeg, Segment::RightUpperLeg]
                .into_iter()
                .map(|leg| AppliedForce::at_com(id(leg), Vector3::new(0.0, JUMP_FORCE, 0.0)))
                .collect(),
            MotionKind::Spin => {
                let torso = id(Segment::Torso);
                let Some(position) = model.body(&torso).map(|b| b.position) else {
                    return Vec::new();
                };
                vec![AppliedForce::at_point(
                    torso,
                    Vector3::new(0.0, 0.0, SPIN_FORCE),
                    Point3::new(position.x + SPIN_LEVER, position.y, position.z),
                )]
            }
            MotionKind::Punch => {
                let x = self.rng.gen_range(-400.0..400.0);
                let z = self.rng.gen_range(-400.0..400.0);
                vec![AppliedForce::at_com(
                    id(Segment::Head),
                    Vector3::new(x, PUNCH_LIFT, z),
                )]
            }
            MotionKind::Random => {
                let target = RANDOM_TARGETS[self.rng.gen_range(0..RANDOM_TARGETS.len())];
                let force = Vector3::new(
                    self.rng.gen_range(-150.0..150.0),
                    self.rng.gen_range(0.0..300.0),
                    self.rng.gen_range(-150.0..150.0),
                );
                debug!(segment = target.name(), "random force target");
                vec![AppliedForce::at_com(id(target), force)]
            }
        }
    }
}

impl<R: Rng> ForcePlanner for KeywordPlanner<R> {
    fn plan(&mut self, model: &RagdollModel, query: &str) -> Vec<AppliedForce> {
        let kind = MotionKind::classify(query);
        let forces = self.forces_for(kind, model);
        info!(%kind, forces = forces.len(), "planned forces");
        forces
    }
}

/// A humanoid plus the forces planned for a request.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Motion the planner classified the request as.
    pub kind: MotionKind,
    /// Freshly built humanoid.
    pub model: RagdollModel,
    /// Forces to apply before stepping.
    pub forces: Vec<AppliedForce>,
}

impl Scenario {
    /// Build a default-sized humanoid named `id` and plan forces for `query`.
    ///
    /// # Errors
    ///
    /// Propagates model construction errors.
    pub fn from_query<P>(planner: &mut P, id: &str, query: &str) -> sim_types::Result<Self>
    where
        P: ForcePlanner + ?Sized,
    {
        Self::with_builder(planner, &HumanoidBuilder::new(id), query)
    }

    /// Like [`Scenario::from_query`] with a custom builder.
    ///
    /// # Errors
    ///
    /// Propagates model construction errors.
    pub fn with_builder<P>(
        planner: &mut P,
        builder: &HumanoidBuilder,
        query: &str,
    ) -> sim_types::Result<Self>
    where
        P: ForcePlanner + ?Sized,
    {
        let model = builder.build()?;
        let forces = planner.plan(&model, query);
        Ok(Self {
            kind: planner.classify(query),
            model,
            forces,
        })
    }
}
