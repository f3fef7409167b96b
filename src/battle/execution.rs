//! Battle execution loop
//!
//! Each step: decay -> decide -> intel -> fire -> shells x N -> maneuvers
//! -> auto-reverse -> tank collisions -> elimination -> shell countdown -> step
//!
//! Every phase walks live tanks of player 1 before player 2, creation order
//! within a player. That ordering settles simultaneous collisions and must
//! not change.

use tracing::{debug, info};

use crate::battle::actions::Action;
use crate::battle::ai::{StrategyFactory, TankStrategy};
use crate::battle::battlefield::Battlefield;
use crate::battle::collision::{resolve_shell, resolve_tank};
use crate::battle::entities::EntityKind;
use crate::battle::report::{BattleEvent, StepReport, TankStepOutcome, TankStepReport, Verdict};
use crate::battle::snapshot::BattleView;
use crate::battle::tank::{ForwardMove, ReverseRequest};
use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::{EntityId, PlayerId, Step};
use crate::scenario::Scenario;

/// Per-tank bookkeeping for the step in progress
struct TankController {
    tank: EntityId,
    strategy: Box<dyn TankStrategy>,
    action: Action,
    ignored: bool,
    alive_at_start: bool,
}

/// Complete battle state
pub struct BattleState {
    config: GameConfig,
    field: Battlefield,

    /// Player 1 tanks in creation order, then player 2
    controllers: Vec<TankController>,
    /// Controller indices sorted by spawn position, row-major
    report_order: Vec<usize>,

    step: Step,
    shells_exhausted_left: u32,
    verdict: Option<Verdict>,
}

impl BattleState {
    /// Build the battlefield and one strategy per tank
    ///
    /// Fails before any step runs if the config or scenario is unusable.
    pub fn new(
        scenario: &Scenario,
        config: GameConfig,
        factory: &dyn StrategyFactory,
    ) -> Result<Self> {
        scenario.validate()?;
        let config = scenario.apply_to(&config);
        config.validate()?;

        let mut field = Battlefield::new(scenario.width, scenario.height)?;
        for &pos in &scenario.walls {
            field.spawn_wall(pos, config.wall_hit_points);
        }
        for &pos in &scenario.mines {
            field.spawn_mine(pos);
        }
        for placement in &scenario.tanks {
            field.spawn_tank(placement.player, placement.position, placement.direction, &config);
        }

        let mut controllers = Vec::new();
        for player in PlayerId::ALL {
            for (index, &tank) in field.roster(player).iter().enumerate() {
                controllers.push(TankController {
                    tank,
                    strategy: factory.create(player, index),
                    action: Action::NoOp,
                    ignored: false,
                    alive_at_start: true,
                });
            }
        }

        let mut report_order: Vec<usize> = (0..controllers.len()).collect();
        report_order.sort_by_key(|&i| {
            field
                .tank(controllers[i].tank)
                .map(|t| (t.position.y, t.position.x))
                .unwrap_or_default()
        });

        info!(
            scenario = %scenario.name,
            width = scenario.width,
            height = scenario.height,
            player_one = field.living_count(PlayerId::One),
            player_two = field.living_count(PlayerId::Two),
            max_steps = config.max_steps,
            "Battle started"
        );

        Ok(Self {
            shells_exhausted_left: config.shells_exhausted_grace,
            config,
            field,
            controllers,
            report_order,
            step: 0,
            verdict: None,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn battlefield(&self) -> &Battlefield {
        &self.field
    }

    pub fn steps_executed(&self) -> Step {
        self.step
    }

    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    /// Run until a verdict is reached
    pub fn run(&mut self) -> Verdict {
        self.run_with(|_| {})
    }

    /// Run until a verdict, handing every step report to `observer`
    pub fn run_with(&mut self, mut observer: impl FnMut(&StepReport)) -> Verdict {
        loop {
            if let Some(verdict) = self.verdict {
                return verdict;
            }
            let report = self.run_step();
            observer(&report);
        }
    }

    /// Execute one full step
    ///
    /// Returns an empty report once the battle is over.
    pub fn run_step(&mut self) -> StepReport {
        let mut report = StepReport::new(self.step + 1);
        if self.is_finished() {
            report.step = self.step;
            return report;
        }

        // ===== PHASE 1: COUNTER DECAY =====
        self.phase_decay();

        // ===== PHASE 2: DECISION =====
        self.phase_decide();

        // ===== PHASE 3: INTEL =====
        self.phase_intel(&mut report);

        // ===== PHASE 4: FIRE =====
        self.phase_fire(&mut report);

        // ===== PHASE 5: SHELL SUB-STEPS =====
        for _ in 0..self.config.shell_substeps {
            self.phase_shell_substep(&mut report);
        }

        // ===== PHASE 6: MANEUVERS =====
        self.phase_maneuvers(&mut report);

        // ===== PHASE 7: AUTOMATIC REVERSE =====
        self.phase_auto_reverse(&mut report);

        // ===== PHASE 8: TANK COLLISIONS =====
        self.phase_tank_collisions(&mut report);

        // ===== PHASES 9-11: TERMINATION =====
        self.phase_termination(&mut report);

        report.tanks = self.tank_reports();
        debug!(step = report.step, line = %report, "Step complete");
        report
    }

    /// Indices of controllers whose tank is still alive
    fn live_controllers(&self) -> Vec<usize> {
        (0..self.controllers.len())
            .filter(|&i| self.is_live(self.controllers[i].tank))
            .collect()
    }

    fn is_live(&self, tank: EntityId) -> bool {
        self.field.tank(tank).is_some_and(|t| !t.is_destroyed())
    }

    fn phase_decay(&mut self) {
        for c in self.controllers.iter_mut() {
            let tank = self.field.tank_mut(c.tank);
            c.alive_at_start = tank.as_ref().is_some_and(|t| !t.is_destroyed());
            c.action = Action::NoOp;
            c.ignored = false;
            if let Some(t) = tank.filter(|t| !t.is_destroyed()) {
                t.decay_counters();
            }
        }
    }

    fn phase_decide(&mut self) {
        for i in self.live_controllers() {
            let c = &mut self.controllers[i];
            c.action = c.strategy.decide();
        }
    }

    /// Intel requests take the whole turn; the view is the start-of-turn board
    fn phase_intel(&mut self, report: &mut StepReport) {
        for i in self.live_controllers() {
            let id = self.controllers[i].tank;
            if self.controllers[i].action != Action::RequestIntel {
                continue;
            }
            let Some(tank) = self.field.tank_mut(id) else { continue };
            tank.forfeit_reverse_privilege();
            if tank.is_waiting_to_reverse() {
                self.controllers[i].ignored = true;
                continue;
            }

            let Some(tank) = self.field.tank(id) else { continue };
            let view = BattleView::capture(&self.field, tank);
            self.controllers[i].strategy.receive_snapshot(&view);
            debug!(tank = %id, "Intel delivered");
            report.push(BattleEvent::IntelDelivered { tank: id });
        }
    }

    fn phase_fire(&mut self, report: &mut StepReport) {
        for i in self.live_controllers() {
            let id = self.controllers[i].tank;
            if self.controllers[i].action != Action::Shoot {
                continue;
            }
            let fired = self.field.tank_mut(id).is_some_and(|t| t.fire());
            if !fired {
                self.controllers[i].ignored = true;
                continue;
            }
            if let Some(shell) = self.field.spawn_shell(id) {
                let position = self.field.tank(id).map(|t| t.position).unwrap_or_default();
                debug!(tank = %id, shell = %shell, %position, "Shell fired");
                report.push(BattleEvent::ShellFired {
                    tank: id,
                    shell,
                    position,
                });
            }
        }
    }

    /// Move every live shell one cell, then resolve each landing cell
    fn phase_shell_substep(&mut self, report: &mut StepReport) {
        let shells = self.field.live_shells();
        for &shell in &shells {
            self.field.advance_shell(shell);
        }
        for &shell in &shells {
            if let Some(collision) = resolve_shell(&mut self.field, shell) {
                debug!(?collision, "Shell collision");
                report.push(BattleEvent::Collision(collision));
            }
        }
        self.field.prune(&[EntityKind::Shell, EntityKind::Wall]);
    }

    fn phase_maneuvers(&mut self, report: &mut StepReport) {
        for i in self.live_controllers() {
            let action = self.controllers[i].action;
            if !action.is_maneuver() {
                continue;
            }
            let ignored = self.apply_maneuver(self.controllers[i].tank, action, report);
            self.controllers[i].ignored = ignored;
        }
    }

    /// Apply a movement, rotation or no-op; returns whether it was ignored
    fn apply_maneuver(&mut self, id: EntityId, action: Action, report: &mut StepReport) -> bool {
        let Some(tank) = self.field.tank_mut(id) else {
            return true;
        };

        // The automatic reverse supersedes whatever was chosen
        if tank.reverse_due() {
            return action != Action::RequestReverse;
        }

        match action {
            Action::MoveForward => match tank.move_forward() {
                ForwardMove::CancelledReverse => false,
                ForwardMove::Advance(target) => !self.field.move_tank(id, target),
            },
            Action::RequestReverse => match tank.request_reverse() {
                ReverseRequest::Queued => false,
                ReverseRequest::Rejected => true,
                ReverseRequest::Immediate => !self.reverse_tank(id, report),
            },
            Action::NoOp => {
                tank.forfeit_reverse_privilege();
                false
            }
            other => match other.rotation() {
                Some(rotation) => !tank.rotate(rotation),
                None => true,
            },
        }
    }

    /// Move a tank one cell backward and finish its reverse
    ///
    /// The state transition completes even when a wall blocks the move.
    /// Returns whether the tank actually moved.
    fn reverse_tank(&mut self, id: EntityId, report: &mut StepReport) -> bool {
        let Some(target) = self.field.tank(id).map(|t| t.backward_position()) else {
            return false;
        };
        let moved = self.field.move_tank(id, target);
        if let Some(tank) = self.field.tank_mut(id) {
            tank.complete_reverse();
        }
        debug!(tank = %id, blocked = !moved, "Reverse completed");
        report.push(BattleEvent::ReverseCompleted {
            tank: id,
            blocked: !moved,
        });
        moved
    }

    fn phase_auto_reverse(&mut self, report: &mut StepReport) {
        for i in self.live_controllers() {
            let id = self.controllers[i].tank;
            if self.field.tank(id).is_some_and(|t| t.reverse_due()) {
                self.reverse_tank(id, report);
            }
        }
    }

    fn phase_tank_collisions(&mut self, report: &mut StepReport) {
        for i in self.live_controllers() {
            for collision in resolve_tank(&mut self.field, self.controllers[i].tank) {
                debug!(?collision, "Tank collision");
                report.push(BattleEvent::Collision(collision));
            }
        }
        self.field.prune(&[EntityKind::Mine, EntityKind::Tank]);
    }

    fn phase_termination(&mut self, report: &mut StepReport) {
        let verdict = self
            .elimination_verdict()
            .or_else(|| self.shell_countdown(report));
        self.step += 1;
        let verdict = verdict.or_else(|| self.max_steps_verdict());

        if let Some(verdict) = verdict {
            info!(step = self.step, %verdict, "Battle ended");
            report.push(BattleEvent::BattleEnded(verdict));
            self.verdict = Some(verdict);
        }
    }

    fn elimination_verdict(&self) -> Option<Verdict> {
        let one = self.field.living_count(PlayerId::One);
        let two = self.field.living_count(PlayerId::Two);
        match (one, two) {
            (0, 0) => Some(Verdict::TieBothEliminated),
            (tanks_alive, 0) => Some(Verdict::PlayerWins {
                player: PlayerId::One,
                tanks_alive,
            }),
            (0, tanks_alive) => Some(Verdict::PlayerWins {
                player: PlayerId::Two,
                tanks_alive,
            }),
            _ => None,
        }
    }

    /// Tick the shared countdown while no living tank holds a shell
    fn shell_countdown(&mut self, report: &mut StepReport) -> Option<Verdict> {
        if self.field.total_shells_left() > 0 {
            return None;
        }
        let grace = self.config.shells_exhausted_grace;
        if self.shells_exhausted_left == grace {
            debug!(steps_left = grace, "All shells spent");
            report.push(BattleEvent::ShellsExhausted { steps_left: grace });
        }
        self.shells_exhausted_left = self.shells_exhausted_left.saturating_sub(1);
        (self.shells_exhausted_left == 0)
            .then_some(Verdict::TieShellsExhausted { grace_steps: grace })
    }

    fn max_steps_verdict(&self) -> Option<Verdict> {
        if self.step < self.config.max_steps {
            return None;
        }
        Some(Verdict::TieMaxSteps {
            max_steps: self.config.max_steps,
            player_one_tanks: self.field.living_count(PlayerId::One),
            player_two_tanks: self.field.living_count(PlayerId::Two),
        })
    }

    fn tank_reports(&self) -> Vec<TankStepReport> {
        self.report_order
            .iter()
            .map(|&i| {
                let c = &self.controllers[i];
                let player = self.field.tank(c.tank).map_or(PlayerId::One, |t| t.player);
                let outcome = if c.alive_at_start {
                    TankStepOutcome::Acted {
                        action: c.action,
                        ignored: c.ignored,
                        killed: !self.is_live(c.tank),
                    }
                } else {
                    TankStepOutcome::Dead
                };
                TankStepReport {
                    tank: c.tank,
                    player,
                    outcome,
                }
            })
            .collect()
    }
}
