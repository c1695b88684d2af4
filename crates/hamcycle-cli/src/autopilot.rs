//! Headless snake that steers by the Hamiltonian cycle.

use hamcycle_core::{Cell, CycleConfig, CycleEngine, CycleError, HamiltonianCycle, SuccessorGraph};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tracing::{debug, info};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the (row, col) delta for moving in this direction
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Direction of a single step from `from` to `to`
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        let delta = (
            to.row as isize - from.row as isize,
            to.col as isize - from.col as isize,
        );
        [Direction::Up, Direction::Down, Direction::Left, Direction::Right]
            .into_iter()
            .find(|dir| dir.delta() == delta)
    }

    /// Cell one step away, or `None` past the top or left edge
    pub fn step(&self, from: Cell) -> Option<Cell> {
        let (dr, dc) = self.delta();
        Some(Cell::new(
            from.row.checked_add_signed(dr)?,
            from.col.checked_add_signed(dc)?,
        ))
    }
}

/// Picks moves from a cycle, switching to the corner detour when needed
#[derive(Debug, Clone)]
pub struct Autopilot {
    cycle: Arc<HamiltonianCycle>,
}

impl Autopilot {
    pub fn new(cycle: Arc<HamiltonianCycle>) -> Self {
        Self { cycle }
    }

    pub fn cycle(&self) -> &HamiltonianCycle {
        &self.cycle
    }

    /// Graph to follow: the detour while the head or the food is on the excluded corner.
    ///
    /// A head sitting on the cell the detour skips stays on the main cycle for
    /// one more step.
    pub fn route(&self, head: Cell, food: Option<Cell>) -> &SuccessorGraph {
        if let (Some(corner), Some(detour)) = (self.cycle.excluded(), self.cycle.corner_detour()) {
            if head == corner || (food == Some(corner) && detour.contains(head)) {
                return detour;
            }
        }
        self.cycle.graph()
    }

    pub fn next_move(&self, head: Cell, food: Option<Cell>) -> Option<Direction> {
        let next = self.route(head, food).successor(head)?;
        Direction::between(head, next)
    }
}

/// Cycles keyed by everything that shapes them, built once per key
#[derive(Debug, Default)]
pub struct CycleCache {
    engine: CycleEngine,
    cycles: HashMap<CycleKey, Arc<HamiltonianCycle>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CycleKey {
    rows: usize,
    cols: usize,
    max_block_size: usize,
    shuffle: bool,
    excludes_corner: bool,
}

impl CycleCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&mut self, config: &CycleConfig) -> Result<Arc<HamiltonianCycle>, CycleError> {
        let key = CycleKey {
            rows: config.rows,
            cols: config.cols,
            max_block_size: config.max_block_size,
            shuffle: config.shuffle,
            excludes_corner: config.excludes_corner(),
        };
        if let Some(cycle) = self.cycles.get(&key) {
            debug!(rows = key.rows, cols = key.cols, "reusing cached cycle");
            return Ok(Arc::clone(cycle));
        }
        let cycle = Arc::new(self.engine.build(config)?);
        self.cycles.insert(key, Arc::clone(&cycle));
        Ok(cycle)
    }

    pub fn len(&self) -> usize {
        self.cycles.len()
    }
}

/// Why a game stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The snake covers every cell the cycle reaches
    Filled,
    /// Step cap reached first
    StepLimit,
    /// The head ran into the body or off the board
    Crashed(Cell),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameReport {
    pub score: usize,
    pub steps: usize,
    pub length: usize,
    pub outcome: Outcome,
}

const START_LENGTH: usize = 3;

/// Snake body (head first) plus food on one board
#[derive(Debug, Clone)]
pub struct Game {
    rows: usize,
    cols: usize,
    body: VecDeque<Cell>,
    occupied: HashSet<Cell>,
    food: Option<Cell>,
    score: usize,
    steps: usize,
    rng: StdRng,
}

impl Game {
    /// Lay the snake along the cycle with its head nearest the board centre
    pub fn new(autopilot: &Autopilot, seed: Option<u64>) -> Self {
        let cycle = autopilot.cycle();
        let graph = cycle.graph();
        let centre = Cell::new(cycle.rows() / 2, cycle.cols() / 2);
        let head = if graph.contains(centre) {
            centre
        } else {
            graph.order()[0]
        };

        let mut body = VecDeque::with_capacity(graph.len());
        let mut cell = head;
        for _ in 0..START_LENGTH.min(graph.len()) {
            body.push_back(cell);
            match graph.predecessor(cell) {
                Some(prev) => cell = prev,
                None => break,
            }
        }

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut game = Self {
            rows: cycle.rows(),
            cols: cycle.cols(),
            occupied: body.iter().copied().collect(),
            body,
            food: None,
            score: 0,
            steps: 0,
            rng,
        };
        game.place_food();
        game
    }

    pub fn head(&self) -> Cell {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    fn place_food(&mut self) {
        let free: Vec<Cell> = (0..self.rows)
            .flat_map(|row| (0..self.cols).map(move |col| Cell::new(row, col)))
            .filter(|cell| !self.occupied.contains(cell))
            .collect();
        self.food = free.choose(&mut self.rng).copied();
    }

    /// Move one cell; `Err` holds the cell the head crashed into
    pub fn advance(&mut self, direction: Direction) -> Result<(), Cell> {
        let head = self.head();
        let next = match direction.step(head) {
            Some(cell) if cell.row < self.rows && cell.col < self.cols => cell,
            _ => return Err(head),
        };
        self.steps += 1;

        let eating = self.food == Some(next);
        if !eating {
            if let Some(tail) = self.body.pop_back() {
                self.occupied.remove(&tail);
            }
        }
        if !self.occupied.insert(next) {
            return Err(next);
        }
        self.body.push_front(next);

        if eating {
            self.score += 1;
            self.place_food();
        }
        Ok(())
    }

    /// Follow the autopilot until the board is full or `max_steps` have passed
    pub fn play(&mut self, autopilot: &Autopilot, max_steps: usize) -> GameReport {
        let capacity = autopilot.cycle().len();
        let outcome = loop {
            if self.len() >= capacity || self.food.is_none() {
                break Outcome::Filled;
            }
            if self.steps >= max_steps {
                break Outcome::StepLimit;
            }
            let head = self.head();
            let Some(direction) = autopilot.next_move(head, self.food) else {
                break Outcome::Crashed(head);
            };
            if let Err(cell) = self.advance(direction) {
                break Outcome::Crashed(cell);
            }
        };

        let report = GameReport {
            score: self.score,
            steps: self.steps,
            length: self.len(),
            outcome,
        };
        info!(
            score = report.score,
            steps = report.steps,
            outcome = ?report.outcome,
            "game over"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn autopilot(config: &CycleConfig) -> Autopilot {
        Autopilot::new(Arc::new(HamiltonianCycle::build(config).unwrap()))
    }

    #[test]
    fn test_direction_from_cells() {
        let c = Cell::new(2, 2);
        assert_eq!(Direction::between(c, Cell::new(1, 2)), Some(Direction::Up));
        assert_eq!(Direction::between(c, Cell::new(3, 2)), Some(Direction::Down));
        assert_eq!(Direction::between(c, Cell::new(2, 1)), Some(Direction::Left));
        assert_eq!(Direction::between(c, Cell::new(2, 3)), Some(Direction::Right));
        assert_eq!(Direction::between(c, Cell::new(3, 3)), None);
        assert_eq!(Direction::Up.step(Cell::ORIGIN), None);
        assert_eq!(Direction::Right.step(Cell::ORIGIN), Some(Cell::new(0, 1)));
    }

    #[test]
    fn test_next_move_follows_successor() {
        let pilot = autopilot(&CycleConfig::new(4, 6).seed(1));
        for &cell in pilot.cycle().graph().order() {
            let dir = pilot.next_move(cell, None).unwrap();
            assert_eq!(dir.step(cell), pilot.cycle().successor(cell));
        }
    }

    #[test]
    fn test_autopilot_fills_the_board() {
        let pilot = autopilot(&CycleConfig::new(6, 6).max_block_size(8).seed(4));
        let mut game = Game::new(&pilot, Some(10));
        let report = game.play(&pilot, 100_000);
        assert_eq!(report.outcome, Outcome::Filled);
        assert_eq!(report.length, 36);
        assert_eq!(report.score, 36 - START_LENGTH);
    }

    #[test]
    fn test_step_limit() {
        let pilot = autopilot(&CycleConfig::new(8, 8).seed(2));
        let mut game = Game::new(&pilot, Some(1));
        let report = game.play(&pilot, 5);
        assert_eq!(report.outcome, Outcome::StepLimit);
        assert_eq!(report.steps, 5);
    }

    #[test]
    fn test_detour_is_taken_for_corner_food() {
        use hamcycle_core::OddGridPolicy;

        let pilot = autopilot(
            &CycleConfig::new(5, 5)
                .odd_grid(OddGridPolicy::ExcludeCorner)
                .seed(3),
        );
        let elbow_entry = Cell::new(1, 0);
        assert_eq!(pilot.next_move(elbow_entry, None), Some(Direction::Right));
        assert_eq!(pilot.next_move(elbow_entry, Some(Cell::ORIGIN)), Some(Direction::Up));
        assert_eq!(pilot.next_move(Cell::ORIGIN, None), Some(Direction::Right));
    }

    #[test]
    fn test_corner_game_fills_every_cell_but_one() {
        use hamcycle_core::OddGridPolicy;

        let pilot = autopilot(
            &CycleConfig::new(5, 7)
                .max_block_size(8)
                .odd_grid(OddGridPolicy::ExcludeCorner)
                .seed(6),
        );
        let mut game = Game::new(&pilot, Some(21));
        let report = game.play(&pilot, 200_000);
        assert_eq!(report.outcome, Outcome::Filled);
        assert_eq!(report.length, 34);
    }

    #[test]
    fn test_cache_builds_once_per_grid() {
        let mut cache = CycleCache::new();
        let config = CycleConfig::new(6, 6).seed(5);
        let first = cache.get_or_build(&config).unwrap();
        let second = cache.get_or_build(&config.clone().seed(99)).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        cache.get_or_build(&CycleConfig::new(6, 8)).unwrap();
        assert_eq!(cache.len(), 2);
    }
}
