use super::*;
use crate::mdps::mdp::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridTile {
    Start,
    Empty,
    Obstacle,
    NegativeGoal,
    PositiveGoal,
}

impl GridTile {
    /// Reward for arriving on this tile.
    pub fn reward(&self) -> Continous {
        match self {
            GridTile::PositiveGoal => 1.,
            GridTile::NegativeGoal => -1.,
            _ => 0.,
        }
    }

    pub fn is_goal(&self) -> bool {
        matches!(self, GridTile::NegativeGoal | GridTile::PositiveGoal)
    }
}

impl Tile for GridTile {
    const AGENT: &'static str = "@@";

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '&' => Some(GridTile::Start),
            '.' => Some(GridTile::Empty),
            '#' => Some(GridTile::Obstacle),
            '£' => Some(GridTile::NegativeGoal),
            '$' => Some(GridTile::PositiveGoal),
            _ => None,
        }
    }

    /// Goals show their reward.
    fn glyph(&self) -> &'static str {
        match self {
            GridTile::Start | GridTile::Empty => "__",
            GridTile::Obstacle => "##",
            GridTile::NegativeGoal => "-1",
            GridTile::PositiveGoal => "+1",
        }
    }

    fn is_start(&self) -> bool {
        *self == GridTile::Start
    }
}

/// Deterministic grid with obstacles and signed goals.
///
/// Transitions are a pure function of the geometry and are computed per query
/// rather than cached. Arriving on a goal pays its reward; the goal then drains
/// into the absorbing state.
#[derive(Debug, Clone)]
pub struct GridWorld {
    world: Array2<GridTile>,
    episode: Episode,
}

impl GridWorld {
    pub const DEFAULT_GRID: [&'static str; 4] = ["&...", ".#.#", "...£", "#..$"];

    pub fn new<S: AsRef<str>>(grid: &[S], max_steps: usize) -> MdpResult<Self> {
        let world = parse_grid::<GridTile, _>(grid)?;
        let episode = Episode::new(start_distribution(&world)?, max_steps)?;

        Ok(Self { world, episode })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.world.dim()
    }

    pub fn tile(&self, s: Discrete) -> Option<GridTile> {
        let (_, cols) = self.world.dim();
        self.world.get(index_to_position(s, cols)).copied()
    }

    /// The single state reached with probability 1.
    fn destination(&self, state: Discrete, action: Discrete) -> Discrete {
        let (rows, cols) = self.world.dim();
        let tile = match self.tile(state) {
            None | Some(GridTile::Obstacle) => return state,
            Some(tile) => tile,
        };

        if tile.is_goal() {
            return self.absorbing_state();
        }

        offset(index_to_position(state, cols), ACTIONS[action], rows, cols)
            .filter(|&pos| self.world[pos] != GridTile::Obstacle)
            .map_or(state, |(r, c)| position_to_index(r, c, cols))
    }
}

impl Mdp for GridWorld {
    fn n_s(&self) -> usize {
        self.world.len() + 1
    }

    fn n_a(&self) -> usize {
        ACTIONS.len()
    }

    fn p(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        check_query(next_state, state, action, self.n_s(), self.n_a())?;
        Ok(if self.destination(state, action) == next_state {
            1.
        } else {
            0.
        })
    }

    fn r(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        let absorbing = self.absorbing_state();
        if self.p(next_state, state, action)? == 0. || state == absorbing || next_state == absorbing {
            return Ok(0.);
        }

        Ok(self.tile(next_state).map_or(0., |t| t.reward()))
    }
}

impl Environment for GridWorld {
    fn episode(&self) -> &Episode {
        &self.episode
    }

    fn episode_mut(&mut self) -> &mut Episode {
        &mut self.episode
    }

    fn render(&self, policy: Option<&[Discrete]>, value: Option<&[Continous]>) -> MdpResult<String> {
        render_grid("GridWorld", &self.world, self.state(), policy, value)
    }
}
