use super::*;
use crate::mdps::mdp::*;
use ndarray::{s, Array3};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LakeTile {
    Start,
    Frozen,
    Hole,
    Goal,
}

impl LakeTile {
    /// Holes and the goal route every action into the absorbing state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LakeTile::Hole | LakeTile::Goal)
    }
}

impl Tile for LakeTile {
    const AGENT: &'static str = "@";

    fn from_symbol(c: char) -> Option<Self> {
        match c {
            '&' => Some(LakeTile::Start),
            '.' => Some(LakeTile::Frozen),
            '#' => Some(LakeTile::Hole),
            '$' => Some(LakeTile::Goal),
            _ => None,
        }
    }

    fn glyph(&self) -> &'static str {
        match self {
            LakeTile::Start => "&",
            LakeTile::Frozen => ".",
            LakeTile::Hole => "#",
            LakeTile::Goal => "$",
        }
    }

    fn is_start(&self) -> bool {
        *self == LakeTile::Start
    }
}

/// Slippery grid: with probability `slip` the move is drawn uniformly from all
/// four directions instead of the intended one.
///
/// The reward of 1 is paid when *leaving* the goal, on its transition into the
/// absorbing state.
#[derive(Debug, Clone)]
pub struct FrozenLake {
    lake: Array2<LakeTile>,
    slip: Continous,
    p: Array3<Continous>,
    episode: Episode,
}

impl FrozenLake {
    pub const SMALL_LAKE: [&'static str; 4] = ["&...", ".#.#", "...#", "#..$"];

    pub const BIG_LAKE: [&'static str; 8] = [
        "&.......", "........", "...#....", ".....#..", "...#....", ".##...#.", ".#..#.#.",
        "...#...$",
    ];

    pub fn new<S: AsRef<str>>(lake: &[S], slip: Continous, max_steps: usize) -> MdpResult<Self> {
        if !(0. ..=1.).contains(&slip) {
            return Err(MdpError::Config(format!("slip {slip} is not in [0, 1]")));
        }

        let lake = parse_grid::<LakeTile, _>(lake)?;
        let episode = Episode::new(start_distribution(&lake)?, max_steps)?;
        let p = Self::populate_probabilities(&lake, slip);

        Ok(Self {
            lake,
            slip,
            p,
            episode,
        })
    }

    pub fn slip(&self) -> Continous {
        self.slip
    }

    pub fn shape(&self) -> (usize, usize) {
        self.lake.dim()
    }

    pub fn tile(&self, s: Discrete) -> Option<LakeTile> {
        let (_, cols) = self.lake.dim();
        self.lake.get(index_to_position(s, cols)).copied()
    }

    fn populate_probabilities(lake: &Array2<LakeTile>, slip: Continous) -> Array3<Continous> {
        let (rows, cols) = lake.dim();
        let n_s = lake.len() + 1;
        let n_a = ACTIONS.len();
        let absorbing = n_s - 1;

        let mut p = Array3::zeros((n_s, n_a, n_s));
        for s in 0..n_s {
            let pos = index_to_position(s, cols);
            if s == absorbing || lake[pos].is_terminal() {
                p.slice_mut(s![s, .., absorbing]).fill(1.);
                continue;
            }

            for a in 0..n_a {
                for (slip_a, &delta) in ACTIONS.iter().enumerate() {
                    let next = offset(pos, delta, rows, cols)
                        .map_or(s, |(r, c)| position_to_index(r, c, cols));

                    p[[s, a, next]] += slip / n_a as Continous;
                    if a == slip_a {
                        p[[s, a, next]] += 1. - slip;
                    }
                }
            }
        }

        p
    }

    fn reward(&self, next_state: Discrete, state: Discrete, action: Discrete) -> Continous {
        if self.p[[state, action, next_state]] == 0. || state == self.absorbing_state() {
            0.
        } else if self.tile(state) == Some(LakeTile::Goal) {
            1.
        } else {
            0.
        }
    }
}

impl Mdp for FrozenLake {
    fn n_s(&self) -> usize {
        self.lake.len() + 1
    }

    fn n_a(&self) -> usize {
        ACTIONS.len()
    }

    fn p(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        check_query(next_state, state, action, self.n_s(), self.n_a())?;
        Ok(self.p[[state, action, next_state]])
    }

    fn r(&self, next_state: Discrete, state: Discrete, action: Discrete) -> MdpResult<Continous> {
        check_query(next_state, state, action, self.n_s(), self.n_a())?;
        Ok(self.reward(next_state, state, action))
    }

    fn prob_rewards(&self) -> MdpResult<(Array3<Continous>, Array3<Continous>)> {
        let r = Array3::from_shape_fn(self.p.dim(), |(s, a, ns)| self.reward(ns, s, a));
        Ok((self.p.clone(), r))
    }
}

impl Environment for FrozenLake {
    fn episode(&self) -> &Episode {
        &self.episode
    }

    fn episode_mut(&mut self) -> &mut Episode {
        &mut self.episode
    }

    fn render(&self, policy: Option<&[Discrete]>, value: Option<&[Continous]>) -> MdpResult<String> {
        render_grid("FrozenLake", &self.lake, self.state(), policy, value)
    }
}
