/// Index of a state or an action.
pub type Discrete = usize;

/// Probabilities, rewards and values.
pub type Continous = f64;

/// The four grid moves, in action-index order.
pub const ACTIONS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Single letter used when rendering each action of [`ACTIONS`].
pub const ACTION_LABELS: [char; 4] = ['u', 'd', 'l', 'r'];

pub trait Policy {
    fn policy(&self, s: Discrete) -> Option<Discrete>;
}

/// A tabular policy is its own lookup.
impl Policy for [Discrete] {
    fn policy(&self, s: Discrete) -> Option<Discrete> {
        self.get(s).copied()
    }
}

impl Policy for Vec<Discrete> {
    fn policy(&self, s: Discrete) -> Option<Discrete> {
        self.as_slice().policy(s)
    }
}
