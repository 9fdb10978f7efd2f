use crate::action::Action;
use cubespace_common::Face;
use cubespace_kernel::Move;
use std::collections::BTreeMap;

/// Key → action table.
///
/// Defaults: lowercase face letters turn clockwise, uppercase turn prime;
/// space toggles the spin, `c` cancels, `x` resets, `s` scrambles and `o`
/// asks for a solution.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    keys: BTreeMap<char, Action>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let mut keys = BTreeMap::new();
        for face in Face::ALL {
            let letter = face.letter();
            keys.insert(letter.to_ascii_lowercase(), Action::Turn(Move::clockwise(face)));
            keys.insert(letter, Action::Turn(Move::prime(face)));
        }
        keys.insert(' ', Action::ToggleSpin);
        keys.insert('c', Action::Cancel);
        keys.insert('x', Action::Reset);
        keys.insert('s', Action::Scramble);
        keys.insert('o', Action::Solve);
        Self { keys }
    }
}

impl KeyBindings {
    /// A table with nothing bound.
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
        }
    }

    pub fn action_for_key(&self, key: char) -> Action {
        self.keys.get(&key).copied().unwrap_or(Action::Noop)
    }

    /// Bind `key`, returning the action it replaced.
    pub fn bind(&mut self, key: char, action: Action) -> Option<Action> {
        tracing::debug!(?key, ?action, "key bound");
        self.keys.insert(key, action)
    }

    pub fn unbind(&mut self, key: char) -> Option<Action> {
        self.keys.remove(&key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Action)> + '_ {
        self.keys.iter().map(|(k, a)| (*k, *a))
    }

    /// Action for a manual move button labelled with a notation token such
    /// as `U'` or `R2`.
    pub fn action_for_button(token: &str) -> Action {
        token
            .trim()
            .parse::<Move>()
            .map(Action::Turn)
            .unwrap_or(Action::Noop)
    }

    /// The 18 manual move button labels, three per face.
    pub fn button_tokens() -> Vec<String> {
        Move::all().map(|mv| mv.to_string()).collect()
    }
}
