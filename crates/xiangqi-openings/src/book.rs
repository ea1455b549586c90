//! Opening book storage and lookup.

use std::collections::HashMap;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use xiangqi_core::{Move, Position};

/// Plies after which the book is no longer consulted.
pub const DEFAULT_MAX_PLIES: usize = 6;

/// Errors that can occur when loading an opening book.
#[derive(Debug, Error)]
pub enum BookError {
    /// Failed to read the book file.
    #[error("failed to read opening book: {0}")]
    IoError(#[from] std::io::Error),

    /// The book is not valid JSON or has the wrong shape.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A candidate reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookMove {
    /// Coordinate key of the reply (`"fr,fc,tr,tc"`).
    #[serde(rename = "move")]
    pub key: String,
    /// Relative selection weight.
    #[serde(default = "default_weight")]
    pub weight: u32,
}

fn default_weight() -> u32 {
    1
}

fn default_max_plies() -> usize {
    DEFAULT_MAX_PLIES
}

impl BookMove {
    #[must_use]
    pub fn new(key: impl Into<String>, weight: u32) -> Self {
        Self {
            key: key.into(),
            weight,
        }
    }

    /// The reply's `(from, to)` points, or `None` if the key is malformed.
    #[must_use]
    pub fn points(&self) -> Option<(Position, Position)> {
        Move::parse_coordinates(&self.key)
    }
}

/// Joins a move history into a book key.
pub fn history_key<S: AsRef<str>>(history: &[S]) -> String {
    history
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps move histories to candidate replies.
///
/// Lookups never fail: an unknown history, a history past
/// [`max_plies`](Self::max_plies) or a malformed entry all mean "no
/// suggestion".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpeningBook {
    #[serde(default = "default_max_plies")]
    max_plies: usize,
    positions: HashMap<String, Vec<BookMove>>,
}

impl Default for OpeningBook {
    fn default() -> Self {
        Self {
            max_plies: DEFAULT_MAX_PLIES,
            positions: HashMap::new(),
        }
    }
}

impl OpeningBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets how many plies the book is consulted for.
    #[must_use]
    pub fn with_max_plies(mut self, max_plies: usize) -> Self {
        self.max_plies = max_plies;
        self
    }

    #[must_use]
    pub fn max_plies(&self) -> usize {
        self.max_plies
    }

    /// Number of histories with replies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Adds candidate replies for a history key, replacing earlier ones.
    pub fn add_position(&mut self, history_key: impl Into<String>, moves: Vec<BookMove>) {
        self.positions.insert(history_key.into(), moves);
    }

    /// Looks up the candidates for a history key.
    #[must_use]
    pub fn lookup(&self, history_key: &str) -> Option<&[BookMove]> {
        self.positions.get(history_key).map(Vec::as_slice)
    }

    /// Picks a candidate reply for `history`, weighted by the candidates'
    /// weights.
    pub fn suggest<S, R>(&self, history: &[S], rng: &mut R) -> Option<(Position, Position)>
    where
        S: AsRef<str>,
        R: Rng,
    {
        if history.len() >= self.max_plies {
            return None;
        }

        let key = history_key(history);
        let candidates = self.lookup(&key)?;
        let chosen = select_weighted(candidates, rng)?;

        let points = chosen.points();
        if points.is_none() {
            debug!(history = %key, entry = %chosen.key, "malformed book entry");
        }
        points
    }

    /// Finds the legal move with the suggested points.
    ///
    /// The suggestion only names points; piece and capture come from the
    /// matching legal move.
    #[must_use]
    pub fn reconcile(candidate: (Position, Position), legal_moves: &[Move]) -> Option<Move> {
        let (from, to) = candidate;
        legal_moves
            .iter()
            .find(|m| m.from == from && m.to == to)
            .copied()
    }

    /// Suggests and reconciles in one step.
    pub fn pick<S, R>(&self, history: &[S], legal_moves: &[Move], rng: &mut R) -> Option<Move>
    where
        S: AsRef<str>,
        R: Rng,
    {
        let candidate = self.suggest(history, rng)?;
        let found = Self::reconcile(candidate, legal_moves);
        match found {
            Some(m) => debug!(plies = history.len(), book_move = %m.coordinate_key(), "book move"),
            None => debug!(
                plies = history.len(),
                "book move {},{} -> {},{} is not legal here",
                candidate.0.row,
                candidate.0.col,
                candidate.1.row,
                candidate.1.col
            ),
        }
        found
    }

    /// Parses a book from JSON.
    ///
    /// ```
    /// use xiangqi_openings::OpeningBook;
    ///
    /// let book = OpeningBook::from_json(
    ///     r#"{"positions": {"": [{"move": "7,1,7,4", "weight": 3}]}}"#,
    /// ).unwrap();
    /// assert_eq!(book.len(), 1);
    /// assert_eq!(book.max_plies(), 6);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, BookError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a book from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, BookError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Serializes the book to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, BookError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Weighted random choice. All-zero weights fall back to a uniform choice.
fn select_weighted<'a, R: Rng>(moves: &'a [BookMove], rng: &mut R) -> Option<&'a BookMove> {
    if moves.is_empty() {
        return None;
    }

    let total_weight: u64 = moves.iter().map(|m| u64::from(m.weight)).sum();
    if total_weight == 0 {
        return moves.choose(rng);
    }

    let mut choice = rng.gen_range(0..total_weight);
    for mv in moves {
        let weight = u64::from(mv.weight);
        if choice < weight {
            return Some(mv);
        }
        choice -= weight;
    }

    moves.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use xiangqi_core::{Color, Piece, PieceKind};

    fn book() -> OpeningBook {
        let mut book = OpeningBook::new();
        book.add_position("", vec![BookMove::new("7,1,7,4", 1)]);
        book.add_position("7,1,7,4", vec![BookMove::new("0,7,2,6", 1)]);
        book
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn history_keys_join_with_spaces() {
        assert_eq!(history_key::<&str>(&[]), "");
        assert_eq!(history_key(&["7,1,7,4", "0,7,2,6"]), "7,1,7,4 0,7,2,6");
    }

    #[test]
    fn suggest_follows_history() {
        let book = book();
        let empty: [&str; 0] = [];
        assert_eq!(
            book.suggest(&empty, &mut rng()),
            Some((Position::new(7, 1), Position::new(7, 4)))
        );
        assert_eq!(
            book.suggest(&["7,1,7,4"], &mut rng()),
            Some((Position::new(0, 7), Position::new(2, 6)))
        );
        assert_eq!(book.suggest(&["9,0,8,0"], &mut rng()), None);
    }

    #[test]
    fn suggest_stops_after_max_plies() {
        let mut book = OpeningBook::new().with_max_plies(2);
        let history = ["7,1,7,4", "0,7,2,6"];
        book.add_position(history_key(&history), vec![BookMove::new("9,1,7,2", 1)]);
        assert_eq!(book.suggest(&history, &mut rng()), None);

        let book = book.with_max_plies(3);
        assert!(book.suggest(&history, &mut rng()).is_some());
    }

    #[test]
    fn malformed_entries_give_no_suggestion() {
        let mut book = OpeningBook::new();
        book.add_position("", vec![BookMove::new("7,1,7", 1)]);
        book.add_position("x", vec![BookMove::new("7,1,12,4", 1)]);
        book.add_position("y", vec![]);
        let empty: [&str; 0] = [];
        assert_eq!(book.suggest(&empty, &mut rng()), None);
        assert_eq!(book.suggest(&["x"], &mut rng()), None);
        assert_eq!(book.suggest(&["y"], &mut rng()), None);
    }

    #[test]
    fn reconcile_takes_the_legal_move() {
        let from = Position::new(7, 1);
        let to = Position::new(7, 4);
        let cannon = Piece::new(PieceKind::Cannon, Color::Red, from);
        let legal = [
            Move::new(Position::new(9, 0), Position::new(8, 0), cannon, None),
            Move::new(from, to, cannon, None),
        ];
        assert_eq!(OpeningBook::reconcile((from, to), &legal), Some(legal[1]));
        assert_eq!(OpeningBook::reconcile((to, from), &legal), None);
    }

    #[test]
    fn weights_bias_selection() {
        let moves = [BookMove::new("a", 0), BookMove::new("b", 5)];
        let mut rng = rng();
        for _ in 0..50 {
            assert_eq!(select_weighted(&moves, &mut rng).unwrap().key, "b");
        }

        let zero = [BookMove::new("a", 0), BookMove::new("b", 0)];
        assert!(select_weighted(&zero, &mut rng).is_some());
        assert!(select_weighted(&[], &mut rng).is_none());
    }

    #[test]
    fn json_roundtrip() {
        let book = book().with_max_plies(4);
        let json = book.to_json().unwrap();
        assert_eq!(OpeningBook::from_json(&json).unwrap(), book);
    }

    #[test]
    fn json_defaults() {
        let book = OpeningBook::from_json(r#"{"positions": {"": [{"move": "7,1,7,4"}]}}"#).unwrap();
        assert_eq!(book.max_plies(), DEFAULT_MAX_PLIES);
        assert_eq!(book.lookup("").unwrap()[0].weight, 1);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            OpeningBook::from_json("{\"positions\": 3}"),
            Err(BookError::JsonError(_))
        ));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, book().to_json().unwrap()).unwrap();
        assert_eq!(OpeningBook::load(&path).unwrap(), book());

        assert!(matches!(
            OpeningBook::load(dir.path().join("missing.json")),
            Err(BookError::IoError(_))
        ));
    }
}
