//! Optimistic like toggling for a single post.
//!
//! A toggle applies a [`Transition`] locally before the request is sent.
//! When the server answers, its `(liked, count)` pair replaces whatever is
//! shown. When it refuses, the inverse transition is applied, which lands
//! back on the pre-toggle display. While a toggle is in flight further
//! toggles for the same post are ignored, so responses can never be
//! reconciled out of order. The mount-time count only applies to a post
//! that has never been toggled.

use shutter_shared::LikeStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LikeState {
    #[default]
    Unliked,
    Liked,
}

impl LikeState {
    pub fn is_liked(self) -> bool {
        self == LikeState::Liked
    }

    fn from_liked(liked: bool) -> Self {
        if liked {
            LikeState::Liked
        } else {
            LikeState::Unliked
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Like,
    Unlike,
}

impl Transition {
    pub fn inverse(self) -> Self {
        match self {
            Transition::Like => Transition::Unlike,
            Transition::Unlike => Transition::Like,
        }
    }

    fn target(self) -> LikeState {
        match self {
            Transition::Like => LikeState::Liked,
            Transition::Unlike => LikeState::Unliked,
        }
    }

    fn delta(self) -> i64 {
        match self {
            Transition::Like => 1,
            Transition::Unlike => -1,
        }
    }
}

/// What the button shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeDisplay {
    pub state: LikeState,
    pub count: i64,
}

impl LikeDisplay {
    pub fn new(liked: bool, count: i64) -> Self {
        Self {
            state: LikeState::from_liked(liked),
            count,
        }
    }

    fn toggle_transition(&self) -> Transition {
        match self.state {
            LikeState::Unliked => Transition::Like,
            LikeState::Liked => Transition::Unlike,
        }
    }

    fn apply(&mut self, transition: Transition) {
        self.state = transition.target();
        self.count += transition.delta();
    }
}

impl From<LikeStatus> for LikeDisplay {
    fn from(status: LikeStatus) -> Self {
        Self::new(status.liked, status.count)
    }
}

/// Per-post like state plus the toggle currently awaiting the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LikeTracker {
    display: LikeDisplay,
    in_flight: Option<Transition>,
    touched: bool,
}

impl LikeTracker {
    pub fn new(display: LikeDisplay) -> Self {
        Self {
            display,
            in_flight: None,
            touched: false,
        }
    }

    pub fn display(&self) -> LikeDisplay {
        self.display
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Count loaded from the server for a post nobody has toggled yet.
    /// Ignored once a toggle has started: the toggle's answer wins even if
    /// the count arrives after it.
    pub fn load_count(&mut self, count: i64) {
        if !self.touched {
            self.display.count = count;
        }
    }

    /// Apply the optimistic flip. `None` when a toggle is already in flight.
    pub fn begin_toggle(&mut self) -> Option<Transition> {
        if self.in_flight.is_some() {
            return None;
        }
        let transition = self.display.toggle_transition();
        self.display.apply(transition);
        self.in_flight = Some(transition);
        self.touched = true;
        Some(transition)
    }

    /// The server accepted the toggle; its answer is authoritative.
    pub fn reconcile(&mut self, status: LikeStatus) {
        self.display = status.into();
        self.in_flight = None;
    }

    /// The server refused the toggle; undo the optimistic flip.
    pub fn roll_back(&mut self) {
        if let Some(transition) = self.in_flight.take() {
            self.display.apply(transition.inverse());
        }
    }

    /// The request never got an answer. The optimistic display stays as is.
    pub fn abandon(&mut self) {
        self.in_flight = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker(liked: bool, count: i64) -> LikeTracker {
        LikeTracker::new(LikeDisplay::new(liked, count))
    }

    #[test]
    fn toggle_then_server_agrees() {
        let mut t = tracker(false, 3);
        assert_eq!(t.begin_toggle(), Some(Transition::Like));
        assert_eq!(t.display(), LikeDisplay::new(true, 4));

        t.reconcile(LikeStatus {
            liked: true,
            count: 4,
        });
        assert_eq!(t.display(), LikeDisplay::new(true, 4));
        assert!(!t.is_pending());
    }

    #[test]
    fn toggle_then_server_refuses() {
        let mut t = tracker(false, 3);
        t.begin_toggle();
        assert_eq!(t.display(), LikeDisplay::new(true, 4));

        t.roll_back();
        assert_eq!(t.display(), LikeDisplay::new(false, 3));
        assert!(!t.is_pending());
    }

    #[test]
    fn unlike_rolls_back_to_liked() {
        let mut t = tracker(true, 10);
        assert_eq!(t.begin_toggle(), Some(Transition::Unlike));
        assert_eq!(t.display(), LikeDisplay::new(false, 9));

        t.roll_back();
        assert_eq!(t.display(), LikeDisplay::new(true, 10));
    }

    #[test]
    fn server_pair_overrides_optimistic_guess() {
        // Someone else liked the post meanwhile.
        let mut t = tracker(false, 3);
        t.begin_toggle();
        t.reconcile(LikeStatus {
            liked: true,
            count: 6,
        });
        assert_eq!(t.display(), LikeDisplay::new(true, 6));

        // Server says the viewer had in fact already liked it.
        let mut t = tracker(false, 3);
        t.begin_toggle();
        t.reconcile(LikeStatus {
            liked: false,
            count: 2,
        });
        assert_eq!(t.display(), LikeDisplay::new(false, 2));
    }

    #[test]
    fn toggles_while_pending_are_ignored() {
        let mut t = tracker(false, 3);
        assert!(t.begin_toggle().is_some());
        assert_eq!(t.begin_toggle(), None);
        assert_eq!(t.begin_toggle(), None);
        assert_eq!(t.display(), LikeDisplay::new(true, 4));

        t.roll_back();
        assert_eq!(t.display(), LikeDisplay::new(false, 3));
    }

    #[test]
    fn network_failure_keeps_optimistic_display() {
        let mut t = tracker(false, 3);
        t.begin_toggle();
        t.abandon();
        assert_eq!(t.display(), LikeDisplay::new(true, 4));
        assert!(!t.is_pending());

        // Nothing in flight, so a stray rollback is a no-op.
        t.roll_back();
        assert_eq!(t.display(), LikeDisplay::new(true, 4));
    }

    #[test]
    fn successful_sequences_end_on_last_server_pair() {
        let replies = [
            LikeStatus { liked: true, count: 1 },
            LikeStatus { liked: false, count: 0 },
            LikeStatus { liked: true, count: 5 },
            LikeStatus { liked: false, count: 4 },
        ];
        let mut t = tracker(false, 0);
        for reply in replies {
            t.begin_toggle();
            t.reconcile(reply);
            assert_eq!(t.display(), LikeDisplay::from(reply));
        }
    }

    #[test]
    fn failed_toggles_restore_previous_display() {
        for (liked, count) in [(false, 0), (false, 3), (true, 1), (true, 42)] {
            let mut t = tracker(liked, count);
            let before = t.display();
            t.begin_toggle();
            assert_ne!(t.display(), before);
            t.roll_back();
            assert_eq!(t.display(), before);
        }
    }

    #[test]
    fn load_count_defers_to_pending_toggle() {
        let mut t = tracker(false, 0);
        t.load_count(7);
        assert_eq!(t.display(), LikeDisplay::new(false, 7));

        t.begin_toggle();
        t.load_count(7);
        assert_eq!(t.display(), LikeDisplay::new(true, 8));
    }

    #[test]
    fn late_count_does_not_overwrite_reconciled_pair() {
        let mut t = tracker(false, 0);
        t.begin_toggle();
        t.reconcile(LikeStatus {
            liked: true,
            count: 4,
        });

        t.load_count(3);

        assert!(!t.is_pending());
        assert_eq!(t.display(), LikeDisplay::new(true, 4));
    }

    #[test]
    fn late_count_after_rollback_or_abandon_is_ignored() {
        let mut rolled = tracker(false, 2);
        rolled.begin_toggle();
        rolled.roll_back();
        rolled.load_count(9);
        assert_eq!(rolled.display(), LikeDisplay::new(false, 2));

        let mut abandoned = tracker(false, 2);
        abandoned.begin_toggle();
        abandoned.abandon();
        abandoned.load_count(9);
        assert_eq!(abandoned.display(), LikeDisplay::new(true, 3));
    }

    #[test]
    fn inverse_is_involutive() {
        for transition in [Transition::Like, Transition::Unlike] {
            assert_ne!(transition.inverse(), transition);
            assert_eq!(transition.inverse().inverse(), transition);
        }
    }
}
