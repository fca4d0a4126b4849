//! Per-slide enter/exit markers for directional slide transitions.
//!
//! The animator never animates anything itself. It flips markers that the
//! renderer turns into motion, and hands out one [`CompletionTicket`] per
//! participating slide. The renderer returns each ticket exactly once, when
//! that slide's animation has finished.

use super::state::Direction;

/// Transition phase of a single slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Entering(Direction),
    Exiting(Direction),
}

/// Marker set the renderer reads for one slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlideMarkers {
    pub active: bool,
    pub interactive: bool,
    pub phase: Phase,
}

impl SlideMarkers {
    fn shown() -> Self {
        Self {
            active: true,
            interactive: true,
            phase: Phase::Idle,
        }
    }

    pub fn is_animating(&self) -> bool {
        self.phase != Phase::Idle
    }
}

/// Class names the markers map onto.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct MarkerClasses {
    pub active: String,
    pub enter_forward: String,
    pub enter_backward: String,
    pub exit_forward: String,
    pub exit_backward: String,
}

impl Default for MarkerClasses {
    fn default() -> Self {
        Self {
            active: "is-active".to_string(),
            enter_forward: "enter-forward".to_string(),
            enter_backward: "enter-backward".to_string(),
            exit_forward: "exit-forward".to_string(),
            exit_backward: "exit-backward".to_string(),
        }
    }
}

impl MarkerClasses {
    pub fn for_markers(&self, markers: &SlideMarkers) -> Vec<&str> {
        let mut classes = Vec::new();
        if markers.active {
            classes.push(self.active.as_str());
        }
        match markers.phase {
            Phase::Idle => {}
            Phase::Entering(Direction::Forward) => classes.push(self.enter_forward.as_str()),
            Phase::Entering(Direction::Backward) => classes.push(self.enter_backward.as_str()),
            Phase::Exiting(Direction::Forward) => classes.push(self.exit_forward.as_str()),
            Phase::Exiting(Direction::Backward) => classes.push(self.exit_backward.as_str()),
        }
        classes
    }
}

/// One-shot completion signal for one slide of one transition.
///
/// Not `Clone`: handing it back to [`TransitionAnimator::complete`] consumes it.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a ticket must be returned when the slide's animation ends"]
pub struct CompletionTicket {
    generation: u64,
    slide: usize,
}

impl CompletionTicket {
    pub fn slide(&self) -> usize {
        self.slide
    }
}

#[derive(Debug, Clone)]
pub struct TransitionAnimator {
    markers: Vec<SlideMarkers>,
    generation: u64,
    /// Slides of the latest generation still waiting for their ticket.
    in_flight: Vec<usize>,
    /// Set while every slide is shown at once (overview).
    suspended: bool,
}

impl TransitionAnimator {
    pub fn new(slide_count: usize, current: usize) -> Self {
        let mut animator = Self {
            markers: vec![SlideMarkers::default(); slide_count],
            generation: 0,
            in_flight: Vec::new(),
            suspended: false,
        };
        animator.settle(current);
        animator
    }

    pub fn markers(&self) -> &[SlideMarkers] {
        &self.markers
    }

    pub fn marker(&self, slide: usize) -> Option<&SlideMarkers> {
        self.markers.get(slide)
    }

    /// Start a transition from `from` to `to`.
    ///
    /// Returns the tickets of both participants. If either index has no
    /// slide, the markers are reset without animation and no ticket is issued.
    /// While suspended nothing changes.
    pub fn begin(&mut self, from: usize, to: usize, direction: Direction) -> Vec<CompletionTicket> {
        if self.suspended {
            return Vec::new();
        }
        let count = self.markers.len();
        if from >= count || to >= count {
            let fallback = if to < count { to } else { from.min(count.saturating_sub(1)) };
            tracing::warn!(from, to, count, "transition target out of range, resetting");
            self.settle(fallback);
            return Vec::new();
        }

        self.generation += 1;
        for (index, markers) in self.markers.iter_mut().enumerate() {
            markers.phase = Phase::Idle;
            if index != from && index != to {
                markers.active = false;
                markers.interactive = false;
            }
        }

        self.markers[from] = SlideMarkers {
            active: true,
            interactive: false,
            phase: Phase::Exiting(direction),
        };
        self.markers[to] = SlideMarkers {
            active: true,
            interactive: true,
            phase: Phase::Entering(direction),
        };

        self.in_flight = vec![from, to];
        tracing::trace!(
            from,
            to,
            direction = direction.name(),
            generation = self.generation,
            "transition started"
        );
        vec![
            CompletionTicket {
                generation: self.generation,
                slide: from,
            },
            CompletionTicket {
                generation: self.generation,
                slide: to,
            },
        ]
    }

    /// Finish one slide's part of a transition.
    ///
    /// Tickets from a superseded transition still clean up their own slide,
    /// unless that slide takes part in the newer transition.
    pub fn complete(&mut self, ticket: CompletionTicket, current: usize) {
        let stale = ticket.generation != self.generation;
        if stale && self.in_flight.contains(&ticket.slide) {
            return;
        }
        if !stale {
            self.in_flight.retain(|&s| s != ticket.slide);
        }
        let suspended = self.suspended;
        let Some(markers) = self.markers.get_mut(ticket.slide) else {
            return;
        };
        markers.phase = Phase::Idle;
        if !suspended && ticket.slide != current {
            markers.active = false;
            markers.interactive = false;
        }
    }

    /// Immediate, non-animated reset to a single visible slide.
    pub fn settle(&mut self, current: usize) {
        self.suspended = false;
        self.in_flight.clear();
        for (index, markers) in self.markers.iter_mut().enumerate() {
            *markers = if index == current {
                SlideMarkers::shown()
            } else {
                SlideMarkers::default()
            };
        }
    }

    /// Show every slide at once and hold off transitions until [`settle`].
    ///
    /// [`settle`]: Self::settle
    pub fn show_all(&mut self) {
        self.suspended = true;
        self.in_flight.clear();
        self.generation += 1;
        self.markers.fill(SlideMarkers::shown());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active_slides(animator: &TransitionAnimator) -> Vec<usize> {
        animator
            .markers()
            .iter()
            .enumerate()
            .filter(|(_, m)| m.active)
            .map(|(i, _)| i)
            .collect()
    }

    #[test]
    fn test_new_shows_only_current() {
        let animator = TransitionAnimator::new(4, 2);
        assert_eq!(active_slides(&animator), vec![2]);
        assert!(animator.markers()[2].interactive);
    }

    #[test]
    fn test_begin_marks_both_participants() {
        let mut animator = TransitionAnimator::new(3, 0);
        let tickets = animator.begin(0, 1, Direction::Forward);
        assert_eq!(tickets.len(), 2);

        let from = animator.markers()[0];
        assert_eq!(from.phase, Phase::Exiting(Direction::Forward));
        assert!(from.active);
        assert!(!from.interactive, "outgoing slide loses input immediately");

        let to = animator.markers()[1];
        assert_eq!(to.phase, Phase::Entering(Direction::Forward));
        assert!(to.active);
        assert!(to.interactive, "incoming slide takes input immediately");
    }

    #[test]
    fn test_completion_cleans_up() {
        let mut animator = TransitionAnimator::new(3, 0);
        for ticket in animator.begin(0, 1, Direction::Forward) {
            animator.complete(ticket, 1);
        }
        assert_eq!(active_slides(&animator), vec![1]);
        assert!(animator.markers().iter().all(|m| !m.is_animating()));
        assert!(!animator.markers()[0].interactive);
    }

    #[test]
    fn test_overlapping_transitions_converge() {
        let mut animator = TransitionAnimator::new(4, 0);
        let first = animator.begin(0, 1, Direction::Forward);
        let second = animator.begin(1, 2, Direction::Forward);

        // Slide 0 was dropped by the second transition.
        assert!(!animator.markers()[0].active);
        assert_eq!(
            animator.markers()[1].phase,
            Phase::Exiting(Direction::Forward)
        );

        // Stale tickets must not clobber the newer transition of slide 1.
        for ticket in first {
            animator.complete(ticket, 2);
        }
        assert_eq!(
            animator.markers()[1].phase,
            Phase::Exiting(Direction::Forward)
        );

        for ticket in second {
            animator.complete(ticket, 2);
        }
        assert_eq!(active_slides(&animator), vec![2]);
        assert!(animator.markers().iter().all(|m| !m.is_animating()));
    }

    #[test]
    fn test_out_of_range_resets_without_animation() {
        let mut animator = TransitionAnimator::new(3, 0);
        let tickets = animator.begin(0, 7, Direction::Forward);
        assert!(tickets.is_empty());
        assert_eq!(active_slides(&animator), vec![0]);

        let tickets = animator.begin(9, 2, Direction::Backward);
        assert!(tickets.is_empty());
        assert_eq!(active_slides(&animator), vec![2]);
        assert!(animator.markers().iter().all(|m| !m.is_animating()));
    }

    #[test]
    fn test_show_all_then_settle() {
        let mut animator = TransitionAnimator::new(3, 1);
        animator.show_all();
        assert_eq!(active_slides(&animator), vec![0, 1, 2]);
        assert!(animator.markers().iter().all(|m| m.interactive));

        animator.settle(1);
        assert_eq!(active_slides(&animator), vec![1]);
    }

    #[test]
    fn test_stale_ticket_during_overview_keeps_slides_shown() {
        let mut animator = TransitionAnimator::new(3, 0);
        let tickets = animator.begin(0, 1, Direction::Forward);
        animator.show_all();
        for ticket in tickets {
            animator.complete(ticket, 1);
        }
        assert_eq!(active_slides(&animator), vec![0, 1, 2]);
    }

    #[test]
    fn test_marker_classes() {
        let classes = MarkerClasses::default();
        let markers = SlideMarkers {
            active: true,
            interactive: true,
            phase: Phase::Entering(Direction::Backward),
        };
        assert_eq!(
            classes.for_markers(&markers),
            vec!["is-active", "enter-backward"]
        );
        assert!(classes.for_markers(&SlideMarkers::default()).is_empty());
    }
}
