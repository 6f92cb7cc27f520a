//! Bit-set vocabularies shared by the pipeline, the matchers and the watcher.
//!
//! Every set keeps plain AND/OR semantics: a matcher may report
//! `HANDLED | END` from one evaluation and the watcher folds the results of a
//! whole pool with `|`.

use bitflags::bitflags;

bitflags! {
    /// Phase of a raw sample. Exactly one bit is set per derived sample.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct EventStatus: u8 {
        const START = 1;
        const MOVE = 1 << 1;
        const END = 1 << 2;
        const CANCEL = 1 << 3;
    }
}

impl EventStatus {
    pub const NONE: Self = Self::empty();
    pub const TERMINAL: Self = Self::END.union(Self::CANCEL);

    /// END or CANCEL.
    pub fn is_terminal(self) -> bool {
        self.intersects(Self::TERMINAL)
    }

    /// Phase suffix used in event names, e.g. `PAN_MOVE`.
    pub fn suffix(self) -> &'static str {
        if self == Self::START {
            "START"
        } else if self == Self::MOVE {
            "MOVE"
        } else if self == Self::END {
            "END"
        } else if self == Self::CANCEL {
            "CANCEL"
        } else {
            "NONE"
        }
    }
}

bitflags! {
    /// Outcome of a matcher (or a whole pool) evaluating one sample.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ProcessStatus: u8 {
        const START = 1;
        const WAIT = 1 << 1;
        const ACTIVE = 1 << 2;
        const HANDLED = 1 << 3;
        const END = 1 << 4;
        const CANCEL = 1 << 5;
    }
}

impl ProcessStatus {
    pub const NONE: Self = Self::empty();

    /// Any status other than NONE.
    pub fn is_live(self) -> bool {
        !self.is_empty()
    }

    /// The pool must be reset: END or CANCEL is present.
    pub fn is_finished(self) -> bool {
        self.intersects(Self::END.union(Self::CANCEL))
    }

    /// `WAIT` or `ACTIVE`: later samples of the session should be routed here.
    pub fn is_pending(self) -> bool {
        self.intersects(Self::WAIT.union(Self::ACTIVE))
    }

    /// Terminal variant of a successful match: `END` on a terminal sample,
    /// `ACTIVE` otherwise.
    pub fn settle(sample: EventStatus) -> Self {
        if sample.is_terminal() {
            Self::END
        } else {
            Self::ACTIVE
        }
    }

    /// Failed or undecided match: `END` on a terminal sample, `WAIT` otherwise.
    pub fn idle(sample: EventStatus) -> Self {
        if sample.is_terminal() {
            Self::END
        } else {
            Self::WAIT
        }
    }
}

bitflags! {
    /// Direction of travel relative to the session anchor, screen space.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Direction: u8 {
        const UP = 1;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
        const HORIZONTAL = Self::LEFT.bits() | Self::RIGHT.bits();
        const VERTICAL = Self::UP.bits() | Self::DOWN.bits();
        const ALL = Self::HORIZONTAL.bits() | Self::VERTICAL.bits();
    }
}

const DIRECTION_NAMES: [(Direction, &str); 4] = [
    (Direction::UP, "UP"),
    (Direction::DOWN, "DOWN"),
    (Direction::LEFT, "LEFT"),
    (Direction::RIGHT, "RIGHT"),
];

impl Direction {
    pub const NONE: Self = Self::empty();

    /// One suffix per single-direction bit, in bit order.
    pub fn suffixes(self) -> impl Iterator<Item = &'static str> {
        DIRECTION_NAMES
            .into_iter()
            .filter(move |(bit, _)| self.contains(*bit))
            .map(|(_, name)| name)
    }
}

bitflags! {
    /// Gestures already recognised for a sample. Matchers OR their bit in.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct GestureKind: u8 {
        const TAP = 1;
        const PRESS = 1 << 1;
        const PAN = 1 << 2;
        /// Reserved; multi-pointer recognition is not implemented.
        const PINCH = 1 << 3;
        const SWIPE = 1 << 4;
        /// Reserved; multi-pointer recognition is not implemented.
        const ROTATE = 1 << 5;
    }
}
