// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, Time, Weekday};

/// A wall-clock instant in the deployment's reference timezone.
///
/// The engine never reads the system clock; callers resolve "now" into a
/// `LocalInstant` and pass it in explicitly, which keeps evaluation
/// deterministic and reproducible across timezones. Comparisons against
/// rule windows are minute-level; sub-second precision is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalInstant {
    /// The calendar date in the reference timezone.
    date: Date,
    /// The time of day in the reference timezone.
    clock: Time,
}

impl LocalInstant {
    /// Creates an instant from local calendar date and time of day.
    #[must_use]
    pub const fn new(date: Date, clock: Time) -> Self {
        Self { date, clock }
    }

    /// The calendar date of this instant.
    #[must_use]
    pub const fn date(self) -> Date {
        self.date
    }

    /// The time of day of this instant.
    #[must_use]
    pub const fn clock(self) -> Time {
        self.clock
    }

    /// The weekday of this instant.
    #[must_use]
    pub const fn weekday(self) -> Weekday {
        self.date.weekday()
    }
}

impl std::fmt::Display for LocalInstant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Minute-level precision on purpose.
        write!(
            f,
            "{} {:02}:{:02}",
            self.date,
            self.clock.hour(),
            self.clock.minute()
        )
    }
}
