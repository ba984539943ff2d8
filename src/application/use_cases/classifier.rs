use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::entities::{
    time_window::{TimeWindowSpec, WindowError},
    user_record::{LoginSignal, UserRecords},
};

/// Partition of a record collection around a cutoff instant.
///
/// `active` and `timeless` are disjoint; every other record is inactive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub cutoff: DateTime<Utc>,
    pub active: BTreeSet<String>,
    /// Records with no usable login date (missing or unparsable).
    pub timeless: BTreeSet<String>,
    /// How many of the timeless records had a date that failed to parse.
    pub unparsable: usize,
    pub total: usize,
}

impl Classification {
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn timeless_count(&self) -> usize {
        self.timeless.len()
    }

    pub fn missing_login_count(&self) -> usize {
        self.timeless.len() - self.unparsable
    }

    pub fn inactive_count(&self) -> usize {
        self.total - self.active.len() - self.timeless.len()
    }
}

/// Classify every record against the cutoff derived from `window` and `now`.
///
/// A record is active only if its login is strictly later than the cutoff; a login exactly
/// at the cutoff is inactive.
pub fn classify(
    records: &UserRecords,
    window: &TimeWindowSpec,
    now: DateTime<Utc>,
) -> Result<Classification, WindowError> {
    let cutoff = window.cutoff_from(now)?;

    let mut classification = Classification {
        cutoff,
        active: BTreeSet::new(),
        timeless: BTreeSet::new(),
        unparsable: 0,
        total: records.len(),
    };

    for (id, record) in records {
        match record.login_signal() {
            LoginSignal::At(last_login) => {
                if last_login > cutoff {
                    classification.active.insert(id.clone());
                }
            }
            LoginSignal::Missing => {
                classification.timeless.insert(id.clone());
            }
            LoginSignal::Unparsable => {
                debug!(user = %id, raw = ?record.last_login_date, "unparsable last login date");
                classification.unparsable += 1;
                classification.timeless.insert(id.clone());
            }
        }
    }

    debug!(
        %cutoff,
        active = classification.active_count(),
        timeless = classification.timeless_count(),
        inactive = classification.inactive_count(),
        "classified records"
    );
    Ok(classification)
}
