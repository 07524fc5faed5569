//! Expansion of recurring templates into concrete transactions.

pub mod time_interval;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::{RecurringTemplate, Transaction, MAX_OCCURRENCES};

pub use time_interval::{days_in_month, shift_month, shift_year, step_from};

/// Materializes the instances of `template`.
///
/// With `from_today`, occurrences dated before `now` are skipped and, for
/// bounded templates, count against `occurrences`. Unbounded templates yield
/// [`MAX_OCCURRENCES`] instances from the first kept date. An unrecognized
/// interval stops the series after the occurrence already in hand.
pub fn expand(
    template: &RecurringTemplate,
    from_today: bool,
    now: DateTime<Utc>,
) -> Vec<Transaction> {
    let bounded = !template.is_unbounded();
    let mut remaining = template.occurrences;
    let mut index: u32 = 0;
    let mut cursor = template.start_date;

    if from_today {
        while cursor < now && (!bounded || remaining > 0) {
            index += 1;
            cursor = match step_from(template.start_date, &template.interval, index) {
                Some(next) => next,
                None => {
                    debug!(
                        template = %template.id,
                        interval = %template.interval,
                        "recurrence stopped while skipping past occurrences"
                    );
                    return Vec::new();
                }
            };
            if bounded {
                remaining -= 1;
            }
        }
    }

    let limit = if bounded { remaining } else { MAX_OCCURRENCES };
    let mut instances = Vec::with_capacity(limit as usize);
    for _ in 0..limit {
        instances.push(template.instance(cursor));
        index += 1;
        cursor = match step_from(template.start_date, &template.interval, index) {
            Some(next) => next,
            None => break,
        };
    }
    debug!(
        template = %template.id,
        count = instances.len(),
        from_today,
        "expanded recurring template"
    );
    instances
}
