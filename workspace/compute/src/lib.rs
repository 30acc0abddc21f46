pub mod attendance;
pub mod error;
pub mod fees;
pub mod grading;
pub mod lookup;
pub mod reports;
pub mod timetable;

#[cfg(test)]
pub mod testing;

use chrono::NaiveDate;
use fees::FeeLedger;

/// Returns the fee ledger used by the application.
///
/// With `today` set every payment is dated on that day, otherwise the server
/// clock is read for each payment.
pub fn default_compute(today: Option<NaiveDate>) -> FeeLedger {
    match today {
        Some(today) => FeeLedger::new_with_today(today),
        None => fees::default_ledger(),
    }
}
