//! Filters over registry audit history.

use crate::event::{RegistryAction, RegistryEvent};
use chrono::{DateTime, Utc};
use payproof_canonical::{Address, ProviderHash};

/// Predicate over audit records.
pub trait EventFilter {
    /// Returns true if the record matches.
    fn matches(&self, event: &RegistryEvent) -> bool;
}

/// Filter by mutation kind.
#[derive(Debug, Clone)]
pub struct ActionFilter {
    /// Kind to match.
    pub action: RegistryAction,
}

impl EventFilter for ActionFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.action == self.action
    }
}

/// Filter by affected hash.
#[derive(Debug, Clone)]
pub struct ProviderHashFilter {
    /// Hash to match.
    pub provider_hash: ProviderHash,
}

impl EventFilter for ProviderHashFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.provider_hash == self.provider_hash
    }
}

/// Filter by operator.
#[derive(Debug, Clone)]
pub struct CallerFilter {
    /// Operator to match.
    pub caller: Address,
}

impl EventFilter for CallerFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        event.caller == self.caller
    }
}

/// Filter by time range, both bounds inclusive.
#[derive(Debug, Clone, Default)]
pub struct TimeRangeFilter {
    /// Earliest time to include.
    pub after: Option<DateTime<Utc>>,
    /// Latest time to include.
    pub before: Option<DateTime<Utc>>,
}

impl EventFilter for TimeRangeFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        if let Some(after) = self.after {
            if event.recorded_at < after {
                return false;
            }
        }
        if let Some(before) = self.before {
            if event.recorded_at > before {
                return false;
            }
        }
        true
    }
}

/// Composite filter: all filters must match (AND).
#[derive(Default)]
pub struct AndFilter {
    /// Filters to combine.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for AndFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        self.filters.iter().all(|f| f.matches(event))
    }
}

/// Composite filter: any filter must match (OR).
pub struct OrFilter {
    /// Filters to combine.
    pub filters: Vec<Box<dyn EventFilter>>,
}

impl EventFilter for OrFilter {
    fn matches(&self, event: &RegistryEvent) -> bool {
        self.filters.iter().any(|f| f.matches(event))
    }
}

/// Records in `events` matching `filter`, in order.
pub fn filter_history<'a, F: EventFilter + ?Sized>(
    events: &'a [RegistryEvent],
    filter: &F,
) -> Vec<&'a RegistryEvent> {
    events.iter().filter(|e| filter.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::RegistryOperation;
    use chrono::TimeZone;
    use payproof_canonical::PaymentMethod;

    fn event(sequence: u64, operation: RegistryOperation, day: u32) -> RegistryEvent {
        RegistryEvent::seal(
            sequence,
            PaymentMethod::parse("venmo").unwrap(),
            operation,
            Address::parse("0x00000000000000000000000000000000000000aa").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            None,
        )
        .unwrap()
    }

    fn history() -> Vec<RegistryEvent> {
        let a = ProviderHash::digest(b"a");
        let b = ProviderHash::digest(b"b");
        vec![
            event(0, RegistryOperation::add(a), 1),
            event(1, RegistryOperation::add(b), 2),
            event(2, RegistryOperation::remove(a), 3),
        ]
    }

    #[test]
    fn action_filter() {
        let events = history();
        let removes = filter_history(&events, &ActionFilter { action: RegistryAction::Remove });
        assert_eq!(removes.len(), 1);
        assert_eq!(removes[0].sequence, 2);
    }

    #[test]
    fn and_filter_combines_hash_and_time() {
        let events = history();
        let filter = AndFilter {
            filters: vec![
                Box::new(ProviderHashFilter { provider_hash: ProviderHash::digest(b"a") }),
                Box::new(TimeRangeFilter {
                    after: Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()),
                    before: None,
                }),
            ],
        };
        let matched = filter_history(&events, &filter);
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].action, RegistryAction::Remove);
    }

    #[test]
    fn or_filter_and_empty_and() {
        let events = history();
        let either = OrFilter {
            filters: vec![
                Box::new(ProviderHashFilter { provider_hash: ProviderHash::digest(b"b") }),
                Box::new(ActionFilter { action: RegistryAction::Remove }),
            ],
        };
        assert_eq!(filter_history(&events, &either).len(), 2);
        assert_eq!(filter_history(&events, &AndFilter::default()).len(), 3);
    }
}
