//! Date-based views over the event list

use std::cmp::Ordering;

use chrono::NaiveDate;

use crate::models::Event;
use crate::utils::helpers::{parse_event_date, parse_event_time};

/// Order events by date then time; unparseable dates sort last
pub fn sort_by_schedule(events: &mut [Event]) {
    events.sort_by(|a, b| compare_schedule(a, b));
}

fn compare_schedule(a: &Event, b: &Event) -> Ordering {
    let key = |e: &Event| (parse_event_date(&e.date), parse_event_time(&e.time));
    match (key(a), key(b)) {
        ((Some(da), ta), (Some(db), tb)) => da.cmp(&db).then(ta.cmp(&tb)),
        ((Some(_), _), (None, _)) => Ordering::Less,
        ((None, _), (Some(_), _)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

/// Non-cancelled events taking place on a day, in schedule order
pub fn events_on(events: &[Event], day: NaiveDate) -> Vec<Event> {
    let mut matching: Vec<Event> = events
        .iter()
        .filter(|e| !e.is_cancelled() && parse_event_date(&e.date) == Some(day))
        .cloned()
        .collect();
    sort_by_schedule(&mut matching);
    matching
}
