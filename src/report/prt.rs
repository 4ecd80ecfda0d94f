//! Line-oriented tokenizer for simulator print (PRT) files.
//!
//! Only connection messages are recognised. A closing message spans four
//! lines:
//!
//! ```text
//! @--Message at 365.00 Days  1 Jan 2025
//! @ Closing connection (12, 30, 4) in well P-01
//! @ well water cut is above limit
//! @ Value is 0.951, limit is 0.950
//! ```
//!
//! An opening message spans two: the message header followed by
//! `@ Opening connection 7 in well P-01`.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::Year;

static MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@--Message at (\d+\.\d+) Days\s+(\d+ \w+ (\d{4}))").expect("message pattern")
});
static CLOSING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@ Closing connection \((\d+),\s*(\d+),\s*(\d+)\) in well (\S+)")
        .expect("closing pattern")
});
static ABOVE_LIMIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@ well (.+?) is above limit").expect("limit variable pattern"));
static VALUE_LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@ Value is ([\d\.]+), limit is ([\d\.]+)").expect("limit value pattern")
});
static OPENING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@ Opening connection (\d+) in well (\S+)").expect("opening pattern")
});

const MESSAGE_MARKER: &str = "@--Message at";
const CLOSING_MARKER: &str = "@ Closing connection";
const OPENING_MARKER: &str = "@ Opening connection";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventKind {
    /// Connection shut because a well variable exceeded its limit.
    Closing {
        cell: [u32; 3],
        variable: String,
        value: f64,
        limit: f64,
    },
    Opening {
        connection: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionEvent {
    /// Simulation time of the message [days].
    pub days: f64,
    /// Calendar date as printed, e.g. `1 Jan 2025`.
    pub date: String,
    pub year: Year,
    pub well: String,
    pub kind: EventKind,
}

impl ConnectionEvent {
    pub fn is_closing(&self) -> bool {
        matches!(self.kind, EventKind::Closing { .. })
    }
}

struct MessageHeader {
    days: f64,
    date: String,
    year: Year,
}

fn message_header(line: &str) -> Option<MessageHeader> {
    let captures = MESSAGE.captures(line)?;
    Some(MessageHeader {
        days: captures[1].parse().ok()?,
        date: captures[2].to_string(),
        year: captures[3].parse().ok()?,
    })
}

/// Extracts every well-formed connection event, in file order. Incomplete or
/// malformed messages are skipped.
pub fn tokenize(text: &str) -> Vec<ConnectionEvent> {
    let lines: Vec<&str> = text.lines().collect();
    let mut events = Vec::new();

    for (index, pair) in lines.windows(2).enumerate() {
        let (current, next) = (pair[0], pair[1]);
        if !current.contains(MESSAGE_MARKER) {
            continue;
        }

        let event = if next.contains(CLOSING_MARKER) {
            closing_event(current, next, lines.get(index + 2), lines.get(index + 3))
        } else if next.contains(OPENING_MARKER) {
            opening_event(current, next)
        } else {
            None
        };
        events.extend(event);
    }
    events
}

fn closing_event(
    header: &str,
    connection: &str,
    variable: Option<&&str>,
    values: Option<&&str>,
) -> Option<ConnectionEvent> {
    let header = message_header(header)?;
    let connection = CLOSING.captures(connection)?;
    let variable = ABOVE_LIMIT.captures(variable?)?;
    let values = VALUE_LIMIT.captures(values?)?;

    Some(ConnectionEvent {
        days: header.days,
        date: header.date,
        year: header.year,
        well: connection[4].to_string(),
        kind: EventKind::Closing {
            cell: [
                connection[1].parse().ok()?,
                connection[2].parse().ok()?,
                connection[3].parse().ok()?,
            ],
            variable: variable[1].to_string(),
            value: values[1].parse().ok()?,
            limit: values[2].parse().ok()?,
        },
    })
}

fn opening_event(header: &str, connection: &str) -> Option<ConnectionEvent> {
    let header = message_header(header)?;
    let connection = OPENING.captures(connection)?;

    Some(ConnectionEvent {
        days: header.days,
        date: header.date,
        year: header.year,
        well: connection[2].to_string(),
        kind: EventKind::Opening {
            connection: connection[1].parse().ok()?,
        },
    })
}
