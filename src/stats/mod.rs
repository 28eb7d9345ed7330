//! Aggregate statistics over a batch of node results

use crate::defaults::{PING_SENTINEL_MS, PING_UNMEASURED, SPEED_UNAVAILABLE};
use crate::models::NodeResult;
use serde::{Deserialize, Serialize};

/// Parse the number at the start of `text`, ignoring whatever follows it
///
/// Used for speeds. Only digits and `.` count as the numeric prefix, so signs,
/// exponents and leading whitespace are rejected. A second `.` ends the number, which lets
/// `"1.2.3"` read as `1.2`.
pub fn parse_leading_number(text: &str) -> Option<f64> {
    let mut end = 0;
    let mut seen_dot = false;

    for (index, ch) in text.char_indices() {
        match ch {
            '0'..='9' => {}
            '.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = index + ch.len_utf8();
    }

    let prefix = &text[..end];
    if !prefix.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }

    prefix.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Speed sample from an `avg_speed` field, if it carries one
pub fn parse_speed(avg_speed: &str) -> Option<f64> {
    if avg_speed.is_empty() || avg_speed == SPEED_UNAVAILABLE {
        return None;
    }
    parse_leading_number(avg_speed)
}

/// Parse a floating point number at the start of `text`, C `strtod` style
///
/// Leading whitespace and a sign are accepted, as is an exponent; an `e`
/// with no digits after it is left out of the number, so `"1e"` reads as 1.
pub fn parse_float_prefix(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |start: usize| bytes[start..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }

    let whole = digits_from(end);
    end += whole;
    let mut fraction = 0;
    if bytes.get(end) == Some(&b'.') {
        fraction = digits_from(end + 1);
        end += 1 + fraction;
    }
    if whole + fraction == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Ping sample from an `avg_ping` field, if it carries one
pub fn parse_ping(avg_ping: &str) -> Option<f64> {
    if avg_ping.is_empty() || avg_ping == PING_UNMEASURED {
        return None;
    }
    parse_float_prefix(avg_ping)
}

/// Counts and speed/ping aggregates for one report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeStatistics {
    pub total: usize,
    pub working: usize,
    pub failed: usize,
    /// Sum of valid speed samples, MB/s
    pub speed_sum: f64,
    /// Largest valid speed sample, 0.0 without samples
    pub max_speed: f64,
    /// Number of online nodes that produced a speed sample
    pub speed_samples: usize,
    /// Lowest positive ping below the sentinel, milliseconds
    pub best_ping: Option<f64>,
}

impl NodeStatistics {
    /// Reduce a batch of results; malformed numbers are skipped, never fatal
    pub fn from_nodes(nodes: &[NodeResult]) -> Self {
        let mut stats = Self {
            total: nodes.len(),
            working: 0,
            failed: 0,
            speed_sum: 0.0,
            max_speed: 0.0,
            speed_samples: 0,
            best_ping: None,
        };
        let mut min_ping = PING_SENTINEL_MS;

        for node in nodes {
            if !node.online {
                stats.failed += 1;
                continue;
            }
            stats.working += 1;

            if let Some(speed) = parse_speed(&node.avg_speed) {
                stats.speed_sum += speed;
                stats.speed_samples += 1;
                if speed > stats.max_speed {
                    stats.max_speed = speed;
                }
            }

            if let Some(ping) = parse_ping(&node.avg_ping) {
                if ping > 0.0 && ping < min_ping {
                    min_ping = ping;
                }
            }
        }

        if min_ping < PING_SENTINEL_MS {
            stats.best_ping = Some(min_ping);
        }
        stats
    }

    /// Average speed across working nodes, `None` when nothing is online
    ///
    /// The divisor is the working count, not the sample count: a working
    /// node without a usable speed still pulls the average down.
    pub fn average_speed(&self) -> Option<f64> {
        (self.working > 0).then(|| self.speed_sum / self.working as f64)
    }

    pub fn has_working_nodes(&self) -> bool {
        self.working > 0
    }
}
