// Copyright 2025 Janek Bevendorff
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! The normalized page fetch extracted from one corpus record.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use warcgen::HeaderMap;

/// One page fetch, ready to be written as a WARC response record.
///
/// The header always holds `Content-Length`, `Content-Type` and `Date` entries.
#[derive(Debug, Clone)]
pub struct Document {
    id: Uuid,
    url: String,
    date: DateTime<Utc>,
    status: u32,
    header: HeaderMap,
    body: Vec<u8>,
}

impl Document {
    /// Create a document with a fresh random id.
    pub fn new(url: String, date: DateTime<Utc>, status: u32, header: HeaderMap, body: Vec<u8>) -> Self {
        Document {
            id: Uuid::new_v4(),
            url,
            date,
            status,
            header,
            body,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn status(&self) -> u32 {
        self.status
    }

    pub fn header(&self) -> &HeaderMap {
        &self.header
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

const DAY_NAMES: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

const MONTH_NAMES: [&str; 24] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

fn month_number(name: &str) -> Option<u32> {
    let index = MONTH_NAMES.iter().position(|m| *m == name)?;
    Some(index as u32 % 12 + 1)
}

/// Parse a loosely formatted HTTP or mail date.
///
/// Accepts IMF-fixdate, RFC 850 and asctime dates as well as the common
/// deviations found in crawled headers: missing or dashed day fields, missing
/// or unknown zones, times without seconds and two-digit years (`69`-`99` map
/// to the 1900s, everything below to the 2000s). The wall-clock fields are
/// taken as written and interpreted as UTC; a zone is never applied.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let mut tokens: Vec<&str> = value.split_whitespace().collect();
    let first = *tokens.first()?;

    // Day of week, with or without a space after its comma.
    if first.ends_with(',') || DAY_NAMES.contains(&first.to_lowercase().as_str()) {
        tokens.remove(0);
    } else if let Some(i) = first.rfind(',') {
        tokens[0] = &first[i + 1..];
    }

    // dd-mmm-yy[yy]
    if tokens.len() == 3 {
        let head = tokens[0];
        let parts: Vec<&str> = head.split('-').collect();
        if parts.len() == 3 {
            tokens.splice(0..1, parts);
        }
    }

    // Zone glued to the time, or no zone at all.
    if tokens.len() == 4 {
        let last = tokens[3];
        match last.find('+').or_else(|| last.find('-')) {
            Some(i) if i > 0 => {
                tokens.splice(3..4, [&last[..i], &last[i..]]);
            }
            _ => tokens.push(""),
        }
    }
    if tokens.len() < 5 {
        return None;
    }

    let (mut day, month, mut year, mut time) = (tokens[0], tokens[1], tokens[2], tokens[3]);
    let mut zone = tokens[4];
    if day.is_empty() || month.is_empty() || year.is_empty() {
        return None;
    }

    let month = match month_number(&month.to_lowercase()) {
        Some(m) => m,
        None => {
            let m = month_number(&day.to_lowercase())?;
            day = month;
            m
        }
    };
    day = day.strip_suffix(',').unwrap_or(day);

    if year.find(':').is_some_and(|i| i > 0) {
        std::mem::swap(&mut year, &mut time);
    }
    if let Some(y) = year.strip_suffix(',') {
        year = y;
    }
    if !year.starts_with(|c: char| c.is_ascii_digit()) {
        std::mem::swap(&mut year, &mut zone);
    }
    time = time.strip_suffix(',').unwrap_or(time);

    let mut fields: Vec<&str> = time.split(':').collect();
    if fields.len() == 1 && time.contains('.') {
        fields = time.split('.').collect();
    }
    let (hour, minute, second) = match fields[..] {
        [h, m] => (h, m, "0"),
        [h, m, s] => (h, m, s),
        _ => return None,
    };

    let mut year: i64 = year.parse().ok()?;
    let day: u32 = day.parse().ok()?;
    let hour: u32 = hour.parse().ok()?;
    let minute: u32 = minute.parse().ok()?;
    let second: u32 = second.parse().ok()?;
    if year < 100 {
        year += if year > 68 { 1900 } else { 2000 };
    }
    if !(1..=9999).contains(&year) {
        return None;
    }

    NaiveDate::from_ymd_opt(year as i32, month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|dt| dt.and_utc())
}
