//! Format patterns for rendering validated dates.
//!
//! Patterns use the Unicode-style token language that web date libraries
//! share: a run of one repeated letter is a field, its length selects the
//! width or the name style, and text in single quotes is copied verbatim.
//!
//! | Token | Output for 2024-03-15 08:05:09.120 +00:00 |
//! |-------|---------|
//! | `yyyy` / `yy` / `yo` | `2024` / `24` / `2024th` |
//! | `QQQ` / `QQQQ` | `Q1` / `1st quarter` |
//! | `M` / `MM` / `MMM` / `MMMM` / `MMMMM` / `Mo` | `3` / `03` / `Mar` / `March` / `M` / `3rd` |
//! | `d` / `dd` / `do` | `15` / `15` / `15th` |
//! | `DDD` / `Do` | `075` / `75th` (day of year) |
//! | `EEE` / `EEEE` / `EEEEE` / `EEEEEE` | `Fri` / `Friday` / `F` / `Fr` |
//! | `i` / `I` / `RRRR` | `5` (ISO weekday) / `11` (ISO week) / `2024` (ISO week-year) |
//! | `w` / `wo` / `Y` | `11` / `11th` / `2024` (Sunday-first week and week-year) |
//! | `a` / `aaa` / `aaaa` / `aaaaa` | `AM` / `am` / `a.m.` / `a` |
//! | `b` / `B` | `AM` (`noon`, `midnight`) / `in the morning` |
//! | `h` / `HH` / `k` / `K` | `8` / `08` / `8` / `8` |
//! | `mm` / `ss` / `SSS` | `05` / `09` / `120` |
//! | `X` / `XXX` / `xxx` / `O` / `OOOO` | `Z` / `Z` / `+00:00` / `GMT+0` / `GMT+00:00` |
//! | `t` / `T` | seconds / milliseconds since the epoch |
//! | `G` / `GGGG` | `AD` / `Anno Domini` |
//! | `P` / `PP` / `PPP` / `PPPP` | `03/15/2024` / `Mar 15, 2024` / `March 15th, 2024` / `Friday, March 15th, 2024` |
//! | `p` / `pp` | `8:05 AM` / `8:05:09 AM` (`Pp` joins both) |
//!
//! Any other ASCII letter outside quotes is an error. `D`, `DD`, `YY` and
//! `YYYY` are errors too: they are almost always typos for `d`, `dd`, `yy`
//! and `yyyy`, so a pattern like `yyyy-MM-DD` fails loudly instead of
//! printing the day of the year.

use std::fmt::Write as _;

use chrono::{DateTime, Datelike, Days, FixedOffset, NaiveDate, Timelike};
use thiserror::Error;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Monday first, matching `Weekday::num_days_from_monday`.
const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Field letters this renderer understands.
const FIELD_LETTERS: &str = "GyYuRQqMLwdDEeciIabBhHkKmsSXxOztT";

/// Letters that accept a trailing `o` ordinal suffix.
const ORDINAL_LETTERS: &str = "yYQqMLwdDeciIhHkKms";

/// Errors raised while compiling a format pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern contains an unescaped letter {letter:?} at position {position}; wrap literal text in single quotes")]
    UnescapedLetter { letter: char, position: usize },

    #[error("pattern has an unterminated quote starting at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("pattern token {token:?} at position {position} is reserved; use {suggestion:?} for the calendar field")]
    ProtectedToken {
        token: String,
        suggestion: String,
        position: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field {
        letter: char,
        width: usize,
        ordinal: bool,
    },
}

/// A compiled format pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPattern {
    tokens: Vec<Token>,
}

impl FormatPattern {
    /// Compiles a pattern string.
    ///
    /// # Errors
    ///
    /// Returns [`PatternError`] for an unknown unquoted letter, a reserved
    /// token such as `DD`, or an unterminated quote.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];

            if ch == '\'' {
                // '' is an escaped quote, inside or outside quoted text.
                if chars.get(i + 1) == Some(&'\'') {
                    literal.push('\'');
                    i += 2;
                    continue;
                }
                let start = i;
                i += 1;
                loop {
                    match chars.get(i) {
                        None => return Err(PatternError::UnterminatedQuote { position: start }),
                        Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                            literal.push('\'');
                            i += 2;
                        }
                        Some('\'') => {
                            i += 1;
                            break;
                        }
                        Some(c) => {
                            literal.push(*c);
                            i += 1;
                        }
                    }
                }
                continue;
            }

            if ch == 'P' || ch == 'p' {
                let date_width = run_length(&chars, i, 'P');
                let time_width = run_length(&chars, i + date_width, 'p');
                i += date_width + time_width;
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.extend(Self::compile(&localized_pattern(date_width, time_width))?.tokens);
                continue;
            }

            if ch.is_ascii_alphabetic() {
                if !FIELD_LETTERS.contains(ch) {
                    return Err(PatternError::UnescapedLetter {
                        letter: ch,
                        position: i,
                    });
                }
                let start = i;
                let width = run_length(&chars, i, ch);
                i += width;
                let ordinal = width == 1 && chars.get(i) == Some(&'o') && ORDINAL_LETTERS.contains(ch);
                if ordinal {
                    i += 1;
                } else if matches!((ch, width), ('D', 1 | 2) | ('Y', 2 | 4)) {
                    let token: String = std::iter::repeat_n(ch, width).collect();
                    return Err(PatternError::ProtectedToken {
                        suggestion: token.to_lowercase(),
                        token,
                        position: start,
                    });
                }
                if !literal.is_empty() {
                    tokens.push(Token::Literal(std::mem::take(&mut literal)));
                }
                tokens.push(Token::Field {
                    letter: ch,
                    width,
                    ordinal,
                });
                continue;
            }

            literal.push(ch);
            i += 1;
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(literal));
        }
        Ok(Self { tokens })
    }

    /// Renders a date/time in its own offset.
    pub fn render(&self, dt: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            match token {
                Token::Literal(text) => out.push_str(text),
                Token::Field {
                    letter,
                    width,
                    ordinal,
                } => render_field(&mut out, dt, *letter, *width, *ordinal),
            }
        }
        out
    }
}

/// Compiles `pattern` and renders `dt` with it.
///
/// # Errors
///
/// Returns [`PatternError`] if the pattern does not compile.
pub fn format_datetime(dt: &DateTime<FixedOffset>, pattern: &str) -> Result<String, PatternError> {
    FormatPattern::compile(pattern).map(|compiled| compiled.render(dt))
}

fn run_length(chars: &[char], from: usize, letter: char) -> usize {
    chars[from..].iter().take_while(|&&c| c == letter).count()
}

/// en-US expansion of a `P…p…` run: date width picks short to full, as does
/// time width, and the date width picks the joiner.
fn localized_pattern(date_width: usize, time_width: usize) -> String {
    let date = match date_width {
        0 => None,
        1 => Some("MM/dd/yyyy"),
        2 => Some("MMM d, y"),
        3 => Some("MMMM do, y"),
        _ => Some("EEEE, MMMM do, y"),
    };
    let time = match time_width {
        0 => None,
        1 => Some("h:mm a"),
        2 => Some("h:mm:ss a"),
        3 => Some("h:mm:ss a z"),
        _ => Some("h:mm:ss a zzzz"),
    };
    match (date, time) {
        (Some(date), Some(time)) if date_width >= 3 => format!("{date} 'at' {time}"),
        (Some(date), Some(time)) => format!("{date}, {time}"),
        (Some(part), None) | (None, Some(part)) => part.to_string(),
        (None, None) => String::new(),
    }
}

fn render_field(out: &mut String, dt: &DateTime<FixedOffset>, letter: char, width: usize, ordinal: bool) {
    match letter {
        'G' => {
            let ad = dt.year() > 0;
            out.push_str(match (width, ad) {
                (1..=3, true) => "AD",
                (1..=3, false) => "BC",
                (4, true) => "Anno Domini",
                (4, false) => "Before Christ",
                (_, true) => "A",
                (_, false) => "B",
            });
        }
        'y' | 'u' => {
            let year = dt.year();
            if ordinal {
                push_ordinal(out, i64::from(year));
            } else if width == 2 && letter == 'y' {
                push_padded(out, i64::from(year.rem_euclid(100)), 2);
            } else {
                push_padded(out, i64::from(year), width);
            }
        }
        'Y' => push_number(out, i64::from(local_week_year(dt.date_naive())), width, ordinal),
        'R' => push_number(out, i64::from(dt.iso_week().year()), width, ordinal),
        'Q' | 'q' => {
            let quarter = i64::from(dt.month0() / 3 + 1);
            match width {
                3 => {
                    let _ = write!(out, "Q{quarter}");
                }
                4 => {
                    push_ordinal(out, quarter);
                    out.push_str(" quarter");
                }
                _ => push_number(out, quarter, width.min(2), ordinal),
            }
        }
        'M' | 'L' => {
            let name = MONTH_NAMES[dt.month0() as usize];
            match width {
                3 => out.push_str(&name[..3]),
                4 => out.push_str(name),
                5.. => out.push_str(&name[..1]),
                _ => push_number(out, i64::from(dt.month()), width, ordinal),
            }
        }
        'd' => push_number(out, i64::from(dt.day()), width, ordinal),
        'D' => push_number(out, i64::from(dt.ordinal()), width, ordinal),
        'E' => push_weekday_name(out, dt, width.max(3)),
        'e' | 'c' => {
            if width <= 2 {
                // Local week starts on Sunday.
                let local = i64::from(dt.weekday().num_days_from_sunday() + 1);
                push_number(out, local, width, ordinal);
            } else {
                push_weekday_name(out, dt, width);
            }
        }
        'i' => {
            if width <= 2 {
                let iso = i64::from(dt.weekday().number_from_monday());
                push_number(out, iso, width, ordinal);
            } else {
                push_weekday_name(out, dt, width);
            }
        }
        'I' => push_number(out, i64::from(dt.iso_week().week()), width, ordinal),
        'w' => push_number(out, local_week(dt.date_naive()), width, ordinal),
        'a' => push_meridiem(out, dt.hour() >= 12, width),
        'b' => match dt.hour() {
            0 => out.push_str(if width == 5 { "mi" } else { "midnight" }),
            12 => out.push_str(if width == 5 { "n" } else { "noon" }),
            hour => push_meridiem(out, hour >= 12, width),
        },
        'B' => out.push_str(match dt.hour() {
            17.. => "in the evening",
            12.. => "in the afternoon",
            4.. => "in the morning",
            _ => "at night",
        }),
        'h' => {
            let hour = match dt.hour() % 12 {
                0 => 12,
                h => h,
            };
            push_number(out, i64::from(hour), width, ordinal);
        }
        'H' => push_number(out, i64::from(dt.hour()), width, ordinal),
        'K' => push_number(out, i64::from(dt.hour() % 12), width, ordinal),
        'k' => {
            let hour = match dt.hour() {
                0 => 24,
                h => h,
            };
            push_number(out, i64::from(hour), width, ordinal);
        }
        'm' => push_number(out, i64::from(dt.minute()), width, ordinal),
        's' => push_number(out, i64::from(dt.second()), width, ordinal),
        'S' => {
            // Leap-second nanos (>= 1e9) clamp to the last representable digit.
            let nanos = dt.nanosecond().min(999_999_999);
            let digits = format!("{nanos:09}");
            if width <= 9 {
                out.push_str(&digits[..width]);
            } else {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', width - 9));
            }
        }
        'X' | 'x' => {
            let seconds = dt.offset().local_minus_utc();
            if letter == 'X' && seconds == 0 {
                out.push('Z');
            } else {
                push_offset(out, seconds, width);
            }
        }
        'O' | 'z' => {
            let seconds = dt.offset().local_minus_utc();
            out.push_str("GMT");
            if width == 4 {
                push_offset(out, seconds, 3);
            } else {
                push_short_gmt(out, seconds);
            }
        }
        't' => {
            let _ = write!(out, "{}", dt.timestamp());
        }
        'T' => {
            let _ = write!(out, "{}", dt.timestamp_millis());
        }
        _ => unreachable!("letter {letter:?} passed compile-time validation"),
    }
}

fn push_meridiem(out: &mut String, pm: bool, width: usize) {
    out.push_str(match (width, pm) {
        (1 | 2, false) => "AM",
        (1 | 2, true) => "PM",
        (3, false) => "am",
        (3, true) => "pm",
        (5, false) => "a",
        (5, true) => "p",
        (_, false) => "a.m.",
        (_, true) => "p.m.",
    });
}

/// Start of the Sunday-first week containing `date`.
fn start_of_local_week(date: NaiveDate) -> NaiveDate {
    let back = Days::new(u64::from(date.weekday().num_days_from_sunday()));
    date.checked_sub_days(back).unwrap_or(date)
}

/// Week-numbering year for Sunday-first weeks where week 1 holds January 1.
fn local_week_year(date: NaiveDate) -> i32 {
    let year = date.year();
    match NaiveDate::from_ymd_opt(year + 1, 1, 1).map(start_of_local_week) {
        Some(next_start) if date >= next_start => year + 1,
        _ => year,
    }
}

fn local_week(date: NaiveDate) -> i64 {
    let year_start = NaiveDate::from_ymd_opt(local_week_year(date), 1, 1)
        .map_or(date, start_of_local_week);
    (start_of_local_week(date) - year_start).num_days() / 7 + 1
}

fn push_weekday_name(out: &mut String, dt: &DateTime<FixedOffset>, width: usize) {
    let name = WEEKDAY_NAMES[dt.weekday().num_days_from_monday() as usize];
    match width {
        4 => out.push_str(name),
        5 => out.push_str(&name[..1]),
        6 => out.push_str(&name[..2]),
        _ => out.push_str(&name[..3]),
    }
}

fn push_number(out: &mut String, value: i64, width: usize, ordinal: bool) {
    if ordinal {
        push_ordinal(out, value);
    } else {
        push_padded(out, value, width);
    }
}

fn push_padded(out: &mut String, value: i64, width: usize) {
    if value < 0 {
        let _ = write!(out, "-{:0width$}", value.unsigned_abs());
    } else {
        let _ = write!(out, "{value:0width$}");
    }
}

fn push_ordinal(out: &mut String, value: i64) {
    let suffix = match (value.rem_euclid(100), value.rem_euclid(10)) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    let _ = write!(out, "{value}{suffix}");
}

/// `X`/`x` forms: width 1 prints `+hh` (or `+hhmm` when minutes are set),
/// widths 2 and 4 print `+hhmm`, widths 3 and 5 print `+hh:mm`.
fn push_offset(out: &mut String, seconds: i32, width: usize) {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes_total = seconds.unsigned_abs() / 60;
    let (hours, minutes) = (minutes_total / 60, minutes_total % 60);
    match width {
        1 if minutes == 0 => {
            let _ = write!(out, "{sign}{hours:02}");
        }
        1 | 2 | 4 => {
            let _ = write!(out, "{sign}{hours:02}{minutes:02}");
        }
        _ => {
            let _ = write!(out, "{sign}{hours:02}:{minutes:02}");
        }
    }
}

fn push_short_gmt(out: &mut String, seconds: i32) {
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes_total = seconds.unsigned_abs() / 60;
    let (hours, minutes) = (minutes_total / 60, minutes_total % 60);
    if minutes == 0 {
        let _ = write!(out, "{sign}{hours}");
    } else {
        let _ = write!(out, "{sign}{hours}:{minutes:02}");
    }
}
