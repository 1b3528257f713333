use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Rendered in place of a duration that could not be formatted.
pub const NO_DATA: &str = "-";

/// Number of units shown by [`Mode::Default`].
pub const DEFAULT_UNIT_COUNT: usize = 3;

const LESS_THAN_ONE: &str = "< 1";

// Months are averaged at 30.41666 days, years at twelve of those months.
const MILLIS_PER_UNIT: [f64; 9] = [
    12.0 * 30.41666 * 24.0 * 60.0 * 60.0 * 1000.0,
    30.41666 * 24.0 * 60.0 * 60.0 * 1000.0,
    24.0 * 60.0 * 60.0 * 1000.0,
    60.0 * 60.0 * 1000.0,
    60.0 * 1000.0,
    1000.0,
    1.0,
    0.001,
    0.000001,
];

/// A duration granularity, declared from largest to smallest magnitude.
///
/// The derived ordering follows declaration order, so `Year` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl TimeUnit {
    /// Every unit, largest first.
    pub const ALL: [TimeUnit; 9] = [
        TimeUnit::Year,
        TimeUnit::Month,
        TimeUnit::Day,
        TimeUnit::Hour,
        TimeUnit::Minute,
        TimeUnit::Second,
        TimeUnit::Millisecond,
        TimeUnit::Microsecond,
        TimeUnit::Nanosecond,
    ];

    /// Milliseconds in one of this unit.
    pub fn millis(self) -> f64 {
        MILLIS_PER_UNIT[self as usize]
    }

    /// Short display label, e.g. `"min"` or `"µs"`.
    pub fn symbol(self) -> &'static str {
        match self {
            TimeUnit::Year => "y",
            TimeUnit::Month => "mo",
            TimeUnit::Day => "d",
            TimeUnit::Hour => "h",
            TimeUnit::Minute => "min",
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "µs",
            TimeUnit::Nanosecond => "ns",
        }
    }

    /// Converts `value` of this unit to milliseconds.
    pub fn to_millis(self, value: f64) -> f64 {
        value * self.millis()
    }

    /// Converts `millis` milliseconds to this unit.
    pub fn from_millis(self, millis: f64) -> f64 {
        millis / self.millis()
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for TimeUnit {
    type Err = ParseUnitError;

    /// Accepts the display symbols plus English names, case-insensitively.
    /// A bare `m` is rejected since it could mean month or minute.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s.trim().to_lowercase().as_str() {
            "y" | "yr" | "year" | "years" => TimeUnit::Year,
            "mo" | "month" | "months" => TimeUnit::Month,
            "d" | "day" | "days" => TimeUnit::Day,
            "h" | "hr" | "hour" | "hours" => TimeUnit::Hour,
            "min" | "minute" | "minutes" => TimeUnit::Minute,
            "s" | "sec" | "second" | "seconds" => TimeUnit::Second,
            "ms" | "millisecond" | "milliseconds" => TimeUnit::Millisecond,
            "µs" | "μs" | "us" | "microsecond" | "microseconds" => TimeUnit::Microsecond,
            "ns" | "nanosecond" | "nanoseconds" => TimeUnit::Nanosecond,
            _ => {
                return Err(ParseUnitError {
                    input: s.to_string(),
                })
            }
        };
        Ok(unit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown time unit: `{input}`")]
pub struct ParseUnitError {
    input: String,
}

impl ParseUnitError {
    /// The rejected input, untrimmed.
    pub fn input(&self) -> &str {
        &self.input
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseModeError {
    #[error("duration mode must not be empty")]
    Empty,

    #[error("unit count must be at least 1")]
    ZeroCount,

    #[error("invalid duration mode: `{0}` (expected `default`, `precise`, or a unit count)")]
    Invalid(String),
}

/// How a duration is broken down for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Up to [`DEFAULT_UNIT_COUNT`] significant units, or one rounded
    /// amount when an output unit is set.
    #[default]
    Default,
    /// Full fractional precision.
    Precise,
    /// Up to `n` significant units. Output units are ignored.
    Count(NonZeroUsize),
}

impl Mode {
    /// Returns `None` for a zero count.
    pub fn count(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(Mode::Count)
    }

    /// Maximum number of unit slots a decomposition may use.
    pub fn unit_cap(self) -> usize {
        match self {
            Mode::Default => DEFAULT_UNIT_COUNT,
            Mode::Precise => TimeUnit::ALL.len(),
            Mode::Count(n) => n.get(),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Default => f.write_str("default"),
            Mode::Precise => f.write_str("precise"),
            Mode::Count(n) => write!(f, "{}", n),
        }
    }
}

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ParseModeError::Empty);
        }
        if s.eq_ignore_ascii_case("default") {
            return Ok(Mode::Default);
        }
        if s.eq_ignore_ascii_case("precise") {
            return Ok(Mode::Precise);
        }
        let n: usize = s
            .parse()
            .map_err(|_| ParseModeError::Invalid(s.to_string()))?;
        Mode::count(n).ok_or(ParseModeError::ZeroCount)
    }
}

/// The value and unit a formatting call started from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceData {
    pub input: f64,
    pub unit: TimeUnit,
}

/// A rendered duration.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedValue {
    source: SourceData,
    transformed_value: f64,
    parts: Vec<(TimeUnit, String)>,
    display_value: String,
    display_unit: Option<TimeUnit>,
    display_white_space: bool,
}

impl FormattedValue {
    /// A value shown in exactly one unit, e.g. `"< 1"` + `s`.
    fn single(source: SourceData, unit: TimeUnit, value: String) -> Self {
        Self {
            source,
            transformed_value: source.input,
            parts: vec![(unit, value.clone())],
            display_value: value,
            display_unit: Some(unit),
            display_white_space: true,
        }
    }

    /// A breakdown like `"1 h 30 min"`. Units are inlined into the display value.
    fn breakdown(source: SourceData, amounts: Vec<(TimeUnit, f64)>) -> Self {
        let parts: Vec<(TimeUnit, String)> = amounts
            .into_iter()
            .map(|(unit, amount)| (unit, js_number(amount)))
            .collect();
        let display_value = parts
            .iter()
            .map(|(unit, amount)| format!("{} {}", amount, unit))
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            source,
            transformed_value: source.input,
            parts,
            display_value,
            display_unit: None,
            display_white_space: false,
        }
    }

    pub fn source(&self) -> SourceData {
        self.source
    }

    pub fn transformed_value(&self) -> f64 {
        self.transformed_value
    }

    /// Rendered amounts, largest unit first.
    pub fn parts(&self) -> &[(TimeUnit, String)] {
        &self.parts
    }

    pub fn display_value(&self) -> &str {
        &self.display_value
    }

    /// Set only when the whole value is expressed in a single unit.
    pub fn display_unit(&self) -> Option<TimeUnit> {
        self.display_unit
    }

    /// Whether [`Display`](fmt::Display) puts a space between
    /// [`display_value`](Self::display_value) and the display unit.
    ///
    /// Only single-unit results carry a display unit, so this is `false` for
    /// breakdowns even though their parts are space-separated inside the
    /// display value.
    pub fn display_white_space(&self) -> bool {
        self.display_white_space
    }
}

impl fmt::Display for FormattedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.display_unit {
            Some(unit) if self.display_white_space => {
                write!(f, "{} {}", self.display_value, unit)
            }
            Some(unit) => write!(f, "{}{}", self.display_value, unit),
            None => f.write_str(&self.display_value),
        }
    }
}

/// Outcome of a formatting call: a value, or the [`NO_DATA`] sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum Formatted {
    Value(FormattedValue),
    NoData,
}

impl Formatted {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Formatted::NoData)
    }

    pub fn value(&self) -> Option<&FormattedValue> {
        match self {
            Formatted::Value(value) => Some(value),
            Formatted::NoData => None,
        }
    }

    pub fn into_value(self) -> Option<FormattedValue> {
        match self {
            Formatted::Value(value) => Some(value),
            Formatted::NoData => None,
        }
    }
}

impl fmt::Display for Formatted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formatted::Value(value) => fmt::Display::fmt(value, f),
            Formatted::NoData => f.write_str(NO_DATA),
        }
    }
}

/// Formatting settings, built up by chaining.
///
/// ```
/// use durafmt::{DurationFormatter, Mode, TimeUnit};
///
/// let formatter = DurationFormatter::new()
///     .input_unit(TimeUnit::Minute)
///     .mode(Mode::Default);
/// assert_eq!(formatter.format(90.0).to_string(), "1 h 30 min");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DurationFormatter {
    mode: Mode,
    output_unit: Option<TimeUnit>,
    input_unit: TimeUnit,
}

impl Default for DurationFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl DurationFormatter {
    /// Default mode, no output unit, input in milliseconds.
    pub const fn new() -> Self {
        Self {
            mode: Mode::Default,
            output_unit: None,
            input_unit: TimeUnit::Millisecond,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Forces the result into a single unit. Ignored by [`Mode::Count`].
    pub fn output_unit(mut self, unit: TimeUnit) -> Self {
        self.output_unit = Some(unit);
        self
    }

    pub fn input_unit(mut self, unit: TimeUnit) -> Self {
        self.input_unit = unit;
        self
    }

    /// Formats `duration`, read in the configured input unit.
    ///
    /// Outside precise mode, a non-positive duration renders as `"< 1"` of
    /// the input unit. Non-finite durations yield [`Formatted::NoData`].
    pub fn format(&self, duration: f64) -> Formatted {
        let millis = self.input_unit.to_millis(duration);
        if !duration.is_finite() || !millis.is_finite() {
            tracing::debug!(duration, unit = %self.input_unit, "duration is not finite");
            return Formatted::NoData;
        }

        let source = SourceData {
            input: duration,
            unit: self.input_unit,
        };
        if duration <= 0.0 && self.mode != Mode::Precise {
            return Formatted::Value(FormattedValue::single(
                source,
                self.input_unit,
                LESS_THAN_ONE.to_string(),
            ));
        }

        let value = match (self.mode, self.output_unit) {
            (Mode::Precise, Some(output)) => {
                FormattedValue::single(source, output, js_number(output.from_millis(millis)))
            }
            (Mode::Precise, None) => {
                let amounts = decompose(millis, self.mode.unit_cap());
                if amounts.is_empty() {
                    FormattedValue::single(source, self.input_unit, js_number(duration))
                } else {
                    FormattedValue::breakdown(source, amounts)
                }
            }
            (Mode::Default, Some(output)) => {
                let amount = output.from_millis(millis).round();
                let rendered = if amount < 1.0 {
                    LESS_THAN_ONE.to_string()
                } else {
                    js_number(amount)
                };
                FormattedValue::single(source, output, rendered)
            }
            (mode, _) => {
                let amounts = decompose(millis, mode.unit_cap());
                if amounts.is_empty() {
                    FormattedValue::single(source, self.input_unit, LESS_THAN_ONE.to_string())
                } else {
                    FormattedValue::breakdown(source, amounts)
                }
            }
        };
        Formatted::Value(value)
    }
}

/// Formats `duration` (given in `input_unit`) for display.
///
/// ```
/// use durafmt::{format_time, Mode, TimeUnit};
///
/// let shown = format_time(2500.0, Mode::Default, Some(TimeUnit::Second), TimeUnit::Millisecond);
/// assert_eq!(shown.to_string(), "3 s");
/// ```
pub fn format_time(
    duration: f64,
    mode: Mode,
    output_unit: Option<TimeUnit>,
    input_unit: TimeUnit,
) -> Formatted {
    let mut formatter = DurationFormatter::new().mode(mode).input_unit(input_unit);
    formatter.output_unit = output_unit;
    formatter.format(duration)
}

/// String-typed entry point. A missing mode means default, a missing input
/// unit means milliseconds. Any unrecognized string yields
/// [`Formatted::NoData`].
pub fn format_time_str(
    duration: f64,
    mode: Option<&str>,
    output_unit: Option<&str>,
    input_unit: Option<&str>,
) -> Formatted {
    match parse_request(mode, output_unit, input_unit) {
        Ok(formatter) => formatter.format(duration),
        Err(err) => {
            tracing::debug!(%err, "unformattable duration request");
            Formatted::NoData
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum RequestError {
    #[error(transparent)]
    Unit(#[from] ParseUnitError),

    #[error(transparent)]
    Mode(#[from] ParseModeError),
}

fn parse_request(
    mode: Option<&str>,
    output_unit: Option<&str>,
    input_unit: Option<&str>,
) -> Result<DurationFormatter, RequestError> {
    let input_unit = match input_unit {
        Some(unit) => unit.parse::<TimeUnit>()?,
        None => TimeUnit::Millisecond,
    };
    let mode = match mode {
        Some(mode) => mode.parse::<Mode>()?,
        None => Mode::Default,
    };
    let mut formatter = DurationFormatter::new().mode(mode).input_unit(input_unit);
    if let Some(unit) = output_unit {
        formatter = formatter.output_unit(unit.parse::<TimeUnit>()?);
    }
    Ok(formatter)
}

/// Greedy largest-first breakdown of `millis`, truncating each amount.
///
/// Once the first non-zero unit is emitted, every following unit uses one of
/// the `cap` slots even when its amount is zero. The remainder is reduced by
/// every unit, emitted or not.
fn decompose(millis: f64, cap: usize) -> Vec<(TimeUnit, f64)> {
    tracing::trace!(millis, cap, "decomposing duration");
    let mut rest = millis;
    let mut used = 0;
    let mut amounts = Vec::new();
    for unit in TimeUnit::ALL {
        let factor = unit.millis();
        let amount = (rest / factor).trunc();
        if used < cap {
            if amount > 0.0 {
                amounts.push((unit, amount));
                used += 1;
            } else if used > 0 {
                used += 1;
            }
        }
        rest -= amount * factor;
    }
    amounts
}

/// Shortest round-trip rendering, matching JavaScript's `Number#toString`.
fn js_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    let mut buf = ryu_js::Buffer::new();
    buf.format(value).to_string()
}
