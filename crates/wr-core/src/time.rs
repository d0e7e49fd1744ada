//! Time-of-day constraint model.
//!
//! # Design
//!
//! Time is a simulated hour of the working day, `FIRST_HOUR..=LAST_HOUR`.
//! Planning advances it by whole hours of elapsed travel:
//!
//!   hour += floor(minutes / 60), clamped at `LAST_HOUR`
//!
//! Each street's travel cost at the current hour is
//!
//!   base × band multiplier × Π(active incident multipliers)
//!
//! or `+∞` while the street sits inside a closure window.  Direction-change
//! arcs belong to no street: they pay the band multiplier only and are never
//! closed.

use std::collections::BTreeMap;
use std::fmt;

use crate::{CityRng, CoreError, CoreResult, StreetId};

/// Hour of the day, `0..=24`.
pub type Hour = u8;

/// First hour a tour may start.
pub const FIRST_HOUR: Hour = 6;
/// End of the working day.  The clock never advances past it.
pub const LAST_HOUR: Hour = 22;

/// Departure hour used when none is configured.
pub const DEFAULT_DEPARTURE: Hour = 8;

// ── TrafficBand ───────────────────────────────────────────────────────────────

/// Hour-of-day traffic bucket.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TrafficBand {
    /// 06h–08h, ×1.0
    QuietMorning,
    /// 08h–10h, ×1.8
    MorningPeak,
    /// 10h–16h, ×1.2
    Midday,
    /// 16h–19h, ×2.0
    EveningPeak,
    /// 19h–22h, ×1.1.  Also the fallback outside every range.
    QuietEvening,
}

impl TrafficBand {
    pub const ALL: [TrafficBand; 5] = [
        TrafficBand::QuietMorning,
        TrafficBand::MorningPeak,
        TrafficBand::Midday,
        TrafficBand::EveningPeak,
        TrafficBand::QuietEvening,
    ];

    /// Half-open `[start, end)` hour range of the band.
    pub fn hours(self) -> (Hour, Hour) {
        match self {
            TrafficBand::QuietMorning => (6, 8),
            TrafficBand::MorningPeak  => (8, 10),
            TrafficBand::Midday       => (10, 16),
            TrafficBand::EveningPeak  => (16, 19),
            TrafficBand::QuietEvening => (19, 22),
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            TrafficBand::QuietMorning => 1.0,
            TrafficBand::MorningPeak  => 1.8,
            TrafficBand::Midday       => 1.2,
            TrafficBand::EveningPeak  => 2.0,
            TrafficBand::QuietEvening => 1.1,
        }
    }

    pub fn for_hour(hour: Hour) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| {
                let (start, end) = band.hours();
                (start..end).contains(&hour)
            })
            .unwrap_or(TrafficBand::QuietEvening)
    }
}

impl fmt::Display for TrafficBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (start, end) = self.hours();
        write!(f, "{start:02}h-{end:02}h (x{:.1})", self.multiplier())
    }
}

// ── Incidents ─────────────────────────────────────────────────────────────────

/// Kinds of random traffic incident.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IncidentKind {
    Roadworks,
    Accident,
    Demonstration,
    Delivery,
    Market,
}

impl IncidentKind {
    pub const ALL: [IncidentKind; 5] = [
        IncidentKind::Roadworks,
        IncidentKind::Accident,
        IncidentKind::Demonstration,
        IncidentKind::Delivery,
        IncidentKind::Market,
    ];

    pub fn description(self) -> &'static str {
        match self {
            IncidentKind::Roadworks     => "roadworks",
            IncidentKind::Accident      => "accident",
            IncidentKind::Demonstration => "demonstration",
            IncidentKind::Delivery      => "delivery truck",
            IncidentKind::Market        => "street market",
        }
    }

    /// Travel-time multiplier while the incident is active.
    pub fn multiplier(self) -> f64 {
        match self {
            IncidentKind::Roadworks     => 3.0,
            IncidentKind::Accident      => 2.5,
            IncidentKind::Demonstration => 4.0,
            IncidentKind::Delivery      => 1.5,
            IncidentKind::Market        => 1.8,
        }
    }

    pub fn duration_minutes(self) -> u32 {
        match self {
            IncidentKind::Roadworks     => 60,
            IncidentKind::Accident      => 45,
            IncidentKind::Demonstration => 90,
            IncidentKind::Delivery      => 15,
            IncidentKind::Market        => 180,
        }
    }

    /// Whole hours the incident stays active (duration rounded up).
    pub fn active_hours(self) -> Hour {
        self.duration_minutes().div_ceil(60) as Hour
    }
}

/// A timed incident on one street, active over `[start, end)`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    pub street: StreetId,
    pub kind: IncidentKind,
    pub start: Hour,
    pub end: Hour,
}

impl Incident {
    pub fn new(street: StreetId, kind: IncidentKind, start: Hour) -> Self {
        Self { street, kind, start, end: start.saturating_add(kind.active_hours()) }
    }

    #[inline]
    pub fn is_active(&self, hour: Hour) -> bool {
        (self.start..self.end).contains(&hour)
    }
}

// ── Closures ──────────────────────────────────────────────────────────────────

/// Hours during which a street may not be driven, `[from, until)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClosureWindow {
    pub from: Hour,
    pub until: Hour,
}

impl ClosureWindow {
    pub fn new(from: Hour, until: Hour) -> CoreResult<Self> {
        for h in [from, until] {
            if h > 24 {
                return Err(CoreError::InvalidHour(h));
            }
        }
        if from >= until {
            return Err(CoreError::InvalidWindow { from, until });
        }
        Ok(Self { from, until })
    }

    #[inline]
    pub fn contains(&self, hour: Hour) -> bool {
        (self.from..self.until).contains(&hour)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Simulated hour of the working day.
///
/// `SimClock` remembers the departure hour so that each planning run can
/// restart from it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    departure: Hour,
    current: Hour,
}

impl SimClock {
    /// Create a clock at `departure`, which must lie in
    /// `FIRST_HOUR..=LAST_HOUR`.
    pub fn new(departure: Hour) -> CoreResult<Self> {
        check_hour(departure)?;
        Ok(Self { departure, current: departure })
    }

    #[inline]
    pub fn current(&self) -> Hour {
        self.current
    }

    #[inline]
    pub fn departure(&self) -> Hour {
        self.departure
    }

    /// Change the departure hour and move the clock to it.
    pub fn set_departure(&mut self, hour: Hour) -> CoreResult<()> {
        check_hour(hour)?;
        self.departure = hour;
        self.current = hour;
        Ok(())
    }

    /// Move back to the departure hour.
    #[inline]
    pub fn restart(&mut self) {
        self.current = self.departure;
    }

    /// Advance by whole hours of `minutes`, clamped at `LAST_HOUR`.
    /// Negative or non-finite inputs leave the clock unchanged.
    pub fn advance(&mut self, minutes: f64) {
        if !minutes.is_finite() || minutes <= 0.0 {
            return;
        }
        let hours = (minutes / 60.0).floor().min(f64::from(LAST_HOUR)) as Hour;
        self.current = self.current.saturating_add(hours).min(LAST_HOUR);
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self { departure: DEFAULT_DEPARTURE, current: DEFAULT_DEPARTURE }
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}h00 (departed {:02}h00)", self.current, self.departure)
    }
}

fn check_hour(hour: Hour) -> CoreResult<()> {
    if (FIRST_HOUR..=LAST_HOUR).contains(&hour) {
        Ok(())
    } else {
        Err(CoreError::InvalidHour(hour))
    }
}

// ── StreetStatus ──────────────────────────────────────────────────────────────

/// Traffic condition of a street at the current hour.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StreetStatus {
    Closed,
    /// Multiplier above 1.5.
    Delayed(f64),
    /// Multiplier above 1.0.
    Slowed(f64),
    Fluid,
}

// ── TimeConstraints ───────────────────────────────────────────────────────────

/// Clock, per-street closure windows and timed incidents.
///
/// Queried on every edge relaxation; advanced by the tour builders as travel
/// time elapses.
#[derive(Debug, Clone)]
pub struct TimeConstraints {
    clock:     SimClock,
    closures:  BTreeMap<StreetId, ClosureWindow>,
    incidents: Vec<Incident>,
    rng:       CityRng,
}

impl TimeConstraints {
    /// Departure at `DEFAULT_DEPARTURE`, no closures, no incidents.
    pub fn new(rng: CityRng) -> Self {
        Self {
            clock: SimClock::default(),
            closures: BTreeMap::new(),
            incidents: Vec::new(),
            rng,
        }
    }

    // ── Clock ─────────────────────────────────────────────────────────────

    #[inline]
    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    #[inline]
    pub fn current_hour(&self) -> Hour {
        self.clock.current()
    }

    pub fn set_departure_hour(&mut self, hour: Hour) -> CoreResult<()> {
        self.clock.set_departure(hour)
    }

    #[inline]
    pub fn advance(&mut self, minutes: f64) {
        self.clock.advance(minutes);
    }

    #[inline]
    pub fn restart_clock(&mut self) {
        self.clock.restart();
    }

    // ── Closures ──────────────────────────────────────────────────────────

    /// Close `street` over `[from, until)`.  Replaces any earlier window.
    pub fn add_closure(&mut self, street: StreetId, from: Hour, until: Hour) -> CoreResult<()> {
        let window = ClosureWindow::new(from, until)?;
        self.closures.insert(street, window);
        Ok(())
    }

    pub fn closures(&self) -> impl Iterator<Item = (StreetId, ClosureWindow)> + '_ {
        self.closures.iter().map(|(&s, &w)| (s, w))
    }

    // ── Incidents ─────────────────────────────────────────────────────────

    pub fn add_incident(&mut self, incident: Incident) {
        self.incidents.push(incident);
    }

    /// Draw `count` random incidents over `streets` and append them.
    /// Returns the newly generated incidents.
    pub fn generate_incidents(&mut self, streets: &[StreetId], count: usize) -> &[Incident] {
        let first_new = self.incidents.len();
        if streets.is_empty() {
            return &self.incidents[first_new..];
        }
        for _ in 0..count {
            let Some(&street) = self.rng.choose(streets) else { break };
            let Some(&kind) = self.rng.choose(&IncidentKind::ALL) else { break };
            let start = self.rng.gen_range(FIRST_HOUR..LAST_HOUR);
            let incident = Incident::new(street, kind, start);
            log::debug!(
                "incident: {} on {} {:02}h-{:02}h (x{:.1})",
                kind.description(),
                street,
                incident.start,
                incident.end,
                kind.multiplier()
            );
            self.incidents.push(incident);
        }
        &self.incidents[first_new..]
    }

    pub fn clear_incidents(&mut self) {
        self.incidents.clear();
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    // ── Cost queries ──────────────────────────────────────────────────────

    /// `false` iff `street` has a closure window containing the current hour.
    /// `None` (a direction change) is always accessible.
    pub fn is_accessible(&self, street: Option<StreetId>) -> bool {
        let hour = self.clock.current();
        street
            .and_then(|s| self.closures.get(&s))
            .is_none_or(|window| !window.contains(hour))
    }

    /// Band multiplier times the product of every incident active on
    /// `street` at the current hour.
    pub fn delay_multiplier(&self, street: Option<StreetId>) -> f64 {
        let hour = self.clock.current();
        let band = TrafficBand::for_hour(hour).multiplier();
        let Some(street) = street else { return band };
        self.incidents
            .iter()
            .filter(|i| i.street == street && i.is_active(hour))
            .fold(band, |acc, i| acc * i.kind.multiplier())
    }

    /// `+∞` while closed, otherwise `base × delay_multiplier`.
    pub fn adjusted_duration(&self, street: Option<StreetId>, base: f64) -> f64 {
        if !self.is_accessible(street) {
            return f64::INFINITY;
        }
        base * self.delay_multiplier(street)
    }

    pub fn status(&self, street: StreetId) -> StreetStatus {
        if !self.is_accessible(Some(street)) {
            return StreetStatus::Closed;
        }
        let m = self.delay_multiplier(Some(street));
        if m > 1.5 {
            StreetStatus::Delayed(m)
        } else if m > 1.0 {
            StreetStatus::Slowed(m)
        } else {
            StreetStatus::Fluid
        }
    }
}
