//! Deterministic dashboard scenarios.

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SW-001: One search through Analyzing, Syncing and Complete
    SingleSearch,

    /// SW-002: Second submission while a search is in flight
    RapidResubmit,

    /// SW-003: Whitespace-only submission
    BlankSearch,

    /// SW-004: Transitions for unknown searches and skipped phases
    StaleTimer,

    /// SW-005: Forecast day tab switching
    DaySwitch,

    /// SW-006: Wall-clock refresh and shutdown
    ClockTick,

    /// SW-007: Random searches and day switches for the whole duration
    Soak,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::SingleSearch,
            ScenarioId::RapidResubmit,
            ScenarioId::BlankSearch,
            ScenarioId::StaleTimer,
            ScenarioId::DaySwitch,
            ScenarioId::ClockTick,
            ScenarioId::Soak,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::SingleSearch => "single_search",
            ScenarioId::RapidResubmit => "rapid_resubmit",
            ScenarioId::BlankSearch => "blank_search",
            ScenarioId::StaleTimer => "stale_timer",
            ScenarioId::DaySwitch => "day_switch",
            ScenarioId::ClockTick => "clock_tick",
            ScenarioId::Soak => "soak",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::SingleSearch => "Statuses flip at 800ms and 2000ms, data only changes on Complete",
            ScenarioId::RapidResubmit => "Submissions during a search are rejected, the first one wins",
            ScenarioId::BlankSearch => "Blank input never starts a search or schedules a timer",
            ScenarioId::StaleTimer => "Foreign and out-of-order transitions are dropped and counted",
            ScenarioId::DaySwitch => "Changing the day regenerates the forecast, reselecting does not",
            ScenarioId::ClockTick => "Header clock follows the 1s tick until shutdown",
            ScenarioId::Soak => "Random input for the whole duration, invariants checked on every frame",
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "single_search" | "singlesearch" | "sw-001" => Ok(ScenarioId::SingleSearch),
            "rapid_resubmit" | "rapidresubmit" | "sw-002" => Ok(ScenarioId::RapidResubmit),
            "blank_search" | "blanksearch" | "sw-003" => Ok(ScenarioId::BlankSearch),
            "stale_timer" | "staletimer" | "sw-004" => Ok(ScenarioId::StaleTimer),
            "day_switch" | "dayswitch" | "sw-005" => Ok(ScenarioId::DaySwitch),
            "clock_tick" | "clocktick" | "sw-006" => Ok(ScenarioId::ClockTick),
            "soak" | "sw-007" => Ok(ScenarioId::Soak),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>(), Ok(scenario));
        }
        assert_eq!("SW-004".parse::<ScenarioId>(), Ok(ScenarioId::StaleTimer));
        assert!("split_brain".parse::<ScenarioId>().is_err());
    }
}
