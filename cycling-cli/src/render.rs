use cycling_core::{Decision, Thresholds, WindowSummary};
use std::fmt::Write;

pub const TITLE: &str = "Is it a good idea to go cycling today?";
pub const YES: &str = "Yes!";
pub const NO: &str = "No.";

/// The verdict line, e.g. `No. Temperature is too cold.`
pub fn verdict(decision: &Decision) -> String {
    if decision.suitable {
        return YES.to_string();
    }
    match decision.reason {
        Some(reason) => format!("{NO} {reason}"),
        None => NO.to_string(),
    }
}

/// Title, verdict and, when known, the location in parentheses.
pub fn report(decision: &Decision, location: &str) -> String {
    let mut out = format!("{TITLE}\n{}\n", verdict(decision));
    if !location.is_empty() {
        let _ = writeln!(out, "({location})");
    }
    out
}

pub fn summary(summary: &WindowSummary) -> String {
    format!(
        "Next {} h: {:.1} °C, wind {:.1} km/h, clouds {:.0} %, precipitation {:.1} mm{}",
        summary.hours,
        summary.mean_temperature_c,
        summary.mean_wind_kph,
        summary.mean_cloud_pct,
        summary.mean_precip_mm,
        if summary.any_rain { ", rain expected" } else { "" },
    )
}

pub fn thresholds(t: &Thresholds) -> String {
    format!(
        "minimum_temperature    = {} °C\n\
         maximum_temperature    = {} °C\n\
         maximum_wind_speed     = {} km/h\n\
         maximum_cloud_coverage = {} %\n\
         hours_into_future      = {} h\n",
        t.minimum_temperature,
        t.maximum_temperature,
        t.maximum_wind_speed,
        t.maximum_cloud_coverage,
        t.hours_into_future,
    )
}
