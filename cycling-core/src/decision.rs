//! The go/no-go rule for a ride in the next few hours.

use thiserror::Error;

use crate::{
    config::Thresholds,
    model::{Decision, ForecastDay, HOURS_PER_DAY, HourlySample, Reason},
};

/// Mean precipitation (mm) above which a forecast rain flag turns into a rejection.
pub const RAIN_PRECIP_THRESHOLD_MM: f64 = 1.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecisionError {
    #[error("hour {0} is outside the range 0..=23")]
    HourOutOfRange(u32),
    #[error("no forecast samples from hour {hour} onwards (day has {available} samples)")]
    EmptyWindow { hour: u32, available: usize },
}

/// Aggregates over the samples in the lookahead window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowSummary {
    pub hours: usize,
    pub mean_temperature_c: f64,
    pub mean_wind_kph: f64,
    pub mean_cloud_pct: f64,
    pub mean_precip_mm: f64,
    pub any_rain: bool,
}

impl WindowSummary {
    /// `None` for an empty window, where no mean exists.
    pub fn from_samples(samples: &[HourlySample]) -> Option<Self> {
        if samples.is_empty() {
            return None;
        }

        let n = samples.len() as f64;
        let mean = |field: fn(&HourlySample) -> f64| samples.iter().map(field).sum::<f64>() / n;

        Some(Self {
            hours: samples.len(),
            mean_temperature_c: mean(|s| s.temp_c),
            mean_wind_kph: mean(|s| s.wind_kph),
            mean_cloud_pct: mean(|s| s.cloud),
            mean_precip_mm: mean(|s| s.precip_mm),
            any_rain: samples.iter().any(|s| s.will_it_rain),
        })
    }

    /// Checks run in priority order; the first one that fails decides the reason.
    pub fn judge(&self, thresholds: &Thresholds) -> Decision {
        if self.mean_temperature_c < thresholds.minimum_temperature {
            return Decision::reject(Reason::TooCold);
        }
        if self.mean_temperature_c > thresholds.maximum_temperature {
            return Decision::reject(Reason::TooHot);
        }
        if self.mean_wind_kph > thresholds.maximum_wind_speed {
            return Decision::reject(Reason::TooWindy);
        }

        let heavy_rain = self.any_rain && self.mean_precip_mm > RAIN_PRECIP_THRESHOLD_MM;
        if self.mean_cloud_pct > thresholds.maximum_cloud_coverage || heavy_rain {
            return Decision::reject(Reason::LikelyRain);
        }

        Decision::go()
    }
}

/// Samples from `current_hour` up to `hours_into_future` hours ahead, clipped to the day.
pub fn window<'a>(
    day: &'a ForecastDay,
    current_hour: u32,
    thresholds: &Thresholds,
) -> Result<&'a [HourlySample], DecisionError> {
    if current_hour as usize >= HOURS_PER_DAY {
        return Err(DecisionError::HourOutOfRange(current_hour));
    }

    let hours = day.hours();
    let start = (current_hour as usize).min(hours.len());
    let end = start
        .saturating_add(thresholds.hours_into_future as usize)
        .min(hours.len());

    let slice = &hours[start..end];
    if slice.is_empty() {
        return Err(DecisionError::EmptyWindow { hour: current_hour, available: hours.len() });
    }
    Ok(slice)
}

/// Summarise the window starting at `current_hour`.
pub fn summarize(
    day: &ForecastDay,
    current_hour: u32,
    thresholds: &Thresholds,
) -> Result<WindowSummary, DecisionError> {
    let samples = window(day, current_hour, thresholds)?;
    // window() never returns an empty slice.
    let summary = WindowSummary::from_samples(samples).ok_or(DecisionError::EmptyWindow {
        hour: current_hour,
        available: day.len(),
    })?;

    tracing::debug!(
        current_hour,
        hours = summary.hours,
        mean_temperature_c = summary.mean_temperature_c,
        mean_wind_kph = summary.mean_wind_kph,
        mean_cloud_pct = summary.mean_cloud_pct,
        mean_precip_mm = summary.mean_precip_mm,
        any_rain = summary.any_rain,
        "window averages"
    );
    Ok(summary)
}

/// Decide whether the next hours are good for cycling.
///
/// A missing forecast is not an error: it yields the "no data yet" verdict for any hour.
pub fn decide(
    forecast: Option<&ForecastDay>,
    current_hour: u32,
    thresholds: &Thresholds,
) -> Result<Decision, DecisionError> {
    let Some(day) = forecast else {
        return Ok(Decision::no_data());
    };

    Ok(summarize(day, current_hour, thresholds)?.judge(thresholds))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn benign() -> HourlySample {
        HourlySample {
            will_it_rain: false,
            precip_mm: 0.0,
            cloud: 10.0,
            temp_c: 20.0,
            wind_kph: 5.0,
        }
    }

    /// A full day of benign weather with `window` placed at `start`.
    fn day_with(start: usize, window: &[HourlySample]) -> ForecastDay {
        let mut hours = vec![benign(); HOURS_PER_DAY];
        hours[start..start + window.len()].copy_from_slice(window);
        ForecastDay::new(hours).unwrap()
    }

    fn reason(decision: Decision) -> Option<Reason> {
        decision.reason
    }

    #[test]
    fn absent_forecast_is_no_data_for_every_hour() {
        let t = Thresholds::default();
        for hour in 0..30 {
            let d = decide(None, hour, &t).unwrap();
            assert_eq!(d, Decision { suitable: false, reason: Some(Reason::NoData) });
        }
    }

    #[test]
    fn scenario_benign_window_is_suitable() {
        let w = [
            HourlySample { temp_c: 20.0, ..benign() },
            HourlySample { temp_c: 22.0, ..benign() },
        ];
        let day = day_with(9, &w);

        let d = decide(Some(&day), 9, &Thresholds::default()).unwrap();
        assert!(d.suitable);
        assert_eq!(d.reason, None);
    }

    #[test]
    fn scenario_cold_window() {
        let cold = HourlySample { temp_c: 10.0, ..benign() };
        let day = day_with(6, &[cold, cold]);

        let d = decide(Some(&day), 6, &Thresholds::default()).unwrap();
        assert_eq!(d, Decision::reject(Reason::TooCold));
    }

    #[test]
    fn scenario_cloudy_window_means_rain() {
        let cloudy = HourlySample { cloud: 80.0, ..benign() };
        let day = day_with(12, &[cloudy, cloudy]);

        let d = decide(Some(&day), 12, &Thresholds::default()).unwrap();
        assert_eq!(reason(d), Some(Reason::LikelyRain));
    }

    #[test]
    fn mean_precip_of_exactly_one_mm_passes() {
        let w = [
            HourlySample { will_it_rain: true, precip_mm: 2.0, ..benign() },
            HourlySample { will_it_rain: false, precip_mm: 0.0, ..benign() },
        ];
        let day = day_with(15, &w);

        let d = decide(Some(&day), 15, &Thresholds::default()).unwrap();
        assert!(d.suitable);
    }

    #[test]
    fn rain_flag_with_heavy_precip_rejects() {
        let w = [
            HourlySample { will_it_rain: true, precip_mm: 2.5, ..benign() },
            HourlySample { will_it_rain: false, precip_mm: 0.0, ..benign() },
        ];
        let day = day_with(15, &w);

        let d = decide(Some(&day), 15, &Thresholds::default()).unwrap();
        assert_eq!(reason(d), Some(Reason::LikelyRain));
    }

    #[test]
    fn heavy_precip_without_rain_flag_passes() {
        let wet = HourlySample { precip_mm: 5.0, ..benign() };
        let day = day_with(3, &[wet, wet]);

        let d = decide(Some(&day), 3, &Thresholds::default()).unwrap();
        assert!(d.suitable);
    }

    #[test]
    fn temperature_equal_to_limits_is_accepted() {
        let t = Thresholds::default();

        let at_min = HourlySample { temp_c: t.minimum_temperature, ..benign() };
        let day = day_with(0, &[at_min, at_min]);
        assert!(decide(Some(&day), 0, &t).unwrap().suitable);

        let at_max = HourlySample { temp_c: t.maximum_temperature, ..benign() };
        let day = day_with(0, &[at_max, at_max]);
        assert!(decide(Some(&day), 0, &t).unwrap().suitable);
    }

    #[test]
    fn wind_and_cloud_limits_are_strict() {
        let t = Thresholds::default();
        let edge = HourlySample {
            wind_kph: t.maximum_wind_speed,
            cloud: t.maximum_cloud_coverage,
            ..benign()
        };
        let day = day_with(0, &[edge, edge]);
        assert!(decide(Some(&day), 0, &t).unwrap().suitable);
    }

    #[test]
    fn earlier_checks_take_priority() {
        let t = Thresholds::default();
        let everything_bad = HourlySample {
            will_it_rain: true,
            precip_mm: 10.0,
            cloud: 100.0,
            temp_c: 5.0,
            wind_kph: 50.0,
        };
        let day = day_with(8, &[everything_bad, everything_bad]);
        assert_eq!(reason(decide(Some(&day), 8, &t).unwrap()), Some(Reason::TooCold));

        let hot_and_windy = HourlySample { temp_c: 30.0, wind_kph: 50.0, cloud: 100.0, ..benign() };
        let day = day_with(8, &[hot_and_windy, hot_and_windy]);
        assert_eq!(reason(decide(Some(&day), 8, &t).unwrap()), Some(Reason::TooHot));

        let windy_and_cloudy = HourlySample { wind_kph: 25.0, cloud: 100.0, ..benign() };
        let day = day_with(8, &[windy_and_cloudy, windy_and_cloudy]);
        assert_eq!(reason(decide(Some(&day), 8, &t).unwrap()), Some(Reason::TooWindy));
    }

    #[test]
    fn only_samples_inside_the_window_count() {
        // Hour 9 is cold, but the window starts at 10.
        let cold = HourlySample { temp_c: -5.0, ..benign() };
        let day = day_with(9, &[cold]);

        assert!(decide(Some(&day), 10, &Thresholds::default()).unwrap().suitable);
        assert_eq!(
            reason(decide(Some(&day), 8, &Thresholds::default()).unwrap()),
            Some(Reason::TooCold)
        );
    }

    #[test]
    fn window_is_clipped_at_end_of_day() {
        let t = Thresholds { hours_into_future: 5, ..Thresholds::default() };
        let day = day_with(0, &[]);

        let samples = window(&day, 22, &t).unwrap();
        assert_eq!(samples.len(), 2);

        let summary = summarize(&day, 23, &t).unwrap();
        assert_eq!(summary.hours, 1);
    }

    #[test]
    fn averages_are_arithmetic_means() {
        let w = [
            HourlySample { temp_c: 16.0, wind_kph: 4.0, cloud: 20.0, precip_mm: 0.5, ..benign() },
            HourlySample { temp_c: 18.0, wind_kph: 8.0, cloud: 40.0, precip_mm: 1.5, ..benign() },
            HourlySample { temp_c: 20.0, wind_kph: 12.0, cloud: 60.0, precip_mm: 1.0, will_it_rain: true },
        ];
        let t = Thresholds { hours_into_future: 3, ..Thresholds::default() };
        let day = day_with(4, &w);

        let s = summarize(&day, 4, &t).unwrap();
        assert_eq!(s.hours, 3);
        assert_eq!(s.mean_temperature_c, 18.0);
        assert_eq!(s.mean_wind_kph, 8.0);
        assert_eq!(s.mean_cloud_pct, 40.0);
        assert_eq!(s.mean_precip_mm, 1.0);
        assert!(s.any_rain);
    }

    #[test]
    fn hour_out_of_range_is_rejected() {
        let day = day_with(0, &[]);
        let err = decide(Some(&day), 24, &Thresholds::default()).unwrap_err();
        assert_eq!(err, DecisionError::HourOutOfRange(24));
    }

    #[test]
    fn empty_window_is_rejected() {
        let short = ForecastDay::new(vec![benign(); 6]).unwrap();
        let err = decide(Some(&short), 6, &Thresholds::default()).unwrap_err();
        assert_eq!(err, DecisionError::EmptyWindow { hour: 6, available: 6 });

        let zero = Thresholds { hours_into_future: 0, ..Thresholds::default() };
        let day = day_with(0, &[]);
        assert!(matches!(
            decide(Some(&day), 3, &zero),
            Err(DecisionError::EmptyWindow { hour: 3, .. })
        ));
    }

    #[test]
    fn deciding_twice_gives_the_same_answer() {
        let windy = HourlySample { wind_kph: 30.0, ..benign() };
        let day = day_with(17, &[windy, windy]);
        let t = Thresholds::default();

        let first = decide(Some(&day), 17, &t).unwrap();
        let second = decide(Some(&day), 17, &t).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, Decision::reject(Reason::TooWindy));
    }
}
