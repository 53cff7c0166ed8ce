//! Gap filling for per-country statistic series.

use std::collections::BTreeMap;

use ipalloc_model::{FillPolicy, StatSource, Statistic, YearRange};

/// One [`Statistic`] per year of `years`, filled according to `policy`.
///
/// Observations outside the range are ignored. Gaps never borrow values from
/// another country; whatever no pass can fill stays a placeholder.
pub fn fill_series(
    years: YearRange,
    observed: Option<&BTreeMap<i32, f64>>,
    policy: FillPolicy,
) -> Vec<Statistic> {
    let mut slots: Vec<Option<Statistic>> = years
        .years()
        .map(|year| {
            observed
                .and_then(|series| series.get(&year))
                .map(|value| Statistic::observed(*value))
        })
        .collect();
    match policy {
        FillPolicy::BackwardThenForward => {
            fill_backward(&mut slots);
            fill_forward(&mut slots);
        }
        FillPolicy::ForwardThenBackward => {
            fill_forward(&mut slots);
            fill_backward(&mut slots);
        }
        FillPolicy::None => {}
    }
    slots
        .into_iter()
        .map(|slot| slot.unwrap_or_else(Statistic::placeholder))
        .collect()
}

/// Fills each gap with the nearest later observed value.
fn fill_backward(slots: &mut [Option<Statistic>]) {
    let mut next: Option<f64> = None;
    for slot in slots.iter_mut().rev() {
        match slot {
            Some(stat) if stat.source == StatSource::Observed => next = Some(stat.value),
            Some(_) => {}
            None => {
                *slot = next.map(|value| Statistic {
                    value,
                    source: StatSource::BackFilled,
                });
            }
        }
    }
}

/// Fills each gap with the nearest earlier observed value.
fn fill_forward(slots: &mut [Option<Statistic>]) {
    let mut previous: Option<f64> = None;
    for slot in slots.iter_mut() {
        match slot {
            Some(stat) if stat.source == StatSource::Observed => previous = Some(stat.value),
            Some(_) => {}
            None => {
                *slot = previous.map(|value| Statistic {
                    value,
                    source: StatSource::ForwardFilled,
                });
            }
        }
    }
}
