//! Record generation

use chrono::DateTime;
use models_activity::{Action, ActivityRecord, Entity, Status};
use rand::{Rng, seq::IndexedRandom};
use strum::VariantArray;

use crate::{GeneratorConfig, Result, TimeWindow, error::GeneratorError};


/// Generates `count` activity records.
///
/// Every record is drawn independently: a user uniformly from `population`, action, status
/// and location uniformly from their candidate sets, a timestamp uniformly inside `window`
/// and the numeric fields uniformly from the ranges in `config`.
#[tracing::instrument(skip(rng, population, config), fields(population = population.len()))]
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    count: usize,
    window: &TimeWindow,
    population: &[Entity],
    config: &GeneratorConfig,
) -> Result<Vec<ActivityRecord>> {
    if count == 0 {
        return Err(GeneratorError::invalid("count", "must be greater than zero"));
    }
    if population.is_empty() {
        return Err(GeneratorError::invalid(
            "population",
            "at least one entity is required",
        ));
    }
    config.validate()?;

    let records: Vec<ActivityRecord> = (0..count)
        .map(|_| generate_one(rng, window, population, config))
        .collect::<Result<_>>()?;

    tracing::debug!(count = records.len(), "generated activity records");

    Ok(records)
}

fn generate_one<R: Rng + ?Sized>(
    rng: &mut R,
    window: &TimeWindow,
    population: &[Entity],
    config: &GeneratorConfig,
) -> Result<ActivityRecord> {
    let user = pick(rng, population, "population")?;
    let action = *pick(rng, Action::VARIANTS, "action")?;
    let status = *pick(rng, Status::VARIANTS, "status")?;
    let location = *pick(rng, &config.locations, "locations")?;
    let user_agent = pick(rng, &config.user_agents, "user_agents")?.clone();

    let millis = rng.random_range(window.millis_range());
    let timestamp = DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        GeneratorError::invalid("window", format!("{millis}ms is not a representable time"))
    })?;

    let (low, high) = (
        *config.response_time_ms.start(),
        *config.response_time_ms.end(),
    );
    let response_time = round_to_hundredths(rng.random_range(low..=high)).clamp(low, high);

    let session_duration = rng.random_range(config.session_duration_secs.clone());
    let ip_address = config.ip_template.sample(rng);

    Ok(ActivityRecord {
        timestamp,
        user_id: user.id.clone(),
        user_name: user.name.clone(),
        action,
        department: user.department,
        status,
        response_time,
        ip_address,
        user_agent,
        location,
        session_duration,
    })
}

fn pick<'a, R: Rng + ?Sized, T>(
    rng: &mut R,
    candidates: &'a [T],
    argument: &'static str,
) -> Result<&'a T> {
    candidates
        .choose(rng)
        .ok_or_else(|| GeneratorError::invalid(argument, "no candidates to choose from"))
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
