//! Travel-time matrix assembly.
//!
//! A matrix request asks for every start-to-destination combination. When
//! the provider has native matrix endpoints the assembler picks the one
//! matching the shape of the request and renumbers the provider's indices
//! back into caller indices; otherwise it fans out one pairwise request per
//! cell and joins the results. Either way the caller gets the complete
//! cross product in row-major order, or an error; there are no partial
//! matrices.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use futures::future::try_join_all;
use tracing::debug;

use crate::error::{ErrorKind, RoutingError};
use crate::model::{Location, TimeMatrixEntry};
use crate::provider::{BatchMatrixProvider, RouteProvider};

/// Assemble the complete travel-time matrix between `starts` and
/// `destinations`.
///
/// Entries come back in row-major order: the cell for start `i` and
/// destination `j` sits at index `i * destinations.len() + j`. An empty
/// start or destination list yields an empty matrix without touching the
/// provider. A failure of any underlying request fails the whole matrix;
/// outstanding sibling requests are dropped.
///
/// `departure` reaches pairwise measurements only. The native batch
/// endpoints serve walking, whose cost does not depend on the clock.
pub async fn build_matrix(
    provider: &dyn RouteProvider,
    starts: &[Location],
    destinations: &[Location],
    departure: Option<NaiveDateTime>,
) -> Result<Vec<TimeMatrixEntry>, RoutingError> {
    if starts.is_empty() || destinations.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        starts = starts.len(),
        destinations = destinations.len(),
        batch = provider.batch_matrix().is_some(),
        "assembling travel time matrix"
    );

    match provider.batch_matrix() {
        Some(batch) => batch_entries(batch, starts, destinations).await,
        None => pairwise_entries(provider, starts, destinations, departure).await,
    }
}

/// Run one batch request and renumber its entries into caller indices.
///
/// Entries pointing at locations the caller never asked for (the origin
/// cell of a one-to-many response, the synthetic destination row of a
/// many-to-one response, anything out of range) are dropped before the
/// completeness check.
async fn batch_entries(
    provider: &dyn BatchMatrixProvider,
    starts: &[Location],
    destinations: &[Location],
) -> Result<Vec<TimeMatrixEntry>, RoutingError> {
    let n = starts.len();
    let m = destinations.len();

    let renumbered: Vec<TimeMatrixEntry> = if n == 1 {
        // Provider location list: [origin, destinations...]; shift the
        // destination indices down by one.
        let raw = provider.one_to_many(starts[0], destinations).await?;
        raw.into_iter()
            .filter(|entry| entry.from_index == 0 && (1..=m).contains(&entry.to_index))
            .map(|entry| {
                TimeMatrixEntry::new(0, entry.to_index - 1, entry.time, entry.distance, entry.unit)
            })
            .collect()
    } else if m == 1 {
        // Provider location list: [origins..., destination]; origin rows
        // keep their index, the destination row past them is synthetic.
        let raw = provider.many_to_one(starts, destinations[0]).await?;
        raw.into_iter()
            .filter(|entry| entry.from_index < n)
            .map(|entry| {
                TimeMatrixEntry::new(entry.from_index, 0, entry.time, entry.distance, entry.unit)
            })
            .collect()
    } else {
        // Sources and targets are numbered independently from zero, so the
        // provider's indices already are caller indices.
        let raw = provider.sources_to_targets(starts, destinations).await?;
        raw.into_iter()
            .filter(|entry| entry.from_index < n && entry.to_index < m)
            .map(|entry| {
                TimeMatrixEntry::new(
                    entry.from_index,
                    entry.to_index,
                    entry.time,
                    entry.distance,
                    entry.unit,
                )
            })
            .collect()
    };

    complete_matrix(renumbered, n, m)
}

/// One request per cell, joined fail-fast.
async fn pairwise_entries(
    provider: &dyn RouteProvider,
    starts: &[Location],
    destinations: &[Location],
    departure: Option<NaiveDateTime>,
) -> Result<Vec<TimeMatrixEntry>, RoutingError> {
    let mut requests = Vec::with_capacity(starts.len() * destinations.len());
    for (from_index, &start) in starts.iter().enumerate() {
        for (to_index, &destination) in destinations.iter().enumerate() {
            requests.push(async move {
                let cost = provider.measure(start, destination, departure).await?;
                Ok(TimeMatrixEntry::new(
                    from_index,
                    to_index,
                    cost.time,
                    cost.distance,
                    cost.unit,
                ))
            });
        }
    }

    try_join_all(requests).await
}

/// Deduplicate, sort row-major and check that exactly the cross product is
/// present.
///
/// Entries are already filtered to in-range indices, so `n * m` distinct
/// cells can only be the full cross product.
fn complete_matrix(
    entries: Vec<TimeMatrixEntry>,
    n: usize,
    m: usize,
) -> Result<Vec<TimeMatrixEntry>, RoutingError> {
    let mut seen = HashSet::with_capacity(n * m);
    let mut matrix: Vec<TimeMatrixEntry> = entries
        .into_iter()
        .filter(|entry| seen.insert((entry.from_index, entry.to_index)))
        .collect();
    matrix.sort_by_key(|entry| (entry.from_index, entry.to_index));

    if matrix.len() != n * m {
        return Err(RoutingError::new(
            ErrorKind::ResponseFormat,
            format!(
                "provider returned {} of {} matrix entries",
                matrix.len(),
                n * m
            ),
        ));
    }

    Ok(matrix)
}
