//! Duplicate penetration length removal

use crate::app::models::{Channel, SampleTable};
use std::collections::HashSet;
use tracing::debug;

/// Keep the first sample of every penetration length, in all channels
///
/// Returns the number of rows removed.
pub fn remove_duplicate_depths(samples: &mut SampleTable) -> usize {
    let Some(lengths) = samples.get(Channel::PenetrationLength) else {
        return 0;
    };

    let mut seen = HashSet::new();
    let keep: Vec<bool> = lengths
        .iter()
        .map(|value| match value {
            // -0.0 and 0.0 are the same length
            Some(v) => seen.insert((v + 0.0).to_bits()),
            None => true,
        })
        .collect();

    let removed = keep.iter().filter(|k| !**k).count();
    if removed > 0 {
        debug!("Removing {} duplicate penetration lengths", removed);
        samples.retain_rows(&keep);
    }
    removed
}
