use super::model::{LaunchDataset, LaunchRecord, PayloadRange, SiteSelector};

// ---------------------------------------------------------------------------
// Filter predicates: site first, then payload mass
// ---------------------------------------------------------------------------

/// Whether a record belongs to the selected site (always true for `All`).
pub fn matches_site(record: &LaunchRecord, selector: SiteSelector) -> bool {
    selector.matches(record.site)
}

/// Whether a record passes both filter stages.
///
/// The range is assumed valid; callers check it with [`PayloadRange::validate`].
pub fn matches(record: &LaunchRecord, selector: SiteSelector, range: &PayloadRange) -> bool {
    matches_site(record, selector) && range.contains(record.payload_mass_kg)
}

/// Return indices of records that pass both filters, in dataset order.
pub fn filtered_indices(
    dataset: &LaunchDataset,
    selector: SiteSelector,
    range: &PayloadRange,
) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| matches(rec, selector, range))
        .map(|(i, _)| i)
        .collect()
}
