use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::filter;
use crate::data::model::{LaunchDataset, LaunchSite, Outcome, PayloadRange, SiteSelector};
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Query results
// ---------------------------------------------------------------------------

/// Success counts for the proportion view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Breakdown {
    /// Successful launches per site present in the dataset.
    AllSites { successes: BTreeMap<LaunchSite, u64> },
    /// Success / failure split within one site.
    SingleSite {
        site: LaunchSite,
        success: u64,
        failure: u64,
    },
}

/// One labelled share of a [`Breakdown`], ready for a pie widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub count: u64,
    /// Fraction of the breakdown total; 0 when the total is 0.
    pub share: f64,
}

impl Breakdown {
    pub fn total(&self) -> u64 {
        match self {
            Breakdown::AllSites { successes } => successes.values().sum(),
            Breakdown::SingleSite {
                success, failure, ..
            } => success + failure,
        }
    }

    pub fn title(&self) -> String {
        match self {
            Breakdown::AllSites { .. } => "Total successful launches by site".to_string(),
            Breakdown::SingleSite { site, .. } => format!("Success vs. failure for {site}"),
        }
    }

    pub fn slices(&self) -> Vec<Slice> {
        let entries: Vec<(String, u64)> = match self {
            Breakdown::AllSites { successes } => successes
                .iter()
                .map(|(site, n)| (site.label().to_string(), *n))
                .collect(),
            Breakdown::SingleSite {
                success, failure, ..
            } => vec![
                ("Success".to_string(), *success),
                ("Failure".to_string(), *failure),
            ],
        };
        let total = self.total();
        entries
            .into_iter()
            .map(|(label, count)| Slice {
                label,
                count,
                share: if total == 0 {
                    0.0
                } else {
                    count as f64 / total as f64
                },
            })
            .collect()
    }
}

/// A scatter point: payload mass against outcome, grouped by booster category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayloadPoint<'a> {
    pub payload_mass_kg: f64,
    pub outcome: Outcome,
    pub booster_version_category: &'a str,
}

// ---------------------------------------------------------------------------
// LaunchQueryEngine
// ---------------------------------------------------------------------------

/// Read-only query engine over an owned launch dataset.
///
/// Every query is a pure function of the dataset and its arguments, so one
/// engine can be shared across threads behind an `Arc` without locking.
#[derive(Debug, Clone)]
pub struct LaunchQueryEngine {
    dataset: LaunchDataset,
}

impl LaunchQueryEngine {
    pub fn new(dataset: LaunchDataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &LaunchDataset {
        &self.dataset
    }

    /// Success counts per site (`All`) or the success / failure split of one site.
    ///
    /// Payload mass plays no part here.
    pub fn site_success_breakdown(&self, selector: SiteSelector) -> Breakdown {
        log::debug!("site success breakdown for {selector}");
        let records = self.dataset.records();
        match selector {
            SiteSelector::All => {
                let mut successes = BTreeMap::new();
                for rec in records {
                    *successes.entry(rec.site).or_insert(0) += u64::from(u8::from(rec.outcome));
                }
                Breakdown::AllSites { successes }
            }
            SiteSelector::Site(site) => {
                let (mut success, mut failure) = (0, 0);
                for rec in records.iter().filter(|r| r.site == site) {
                    if rec.outcome.is_success() {
                        success += 1;
                    } else {
                        failure += 1;
                    }
                }
                Breakdown::SingleSite {
                    site,
                    success,
                    failure,
                }
            }
        }
    }

    /// Text-selector variant: fails with `InvalidSelector` for unknown sites.
    pub fn site_success_breakdown_for(&self, selector: &str) -> Result<Breakdown, QueryError> {
        Ok(self.site_success_breakdown(selector.parse()?))
    }

    /// Records at the selected site(s) whose payload lies in `range`
    /// (inclusive), projected for plotting and kept in dataset order.
    pub fn payload_correlation_points(
        &self,
        selector: SiteSelector,
        range: PayloadRange,
    ) -> Result<Vec<PayloadPoint<'_>>, QueryError> {
        range.validate()?;
        let records = self.dataset.records();
        let points: Vec<PayloadPoint<'_>> = filter::filtered_indices(&self.dataset, selector, &range)
            .into_iter()
            .map(|i| {
                let rec = &records[i];
                PayloadPoint {
                    payload_mass_kg: rec.payload_mass_kg,
                    outcome: rec.outcome,
                    booster_version_category: &rec.booster_version_category,
                }
            })
            .collect();
        log::debug!(
            "payload points for {selector} in [{}, {}] kg: {} of {}",
            range.min_kg,
            range.max_kg,
            points.len(),
            self.dataset.len()
        );
        Ok(points)
    }

    /// Text-selector variant of [`Self::payload_correlation_points`].
    pub fn payload_correlation_points_for(
        &self,
        selector: &str,
        range: PayloadRange,
    ) -> Result<Vec<PayloadPoint<'_>>, QueryError> {
        self.payload_correlation_points(selector.parse()?, range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::LaunchRecord;

    fn engine() -> LaunchQueryEngine {
        LaunchQueryEngine::new(
            LaunchDataset::new(vec![
                LaunchRecord::new(LaunchSite::CcafsLc40, 0.0, "v1.0", Outcome::Failure),
                LaunchRecord::new(LaunchSite::CcafsLc40, 525.0, "v1.0", Outcome::Failure),
                LaunchRecord::new(LaunchSite::KscLc39a, 2490.0, "FT", Outcome::Success),
                LaunchRecord::new(LaunchSite::KscLc39a, 5300.0, "FT", Outcome::Success),
                LaunchRecord::new(LaunchSite::KscLc39a, 6070.0, "B4", Outcome::Failure),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn all_sites_keeps_zero_success_sites_and_omits_absent_ones() {
        let Breakdown::AllSites { successes } = engine().site_success_breakdown(SiteSelector::All)
        else {
            panic!("expected all-sites breakdown");
        };
        assert_eq!(successes.get(&LaunchSite::CcafsLc40), Some(&0));
        assert_eq!(successes.get(&LaunchSite::KscLc39a), Some(&2));
        assert!(!successes.contains_key(&LaunchSite::VafbSlc4e));
    }

    #[test]
    fn single_site_ignores_payload() {
        assert_eq!(
            engine().site_success_breakdown(LaunchSite::KscLc39a.into()),
            Breakdown::SingleSite {
                site: LaunchSite::KscLc39a,
                success: 2,
                failure: 1
            }
        );
    }

    #[test]
    fn known_site_without_records_is_zero_not_error() {
        let b = engine().site_success_breakdown(LaunchSite::VafbSlc4e.into());
        assert_eq!(b.total(), 0);
        assert!(b.slices().iter().all(|s| s.share == 0.0));
    }

    #[test]
    fn slices_report_shares_of_total() {
        let slices = engine()
            .site_success_breakdown(LaunchSite::KscLc39a.into())
            .slices();
        assert_eq!(slices[0].label, "Success");
        assert_eq!(slices[0].count, 2);
        assert!((slices[0].share - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(slices[1].label, "Failure");
    }

    #[test]
    fn titles_name_the_site() {
        let e = engine();
        assert_eq!(
            e.site_success_breakdown(SiteSelector::All).title(),
            "Total successful launches by site"
        );
        assert_eq!(
            e.site_success_breakdown(LaunchSite::KscLc39a.into()).title(),
            "Success vs. failure for KSC LC-39A"
        );
    }

    #[test]
    fn points_keep_order_and_project_fields() {
        let e = engine();
        let points = e
            .payload_correlation_points(SiteSelector::All, PayloadRange::new(500.0, 5300.0).unwrap())
            .unwrap();
        let masses: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
        assert_eq!(masses, vec![525.0, 2490.0, 5300.0]);
        assert_eq!(points[1].booster_version_category, "FT");
        assert_eq!(points[1].outcome, Outcome::Success);
    }

    #[test]
    fn points_follow_filtered_indices() {
        let e = engine();
        let range = PayloadRange::new(0.0, 5300.0).unwrap();
        let selector = SiteSelector::Site(LaunchSite::KscLc39a);
        let indices = filter::filtered_indices(e.dataset(), selector, &range);
        assert_eq!(indices, vec![2, 3]);

        let points = e.payload_correlation_points(selector, range).unwrap();
        let masses: Vec<f64> = points.iter().map(|p| p.payload_mass_kg).collect();
        let expected: Vec<f64> = indices
            .iter()
            .map(|&i| e.dataset().records()[i].payload_mass_kg)
            .collect();
        assert_eq!(masses, expected);
    }

    #[test]
    fn inverted_range_is_an_error_not_empty() {
        let err = engine()
            .payload_correlation_points(
                SiteSelector::All,
                PayloadRange {
                    min_kg: 5000.0,
                    max_kg: 1000.0,
                },
            )
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::InvalidRange {
                min_kg: 5000.0,
                max_kg: 1000.0
            }
        );
    }

    #[test]
    fn text_selectors_reject_unknown_sites() {
        let e = engine();
        assert!(matches!(
            e.site_success_breakdown_for("nonexistent-site"),
            Err(QueryError::InvalidSelector(_))
        ));
        assert!(matches!(
            e.payload_correlation_points_for("nonexistent-site", PayloadRange::new(0.0, 1.0).unwrap()),
            Err(QueryError::InvalidSelector(_))
        ));
        assert!(e.site_success_breakdown_for("ksc_lc").is_ok());
    }

    #[test]
    fn breakdown_serializes_with_site_ids() {
        let json = serde_json::to_value(engine().site_success_breakdown(SiteSelector::All)).unwrap();
        assert_eq!(json["kind"], "all_sites");
        assert_eq!(json["successes"]["ksc_lc"], 2);
        assert_eq!(json["successes"]["ccafs_lc"], 0);
    }
}
