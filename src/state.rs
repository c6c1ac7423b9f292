use serde::Serialize;

use crate::color::CategoryColors;
use crate::data::model::{LaunchDataset, PayloadRange, SiteSelector};
use crate::engine::{Breakdown, LaunchQueryEngine, PayloadPoint, Slice};
use crate::error::QueryError;

// ---------------------------------------------------------------------------
// Slider configuration
// ---------------------------------------------------------------------------

/// Bounds and step of the payload-range control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SliderConfig {
    pub min_kg: f64,
    pub max_kg: f64,
    pub step_kg: f64,
}

impl SliderConfig {
    pub const DEFAULT_STEP_KG: f64 = 1000.0;

    /// Dataset-derived bounds: observed min/max rounded outward to `step_kg`.
    pub fn from_dataset(dataset: &LaunchDataset, step_kg: f64) -> Self {
        let step_kg = sanitize_step(step_kg);
        let (lo, hi) = dataset.payload_bounds().unwrap_or((0.0, 0.0));
        let min_kg = (lo / step_kg).floor() * step_kg;
        let mut max_kg = (hi / step_kg).ceil() * step_kg;
        if max_kg <= min_kg {
            max_kg = min_kg + step_kg;
        }
        SliderConfig {
            min_kg,
            max_kg,
            step_kg,
        }
    }

    /// Independently configured bounds, e.g. `fixed(0.0, 10000.0, 1000.0)`.
    ///
    /// A non-positive step falls back to [`Self::DEFAULT_STEP_KG`].
    pub fn fixed(min_kg: f64, max_kg: f64, step_kg: f64) -> Result<Self, QueryError> {
        PayloadRange::new(min_kg, max_kg)?;
        Ok(SliderConfig {
            min_kg,
            max_kg,
            step_kg: sanitize_step(step_kg),
        })
    }

    pub fn bounds(&self) -> PayloadRange {
        PayloadRange {
            min_kg: self.min_kg,
            max_kg: self.max_kg,
        }
    }

    /// Pull a range inside the slider bounds.
    pub fn clamp(&self, range: PayloadRange) -> PayloadRange {
        let pin = |v: f64| v.clamp(self.min_kg, self.max_kg);
        PayloadRange {
            min_kg: pin(range.min_kg),
            max_kg: pin(range.max_kg),
        }
    }
}

fn sanitize_step(step_kg: f64) -> f64 {
    if step_kg.is_finite() && step_kg > 0.0 {
        step_kg
    } else {
        SliderConfig::DEFAULT_STEP_KG
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// The current dashboard selections, independent of rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    /// Selected launch site (default: all sites).
    pub site: SiteSelector,

    /// Selected payload interval.
    pub payload: PayloadRange,

    slider: SliderConfig,
    default_payload: PayloadRange,
}

impl FilterState {
    /// Start from all sites and the dataset's observed payload bounds.
    pub fn seeded(dataset: &LaunchDataset, slider: SliderConfig) -> Self {
        let default_payload = match dataset.payload_bounds() {
            Some((lo, hi)) => {
                if lo < slider.min_kg || hi > slider.max_kg {
                    log::warn!(
                        "dataset payload range [{lo}, {hi}] kg exceeds slider bounds [{}, {}] kg; clamping",
                        slider.min_kg,
                        slider.max_kg
                    );
                }
                slider.clamp(PayloadRange {
                    min_kg: lo,
                    max_kg: hi,
                })
            }
            None => slider.bounds(),
        };
        FilterState {
            site: SiteSelector::All,
            payload: default_payload,
            slider,
            default_payload,
        }
    }

    pub fn slider(&self) -> &SliderConfig {
        &self.slider
    }

    pub fn set_site(&mut self, site: SiteSelector) {
        self.site = site;
    }

    /// Validate and store a new interval exactly as requested.
    ///
    /// Only the seeded default is clamped to the slider.
    pub fn set_payload_range(&mut self, min_kg: f64, max_kg: f64) -> Result<(), QueryError> {
        self.payload = PayloadRange::new(min_kg, max_kg)?;
        Ok(())
    }

    /// Back to all sites and the seeded payload interval.
    pub fn reset(&mut self) {
        self.site = SiteSelector::All;
        self.payload = self.default_payload;
    }

    /// Compute both views for the current selections.
    pub fn view<'e>(&self, engine: &'e LaunchQueryEngine) -> Result<DashboardView<'e>, QueryError> {
        let breakdown = engine.site_success_breakdown(self.site);
        let colors = CategoryColors::new(engine.dataset().booster_categories());
        let points = engine
            .payload_correlation_points(self.site, self.payload)?
            .into_iter()
            .map(|point| ColoredPoint {
                color: colors.color_for(point.booster_version_category).to_string(),
                point,
            })
            .collect();
        let legend = colors
            .legend_entries()
            .into_iter()
            .map(|(category, color)| LegendEntry {
                category: category.to_string(),
                color: color.to_string(),
            })
            .collect();

        Ok(DashboardView {
            site: self.site.to_string(),
            payload: self.payload,
            title: breakdown.title(),
            slices: breakdown.slices(),
            breakdown,
            points,
            legend,
        })
    }
}

// ---------------------------------------------------------------------------
// Dashboard view – what the presentation layer renders
// ---------------------------------------------------------------------------

/// A scatter point with the colour of its booster category.
#[derive(Debug, Clone, Serialize)]
pub struct ColoredPoint<'e> {
    #[serde(flatten)]
    pub point: PayloadPoint<'e>,
    pub color: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LegendEntry {
    pub category: String,
    pub color: String,
}

/// Both derived views for one set of selections.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView<'e> {
    pub site: String,
    pub payload: PayloadRange,
    pub title: String,
    pub breakdown: Breakdown,
    pub slices: Vec<Slice>,
    pub points: Vec<ColoredPoint<'e>>,
    /// Booster category colours for the scatter points.
    pub legend: Vec<LegendEntry>,
}
