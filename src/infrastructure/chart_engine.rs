// In-memory chart engine rendering SVG into the document model
use crate::application::chart::{Chart, ChartError, ChartFactory};
use crate::domain::chart::{downsample_points, ChartKind, SeriesData, MAX_POINTS_PER_SERIES};
use crate::domain::document::Element;
use crate::domain::theme::Theme;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const WIDTH: f64 = 600.0;
const HEIGHT: f64 = 200.0;

struct Palette {
    background: &'static str,
    default_series: &'static str,
}

fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::Light => Palette {
            background: "#ffffff",
            default_series: "#5470c6",
        },
        Theme::Dark => Palette {
            background: "#100c2a",
            default_series: "#4992ff",
        },
    }
}

/// Hands out SVG charts and counts the render contexts still alive.
#[derive(Debug, Clone, Default)]
pub struct MemoryChartEngine {
    live: Arc<AtomicUsize>,
}

impl MemoryChartEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts attached and not yet disposed.
    pub fn live_charts(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl ChartFactory for MemoryChartEngine {
    fn attach(
        &self,
        target_id: &str,
        container: &Element,
        kind: ChartKind,
        theme: Theme,
    ) -> Result<Box<dyn Chart>, ChartError> {
        if container.find(target_id).is_none() {
            return Err(ChartError::TargetMissing(target_id.to_string()));
        }
        self.live.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Attached {:?} chart to #{} ({})", kind, target_id, theme);
        Ok(Box::new(SvgChart {
            target_id: target_id.to_string(),
            kind,
            theme,
            series: Vec::new(),
            live: self.live.clone(),
        }))
    }
}

pub struct SvgChart {
    target_id: String,
    kind: ChartKind,
    theme: Theme,
    series: Vec<SeriesData>,
    live: Arc<AtomicUsize>,
}

impl SvgChart {
    fn svg(&self) -> Element {
        let palette = palette(self.theme);
        let mut svg = Element::new("svg")
            .attr("viewBox", format!("0 0 {} {}", WIDTH, HEIGHT))
            .attr("data-theme", self.theme.as_str())
            .attr("style", format!("background: {}", palette.background));

        let max = self
            .series
            .iter()
            .flat_map(|s| s.points.iter().map(|p| p.value))
            .fold(0.0_f64, f64::max);
        let scale_y = |v: f64| if max > 0.0 { HEIGHT - v / max * HEIGHT } else { HEIGHT };

        for series in &self.series {
            let color = series.color.as_deref().unwrap_or(palette.default_series);
            let points = downsample_points(series.points.clone(), MAX_POINTS_PER_SERIES);
            let step = if points.len() > 1 {
                WIDTH / (points.len() - 1) as f64
            } else {
                WIDTH
            };
            match self.kind {
                ChartKind::Line => {
                    let coords: Vec<String> = points
                        .iter()
                        .enumerate()
                        .map(|(i, p)| format!("{:.1},{:.1}", i as f64 * step, scale_y(p.value)))
                        .collect();
                    svg = svg.child(
                        Element::new("polyline")
                            .attr("data-series", series.name.as_str())
                            .attr("fill", "none")
                            .attr("stroke", color)
                            .attr("points", coords.join(" ")),
                    );
                }
                ChartKind::Bar => {
                    let width = WIDTH / points.len().max(1) as f64;
                    for (i, p) in points.iter().enumerate() {
                        let y = scale_y(p.value);
                        svg = svg.child(
                            Element::new("rect")
                                .attr("data-series", series.name.as_str())
                                .attr("x", format!("{:.1}", i as f64 * width))
                                .attr("y", format!("{:.1}", y))
                                .attr("width", format!("{:.1}", width * 0.9))
                                .attr("height", format!("{:.1}", HEIGHT - y))
                                .attr("fill", color),
                        );
                    }
                }
            }
        }
        svg
    }
}

impl Chart for SvgChart {
    fn set_series(&mut self, series: Vec<SeriesData>) {
        self.series = series;
    }

    fn render(&self, container: &mut Element) -> Result<(), ChartError> {
        let target = container
            .find_mut(&self.target_id)
            .ok_or_else(|| ChartError::TargetMissing(self.target_id.clone()))?;
        target.replace_children(vec![self.svg()]);
        Ok(())
    }

    fn dispose(self: Box<Self>) {
        self.live.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!("Disposed chart on #{}", self.target_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::TimeSeriesPoint;

    fn container() -> Element {
        Element::new("div")
            .with_id("dash_0")
            .child(Element::new("div").with_id("dash_0_graph"))
    }

    #[test]
    fn test_attach_requires_target() {
        let engine = MemoryChartEngine::new();
        let detached = Element::new("div").with_id("dash_0");
        let result = engine.attach("dash_0_graph", &detached, ChartKind::Line, Theme::Light);
        assert!(matches!(result, Err(ChartError::TargetMissing(_))));
        assert_eq!(engine.live_charts(), 0);
    }

    #[test]
    fn test_live_count_tracks_dispose() {
        let engine = MemoryChartEngine::new();
        let c = container();
        let a = engine.attach("dash_0_graph", &c, ChartKind::Line, Theme::Dark).unwrap();
        let b = engine.attach("dash_0_graph", &c, ChartKind::Bar, Theme::Dark).unwrap();
        assert_eq!(engine.live_charts(), 2);
        a.dispose();
        b.dispose();
        assert_eq!(engine.live_charts(), 0);
    }

    #[test]
    fn test_line_render_is_downsampled_and_themed() {
        let engine = MemoryChartEngine::new();
        let mut c = container();
        let mut chart = engine.attach("dash_0_graph", &c, ChartKind::Line, Theme::Dark).unwrap();
        let points = (0..300).map(|i| TimeSeriesPoint::new(i, i as f64)).collect();
        chart.set_series(vec![SeriesData::new("Download", None, points)]);
        chart.render(&mut c).unwrap();

        let svg = &c.find("dash_0_graph").unwrap().children[0];
        assert!(svg.attrs.contains(&("data-theme".to_string(), "dark".to_string())));
        let polyline = &svg.children[0];
        let (_, coords) = polyline.attrs.iter().find(|(k, _)| k == "points").unwrap();
        assert_eq!(coords.split(' ').count(), MAX_POINTS_PER_SERIES);
        chart.dispose();
    }
}
