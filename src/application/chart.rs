// Chart abstraction - the charting library sits behind these traits
use crate::domain::chart::{ChartKind, SeriesData};
use crate::domain::document::Element;
use crate::domain::theme::Theme;

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("chart target #{0} is not attached to the dashlet container")]
    TargetMissing(String),
}

/// A live render context bound to one element. Must be disposed before
/// it is dropped or replaced.
pub trait Chart: Send {
    fn set_series(&mut self, series: Vec<SeriesData>);

    /// Draw the current series into the chart's target inside `container`.
    fn render(&self, container: &mut Element) -> Result<(), ChartError>;

    /// Release the render context.
    fn dispose(self: Box<Self>);
}

pub trait ChartFactory: Send + Sync {
    /// Attach a chart to the element `target_id`, which must already be
    /// part of `container`.
    fn attach(
        &self,
        target_id: &str,
        container: &Element,
        kind: ChartKind,
        theme: Theme,
    ) -> Result<Box<dyn Chart>, ChartError>;
}
