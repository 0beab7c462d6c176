use crate::view::{Element, Node};

const SVG_WIDTH: f64 = 420.0;
const LABEL_WIDTH: f64 = 140.0;
const BAR_HEIGHT: f64 = 18.0;
const BAR_GAP: f64 = 6.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub color: String,
    pub bars: Vec<ChartBar>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn max_value(&self) -> f64 {
        self.bars.iter().map(|b| b.value).fold(0.0, f64::max)
    }
}

/// Creates and tears down chart instances bound to a canvas.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, canvas_id: &str, spec: &ChartSpec) -> Self::Handle;
    fn destroy(&mut self, handle: Self::Handle);
}

/// Holds at most one live chart for a canvas. A new chart is only created
/// after the previous one has been handed back to the backend.
#[derive(Debug)]
pub struct ChartSlot<H> {
    canvas_id: String,
    active: Option<H>,
}

impl<H> ChartSlot<H> {
    pub fn new(canvas_id: impl Into<String>) -> Self {
        Self {
            canvas_id: canvas_id.into(),
            active: None,
        }
    }

    pub fn canvas_id(&self) -> &str {
        &self.canvas_id
    }

    pub fn current(&self) -> Option<&H> {
        self.active.as_ref()
    }

    /// Destroys the current chart, then draws `spec` unless it has no bars.
    /// Returns whether a chart is now drawn.
    pub fn redraw<B>(&mut self, backend: &mut B, spec: &ChartSpec) -> bool
    where
        B: ChartBackend<Handle = H>,
    {
        self.clear(backend);
        if spec.is_empty() {
            return false;
        }
        self.active = Some(backend.create(&self.canvas_id, spec));
        true
    }

    pub fn clear<B>(&mut self, backend: &mut B)
    where
        B: ChartBackend<Handle = H>,
    {
        if let Some(old) = self.active.take() {
            backend.destroy(old);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SvgChart {
    pub id: u64,
    pub canvas_id: String,
    pub spec: ChartSpec,
    pub markup: Node,
}

/// Renders horizontal bar charts as inline SVG and tracks live instances.
#[derive(Debug, Default)]
pub struct SvgChartBackend {
    next_id: u64,
    live: usize,
}

impl SvgChartBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> usize {
        self.live
    }
}

impl ChartBackend for SvgChartBackend {
    type Handle = SvgChart;

    fn create(&mut self, canvas_id: &str, spec: &ChartSpec) -> SvgChart {
        self.next_id += 1;
        self.live += 1;
        SvgChart {
            id: self.next_id,
            canvas_id: canvas_id.to_string(),
            spec: spec.clone(),
            markup: svg_bars(canvas_id, spec),
        }
    }

    fn destroy(&mut self, _handle: SvgChart) {
        self.live = self.live.saturating_sub(1);
    }
}

fn svg_bars(canvas_id: &str, spec: &ChartSpec) -> Node {
    let max = spec.max_value();
    let plot_width = SVG_WIDTH - LABEL_WIDTH - 50.0;
    let height = spec.bars.len() as f64 * (BAR_HEIGHT + BAR_GAP);

    let rows = spec.bars.iter().enumerate().map(|(idx, bar)| {
        let y = idx as f64 * (BAR_HEIGHT + BAR_GAP);
        let width = if max > 0.0 {
            (bar.value.max(0.0) / max) * plot_width
        } else {
            0.0
        };
        Element::new("g")
            .child(
                Element::new("text")
                    .attr("x", "0")
                    .attr("y", fmt_px(y + BAR_HEIGHT * 0.75))
                    .text(bar.label.clone()),
            )
            .child(
                Element::new("rect")
                    .attr("x", fmt_px(LABEL_WIDTH))
                    .attr("y", fmt_px(y))
                    .attr("width", fmt_px(width))
                    .attr("height", fmt_px(BAR_HEIGHT))
                    .attr("fill", spec.color.clone()),
            )
            .child(
                Element::new("text")
                    .attr("x", fmt_px(LABEL_WIDTH + width + 4.0))
                    .attr("y", fmt_px(y + BAR_HEIGHT * 0.75))
                    .text(fmt_value(bar.value)),
            )
    });

    Element::new("svg")
        .attr("id", format!("{canvas_id}-chart"))
        .attr("xmlns", "http://www.w3.org/2000/svg")
        .attr("viewBox", format!("0 0 {} {}", fmt_px(SVG_WIDTH), fmt_px(height)))
        .attr("role", "img")
        .attr("aria-label", spec.title.clone())
        .children(rows)
        .into()
}

fn fmt_px(v: f64) -> String {
    format!("{v:.1}")
}

fn fmt_value(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.1}")
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartBackend, ChartBar, ChartSlot, ChartSpec};

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
        next: u32,
    }

    impl ChartBackend for Recorder {
        type Handle = u32;

        fn create(&mut self, canvas_id: &str, _spec: &ChartSpec) -> u32 {
            self.next += 1;
            self.calls.push(format!("create {canvas_id} #{}", self.next));
            self.next
        }

        fn destroy(&mut self, handle: u32) {
            self.calls.push(format!("destroy #{handle}"));
        }
    }

    fn spec(n: usize) -> ChartSpec {
        ChartSpec {
            title: "Passing".to_string(),
            color: "#013369".to_string(),
            bars: (0..n)
                .map(|i| ChartBar {
                    label: format!("P{i}"),
                    value: i as f64,
                })
                .collect(),
        }
    }

    #[test]
    fn previous_chart_is_destroyed_before_the_next_is_created() {
        let mut backend = Recorder::default();
        let mut slot = ChartSlot::new("passingChart");
        assert!(slot.redraw(&mut backend, &spec(3)));
        assert!(slot.redraw(&mut backend, &spec(2)));
        assert_eq!(
            backend.calls,
            vec![
                "create passingChart #1".to_string(),
                "destroy #1".to_string(),
                "create passingChart #2".to_string(),
            ]
        );
        assert_eq!(slot.current(), Some(&2));
    }

    #[test]
    fn empty_dataset_leaves_canvas_blank() {
        let mut backend = Recorder::default();
        let mut slot = ChartSlot::new("rushingChart");
        slot.redraw(&mut backend, &spec(1));
        assert!(!slot.redraw(&mut backend, &spec(0)));
        assert!(slot.current().is_none());
        assert_eq!(backend.calls.last().map(String::as_str), Some("destroy #1"));
    }
}
