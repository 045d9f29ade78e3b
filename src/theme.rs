use gpui::*;

#[derive(Clone, Debug)]
pub struct HydrographTheme {
    pub background: Hsla,
    pub axis_line: Hsla,
    pub axis_label: Hsla,
    pub axis_label_size: Pixels,
    pub series: Vec<Hsla>,
    pub line_width: Pixels,
    pub hover_line_width: Pixels,
    pub focus_marker: Hsla,
    pub focus_label: Hsla,
    pub cell_outline: Hsla,
    pub legend_text: Hsla,
    pub legend_hover: Hsla,
}

impl HydrographTheme {
    pub fn series_color(&self, index: usize) -> Hsla {
        if self.series.is_empty() {
            return self.axis_line;
        }
        self.series[index % self.series.len()]
    }
}

impl Default for HydrographTheme {
    fn default() -> Self {
        Self {
            background: gpui::white(),
            axis_line: gpui::black().opacity(0.6),
            axis_label: gpui::black().opacity(0.8),
            axis_label_size: px(11.0),
            series: vec![
                hsla(0.57, 0.44, 0.49, 1.0),
                hsla(0.08, 0.85, 0.55, 1.0),
                hsla(0.33, 0.45, 0.42, 1.0),
                hsla(0.0, 0.65, 0.52, 1.0),
                hsla(0.75, 0.35, 0.55, 1.0),
                hsla(0.12, 0.30, 0.45, 1.0),
            ],
            line_width: px(1.5),
            hover_line_width: px(3.0),
            focus_marker: gpui::black(),
            focus_label: gpui::black(),
            cell_outline: gpui::red().opacity(0.25),
            legend_text: gpui::black().opacity(0.7),
            legend_hover: hsla(0.08, 0.85, 0.45, 1.0),
        }
    }
}
