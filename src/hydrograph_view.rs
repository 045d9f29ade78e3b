// HydrographView implementation

use crate::chart::Chart;
use crate::data_types::{HydrographConfig, Observation};
use crate::feed;
use crate::interaction::SiteLegend;
use crate::surface::Surface;
use crate::theme::HydrographTheme;
use crate::transform::SurfaceTransform;
use gpui::prelude::*;
use gpui::*;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{error, info};

actions!(gpui_hydrograph, [ClearFocus]);

/// Hosts one `Chart`: paints its surface, shows the site list it highlights,
/// and turns pointer events into chart interactions.
pub struct HydrographView {
    pub chart: Chart<Rc<RefCell<SiteLegend>>>,
    /// Site list drawn beside the plot; the chart only holds a handle to it.
    pub legend: Rc<RefCell<SiteLegend>>,
    pub theme: HydrographTheme,
    /// Outline the hit regions (normally invisible).
    pub show_cells: bool,
    pub load_error: Option<String>,

    bounds: Rc<RefCell<Bounds<Pixels>>>,
    focus_handle: FocusHandle,
}

impl HydrographView {
    pub fn new(config: HydrographConfig, cx: &mut Context<Self>) -> Self {
        let legend = Rc::new(RefCell::new(SiteLegend::new()));
        Self {
            chart: Chart::new(config, legend.clone()),
            legend,
            theme: HydrographTheme::default(),
            show_cells: false,
            load_error: None,
            bounds: Rc::new(RefCell::new(Bounds::default())),
            focus_handle: cx.focus_handle(),
        }
    }

    pub fn with_observations(
        config: HydrographConfig,
        data: Vec<Observation>,
        cx: &mut Context<Self>,
    ) -> Self {
        let mut view = Self::new(config, cx);
        view.deliver(Ok(data));
        view
    }

    /// Starts the one background fetch of the configured data path. The result
    /// reaches the view through a weak handle, so a view closed in the
    /// meantime never sees it.
    pub fn load(&mut self, cx: &mut Context<Self>) {
        let source = self.chart.config().data_path.clone();
        info!(source = %source, "fetching observations");
        let fetch = cx
            .background_executor()
            .spawn(async move { feed::load_observations(&source) });
        cx.spawn(async move |this, cx| {
            let result = fetch.await;
            let _ = this.update(cx, |view, cx| {
                view.deliver(result);
                cx.notify();
            });
        })
        .detach();
    }

    fn deliver(&mut self, result: eyre::Result<Vec<Observation>>) {
        if let Err(err) = self.chart.on_data_ready(result) {
            error!("failed to load observations: {:#}", err);
            self.load_error = Some(format!("{:#}", err));
        }
    }

    fn transform(&self) -> SurfaceTransform {
        SurfaceTransform::new(self.bounds.borrow().origin, self.chart.config().margins)
    }

    /// Window position of a point in plot coordinates, as of the last paint.
    pub fn screen_position(&self, point: Point<f64>) -> Point<Pixels> {
        self.transform().to_screen(point)
    }

    fn handle_mouse_move(
        &mut self,
        event: &MouseMoveEvent,
        _window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        let point = self.transform().to_plot(event.position);
        let before = self.chart.focus();
        self.chart.pointer_move(point);
        if self.chart.focus() != before {
            cx.notify();
        }
    }

    fn handle_mouse_down(
        &mut self,
        event: &MouseDownEvent,
        window: &mut Window,
        cx: &mut Context<Self>,
    ) {
        window.focus(&self.focus_handle);
        let point = self.transform().to_plot(event.position);
        if self.chart.pointer_click(point) {
            cx.notify();
        }
    }

    fn handle_hover(&mut self, hovered: &bool, _window: &mut Window, cx: &mut Context<Self>) {
        if !*hovered && !self.chart.focus().is_idle() {
            self.chart.pointer_leave();
            cx.notify();
        }
    }

    fn handle_clear_focus(&mut self, _: &ClearFocus, _window: &mut Window, cx: &mut Context<Self>) {
        self.chart.clear_focus();
        cx.notify();
    }

    fn series_colors(&self, surface: &Surface) -> Vec<Hsla> {
        let keys = self.chart.original_keys();
        surface
            .paths
            .iter()
            .map(|p| {
                let slot = keys.iter().position(|k| *k == p.key).unwrap_or(0);
                self.theme.series_color(slot)
            })
            .collect()
    }
}

impl Focusable for HydrographView {
    fn focus_handle(&self, _cx: &App) -> FocusHandle {
        self.focus_handle.clone()
    }
}

impl Render for HydrographView {
    fn render(&mut self, _window: &mut Window, cx: &mut Context<Self>) -> impl IntoElement {
        let config = self.chart.config().clone();
        let surface = self.chart.surface().cloned();
        let legend = self.legend.borrow().clone();
        let theme = self.theme.clone();
        let show_cells = self.show_cells;
        let bounds_rc = self.bounds.clone();

        let mut overlay: Vec<AnyElement> = Vec::new();
        let mut colors = Vec::new();
        if let Some(surface) = &surface {
            overlay.extend(axis_labels(surface, &theme));
            overlay.extend(focus_marker(surface, &theme));
            colors = self.series_colors(surface);
        }
        if let Some(err) = &self.load_error {
            overlay.push(
                div()
                    .absolute()
                    .top(px(config.margins.top as f32))
                    .left(px(config.margins.left as f32))
                    .text_size(px(12.0))
                    .text_color(gpui::red())
                    .child(err.clone())
                    .into_any_element(),
            );
        }

        let legend_items: Vec<AnyElement> = legend
            .entries()
            .iter()
            .map(|entry| {
                let color = if entry.hovered {
                    theme.legend_hover
                } else {
                    theme.legend_text
                };
                let weight = if entry.hovered {
                    FontWeight::BOLD
                } else {
                    FontWeight::NORMAL
                };
                div()
                    .text_size(px(12.0))
                    .text_color(color)
                    .font_weight(weight)
                    .child(entry.name.clone())
                    .into_any_element()
            })
            .collect();

        div()
            .track_focus(&self.focus_handle)
            .key_context("Hydrograph")
            .on_action(cx.listener(Self::handle_clear_focus))
            .flex()
            .flex_row()
            .gap_4()
            .bg(theme.background)
            .child(
                div()
                    .id("hydrograph-plot")
                    .relative()
                    .w(px(config.width as f32))
                    .h(px(config.height as f32))
                    .on_hover(cx.listener(Self::handle_hover))
                    .on_mouse_move(cx.listener(Self::handle_mouse_move))
                    .on_mouse_down(MouseButton::Left, cx.listener(Self::handle_mouse_down))
                    .child(
                        canvas(|_, _, _| {}, move |bounds, (), window, _cx| {
                            *bounds_rc.borrow_mut() = bounds;
                            if let Some(surface) = &surface {
                                paint_surface(
                                    window, bounds, surface, &legend, &colors, &theme, show_cells,
                                );
                            }
                        })
                        .size_full()
                        .absolute(),
                    )
                    .children(overlay),
            )
            .child(
                div()
                    .flex()
                    .flex_col()
                    .gap_1()
                    .p_2()
                    .children(legend_items),
            )
    }
}

fn paint_surface(
    window: &mut Window,
    bounds: Bounds<Pixels>,
    surface: &Surface,
    legend: &SiteLegend,
    colors: &[Hsla],
    theme: &HydrographTheme,
    show_cells: bool,
) {
    let tr = SurfaceTransform::new(bounds.origin, surface.margins);
    let (w, h) = (surface.plot_width(), surface.plot_height());

    let mut axes = PathBuilder::stroke(px(1.0));
    axes.move_to(tr.to_screen(Point::new(0.0, 0.0)));
    axes.line_to(tr.to_screen(Point::new(0.0, h)));
    axes.line_to(tr.to_screen(Point::new(w, h)));
    for tick in &surface.x_axis.ticks {
        axes.move_to(tr.to_screen(Point::new(tick.offset, h)));
        axes.line_to(tr.to_screen(Point::new(tick.offset, h + 6.0)));
    }
    for tick in &surface.y_axis.ticks {
        axes.move_to(tr.to_screen(Point::new(0.0, tick.offset)));
        axes.line_to(tr.to_screen(Point::new(-6.0, tick.offset)));
    }
    if let Ok(path) = axes.build() {
        window.paint_path(path, theme.axis_line);
    }

    for (i, series) in surface.paths.iter().enumerate() {
        let hovered = series.site.is_some_and(|s| legend.is_hovered(s));
        let width = if hovered {
            theme.hover_line_width
        } else {
            theme.line_width
        };
        let color = colors.get(i).copied().unwrap_or(theme.axis_line);
        for segment in &series.segments {
            let Some((first, rest)) = segment.split_first() else {
                continue;
            };
            if rest.is_empty() {
                continue;
            }
            let mut builder = PathBuilder::stroke(width);
            builder.move_to(tr.to_screen(*first));
            for p in rest {
                builder.line_to(tr.to_screen(*p));
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, color);
            }
        }
    }

    if show_cells {
        let mut outlines = PathBuilder::stroke(px(0.5));
        for region in &surface.hit_regions {
            let Some(first) = region.polygon.first() else {
                continue;
            };
            outlines.move_to(tr.to_screen(*first));
            for p in region.polygon.iter().skip(1) {
                outlines.line_to(tr.to_screen(*p));
            }
            outlines.line_to(tr.to_screen(*first));
        }
        if let Ok(path) = outlines.build() {
            window.paint_path(path, theme.cell_outline);
        }
    }
}

fn axis_labels(surface: &Surface, theme: &HydrographTheme) -> Vec<AnyElement> {
    let left = surface.margins.left as f32;
    let top = surface.margins.top as f32;
    let plot_h = surface.plot_height() as f32;
    let mut elements = Vec::new();

    for tick in &surface.x_axis.ticks {
        elements.push(
            div()
                .absolute()
                .left(px(left + tick.offset as f32 - 40.0))
                .top(px(top + plot_h + 8.0))
                .w(px(80.0))
                .text_align(gpui::TextAlign::Center)
                .text_size(theme.axis_label_size)
                .text_color(theme.axis_label)
                .child(tick.label.clone())
                .into_any_element(),
        );
    }

    for tick in &surface.y_axis.ticks {
        elements.push(
            div()
                .absolute()
                .left(px(0.0))
                .w(px(left - 8.0))
                .top(px(top + tick.offset as f32 - 8.0))
                .h(px(16.0))
                .flex()
                .items_center()
                .justify_end()
                .text_size(theme.axis_label_size)
                .text_color(theme.axis_label)
                .child(tick.label.clone())
                .into_any_element(),
        );
    }

    elements
}

fn focus_marker(surface: &Surface, theme: &HydrographTheme) -> Vec<AnyElement> {
    let focus = &surface.focus;
    if focus.is_parked() {
        return vec![];
    }
    let x = (surface.margins.left + focus.position.x) as f32;
    let y = (surface.margins.top + focus.position.y) as f32;
    let r = focus.radius as f32;
    vec![
        div()
            .absolute()
            .left(px(x - r))
            .top(px(y - r))
            .w(px(2.0 * r))
            .h(px(2.0 * r))
            .rounded_full()
            .bg(theme.focus_marker)
            .into_any_element(),
        div()
            .absolute()
            .left(px(x))
            .top(px(y + focus.label_offset as f32 - 12.0))
            .text_size(px(12.0))
            .text_color(theme.focus_label)
            .whitespace_nowrap()
            .child(focus.label.clone())
            .into_any_element(),
    ]
}
