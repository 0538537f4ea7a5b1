use crate::events::AppEvent;
use crate::gui::theme::{self, ThemeColors};
use crate::gui::view;
use anyhow::Context as _;
use gtk::prelude::*;
use gtk4 as gtk;
use piechart::config::{self, Config};
use piechart::geometry::{Point, Vector};
use piechart::layout::Layout;
use piechart::model::fraction_from_score;
use piechart::{ChartEvent, PieChart};
use relm4::prelude::*;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

/// Drag in progress: where it started and the offset seen on the previous update.
#[derive(Debug, Clone, Copy)]
struct DragTracker {
    start: Point,
    offset: Vector,
}

pub struct AppModel {
    pub chart: Rc<RefCell<PieChart>>,
    pub config: Config,
    /// How many of the configured slices are on the wheel, counted from the front.
    pub shown: usize,
    pub size: (i32, i32),
    pub current_label: String,
    pub drawing_area: gtk::DrawingArea,
    drag: Option<DragTracker>,
    last_touch: Point,
}

#[derive(Debug)]
pub enum AppMsg {
    Resize(i32, i32),
    DragBegin(f64, f64),
    DragUpdate(f64, f64),
    DragEnd,
    Swipe(f64, f64),
    Add,
    Remove,
    Selected,
    ConfigReload,
}

impl From<AppEvent> for AppMsg {
    fn from(event: AppEvent) -> Self {
        match event {
            AppEvent::ConfigReload => AppMsg::ConfigReload,
        }
    }
}

fn connect_chart(
    chart: &mut PieChart,
    sender: &ComponentSender<AppModel>,
    drawing_area: &gtk::DrawingArea,
) {
    let sender = sender.clone();
    let drawing_area = drawing_area.clone();
    chart.subscribe(move |event| match event {
        ChartEvent::CurrentItemChanged(_) => sender.input(AppMsg::Selected),
        ChartEvent::Invalidated => drawing_area.queue_draw(),
    });
}

/// Puts the configured slice at `shown` on the wheel and returns the new count. A slice the
/// chart rejects is still counted, so the next call moves on to the one after it.
fn add_next_slice(chart: &mut PieChart, config: &Config, shown: usize) -> usize {
    let Some(slice) = config.slices.get(shown) else {
        log::debug!("All configured slices are already shown");
        return shown;
    };

    let fraction = fraction_from_score(slice.value, config.pie_scale);
    if let Err(e) = chart.add_item(
        slice.label.clone(),
        fraction,
        *slice.slice_color,
        *slice.item_color,
    ) {
        log::warn!("Cannot add '{}': {}", slice.label, e);
    }
    shown + 1
}

fn reload() -> anyhow::Result<(Config, PieChart)> {
    let config = config::load_config().context("Failed to reload config")?;
    let chart = config
        .build_chart()
        .context("Failed to build chart from reloaded config")?;
    Ok((config, chart))
}

impl AppModel {
    fn apply_size(&self) {
        let (w, h) = self.size;
        let layout = Layout::compute(w as f64, h as f64, &self.config.layout);
        self.chart.borrow_mut().apply_layout(layout);
    }

    fn refresh_label(&mut self) {
        self.current_label = self
            .chart
            .borrow()
            .current_label()
            .map(|l| l.to_string())
            .unwrap_or_default();
    }
}

#[relm4::component(pub)]
impl SimpleComponent for AppModel {
    type Init = (Config, async_channel::Receiver<AppEvent>);
    type Input = AppMsg;
    type Output = ();

    view! {
        #[root]
        gtk::ApplicationWindow {
            set_title: Some("Life Wheel"),
            set_default_size: (640, 480),

            gtk::Box {
                set_orientation: gtk::Orientation::Vertical,
                set_spacing: 6,
                set_margin_all: 8,

                #[name = "drawing_area"]
                gtk::DrawingArea {
                    set_hexpand: true,
                    set_vexpand: true,

                    connect_resize[sender] => move |_, w, h| {
                        sender.input(AppMsg::Resize(w, h));
                    },

                    add_controller = gtk::GestureDrag {
                        connect_drag_begin[sender] => move |_, x, y| {
                            sender.input(AppMsg::DragBegin(x, y));
                        },
                        connect_drag_update[sender] => move |_, x, y| {
                            sender.input(AppMsg::DragUpdate(x, y));
                        },
                        connect_drag_end[sender] => move |_, _, _| {
                            sender.input(AppMsg::DragEnd);
                        }
                    },

                    add_controller = gtk::GestureSwipe {
                        connect_swipe[sender] => move |_, vx, vy| {
                            sender.input(AppMsg::Swipe(vx, vy));
                        }
                    }
                },

                gtk::Box {
                    set_orientation: gtk::Orientation::Horizontal,
                    set_spacing: 6,
                    set_halign: gtk::Align::Center,

                    gtk::Button {
                        set_label: "Add",
                        connect_clicked => AppMsg::Add,
                    },

                    gtk::Button {
                        set_label: "Remove",
                        connect_clicked => AppMsg::Remove,
                    },

                    gtk::Label {
                        add_css_class: "lifewheel-current-label",
                        set_width_chars: 16,
                        #[watch]
                        set_label: &model.current_label,
                    },
                },
            }
        }
    }

    fn init(
        init: Self::Init,
        root: Self::Root,
        sender: ComponentSender<Self>,
    ) -> ComponentParts<Self> {
        let (config, rx) = init;

        theme::load_css();

        let chart = config
            .build_chart()
            .context("Failed to build chart from config")
            .unwrap_or_else(|e| {
                log::error!("{:#}", e);
                PieChart::default()
            });

        let model = AppModel {
            chart: Rc::new(RefCell::new(chart)),
            shown: config.slices.len(),
            config,
            size: (0, 0),
            current_label: String::new(),
            drawing_area: gtk::DrawingArea::default(),
            drag: None,
            last_touch: Point::default(),
        };

        let widgets = view_output!();

        let mut model = model;
        model.drawing_area = widgets.drawing_area.clone();
        connect_chart(
            &mut model.chart.borrow_mut(),
            &sender,
            &widgets.drawing_area,
        );
        model.refresh_label();

        let chart_draw = model.chart.clone();
        widgets
            .drawing_area
            .set_draw_func(move |drawing_area, cr, _, _| {
                let style_context = drawing_area.style_context();
                let colors = ThemeColors::from_context(&style_context);
                let state = chart_draw.borrow().render_state();
                if let Err(e) = view::draw(cr, &state, &colors) {
                    log::error!("Drawing error: {}", e);
                }
            });

        let chart_tick = model.chart.clone();
        let last_frame = Cell::new(None::<i64>);
        widgets.drawing_area.add_tick_callback(move |_, clock| {
            let now = clock.frame_time();
            let elapsed = last_frame
                .replace(Some(now))
                .map(|prev| Duration::from_micros((now - prev).max(0) as u64))
                .unwrap_or_default();

            if let Ok(mut chart) = chart_tick.try_borrow_mut()
                && chart.is_animating()
            {
                chart.tick(elapsed);
            }
            glib::ControlFlow::Continue
        });

        let sender_clone = sender.clone();
        relm4::spawn(async move {
            while let Ok(event) = rx.recv().await {
                sender_clone.input(AppMsg::from(event));
            }
        });

        ComponentParts { model, widgets }
    }

    fn update(&mut self, msg: Self::Input, sender: ComponentSender<Self>) {
        match msg {
            AppMsg::Resize(w, h) => {
                self.size = (w, h);
                self.apply_size();
            }
            AppMsg::DragBegin(x, y) => {
                let start = Point::new(x, y);
                self.drag = Some(DragTracker {
                    start,
                    offset: Vector::default(),
                });
                self.last_touch = start;
                self.chart.borrow_mut().on_gesture_down();
            }
            AppMsg::DragUpdate(x, y) => {
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                // scroll distance runs from the current position back to the previous one
                let delta = Vector::new(drag.offset.x - x, drag.offset.y - y);
                let touch = Point::new(drag.start.x + x, drag.start.y + y);
                drag.offset = Vector::new(x, y);
                self.last_touch = touch;
                self.chart.borrow_mut().on_gesture_drag(delta, touch);
            }
            AppMsg::DragEnd => {
                self.drag = None;
                self.chart.borrow_mut().on_gesture_up();
            }
            AppMsg::Swipe(vx, vy) => {
                self.chart
                    .borrow_mut()
                    .on_gesture_fling(Vector::new(vx, vy), self.last_touch);
            }
            AppMsg::Add => {
                self.shown =
                    add_next_slice(&mut self.chart.borrow_mut(), &self.config, self.shown);
            }
            AppMsg::Remove => {
                // the first slice always stays
                if self.shown <= 1 {
                    return;
                }
                self.shown -= 1;
                let label = &self.config.slices[self.shown].label;
                if let Err(e) = self.chart.borrow_mut().remove_item(label) {
                    log::warn!("Cannot remove '{}': {}", label, e);
                }
                self.refresh_label();
            }
            AppMsg::Selected => self.refresh_label(),
            AppMsg::ConfigReload => match reload() {
                Ok((config, mut chart)) => {
                    connect_chart(&mut chart, &sender, &self.drawing_area);
                    self.shown = config.slices.len();
                    self.config = config;
                    *self.chart.borrow_mut() = chart;
                    self.drag = None;
                    self.apply_size();
                    self.refresh_label();
                    self.drawing_area.queue_draw();
                    log::info!("Configuration reloaded");
                }
                Err(e) => log::error!("{:#}", e),
            },
        }
    }
}
