#[cfg(feature = "gpui")]
use gpui::prelude::*;
#[cfg(feature = "gpui")]
use gpui::{AppContext, Application, Bounds, WindowBounds, WindowOptions, div, px, size};

#[cfg(feature = "gpui")]
use gpui_guideplot::{ContextManager, GpuiSurfaceView, TickScheduler, spawn_tick_loop};
#[cfg(feature = "gpui")]
use tracing_subscriber::EnvFilter;

#[cfg(feature = "gpui")]
struct GridDemo {
    cells: Vec<gpui::Entity<GpuiSurfaceView>>,
}

#[cfg(feature = "gpui")]
impl gpui::Render for GridDemo {
    fn render(
        &mut self,
        _window: &mut gpui::Window,
        _cx: &mut gpui::Context<Self>,
    ) -> impl gpui::IntoElement {
        let mut rows = div().size_full().flex().flex_col();
        for pair in self.cells.chunks(2) {
            let mut row = div().flex_1().flex().flex_row();
            for cell in pair {
                row = row.child(div().flex_1().child(cell.clone()));
            }
            rows = rows.child(row);
        }
        rows
    }
}

#[cfg(feature = "gpui")]
fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    Application::new().run(|cx| {
        let options = WindowOptions {
            window_bounds: Some(WindowBounds::Windowed(Bounds::centered(
                None,
                size(px(1_280.0), px(720.0)),
                cx,
            ))),
            titlebar: Some(gpui::TitlebarOptions {
                title: Some("multiple plot surfaces".into()),
                ..Default::default()
            }),
            ..Default::default()
        };

        cx.open_window(options, |window, cx| {
            let contexts = ContextManager::new();
            let ticks = TickScheduler::new();
            let cells: Vec<_> = (0..4)
                .map(|_| {
                    let view = GpuiSurfaceView::new(contexts.clone(), ticks.clone());
                    cx.new(|_| view)
                })
                .collect();
            spawn_tick_loop(window, cx, ticks, cells.clone());
            cx.new(|_| GridDemo { cells })
        })
        .unwrap();
    });
}

#[cfg(not(feature = "gpui"))]
fn main() {
    eprintln!("Enable the gpui feature to run this example.");
}
