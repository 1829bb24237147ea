use std::cell::RefCell;
use std::rc::Rc;

use gradient_engine::core::{App, AppControl, FrameCtx, SurfaceSize};
use gradient_engine::input::KeyPress;

use crate::config::StudioConfig;
use crate::control::{Command, ControlSurface};
use crate::files::{FileManager, FilePicker};
use crate::presenter::Presenter;

/// Editor application: control panel, presenter, and file handling.
///
/// The presenter is shared with the stop collection's change listener, so
/// every edit reaches it without going through the app.
pub struct StudioApp<P: FilePicker> {
    control: ControlSurface,
    presenter: Rc<RefCell<Presenter>>,
    files: FileManager<P>,
    shown_title: Option<String>,
}

impl<P: FilePicker> StudioApp<P> {
    pub fn new(config: &StudioConfig, picker: P) -> Self {
        let presenter = Rc::new(RefCell::new(Presenter::new(config.clear_color)));
        let mut control = ControlSurface::new(config.export);

        let listener = presenter.clone();
        control.set_listener(move |stops| listener.borrow_mut().apply(stops));
        presenter.borrow_mut().apply(control.stops());

        Self {
            control,
            presenter,
            files: FileManager::new(picker),
            shown_title: None,
        }
    }

    fn run(&mut self, command: Command) -> AppControl {
        match command {
            Command::Quit => return AppControl::Exit,

            Command::Save => match self.files.save_config(self.control.stops()) {
                Ok(Some(_)) => {}
                Ok(None) => log::debug!("save cancelled"),
                Err(e) => log::warn!("save failed: {e:#}"),
            },

            Command::Load => match self.files.load_config() {
                Ok(Some(stops)) => self.control.replace_stops(stops),
                Ok(None) => log::debug!("load cancelled"),
                Err(e) => log::warn!("load failed: {e:#}"),
            },

            Command::Export => match self.files.open_export() {
                Ok(Some(dest)) => {
                    let settings = self.control.export_settings();
                    let path = dest.path.display().to_string();
                    self.presenter.borrow_mut().export_frame(
                        settings.width(),
                        settings.height(),
                        settings.quality(),
                        dest.format,
                        Box::new(dest.sink),
                        move |result| match result {
                            Ok(()) => log::info!("export written to {path}"),
                            Err(e) => log::warn!("export to {path} failed: {e:#}"),
                        },
                    );
                }
                Ok(None) => log::debug!("export cancelled"),
                Err(e) => log::warn!("export failed: {e:#}"),
            },
        }
        AppControl::Continue
    }

    fn title_is_stale(&self) -> bool {
        self.shown_title.as_deref() != Some(self.control.status_line().as_str())
    }
}

impl<P: FilePicker> App for StudioApp<P> {
    fn on_key(&mut self, key: KeyPress) -> AppControl {
        match self.control.handle_key(key) {
            Some(command) => self.run(command),
            None => AppControl::Continue,
        }
    }

    fn on_resize(&mut self, size: SurfaceSize) {
        self.presenter
            .borrow_mut()
            .resize(size.width, size.height, size.scale_factor);
    }

    fn wants_redraw(&self) -> bool {
        self.presenter.borrow().wants_redraw() || self.title_is_stale()
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if self.title_is_stale() {
            let title = self.control.status_line();
            ctx.window.set_title(&title);
            self.shown_title = Some(title);
        }
        self.presenter.borrow_mut().render_frame(ctx)
    }
}
