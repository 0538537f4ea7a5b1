use lifewheel::gui::app::AppModel;
use lifewheel::sys::runtime;
use piechart::config;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Config file: {}", path.display()),
        Err(e) => log::warn!("Could not set up a config file: {}", e),
    }
    let config = config::load_or_default();

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.nennig.lifewheel");

    app.run::<AppModel>((config, rx));
}
