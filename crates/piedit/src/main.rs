use piedit::config;
use piedit::gui::app::AppModel;
use piedit::sys::runtime;
use relm4::prelude::*;

fn main() {
    env_logger::init();

    let config = config::load_or_setup();
    log::debug!("Loaded {} top-level menus", config.menus.len());

    let (tx, rx) = async_channel::bounded(32);

    // control socket and config watcher
    runtime::start_background_services(tx);

    let app = RelmApp::new("org.piedit.editor");

    app.run::<AppModel>((config, rx));
}
