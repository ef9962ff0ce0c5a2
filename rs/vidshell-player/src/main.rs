mod app;
mod backdrop;
mod backend;
mod config;
mod surface;

use config::Config;

fn main() -> anyhow::Result<()> {
	let config = Config::load()?;
	config.log.init();

	let event_loop = app::event_loop(config.window.backend())?;
	let mut player = app::Player::new(config, event_loop.create_proxy());
	event_loop.run_app(&mut player)?;

	player.finish()
}
