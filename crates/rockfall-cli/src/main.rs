mod command;
mod config;
mod logging;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
